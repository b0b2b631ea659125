use crate::calendar::{CalendarDate, MonthIndex};
use crate::error::{Error, ErrorKind, Result};
use crate::form::ActiveDateForm;
use crate::surface::{CellPos, ClassName};
use crate::view::View;

/// Owns the displayed month and drives the `View` on navigation and form
/// submissions.
pub struct Controller {
    view: View,
    displayed: MonthIndex,
    alert: Option<String>,
}

impl Controller {
    /// Takes over `view` and renders the month of its initial date.
    pub fn new(view: View) -> Self {
        let displayed = view.initial_date().month_index();
        let mut controller = Controller {
            view,
            displayed,
            alert: None,
        };
        controller.view.render(displayed);
        controller
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn displayed(&self) -> MonthIndex {
        self.displayed
    }

    pub fn show_month(&mut self, month: MonthIndex) {
        self.displayed = month;
        self.view.render(month);
    }

    pub fn show_previous(&mut self) -> Result<()> {
        self.show_months_back(1)
    }

    pub fn show_next(&mut self) -> Result<()> {
        self.show_months_ahead(1)
    }

    /// Jumps `months` ahead with a single render. Fails, leaving the view as
    /// it is, past the last month that can be shown.
    pub fn show_months_ahead(&mut self, months: u32) -> Result<()> {
        let month = self.displayed.checked_add(months).ok_or_else(|| {
            let (_, last) = MonthIndex::supported_range();
            Error::new(
                ErrorKind::InvalidDate,
                &format!("Cannot show months after {}", last),
            )
        })?;
        self.show_month(month);
        Ok(())
    }

    pub fn show_months_back(&mut self, months: u32) -> Result<()> {
        let month = self.displayed.checked_sub(months).ok_or_else(|| {
            let (first, _) = MonthIndex::supported_range();
            Error::new(
                ErrorKind::InvalidDate,
                &format!("Cannot show months before {}", first),
            )
        })?;
        self.show_month(month);
        Ok(())
    }

    pub fn show_initial(&mut self) {
        self.show_month(self.view.initial_date().month_index());
    }

    /// Renders the month of `date` and marks `date` active with `class`.
    pub fn activate(&mut self, date: CalendarDate, class: ClassName) -> CellPos {
        self.show_month(date.month_index());
        match self.view.highlight(date, class, true) {
            Some(pos) => pos,
            None => panic!("{} not found right after rendering its month", date),
        }
    }

    /// Parses the form fields and, if both are valid, activates the date.
    ///
    /// Nothing changes when the input is rejected.
    pub fn submit_active_date(&mut self, date_text: &str, class_text: &str) -> Result<CalendarDate> {
        let form = ActiveDateForm::parse(date_text, class_text, self.view.classes())?;
        self.activate(form.date, form.class);
        Ok(form.date)
    }

    /// Form submission boundary: errors end up as an alert message.
    pub fn on_submit(&mut self, date_text: &str, class_text: &str) -> bool {
        self.alert = None;
        match self.submit_active_date(date_text, class_text) {
            Ok(date) => {
                log::info!("Active date set to {}", date);
                true
            }
            Err(e) => {
                log::info!("Rejected form input '{}' / '{}': {}", date_text, class_text, e);
                self.alert = Some(e.user_message());
                false
            }
        }
    }

    /// Marks the date shown in the cell at `pos` active with the current
    /// active class.
    pub fn select_cell(&mut self, pos: CellPos) -> Option<CellPos> {
        let date = self.view.date_at(pos)?;
        let class = self.view.active_class().clone();
        Some(self.activate(date, class))
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn set_alert(&mut self, message: String) {
        self.alert = Some(message);
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}
