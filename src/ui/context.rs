use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

use crate::calendar::CalendarDate;
use crate::control::Controller;
use crate::grid::COLUMNS;
use crate::surface::CellPos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Date,
    Class,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Form(Field),
    Command,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub adjacent_day_style: StyleModifier,
    pub initial_day_style: StyleModifier,
    pub initial_day_char: Option<char>,
    pub active_day_style: StyleModifier,
    pub active_day_char: Option<char>,
    pub cursor_style: StyleModifier,
    pub heading_style: StyleModifier,
    pub header_style: StyleModifier,
    pub alert_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::default(),
            adjacent_day_style: StyleModifier::default().fg_color(Color::LightBlack),
            initial_day_style: StyleModifier::default().fg_color(Color::Yellow),
            initial_day_char: Some('*'),
            active_day_style: StyleModifier::default().bg_color(Color::Blue),
            active_day_char: None,
            cursor_style: StyleModifier::default().invert(true),
            heading_style: StyleModifier::default().fg_color(Color::Yellow),
            header_style: StyleModifier::default().fg_color(Color::Yellow),
            alert_style: StyleModifier::default().fg_color(Color::LightRed),
        }
    }
}

pub struct Context {
    pub mode: Mode,
    pub theme: Theme,
    pub cursor: CellPos,
    pub quit: bool,
    controller: Controller,
    date_line: PromptLine,
    class_line: PromptLine,
    command_line: PromptLine,
}

impl Context {
    pub fn new(controller: Controller) -> Self {
        let cursor = controller
            .view()
            .find_day_cell(&controller.view().initial_date())
            .unwrap_or_else(|| CellPos::new(0, 0));

        Context {
            mode: Mode::Normal,
            theme: Theme::default(),
            cursor,
            quit: false,
            controller,
            date_line: PromptLine::with_prompt("date: ".to_owned()),
            class_line: PromptLine::with_prompt("class: ".to_owned()),
            command_line: PromptLine::with_prompt(":".to_owned()),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn input_sink(&self, mode: Mode) -> &PromptLine {
        match mode {
            Mode::Form(Field::Date) => &self.date_line,
            Mode::Form(Field::Class) => &self.class_line,
            Mode::Normal | Mode::Command => &self.command_line,
        }
    }

    pub fn input_sink_mut(&mut self, mode: Mode) -> &mut PromptLine {
        match mode {
            Mode::Form(Field::Date) => &mut self.date_line,
            Mode::Form(Field::Class) => &mut self.class_line,
            Mode::Normal | Mode::Command => &mut self.command_line,
        }
    }

    /// Takes the contents of both form fields, clearing them.
    pub fn finish_form(&mut self) -> (String, String) {
        let date = self.date_line.finish_line().to_owned();
        let class = self.class_line.finish_line().to_owned();
        (date, class)
    }

    fn visible_rows(&self) -> usize {
        self.controller.view().grid().num_rows()
    }

    /// Keeps the cursor inside the visible part of the grid.
    pub fn clamp_cursor(&mut self) {
        let max_row = self.visible_rows().saturating_sub(1);
        self.cursor.row = self.cursor.row.min(max_row);
        self.cursor.col = self.cursor.col.min(COLUMNS - 1);
    }

    /// Moves the cursor by whole cells, wrapping at the ends of a week.
    pub fn move_cursor(&mut self, cells: isize) {
        let num_cells = (self.visible_rows() * COLUMNS) as isize;
        let idx = (self.cursor.row * COLUMNS + self.cursor.col) as isize + cells;
        let idx = idx.max(0).min(num_cells - 1) as usize;
        self.cursor = CellPos::new(idx / COLUMNS, idx % COLUMNS);
    }

    pub fn cursor_to(&mut self, date: &CalendarDate) {
        if let Some(pos) = self.controller.view().find_day_cell(date) {
            self.cursor = pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;
    use crate::view::{Classes, View};

    fn context(y: i32, m: u32, d: u32) -> Context {
        let initial = CalendarDate::from_ymd(y, m, d).unwrap();
        let view = View::new(initial, Surface::calendar(), Classes::default()).unwrap();
        Context::new(Controller::new(view))
    }

    #[test]
    fn cursor_starts_on_initial_date() {
        let c = context(2024, 1, 17);
        assert_eq!(c.cursor, CellPos::new(2, 2));
    }

    #[test]
    fn cursor_wraps_rows_and_stays_in_grid() {
        let mut c = context(2024, 1, 1);
        c.move_cursor(-1);
        assert_eq!(c.cursor, CellPos::new(0, 0));

        c.move_cursor(7);
        assert_eq!(c.cursor, CellPos::new(1, 0));
        c.move_cursor(-1);
        assert_eq!(c.cursor, CellPos::new(0, 6));

        c.move_cursor(100);
        assert_eq!(c.cursor, CellPos::new(4, 6));
    }

    #[test]
    fn clamp_after_switching_to_shorter_month() {
        let mut c = context(2024, 9, 30);
        assert_eq!(c.cursor.row, 5);
        c.controller_mut().show_month(crate::calendar::MonthIndex::new(
            chrono::Month::February,
            2021,
        ));
        c.clamp_cursor();
        assert_eq!(c.cursor.row, 3);
    }
}
