use serde::Deserialize;
use std::fmt;

use crate::calendar::{CalendarDate, MonthIndex};
use crate::error::Result;
use crate::grid::{MonthGrid, COLUMNS, WEEK_ROWS};
use crate::surface::{CellPos, ClassName, Surface};

/// Class names the view puts on its cells.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Classes {
    /// Marks the date the widget was constructed with.
    pub initial: ClassName,
    /// Default class for the active date.
    pub active: ClassName,
    /// Marks days of the previous and next month.
    pub adjacent: ClassName,
}

impl Default for Classes {
    fn default() -> Self {
        Classes {
            initial: ClassName::trusted("calendar_cell_initial"),
            active: ClassName::trusted("calendar_cell_active"),
            adjacent: ClassName::trusted("calendar_previous"),
        }
    }
}

impl Classes {
    /// Classes the view sets on its own and that must not be used for the
    /// active date.
    pub fn is_reserved(&self, class: &ClassName) -> bool {
        class == &self.initial || class == &self.adjacent
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub pos: CellPos,
    pub class: ClassName,
}

/// Renders month grids into a `Surface` and keeps track of the highlighted
/// and the active date.
#[derive(Debug, Clone)]
pub struct View {
    initial: CalendarDate,
    rendered: MonthIndex,
    grid: MonthGrid,
    active_date: Option<CalendarDate>,
    active_class: ClassName,
    highlighted: Option<Highlight>,
    classes: Classes,
    surface: Surface,
}

impl View {
    /// Fails if `surface` lacks any of the week rows or day cells.
    pub fn new(initial: CalendarDate, surface: Surface, classes: Classes) -> Result<Self> {
        surface.ensure_shape(WEEK_ROWS, COLUMNS)?;

        let rendered = initial.month_index();
        Ok(View {
            initial,
            rendered,
            grid: MonthGrid::layout(rendered),
            active_date: None,
            active_class: classes.active.clone(),
            highlighted: None,
            classes,
            surface,
        })
    }

    pub fn initial_date(&self) -> CalendarDate {
        self.initial
    }

    pub fn rendered_month(&self) -> MonthIndex {
        self.rendered
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn active_date(&self) -> Option<CalendarDate> {
        self.active_date
    }

    pub fn active_class(&self) -> &ClassName {
        &self.active_class
    }

    pub fn highlighted(&self) -> Option<&Highlight> {
        self.highlighted.as_ref()
    }

    pub fn classes(&self) -> &Classes {
        &self.classes
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Draws `month` into the surface.
    ///
    /// Every call starts from a clean table, so rendering the same month
    /// twice leaves the surface unchanged.
    pub fn render(&mut self, month: MonthIndex) {
        let grid = MonthGrid::layout(month);
        let num_rows = grid.num_rows();

        self.surface.set_heading(month.to_string());

        let adjacent = self.classes.adjacent.clone();

        for r in 0..WEEK_ROWS {
            let row = match self.surface.row_mut(r) {
                Some(row) => row,
                None => continue,
            };
            row.set_hidden(r >= num_rows);

            for c in 0..COLUMNS {
                let cell = match row.cell_mut(c) {
                    Some(cell) => cell,
                    None => continue,
                };
                cell.classes.clear();

                match grid.day_at(CellPos::new(r, c)) {
                    Some(day) => {
                        cell.text = day.day.to_string();
                        if day.is_adjacent() {
                            cell.classes.add(adjacent.clone());
                        }
                    }
                    None => cell.text.clear(),
                }
            }
        }

        // All classes were just cleared, including the old highlight.
        self.highlighted = None;
        self.rendered = month;
        self.grid = grid;

        log::debug!("Rendered {} with {} rows", month, num_rows);

        if month.contains(&self.initial) {
            if let Some(pos) = self.find_day_cell(&self.initial) {
                let class = self.classes.initial.clone();
                if let Some(cell) = self.surface.cell_mut(pos) {
                    cell.classes.add(class);
                }
            }
        }

        if let Some(active) = self.active_date.filter(|d| month.contains(d)) {
            let class = self.active_class.clone();
            self.highlight(active, class, false);
        }
    }

    /// Re-renders the month currently shown.
    pub fn rerender(&mut self) {
        self.render(self.rendered);
    }

    /// Cell of `date` in the rendered month, `None` for dates of other months.
    pub fn find_day_cell(&self, date: &CalendarDate) -> Option<CellPos> {
        if !self.rendered.contains(date) {
            return None;
        }
        self.grid.position_of(date.day())
    }

    /// The date shown in the visible cell at `pos`.
    pub fn date_at(&self, pos: CellPos) -> Option<CalendarDate> {
        match self.surface.rows().get(pos.row) {
            Some(row) if !row.is_hidden() => self.grid.date_at(pos),
            _ => None,
        }
    }

    /// Moves the highlight to the cell of `date`.
    ///
    /// Returns `None` and leaves everything untouched if `date` is not part of
    /// the rendered month. With `is_active` the date and class are remembered
    /// and re-applied on every render of that month.
    pub fn highlight(
        &mut self,
        date: CalendarDate,
        class: ClassName,
        is_active: bool,
    ) -> Option<CellPos> {
        let pos = self.find_day_cell(&date)?;

        if let Some(prev) = self.highlighted.take() {
            if let Some(cell) = self.surface.cell_mut(prev.pos) {
                cell.classes.remove(&prev.class);
            }
        }

        if let Some(cell) = self.surface.cell_mut(pos) {
            cell.classes.add(class.clone());
        }

        log::debug!("Highlighted {} at {:?} with '{}'", date, pos, class);

        if is_active {
            self.active_date = Some(date);
            self.active_class = class.clone();
        }
        self.highlighted = Some(Highlight { pos, class });

        Some(pos)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:^width$}", self.surface.heading(), width = COLUMNS * 4)?;

        for head in self.surface.header() {
            write!(f, "{:>4}", head)?;
        }
        writeln!(f)?;

        for (r, row) in self.surface.visible_rows() {
            for (c, cell) in row.cells().iter().enumerate() {
                let marker = if cell.classes.has(&self.classes.initial) {
                    '*'
                } else if cell.classes.has(&self.classes.adjacent) {
                    '.'
                } else {
                    ' '
                };
                let focus = match &self.highlighted {
                    Some(h) if h.pos == CellPos::new(r, c) => '+',
                    _ => ' ',
                };
                write!(f, "{}{}{:>2}", marker, focus, cell.text)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::Month;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn class(name: &str) -> ClassName {
        ClassName::new(name).unwrap()
    }

    fn view(initial: CalendarDate) -> View {
        let mut view = View::new(initial, Surface::calendar(), Classes::default()).unwrap();
        view.rerender();
        view
    }

    #[test]
    fn rejects_incomplete_surface() {
        let err = View::new(
            date(2024, 1, 1),
            Surface::with_shape(5, 7),
            Classes::default(),
        )
        .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingElement));
    }

    #[test]
    fn renders_heading_and_rows() {
        let v = view(date(2024, 1, 15));
        let surface = v.surface();
        assert_eq!(surface.heading(), "2024 January");
        assert_eq!(surface.visible_rows().count(), 5);
        assert!(surface.rows()[5].is_hidden());
        assert_eq!(surface.cell(CellPos::new(0, 0)).unwrap().text, "1");
        assert_eq!(surface.cell(CellPos::new(4, 2)).unwrap().text, "31");

        let adjacent = &v.classes().adjacent;
        assert!(!surface.cell(CellPos::new(4, 2)).unwrap().classes.has(adjacent));
        assert!(surface.cell(CellPos::new(4, 3)).unwrap().classes.has(adjacent));
    }

    #[test]
    fn leading_days_are_marked() {
        let mut v = view(date(2024, 1, 15));
        v.render(MonthIndex::new(Month::February, 2024));

        let surface = v.surface();
        let adjacent = &v.classes().adjacent;
        let first = surface.cell(CellPos::new(0, 0)).unwrap();
        assert_eq!(first.text, "29");
        assert!(first.classes.has(adjacent));
        let leap = surface.cell(CellPos::new(4, 3)).unwrap();
        assert_eq!(leap.text, "29");
        assert!(!leap.classes.has(adjacent));
    }

    #[test]
    fn hidden_rows_follow_every_render() {
        let mut v = view(date(2024, 9, 10));
        assert_eq!(v.surface().visible_rows().count(), 6);

        v.render(MonthIndex::new(Month::February, 2021));
        assert_eq!(v.surface().visible_rows().count(), 4);
        assert!(v.surface().rows()[4].is_hidden());
        assert!(v.surface().rows()[5].is_hidden());

        v.render(MonthIndex::new(Month::September, 2024));
        assert_eq!(v.surface().visible_rows().count(), 6);

        v.render(MonthIndex::new(Month::February, 2021));
        assert_eq!(v.surface().visible_rows().count(), 4);
    }

    #[test]
    fn visible_rows_cover_month_exactly() {
        let mut v = view(date(2024, 1, 15));
        for year in 1999..=2030 {
            for m in 1..=12 {
                let month = MonthIndex::from_number(m, year).unwrap();
                v.render(month);

                let needed = ((month.num_days() + month.leading_offset()) as usize + 6) / 7;
                let rows = v.surface().rows();
                assert_eq!(v.surface().visible_rows().count(), needed, "{}", month);
                assert!(rows[..needed].iter().all(|r| !r.is_hidden()), "{}", month);
                assert!(rows[needed..].iter().all(|r| r.is_hidden()), "{}", month);
            }
        }
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut v = view(date(2024, 3, 5));
        v.highlight(date(2024, 3, 20), class("mine"), true);
        v.rerender();
        let first = v.surface().clone();
        v.rerender();
        assert_eq!(&first, v.surface());
    }

    #[test]
    fn initial_date_is_marked_when_visible() {
        let mut v = view(date(2024, 3, 5));
        let initial = v.classes().initial.clone();
        let pos = v.find_day_cell(&date(2024, 3, 5)).unwrap();
        assert_eq!(v.surface().cells_with_class(&initial), vec![pos]);

        v.render(MonthIndex::new(Month::April, 2024));
        assert!(v.surface().cells_with_class(&initial).is_empty());

        v.render(MonthIndex::new(Month::March, 2024));
        assert_eq!(v.surface().cells_with_class(&initial), vec![pos]);
    }

    #[test]
    fn highlight_moves_between_cells() {
        let mut v = view(date(2024, 3, 5));
        let mine = class("mine");

        let first = v.highlight(date(2024, 3, 10), mine.clone(), false).unwrap();
        let second = v.highlight(date(2024, 3, 11), mine.clone(), false).unwrap();
        assert_ne!(first, second);
        assert_eq!(v.surface().cells_with_class(&mine), vec![second]);
        assert_eq!(v.active_date(), None);
    }

    #[test]
    fn highlight_outside_month_is_noop() {
        let mut v = view(date(2024, 3, 5));
        let mine = class("mine");
        let pos = v.highlight(date(2024, 3, 10), mine.clone(), true).unwrap();

        assert_eq!(v.highlight(date(2024, 4, 10), class("other"), true), None);
        assert_eq!(v.surface().cells_with_class(&mine), vec![pos]);
        assert_eq!(v.active_date(), Some(date(2024, 3, 10)));
        assert_eq!(v.highlighted().map(|h| h.pos), Some(pos));
    }

    #[test]
    fn active_date_survives_navigation() {
        let mut v = view(date(2024, 3, 5));
        let mine = class("mine");
        let pos = v.highlight(date(2024, 3, 10), mine.clone(), true).unwrap();

        v.render(MonthIndex::new(Month::April, 2024));
        assert!(v.surface().cells_with_class(&mine).is_empty());
        assert!(v.highlighted().is_none());

        v.render(MonthIndex::new(Month::March, 2024));
        assert_eq!(v.surface().cells_with_class(&mine), vec![pos]);
        assert_eq!(v.active_class(), &mine);
    }

    #[test]
    fn initial_and_active_coexist() {
        let mut v = view(date(2024, 3, 5));
        let initial = v.classes().initial.clone();
        let active = v.classes().active.clone();
        v.highlight(date(2024, 3, 5), active.clone(), true);

        let pos = v.find_day_cell(&date(2024, 3, 5)).unwrap();
        let cell = v.surface().cell(pos).unwrap();
        assert!(cell.classes.has(&initial));
        assert!(cell.classes.has(&active));

        v.highlight(date(2024, 3, 6), active.clone(), true);
        let cell = v.surface().cell(pos).unwrap();
        assert!(cell.classes.has(&initial));
        assert!(!cell.classes.has(&active));
    }

    #[test]
    fn date_at_ignores_hidden_rows() {
        let v = view(date(2024, 1, 15));
        assert_eq!(v.date_at(CellPos::new(0, 0)), Some(date(2024, 1, 1)));
        assert_eq!(v.date_at(CellPos::new(5, 0)), None);
    }

    #[test]
    fn text_rendering_marks_cells() {
        let mut v = view(date(2024, 1, 15));
        v.highlight(date(2024, 1, 16), v.classes().active.clone(), true);
        let text = v.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "2024 January");
        assert_eq!(lines[1], " Mon Tue Wed Thu Fri Sat Sun");
        assert_eq!(lines.len(), 2 + 5);
        assert!(lines[4].contains("* 15"));
        assert!(lines[4].contains(" +16"));
        assert!(lines[6].contains(".  1"));
    }
}
