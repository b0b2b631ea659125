use std::fmt::{Display, Write};
use unsegen::base::*;
use unsegen::widget::*;

use super::{Context, Theme};
use crate::grid::{COLUMNS, WEEK_ROWS};
use crate::surface::{CellPos, TableCell};
use crate::view::Classes;

struct DayCell<'a> {
    cell: &'a TableCell,
    classes: &'a Classes,
    highlighted: bool,
    theme: &'a Theme,
}

impl<'a> DayCell<'a> {
    const CELL_HEIGHT: usize = 1;
    const CELL_WIDTH: usize = 4;

    fn is_initial(&self) -> bool {
        self.cell.classes.has(&self.classes.initial)
    }

    fn is_adjacent(&self) -> bool {
        self.cell.classes.has(&self.classes.adjacent)
    }

    fn style(&self) -> StyleModifier {
        if self.highlighted {
            self.theme.active_day_style
        } else if self.is_initial() {
            self.theme.initial_day_style
        } else if self.is_adjacent() {
            self.theme.adjacent_day_style
        } else {
            self.theme.day_style
        }
    }
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arg_initial = if self.is_initial() {
            self.theme.initial_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_active = if self.highlighted {
            self.theme.active_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        write!(f, "{}{}{:>2}", arg_initial, arg_active, self.cell.text)
    }
}

/// Draws the view's surface: heading, weekday header and the visible weeks.
pub struct MonthPane<'a> {
    context: &'a Context,
}

impl<'a> MonthPane<'a> {
    const HEADER_ROWS: usize = 2;

    pub fn new(context: &'a Context) -> Self {
        MonthPane { context }
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(COLUMNS * DayCell::CELL_WIDTH),
            height: RowDemand::exact(Self::HEADER_ROWS + WEEK_ROWS * DayCell::CELL_HEIGHT),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let view = self.context.controller().view();
        let surface = view.surface();
        let highlighted = view.highlighted().map(|h| h.pos);

        let mut cursor = Cursor::new(&mut window)
            .wrapping_mode(WrappingMode::Wrap)
            .style_modifier(theme.heading_style);

        if let Err(e) = writeln!(
            &mut cursor,
            "{:^width$}",
            surface.heading(),
            width = COLUMNS * DayCell::CELL_WIDTH
        ) {
            log::warn!("Error while writing heading: {}", e);
        }

        cursor.set_style_modifier(theme.header_style);
        let header = surface
            .header()
            .iter()
            .try_for_each(|head| {
                write!(
                    &mut cursor,
                    "{:>width$}",
                    head,
                    width = DayCell::CELL_WIDTH
                )
            })
            .and_then(|_| writeln!(&mut cursor));
        if let Err(e) = header {
            log::warn!("Error while writing weekday header: {}", e);
        }

        for (r, row) in surface.visible_rows() {
            for (c, cell) in row.cells().iter().enumerate() {
                let pos = CellPos::new(r, c);
                let day = DayCell {
                    cell,
                    classes: view.classes(),
                    highlighted: highlighted == Some(pos),
                    theme,
                };

                cursor.set_style_modifier(day.style());
                if pos == self.context.cursor {
                    cursor.apply_style_modifier(theme.cursor_style);
                }
                if let Err(e) = write!(&mut cursor, "{}", day) {
                    log::warn!("Error while writing day {}: {}", cell.text, e);
                }
            }
            cursor.set_style_modifier(theme.day_style);
            if let Err(e) = writeln!(&mut cursor) {
                log::warn!("Error while ending week {}: {}", r, e);
            }
        }
    }
}

/// A single line of text, used for alerts in the bottom bar.
pub struct StatusLine<'a> {
    text: &'a str,
    style: StyleModifier,
}

impl<'a> StatusLine<'a> {
    pub fn new(text: &'a str, style: StyleModifier) -> Self {
        StatusLine { text, style }
    }
}

impl Widget for StatusLine<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(self.text.chars().count()),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let mut cursor = Cursor::new(&mut window).style_modifier(self.style);
        if let Err(e) = write!(&mut cursor, "{}", self.text) {
            log::warn!("Error while writing status line: {}", e);
        }
    }
}
