use crate::calendar::{CalendarDate, MonthIndex};
use crate::surface::CellPos;

pub const COLUMNS: usize = 7;
pub const WEEK_ROWS: usize = 6;

/// Which month a grid cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Previous,
    Current,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub day: u32,
    pub kind: DayKind,
}

impl GridDay {
    pub fn is_adjacent(&self) -> bool {
        self.kind != DayKind::Current
    }
}

/// Rows needed to show `num_days` days after `offset` leading cells.
pub fn visible_rows(num_days: u32, offset: u32) -> usize {
    ((num_days + offset) as usize + COLUMNS - 1) / COLUMNS
}

/// Day numbers of one month laid out on a Monday-first week grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: MonthIndex,
    offset: u32,
    num_days: u32,
    rows: Vec<[GridDay; COLUMNS]>,
}

impl MonthGrid {
    pub fn layout(month: MonthIndex) -> Self {
        let num_days = month.num_days();
        let prev_days = month.prev().num_days();
        let offset = month.leading_offset();
        let num_rows = visible_rows(num_days, offset);

        // With no leading cells this starts past the previous month's end and
        // flips to day 1 of the current month on the first cell.
        let mut num = prev_days - offset + 1;
        let mut kind = DayKind::Previous;

        let rows = (0..num_rows)
            .map(|_| {
                let mut week = [GridDay {
                    day: 0,
                    kind: DayKind::Current,
                }; COLUMNS];

                for cell in week.iter_mut() {
                    match kind {
                        DayKind::Previous if num > prev_days => {
                            num = 1;
                            kind = DayKind::Current;
                        }
                        DayKind::Current if num > num_days => {
                            num = 1;
                            kind = DayKind::Next;
                        }
                        _ => {}
                    }

                    *cell = GridDay { day: num, kind };
                    num += 1;
                }

                week
            })
            .collect();

        MonthGrid {
            month,
            offset,
            num_days,
            rows,
        }
    }

    pub fn month(&self) -> MonthIndex {
        self.month
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[[GridDay; COLUMNS]] {
        &self.rows
    }

    pub fn day_at(&self, pos: CellPos) -> Option<GridDay> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    /// Cell showing `day` of the grid's own month.
    pub fn position_of(&self, day: u32) -> Option<CellPos> {
        if day == 0 || day > self.num_days {
            return None;
        }
        let idx = (self.offset + day - 1) as usize;
        Some(CellPos::new(idx / COLUMNS, idx % COLUMNS))
    }

    /// The date a cell stands for, including days of adjacent months.
    pub fn date_at(&self, pos: CellPos) -> Option<CalendarDate> {
        let grid_day = self.day_at(pos)?;
        let month = match grid_day.kind {
            DayKind::Previous => self.month.prev(),
            DayKind::Current => self.month,
            DayKind::Next => self.month.next(),
        };
        CalendarDate::from_ymd(month.year(), month.number(), grid_day.day).ok()
    }
}
