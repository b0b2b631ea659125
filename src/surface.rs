//! The table the calendar renders into.
//!
//! A `Surface` mirrors the structure the widget expects from its host: a
//! heading, a weekday header and a number of week rows made of day cells.
//! Every cell carries its text and a typed set of classes.

use serde::Deserialize;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

pub const CLASS_DIGIT_MESSAGE: &str = "Please, begin the class name with a letter, not a number";

/// A single, validated class name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct ClassName(String);

impl ClassName {
    pub fn new(name: &str) -> Result<Self> {
        match name.chars().next() {
            None => Err(Error::new(
                ErrorKind::MalformedInput,
                "The class name must not be empty",
            )),
            Some(c) if c.is_ascii_digit() => {
                Err(Error::new(ErrorKind::MalformedInput, CLASS_DIGIT_MESSAGE))
            }
            Some(_) if name.chars().any(char::is_whitespace) => Err(Error::new(
                ErrorKind::MalformedInput,
                "Please, give a single class name without spaces",
            )),
            Some(_) => Ok(ClassName(name.to_owned())),
        }
    }

    /// For names known to be valid at compile time.
    pub(crate) fn trusted(name: &'static str) -> Self {
        debug_assert!(ClassName::new(name).is_ok());
        ClassName(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClassName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ClassName::new(s)
    }
}

impl TryFrom<String> for ClassName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ClassName::new(&value)
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The set of classes attached to one cell, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: Vec<ClassName>,
}

impl ClassList {
    pub fn new() -> Self {
        ClassList::default()
    }

    /// Returns `false` if the class was already present.
    pub fn add(&mut self, class: ClassName) -> bool {
        if self.has(&class) {
            false
        } else {
            self.classes.push(class);
            true
        }
    }

    /// Returns `false` if the class was not present.
    pub fn remove(&mut self, class: &ClassName) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        before != self.classes.len()
    }

    pub fn has(&self, class: &ClassName) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for class in &self.classes {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", class)?;
            first = false;
        }
        Ok(())
    }
}

/// Position of a day cell: week row (without the header) and weekday column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        CellPos { row, col }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub text: String,
    pub classes: ClassList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<TableCell>,
    hidden: bool,
}

impl TableRow {
    pub fn with_cells(num_cells: usize) -> Self {
        TableRow {
            cells: vec![TableCell::default(); num_cells],
            hidden: false,
        }
    }

    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    pub fn cell(&self, col: usize) -> Option<&TableCell> {
        self.cells.get(col)
    }

    pub fn cell_mut(&mut self, col: usize) -> Option<&mut TableCell> {
        self.cells.get_mut(col)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    heading: String,
    header: Vec<String>,
    rows: Vec<TableRow>,
}

impl Surface {
    pub const WEEKDAYS: [&'static str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    /// A calendar table: weekday header and six week rows of seven cells.
    pub fn calendar() -> Self {
        Surface::with_shape(crate::grid::WEEK_ROWS, crate::grid::COLUMNS)
    }

    pub fn with_shape(num_rows: usize, num_cols: usize) -> Self {
        Surface {
            heading: String::new(),
            header: Surface::WEEKDAYS
                .iter()
                .take(num_cols)
                .map(|s| s.to_string())
                .collect(),
            rows: (0..num_rows).map(|_| TableRow::with_cells(num_cols)).collect(),
        }
    }

    /// Checks that the surface provides the rows and cells a month grid needs.
    pub fn ensure_shape(&self, num_rows: usize, num_cols: usize) -> Result<()> {
        if self.rows.len() < num_rows {
            return Err(Error::new(
                ErrorKind::MissingElement,
                &format!(
                    "expected {} week rows, found {}",
                    num_rows,
                    self.rows.len()
                ),
            ));
        }

        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.cells.len() < num_cols)
        {
            return Err(Error::new(
                ErrorKind::MissingElement,
                &format!(
                    "week row {} has {} cells, expected {}",
                    idx,
                    row.cells.len(),
                    num_cols
                ),
            ));
        }

        Ok(())
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn set_heading(&mut self, heading: String) {
        self.heading = heading;
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, row: usize) -> Option<&mut TableRow> {
        self.rows.get_mut(row)
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &TableRow)> {
        self.rows.iter().enumerate().filter(|(_, row)| !row.hidden)
    }

    pub fn cell(&self, pos: CellPos) -> Option<&TableCell> {
        self.rows.get(pos.row).and_then(|row| row.cell(pos.col))
    }

    pub fn cell_mut(&mut self, pos: CellPos) -> Option<&mut TableCell> {
        self.rows.get_mut(pos.row).and_then(|row| row.cell_mut(pos.col))
    }

    /// Positions of all cells carrying `class`.
    pub fn cells_with_class(&self, class: &ClassName) -> Vec<CellPos> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.cells
                    .iter()
                    .enumerate()
                    .filter(move |(_, cell)| cell.classes.has(class))
                    .map(move |(c, _)| CellPos::new(r, c))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> ClassName {
        ClassName::new(name).unwrap()
    }

    #[test]
    fn class_name_validation() {
        assert!(ClassName::new("calendar_cell_active").is_ok());
        assert!(ClassName::new("").is_err());
        assert!(ClassName::new("two words").is_err());

        let err = ClassName::new("1active").unwrap_err();
        assert_eq!(err.user_message(), CLASS_DIGIT_MESSAGE);
    }

    #[test]
    fn class_list_is_a_set() {
        let mut list = ClassList::new();
        assert!(list.add(class("a")));
        assert!(!list.add(class("a")));
        assert!(list.add(class("b")));
        assert_eq!(list.to_string(), "a b");

        assert!(list.remove(&class("a")));
        assert!(!list.remove(&class("a")));
        assert!(!list.has(&class("a")));
        assert!(list.has(&class("b")));

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn calendar_surface_shape() {
        let surface = Surface::calendar();
        assert_eq!(surface.rows().len(), 6);
        assert!(surface.rows().iter().all(|r| r.cells().len() == 7));
        assert_eq!(surface.header().len(), 7);
        assert!(surface.ensure_shape(6, 7).is_ok());
    }

    #[test]
    fn missing_rows_or_cells_are_reported() {
        let err = Surface::with_shape(5, 7).ensure_shape(6, 7).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingElement));

        let err = Surface::with_shape(6, 6).ensure_shape(6, 7).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingElement));
    }

    #[test]
    fn finds_cells_by_class() {
        let mut surface = Surface::calendar();
        let pos = CellPos::new(2, 4);
        surface.cell_mut(pos).unwrap().classes.add(class("x"));

        assert_eq!(surface.cells_with_class(&class("x")), vec![pos]);
        assert!(surface.cells_with_class(&class("y")).is_empty());
    }
}
