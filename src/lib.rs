pub mod calendar;
pub mod cmds;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod form;
pub mod grid;
pub mod surface;
pub mod ui;
pub mod view;

pub use calendar::{CalendarDate, MonthIndex};
pub use control::Controller;
pub use error::{Error, ErrorKind, Result};
pub use surface::{CellPos, ClassName, Surface};
pub use view::{Classes, View};
