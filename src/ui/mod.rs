pub mod app;
pub mod command;
pub mod context;
pub mod form;
pub mod month_pane;

pub use app::App;
pub use context::{Context, Field, Mode, Theme};
pub use form::FormSubmitter;
pub use month_pane::{MonthPane, StatusLine};
