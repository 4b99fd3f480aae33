pub mod app;
mod command;
mod context;
mod form_window;
mod info_window;
mod month_pane;

pub use context::{Context, Mode, Notice, Theme};
pub use form_window::{FormBehaviour, FormWindow};
pub use info_window::InfoWindow;
pub use month_pane::MonthPane;
