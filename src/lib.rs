pub mod calendar;
pub mod config;
pub mod cycle;
pub mod error;
pub mod events;
pub mod form;
pub mod render;
pub mod session;
pub mod ui;
