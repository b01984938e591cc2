//! Terminal front-end: configuration, input, effect execution and rendering.
mod app;
mod config;
mod effects;
mod export;
mod input;
mod ui;

pub use app::run_app;
