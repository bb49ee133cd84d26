#![warn(clippy::all, rust_2018_idioms)]
mod app;
pub mod dataset_cache;
pub mod export;
pub(crate) mod graph_ui;
pub(crate) mod grid;

pub use app::App;
