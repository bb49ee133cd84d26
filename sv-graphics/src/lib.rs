#![warn(clippy::all, rust_2018_idioms)]
pub mod annotate;
pub mod colorscale;
pub mod common;
mod error;
pub mod figure;
pub mod flatten;
pub mod shape;
pub mod svg;

pub use error::EncodeError;
