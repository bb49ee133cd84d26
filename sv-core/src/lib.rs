#![warn(clippy::all, rust_2018_idioms)]
pub mod chromosome;
pub mod common;
pub mod dataset;
pub mod dot;
pub mod graph;
pub mod selection;
pub mod table;
