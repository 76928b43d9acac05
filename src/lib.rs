//! Randomized depth-first-search maze carving.
//!
//! The core lives in [`maze`] (the wall-state grid) and [`generator`] (the
//! stepping carve/backtrack state machine). [`app`] is a thin terminal
//! collaborator that animates the generation and prints statistics.

pub mod app;
pub mod generator;
pub mod maze;
