//! Report output
//!
//! Text goes to the console; JSON goes to stdout or a file.

pub mod json;
pub mod text;
