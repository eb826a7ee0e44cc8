pub mod api;
pub mod config;
pub mod consts;
pub mod error;
pub mod fretboard;
pub mod geometry;
pub mod pitch;
pub mod resolver;
// cmd and reports belong to the binary (main.rs).

pub use api::{Fretboard, FretboardParams};
pub use error::{FretError, FretResult};
