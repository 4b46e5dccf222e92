//! AI systems (perception intake, controller updates, tactics, search)

pub mod controller;
pub mod perception;
pub mod search;
pub mod tactics;

pub use controller::*;
pub use perception::*;
pub use search::*;
pub use tactics::*;
