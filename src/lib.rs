pub mod chunk;
pub mod error;
pub mod frontier;
pub mod index;
pub mod median;
pub mod parse;
pub mod search;

pub use error::*;
