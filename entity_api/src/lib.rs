pub use entity::{nodes, Id};

pub mod error;
pub mod node;
