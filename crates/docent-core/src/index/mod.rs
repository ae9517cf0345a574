//! Passage index port for Docent.
//!
//! - `PassageIndex`: RPITIT trait for vector-indexed passage storage
//! - `BoxPassageIndex`: object-safe wrapper for dynamic dispatch

pub mod box_index;
pub mod passage_index;

pub use box_index::BoxPassageIndex;
pub use passage_index::{IndexHit, PassageIndex};
