//! Text embedding port for Docent.
//!
//! - `Embedder`: RPITIT trait for text-to-vector conversion
//! - `BoxEmbedder`: object-safe wrapper for dynamic dispatch

pub mod box_embedder;
pub mod embedder;

pub use box_embedder::BoxEmbedder;
pub use embedder::Embedder;
