//! LanceDB-backed passage index.
//!
//! Provides LanceDB connection management, the Arrow schema for the
//! passage table, and the `PassageIndex` implementation used for
//! similarity search over the embedded handbook.

pub mod index;
pub mod lance;
pub mod schema;

pub use index::LancePassageIndex;
pub use lance::LanceStore;
