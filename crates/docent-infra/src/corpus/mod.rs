//! Corpus loading, chunking, and fingerprinting.
//!
//! The handbook corpus is a directory of `.txt` and `.md` files. At
//! startup the loader reads every document, the chunker splits them into
//! overlapping passages, and the fingerprint decides whether the vector
//! index on disk is stale.

pub mod chunker;
pub mod loader;

pub use chunker::chunk_document;
pub use loader::{corpus_fingerprint, load_corpus};
