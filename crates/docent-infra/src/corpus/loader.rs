//! Corpus directory loader.
//!
//! Reads `.txt` and `.md` files from the corpus directory (including one
//! level of subdirectories) into [`CorpusDocument`] values, and computes
//! the SHA-256 fingerprint used for index staleness checks.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use docent_types::corpus::CorpusDocument;
use docent_types::error::CorpusError;

/// File extensions treated as corpus documents.
const TEXT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Load every text document under the corpus directory.
///
/// Walks the directory and one level of subdirectories. Files with other
/// extensions are ignored; empty files are skipped with a warning. The
/// result is sorted by source name so fingerprints are deterministic.
pub async fn load_corpus(dir: &Path) -> Result<Vec<CorpusDocument>, CorpusError> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Err(CorpusError::DirNotFound(dir.display().to_string()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    collect_text_files(dir, &mut files, true).await?;

    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            CorpusError::Read {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let source = path
            .strip_prefix(dir)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");

        if content.trim().is_empty() {
            warn!(source = %source, "Skipping empty corpus file");
            continue;
        }

        let is_markdown = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("md"));

        documents.push(CorpusDocument {
            source,
            content,
            is_markdown,
        });
    }

    if documents.is_empty() {
        return Err(CorpusError::Empty(dir.display().to_string()));
    }

    documents.sort_by(|a, b| a.source.cmp(&b.source));
    debug!(count = documents.len(), "Corpus loaded");
    Ok(documents)
}

/// Collect text file paths from `dir`, recursing one level into
/// subdirectories.
async fn collect_text_files(
    dir: &Path,
    files: &mut Vec<PathBuf>,
    recurse: bool,
) -> Result<(), CorpusError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| CorpusError::Read {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    while let Some(entry) = entries.next_entry().await.map_err(|e| CorpusError::Read {
        path: dir.display().to_string(),
        message: e.to_string(),
    })? {
        let path = entry.path();
        if path.is_dir() {
            if recurse {
                Box::pin(collect_text_files(&path, files, false)).await?;
            }
            continue;
        }

        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| TEXT_EXTENSIONS.iter().any(|t| e.eq_ignore_ascii_case(t)));
        if is_text {
            files.push(path);
        }
    }

    Ok(())
}

/// SHA-256 fingerprint over the corpus plus the indexing parameters.
///
/// The fingerprint changes when any document's content changes, when
/// documents are added/removed, or when `extra` (embedding model, chunk
/// settings) changes -- any of which invalidates the on-disk index.
pub fn corpus_fingerprint(documents: &[CorpusDocument], extra: &str) -> String {
    let mut hasher = Sha256::new();
    for doc in documents {
        hasher.update(doc.source.as_bytes());
        hasher.update([0u8]);
        hasher.update((doc.content.len() as u64).to_le_bytes());
        hasher.update(doc.content.as_bytes());
    }
    hasher.update(extra.as_bytes());
    format!("{:x}", hasher.finalize())
}
