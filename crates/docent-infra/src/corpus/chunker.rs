//! Semantic text chunker for corpus documents.
//!
//! Uses the `text-splitter` crate to split documents into overlapping
//! chunks suitable for embedding. Markdown files use `MarkdownSplitter`
//! for heading-aware splitting; all other text uses `TextSplitter`.
//!
//! Each chunk is tagged with the nearest preceding markdown heading so
//! answers can cite the handbook section they came from.

use text_splitter::{ChunkConfig, MarkdownSplitter, TextSplitter};
use uuid::Uuid;

use docent_types::config::ChunkingConfig;
use docent_types::corpus::{CorpusDocument, Passage};
use docent_types::error::CorpusError;

/// Split a document into overlapping passages.
pub fn chunk_document(
    document: &CorpusDocument,
    config: &ChunkingConfig,
) -> Result<Vec<Passage>, CorpusError> {
    let chunks = split_with_offsets(document, config)?;
    let headings = if document.is_markdown {
        heading_offsets(&document.content)
    } else {
        Vec::new()
    };

    Ok(chunks
        .into_iter()
        .enumerate()
        .map(|(i, (offset, text))| Passage {
            id: Uuid::now_v7(),
            source: document.source.clone(),
            section: section_for_offset(&headings, offset),
            chunk_index: i as u32,
            text,
        })
        .collect())
}

/// Run the appropriate splitter, returning `(byte_offset, chunk)` pairs.
fn split_with_offsets(
    document: &CorpusDocument,
    config: &ChunkingConfig,
) -> Result<Vec<(usize, String)>, CorpusError> {
    let chunk_config = ChunkConfig::new(config.chunk_size)
        .with_overlap(config.chunk_overlap)
        .map_err(|e| CorpusError::InvalidChunking(e.to_string()))?;

    let pairs: Vec<(usize, String)> = if document.is_markdown {
        MarkdownSplitter::new(chunk_config)
            .chunk_indices(&document.content)
            .map(|(offset, chunk)| (offset, chunk.to_string()))
            .collect()
    } else {
        TextSplitter::new(chunk_config)
            .chunk_indices(&document.content)
            .map(|(offset, chunk)| (offset, chunk.to_string()))
            .collect()
    };

    Ok(pairs)
}

/// Byte offsets of markdown headings paired with their heading text.
fn heading_offsets(content: &str) -> Vec<(usize, String)> {
    let mut headings = Vec::new();
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            let text = trimmed.trim_start_matches('#').trim();
            if !text.is_empty() {
                headings.push((offset, text.to_string()));
            }
        }
        offset += line.len();
    }
    headings
}

/// The heading governing a chunk: the last heading at or before its start.
fn section_for_offset(headings: &[(usize, String)], offset: usize) -> String {
    headings
        .iter()
        .rev()
        .find(|(heading_offset, _)| *heading_offset <= offset)
        .map(|(_, text)| text.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markdown_doc(content: &str) -> CorpusDocument {
        CorpusDocument {
            source: "handbook.md".to_string(),
            content: content.to_string(),
            is_markdown: true,
        }
    }

    fn text_doc(content: &str) -> CorpusDocument {
        CorpusDocument {
            source: "direction.txt".to_string(),
            content: content.to_string(),
            is_markdown: false,
        }
    }

    #[test]
    fn test_chunk_sizes_respect_config() {
        let content = "word ".repeat(400);
        let config = ChunkingConfig::default();
        let passages = chunk_document(&text_doc(&content), &config).unwrap();

        assert!(passages.len() > 1);
        for passage in &passages {
            assert!(
                passage.text.chars().count() <= config.chunk_size,
                "chunk exceeds target size"
            );
        }
    }

    #[test]
    fn test_chunk_indices_are_sequential() {
        let content = "sentence. ".repeat(300);
        let passages = chunk_document(&text_doc(&content), &ChunkingConfig::default()).unwrap();
        for (i, passage) in passages.iter().enumerate() {
            assert_eq!(passage.chunk_index, i as u32);
            assert_eq!(passage.source, "direction.txt");
        }
    }

    #[test]
    fn test_adjacent_chunks_overlap() {
        let content = "alpha bravo charlie delta echo foxtrot golf hotel ".repeat(40);
        let config = ChunkingConfig {
            chunk_size: 200,
            chunk_overlap: 50,
        };
        let passages = chunk_document(&text_doc(&content), &config).unwrap();
        assert!(passages.len() >= 2);

        // The tail of each chunk reappears at the head of the next.
        for pair in passages.windows(2) {
            let prev_tail: String = pair[0]
                .text
                .chars()
                .rev()
                .take(20)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            assert!(
                pair[1].text.contains(prev_tail.trim()),
                "expected overlap between adjacent chunks"
            );
        }
    }

    #[test]
    fn test_markdown_sections_follow_headings() {
        let content = format!(
            "# Introduction\n\n{}\n\n## Time Off\n\n{}\n\n## Expenses\n\n{}\n",
            "intro text. ".repeat(60),
            "pto details. ".repeat(60),
            "expense rules. ".repeat(60),
        );
        // Zero overlap: with overlap, a chunk may begin with the tail of
        // the previous section, shifting its start offset before the
        // heading it mostly covers.
        let config = ChunkingConfig {
            chunk_size: 500,
            chunk_overlap: 0,
        };
        let passages = chunk_document(&markdown_doc(&content), &config).unwrap();

        let intro: Vec<_> = passages
            .iter()
            .filter(|p| p.text.contains("intro text"))
            .collect();
        assert!(!intro.is_empty());
        assert!(intro.iter().all(|p| p.section == "Introduction"));

        let pto: Vec<_> = passages
            .iter()
            .filter(|p| p.text.contains("pto details"))
            .collect();
        assert!(!pto.is_empty());
        assert!(pto.iter().all(|p| p.section == "Time Off"));
    }

    #[test]
    fn test_plain_text_has_no_section() {
        let passages = chunk_document(
            &text_doc(&"no headings here. ".repeat(100)),
            &ChunkingConfig::default(),
        )
        .unwrap();
        assert!(passages.iter().all(|p| p.section.is_empty()));
    }

    #[test]
    fn test_invalid_overlap_is_an_error() {
        let config = ChunkingConfig {
            chunk_size: 100,
            chunk_overlap: 100,
        };
        let err = chunk_document(&text_doc("some text"), &config).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidChunking(_)));
    }

    #[test]
    fn test_short_document_is_single_chunk() {
        let passages =
            chunk_document(&markdown_doc("# Only\n\nA short note."), &ChunkingConfig::default())
                .unwrap();
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].section, "Only");
    }

    #[test]
    fn test_heading_offsets_tracks_nested_levels() {
        let headings = heading_offsets("# Top\ntext\n## Sub\nmore\n### Deep\n");
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].1, "Top");
        assert_eq!(headings[1].1, "Sub");
        assert_eq!(headings[2].1, "Deep");
    }

    #[test]
    fn test_section_for_offset_picks_latest_preceding() {
        let headings = vec![(0, "A".to_string()), (100, "B".to_string())];
        assert_eq!(section_for_offset(&headings, 0), "A");
        assert_eq!(section_for_offset(&headings, 50), "A");
        assert_eq!(section_for_offset(&headings, 100), "B");
        assert_eq!(section_for_offset(&headings, 500), "B");
    }
}
