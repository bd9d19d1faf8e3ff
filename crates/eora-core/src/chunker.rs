//! Markdown section splitter.
//!
//! Documents produced by the page extractor use `###` headings for every
//! section (Project / Problem / Solution / Technologies / Team). Each section
//! becomes one chunk; the heading line stays at the top of its chunk and its
//! text is recorded under the `Header` metadata key.

use tracing::debug;

use crate::types::{Chunk, Metadata, RawRecord, HEADER_KEY};

/// Heading marker that opens a new chunk. Deeper headings do not split.
const HEADING: &str = "###";

#[derive(Debug, Default, Clone, Copy)]
pub struct Chunker;

impl Chunker {
    pub fn new() -> Self { Self }

    /// Splits every record in order. Records without text contribute no chunks.
    pub fn split_records(&self, records: &[RawRecord]) -> Vec<Chunk> {
        let mut all_chunks = Vec::new();
        for record in records {
            let Some(text) = record.text.as_deref() else {
                debug!(source = %record.source, "record has no text; skipping");
                continue;
            };
            let chunks = self.split(text, &record.metadata());
            debug!(source = %record.source, chunks = chunks.len(), "split record");
            all_chunks.extend(chunks);
        }
        all_chunks
    }

    /// Splits `content` on heading boundaries. Every chunk inherits `parent`.
    ///
    /// A document without headings yields one chunk holding the whole
    /// (trimmed) content; a blank document yields none.
    pub fn split(&self, content: &str, parent: &Metadata) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut section: Vec<&str> = Vec::new();
        let mut header: Option<String> = None;
        let mut fence: Option<&'static str> = None;

        for line in content.lines() {
            let trimmed = line.trim();
            if let Some(marker) = fence {
                if trimmed.starts_with(marker) { fence = None; }
                section.push(line);
                continue;
            }
            if let Some(marker) = fence_marker(trimmed) {
                fence = Some(marker);
                section.push(line);
                continue;
            }
            if let Some(text) = self.heading_text(trimmed) {
                self.flush(&mut chunks, &mut section, header.take(), parent);
                header = Some(text.to_string());
                section.push(trimmed);
                continue;
            }
            section.push(line);
        }
        self.flush(&mut chunks, &mut section, header, parent);
        chunks
    }

    fn heading_text<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.strip_prefix(HEADING)?;
        if rest.is_empty() { return Some(""); }
        if rest.starts_with(' ') || rest.starts_with('\t') { Some(rest.trim()) } else { None }
    }

    fn flush(&self, chunks: &mut Vec<Chunk>, section: &mut Vec<&str>, header: Option<String>, parent: &Metadata) {
        let text = section.join("\n");
        section.clear();
        let text = text.trim();
        if text.is_empty() { return; }
        let mut metadata = parent.clone();
        if let Some(header) = header { metadata.insert(HEADER_KEY.to_string(), header); }
        chunks.push(Chunk::new(text, metadata));
    }
}

fn fence_marker(line: &str) -> Option<&'static str> {
    if line.starts_with("```") { Some("```") } else if line.starts_with("~~~") { Some("~~~") } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SOURCE_KEY;

    fn parent() -> Metadata {
        let mut meta = Metadata::new();
        meta.insert(SOURCE_KEY.to_string(), "https://eora.ru/cases/x".to_string());
        meta
    }

    #[test]
    fn splits_on_each_heading_and_keeps_heading_line() {
        let doc = "### Проект: Lamoda\n- поиск одежды\n\n### Проблема\n- много товаров\n### Технологии\n- *PyTorch*";
        let chunks = Chunker::new().split(doc, &parent());
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, "### Проект: Lamoda\n- поиск одежды");
        assert_eq!(chunks[0].header(), Some("Проект: Lamoda"));
        assert_eq!(chunks[2].header(), Some("Технологии"));
        assert!(chunks[1].content.starts_with("### Проблема"));
        for c in &chunks { assert_eq!(c.source(), Some("https://eora.ru/cases/x")); }
    }

    #[test]
    fn no_headings_yields_whole_document() {
        let doc = "  just a paragraph\nand another line \n";
        let chunks = Chunker::new().split(doc, &parent());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "just a paragraph\nand another line");
        assert!(chunks[0].header().is_none());
    }

    #[test]
    fn preamble_before_first_heading_is_its_own_chunk() {
        let doc = "intro text\n### Решение\n- API";
        let chunks = Chunker::new().split(doc, &parent());
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].header().is_none());
        assert_eq!(chunks[1].header(), Some("Решение"));
    }

    #[test]
    fn deeper_headings_and_fenced_blocks_do_not_split() {
        let doc = "### Решение\n#### Детали\n```\n### not a heading\n```\ntext";
        let chunks = Chunker::new().split(doc, &parent());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.contains("### not a heading"));
    }

    #[test]
    fn blank_document_yields_nothing() {
        assert!(Chunker::new().split("   \n\n", &parent()).is_empty());
    }

    #[test]
    fn records_without_text_are_skipped() {
        let records = vec![
            RawRecord::new(None, "https://a"),
            RawRecord::new(Some("### A\nx".to_string()), "https://b"),
        ];
        let chunks = Chunker::new().split_records(&records);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source(), Some("https://b"));
    }
}
