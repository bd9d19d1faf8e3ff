use tempfile::TempDir;

use eora_core::cache::{load_records, save_records};
use eora_core::chunker::Chunker;
use eora_core::types::{Metadata, RawRecord};

#[test]
fn cache_round_trip_preserves_order_and_content() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("data.json");
    let records = vec![
        RawRecord::new(Some("### Проект: Lamoda\n- поиск одежды".to_string()), "https://eora.ru/cases/lamoda"),
        RawRecord::new(None, "https://eora.ru/cases/broken"),
        RawRecord::new(Some("plain text".to_string()), "https://eora.ru/cases/plain"),
    ];

    save_records(&path, &records).expect("save");
    let loaded = load_records(&path).expect("load");

    assert_eq!(loaded, records);
}

#[test]
fn n_headings_produce_n_chunks() {
    let chunker = Chunker::new();
    for n in 1..=6 {
        let doc: String = (0..n).map(|i| format!("### Раздел {i}\n- пункт {i}\n\n")).collect();
        let chunks = chunker.split(&doc, &Metadata::new());
        assert_eq!(chunks.len(), n, "document with {n} headings");
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.header(), Some(format!("Раздел {i}").as_str()));
        }
    }
    assert_eq!(chunker.split("no headings here", &Metadata::new()).len(), 1);
}

#[test]
fn chunks_follow_record_order() {
    let records = vec![
        RawRecord::new(Some("### A1\nx\n### A2\ny".to_string()), "https://a"),
        RawRecord::new(Some("### B1\nz".to_string()), "https://b"),
    ];
    let chunks = Chunker::new().split_records(&records);
    let sources: Vec<_> = chunks.iter().map(|c| c.source().unwrap_or_default()).collect();
    assert_eq!(sources, vec!["https://a", "https://a", "https://b"]);
}
