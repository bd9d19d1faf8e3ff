use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use eora_core::traits::PageExtractor;
use eora_core::types::RawRecord;
use eora_core::Result;

/// Extraction result for one link.
#[derive(Debug)]
pub struct LinkOutcome {
    pub source: String,
    pub result: Result<String>,
}

/// Runs `extractor` over `links` one at a time, in order.
///
/// A failing link never stops the batch; its error is kept in the outcome.
pub async fn extract_links(extractor: &dyn PageExtractor, links: &[String]) -> Vec<LinkOutcome> {
    let pb = ProgressBar::new(links.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    let mut outcomes = Vec::with_capacity(links.len());
    for link in links {
        pb.set_message(link.clone());
        let result = extractor.extract(link).await;
        outcomes.push(LinkOutcome { source: link.clone(), result });
        pb.inc(1);
    }
    pb.finish_and_clear();
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(pages = links.len(), failed, "extraction finished");
    outcomes
}

/// Converts outcomes into cache records. Failures become records without text.
pub fn into_records(outcomes: Vec<LinkOutcome>) -> Vec<RawRecord> {
    outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(text) => RawRecord::new(Some(text), outcome.source),
            Err(err) => {
                warn!(source = %outcome.source, error = %err, "page extraction failed");
                RawRecord::new(None, outcome.source)
            }
        })
        .collect()
}
