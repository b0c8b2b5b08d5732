use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

use crate::models::{SelectionRow, SentencePair, VocabEntry};

fn nfc(s: &str) -> String {
    s.nfc().collect()
}

fn tsv_reader(path: &Path) -> Result<csv::Reader<fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false) // corpus text may contain bare quotes
        .flexible(false)
        .from_path(path)
        .with_context(|| format!("Opening {}", path.display()))
}

/// Vocabulary table: tab-separated `kanji  hiragana  english  grade`, no
/// header. Text columns are NFC-normalized on load so lookup and substring
/// matching see one canonical form.
pub fn load_vocab(path: &Path) -> Result<Vec<VocabEntry>> {
    let start = std::time::Instant::now();
    let mut entries = Vec::new();
    for (line, record) in tsv_reader(path)?.deserialize().enumerate() {
        let mut entry: VocabEntry = record
            .with_context(|| format!("Parsing {} line {}", path.display(), line + 1))?;
        entry.headword = nfc(&entry.headword);
        entry.reading = nfc(&entry.reading);
        entry.gloss = nfc(&entry.gloss);
        entries.push(entry);
    }
    info!(
        "Vocabulary loaded - path={}, entries={}, duration={:.2}s",
        path.display(),
        entries.len(),
        start.elapsed().as_secs_f32()
    );
    Ok(entries)
}

/// Parallel corpus: tab-separated `japanese  english`, no header, one
/// sentence pair per line.
pub fn load_sentence_pairs(path: &Path) -> Result<Vec<SentencePair>> {
    let start = std::time::Instant::now();
    let mut pairs = Vec::new();
    for (line, record) in tsv_reader(path)?.deserialize().enumerate() {
        let mut pair: SentencePair = record
            .with_context(|| format!("Parsing {} line {}", path.display(), line + 1))?;
        pair.japanese = nfc(&pair.japanese);
        pair.english = nfc(&pair.english);
        pairs.push(pair);
    }
    info!(
        "Sentence pairs loaded - path={}, pairs={}, duration={:.2}s",
        path.display(),
        pairs.len(),
        start.elapsed().as_secs_f32()
    );
    Ok(pairs)
}

/// Target vocabulary: one term per line; blank lines are skipped.
pub fn load_target_vocab(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Reading {}", path.display()))?;
    let terms: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(nfc)
        .collect();
    debug!("Target vocabulary loaded - path={}, terms={}", path.display(), terms.len());
    Ok(terms)
}

/// Write the selection as a headered TSV, one row per picked sentence, in
/// selection order.
pub fn write_selection(path: &Path, rows: &[SelectionRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .with_context(|| format!("Creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().with_context(|| format!("Writing {}", path.display()))?;
    info!("Selection written - path={}, rows={}", path.display(), rows.len());
    Ok(())
}
