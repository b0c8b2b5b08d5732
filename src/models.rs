use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabEntry {
    pub headword: String, // kanji form, may span several characters
    pub reading: String,  // hiragana
    pub gloss: String,    // English
    pub grade: u32,       // JLPT level, lower = easier
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentencePair {
    pub japanese: String,
    pub english: String,
}

/// One row of the parallel corpus with its position in the source file and its
/// derived level (0 = no tracked kanji, excluded downstream). Immutable once
/// graded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedSentence {
    pub index: usize,
    pub japanese: String,
    pub english: String,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRow {
    pub index: usize, // original corpus index
    pub japanese: String,
    pub english: String,
}
