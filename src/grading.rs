use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

use crate::charset::is_plain;
use crate::models::{GradedSentence, SentencePair, VocabEntry};

/// Per-kanji difficulty table. Built once from the vocabulary, frozen before
/// grading starts.
pub struct KanjiGrades {
    grades: BTreeMap<char, u32>,
}

impl KanjiGrades {
    /// Every non-plain character of every headword contributes its entry's
    /// grade; duplicates keep the minimum (easiest) grade, regardless of entry
    /// order. A kanji appearing in an easy word is not penalized for also
    /// appearing in a harder one.
    pub fn build(entries: &[VocabEntry]) -> Self {
        let mut grades: BTreeMap<char, u32> = BTreeMap::new();
        for entry in entries {
            if entry.grade == 0 {
                continue;
            }
            for c in entry.headword.chars().filter(|&c| !is_plain(c)) {
                grades
                    .entry(c)
                    .and_modify(|g| *g = (*g).min(entry.grade))
                    .or_insert(entry.grade);
            }
        }
        Self { grades }
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Minimum grade among the sentence's tracked kanji; 0 when none of its
    /// characters is in the table. Untracked kanji contribute nothing, so a
    /// single out-of-table character never drags a sentence's grade down.
    pub fn grade(&self, sentence: &str) -> u32 {
        sentence
            .chars()
            .filter(|&c| !is_plain(c))
            .filter_map(|c| self.grades.get(&c).copied())
            .min()
            .unwrap_or(0)
    }

    /// Grade the whole corpus, dropping ungraded (level 0) sentences. Grading
    /// is pure per sentence, so the pass runs in parallel; indices still refer
    /// to positions in the input corpus.
    pub fn grade_pool(&self, pairs: &[SentencePair]) -> Vec<GradedSentence> {
        let graded: Vec<GradedSentence> = pairs
            .par_iter()
            .enumerate()
            .filter_map(|(index, pair)| {
                let level = self.grade(&pair.japanese);
                if level == 0 {
                    return None;
                }
                Some(GradedSentence {
                    index,
                    japanese: pair.japanese.clone(),
                    english: pair.english.clone(),
                    level,
                })
            })
            .collect();
        debug!(
            "Corpus graded - input={}, graded={}, dropped={}",
            pairs.len(),
            graded.len(),
            pairs.len() - graded.len()
        );
        graded
    }
}
