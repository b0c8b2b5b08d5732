use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::GradedSentence;

#[derive(Debug, Clone, Copy)]
pub struct SelectorParams {
    pub count: usize,        // how many sentences to pick
    pub length_penalty: f64, // exponent on sentence length, e.g. 3.0
}

/// A pool sentence with its last-computed score. `matched` is fixed at init;
/// `score` goes stale as the value map decays and is recomputed lazily.
struct Candidate<'a> {
    score: f64,
    index: usize,            // position in the candidate pool
    matched: Vec<&'a str>,   // vocabulary terms occurring in the sentence
    len: usize,              // sentence length in chars
}

/// Ascending by score; among equal scores the lower pool index ranks higher,
/// so the back of a sorted vec is always the max-score, lowest-index
/// candidate. This is the deterministic tie-break.
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    a.score
        .partial_cmp(&b.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.index.cmp(&a.index))
}

fn score(matched: &[&str], len: usize, values: &BTreeMap<&str, f64>, length_penalty: f64) -> f64 {
    if matched.is_empty() {
        return 0.0;
    }
    let raw: f64 = matched.iter().map(|t| values.get(t).copied().unwrap_or(0.0)).sum();
    raw / (len as f64).powf(length_penalty)
}

fn decay<'a>(values: &mut BTreeMap<&'a str, f64>, matched: &[&'a str]) {
    for term in matched {
        if let Some(v) = values.get_mut(term) {
            *v /= 2.0;
        }
    }
}

/// Lazy greedy selection: repeatedly accept the candidate with the highest
/// coverage-per-length score under the current vocabulary value map, halving
/// the value of every term an accepted sentence covers.
///
/// Only the current maximum is ever rescored. A term's decayed value never
/// grows back, so a candidate whose recomputed score still equals its stored
/// one is provably up to date and is a true greedy maximum; otherwise it is
/// reinserted at its new position and the scan continues.
///
/// Returns positions into `candidates`, in selection order. The result is
/// shorter than `params.count` when the pool runs out of positive-score
/// candidates; that is not an error.
pub fn select(
    candidates: &[GradedSentence],
    vocabulary: &[String],
    params: SelectorParams,
) -> Vec<usize> {
    // Fresh value map per run, every term at full value.
    let mut values: BTreeMap<&str, f64> = vocabulary
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .unique()
        .map(|t| (t, 1.0))
        .collect();
    let terms: Vec<&str> = values.keys().copied().collect();

    let mut working: Vec<Candidate> = candidates
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let matched: Vec<&str> = terms
                .iter()
                .copied()
                .filter(|t| sentence.japanese.contains(t))
                .collect();
            let len = sentence.japanese.chars().count();
            let score = score(&matched, len, &values, params.length_penalty);
            Candidate { score, index, matched, len }
        })
        .collect();
    working.sort_by(rank);

    let mut selected = Vec::new();
    let mut rescored = 0usize;
    while selected.len() < params.count {
        let Some(mut top) = working.pop() else { break };
        let fresh = score(&top.matched, top.len, &values, params.length_penalty);
        if fresh == 0.0 {
            // The maximum scores zero, so everything left does too.
            break;
        }
        if fresh != top.score {
            // Stale: overlapping terms decayed since this was last scored.
            // Reinsert at the new position and keep scanning.
            top.score = fresh;
            let pos = working.partition_point(|c| rank(c, &top) == Ordering::Less);
            working.insert(pos, top);
            rescored += 1;
            continue;
        }
        decay(&mut values, &top.matched);
        selected.push(top.index);
    }

    debug!(
        "Selection finished - picked={}, requested={}, stale_rescores={}, pool={}",
        selected.len(),
        params.count,
        rescored,
        candidates.len()
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(index: usize, jp: &str) -> GradedSentence {
        GradedSentence {
            index,
            japanese: jp.to_string(),
            english: String::new(),
            level: 1,
        }
    }

    fn vocab(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    fn params(count: usize, length_penalty: f64) -> SelectorParams {
        SelectorParams { count, length_penalty }
    }

    #[test]
    fn decay_halves_only_matched_terms() {
        let mut values: BTreeMap<&str, f64> = [("水", 1.0), ("火", 1.0)].into();
        decay(&mut values, &["水"]);
        decay(&mut values, &["水"]);
        assert_eq!(values["水"], 0.25);
        assert_eq!(values["火"], 1.0);
    }

    #[test]
    fn score_divides_by_length_power() {
        let values: BTreeMap<&str, f64> = [("水", 1.0)].into();
        // two chars, penalty 1 => 1.0 / 2
        assert_eq!(score(&["水"], 2, &values, 1.0), 0.5);
        assert_eq!(score(&[], 2, &values, 1.0), 0.0);
    }

    #[test]
    fn worked_example_with_tie_break() {
        // vocab 水/火, candidates 水, 火水, 火; no length penalty.
        // Initial scores 1.0 / 2.0 / 1.0. First pick is 火水, which halves
        // both terms; 水 and 火 then tie at 0.5 and the lower pool index wins.
        let pool = vec![sentence(0, "水"), sentence(1, "火水"), sentence(2, "火")];
        let picked = select(&pool, &vocab(&["水", "火"]), params(2, 0.0));
        assert_eq!(picked, vec![1, 0]);
    }

    #[test]
    fn length_penalty_prefers_compact_sentences() {
        // Same single term, but one sentence is padded with kana.
        let pool = vec![sentence(0, "水はあそこにあります。"), sentence(1, "水だ。")];
        let picked = select(&pool, &vocab(&["水"]), params(1, 3.0));
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn never_returns_more_than_count() {
        let pool = vec![sentence(0, "水"), sentence(1, "水だ"), sentence(2, "水です")];
        let picked = select(&pool, &vocab(&["水"]), params(2, 3.0));
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn zero_score_candidates_are_never_selected() {
        // Only one sentence covers anything; count asks for three.
        let pool = vec![sentence(0, "火"), sentence(1, "水"), sentence(2, "土")];
        let picked = select(&pool, &vocab(&["水"]), params(3, 0.0));
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn empty_vocabulary_selects_nothing() {
        let pool = vec![sentence(0, "水")];
        assert!(select(&pool, &[], params(5, 3.0)).is_empty());
        assert!(select(&[], &vocab(&["水"]), params(5, 3.0)).is_empty());
    }

    #[test]
    fn duplicate_vocabulary_terms_count_once() {
        let pool = vec![sentence(0, "水"), sentence(1, "火火火")];
        // 水 listed twice must not double its value (which would beat 火's
        // score at penalty 0 only if duplicated).
        let picked = select(&pool, &vocab(&["水", "水", "火"]), params(1, 1.0));
        // 水: 1.0/1, 火: 1.0/3 -> 水 wins; with a doubled 水 it would win
        // anyway, so check the runner-up ordering too.
        assert_eq!(picked, vec![0]);
        let both = select(&pool, &vocab(&["水", "水", "火"]), params(2, 1.0));
        assert_eq!(both, vec![0, 1]);
    }

    #[test]
    fn runs_are_independent() {
        // Identical back-to-back runs: the value map must not leak across.
        let pool = vec![sentence(0, "水"), sentence(1, "火水"), sentence(2, "火")];
        let v = vocab(&["水", "火"]);
        let first = select(&pool, &v, params(2, 0.0));
        let second = select(&pool, &v, params(2, 0.0));
        assert_eq!(first, second);
    }

    #[test]
    fn accepted_candidate_is_a_true_maximum() {
        // Overlapping coverage forces stale rescores; replay the run's decay
        // by hand and check each accepted pick beats every remaining one.
        let texts = ["水火", "水土", "火土", "水", "土"];
        let pool: Vec<GradedSentence> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| sentence(i, t))
            .collect();
        let v = vocab(&["水", "火", "土"]);
        let picked = select(&pool, &v, params(4, 1.0));
        assert_eq!(picked.len(), 4);

        let mut values: BTreeMap<&str, f64> = [("水", 1.0), ("火", 1.0), ("土", 1.0)].into();
        let mut remaining: Vec<usize> = (0..pool.len()).collect();
        for &pick in &picked {
            let matched_of = |i: usize| -> Vec<&str> {
                values
                    .keys()
                    .copied()
                    .filter(|t| pool[i].japanese.contains(t))
                    .collect()
            };
            let score_of = |i: usize, values: &BTreeMap<&str, f64>| {
                score(&matched_of(i), pool[i].japanese.chars().count(), values, 1.0)
            };
            let pick_score = score_of(pick, &values);
            for &other in &remaining {
                assert!(
                    pick_score >= score_of(other, &values),
                    "pick {pick} not maximal against {other}"
                );
            }
            let matched = matched_of(pick);
            decay(&mut values, &matched);
            remaining.retain(|&i| i != pick);
        }
    }
}
