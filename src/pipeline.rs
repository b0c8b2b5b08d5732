use anyhow::{Result, bail};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::grading::KanjiGrades;
use crate::models::SelectionRow;
use crate::selector::{SelectorParams, select};
use crate::tables;

pub struct PipelineArgs<'a> {
    pub vocab_path: &'a Path,
    pub sentences_path: &'a Path,
    pub target_vocab_path: Option<&'a Path>,
    pub output_path: &'a Path,
    pub level: u32,
    pub count: usize,
    pub length_penalty: f64,
}

pub fn run(args: &PipelineArgs) -> Result<()> {
    let pipeline_start = std::time::Instant::now();
    info!(
        "Pipeline started - level={}, count={}, length_penalty={}",
        args.level, args.count, args.length_penalty
    );

    // 1) load the vocabulary table and the parallel corpus
    let vocab = tables::load_vocab(args.vocab_path)?;
    let pairs = tables::load_sentence_pairs(args.sentences_path)?;
    if vocab.is_empty() {
        bail!("Vocabulary table {} is empty", args.vocab_path.display());
    }

    // 2) per-kanji grade lookup, easiest grade wins
    let grades = KanjiGrades::build(&vocab);
    if grades.is_empty() {
        bail!(
            "No gradable kanji in {} (all headwords are kana/ASCII?)",
            args.vocab_path.display()
        );
    }
    debug!("Kanji grade lookup built - kanji={}", grades.len());

    // 3) grade the corpus and filter to the target level
    let grade_start = std::time::Instant::now();
    let graded = grades.grade_pool(&pairs);
    let distribution = graded.iter().map(|s| s.level).counts();
    for (level, n) in distribution.iter().sorted() {
        debug!("Grade distribution - level={}, sentences={}", level, n);
    }
    let pool: Vec<_> = graded
        .into_iter()
        .filter(|s| s.level == args.level)
        .collect();
    info!(
        "Grading completed - duration={:.2}s, level_{}_pool={}",
        grade_start.elapsed().as_secs_f32(),
        args.level,
        pool.len()
    );
    if pool.is_empty() {
        bail!(
            "No sentence graded to level {} (corpus={}, graded levels={:?})",
            args.level,
            pairs.len(),
            distribution.keys().sorted().collect::<Vec<_>>()
        );
    }

    // 4) target vocabulary: explicit list, or every headword at the target level
    let target_vocab = match args.target_vocab_path {
        Some(path) => tables::load_target_vocab(path)?,
        None => {
            let terms: Vec<String> = vocab
                .iter()
                .filter(|e| e.grade == args.level)
                .map(|e| e.headword.clone())
                .collect();
            debug!(
                "Target vocabulary defaulted to level-{} headwords - terms={}",
                args.level,
                terms.len()
            );
            terms
        }
    };
    if target_vocab.is_empty() {
        warn!("Target vocabulary is empty - nothing to cover, selection will be empty");
    }

    // 5) greedy selection
    let select_start = std::time::Instant::now();
    let params = SelectorParams {
        count: args.count,
        length_penalty: args.length_penalty,
    };
    let picked = select(&pool, &target_vocab, params);
    info!(
        "Selection completed - duration={:.2}s, picked={}/{}",
        select_start.elapsed().as_secs_f32(),
        picked.len(),
        args.count
    );
    if picked.len() < args.count {
        warn!(
            "Pool exhausted before reaching count - picked={}, requested={}",
            picked.len(),
            args.count
        );
    }

    // 5.1) coverage summary over the target vocabulary
    let covered: BTreeSet<&str> = picked
        .iter()
        .flat_map(|&i| {
            let sentence = &pool[i];
            target_vocab
                .iter()
                .filter(move |t| sentence.japanese.contains(t.as_str()))
                .map(String::as_str)
        })
        .collect();
    let distinct_targets = target_vocab.iter().unique().count();
    info!(
        "Coverage - terms_covered={}/{}",
        covered.len(),
        distinct_targets
    );

    // 6) write the selection, in selection order, with original corpus indices
    let rows: Vec<SelectionRow> = picked
        .iter()
        .map(|&i| SelectionRow {
            index: pool[i].index,
            japanese: pool[i].japanese.clone(),
            english: pool[i].english.clone(),
        })
        .collect();
    tables::write_selection(args.output_path, &rows)?;

    info!(
        "Pipeline completed successfully - total_duration={:.2}s, rows={}",
        pipeline_start.elapsed().as_secs_f32(),
        rows.len()
    );
    Ok(())
}
