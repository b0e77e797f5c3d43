//! Single pass over a batch of result files.
//!
//! Files are read strictly in index order, one at a time. For each file the
//! aggregator decides a per-file score:
//!
//! - the file's score, if its `paramID` has not been seen before
//! - `0.0` if the `paramID` was already counted (a repeated evaluation)
//! - `0.0` if `paramID` or the score field is missing
//!
//! Every per-file score is added to the running sum, but only first-seen
//! files are counted in the denominator of the average. The per-file score
//! is then offered to the [`TopList`].

use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufReader},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    record::{InvalidScoreError, ParamKey, ResultRecord, ScoreSource},
    summary::ScoreSummary,
    top_list::TopList,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum AggregateError {
    #[display("failed to open result file {}", path.display())]
    FileAccess { path: PathBuf, source: io::Error },
    #[display("failed to parse result file {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("invalid score in result file {}", path.display())]
    InvalidScore {
        path: PathBuf,
        source: InvalidScoreError,
    },
    #[display(
        "no result file with a unique paramID among {files_processed} files; average score is undefined"
    )]
    NoUniqueFiles { files_processed: usize },
}

/// How a single result file contributed to the pass.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum FileOutcome {
    /// First file seen with this `paramID`.
    Unique { key: ParamKey, score: f64 },
    /// A later file repeating an already counted `paramID`.
    Duplicate { key: ParamKey },
    /// `paramID` or the score field is absent.
    MissingField,
}

impl FileOutcome {
    /// Score this file adds to the running sum.
    #[must_use]
    pub fn score(&self) -> f64 {
        match self {
            Self::Unique { score, .. } => *score,
            Self::Duplicate { .. } | Self::MissingField => 0.0,
        }
    }
}

/// Final outputs of a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    /// Admission threshold of the top list after the pass.
    ///
    /// This is the lowest retained score once the list has overflowed, and
    /// `0.0` before that; it is not the maximum over all scores.
    pub max_score: f64,
    /// `score_sum / unique_count`.
    pub average_score: f64,
    /// Retained scores, highest first.
    pub top_scores: Vec<f64>,
    /// Indices of the files the retained scores came from.
    pub top_indices: Vec<usize>,
    pub score_sum: f64,
    pub files_processed: usize,
    pub unique_count: usize,
    pub duplicate_count: usize,
    pub missing_count: usize,
    /// Statistics over the scores of first-seen files.
    pub summary: Option<ScoreSummary>,
}

/// Accumulator state for one pass.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    source: ScoreSource,
    seen: HashSet<ParamKey>,
    score_sum: f64,
    files_processed: usize,
    duplicate_count: usize,
    missing_count: usize,
    unique_scores: Vec<f64>,
    top: TopList,
}

impl ResultAggregator {
    #[must_use]
    pub fn new(top_n: NonZeroUsize, source: ScoreSource) -> Self {
        Self {
            source,
            seen: HashSet::new(),
            score_sum: 0.0,
            files_processed: 0,
            duplicate_count: 0,
            missing_count: 0,
            unique_scores: vec![],
            top: TopList::new(top_n),
        }
    }

    #[must_use]
    pub fn top_list(&self) -> &TopList {
        &self.top
    }

    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.unique_scores.len()
    }

    /// Folds the result file at `index` into the pass.
    ///
    /// Files must be recorded in ascending index order; ties in the top list
    /// are broken by recording order.
    pub fn record(
        &mut self,
        index: usize,
        record: &ResultRecord,
    ) -> Result<FileOutcome, InvalidScoreError> {
        let outcome = self.classify(record)?;
        match &outcome {
            FileOutcome::Unique { key, score } => {
                self.seen.insert(key.clone());
                self.unique_scores.push(*score);
            }
            FileOutcome::Duplicate { .. } => self.duplicate_count += 1,
            FileOutcome::MissingField => self.missing_count += 1,
        }
        self.files_processed += 1;

        let score = outcome.score();
        self.score_sum += score;
        if let Some(rank) = self.top.offer(score, index) {
            tracing::debug!(index, score, rank, "admitted to top list");
        }
        Ok(outcome)
    }

    fn classify(&self, record: &ResultRecord) -> Result<FileOutcome, InvalidScoreError> {
        let Some(key) = record.param_id() else {
            return Ok(FileOutcome::MissingField);
        };
        if self.seen.contains(&key) {
            return Ok(FileOutcome::Duplicate { key });
        }
        Ok(match record.score(&self.source)? {
            Some(score) => FileOutcome::Unique { key, score },
            None => FileOutcome::MissingField,
        })
    }

    /// Finishes the pass and computes the report.
    ///
    /// Fails if no file had a first-seen `paramID`, since the average would
    /// divide by zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn finish(self) -> Result<AggregateReport, AggregateError> {
        let unique_count = self.unique_scores.len();
        if unique_count == 0 {
            return Err(AggregateError::NoUniqueFiles {
                files_processed: self.files_processed,
            });
        }

        Ok(AggregateReport {
            max_score: self.top.threshold(),
            average_score: self.score_sum / unique_count as f64,
            top_scores: self.top.scores().collect(),
            top_indices: self.top.indices().collect(),
            score_sum: self.score_sum,
            files_processed: self.files_processed,
            unique_count,
            duplicate_count: self.duplicate_count,
            missing_count: self.missing_count,
            summary: ScoreSummary::new(self.unique_scores),
        })
    }
}

/// Parameters of [`aggregate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Number of best scores to retain.
    pub top_n: NonZeroUsize,
    pub source: ScoreSource,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            top_n: NonZeroUsize::MIN,
            source: ScoreSource::default(),
        }
    }
}

/// Path of the result file at `index`: the base path with the index and
/// `.json` appended.
///
/// The base path is a plain prefix, not a directory, so `runs/trial_` and
/// `3` give `runs/trial_3.json`.
#[must_use]
pub fn result_path(base_path: &str, index: usize) -> PathBuf {
    PathBuf::from(format!("{base_path}{index}.json"))
}

/// Reads and parses one result file.
pub fn read_result_file(path: &Path) -> Result<ResultRecord, AggregateError> {
    let file = File::open(path).map_err(|source| AggregateError::FileAccess {
        path: path.to_owned(),
        source,
    })?;
    ResultRecord::from_reader(BufReader::new(file)).map_err(|source| AggregateError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Reads result files `0..file_count` under `base_path` and aggregates them.
///
/// The first unreadable or unparsable file aborts the whole pass.
pub fn aggregate(
    base_path: &str,
    file_count: usize,
    options: &AggregateOptions,
) -> Result<AggregateReport, AggregateError> {
    let mut aggregator = ResultAggregator::new(options.top_n, options.source.clone());
    for index in 0..file_count {
        let path = result_path(base_path, index);
        let record = read_result_file(&path)?;
        let outcome = aggregator
            .record(index, &record)
            .map_err(|source| AggregateError::InvalidScore {
                path: path.clone(),
                source,
            })?;
        match &outcome {
            FileOutcome::Unique { key, score } => {
                tracing::trace!(index, %key, score, "unique result");
            }
            FileOutcome::Duplicate { key } => {
                tracing::debug!(index, %key, "repeated paramID; score ignored");
            }
            FileOutcome::MissingField => {
                tracing::debug!(
                    index,
                    path = %path.display(),
                    "paramID or score missing; counted as 0"
                );
            }
        }
    }
    tracing::info!(
        files = aggregator.files_processed,
        unique = aggregator.unique_count(),
        duplicates = aggregator.duplicate_count,
        missing = aggregator.missing_count,
        "finished reading result files"
    );
    aggregator.finish()
}
