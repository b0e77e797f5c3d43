//! Ranking and summary of per-run result files from learning experiments.
//!
//! A learning run writes one JSON result file per evaluated parameter set,
//! named `<base><index>.json`. This crate reads a batch of such files in
//! index order and reports:
//!
//! - the admission threshold of the retained top-N list (`max_score`)
//! - the mean score over files whose `nodeVals.paramID` was seen for the
//!   first time (`average_score`)
//! - the retained top-N scores and the indices of the files they came from
//!
//! Repeated evaluations of the same parameter set are suppressed: only the
//! first file carrying a given `paramID` contributes its score.
//!
//! # Modules
//!
//! - [`record`]: field access on a parsed result file
//! - [`top_list`]: the bounded, rank-ordered list of best scores
//! - [`aggregator`]: the single pass over a batch of result files
//! - [`summary`]: descriptive statistics over the unique scores
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use paramrank::{
//!     aggregator::ResultAggregator,
//!     record::{ResultRecord, ScoreSource},
//! };
//! use serde_json::json;
//!
//! let top_n = NonZeroUsize::new(2).unwrap();
//! let mut aggregator = ResultAggregator::new(top_n, ScoreSource::NodeMaxScore);
//! for (index, (id, score)) in [(1, 5.0), (2, 9.0), (3, 2.0)].into_iter().enumerate() {
//!     let record = ResultRecord::new(json!({ "nodeVals": { "paramID": id, "maxScore": score } }));
//!     aggregator.record(index, &record).unwrap();
//! }
//! let report = aggregator.finish().unwrap();
//! assert_eq!(report.max_score, 5.0);
//! assert_eq!(report.top_scores, [9.0, 5.0]);
//! assert_eq!(report.top_indices, [1, 0]);
//! ```

pub use self::aggregator::{AggregateError, AggregateOptions, AggregateReport, aggregate};

pub mod aggregator;
pub mod record;
pub mod summary;
pub mod top_list;
