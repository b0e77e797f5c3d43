//! Field access on a single parsed result file.
//!
//! Result files are loosely structured: the fields this crate needs may be
//! missing, and everything else in the document is ignored. Lookups therefore
//! return `Option` instead of failing, and only a score that is present but
//! not a number is treated as an error.

use std::io;

use serde::Serialize;
use serde_json::Value;

/// Key of the parameter-set object inside a result file.
const NODE_VALS: &str = "nodeVals";
const PARAM_ID: &str = "paramID";
const MAX_SCORE: &str = "maxScore";
const TRIAL_SCORES: &str = "scores";

/// Where the score of a result file is read from.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScoreSource {
    /// `nodeVals.maxScore`, the best score recorded for the parameter set.
    #[default]
    NodeMaxScore,
    /// `scores[trial].<field>`, a single trial of a Monte-Carlo evaluation run.
    TrialScore { trial: usize, field: String },
}

impl ScoreSource {
    fn lookup<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match self {
            Self::NodeMaxScore => value.get(NODE_VALS)?.get(MAX_SCORE),
            Self::TrialScore { trial, field } => {
                value.get(TRIAL_SCORES)?.get(*trial)?.get(field.as_str())
            }
        }
    }
}

/// A score field that exists but does not hold a number.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("score value {value} is not a number")]
pub struct InvalidScoreError {
    pub value: String,
}

/// Hashable identity of a `paramID` value.
///
/// Numbers compare by numeric value, so `3` and `3.0` name the same
/// parameter set. Arrays and objects compare by their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParamKey {
    #[display("null")]
    Null,
    #[display("{_0}")]
    Bool(bool),
    #[display("{_0}")]
    Integer(i128),
    #[display("{}", f64::from_bits(*_0))]
    Float(u64),
    #[display("{_0:?}")]
    Text(String),
    #[display("{_0}")]
    Composite(String),
}

impl ParamKey {
    /// Builds the key for a JSON value.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    Self::Integer(i128::from(u))
                } else {
                    Self::from_f64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Self::Composite(value.to_string()),
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    fn from_f64(value: f64) -> Self {
        // 2^63: every integral float below this fits an i64 exactly.
        const INTEGRAL_LIMIT: f64 = 9_223_372_036_854_775_808.0;
        if value.fract() == 0.0 && value.abs() < INTEGRAL_LIMIT {
            Self::Integer(i128::from(value as i64))
        } else {
            Self::Float(value.to_bits())
        }
    }
}

/// One parsed result file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    value: Value,
}

impl From<Value> for ResultRecord {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

impl ResultRecord {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Parses a result file from a reader.
    pub fn from_reader<R>(reader: R) -> Result<Self, serde_json::Error>
    where
        R: io::Read,
    {
        serde_json::from_reader(reader).map(Self::new)
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the parameter-set identity, or `None` if `nodeVals.paramID`
    /// is absent.
    #[must_use]
    pub fn param_id(&self) -> Option<ParamKey> {
        self.value
            .get(NODE_VALS)?
            .get(PARAM_ID)
            .map(ParamKey::from_value)
    }

    /// Returns the score selected by `source`, or `None` if the field is
    /// absent.
    ///
    /// Numeric strings such as `"12.5"` are accepted.
    pub fn score(&self, source: &ScoreSource) -> Result<Option<f64>, InvalidScoreError> {
        let Some(value) = source.lookup(&self.value) else {
            return Ok(None);
        };
        let score = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        score.map(Some).ok_or_else(|| InvalidScoreError {
            value: value.to_string(),
        })
    }
}
