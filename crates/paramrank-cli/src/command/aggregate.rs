use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Context;
use paramrank::{AggregateOptions, record::ScoreSource};

use crate::{report, util::Output};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ReportFormat {
    /// Four lines: threshold, average, top scores, top indices
    #[default]
    Text,
    /// The full report as pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AggregateArg {
    /// Path prefix of the result files; file `i` is read from `<BASE_PATH><i>.json`
    base_path: String,

    /// Number of result files to read
    num_files: usize,

    /// Number of top scores to keep
    #[arg(default_value = "1")]
    num_score: NonZeroUsize,

    /// Read the score from trial `N` of the `scores` array instead of `nodeVals.maxScore`
    #[arg(long, value_name = "N")]
    score_trial: Option<usize>,

    /// Field of the trial entry that holds the score
    #[arg(long, value_name = "FIELD", default_value = "distance")]
    score_field: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Append statistics over the unique scores (text format only)
    #[arg(long)]
    summary: bool,

    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl AggregateArg {
    fn score_source(&self) -> ScoreSource {
        match self.score_trial {
            Some(trial) => ScoreSource::TrialScore {
                trial,
                field: self.score_field.clone(),
            },
            None => ScoreSource::NodeMaxScore,
        }
    }

    fn options(&self) -> AggregateOptions {
        AggregateOptions {
            top_n: self.num_score,
            source: self.score_source(),
        }
    }
}

pub(crate) fn run(arg: &AggregateArg) -> anyhow::Result<()> {
    let options = arg.options();
    tracing::info!(
        base_path = %arg.base_path,
        num_files = arg.num_files,
        top_n = options.top_n.get(),
        source = ?options.source,
        "reading result files"
    );

    let report = paramrank::aggregate(&arg.base_path, arg.num_files, &options).with_context(|| {
        format!(
            "Failed to aggregate {} result files with prefix '{}'",
            arg.num_files, arg.base_path
        )
    })?;

    let mut output = Output::from_output_path(arg.output.clone())?;
    match arg.format {
        ReportFormat::Text => output.write_text(&report::render_text(&report, arg.summary))?,
        ReportFormat::Json => output.write_json(&report)?,
    }
    if let Output::File { path, .. } = &output {
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        arg: AggregateArg,
    }

    fn parse(args: &[&str]) -> Result<AggregateArg, clap::Error> {
        TestCli::try_parse_from(std::iter::once("paramrank").chain(args.iter().copied()))
            .map(|cli| cli.arg)
    }

    #[test]
    fn test_num_score_defaults_to_one() {
        let arg = parse(&["runs/trial_", "40"]).unwrap();
        assert_eq!(arg.base_path, "runs/trial_");
        assert_eq!(arg.num_files, 40);
        assert_eq!(arg.num_score.get(), 1);
        assert_eq!(arg.format, ReportFormat::Text);
        assert_eq!(arg.score_source(), ScoreSource::NodeMaxScore);
    }

    #[test]
    fn test_num_score_zero_rejected() {
        assert!(parse(&["runs/trial_", "40", "0"]).is_err());
    }

    #[test]
    fn test_num_files_must_be_integer() {
        assert!(parse(&["runs/trial_", "many"]).is_err());
    }

    #[test]
    fn test_trial_score_source() {
        let arg = parse(&["runs/trial_", "40", "5", "--score-trial", "2"]).unwrap();
        assert_eq!(
            arg.score_source(),
            ScoreSource::TrialScore {
                trial: 2,
                field: "distance".to_owned()
            }
        );

        let arg = parse(&[
            "runs/trial_",
            "40",
            "--score-trial",
            "0",
            "--score-field",
            "energy",
        ])
        .unwrap();
        assert_eq!(
            arg.score_source(),
            ScoreSource::TrialScore {
                trial: 0,
                field: "energy".to_owned()
            }
        );
    }

    #[test]
    fn test_run_writes_text_report() {
        let dir = TempDir::new().unwrap();
        for (i, score) in [5.0, 9.0, 2.0].into_iter().enumerate() {
            let doc = json!({ "nodeVals": { "paramID": i, "maxScore": score } });
            fs::write(dir.path().join(format!("run_{i}.json")), doc.to_string()).unwrap();
        }
        let base = format!("{}/run_", dir.path().display());
        let out = dir.path().join("report.txt");
        let out_str = out.display().to_string();

        let arg = parse(&[base.as_str(), "3", "2", "--output", out_str.as_str()]).unwrap();
        run(&arg).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text, "5.0\n5.333333333333333\n[9.0, 5.0]\n[1, 0]\n");
    }

    #[test]
    fn test_run_writes_json_report() {
        let dir = TempDir::new().unwrap();
        let doc = json!({ "nodeVals": { "paramID": "a", "maxScore": 4 } });
        fs::write(dir.path().join("run_0.json"), doc.to_string()).unwrap();
        let base = format!("{}/run_", dir.path().display());
        let out = dir.path().join("report.json");
        let out_str = out.display().to_string();

        let arg = parse(&[
            base.as_str(),
            "1",
            "--format",
            "json",
            "--output",
            out_str.as_str(),
        ])
        .unwrap();
        run(&arg).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["max_score"], json!(0.0));
        assert_eq!(value["average_score"], json!(4.0));
        assert_eq!(value["top_scores"], json!([4.0]));
        assert_eq!(value["top_indices"], json!([0]));
        assert_eq!(value["summary"]["count"], json!(1));
    }

    #[test]
    fn test_run_zero_files_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let base = format!("{}/run_", dir.path().display());
        let out = dir.path().join("report.txt");
        let out_str = out.display().to_string();

        let arg = parse(&[base.as_str(), "0", "--output", out_str.as_str()]).unwrap();
        let err = run(&arg).unwrap_err();

        assert!(format!("{err:#}").contains("average score is undefined"));
        assert!(!out.exists());
    }
}
