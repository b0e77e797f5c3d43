use serde::Serialize;

/// Descriptive statistics over a set of scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    /// Number of scores summarized.
    pub count: usize,
    /// The lowest score.
    pub min: f64,
    /// The highest score.
    pub max: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The median; the mean of the two middle values for an even count.
    pub median: f64,
    /// The population variance.
    pub variance: f64,
    /// The population standard deviation.
    pub std_dev: f64,
}

impl ScoreSummary {
    /// Computes the summary from unsorted scores.
    ///
    /// Returns `None` if there are no scores.
    ///
    /// # Examples
    ///
    /// ```
    /// # use paramrank::summary::ScoreSummary;
    /// let summary = ScoreSummary::new([5.0, 9.0, 2.0, 4.0]).unwrap();
    /// assert_eq!(summary.min, 2.0);
    /// assert_eq!(summary.max, 9.0);
    /// assert_eq!(summary.mean, 5.0);
    /// assert_eq!(summary.median, 4.5);
    /// ```
    #[must_use]
    pub fn new<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut scores = scores.into_iter().collect::<Vec<_>>();
        scores.sort_by(f64::total_cmp);
        Self::from_sorted(&scores)
    }

    /// Computes the summary from scores sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_scores: &[f64]) -> Option<Self> {
        debug_assert!(
            sorted_scores.is_sorted_by(|a, b| a.total_cmp(b).is_le()),
            "scores must be sorted in ascending order"
        );

        let min = *sorted_scores.first()?;
        let max = *sorted_scores.last()?;
        let count = sorted_scores.len();
        let n = count as f64;
        let mean = sorted_scores.iter().sum::<f64>() / n;
        let mid = count / 2;
        let median = if count % 2 == 0 {
            f64::midpoint(sorted_scores[mid - 1], sorted_scores[mid])
        } else {
            sorted_scores[mid]
        };
        let variance = sorted_scores
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scores() {
        assert_eq!(ScoreSummary::new(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_single_score() {
        let summary = ScoreSummary::new([3.5]).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.min, 3.5);
        assert_eq!(summary.max, 3.5);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.variance, 0.0);
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_odd_count() {
        let summary = ScoreSummary::new([9.0, 1.0, 5.0]).unwrap();
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.mean, 5.0);
        // ((4^2) + 0 + (4^2)) / 3
        assert!((summary.variance - 32.0 / 3.0).abs() < 1e-12);
        assert!((summary.std_dev - (32.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let summary = ScoreSummary::new([2.0, 8.0, 4.0, 6.0]).unwrap();
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 8.0);
        assert_eq!(summary.median, 5.0);
    }
}
