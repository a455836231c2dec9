/// Summary of a set of values, used for generation reports.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Upper median for even counts.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes the summary, or `None` for an empty input.
    ///
    /// ```
    /// # use gridpath_training::stats::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let median = values[values.len() / 2];
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
