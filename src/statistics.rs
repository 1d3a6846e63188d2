use itertools::Itertools;
use itertools::MinMaxResult;
use ordered_float::OrderedFloat;

use crate::error::EvalError;

/// Summary of a residual distribution.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Central value of the sorted residuals, or the mean of the two central
    /// values for an even count.
    pub median: f64,
    /// Root mean square, `sqrt(mean(v^2))`.
    pub rms: f64,
    pub count: usize,
}

impl SummaryStatistics {
    /// Computes the statistics over all the values.
    ///
    /// # Returns
    ///
    /// [`EvalError::EmptyResult`] if `values` is empty.
    pub fn from_values(values: &[f64]) -> Result<Self, EvalError> {
        let sorted = values
            .iter()
            .copied()
            .map(OrderedFloat)
            .sorted()
            .map(|value| value.0)
            .collect::<Vec<f64>>();

        let (min, max) = match sorted.iter().minmax() {
            MinMaxResult::NoElements => {
                return Err(EvalError::empty_result(
                    "can't compute statistics of an empty residual set",
                ))
            }
            MinMaxResult::OneElement(value) => (*value, *value),
            MinMaxResult::MinMax(min, max) => (*min, *max),
        };

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let rms = (sorted.iter().map(|v| v * v).sum::<f64>() / count as f64).sqrt();
        let median = if count % 2 == 1 {
            sorted[count / 2]
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        };

        Ok(Self {
            min,
            max,
            mean,
            median,
            rms,
            count,
        })
    }
}

impl std::fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "min: {:.6}, max: {:.6}, mean: {:.6}, median: {:.6}, rms: {:.6}",
            self.min, self.max, self.mean, self.median, self.rms
        )
    }
}

/// Equal-width histogram over `[lower, upper]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins the values over `[0, max(values)]`. The last bin is closed, so the
    /// maximum falls into it.
    ///
    /// # Arguments
    ///
    /// * `values` - Non-negative values.
    /// * `bins` - Number of bins, at least one is used.
    pub fn new(values: &[f64], bins: usize) -> Self {
        let upper = values
            .iter()
            .copied()
            .map(OrderedFloat)
            .max()
            .map_or(0.0, |value| value.0)
            .max(0.0);
        Self::with_range(values, bins, 0.0, upper)
    }

    pub fn with_range(values: &[f64], bins: usize, lower: f64, upper: f64) -> Self {
        let bins = bins.max(1);
        let mut counts = vec![0; bins];
        let width = (upper - lower) / bins as f64;

        for value in values.iter().filter(|v| **v >= lower && **v <= upper) {
            let index = if width > 0.0 {
                (((value - lower) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[index] += 1;
        }

        Self {
            lower,
            upper,
            counts,
        }
    }

    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.num_bins() as f64
    }

    /// Lower and upper edges of a bin.
    pub fn bin_range(&self, index: usize) -> (f64, f64) {
        let width = self.bin_width();
        (
            self.lower + width * index as f64,
            self.lower + width * (index + 1) as f64,
        )
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_odd_count() {
        let stats = SummaryStatistics::from_values(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.median, 2.0);
        assert_relative_eq!(stats.rms, (14.0f64 / 3.0).sqrt());
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_even_count_median() {
        let stats = SummaryStatistics::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
    }

    #[test]
    fn test_single_value() {
        let stats = SummaryStatistics::from_values(&[0.5]).unwrap();
        assert_eq!(stats.min, 0.5);
        assert_eq!(stats.max, 0.5);
        assert_eq!(stats.median, 0.5);
        assert_eq!(stats.rms, 0.5);
    }

    #[test]
    fn test_empty_values() {
        assert!(matches!(
            SummaryStatistics::from_values(&[]),
            Err(EvalError::EmptyResult(_))
        ));
    }

    #[test]
    fn test_histogram() {
        let histogram = Histogram::new(&[0.0, 0.1, 0.5, 0.9, 1.0], 4);

        assert_eq!(histogram.lower, 0.0);
        assert_eq!(histogram.upper, 1.0);
        assert_eq!(histogram.counts, vec![2, 0, 1, 2]);
        assert_eq!(histogram.total(), 5);
        assert_eq!(histogram.max_count(), 2);
        assert_eq!(histogram.bin_range(1), (0.25, 0.5));
    }

    #[test]
    fn test_histogram_of_zeros() {
        let histogram = Histogram::new(&[0.0, 0.0, 0.0], 10);
        assert_eq!(histogram.counts[0], 3);
        assert_eq!(histogram.total(), 3);
    }

    #[test]
    fn test_histogram_of_nothing() {
        let histogram = Histogram::new(&[], 0);
        assert_eq!(histogram.num_bins(), 1);
        assert_eq!(histogram.total(), 0);
    }
}
