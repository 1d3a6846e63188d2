use nalgebra::Vector3;

use crate::{
    alignment::SimilarityEstimator,
    correspondence::Correspondences,
    error::EvalError,
    metrics::{compute_errors, ErrorRecord},
    statistics::{Histogram, SummaryStatistics},
    transform::SimilarityTransform,
};

/// Parameters of an evaluation run.
#[derive(Debug, Clone, Copy)]
pub struct EvalParams {
    /// Number of bins of the residual histograms.
    pub histogram_bins: usize,
    /// See [`SimilarityEstimator::degeneracy_tolerance`].
    pub degeneracy_tolerance: f64,
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            degeneracy_tolerance: SimilarityEstimator::default().degeneracy_tolerance,
        }
    }
}

impl EvalParams {
    pub fn histogram_bins(&'_ mut self, value: usize) -> &'_ mut EvalParams {
        self.histogram_bins = value;
        self
    }

    pub fn degeneracy_tolerance(&'_ mut self, value: f64) -> &'_ mut EvalParams {
        self.degeneracy_tolerance = value;
        self
    }
}

/// Result of comparing a reconstruction with its ground truth.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// Maps the reconstruction frame into the ground truth frame.
    pub transform: SimilarityTransform,
    /// Residuals, in correspondence order.
    pub records: Vec<ErrorRecord>,
    pub position_stats: SummaryStatistics,
    /// Rotation statistics, in degrees.
    pub rotation_stats: SummaryStatistics,
    pub position_histogram: Histogram,
    pub rotation_histogram: Histogram,
    pub ground_truth_centers: Vec<Vector3<f64>>,
    /// Estimated centers before alignment.
    pub estimated_centers: Vec<Vector3<f64>>,
    /// Estimated centers after alignment.
    pub aligned_centers: Vec<Vector3<f64>>,
}

impl Evaluation {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Aligns the estimated cameras to the ground truth and measures the residuals.
///
/// # Arguments
///
/// * `correspondences` - Matched cameras.
/// * `params` - Run parameters.
///
/// # Returns
///
/// [`EvalError::EmptyResult`] if there is no correspondence,
/// [`EvalError::Alignment`] if the cameras can't be aligned.
pub fn evaluate(
    correspondences: &Correspondences,
    params: &EvalParams,
) -> Result<Evaluation, EvalError> {
    if correspondences.is_empty() {
        return Err(EvalError::empty_result(
            "no reconstructed camera matches a ground truth camera",
        ));
    }

    let ground_truth_centers = correspondences.ground_truth_centers();
    let estimated_centers = correspondences.estimated_centers();

    let transform = SimilarityEstimator::default()
        .degeneracy_tolerance(params.degeneracy_tolerance)
        .estimate(&estimated_centers, &ground_truth_centers)?;
    log::info!("Similarity transform: {transform}");

    let records = compute_errors(correspondences, &transform);
    let positions = records.iter().map(|r| r.position).collect::<Vec<_>>();
    let rotations = records.iter().map(|r| r.rotation).collect::<Vec<_>>();

    let position_stats = SummaryStatistics::from_values(&positions)?;
    let rotation_stats = SummaryStatistics::from_values(&rotations)?;
    log::info!("Position residuals: {position_stats}");
    log::info!("Rotation residuals (degrees): {rotation_stats}");

    let aligned_centers = estimated_centers
        .iter()
        .map(|center| transform.transform_point(center))
        .collect();

    Ok(Evaluation {
        position_histogram: Histogram::new(&positions, params.histogram_bins),
        rotation_histogram: Histogram::new(&rotations, params.histogram_bins),
        transform,
        records,
        position_stats,
        rotation_stats,
        ground_truth_centers,
        estimated_centers,
        aligned_centers,
    })
}
