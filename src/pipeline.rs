//! The `eval_quality` run: read both trajectories, evaluate and export.

use std::path::PathBuf;

use crate::{
    correspondence::{match_views, GroundTruthIndex},
    error::EvalError,
    evaluation::{evaluate, EvalParams, Evaluation},
    io::{
        ground_truth::AUTO_DETECT, ArtifactSink, DirectorySink, Geometry, GroundTruthFormat,
        ReconstructionSource, SfmData,
    },
    report::{render_report, ReportContext},
};

/// Ground truth camera centers of the matched cameras.
pub const GT_PLY: &str = "camGT.ply";
/// Estimated camera centers of the matched cameras, before alignment.
pub const COMPUTED_PLY: &str = "camComputed.ply";
/// Ground truth (green) and aligned estimated (red) centers.
pub const REGISTERED_PLY: &str = "camRegistered.ply";
pub const REPORT_HTML: &str = "ExternalCalib_Report.html";

const GT_COLOR: [u8; 3] = [0, 255, 0];
const ALIGNED_COLOR: [u8; 3] = [255, 0, 0];

/// Evaluates a reconstruction against a ground truth directory.
#[derive(Clone, Debug)]
pub struct EvalQuality {
    /// Directory with one ground truth camera file per image.
    pub gt_dir: PathBuf,
    /// `sfm_data.json` file, or the directory containing it.
    pub computed: PathBuf,
    /// Where the artifacts are written. Required.
    pub outdir: Option<PathBuf>,
    /// Ground truth format identifier, or [`AUTO_DETECT`].
    pub camtype: i32,
    pub params: EvalParams,
}

impl EvalQuality {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(gt_dir: P, computed: Q) -> Self {
        Self {
            gt_dir: gt_dir.into(),
            computed: computed.into(),
            outdir: None,
            camtype: AUTO_DETECT,
            params: EvalParams::default(),
        }
    }

    pub fn outdir<P: Into<PathBuf>>(mut self, outdir: P) -> Self {
        self.outdir = Some(outdir.into());
        self
    }

    pub fn camtype(mut self, camtype: i32) -> Self {
        self.camtype = camtype;
        self
    }

    pub fn params(mut self, params: EvalParams) -> Self {
        self.params = params;
        self
    }

    /// Runs the evaluation and writes the point clouds and the report.
    ///
    /// Nothing is written into the output directory unless the evaluation
    /// succeeds.
    pub fn run(&self) -> Result<Evaluation, EvalError> {
        let outdir = match &self.outdir {
            Some(outdir) if !outdir.as_os_str().is_empty() => outdir,
            _ => return Err(EvalError::configuration("an output directory is required")),
        };
        let sink = DirectorySink::create(outdir).map_err(|err| {
            EvalError::configuration(format!(
                "can't create the output directory {}: {err}",
                outdir.display()
            ))
        })?;

        if !self.gt_dir.is_dir() {
            return Err(EvalError::format(format!(
                "the ground truth directory {} doesn't exist",
                self.gt_dir.display()
            )));
        }
        let format = GroundTruthFormat::from_camtype(self.camtype, &self.gt_dir)?;
        log::info!("Ground truth format: {format}");

        let ground_truth = format.read_dir(&self.gt_dir).map_err(|err| {
            EvalError::format(format!(
                "can't read the ground truth cameras of {}: {err}",
                self.gt_dir.display()
            ))
        })?;
        if ground_truth.is_empty() {
            return Err(EvalError::format(format!(
                "no {} file in {}",
                format.name(),
                self.gt_dir.display()
            )));
        }
        log::info!(
            "Read {} ground truth cameras from {}",
            ground_truth.len(),
            self.gt_dir.display()
        );

        let reconstruction = SfmData::load(&self.computed).map_err(|err| {
            EvalError::format(format!(
                "can't read the reconstruction {}: {err}",
                self.computed.display()
            ))
        })?;
        log::info!(
            "Reconstruction has {} views and {} poses",
            reconstruction.views().len(),
            reconstruction.num_poses()
        );

        let index = GroundTruthIndex::new(&ground_truth, format.case_insensitive_keys());
        let correspondences = match_views(&index, &reconstruction);
        if correspondences.is_empty() {
            return Err(EvalError::empty_result(format!(
                "none of the {} reconstructed views of {} has a ground truth camera in {}",
                reconstruction.views().len(),
                self.computed.display(),
                self.gt_dir.display()
            )));
        }

        let evaluation = evaluate(&correspondences, &self.params)?;

        let context = ReportContext {
            gt_dir: self.gt_dir.display().to_string(),
            computed: self.computed.display().to_string(),
            gt_format: format.name().to_string(),
            num_ground_truth: ground_truth.len(),
            num_views: reconstruction.views().len(),
            num_poses: reconstruction.num_poses(),
        };
        export_artifacts(&sink, &evaluation, &context)?;

        Ok(evaluation)
    }
}

/// Writes the camera point clouds and the HTML report of an evaluation.
///
/// The report is written last, so it exists only if every point cloud was
/// written. A failed write can leave some of the point clouds behind.
pub fn export_artifacts(
    sink: &dyn ArtifactSink,
    evaluation: &Evaluation,
    context: &ReportContext,
) -> Result<(), EvalError> {
    let ground_truth = Geometry::from_points(&evaluation.ground_truth_centers);
    sink.write_point_cloud(GT_PLY, &ground_truth)?;
    sink.write_point_cloud(
        COMPUTED_PLY,
        &Geometry::from_points(&evaluation.estimated_centers),
    )?;

    let registered = ground_truth
        .with_color(GT_COLOR)
        .stack(&Geometry::from_points(&evaluation.aligned_centers).with_color(ALIGNED_COLOR));
    sink.write_point_cloud(REGISTERED_PLY, &registered)?;

    sink.write_report(REPORT_HTML, &render_report(evaluation, context))?;
    Ok(())
}
