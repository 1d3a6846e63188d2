use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sfmeval::{
    evaluation::EvalParams,
    io::ground_truth::AUTO_DETECT,
    pipeline::EvalQuality,
};

/// Compares a reconstruction's camera trajectory with ground truth cameras.
#[derive(Parser)]
#[clap(version, about)]
struct Args {
    /// Directory with the ground truth cameras
    #[clap(short = 'i', long = "gt")]
    gt: PathBuf,
    /// The sfm_data.json of the reconstruction, or its directory
    #[clap(short = 'c', long = "computed")]
    computed: PathBuf,
    /// Output directory of the report and point clouds
    #[clap(short = 'o', long = "outdir")]
    outdir: Option<PathBuf>,
    /// Ground truth camera type: -1 auto-detect, 1 openMVG (bin), 2 Strecha (png),
    /// 3 Strecha (jpg), 4 Strecha (PNG), 5 Strecha (JPG)
    #[clap(short = 't', long = "camtype", default_value_t = AUTO_DETECT, allow_negative_numbers = true)]
    camtype: i32,
    /// Number of bins of the residual histograms
    #[clap(long, default_value_t = 20)]
    bins: usize,
    /// Prints debug messages
    #[clap(long, short, action)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let mut params = EvalParams::default();
    params.histogram_bins(args.bins);

    let mut eval = EvalQuality::new(args.gt, args.computed)
        .camtype(args.camtype)
        .params(params);
    eval.outdir = args.outdir;

    match eval.run() {
        Ok(evaluation) => {
            println!("Cameras: {}", evaluation.len());
            println!("Position residuals: {}", evaluation.position_stats);
            println!("Rotation residuals (degrees): {}", evaluation.rotation_stats);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
