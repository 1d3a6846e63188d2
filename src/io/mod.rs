mod error;
pub use error::LoadError;

mod geometry;
pub use geometry::Geometry;

mod ply;
pub use ply::{read_ply, write_ply};

pub mod ground_truth;
pub use ground_truth::GroundTruthFormat;

mod reconstruction;
pub use reconstruction::{ReconstructionSource, View};

mod sfm_data;
pub use sfm_data::{SfmData, SFM_DATA_FILENAME};

mod sink;
pub use sink::{ArtifactSink, DirectorySink};
