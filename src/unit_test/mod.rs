mod cameras;
pub(crate) use cameras::{sample_ground_truth, sample_similarity, synthesize_estimate};
mod reconstructions;
pub(crate) use reconstructions::InMemoryReconstruction;
