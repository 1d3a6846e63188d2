pub mod alignment;
pub mod camera;
pub mod correspondence;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod statistics;
pub mod transform;

#[cfg(test)]
mod unit_test;

pub use crate::error::{AlignmentError, EvalError};
pub use crate::evaluation::{evaluate, EvalParams, Evaluation};
pub use crate::pipeline::EvalQuality;
