use crate::io::LoadError;

/// Reasons for the similarity transform estimation to fail.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentError {
    /// Less than three point pairs were given. Holds the number of pairs.
    NotEnoughCorrespondences(usize),
    /// The points are coincident or collinear, so rotation is not determined.
    Degenerate {
        count: usize,
        /// Singular values of the cross-covariance matrix, largest first.
        singular_values: [f64; 3],
    },
    /// Estimated and ground truth point sets have different lengths.
    MismatchedLengths(usize, usize),
}

impl std::fmt::Display for AlignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AlignmentError::NotEnoughCorrespondences(count) => write!(
                f,
                "at least 3 correspondences are required, got {count}"
            ),
            AlignmentError::Degenerate {
                count,
                singular_values,
            } => write!(
                f,
                "degenerate camera configuration ({count} correspondences are collinear or coincident, \
                 covariance singular values: {:.3e}, {:.3e}, {:.3e})",
                singular_values[0], singular_values[1], singular_values[2]
            ),
            AlignmentError::MismatchedLengths(estimated, ground_truth) => write!(
                f,
                "point sets have different lengths: {estimated} estimated vs {ground_truth} ground truth"
            ),
        }
    }
}

impl std::error::Error for AlignmentError {}

/// Main error type for the library.
#[derive(Debug)]
pub enum EvalError {
    /// Invalid run setup: missing output directory, unsupported camera type.
    Configuration(String),
    /// Ground truth or reconstruction files that can't be read.
    Format(String),
    /// The reconstruction can't be aligned to the ground truth.
    Alignment(AlignmentError),
    /// No reconstructed camera matched a ground truth camera.
    EmptyResult(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EvalError::Configuration(err) => write!(f, "Configuration error: {err}"),
            EvalError::Format(err) => write!(f, "Format error: {err}"),
            EvalError::Alignment(err) => write!(f, "Alignment error: {err}"),
            EvalError::EmptyResult(err) => write!(f, "Empty result: {err}"),
        }
    }
}

impl EvalError {
    /// Create a error with the kind `Configuration`.
    /// # Arguments
    /// * `msg` - The error message.
    pub fn configuration<T: ToString>(msg: T) -> Self {
        EvalError::Configuration(msg.to_string())
    }

    /// Create a error with the kind `Format`.
    pub fn format<T: ToString>(msg: T) -> Self {
        EvalError::Format(msg.to_string())
    }

    /// Create a error with the kind `EmptyResult`.
    pub fn empty_result<T: ToString>(msg: T) -> Self {
        EvalError::EmptyResult(msg.to_string())
    }
}

impl From<AlignmentError> for EvalError {
    fn from(err: AlignmentError) -> Self {
        EvalError::Alignment(err)
    }
}

impl From<LoadError> for EvalError {
    fn from(err: LoadError) -> Self {
        EvalError::Format(err.to_string())
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Alignment(err) => Some(err),
            EvalError::Configuration(_) => None,
            EvalError::Format(_) => None,
            EvalError::EmptyResult(_) => None,
        }
    }
}
