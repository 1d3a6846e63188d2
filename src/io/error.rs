use std::{io, path::PathBuf};

#[derive(Debug)]
pub enum LoadError {
    IO(io::Error),
    /// Failed to open or create the given file.
    File(PathBuf, io::Error),
    ParseError(String),
    Json(serde_json::Error),
}

impl LoadError {
    pub fn file<P: Into<PathBuf>>(path: P, err: io::Error) -> Self {
        LoadError::File(path.into(), err)
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::IO(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(err)
    }
}

impl From<glob::PatternError> for LoadError {
    fn from(err: glob::PatternError) -> Self {
        LoadError::ParseError(err.to_string())
    }
}

impl From<glob::GlobError> for LoadError {
    fn from(err: glob::GlobError) -> Self {
        let path = err.path().to_path_buf();
        LoadError::File(path, err.into_error())
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LoadError::IO(err) => write!(f, "IO error: {err}"),
            LoadError::File(path, err) => write!(f, "{}: {err}", path.display()),
            LoadError::ParseError(err) => write!(f, "Parser error: {err}"),
            LoadError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::IO(err) => Some(err),
            LoadError::File(_, err) => Some(err),
            LoadError::ParseError(_) => None,
            LoadError::Json(err) => Some(err),
        }
    }
}
