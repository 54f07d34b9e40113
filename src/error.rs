use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode joint array {path}: {source}")]
    Npy {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    #[error("failed to unpickle {path}: {source}")]
    Pickle {
        path: PathBuf,
        #[source]
        source: serde_pickle::Error,
    },

    #[error("unsupported joint array shape {0:?} (expected (N, 21, 4, 1), (N, 21, 4) or (N, 21, 3))")]
    JointShape(Vec<usize>),

    #[error("extrinsics of camera {0} are not invertible")]
    SingularExtrinsics(String),

    #[error("view index {index} out of range ({count} views)")]
    ViewOutOfRange { index: usize, count: usize },

    #[error("frame index {index} out of range ({count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
