use std::path::PathBuf;

use thiserror::Error;

use crate::host::HostError;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed UVTT document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid UVTT document: {field}: {reason}")]
    InvalidDocument { field: String, reason: String },
    #[error("grid DPI must be a finite positive number, got {0}")]
    InvalidDpi(f64),
    #[error("unsupported file extension {0:?}, expected .uvtt, .dd2vtt or .df2vtt")]
    UnsupportedExtension(String),
    #[error("No map image found in UVTT file")]
    MissingImage,
    #[error("map image is not valid base64: {0}")]
    ImageDecode(#[from] base64::DecodeError),
    #[error("unsupported map image: {0}")]
    UnsupportedImage(#[from] image::ImageError),
    #[error("Scene is not ready. Please wait until the scene is fully loaded.")]
    SceneNotReady,
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("failed to render preview: {0}")]
    Preview(#[source] std::io::Error),
}

impl ImportError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ImportError::InvalidDocument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code used by the command line front end
    pub fn exit_code(&self) -> i32 {
        match self {
            ImportError::Read { .. } | ImportError::UnsupportedExtension(_) => 2,
            ImportError::Parse(_)
            | ImportError::InvalidDocument { .. }
            | ImportError::MissingImage
            | ImportError::ImageDecode(_)
            | ImportError::UnsupportedImage(_) => 3,
            ImportError::InvalidDpi(_)
            | ImportError::SceneNotReady
            | ImportError::Host(_)
            | ImportError::Preview(_) => 4,
        }
    }
}
