use std::fmt;

/// Fatal errors. Generation either succeeds completely or returns one of these.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Page geometry or options that can never produce a layout.
    InvalidConfig(String),
    Json(serde_json::Error),
    /// The drawing backend failed to accept an instruction or finish the file.
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            Error::Json(e) => write!(f, "Invalid JSON input: {e}"),
            Error::Pdf(msg) => write!(f, "PDF generation failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// Recoverable failures while resolving an image. The engine downgrades these
/// to diagnostics and keeps going without the image.
#[derive(Debug)]
pub enum ResourceError {
    Io(std::io::Error),
    Base64(base64::DecodeError),
    Decode(String),
    Unsupported(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Io(e) => write!(f, "could not read image: {e}"),
            ResourceError::Base64(e) => write!(f, "invalid base64 image data: {e}"),
            ResourceError::Decode(msg) => write!(f, "could not decode image: {msg}"),
            ResourceError::Unsupported(what) => write!(f, "unsupported image source: {what}"),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Io(e) => Some(e),
            ResourceError::Base64(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ResourceError {
    fn from(e: std::io::Error) -> Self {
        ResourceError::Io(e)
    }
}

impl From<base64::DecodeError> for ResourceError {
    fn from(e: base64::DecodeError) -> Self {
        ResourceError::Base64(e)
    }
}
