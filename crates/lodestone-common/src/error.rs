use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum LodestoneError {
    IoError(std::io::Error),
    /// A column fragment could not be decoded. The column at `(x, z)` was left untouched.
    MalformedColumn {
        x: i32,
        z: i32,
        reason: String,
    },
    /// A bulk column batch declared a different payload size than it carried.
    IntegrityMismatch {
        declared: usize,
        actual: usize,
    },
    NbtError(String),
    InvalidSignText(String),
    ConfigError(String),
}

impl fmt::Display for LodestoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LodestoneError::IoError(err) => write!(f, "IO error: {}", err),
            LodestoneError::MalformedColumn { x, z, reason } => {
                write!(f, "Malformed column ({}, {}): {}", x, z, reason)
            }
            LodestoneError::IntegrityMismatch { declared, actual } => write!(
                f,
                "Integrity mismatch: batch declared {} bytes but carried {}",
                declared, actual
            ),
            LodestoneError::NbtError(msg) => write!(f, "NBT error: {}", msg),
            LodestoneError::InvalidSignText(msg) => write!(f, "Invalid sign text: {}", msg),
            LodestoneError::ConfigError(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl Error for LodestoneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LodestoneError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LodestoneError {
    fn from(err: std::io::Error) -> Self {
        LodestoneError::IoError(err)
    }
}
