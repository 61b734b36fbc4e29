use std::fmt;
use std::io;

#[derive(Debug)]
pub enum QuadtreeError {
    /// `finalize`/`dump` or `load` hit a filesystem error.
    Io(io::Error),
    /// A region was given with `ne` not strictly greater than `sw` on
    /// some axis.
    InvalidRegion,
    /// `bucket_size` was zero.
    InvalidBucketSize,
}

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadtreeError::Io(e) => write!(f, "quadtree I/O error: {e}"),
            QuadtreeError::InvalidRegion => {
                write!(f, "region is degenerate: ne must be strictly greater than sw on both axes")
            }
            QuadtreeError::InvalidBucketSize => write!(f, "bucket_size must be at least 1"),
        }
    }
}

impl std::error::Error for QuadtreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuadtreeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for QuadtreeError {
    fn from(e: io::Error) -> Self {
        QuadtreeError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, QuadtreeError>;
