use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Point has {found} coordinates but the table has {expected} dimensions")]
    DimensionMismatch { expected: usize, found: usize },
}
