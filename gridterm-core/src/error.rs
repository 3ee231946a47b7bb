use thiserror::Error;

/// Caller-contract violations rejected by the screen before any mutation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreenError {
    #[error("batch has {positions} positions but {glyphs} glyphs")]
    BatchLengthMismatch { positions: usize, glyphs: usize },
}

pub type ScreenResult<T> = Result<T, ScreenError>;
