use thiserror::Error;

#[derive(Debug, Error)]
#[error("{self:?}")]
pub enum CodecError {
    EmptyLine,
    InvalidJson(#[from] serde_json::Error),
    InvalidStage(String),
    InvalidTime(i64),
    InvalidUtf8,
    LineTooLong(usize),
}
