use crate::sheets;

pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can stop the server from starting or serving.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sheets client error: {0}")]
    Sheets(#[from] sheets::SheetsError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
