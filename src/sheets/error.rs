use strum_macros::AsRefStr;

pub type Result<T> = core::result::Result<T, SheetsError>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum SheetsError {
    #[error("service account setting is missing: {0}")]
    MissingSetting(&'static str),
    #[error("failed to parse the service account private key: {0}")]
    InvalidPrivateKey(String),
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("token endpoint response did not contain an access token")]
    MissingAccessToken,
    #[error("google responded with {status}: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("error awaiting a blocking tokio task: {0}")]
    BlockingTask(#[from] tokio::task::JoinError),
}
