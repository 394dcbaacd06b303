//! Most of the structs in `web` module and their implementations live here.
//! Includes structs that need to be validated, their parsing implementations and tests for those

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::sheets::WaitlistRow;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable Signup
/// A signup as it arrives on the wire. Every field may be missing or `null`.
#[derive(Debug, Default, Deserialize)]
pub struct DeserSignup {
    pub email: Option<String>,
    pub position: Option<String>,
    pub feedback: Option<String>,
}

/// Validated Signup
/// `position` is not checked against the form's choices, any string is accepted.
#[derive(Debug, Clone)]
pub struct ValidSignup {
    pub email: ValidEmail,
    pub position: String,
    pub feedback: String,
}

impl TryFrom<DeserSignup> for ValidSignup {
    type Error = DataParsingError;

    fn try_from(deser_signup: DeserSignup) -> Result<Self, Self::Error> {
        Ok(ValidSignup {
            email: ValidEmail::parse(deser_signup.email.unwrap_or_default())?,
            position: deser_signup.position.unwrap_or_default(),
            feedback: deser_signup.feedback.unwrap_or_default(),
        })
    }
}

impl ValidSignup {
    /// Builds the sheet row, stamping it with `submitted_at` (ISO-8601, UTC, millis).
    pub fn into_row(self, submitted_at: DateTime<Utc>) -> WaitlistRow {
        WaitlistRow {
            email: self.email.0,
            position: self.position,
            feedback: self.feedback,
            submitted_at: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Validated Signup Email
/// Only guaranteed to be non-empty, the format is checked by the form.
#[derive(Debug, Clone)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: Into<String>,
    {
        let value = value.into();
        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        Ok(ValidEmail(value))
    }
}

/// The body of every `/subscribe` response, and the only thing a caller ever gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        MessageBody {
            message: message.into(),
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email is missing or empty")]
    EmailMissing,
}
