//! The waitlist form as seen from the browser side: field state, the email
//! check that runs before anything is sent, and the notification shown after.
//!
//! The landing page ships the same logic as inline script, `SignupClient` is the
//! typed version used by the integration tests and by anything that wants to
//! submit signups programmatically.

use lazy_regex::regex_is_match;
use reqwest::Url;
use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::{debug, warn};

use crate::web::types::MessageBody;

/// Where the form posts. `/subscribe` is routed too.
pub const SUBSCRIBE_PATH: &str = "/api/subscribe";

// ###################################
// ->   POSITION
// ###################################
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Position {
    Player,
    Admin,
}

impl Position {
    /// Choices in the order the form lists them.
    pub const ALL: [Position; 2] = [Position::Player, Position::Admin];

    pub fn label(&self) -> &'static str {
        match self {
            Position::Player => "Player",
            Position::Admin => "Admin",
        }
    }
}

impl TryFrom<&str> for Position {
    type Error = SignupFormError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_ref() == value)
            .ok_or_else(|| SignupFormError::UnknownPosition(value.to_string()))
    }
}

// ###################################
// ->   FORM
// ###################################
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub position: Option<Position>,
    pub feedback: String,
}

impl SignupForm {
    pub fn clear(&mut self) {
        *self = SignupForm::default();
    }

    fn payload(&self) -> SignupPayload<'_> {
        SignupPayload {
            email: &self.email,
            position: self.position.as_ref().map_or("", |p| p.as_ref()),
            feedback: &self.feedback,
        }
    }
}

/// JSON body sent to the server. An unselected position goes out as `""`.
#[derive(Debug, Serialize)]
struct SignupPayload<'a> {
    email: &'a str,
    position: &'a str,
    feedback: &'a str,
}

/// Local part is dot-separated atoms or a quoted string, domain is a bracketed
/// IPv4 literal or a hostname ending in a label of at least two letters.
pub fn is_valid_email(email: &str) -> bool {
    regex_is_match!(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
        email
    )
}

// ###################################
// ->   NOTIFICATION
// ###################################
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Variant {
    Success,
    Destructive,
}

/// A transient toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    fn new(title: &str, description: impl Into<String>, variant: Variant) -> Self {
        Notification {
            title: title.to_string(),
            description: description.into(),
            variant,
        }
    }

    pub fn invalid_email() -> Self {
        Self::new(
            "Invalid Email",
            "Please enter a valid email address.",
            Variant::Destructive,
        )
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("Success!", message, Variant::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message, Variant::Destructive)
    }

    pub fn retry() -> Self {
        Self::error("Something went wrong. Please try again.")
    }
}

// ###################################
// ->   CLIENT
// ###################################
#[derive(Debug, Clone)]
pub struct SignupClient {
    http_client: reqwest::Client,
    subscribe_url: Url,
}

impl SignupClient {
    /// `base_url` is the origin serving the landing page, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Result<Self, SignupFormError> {
        let subscribe_url = Url::parse(base_url)
            .and_then(|base| base.join(SUBSCRIBE_PATH))
            .map_err(|er| SignupFormError::UrlParsing(er.to_string()))?;

        Ok(SignupClient {
            http_client: reqwest::Client::new(),
            subscribe_url,
        })
    }

    /// Validates and submits the form, returning the notification to show.
    ///
    /// Fields are only cleared after the server accepted the signup.
    #[tracing::instrument(name = "Submitting the signup form", skip_all)]
    pub async fn submit(&self, form: &mut SignupForm) -> Notification {
        if !is_valid_email(&form.email) {
            return Notification::invalid_email();
        }

        match self.send(form).await {
            Ok((true, body)) => {
                form.clear();
                Notification::success(body.message)
            }
            Ok((false, body)) => Notification::error(body.message),
            Err(er) => {
                warn!("signup submission failed: {er}");
                Notification::retry()
            }
        }
    }

    async fn send(&self, form: &SignupForm) -> Result<(bool, MessageBody), SignupFormError> {
        let res = self
            .http_client
            .post(self.subscribe_url.clone())
            .json(&form.payload())
            .send()
            .await?;
        let is_success = res.status().is_success();
        debug!("subscribe responded with {}", res.status());

        let body = res.json::<MessageBody>().await?;
        Ok((is_success, body))
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum SignupFormError {
    #[error("unknown position: {0}")]
    UnknownPosition(String),
    #[error("invalid base url: {0}")]
    UrlParsing(String),
    #[error("request error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
