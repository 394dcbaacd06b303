use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{field::Empty, info, Span};

use crate::{
    sheets::SheetsError,
    web::{
        error::ClientError,
        types::{DataParsingError, DeserSignup, MessageBody, ValidSignup},
        WebResult,
    },
    AppState,
};

pub const SUCCESS_MESSAGE: &str = "Success! You're on the waitlist.";

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, strum_macros::AsRefStr, thiserror::Error)]
pub enum SubscribeError {
    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),
    #[error("failed to extract the request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("failed to append the signup to the sheet: {0}")]
    Sheets(#[from] SheetsError),
}

impl SubscribeError {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            SubscribeError::DataParsing(DataParsingError::EmailMissing) => {
                (StatusCode::BAD_REQUEST, ClientError::EmailRequired)
            }
            SubscribeError::InvalidBody(_) | SubscribeError::Sheets(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ClientError::ServiceError)
            }
        }
    }
}

// ###################################
// ->   API
// ###################################
/// Validates the signup and appends it to the waitlist sheet as
/// `[email, position, feedback, submitted_at]`.
///
/// There is no idempotency key: a client retrying after a timeout can end up with two rows.
#[tracing::instrument(
    name = "Adding a signup to the waitlist",
    skip_all,
    fields(signup_email = Empty, signup_position = Empty)
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserSignup>, JsonRejection>,
) -> WebResult<Json<MessageBody>> {
    let Json(signup) = payload.map_err(SubscribeError::InvalidBody)?;
    let signup = ValidSignup::try_from(signup).map_err(SubscribeError::DataParsing)?;
    Span::current()
        .record("signup_email", signup.email.as_ref())
        .record("signup_position", signup.position.as_str());

    let row = signup.into_row(Utc::now());
    app_state
        .sheets_client
        .append_row(&row)
        .await
        .map_err(SubscribeError::Sheets)?;
    info!("SUCCESS");

    Ok(Json(MessageBody::new(SUCCESS_MESSAGE)))
}
