use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    utils::ErrorChain,
    web::{log, types::MessageBody, Error, REQUEST_ID_HEADER},
};

/// Turns an `Error` left in the response extensions into the `{"message": ..}` body
/// the caller sees, and writes one log line per request.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id = req_headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    if let Some(er) = web_error.filter(|er| er.is_server_error()) {
        tracing::error!("SERVER ERROR: {}", ErrorChain(er));
    }
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        (*status, Json(MessageBody::new(cl_err.to_string()))).into_response()
    });

    log::log_request(
        req_id,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error.as_ref(),
    );

    err_resp.unwrap_or(resp)
}
