use axum::{extract::State, response::Html};
use serde_json::json;

use crate::{
    signup_form::{Position, SUBSCRIBE_PATH},
    web::WebResult,
    AppState,
};

pub const PRODUCT_NAME: &str = "Pongwait";

/// The landing page with the waitlist form.
#[tracing::instrument(name = "home", skip_all)]
pub async fn home(State(app_state): State<AppState>) -> WebResult<Html<String>> {
    let positions: Vec<_> = Position::ALL
        .iter()
        .map(|p| json!({ "value": p.as_ref(), "label": p.label() }))
        .collect();

    let mut ctx = tera::Context::new();
    ctx.insert("product_name", PRODUCT_NAME);
    ctx.insert("positions", &positions);
    ctx.insert("subscribe_path", SUBSCRIBE_PATH);

    let body = app_state
        .templ_mgr
        .render_html_to_string(&ctx, "home.html")?;

    Ok(Html(body))
}
