use anyhow::Result;
use chrono::{DateTime, Utc};
use pongwait::web::types::MessageBody;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, header, method, path, query_param},
    Match, Mock, Request, ResponseTemplate,
};

use crate::helpers::{TestApp, APPEND_PATH};

/// Matches an append body holding exactly one row that starts with `expected`
/// and ends in a fresh UTC timestamp with millisecond precision.
struct RowMatcher {
    expected: [&'static str; 3],
}

impl Match for RowMatcher {
    fn matches(&self, request: &Request) -> bool {
        let Ok(body) = request.body_json::<Value>() else {
            return false;
        };
        let Some([row]) = body["values"].as_array().map(Vec::as_slice) else {
            return false;
        };
        let Some(cells) = row.as_array() else {
            return false;
        };
        if cells.len() != 4 {
            return false;
        }

        let leading_ok = self
            .expected
            .iter()
            .zip(cells)
            .all(|(expected, cell)| cell.as_str() == Some(*expected));

        let timestamp_ok = cells[3].as_str().is_some_and(|ts| {
            ts.ends_with('Z')
                && ts.len() == "2024-05-01T12:00:00.000Z".len()
                && DateTime::parse_from_rfc3339(ts).is_ok_and(|ts| {
                    let age = Utc::now() - ts.with_timezone(&Utc);
                    age.num_seconds().abs() < 60
                })
        });

        leading_ok && timestamp_ok
    }
}

async fn message_of(res: reqwest::Response) -> Result<String> {
    Ok(res.json::<MessageBody>().await?.message)
}

#[tokio::test]
async fn subscribe_appends_row_and_returns_success() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mount_token(1).await;
    Mock::given(method("POST"))
        .and(path(APPEND_PATH))
        .and(query_param("valueInputOption", "RAW"))
        .and(header("Authorization", "Bearer test-token"))
        .and(RowMatcher {
            expected: ["a@b.com", "player", "great idea"],
        })
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.sheets_server)
        .await;

    let res = app
        .post_subscribe(&json!({
            "email": "a@b.com",
            "position": "player",
            "feedback": "great idea"
        }))
        .await?;

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!("Success! You're on the waitlist.", message_of(res).await?);
    Ok(())
}

#[tokio::test]
async fn subscribe_is_routed_at_both_paths() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mount_token(2).await;
    Mock::given(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.sheets_server)
        .await;

    for route in ["/subscribe", "/api/subscribe"] {
        let res = app.post_json(route, &json!({ "email": "a@b.com" })).await?;
        assert_eq!(StatusCode::OK, res.status(), "route: {route}");
    }
    Ok(())
}

#[tokio::test]
async fn subscribe_fills_missing_optionals_with_empty_cells() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mount_token(1).await;
    Mock::given(path(APPEND_PATH))
        .and(RowMatcher {
            expected: ["solo@example.com", "", ""],
        })
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.sheets_server)
        .await;

    let res = app
        .post_subscribe(&json!({ "email": "solo@example.com", "feedback": null }))
        .await?;

    assert_eq!(StatusCode::OK, res.status());
    Ok(())
}

#[tokio::test]
async fn subscribe_without_email_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.sheets_server)
        .await;

    let cases = [
        (json!({}), "empty object"),
        (json!({ "email": null, "position": "player" }), "null email"),
        (json!({ "email": "", "position": "player" }), "empty email"),
    ];

    for (body, description) in cases {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "Wrong status for: {description}"
        );
        assert_eq!("Email is required", message_of(res).await?);
    }
    Ok(())
}

#[tokio::test]
async fn subscribe_whitespace_email_is_appended() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mount_token(1).await;
    Mock::given(path(APPEND_PATH))
        .and(RowMatcher {
            expected: ["   ", "", ""],
        })
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.sheets_server)
        .await;

    let res = app.post_subscribe(&json!({ "email": "   " })).await?;

    assert_eq!(StatusCode::OK, res.status());
    Ok(())
}

#[tokio::test]
async fn subscribe_accepts_feedback_past_the_default_body_limit() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mount_token(1).await;
    Mock::given(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.sheets_server)
        .await;
    // axum caps bodies at 2 MB unless told otherwise.
    let feedback = "x".repeat(3 * 1024 * 1024);

    let res = app
        .post_subscribe(&json!({ "email": "a@b.com", "feedback": feedback }))
        .await?;

    assert_eq!(StatusCode::OK, res.status());
    Ok(())
}

#[tokio::test]
async fn subscribe_unreadable_body_is_a_server_error() -> Result<()> {
    let app = TestApp::spawn().await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.sheets_server)
        .await;

    let res = app
        .http_client
        .post(app.url("/api/subscribe"))
        .header("Content-Type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    assert_eq!("Internal Server Error", message_of(res).await?);

    let res = app.post_subscribe(&json!({ "email": 42 })).await?;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    assert_eq!("Internal Server Error", message_of(res).await?);

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_500_when_sheets_fails() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mount_token(1).await;
    Mock::given(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .expect(1)
        .mount(&app.sheets_server)
        .await;

    let res = app.post_subscribe(&json!({ "email": "a@b.com" })).await?;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    assert_eq!("Internal Server Error", message_of(res).await?);
    Ok(())
}

#[tokio::test]
async fn subscribe_returns_500_when_token_is_refused() -> Result<()> {
    let app = TestApp::spawn().await?;
    Mock::given(path("/token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.sheets_server)
        .await;
    Mock::given(path(APPEND_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.sheets_server)
        .await;

    let res = app.post_subscribe(&json!({ "email": "a@b.com" })).await?;

    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, res.status());
    assert_eq!("Internal Server Error", message_of(res).await?);
    Ok(())
}

#[tokio::test]
async fn subscribe_returns_500_without_credentials() -> Result<()> {
    let cases: [(fn(&mut pongwait::config::SheetsConfig), &str); 3] = [
        (|c| c.private_key = None, "private key"),
        (|c| c.client_email = None, "client email"),
        (|c| c.sheet_id = Some(String::new()), "sheet id"),
    ];

    for (adjust, description) in cases {
        let app = TestApp::spawn_with(adjust).await?;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.sheets_server)
            .await;

        let res = app.post_subscribe(&json!({ "email": "a@b.com" })).await?;

        assert_eq!(
            StatusCode::INTERNAL_SERVER_ERROR,
            res.status(),
            "Missing {description} should fail"
        );
        let body = res.text().await?;
        assert_eq!(r#"{"message":"Internal Server Error"}"#, body);
    }
    Ok(())
}

#[tokio::test]
async fn every_response_carries_a_request_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    let ok = app.http_client.get(app.url("/health-check")).send().await?;
    let bad = app.post_subscribe(&json!({})).await?;

    for res in [ok, bad] {
        let id = res
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(uuid::Uuid::parse_str(id).is_ok(), "bad request id: {id:?}");
    }
    Ok(())
}
