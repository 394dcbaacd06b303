use chrono::Utc;
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, field::Empty, Span};

use crate::config::SheetsConfig;

use super::{Result, ServiceAccount, SheetsError};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// One row of the waitlist sheet, in column order A-D.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistRow {
    pub email: String,
    pub position: String,
    pub feedback: String,
    pub submitted_at: String,
}

impl WaitlistRow {
    pub fn cells(&self) -> [&str; 4] {
        [
            &self.email,
            &self.position,
            &self.feedback,
            &self.submitted_at,
        ]
    }
}

/// Talks to the Google Sheets v4 API.
///
/// Holds no authenticated state: every `append_row` call builds the service account from
/// the config, fetches a fresh access token and then appends.
#[derive(Debug)]
pub struct SheetsClient {
    http_client: Client,
    config: SheetsConfig,
    token_url: Url,
    api_base_url: Url,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self> {
        let token_url =
            Url::parse(&config.token_uri).map_err(|e| SheetsError::UrlParsing(e.to_string()))?;
        let api_base_url = Url::parse(&config.api_base_url)
            .map_err(|e| SheetsError::UrlParsing(e.to_string()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(SheetsClient {
            http_client,
            config,
            token_url,
            api_base_url,
        })
    }

    /// Appends `row` after the last row of the configured range.
    #[tracing::instrument(
        name = "Appending a row to the waitlist sheet",
        skip_all,
        fields(client_email = Empty, project_id = Empty)
    )]
    pub async fn append_row(&self, row: &WaitlistRow) -> Result<()> {
        let (account, assertion) = self.service_account_assertion().await?;
        Span::current()
            .record("client_email", account.client_email.as_str())
            .record("project_id", account.project_id.as_str());

        let access_token = self.fetch_access_token(&assertion).await?;
        let url = self.append_url(&account.sheet_id)?;

        let res = self
            .http_client
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(access_token.expose_secret())
            .json(&AppendBody {
                values: [row.cells()],
            })
            .send()
            .await?;
        ensure_success(res).await?;

        debug!("row appended");
        Ok(())
    }

    /// Exchanges a signed assertion for a bearer token (OAuth2 JWT bearer grant).
    pub async fn fetch_access_token(&self, assertion: &str) -> Result<SecretString> {
        let res = self
            .http_client
            .post(self.token_url.clone())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion)])
            .send()
            .await?;
        let token: TokenResponse = ensure_success(res).await?.json().await?;

        token
            .access_token
            .filter(|t| !t.is_empty())
            .map(SecretString::from)
            .ok_or(SheetsError::MissingAccessToken)
    }

    /// Key parsing and RSA signing are CPU bound, so they run on the blocking pool.
    async fn service_account_assertion(&self) -> Result<(ServiceAccount, String)> {
        let config = self.config.clone();
        let audience = self.token_url.to_string();

        tokio::task::spawn_blocking(move || -> Result<(ServiceAccount, String)> {
            let account = ServiceAccount::from_config(&config)?;
            let assertion = account.signed_assertion(&audience, Utc::now())?;
            Ok((account, assertion))
        })
        .await?
    }

    /// `{api_base_url}/v4/spreadsheets/{sheet_id}/values/{range}:append`
    fn append_url(&self, sheet_id: &str) -> Result<Url> {
        let append = format!("{}:append", self.config.range);
        let mut url = self.api_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SheetsError::UrlParsing("api base url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", sheet_id, "values", append.as_str()]);

        Ok(url)
    }
}

/// Google explains failures (quota, permissions, unknown sheet) in the body,
/// so keep it around for the server log.
async fn ensure_success(res: Response) -> Result<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    Err(SheetsError::UnexpectedStatus { status, body })
}

#[derive(Serialize)]
struct AppendBody<'a> {
    values: [[&'a str; 4]; 1],
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}
