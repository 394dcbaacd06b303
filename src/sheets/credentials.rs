//! Contains the `ServiceAccount` data structure, its implementations and tests for them.
//! A `ServiceAccount` is built from `SheetsConfig` and can sign the JWT assertion that gets
//! exchanged for an OAuth2 access token (RS256, see RFC 7523).

use chrono::{DateTime, Utc};
use rsa::{
    pkcs1::DecodeRsaPrivateKey,
    pkcs1v15::SigningKey,
    pkcs8::DecodePrivateKey,
    signature::{SignatureEncoding, Signer},
    RsaPrivateKey,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use sha2::Sha256;

use crate::{config::SheetsConfig, utils};

use super::{Result, SheetsError};

/// Read/write access to spreadsheets.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
/// Google rejects assertions that live longer than an hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

// ###################################
// ->   STRUCTS
// ###################################
pub struct ServiceAccount {
    pub client_email: String,
    pub project_id: String,
    pub sheet_id: String,
    signing_key: SigningKey<Sha256>,
}

#[derive(Serialize)]
struct JwtHeader {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

// ###################################
// ->   IMPLs
// ###################################
impl ServiceAccount {
    /// Builds the service account out of the `GOOGLE_*` settings.
    /// Fails if any of them is missing or empty, or if the private key can't be parsed.
    pub fn from_config(config: &SheetsConfig) -> Result<Self> {
        let client_email = required(config.client_email.as_deref(), "GOOGLE_CLIENT_EMAIL")?;
        let private_key = required(
            config.private_key.as_ref().map(|k| k.expose_secret()),
            "GOOGLE_PRIVATE_KEY",
        )?;
        let project_id = required(config.project_id.as_deref(), "GOOGLE_PROJECT_ID")?;
        let sheet_id = required(config.sheet_id.as_deref(), "GOOGLE_SHEET_ID")?;

        let private_key = parse_private_key(&utils::unescape_newlines(private_key))?;

        Ok(ServiceAccount {
            client_email: client_email.to_string(),
            project_id: project_id.to_string(),
            sheet_id: sheet_id.to_string(),
            signing_key: SigningKey::<Sha256>::new(private_key),
        })
    }

    /// Creates a signed JWT assertion for the `audience` (the token endpoint).
    pub fn signed_assertion(&self, audience: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let iat = issued_at.timestamp();
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
        };
        let claims = JwtClaims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: audience,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let signing_input = format!(
            "{}.{}",
            utils::b64u_encode(serde_json::to_vec(&header)?),
            utils::b64u_encode(serde_json::to_vec(&claims)?)
        );
        let signature = self.signing_key.sign(signing_input.as_bytes());

        Ok(format!(
            "{signing_input}.{}",
            utils::b64u_encode(signature.to_vec())
        ))
    }
}

// The signing key must never end up in logs.
impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("sheet_id", &self.sheet_id)
            .finish_non_exhaustive()
    }
}

// ###################################
// ->   HELPERS
// ###################################
fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(SheetsError::MissingSetting(name))
}

/// Google hands out PKCS#8 keys, but PKCS#1 is accepted too.
fn parse_private_key(pem: &str) -> Result<RsaPrivateKey> {
    match RsaPrivateKey::from_pkcs8_pem(pem) {
        Ok(key) => Ok(key),
        Err(_) => RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|er| SheetsError::InvalidPrivateKey(er.to_string())),
    }
}
