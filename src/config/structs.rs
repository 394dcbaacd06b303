//! The configuration structs used to build the AppConfig, and their impls.
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use strum_macros::AsRefStr;

use crate::config::ConfigError;

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub sheets_config: SheetsConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

/// Everything needed to reach the waitlist spreadsheet.
///
/// The service account fields are optional on purpose: a missing one only makes
/// the append step fail, it doesn't keep the server from starting.
#[derive(Deserialize, Clone, Debug)]
pub struct SheetsConfig {
    /// `GOOGLE_CLIENT_EMAIL`
    pub client_email: Option<String>,
    /// `GOOGLE_PRIVATE_KEY`, PEM with `\n` escaped newlines
    pub private_key: Option<SecretString>,
    /// `GOOGLE_PROJECT_ID`
    pub project_id: Option<String>,
    /// `GOOGLE_SHEET_ID`
    pub sheet_id: Option<String>,

    pub range: String,
    pub token_uri: String,
    pub api_base_url: String,
    /// No timeout on outbound calls when absent.
    #[serde(default)]
    pub timeout_millis: Option<u64>,
}

// ###################################
// ->   IMPLs
// ###################################
impl SheetsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_millis.map(Duration::from_millis)
    }
}

impl Environment {
    pub fn config_file_name(&self) -> String {
        format!("{}.toml", self.as_ref().to_lowercase())
    }
}

// ###################################
// ->   TRY FROMs
// ###################################
impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}
