//! Content of a `CreateAPISession` response.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

use super::Extra;

/// Company metadata and the token that scopes subsequent calls.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContent {
    #[serde(rename = "CompanyName")]
    pub company_name: String,
    #[serde(rename = "UsingICRMobile")]
    pub using_icr_mobile: bool,
    #[serde(rename = "SessionToken")]
    pub session_token: String,
    /// RFC 3339; a timestamp without an offset is taken as UTC.
    #[serde(rename = "SessionExpiration", deserialize_with = "expiration")]
    pub session_expiration: DateTime<FixedOffset>,
    #[serde(rename = "APIURL")]
    pub api_url: String,
    #[serde(rename = "AjeraVersion")]
    pub ajera_version: String,
    #[serde(rename = "ICRConfigFile")]
    pub icr_config_file: IcrConfigFile,
    #[serde(flatten)]
    pub extra: Extra,
}

fn expiration<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(stamp);
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| de::Error::invalid_value(Unexpected::Str(&raw), &"an ISO 8601 timestamp"))
}

// Tokens and keys stay out of logs.
impl std::fmt::Debug for SessionContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContent")
            .field("company_name", &self.company_name)
            .field("using_icr_mobile", &self.using_icr_mobile)
            .field("session_token", &"<redacted>")
            .field("session_expiration", &self.session_expiration)
            .field("api_url", &self.api_url)
            .field("ajera_version", &self.ajera_version)
            .field("icr_config_file", &self.icr_config_file)
            .finish_non_exhaustive()
    }
}

/// Mobile time-entry integration settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct IcrConfigFile {
    #[serde(rename = "icrURL")]
    pub icr_url: String,
    #[serde(rename = "icrClientId")]
    pub icr_client_id: String,
    #[serde(rename = "icrUserName")]
    pub icr_user_name: String,
    #[serde(rename = "icrApiKey")]
    pub icr_api_key: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl std::fmt::Debug for IcrConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcrConfigFile")
            .field("icr_url", &self.icr_url)
            .field("icr_client_id", &self.icr_client_id)
            .field("icr_user_name", &self.icr_user_name)
            .field("icr_api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}
