//! Types shared by both backend clients

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Response of `GET /api/health`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok") || self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Join globs the way both backends expect them: `;`-separated, in order
pub fn join_globs(globs: &[String]) -> Option<String> {
    let parts: Vec<&str> = globs
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(";"))
    }
}

/// Accept any JSON value for an optional integer, keeping it only when it
/// actually is one
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

/// Decode an optional field, falling back to its default when it is null or
/// has the wrong shape
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

/// Like [`lenient_i64`] but with zero for anything unusable
pub(crate) fn lenient_line<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_i64(deserializer)?.unwrap_or(0))
}
