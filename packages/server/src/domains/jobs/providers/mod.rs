//! Provider payload normalization.
//!
//! Each upstream provider has its own JSON shape. The provider identifier
//! (never the payload's structure) selects the transform:
//!
//! ```text
//! ProviderId::Provider1 ─► provider_a::transform ─┐
//!                                                 ├─► Vec<UnifiedJob>
//! ProviderId::Provider2 ─► provider_b::transform ─┘
//! ```
//!
//! Transforms never fail. An unrecognized payload yields an empty list and a
//! warning; a bad record is dropped while its siblings are kept.

pub mod parsing;
pub mod provider_a;
pub mod provider_b;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domains::jobs::models::UnifiedJob;

pub use provider_a::Provider1Response;
pub use provider_b::Provider2Response;

/// Identifier of an upstream provider. Also the `source` column value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Provider1,
    Provider2,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::Provider1, ProviderId::Provider2];

    /// Value persisted in the `source` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Provider1 => "provider1",
            ProviderId::Provider2 => "provider2",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderId::Provider1 => write!(f, "Provider 1"),
            ProviderId::Provider2 => write!(f, "Provider 2"),
        }
    }
}

impl std::str::FromStr for ProviderId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "provider1" => Ok(ProviderId::Provider1),
            "provider2" => Ok(ProviderId::Provider2),
            _ => Err(anyhow::anyhow!("Invalid provider: {}", s)),
        }
    }
}

/// A provider payload decoded into its provider-specific shape.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Provider1(Provider1Response),
    Provider2(Provider2Response),
}

impl RawPayload {
    /// Decode the outer envelope for `provider`.
    ///
    /// Only the envelope is checked here; records stay as raw JSON so one bad
    /// record cannot reject the whole batch.
    pub fn decode(provider: ProviderId, payload: Value) -> Result<Self, serde_json::Error> {
        match provider {
            ProviderId::Provider1 => serde_json::from_value(payload).map(RawPayload::Provider1),
            ProviderId::Provider2 => serde_json::from_value(payload).map(RawPayload::Provider2),
        }
    }

    pub fn provider(&self) -> ProviderId {
        match self {
            RawPayload::Provider1(_) => ProviderId::Provider1,
            RawPayload::Provider2(_) => ProviderId::Provider2,
        }
    }

    pub fn into_jobs(self) -> Vec<UnifiedJob> {
        match self {
            RawPayload::Provider1(response) => provider_a::transform(response),
            RawPayload::Provider2(response) => provider_b::transform(response),
        }
    }
}

/// Normalize a raw provider payload into unified records.
pub fn transform(provider: ProviderId, payload: Value) -> Vec<UnifiedJob> {
    match RawPayload::decode(provider, payload) {
        Ok(raw) => raw.into_jobs(),
        Err(e) => {
            warn!(provider = %provider, error = %e, "Invalid or empty jobs data");
            Vec::new()
        }
    }
}
