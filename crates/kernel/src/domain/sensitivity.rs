//! Sensitivity tier shared by resources and capabilities.
//!
//! Drives Decision Cache TTLs (spec §4.3) and Policy Engine gates (spec
//! §4.2). Resource invariant: missing or unrecognized values degrade to
//! `Critical` (spec §3) — never silently widen access.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Low,
    Medium,
    High,
    Critical,
}

impl Sensitivity {
    /// Parses a free-form sensitivity string, degrading to `Critical` for
    /// anything unrecognized (spec §3 invariant). Accepts the synonyms
    /// named in spec §4.3's TTL table (`confidential` ~ `high`,
    /// `internal` ~ `medium`, `public` ~ `low`).
    pub fn parse_or_critical(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "low" | "public" => Self::Low,
            "medium" | "internal" => Self::Medium,
            "high" | "confidential" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Critical,
        }
    }

    /// TTL table from spec §4.3.
    pub fn cache_ttl(self) -> Duration {
        match self {
            Self::Critical => Duration::from_secs(60),
            Self::High => Duration::from_secs(120),
            Self::Medium => Duration::from_secs(180),
            Self::Low => Duration::from_secs(300),
        }
    }

    /// Stale-while-revalidate is only offered for `critical`/`high` (spec §4.3).
    pub fn supports_stale_while_revalidate(self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sensitivity_degrades_to_critical() {
        assert_eq!(Sensitivity::parse_or_critical("bogus"), Sensitivity::Critical);
        assert_eq!(Sensitivity::parse_or_critical(""), Sensitivity::Critical);
    }

    #[test]
    fn ttl_table_matches_spec() {
        assert_eq!(Sensitivity::Critical.cache_ttl(), Duration::from_secs(60));
        assert_eq!(Sensitivity::High.cache_ttl(), Duration::from_secs(120));
        assert_eq!(Sensitivity::Medium.cache_ttl(), Duration::from_secs(180));
        assert_eq!(Sensitivity::Low.cache_ttl(), Duration::from_secs(300));
    }
}
