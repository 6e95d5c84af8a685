//! Bearer-token claim shape (spec.md §6): `sub, exp, nbf, iat, roles,
//! session_id?, mfa_at?`, plus the extra fields `verify_agent` needs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerClaims {
    pub sub: String,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub teams: BTreeSet<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub mfa_at: Option<i64>,
    #[serde(default)]
    pub trust_level: Option<String>,
}
