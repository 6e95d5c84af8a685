//! Built-in policy kinds (spec §4.2) and the kind-tag → constructor
//! registry the hot-reloadable corpus parses configuration through.

pub mod cedar;
pub mod cidr;
pub mod mfa_required;
pub mod role;
pub mod sensitivity_tier;
pub mod team_intersection;
pub mod time_window;

pub use cedar::CedarPolicy;
pub use cidr::CidrPolicy;
pub use mfa_required::MfaRequiredPolicy;
pub use role::RolePolicy;
pub use sensitivity_tier::SensitivityTierPolicy;
pub use team_intersection::TeamIntersectionPolicy;
pub use time_window::TimeWindowPolicy;
