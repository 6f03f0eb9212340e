//! ID prefix constants.
//!
//! Every entity ID is `{prefix}-{8 hex chars}`, generated by `lqa-db`.

pub const PREFIX_REPORT: &str = "rpt";
pub const PREFIX_FREELANCER: &str = "frl";
pub const PREFIX_USER: &str = "usr";
pub const PREFIX_SETTINGS: &str = "qst";
pub const PREFIX_AUDIT: &str = "aud";

/// Check whether `id` carries the given prefix followed by a dash.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('-') && rest.len() > 1)
}
