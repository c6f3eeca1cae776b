//! Requested config filename parsing.

use regex::Regex;
use std::sync::OnceLock;

use provision_types::RuleViolation;

static CONFIG_FILENAME_REGEX: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used, reason = "Pattern is a compile-time constant")]
fn config_filename_regex() -> &'static Regex {
    CONFIG_FILENAME_REGEX
        .get_or_init(|| Regex::new(r"^cfg(.*)\.xml$").expect("Config filename regex is valid"))
}

/// Extract the hardware address from `cfg<mac>.xml`.
///
/// The capture is returned verbatim; no address format is enforced. An
/// empty capture (`cfg.xml`) is accepted.
pub fn parse_config_filename(file: &str) -> Result<&str, RuleViolation> {
    config_filename_regex()
        .captures(file)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(RuleViolation::MalformedRequest)
}
