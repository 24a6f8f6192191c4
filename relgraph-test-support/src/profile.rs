//! Environment-driven tuning for property-test suites.
//!
//! `PROPTEST_CASES` overrides the number of cases per property and
//! `RELGRAPH_PBT_FORK` switches forked execution on or off. Malformed
//! overrides are reported with `tracing::warn!` and ignored.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "PROPTEST_CASES";
/// Environment variable toggling forked execution.
pub const FORK_ENV_KEY: &str = "RELGRAPH_PBT_FORK";

/// Resolved property-test settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads the overrides from the environment, falling back to the given
    /// defaults.
    ///
    /// # Examples
    /// ```
    /// use relgraph_test_support::profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(32, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: override_from_env(CASES_ENV_KEY, parse_cases).unwrap_or(default_cases),
            fork: override_from_env(FORK_ENV_KEY, parse_switch).unwrap_or(default_fork),
        }
    }

    /// Cases to run per property.
    #[must_use]
    pub const fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether each case runs in a forked process.
    #[must_use]
    pub const fn fork(&self) -> bool {
        self.fork
    }
}

fn override_from_env<T>(key: &'static str, parse: fn(&str) -> Result<T, String>) -> Option<T> {
    let raw = env::var(key).ok()?;
    parse(&raw)
        .inspect_err(|reason| {
            tracing::warn!(env = key, raw = %raw, reason = %reason, "ignoring invalid override");
        })
        .ok()
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be positive".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(error.to_string()),
    }
}

fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("`{other}` is not a boolean switch")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("1", Ok(1))]
    #[case(" 250 ", Ok(250))]
    #[case("0", Err(()))]
    #[case("-3", Err(()))]
    #[case("many", Err(()))]
    fn parse_cases_requires_a_positive_integer(#[case] raw: &str, #[case] expected: Result<u32, ()>) {
        assert_eq!(parse_cases(raw).map_err(drop), expected);
    }

    #[rstest]
    #[case("TRUE", Ok(true))]
    #[case("on", Ok(true))]
    #[case("0", Ok(false))]
    #[case("No", Ok(false))]
    #[case("", Err(()))]
    #[case("2", Err(()))]
    fn parse_switch_accepts_common_spellings(#[case] raw: &str, #[case] expected: Result<bool, ()>) {
        assert_eq!(parse_switch(raw).map_err(drop), expected);
    }
}
