//! Verdict and payload aggregation.
//!
//! # Responsibilities
//! - Parse the `allowed_to_fail` / `must_succeed` filter lists
//! - Select which results count toward the verdict
//! - Build the per-host report, which always lists every result
//!
//! # Filter precedence
//! ```text
//! allowed_to_fail non-empty → every host not listed counts
//! else must_succeed non-empty → only listed hosts count
//! else                        → every host counts
//! ```
//! Lists parsed from a query string always hold at least one element (an
//! absent parameter parses to `[""]`), so requests always take the first
//! branch. Existing callers rely on `must_succeed` having no effect.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::health::probe::{CheckResult, Outcome};

/// Hostname filters supplied with a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    allowed_to_fail: Vec<String>,
    must_succeed: Vec<String>,
}

/// Which results count toward the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode<'a> {
    /// Every result except the listed hostnames.
    AllowedToFail(&'a [String]),
    /// Only the listed hostnames.
    MustSucceed(&'a [String]),
    /// Every result.
    Everyone,
}

impl FilterSet {
    pub fn new(allowed_to_fail: Vec<String>, must_succeed: Vec<String>) -> Self {
        Self {
            allowed_to_fail,
            must_succeed,
        }
    }

    /// Parse raw query values. A missing parameter is the empty string.
    pub fn from_query(allowed_to_fail: &str, must_succeed: &str) -> Self {
        Self::new(split_list(allowed_to_fail), split_list(must_succeed))
    }

    pub fn mode(&self) -> FilterMode<'_> {
        if !self.allowed_to_fail.is_empty() {
            FilterMode::AllowedToFail(&self.allowed_to_fail)
        } else if !self.must_succeed.is_empty() {
            FilterMode::MustSucceed(&self.must_succeed)
        } else {
            FilterMode::Everyone
        }
    }

    /// Results that count toward the verdict.
    pub fn select<'r>(&self, results: &'r [CheckResult]) -> Vec<&'r CheckResult> {
        let mode = self.mode();
        results
            .iter()
            .filter(|r| match mode {
                FilterMode::AllowedToFail(hosts) => !hosts.contains(&r.hostname),
                FilterMode::MustSucceed(hosts) => hosts.contains(&r.hostname),
                FilterMode::Everyone => true,
            })
            .collect()
    }
}

/// Split on commas without dropping empty segments.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(String::from).collect()
}

/// One entry of the JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostStatus {
    pub status: u16,
    pub check: Outcome,
}

/// Outcome of one aggregation round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    /// Hostname → status, sorted by hostname.
    pub hosts: BTreeMap<String, HostStatus>,
    pub verdict: Outcome,
}

impl Aggregate {
    pub fn is_failure(&self) -> bool {
        self.verdict.is_failure()
    }
}

/// Combine probe results into a report and a verdict.
///
/// Later results for a repeated hostname replace earlier ones in the report.
pub fn aggregate(results: &[CheckResult], filters: &FilterSet) -> Aggregate {
    let hosts = results
        .iter()
        .map(|r| {
            (
                r.hostname.clone(),
                HostStatus {
                    status: r.status_code(),
                    check: r.outcome,
                },
            )
        })
        .collect();

    let failed_anywhere = filters
        .select(results)
        .iter()
        .any(|r| r.outcome.is_failure());

    Aggregate {
        hosts,
        verdict: if failed_anywhere {
            Outcome::Failure
        } else {
            Outcome::Success
        },
    }
}
