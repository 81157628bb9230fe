//! Machine-readable verdict reports.

use serde::Serialize;

use bondswap_predicate::Verdict;

/// Verdict as printed by the `evaluate` command.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictReport {
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&Verdict> for VerdictReport {
    fn from(verdict: &Verdict) -> Self {
        match verdict {
            Verdict::Approved(mode) => Self {
                approved: true,
                mode: Some(mode.as_str()),
                code: None,
                member: None,
                field: None,
                reason: None,
            },
            Verdict::Rejected(rejection) => Self {
                approved: false,
                mode: None,
                code: Some(rejection.code()),
                member: rejection.member_index(),
                field: rejection.field().map(|f| f.as_str()),
                reason: Some(rejection.to_string()),
            },
        }
    }
}
