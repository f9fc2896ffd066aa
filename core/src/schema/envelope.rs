//! The response envelope and the per-operation content variants.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::records::{InvoiceGroup, Phase, ProjectDetail, ProjectSummary};
use super::session::SessionContent;
use super::Extra;

/// Outer shape shared by every response; `C` is chosen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<C> {
    #[serde(rename = "ResponseCode")]
    pub response_code: i64,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Errors")]
    pub errors: Vec<Value>,
    #[serde(rename = "Content")]
    pub content: C,
    #[serde(rename = "UsageKey")]
    pub usage_key: String,
    #[serde(flatten)]
    pub extra: Extra,
}

pub type SessionResponse = Envelope<SessionContent>;
pub type EndSessionResponse = Envelope<EndSessionContent>;
pub type ListProjectsResponse = Envelope<ListProjectsContent>;
pub type GetProjectsResponse = Envelope<GetProjectsContent>;

/// `EndAPISession` returns no declared content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndSessionContent {
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListProjectsContent {
    #[serde(rename = "Projects")]
    pub projects: Vec<ProjectSummary>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ListProjectsContent {
    pub fn keys(&self) -> Vec<i64> {
        self.projects.iter().map(|project| project.key).collect()
    }
}

/// Projects plus the phases and invoice groups that hang off them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetProjectsContent {
    #[serde(rename = "Projects")]
    pub projects: Vec<ProjectDetail>,
    #[serde(rename = "InvoiceGroups")]
    pub invoice_groups: Vec<InvoiceGroup>,
    #[serde(rename = "Phases")]
    pub phases: Vec<Phase>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl GetProjectsContent {
    pub fn phases_for(&self, project_key: i64) -> impl Iterator<Item = &Phase> + '_ {
        self.phases
            .iter()
            .filter(move |phase| phase.project_key == project_key)
    }

    pub fn invoice_groups_for(&self, project_key: i64) -> impl Iterator<Item = &InvoiceGroup> + '_ {
        self.invoice_groups
            .iter()
            .filter(move |group| group.project_key == project_key)
    }
}
