//! Wire schema of the Ajera API.
//!
//! # Design
//! Every record is a serde struct whose fields carry their exact wire name
//! (`#[serde(rename = "...")]`), so serialization reproduces the server's
//! casing. Declared fields are validated strictly; anything else the server
//! sends lands in the record's `extra` map and is written back out unchanged,
//! which keeps the client working when the server grows new fields.
//!
//! Field kinds map onto serde as follows:
//! - required: plain field, missing → validation error naming the field;
//! - required but nullable: `Option<T>` with [`nullable`], must be present;
//! - optional: `Option<T>` with `default`, omitted from output when `None`;
//! - enumerated literal: a [`literal::WireLiteral`] type or a closed enum.

pub mod envelope;
pub mod literal;
pub mod records;
pub mod request;
pub mod session;

use serde::{Deserialize, Deserializer};

pub use envelope::{
    EndSessionContent, EndSessionResponse, Envelope, GetProjectsContent, GetProjectsResponse,
    ListProjectsContent, ListProjectsResponse, SessionResponse,
};
pub use literal::{ApiVersion, WireLiteral};
pub use records::{
    CustomFields, Employee, InvoiceGroup, Phase, ProjectDetail, ProjectSummary, WorkStatus,
    WorkStatusValue,
};
pub use request::{
    ApiRequest, CreateSessionRequest, EndSessionRequest, GetProjectsArgs, GetProjectsRequest,
    ListProjectsArgs, ListProjectsRequest, MethodArguments, MethodCall,
};
pub use session::{IcrConfigFile, SessionContent};

/// Wire fields a record does not declare, kept verbatim.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Deserialize a field that must be present but may be `null`.
///
/// serde treats a missing `Option` field as `None`; routing it through
/// `deserialize_with` turns the absence into a "missing field" error instead.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}
