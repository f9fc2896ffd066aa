//! Request records.
//!
//! # Design
//! Each request type knows its wire method name and the content variant its
//! response carries ([`ApiRequest`]), so the dispatcher validates a response
//! against the type the call site asked for instead of inspecting the body.
//! Session-scoped calls share one shape, [`MethodCall`], parameterized by the
//! argument record ([`MethodArguments`]).

use std::fmt;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::envelope::{EndSessionContent, GetProjectsContent, ListProjectsContent};
use super::literal::{wire_literal, ApiVersion, WireLiteral};
use super::session::SessionContent;
use super::Extra;

wire_literal! {
    pub struct CreateApiSession = "CreateAPISession";
}
wire_literal! {
    pub struct EndApiSession = "EndAPISession";
}
wire_literal! {
    pub struct ListProjectsMethod = "ListProjects";
}
wire_literal! {
    pub struct GetProjectsMethod = "GetProjects";
}

/// A request body that can be posted to the API.
pub trait ApiRequest: Serialize {
    /// Content variant of the matching response envelope.
    type Content: DeserializeOwned;

    /// Wire value of the `Method` field.
    const METHOD: &'static str;
}

/// Argument record of a session-scoped call.
pub trait MethodArguments: Serialize + DeserializeOwned + fmt::Debug + Clone {
    type Method: WireLiteral + Serialize + DeserializeOwned + Default + fmt::Debug + Clone;
    type Content: DeserializeOwned;
}

/// `CreateAPISession`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(rename = "Method", default)]
    pub method: CreateApiSession,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "APIVersion", default)]
    pub api_version: ApiVersion,
    #[serde(rename = "UseSessionCookie", default)]
    pub use_session_cookie: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CreateSessionRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            method: CreateApiSession,
            username: username.into(),
            password: password.into(),
            api_version: ApiVersion,
            use_session_cookie: false,
            extra: Extra::new(),
        }
    }

    pub fn use_session_cookie(mut self, enabled: bool) -> Self {
        self.use_session_cookie = enabled;
        self
    }
}

impl fmt::Debug for CreateSessionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateSessionRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_session_cookie", &self.use_session_cookie)
            .finish_non_exhaustive()
    }
}

impl ApiRequest for CreateSessionRequest {
    type Content = SessionContent;
    const METHOD: &'static str = CreateApiSession::VALUE;
}

/// `EndAPISession`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndSessionRequest {
    #[serde(rename = "Method", default)]
    pub method: EndApiSession,
    #[serde(rename = "SessionToken")]
    pub session_token: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl EndSessionRequest {
    pub fn new(session_token: impl Into<String>) -> Self {
        Self {
            method: EndApiSession,
            session_token: session_token.into(),
            extra: Extra::new(),
        }
    }
}

impl ApiRequest for EndSessionRequest {
    type Content = EndSessionContent;
    const METHOD: &'static str = EndApiSession::VALUE;
}

/// A session-scoped call: method name, token and its argument record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "A: MethodArguments", deserialize = "A: MethodArguments"))]
pub struct MethodCall<A: MethodArguments> {
    #[serde(rename = "Method", default)]
    pub method: A::Method,
    #[serde(rename = "SessionToken")]
    pub session_token: String,
    #[serde(rename = "MethodArguments")]
    pub method_arguments: A,
    #[serde(flatten)]
    pub extra: Extra,
}

impl<A: MethodArguments> MethodCall<A> {
    pub fn new(session_token: impl Into<String>, method_arguments: A) -> Self {
        Self {
            method: A::Method::default(),
            session_token: session_token.into(),
            method_arguments,
            extra: Extra::new(),
        }
    }
}

impl<A: MethodArguments> ApiRequest for MethodCall<A> {
    type Content = A::Content;
    const METHOD: &'static str = <A::Method as WireLiteral>::VALUE;
}

pub type ListProjectsRequest = MethodCall<ListProjectsArgs>;
pub type GetProjectsRequest = MethodCall<GetProjectsArgs>;

/// Filters for `ListProjects`; every filter is optional and unset ones are
/// not transmitted. The server ANDs whatever is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListProjectsArgs {
    /// e.g. `["Preliminary", "Hold"]`
    #[serde(rename = "FilterByStatus", default, skip_serializing_if = "Option::is_none")]
    pub by_status: Option<Vec<String>>,
    #[serde(rename = "FilterByCompany", default, skip_serializing_if = "Option::is_none")]
    pub by_company: Option<Vec<i64>>,
    #[serde(rename = "FilterByNameLike", default, skip_serializing_if = "Option::is_none")]
    pub by_name_like: Option<String>,
    #[serde(rename = "FilterByDescriptionLike", default, skip_serializing_if = "Option::is_none")]
    pub by_description_like: Option<String>,
    #[serde(rename = "FilterByDescriptionEquals", default, skip_serializing_if = "Option::is_none")]
    pub by_description_equals: Option<String>,
    #[serde(rename = "FilterByIDLike", default, skip_serializing_if = "Option::is_none")]
    pub by_id_like: Option<String>,
    /// Project type keys; `None` entries match projects without a type.
    #[serde(rename = "FilterByProjectType", default, skip_serializing_if = "Option::is_none")]
    pub by_project_type: Option<Vec<Option<i64>>>,
    #[serde(rename = "FilterBySyncToCRM", default, skip_serializing_if = "Option::is_none")]
    pub by_sync_to_crm: Option<Vec<bool>>,
    #[serde(
        rename = "FilterByEarliestModifiedDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub by_earliest_modified_date: Option<NaiveDate>,
    #[serde(
        rename = "FilterByLatestModifiedDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub by_latest_modified_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ListProjectsArgs {
    pub fn by_status<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by_status = Some(statuses.into_iter().map(Into::into).collect());
        self
    }

    pub fn by_company(mut self, companies: impl IntoIterator<Item = i64>) -> Self {
        self.by_company = Some(companies.into_iter().collect());
        self
    }

    pub fn by_name_like(mut self, pattern: impl Into<String>) -> Self {
        self.by_name_like = Some(pattern.into());
        self
    }

    pub fn by_description_like(mut self, pattern: impl Into<String>) -> Self {
        self.by_description_like = Some(pattern.into());
        self
    }

    pub fn by_description_equals(mut self, description: impl Into<String>) -> Self {
        self.by_description_equals = Some(description.into());
        self
    }

    pub fn by_id_like(mut self, pattern: impl Into<String>) -> Self {
        self.by_id_like = Some(pattern.into());
        self
    }

    pub fn by_project_type(mut self, types: impl IntoIterator<Item = Option<i64>>) -> Self {
        self.by_project_type = Some(types.into_iter().collect());
        self
    }

    pub fn by_sync_to_crm(mut self, flags: impl IntoIterator<Item = bool>) -> Self {
        self.by_sync_to_crm = Some(flags.into_iter().collect());
        self
    }

    pub fn by_earliest_modified_date(mut self, date: NaiveDate) -> Self {
        self.by_earliest_modified_date = Some(date);
        self
    }

    pub fn by_latest_modified_date(mut self, date: NaiveDate) -> Self {
        self.by_latest_modified_date = Some(date);
        self
    }
}

impl MethodArguments for ListProjectsArgs {
    type Method = ListProjectsMethod;
    type Content = ListProjectsContent;
}

/// Keys for `GetProjects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetProjectsArgs {
    #[serde(rename = "RequestedProjects")]
    pub requested_projects: Vec<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl GetProjectsArgs {
    pub fn new(requested_projects: impl IntoIterator<Item = i64>) -> Self {
        Self {
            requested_projects: requested_projects.into_iter().collect(),
            extra: Extra::new(),
        }
    }
}

impl MethodArguments for GetProjectsArgs {
    type Method = GetProjectsMethod;
    type Content = GetProjectsContent;
}
