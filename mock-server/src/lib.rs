//! In-memory stand-in for the Ajera API endpoint.
//!
//! One route, `POST /AjeraAPI.ashx`, dispatching on the body's `Method`.
//! Projects, phases and invoice groups come from the shared
//! `test-vectors/projects.json` fixture; session tokens are random uuids
//! held in memory until `EndAPISession`.

use std::{collections::HashSet, sync::Arc};

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const ENDPOINT_PATH: &str = "/AjeraAPI.ashx";
pub const MOCK_USERNAME: &str = "janedoe";
pub const MOCK_PASSWORD: &str = "j@ned0e";
pub const MOCK_COMPANY: &str = "Koontz Bryant Johnson Williams, INC.";

const FIXTURE: &str = include_str!("../../test-vectors/projects.json");

/// The records served by `ListProjects` and `GetProjects`.
#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(rename = "Projects")]
    pub projects: Vec<Map<String, Value>>,
    #[serde(rename = "Phases")]
    pub phases: Vec<Map<String, Value>>,
    #[serde(rename = "InvoiceGroups")]
    pub invoice_groups: Vec<Map<String, Value>>,
}

impl Dataset {
    pub fn fixture() -> Self {
        serde_json::from_str(FIXTURE)
            .unwrap_or_else(|err| panic!("bundled fixture is invalid: {err}"))
    }
}

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashSet<String>>>,
    dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashSet::new())),
            dataset: Arc::new(dataset),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new(Dataset::fixture()))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new().route(ENDPOINT_PATH, post(handle_call)).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, path = ENDPOINT_PATH, "mock Ajera API listening");
    }
    axum::serve(listener, app()).await
}

// --- wire ---

#[derive(Deserialize)]
#[serde(tag = "Method")]
enum Call {
    #[serde(rename = "CreateAPISession")]
    CreateSession {
        #[serde(rename = "Username")]
        username: String,
        #[serde(rename = "Password")]
        password: String,
        #[serde(rename = "APIVersion")]
        api_version: i64,
        #[serde(rename = "UseSessionCookie", default)]
        use_session_cookie: bool,
    },
    #[serde(rename = "EndAPISession")]
    EndSession {
        #[serde(rename = "SessionToken")]
        session_token: String,
    },
    ListProjects {
        #[serde(rename = "SessionToken")]
        session_token: String,
        #[serde(rename = "MethodArguments", default)]
        arguments: ProjectFilters,
    },
    GetProjects {
        #[serde(rename = "SessionToken")]
        session_token: String,
        #[serde(rename = "MethodArguments")]
        arguments: RequestedProjects,
    },
}

impl Call {
    fn method(&self) -> &'static str {
        match self {
            Call::CreateSession { .. } => "CreateAPISession",
            Call::EndSession { .. } => "EndAPISession",
            Call::ListProjects { .. } => "ListProjects",
            Call::GetProjects { .. } => "GetProjects",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectFilters {
    pub filter_by_status: Option<Vec<String>>,
    pub filter_by_company: Option<Vec<i64>>,
    pub filter_by_name_like: Option<String>,
    pub filter_by_description_like: Option<String>,
    pub filter_by_description_equals: Option<String>,
    #[serde(rename = "FilterByIDLike")]
    pub filter_by_id_like: Option<String>,
    pub filter_by_project_type: Option<Vec<Option<i64>>>,
    #[serde(rename = "FilterBySyncToCRM")]
    pub filter_by_sync_to_crm: Option<Vec<bool>>,
    pub filter_by_earliest_modified_date: Option<String>,
    pub filter_by_latest_modified_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RequestedProjects {
    #[serde(rename = "RequestedProjects")]
    keys: Vec<i64>,
}

fn success(content: Value) -> Json<Value> {
    Json(json!({
        "ResponseCode": 200,
        "Message": "Success",
        "Errors": [],
        "Content": content,
        "UsageKey": Uuid::new_v4().to_string(),
    }))
}

/// Failures keep HTTP 200 and report through `Errors`, as the real endpoint does.
fn failure(code: i64, message: &str, detail: impl Into<String>) -> Json<Value> {
    let detail = detail.into();
    warn!(code, %detail, "rejecting call");
    Json(json!({
        "ResponseCode": code,
        "Message": message,
        "Errors": [{"ErrorID": code, "ErrorMessage": detail}],
        "Content": null,
        "UsageKey": Uuid::new_v4().to_string(),
    }))
}

// --- handlers ---

async fn handle_call(State(state): State<AppState>, Json(body): Json<Value>) -> Json<Value> {
    let call: Call = match serde_json::from_value(body) {
        Ok(call) => call,
        Err(err) => return failure(400, "Bad Request", format!("invalid request: {err}")),
    };
    debug!(method = call.method(), "call received");

    match call {
        Call::CreateSession {
            username,
            password,
            api_version,
            use_session_cookie,
        } => create_session(&state, &username, &password, api_version, use_session_cookie).await,
        Call::EndSession { session_token } => {
            if state.sessions.write().await.remove(&session_token) {
                success(json!({}))
            } else {
                failure(401, "Unauthorized", "unknown session token")
            }
        }
        Call::ListProjects {
            session_token,
            arguments,
        } => {
            if !state.sessions.read().await.contains(&session_token) {
                return failure(401, "Unauthorized", "unknown session token");
            }
            let summaries: Vec<Value> = state
                .dataset
                .projects
                .iter()
                .filter(|project| arguments.matches(project))
                .map(summary)
                .collect();
            success(json!({ "Projects": summaries }))
        }
        Call::GetProjects {
            session_token,
            arguments,
        } => {
            if !state.sessions.read().await.contains(&session_token) {
                return failure(401, "Unauthorized", "unknown session token");
            }
            let dataset = &state.dataset;
            success(json!({
                "Projects": linked(&dataset.projects, &arguments.keys),
                "InvoiceGroups": linked(&dataset.invoice_groups, &arguments.keys),
                "Phases": linked(&dataset.phases, &arguments.keys),
            }))
        }
    }
}

async fn create_session(
    state: &AppState,
    username: &str,
    password: &str,
    api_version: i64,
    use_session_cookie: bool,
) -> Json<Value> {
    if api_version != 2 {
        return failure(400, "Bad Request", format!("unsupported APIVersion {api_version}"));
    }
    if username != MOCK_USERNAME || password != MOCK_PASSWORD {
        return failure(401, "Unauthorized", "Invalid username or password");
    }
    if use_session_cookie {
        return failure(400, "Bad Request", "session cookies are not supported");
    }

    let token = Uuid::new_v4().to_string();
    state.sessions.write().await.insert(token.clone());
    info!(%username, "session created");
    success(json!({
        "CompanyName": MOCK_COMPANY,
        "UsingICRMobile": true,
        "SessionToken": token,
        "SessionExpiration": "2030-10-08T13:20:48.3275167-04:00",
        "APIURL": format!("http://localhost{ENDPOINT_PATH}"),
        "AjeraVersion": "9.90.02",
        "ICRConfigFile": {
            "icrURL": "deltek",
            "icrClientId": "mock-client",
            "icrUserName": "deltek.ajera",
            "icrApiKey": "mock-key"
        }
    }))
}

fn summary(project: &Map<String, Value>) -> Value {
    json!({
        "ProjectKey": project.get("ProjectKey"),
        "ID": project.get("ID"),
        "Description": project.get("Description"),
    })
}

/// Records whose `ProjectKey` is in `keys`, in dataset order.
fn linked(records: &[Map<String, Value>], keys: &[i64]) -> Vec<Value> {
    records
        .iter()
        .filter(|record| {
            record
                .get("ProjectKey")
                .and_then(Value::as_i64)
                .is_some_and(|key| keys.contains(&key))
        })
        .map(|record| Value::Object(record.clone()))
        .collect()
}

// --- filtering ---

fn text<'a>(record: &'a Map<String, Value>, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or_default()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// The calendar date of a `LastModifiedDate` such as
/// `2023-09-27 09:57:49.607 GMT-04:00 (Eastern Daylight Time)`.
fn modified_date(record: &Map<String, Value>) -> &str {
    let stamp = text(record, "LastModifiedDate");
    stamp.get(..10).unwrap_or(stamp)
}

impl ProjectFilters {
    /// Every supplied filter must match; absent filters match everything.
    pub fn matches(&self, project: &Map<String, Value>) -> bool {
        let status = self
            .filter_by_status
            .as_ref()
            .is_none_or(|allowed| allowed.iter().any(|s| s == text(project, "Status")));
        let company = self.filter_by_company.as_ref().is_none_or(|allowed| {
            project
                .get("CompanyKey")
                .and_then(Value::as_i64)
                .is_some_and(|key| allowed.contains(&key))
        });
        let name = self
            .filter_by_name_like
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(text(project, "Description"), needle));
        let description_like = self
            .filter_by_description_like
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(text(project, "Description"), needle));
        let description_equals = self
            .filter_by_description_equals
            .as_deref()
            .is_none_or(|expected| text(project, "Description") == expected);
        let id = self
            .filter_by_id_like
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(text(project, "ID"), needle));
        let project_type = self.filter_by_project_type.as_ref().is_none_or(|allowed| {
            let key = project.get("ProjectTypeKey").and_then(Value::as_i64);
            allowed.contains(&key)
        });
        let sync = self.filter_by_sync_to_crm.as_ref().is_none_or(|allowed| {
            project
                .get("SyncToCRM")
                .and_then(Value::as_bool)
                .is_some_and(|flag| allowed.contains(&flag))
        });
        let earliest = self
            .filter_by_earliest_modified_date
            .as_deref()
            .is_none_or(|bound| modified_date(project) >= bound);
        let latest = self
            .filter_by_latest_modified_date
            .as_deref()
            .is_none_or(|bound| modified_date(project) <= bound);

        status
            && company
            && name
            && description_like
            && description_equals
            && id
            && project_type
            && sync
            && earliest
            && latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(key: i64) -> Map<String, Value> {
        Dataset::fixture()
            .projects
            .into_iter()
            .find(|p| p["ProjectKey"] == key)
            .unwrap()
    }

    #[test]
    fn fixture_loads() {
        let dataset = Dataset::fixture();
        assert_eq!(dataset.projects.len(), 3);
        assert_eq!(dataset.phases.len(), 3);
        assert_eq!(dataset.invoice_groups.len(), 2);
    }

    #[test]
    fn empty_filters_match_everything() {
        let filters = ProjectFilters::default();
        assert!(filters.matches(&project(166778)));
        assert!(filters.matches(&project(171005)));
    }

    #[test]
    fn id_like_is_a_substring_match() {
        let filters = ProjectFilters {
            filter_by_id_like: Some("28222".into()),
            ..Default::default()
        };
        assert!(filters.matches(&project(166778)));
        assert!(!filters.matches(&project(170412)));
    }

    #[test]
    fn filters_combine_with_and() {
        let filters: ProjectFilters = serde_json::from_value(json!({
            "FilterByIDLike": "20772",
            "FilterByStatus": ["Hold"]
        }))
        .unwrap();
        assert!(!filters.matches(&project(170412)));
        assert!(filters.matches(&project(171005)));
    }

    #[test]
    fn modified_window_uses_the_calendar_date() {
        let filters: ProjectFilters = serde_json::from_value(json!({
            "FilterByEarliestModifiedDate": "2023-03-11",
            "FilterByLatestModifiedDate": "2023-03-11"
        }))
        .unwrap();
        assert!(filters.matches(&project(170412)));
        assert!(!filters.matches(&project(166778)));
    }

    #[test]
    fn project_type_accepts_null_entries() {
        let filters: ProjectFilters =
            serde_json::from_value(json!({"FilterByProjectType": [7, null]})).unwrap();
        assert!(filters.matches(&project(170412)));
        assert!(!filters.matches(&project(166778)));
    }

    #[test]
    fn linked_follows_project_keys() {
        let dataset = Dataset::fixture();
        let phases = linked(&dataset.phases, &[166778]);
        assert_eq!(phases.len(), 2);
        assert!(linked(&dataset.invoice_groups, &[]).is_empty());
    }
}
