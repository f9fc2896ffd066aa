//! Session-scoped client for the Ajera API.
//!
//! # Design
//! `AjeraClient` is a two-state machine: no session, or one active session.
//! Business calls are refused locally (no network traffic) until a session
//! exists, and a second `start_session` is refused rather than replacing the
//! live token. The client expects one caller at a time and does no locking
//! of its own.
//!
//! [`SessionGuard`] ties a session to a scope. Dropping the guard ends the
//! session on every exit path, including unwinding.

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, FixedOffset};
use tracing::{debug, info, warn};

use crate::config::AjeraConfig;
use crate::dispatch::Dispatcher;
use crate::error::{Result, SessionError};
use crate::schema::{
    ApiRequest, CreateSessionRequest, EndSessionRequest, Envelope, GetProjectsArgs,
    GetProjectsRequest, GetProjectsResponse, ListProjectsArgs, ListProjectsRequest,
    ListProjectsResponse,
};
use crate::transport::{Transport, UreqTransport};

/// Credentials for `CreateAPISession`.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub use_session_cookie: bool,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("use_session_cookie", &self.use_session_cookie)
            .finish()
    }
}

/// What the client keeps from a successful `CreateAPISession`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub company_name: String,
    pub expires_at: DateTime<FixedOffset>,
    pub ajera_version: String,
}

struct ActiveSession {
    token: String,
    info: SessionInfo,
}

pub struct AjeraClient<T: Transport = UreqTransport> {
    dispatcher: Dispatcher,
    transport: T,
    credentials: Credentials,
    session: Option<ActiveSession>,
}

impl AjeraClient<UreqTransport> {
    /// Client over HTTP for the configured endpoint. No session is started.
    pub fn from_config(config: &AjeraConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> AjeraClient<T> {
    pub fn with_transport(config: &AjeraConfig, transport: T) -> Self {
        Self {
            dispatcher: Dispatcher::new(&config.api_url),
            transport,
            credentials: config.credentials(),
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn token(&self) -> Result<&str, SessionError> {
        self.session
            .as_ref()
            .map(|session| session.token.as_str())
            .ok_or(SessionError::NotStarted)
    }

    pub fn session_info(&self) -> Option<&SessionInfo> {
        self.session.as_ref().map(|session| &session.info)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `CreateAPISession`. Refused without a network call if a session is active.
    pub fn start_session(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(SessionError::AlreadyActive.into());
        }

        let credentials = &self.credentials;
        let request = CreateSessionRequest::new(&credentials.username, &credentials.password)
            .use_session_cookie(credentials.use_session_cookie);
        let content = self.call(&request)?.content;

        info!(
            company = %content.company_name,
            expires_at = %content.session_expiration,
            "session started"
        );
        self.session = Some(ActiveSession {
            token: content.session_token,
            info: SessionInfo {
                company_name: content.company_name,
                expires_at: content.session_expiration,
                ajera_version: content.ajera_version,
            },
        });
        Ok(())
    }

    /// `EndAPISession`. The local session is dropped before the server's
    /// answer is examined, so the client is back to no-session even when the
    /// call fails; the failure is still returned.
    pub fn close_session(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(SessionError::NotStarted)?;
        let outcome = self.call(&EndSessionRequest::new(session.token));
        match &outcome {
            Ok(_) => info!("session closed"),
            Err(err) => warn!(error = %err, "end-session call failed; local session discarded"),
        }
        outcome.map(|_| ())
    }

    /// `ListProjects` with the given filters.
    pub fn list_projects(&mut self, filters: ListProjectsArgs) -> Result<ListProjectsResponse> {
        let request = ListProjectsRequest::new(self.token()?, filters);
        self.call(&request)
    }

    /// `GetProjects`: full records for `keys`, with their phases and invoice groups.
    pub fn get_projects(
        &mut self,
        keys: impl IntoIterator<Item = i64>,
    ) -> Result<GetProjectsResponse> {
        let request = GetProjectsRequest::new(self.token()?, GetProjectsArgs::new(keys));
        self.call(&request)
    }

    /// Start a session that ends when the returned guard is dropped.
    pub fn session(&mut self) -> Result<SessionGuard<'_, T>> {
        self.start_session()?;
        Ok(SessionGuard { client: self })
    }

    /// Run `f` inside a session. The session is closed exactly once whether
    /// `f` succeeds, fails or panics; an error from `f` takes precedence over
    /// an error from closing. A session the body already closed is left alone.
    pub fn with_session<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self) -> Result<R>,
    {
        let mut guard = self.session()?;
        match f(&mut *guard) {
            Ok(value) => {
                if guard.is_active() {
                    guard.close()?;
                }
                Ok(value)
            }
            Err(err) => {
                drop(guard);
                Err(err)
            }
        }
    }

    fn call<R: ApiRequest>(&self, request: &R) -> Result<Envelope<R::Content>> {
        let http_request = self.dispatcher.build(request)?;
        debug!(method = R::METHOD, endpoint = %self.dispatcher.endpoint(), "dispatching");
        let response = self.transport.execute(http_request)?;
        self.dispatcher.parse(request, response)
    }
}

impl<T: Transport> std::fmt::Debug for AjeraClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AjeraClient")
            .field("endpoint", &self.dispatcher.endpoint())
            .field("credentials", &self.credentials)
            .field("session", &self.session_info())
            .finish_non_exhaustive()
    }
}

/// An active session bound to a scope; derefs to the client.
pub struct SessionGuard<'a, T: Transport> {
    client: &'a mut AjeraClient<T>,
}

impl<T: Transport> SessionGuard<'_, T> {
    /// End the session now and report how it went.
    pub fn close(self) -> Result<()> {
        self.client.close_session()
    }
}

impl<T: Transport> Deref for SessionGuard<'_, T> {
    type Target = AjeraClient<T>;

    fn deref(&self) -> &Self::Target {
        &*self.client
    }
}

impl<T: Transport> DerefMut for SessionGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.client
    }
}

impl<T: Transport> Drop for SessionGuard<'_, T> {
    fn drop(&mut self) {
        if self.client.is_active() {
            if let Err(err) = self.client.close_session() {
                warn!(error = %err, "failed to close session on scope exit");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TransportError};
    use crate::testing::{envelope, session_content, ScriptedTransport};
    use serde_json::json;

    fn config() -> AjeraConfig {
        AjeraConfig {
            api_url: "http://ajera.test/AjeraAPI.ashx".to_string(),
            username: "janedoe".to_string(),
            password: "j@ned0e".to_string(),
            use_session_cookie: false,
        }
    }

    fn client(transport: &ScriptedTransport) -> AjeraClient<&ScriptedTransport> {
        AjeraClient::with_transport(&config(), transport)
    }

    #[test]
    fn business_calls_need_a_session_and_stay_offline() {
        let transport = ScriptedTransport::new();
        let mut client = client(&transport);

        let err = client.list_projects(ListProjectsArgs::default()).unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::NotStarted)));
        let err = client.get_projects([166778]).unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::NotStarted)));
        assert_eq!(client.token(), Err(SessionError::NotStarted));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn start_session_stores_token_and_metadata() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        let mut client = client(&transport);

        client.start_session().unwrap();
        assert_eq!(client.token(), Ok("tok-1"));
        let info = client.session_info().unwrap();
        assert_eq!(info.company_name, "Koontz Bryant Johnson Williams, INC.");

        let sent = transport.request_bodies();
        assert_eq!(sent[0]["Method"], "CreateAPISession");
        assert_eq!(sent[0]["Username"], "janedoe");
        assert_eq!(sent[0]["APIVersion"], 2);
    }

    #[test]
    fn second_start_is_refused_and_keeps_the_token() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(envelope(session_content("tok-2")));
        let mut client = client(&transport);

        client.start_session().unwrap();
        let err = client.start_session().unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::AlreadyActive)));
        assert_eq!(client.token(), Ok("tok-1"));
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn close_session_sends_token_and_resets_state() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(envelope(json!({})));
        let mut client = client(&transport);

        client.start_session().unwrap();
        client.close_session().unwrap();
        assert!(!client.is_active());
        assert_eq!(
            transport.request_bodies()[1],
            json!({"Method": "EndAPISession", "SessionToken": "tok-1"})
        );

        let err = client.close_session().unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::NotStarted)));
    }

    #[test]
    fn failed_close_still_discards_the_session() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(json!({
            "ResponseCode": 500,
            "Message": "Error",
            "Errors": ["session unknown"]
        }));
        let mut client = client(&transport);

        client.start_session().unwrap();
        let err = client.close_session().unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert!(!client.is_active());

        transport.push_json(envelope(session_content("tok-2")));
        client.start_session().unwrap();
        assert_eq!(client.token(), Ok("tok-2"));
    }

    #[test]
    fn transport_failure_on_close_discards_the_session() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_failure("connection reset");
        let mut client = client(&transport);

        client.start_session().unwrap();
        let err = client.close_session().unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Request { .. })));
        assert!(!client.is_active());
    }

    #[test]
    fn list_projects_sends_only_supplied_filters() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(envelope(json!({
            "Projects": [{
                "ProjectKey": 166778,
                "ID": "23-28222-001",
                "Description": "Wet wells",
                "Extra": true
            }]
        })));
        let mut client = client(&transport);

        client.start_session().unwrap();
        let response = client
            .list_projects(ListProjectsArgs::default().by_id_like("28222"))
            .unwrap();
        assert_eq!(response.content.keys(), vec![166778]);
        assert_eq!(
            transport.request_bodies()[1],
            json!({
                "Method": "ListProjects",
                "SessionToken": "tok-1",
                "MethodArguments": {"FilterByIDLike": "28222"}
            })
        );
    }

    #[test]
    fn with_session_closes_once_when_the_body_fails() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(envelope(json!({})));
        let mut client = client(&transport);

        let err = client
            .with_session(|_| -> Result<()> { Err(SessionError::AlreadyActive.into()) })
            .unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::AlreadyActive)));
        assert!(!client.is_active());

        let methods: Vec<_> = transport
            .request_bodies()
            .iter()
            .map(|body| body["Method"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(methods, vec!["CreateAPISession", "EndAPISession"]);
    }

    #[test]
    fn with_session_returns_the_body_value() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(envelope(json!({})));
        let mut client = client(&transport);

        let token = client
            .with_session(|client| Ok(client.token()?.to_string()))
            .unwrap();
        assert_eq!(token, "tok-1");
        assert_eq!(transport.requests().len(), 2);
        assert!(!client.is_active());
    }

    #[test]
    fn scoped_body_may_close_the_session_itself() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(envelope(json!({})));
        let mut client = client(&transport);

        let value = client
            .with_session(|client| {
                client.close_session()?;
                Ok(42)
            })
            .unwrap();
        assert_eq!(value, 42);
        let bodies = transport.request_bodies();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[1]["Method"], "EndAPISession");
        assert!(!client.is_active());
    }

    #[test]
    fn guard_closes_the_session_when_unwinding() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(envelope(json!({})));

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut client = client(&transport);
            let _guard = client.session().unwrap();
            panic!("business logic blew up");
        }));
        assert!(outcome.is_err());
        assert_eq!(transport.request_bodies()[1]["Method"], "EndAPISession");
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn explicit_guard_close_does_not_close_twice() {
        let transport = ScriptedTransport::new();
        transport.push_json(envelope(session_content("tok-1")));
        transport.push_json(envelope(json!({})));
        let mut client = client(&transport);

        let guard = client.session().unwrap();
        assert_eq!(guard.token(), Ok("tok-1"));
        guard.close().unwrap();
        assert_eq!(transport.requests().len(), 2);
        assert!(!client.is_active());
    }

    #[test]
    fn debug_output_hides_credentials() {
        let transport = ScriptedTransport::new();
        let rendered = format!("{:?}", client(&transport));
        assert!(!rendered.contains("j@ned0e"));
        assert!(rendered.contains("janedoe"));
    }
}
