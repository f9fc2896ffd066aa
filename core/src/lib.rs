//! Synchronous client for the Ajera project-accounting API.
//!
//! # Overview
//! Every Ajera call is a JSON POST to one endpoint: a `Method` name, an
//! optional session token and optional method arguments go out, an envelope
//! (`ResponseCode`, `Message`, `Errors`, `Content`, `UsageKey`) comes back.
//! This crate models those bodies as typed records and drives the session
//! lifecycle around them.
//!
//! # Design
//! - `schema` holds the wire records. Known fields are validated, unknown
//!   ones are kept and written back.
//! - `Dispatcher` is stateless: `build` produces an `HttpRequest`, `parse`
//!   consumes an `HttpResponse`. A `Transport` performs the round trip, so
//!   the wire contract is testable without a network.
//! - `AjeraClient` owns at most one session and refuses business calls
//!   without one. There is no global client; startup code builds one from
//!   `AjeraConfig` and passes it around.
//! - `facade` holds the list-then-fetch composite query.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod facade;
pub mod http;
pub mod schema;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod transport;

pub use client::{AjeraClient, Credentials, SessionGuard, SessionInfo};
pub use config::{AjeraConfig, ConfigError};
pub use dispatch::Dispatcher;
pub use error::{ApiError, Error, Result, SchemaValidationError, SessionError, TransportError};
pub use facade::{project_data, project_data_full};
pub use http::{HttpRequest, HttpResponse};
pub use schema::{
    GetProjectsContent, InvoiceGroup, ListProjectsArgs, ListProjectsContent, Phase, ProjectDetail,
    ProjectSummary,
};
pub use transport::{Transport, UreqTransport};
