//! Stateless request builder and response parser for the Ajera endpoint.
//!
//! # Design
//! `Dispatcher` holds only the endpoint URL. `build` turns a request record
//! into an `HttpRequest`; `parse` turns the `HttpResponse` back into the
//! envelope type the request declares. Neither touches the network, so the
//! whole wire contract can be tested with canned responses.
//!
//! Response handling order:
//! 1. body must be JSON, otherwise `TransportError::MalformedBody`;
//! 2. a non-empty `Errors` value is an `ApiError`, whatever `ResponseCode` says;
//! 3. the body is validated against `Envelope<R::Content>`.

use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result, SchemaValidationError, TransportError};
use crate::http::{HttpRequest, HttpResponse, JSON_HEADERS};
use crate::schema::{ApiRequest, Envelope};

#[derive(Debug, Clone)]
pub struct Dispatcher {
    endpoint: String,
}

impl Dispatcher {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim().to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Serialize `request` with wire names; unset optional fields are left out.
    pub fn build<R: ApiRequest>(&self, request: &R) -> Result<HttpRequest> {
        let body = serde_json::to_string(request)?;
        Ok(HttpRequest {
            url: self.endpoint.clone(),
            headers: JSON_HEADERS
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            body,
        })
    }

    pub fn parse<R: ApiRequest>(
        &self,
        request: &R,
        response: HttpResponse,
    ) -> Result<Envelope<R::Content>> {
        let body: Value = serde_json::from_str(&response.body).map_err(|source| {
            TransportError::MalformedBody {
                status: response.status,
                source,
            }
        })?;
        debug!(method = R::METHOD, status = response.status, "response received");

        if let Some(errors) = reported_errors(&body) {
            return Err(ApiError {
                method: R::METHOD,
                response_code: body.get("ResponseCode").and_then(Value::as_i64),
                message: body.get("Message").and_then(Value::as_str).map(str::to_string),
                errors,
                request: redacted(request),
            }
            .into());
        }

        let envelope =
            serde_path_to_error::deserialize(body).map_err(SchemaValidationError::from)?;
        Ok(envelope)
    }
}

/// The server's `Errors`, if it reported any.
///
/// Anything non-empty counts: a list, but also a bare string or object.
/// `null`, `false`, `0`, `""`, `[]` and `{}` mean no errors.
fn reported_errors(body: &Value) -> Option<Vec<Value>> {
    match body.get("Errors")? {
        Value::Null | Value::Bool(false) => None,
        Value::Array(errors) if errors.is_empty() => None,
        Value::Array(errors) => Some(errors.clone()),
        Value::String(text) if text.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(vec![other.clone()]),
    }
}

/// The request as JSON with the password masked, for error reports.
fn redacted<R: ApiRequest>(request: &R) -> Value {
    let mut value = serde_json::to_value(request).unwrap_or(Value::Null);
    if let Some(password) = value.get_mut("Password") {
        *password = Value::String("<redacted>".to_string());
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::schema::{
        CreateSessionRequest, EndSessionRequest, ListProjectsArgs, ListProjectsRequest,
    };
    use serde_json::json;

    const ENDPOINT: &str = "http://localhost:3000/AjeraAPI.ashx";

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ENDPOINT)
    }

    fn list_request() -> ListProjectsRequest {
        ListProjectsRequest::new("tok", ListProjectsArgs::default().by_id_like("28222"))
    }

    fn response(body: Value) -> HttpResponse {
        HttpResponse::ok(body.to_string())
    }

    #[test]
    fn build_posts_json_to_the_endpoint() {
        let req = dispatcher().build(&list_request()).unwrap();
        assert_eq!(req.url, ENDPOINT);
        assert_eq!(
            req.headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ]
        );
        let body: Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body["Method"], "ListProjects");
        assert_eq!(body["MethodArguments"], json!({"FilterByIDLike": "28222"}));
    }

    #[test]
    fn parse_success_validates_declared_content() {
        let envelope = dispatcher()
            .parse(
                &list_request(),
                response(json!({
                    "ResponseCode": 200,
                    "Message": "Success",
                    "Errors": [],
                    "Content": {"Projects": [{
                        "ProjectKey": 166778,
                        "ID": "23-28222-001",
                        "Description": "Wet wells",
                        "Color": "blue"
                    }]},
                    "UsageKey": "usage"
                })),
            )
            .unwrap();
        assert_eq!(envelope.response_code, 200);
        assert_eq!(envelope.content.projects[0].key, 166778);
        assert_eq!(envelope.content.projects[0].extra["Color"], "blue");
    }

    #[test]
    fn non_empty_errors_win_over_success_code() {
        let err = dispatcher()
            .parse(
                &list_request(),
                response(json!({
                    "ResponseCode": 200,
                    "Message": "Success",
                    "Errors": [{"ErrorID": 1, "ErrorMessage": "Invalid session token"}],
                    "Content": {"Projects": []},
                    "UsageKey": "usage"
                })),
            )
            .unwrap_err();
        match err {
            Error::Api(api) => {
                assert_eq!(api.method, "ListProjects");
                assert_eq!(api.response_code, Some(200));
                assert_eq!(api.request["SessionToken"], "tok");
                assert_eq!(api.errors.len(), 1);
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn non_list_errors_are_still_api_errors() {
        for errors in [json!("Invalid session"), json!({"ErrorID": 7}), json!(true)] {
            let err = dispatcher()
                .parse(
                    &list_request(),
                    response(json!({
                        "ResponseCode": 200,
                        "Message": "Success",
                        "Errors": errors.clone(),
                        "Content": {"Projects": []},
                        "UsageKey": "usage"
                    })),
                )
                .unwrap_err();
            match err {
                Error::Api(api) => assert_eq!(api.errors, vec![errors]),
                other => panic!("expected ApiError, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_errors_of_any_shape_mean_success() {
        for errors in [json!([]), json!(null), json!(""), json!({}), json!(false), json!(0)] {
            let envelope = dispatcher().parse(
                &list_request(),
                response(json!({
                    "ResponseCode": 200,
                    "Message": "Success",
                    "Errors": errors,
                    "Content": {"Projects": []},
                    "UsageKey": "usage"
                })),
            );
            // Only an empty list also satisfies the envelope schema.
            match envelope {
                Ok(_) => assert_eq!(errors, json!([])),
                Err(err) => assert!(matches!(err, Error::Schema(_)), "{errors}: {err:?}"),
            }
        }
    }

    #[test]
    fn api_error_masks_the_password() {
        let err = dispatcher()
            .parse(
                &CreateSessionRequest::new("janedoe", "j@ned0e"),
                response(json!({
                    "ResponseCode": 401,
                    "Message": "Unauthorized",
                    "Errors": ["bad credentials"]
                })),
            )
            .unwrap_err();
        let Error::Api(api) = err else {
            panic!("expected ApiError");
        };
        assert_eq!(api.request["Password"], "<redacted>");
        assert_eq!(api.request["Username"], "janedoe");
    }

    #[test]
    fn missing_required_field_reports_its_path() {
        let err = dispatcher()
            .parse(
                &list_request(),
                response(json!({
                    "ResponseCode": 200,
                    "Message": "Success",
                    "Errors": [],
                    "Content": {"Projects": [{"ID": "23-28222-001", "Description": "Wet wells"}]},
                    "UsageKey": "usage"
                })),
            )
            .unwrap_err();
        let Error::Schema(schema) = err else {
            panic!("expected SchemaValidationError");
        };
        assert_eq!(schema.path, "Content.Projects[0]");
        assert!(schema.message.contains("ProjectKey"), "{}", schema.message);
    }

    #[test]
    fn wrongly_typed_field_reports_its_path() {
        let err = dispatcher()
            .parse(
                &list_request(),
                response(json!({
                    "ResponseCode": 200,
                    "Message": "Success",
                    "Errors": [],
                    "Content": {"Projects": [
                        {"ProjectKey": "not a number", "ID": "x", "Description": "d"}
                    ]},
                    "UsageKey": "usage"
                })),
            )
            .unwrap_err();
        let Error::Schema(schema) = err else {
            panic!("expected SchemaValidationError");
        };
        assert_eq!(schema.path, "Content.Projects[0].ProjectKey");
    }

    #[test]
    fn malformed_body_is_a_transport_error() {
        let err = dispatcher()
            .parse(
                &EndSessionRequest::new("tok"),
                HttpResponse {
                    status: 502,
                    headers: Vec::new(),
                    body: "<html>Bad Gateway</html>".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::MalformedBody { status: 502, .. })
        ));
    }

    #[test]
    fn missing_errors_list_is_a_schema_error() {
        let err = dispatcher()
            .parse(
                &EndSessionRequest::new("tok"),
                response(json!({
                    "ResponseCode": 200,
                    "Message": "Success",
                    "Content": {},
                    "UsageKey": "k"
                })),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn endpoint_whitespace_is_trimmed() {
        let dispatcher = Dispatcher::new(" http://host/AjeraAPI.ashx\n");
        assert_eq!(dispatcher.endpoint(), "http://host/AjeraAPI.ashx");
    }
}
