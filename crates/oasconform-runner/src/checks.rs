//! Conformance checks applied to every response.

use oasconform_core::OperationTemplate;

use crate::client::ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The status code is not among the codes the definition declares.
    UndeclaredStatus,
    /// The response body is not advertised as JSON.
    NonJsonContentType,
    /// The request never completed (connection refused, timeout). A server
    /// that cannot be reached is not honouring its contract either.
    Transport,
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// Run every conformance check against one response.
pub fn run_checks(op: &OperationTemplate, response: &ApiResponse) -> Vec<Failure> {
    let mut failures = Vec::new();

    if !op.accepts_status(response.status) {
        failures.push(Failure {
            kind: FailureKind::UndeclaredStatus,
            message: format!(
                "status {} not declared for {} {} (declared: {:?})",
                response.status, op.method, op.path, op.allowed_codes
            ),
        });
    }

    match response.content_type() {
        Some(content_type) => {
            if !content_type.contains("application/json") {
                failures.push(Failure {
                    kind: FailureKind::NonJsonContentType,
                    message: format!("Content-Type `{content_type}` is not application/json"),
                });
            }
        }
        // Every declared response here is a JSON response, so the header
        // must be present even when the body is empty.
        None => {
            failures.push(Failure {
                kind: FailureKind::NonJsonContentType,
                message: "response carries no Content-Type header".to_string(),
            });
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasconform_core::template::{HttpMethod, NoRefs, OperationTemplate};
    use serde_json::json;

    fn operation(codes: &[&str]) -> OperationTemplate {
        let responses: serde_json::Map<String, serde_json::Value> =
            codes.iter().map(|c| (c.to_string(), json!({}))).collect();
        OperationTemplate::from_raw(
            HttpMethod::Get,
            "/things",
            &json!({"responses": responses}),
            &[],
            &NoRefs,
        )
        .unwrap()
    }

    fn json_response(status: u16, body: &str) -> ApiResponse {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json; charset=utf-8".parse().unwrap(),
        );
        ApiResponse {
            status,
            headers,
            body_text: body.to_string(),
        }
    }

    #[test]
    fn declared_status_with_json_body_passes() {
        let op = operation(&["200", "404"]);
        assert!(run_checks(&op, &json_response(200, "{}")).is_empty());
        assert!(run_checks(&op, &json_response(404, "{}")).is_empty());
    }

    #[test]
    fn undeclared_status_fails() {
        let op = operation(&["200"]);
        let failures = run_checks(&op, &json_response(500, "{}"));
        assert!(failures.iter().any(|f| f.kind == FailureKind::UndeclaredStatus));
    }

    #[test]
    fn html_content_type_fails() {
        let op = operation(&["200"]);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            "text/html".parse().unwrap(),
        );
        let response = ApiResponse {
            status: 200,
            headers,
            body_text: "<html></html>".to_string(),
        };
        let failures = run_checks(&op, &response);
        assert!(failures.iter().any(|f| f.kind == FailureKind::NonJsonContentType));
    }

    #[test]
    fn missing_content_type_fails_even_without_a_body() {
        let op = operation(&["204"]);
        let response = ApiResponse {
            status: 204,
            headers: reqwest::header::HeaderMap::new(),
            body_text: String::new(),
        };
        let failures = run_checks(&op, &response);
        assert!(failures.iter().any(|f| f.kind == FailureKind::NonJsonContentType));
    }

    #[test]
    fn body_without_content_type_fails() {
        let op = operation(&["200"]);
        let response = ApiResponse {
            status: 200,
            headers: reqwest::header::HeaderMap::new(),
            body_text: "plain".to_string(),
        };
        assert_eq!(run_checks(&op, &response).len(), 1);
    }
}
