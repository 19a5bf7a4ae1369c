//! Shared HTTP utilities for the ledger workspace.
//!
//! Provides the JSON error envelope used for every non-GraphQL error
//! response: unknown routes, disabled GraphiQL and refused GET requests.

// ============================================================================
// JSON Response Helpers (framework-agnostic)
// ============================================================================

/// Create a structured error JSON with a default message based on the code.
///
/// Returns: `{"error": {"code": "<code>", "message": "<default message>"}}`
pub fn json_err(code: &str) -> serde_json::Value {
    let message = match code {
        "not_found" => "Resource not found",
        "bad_request" => "Bad request",
        "method_not_allowed" => "Method not allowed",
        _ => code, // Fallback to code as message for unknown codes
    };
    serde_json::json!({"error": {"code": code, "message": message}})
}

/// Create a structured error JSON with a custom message.
///
/// Returns: `{"error": {"code": "<code>", "message": "<message>"}}`
pub fn json_error_with_message(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({"error": {"code": code, "message": message}})
}

/// Body for liveness probes.
pub fn json_status_ok() -> serde_json::Value {
    serde_json::json!({"status": "ok"})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_err_codes_the_server_emits() {
        // fallback route
        assert_eq!(
            json_err("not_found"),
            serde_json::json!({"error": {"code": "not_found", "message": "Resource not found"}})
        );
        // codes of the refused GET /graphql requests, which carry their own message
        assert_eq!(json_err("method_not_allowed")["error"]["message"], "Method not allowed");
        assert_eq!(json_err("bad_request")["error"]["message"], "Bad request");
    }

    #[test]
    fn test_json_error_with_message() {
        // disabled GraphiQL keeps the not_found code but says why
        let err = json_error_with_message("not_found", "GraphiQL is disabled");
        assert_eq!(
            err,
            serde_json::json!({"error": {"code": "not_found", "message": "GraphiQL is disabled"}})
        );
        assert_ne!(err, json_err("not_found"));
    }

    #[test]
    fn test_json_status_ok() {
        assert_eq!(json_status_ok()["status"], "ok");
    }
}
