use axum::http::StatusCode;
use serde_json::Value;

/// Status and decoded JSON body of a routed request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// Panics with the body when the status differs
    pub fn expect(self, status: StatusCode) -> Self {
        assert_eq!(
            self.status, status,
            "unexpected status, body: {}",
            self.body
        );
        self
    }

    pub fn ok(self) -> Value {
        self.expect(StatusCode::OK).body
    }

    pub fn created(self) -> Value {
        self.expect(StatusCode::CREATED).body
    }

    /// Asserts an error status and returns the error message
    pub fn error(self, status: StatusCode) -> String {
        let body = self.expect(status).body;
        body["error"]
            .as_str()
            .unwrap_or_else(|| panic!("error response without message: {body}"))
            .to_string()
    }
}

/// Reads an id field as i64
pub fn id_of(value: &Value) -> i64 {
    value["id"]
        .as_i64()
        .unwrap_or_else(|| panic!("missing id in {value}"))
}
