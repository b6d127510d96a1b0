//! JSON-RPC 2.0 message types

use advpaste_core::PasteError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

impl RpcRequest {
    /// Requests without an id are notifications and get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    pub fn params<T: DeserializeOwned>(&self) -> Result<T, RpcError> {
        let params = self.params.clone().unwrap_or(JsonValue::Null);
        serde_json::from_value(params)
            .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))
    }
}

#[derive(Debug, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<JsonValue>, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = Some(data);
        self
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }
}

impl From<PasteError> for RpcError {
    fn from(e: PasteError) -> Self {
        let code = match e {
            PasteError::UnknownCommand(_) => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        };
        RpcError::new(code, e.to_string()).with_data(json!({ "code": e.code() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_notification() {
        let req: RpcRequest = serde_json::from_str(r#"{"jsonrpc":"2.0","method":"initialized"}"#).unwrap();
        assert!(req.is_notification());
        assert!(req.params.is_none());
    }

    #[test]
    fn test_params() {
        #[derive(Debug, Deserialize)]
        struct P {
            id: String,
        }
        let req: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"method":"x","params":{"id":"smartJoin"}}"#).unwrap();
        assert_eq!(req.params::<P>().unwrap().id, "smartJoin");

        let req: RpcRequest = serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"method":"x"}"#).unwrap();
        assert_eq!(req.params::<P>().unwrap_err().code, INVALID_PARAMS);
    }

    #[test]
    fn test_error_mapping() {
        let err: RpcError = PasteError::UnknownCommand("nope".into()).into();
        assert_eq!(err.code, INVALID_PARAMS);
        assert_eq!(err.data, Some(json!({ "code": "UNKNOWN_COMMAND" })));

        let err: RpcError = PasteError::UnsupportedKind("video".into()).into();
        assert_eq!(err.code, INTERNAL_ERROR);
        assert_eq!(err.message, "unsupported input type: video");
    }

    #[test]
    fn test_response_shape() {
        let ok = serde_json::to_value(RpcResponse::success(Some(json!(1)), json!({}))).unwrap();
        assert_eq!(ok, json!({ "jsonrpc": "2.0", "id": 1, "result": {} }));

        let err = serde_json::to_value(RpcResponse::failure(None, RpcError::method_not_found("x"))).unwrap();
        assert_eq!(err["error"]["code"], json!(-32601));
        assert!(err.get("id").is_none());
    }
}
