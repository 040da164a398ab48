//! Wire shapes exchanged with the DigitalOcean Functions runtime.
//!
//! See <https://docs.digitalocean.com/products/functions/reference/runtimes/>.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Invocation payload delivered to a web function.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Event {
    #[serde(default)]
    pub http: HttpEvent,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Invocation metadata. Read-only; handed to the server untouched.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    #[serde(default)]
    pub activation_id: String,
    #[serde(default)]
    pub api_host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Epoch milliseconds after which the platform kills the invocation.
    #[serde(default)]
    pub deadline: u64,
    /// `/<namespace>/<package>/<function>`
    #[serde(default)]
    pub function_name: String,
    #[serde(default)]
    pub function_version: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub request_id: String,
}

/// Response shape the platform turns back into an HTTP response.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl FunctionResponse {
    pub const FAILURE_STATUS: u16 = 500;

    /// The fixed `{ statusCode: 500 }` answer used for every unhandled error.
    pub fn failure() -> Self {
        Self {
            status_code: Self::FAILURE_STATUS,
            headers: None,
            body: None,
        }
    }
}
