use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use crate::env::Environment;
use crate::error::ShimError;
use crate::event::{Context, Event, FunctionResponse};
use crate::request::{decode_body, into_request};
use crate::response::from_response;
use crate::server::Server;

/// Top-level handler for DigitalOcean Functions invocations.
///
/// Every invocation yields exactly one `FunctionResponse`. Any failure,
/// including a panicking server, is logged and answered with
/// `{ statusCode: 500 }`.
pub struct Shim<S: Server> {
    manifest: S::Manifest,
    env: Environment,
    reuse_server: bool,
    server: OnceCell<Arc<S>>,
}

impl<S: Server> Shim<S> {
    pub fn new(manifest: S::Manifest, env: Environment) -> Self {
        Self {
            manifest,
            env,
            reuse_server: false,
            server: OnceCell::new(),
        }
    }

    /// Keep the first successfully initialized server for later invocations.
    ///
    /// Off by default: each invocation builds and initializes its own server.
    #[must_use]
    pub fn reuse_server(mut self, reuse: bool) -> Self {
        self.reuse_server = reuse;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub async fn handle(&self, event: Event, context: Context) -> FunctionResponse {
        log::debug!(
            "invocation {} ({}): {} {} query={:?} headers={}",
            context.activation_id,
            context.function_name,
            event.http.method,
            event.http.path,
            event.http.query_string,
            event.http.headers.len()
        );

        let outcome = AssertUnwindSafe(self.try_handle(&event, &context))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                log::error!("{}", err);
                log::error!("{:?}", err);
                FunctionResponse::failure()
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("server panicked: {}", message);
                FunctionResponse::failure()
            }
        }
    }

    /// Like [`Shim::handle`], for raw JSON values as delivered by the platform.
    pub async fn handle_value(&self, event: Value, context: Value) -> Value {
        let parsed = serde_json::from_value::<Event>(event)
            .and_then(|event| Ok((event, serde_json::from_value::<Context>(context)?)))
            .map_err(ShimError::invalid_event);

        let response = match parsed {
            Ok((event, context)) => self.handle(event, context).await,
            Err(err) => {
                log::error!("{}", err);
                log::error!("{:?}", err);
                FunctionResponse::failure()
            }
        };

        serde_json::to_value(&response)
            .unwrap_or_else(|_| json!({ "statusCode": FunctionResponse::FAILURE_STATUS }))
    }

    /// Like [`Shim::handle_value`], for serialized JSON documents.
    pub async fn handle_json(&self, event: &str, context: &str) -> String {
        let response = match (
            serde_json::from_str::<Value>(event),
            serde_json::from_str::<Value>(context),
        ) {
            (Ok(event), Ok(context)) => self.handle_value(event, context).await,
            (Err(err), _) | (_, Err(err)) => {
                let err = ShimError::invalid_event(err);
                log::error!("{}", err);
                log::error!("{:?}", err);
                json!({ "statusCode": FunctionResponse::FAILURE_STATUS })
            }
        };
        response.to_string()
    }

    async fn try_handle(
        &self,
        event: &Event,
        context: &Context,
    ) -> Result<FunctionResponse, ShimError> {
        let server = self.server().await?;

        let body = decode_body(&event.http)?;
        log::debug!(
            "decoded body: {}",
            body.as_ref()
                .map(|bytes| format!("{} bytes", bytes.len()))
                .unwrap_or_else(|| "none".to_string())
        );

        let request = into_request(event, context, body)?;
        log::debug!("{} {}", request.method(), request.uri());

        let response = server.respond(request).await?;
        log::debug!("server responded with {}", response.status());

        from_response(response).await
    }

    async fn server(&self) -> Result<Arc<S>, ShimError> {
        if self.reuse_server {
            self.server
                .get_or_try_init(|| self.init_server())
                .await
                .cloned()
        } else {
            self.init_server().await
        }
    }

    async fn init_server(&self) -> Result<Arc<S>, ShimError> {
        let mut server = S::from_manifest(&self.manifest);
        server.init(&self.env).await?;
        log::debug!("initialized server");
        Ok(Arc::new(server))
    }
}
