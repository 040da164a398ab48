use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body as AxumBody;
use axum::{Extension, Router};
use http::{Request, Response};
use tower::ServiceExt;

use crate::body::Body;
use crate::env::Environment;
use crate::error::ShimError;
use crate::server::Server;

/// Builds the application router. The manifest of a [`RouterServer`].
#[derive(Clone)]
pub struct RouterManifest {
    build: Arc<dyn Fn() -> Router + Send + Sync>,
}

impl RouterManifest {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn() -> Router + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(build),
        }
    }
}

/// Serves invocations with an axum router.
///
/// `init` exposes the environment to handlers as `Extension<Environment>`.
#[derive(Clone)]
pub struct RouterServer {
    router: Router,
}

impl RouterServer {
    pub fn router(&self) -> &Router {
        &self.router
    }
}

#[async_trait]
impl Server for RouterServer {
    type Manifest = RouterManifest;

    fn from_manifest(manifest: &Self::Manifest) -> Self {
        Self {
            router: (manifest.build)(),
        }
    }

    async fn init(&mut self, env: &Environment) -> Result<(), ShimError> {
        self.router = self.router.clone().layer(Extension(env.clone()));
        Ok(())
    }

    async fn respond(&self, request: Request<Body>) -> Result<Response<Body>, ShimError> {
        let (parts, body) = request.into_parts();
        let request = Request::from_parts(parts, into_axum_body(body));

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(ShimError::server)?;

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(
            parts,
            Body::from_stream(body.into_data_stream()),
        ))
    }
}

fn into_axum_body(body: Body) -> AxumBody {
    match body {
        Body::Absent => AxumBody::empty(),
        Body::Once(bytes) => AxumBody::from(bytes),
        Body::Stream(stream) => AxumBody::from_stream(stream),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use bytes::Bytes;

    fn manifest() -> RouterManifest {
        RouterManifest::new(|| {
            Router::new()
                .route(
                    "/env",
                    get(|Extension(env): Extension<Environment>| async move {
                        env.get("STAGE").unwrap_or("unset").to_string()
                    }),
                )
                .route("/echo", post(|body: Bytes| async move { body }))
        })
    }

    async fn server() -> RouterServer {
        let mut server = RouterServer::from_manifest(&manifest());
        server
            .init(&Environment::new().with_var("STAGE", "prod"))
            .await
            .expect("init");
        server
    }

    #[tokio::test]
    async fn handlers_read_initialized_environment() {
        let server = server().await;
        let request = Request::builder()
            .uri("https://example.com/env")
            .body(Body::absent())
            .unwrap();
        let response = server.respond(request).await.expect("response");
        assert_eq!(response.status(), 200);
        let bytes = response.into_body().collect().await.expect("body");
        assert_eq!(&bytes[..], b"prod");
    }

    #[tokio::test]
    async fn streamed_request_body_reaches_handler() {
        let server = server().await;
        let request = Request::builder()
            .method("POST")
            .uri("https://example.com/echo")
            .body(Body::streamed(Bytes::from_static(b"ping")))
            .unwrap();
        let response = server.respond(request).await.expect("response");
        let bytes = response.into_body().collect().await.expect("body");
        assert_eq!(&bytes[..], b"ping");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = server().await;
        let request = Request::builder()
            .uri("https://example.com/missing")
            .body(Body::absent())
            .unwrap();
        let response = server.respond(request).await.expect("response");
        assert_eq!(response.status(), 404);
    }
}
