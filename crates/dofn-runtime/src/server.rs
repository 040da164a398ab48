use async_trait::async_trait;
use http::{Request, Response};

use crate::body::Body;
use crate::env::Environment;
use crate::error::ShimError;

/// The framework's server object as seen by the shim.
///
/// The shim never looks inside a server or its manifest: it builds one from
/// the manifest, initializes it once with an explicit environment, and hands
/// it standard requests.
#[async_trait]
pub trait Server: Send + Sync + Sized + 'static {
    type Manifest: Send + Sync + 'static;

    fn from_manifest(manifest: &Self::Manifest) -> Self;

    async fn init(&mut self, env: &Environment) -> Result<(), ShimError>;

    async fn respond(&self, request: Request<Body>) -> Result<Response<Body>, ShimError>;
}
