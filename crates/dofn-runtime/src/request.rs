use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Method, Request, Uri};

use crate::body::Body;
use crate::error::ShimError;
use crate::event::{Context, Event, HttpEvent};

/// Raw query string of the invocation, stored in request extensions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryString(pub Option<String>);

/// Decode the event body: base64 when flagged, UTF-8 bytes otherwise.
///
/// Returns `None` when the event carries no body. The platform sends an empty
/// string for body-less requests, so that is treated as no body as well.
pub fn decode_body(http: &HttpEvent) -> Result<Option<Bytes>, ShimError> {
    let raw = match http.body.as_deref() {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    let bytes = if http.is_base64_encoded {
        Bytes::from(STANDARD.decode(raw)?)
    } else {
        Bytes::copy_from_slice(raw.as_bytes())
    };
    Ok(Some(bytes))
}

/// Build the standard request the server sees for one invocation.
///
/// The URI is `apiHost + path`, with the raw query string appended as-is.
/// Nothing is re-encoded or normalized.
pub fn into_request(
    event: &Event,
    context: &Context,
    body: Option<Bytes>,
) -> Result<Request<Body>, ShimError> {
    let http = &event.http;
    let uri = build_uri(&context.api_host, &http.path, http.query_string.as_deref())?;
    let method = into_method(&http.method)?;

    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in &http.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| ShimError::invalid_request(format!("header `{name}`: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| ShimError::invalid_request(format!("header `{name}`: {err}")))?;
        builder = builder.header(name, value);
    }

    let body = match body {
        Some(bytes) => Body::streamed(bytes),
        None => Body::absent(),
    };

    let mut request = builder.body(body)?;
    request.extensions_mut().insert(context.clone());
    request
        .extensions_mut()
        .insert(QueryString(http.query_string.clone()));
    Ok(request)
}

fn build_uri(api_host: &str, path: &str, query: Option<&str>) -> Result<Uri, ShimError> {
    let mut target = format!("{api_host}{path}");
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    Uri::try_from(target.as_str())
        .map_err(|err| ShimError::invalid_request(format!("invalid URI `{target}`: {err}")))
}

fn into_method(method: &str) -> Result<Method, ShimError> {
    if method.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|err| ShimError::invalid_request(format!("method `{method}`: {err}")))
}
