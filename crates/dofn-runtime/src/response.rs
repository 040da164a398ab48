use std::collections::BTreeMap;

use http::Response;

use crate::body::Body;
use crate::error::ShimError;
use crate::event::FunctionResponse;

/// Convert a server response into the platform response shape.
///
/// Headers are flattened into a single-valued map: when a name repeats, the
/// last value wins. The body is collected in full and decoded as UTF-8
/// (invalid sequences are replaced).
pub async fn from_response(response: Response<Body>) -> Result<FunctionResponse, ShimError> {
    let (parts, body) = response.into_parts();

    let mut headers = BTreeMap::new();
    for (name, value) in parts.headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers.insert(name.as_str().to_string(), value);
    }

    let bytes = body.collect().await.map_err(ShimError::body)?;

    Ok(FunctionResponse {
        status_code: parts.status.as_u16(),
        headers: Some(headers),
        body: Some(String::from_utf8_lossy(&bytes).into_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::executor::block_on;
    use futures_util::stream;

    #[test]
    fn propagates_status_headers_and_body() {
        let response = Response::builder()
            .status(200)
            .header("content-type", "text/plain")
            .body(Body::from("ok"))
            .expect("response");

        let translated = block_on(from_response(response)).expect("translate");
        assert_eq!(translated.status_code, 200);
        assert_eq!(
            translated.headers,
            Some(BTreeMap::from([(
                "content-type".to_string(),
                "text/plain".to_string()
            )]))
        );
        assert_eq!(translated.body.as_deref(), Some("ok"));
    }

    #[test]
    fn repeated_headers_keep_last_value() {
        let response = Response::builder()
            .status(201)
            .header("set-cookie", "a=1")
            .header("set-cookie", "b=2")
            .body(Body::empty())
            .expect("response");

        let translated = block_on(from_response(response)).expect("translate");
        let headers = translated.headers.expect("headers");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("set-cookie").map(String::as_str), Some("b=2"));
    }

    #[test]
    fn streaming_body_is_collected() {
        let response = Response::builder()
            .status(200)
            .body(Body::stream(stream::iter(vec![
                Bytes::from_static(b"hello"),
                Bytes::from_static(b" "),
                Bytes::from_static(b"world"),
            ])))
            .expect("response");

        let translated = block_on(from_response(response)).expect("translate");
        assert_eq!(translated.body.as_deref(), Some("hello world"));
    }

    #[test]
    fn failing_stream_is_a_body_error() {
        let response = Response::builder()
            .status(200)
            .body(Body::from_stream(stream::iter(vec![Err::<Bytes, _>(
                std::io::Error::other("reset"),
            )])))
            .expect("response");

        let err = block_on(from_response(response)).expect_err("body error");
        assert!(matches!(err, ShimError::Body { .. }));
    }
}
