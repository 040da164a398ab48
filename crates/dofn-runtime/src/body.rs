use std::fmt;

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};

/// HTTP body carried by shim requests and responses.
///
/// `Absent` and an empty `Once` are different things: some methods forbid a
/// body entirely, so a request built from an event without a body must not
/// carry an empty one.
pub enum Body {
    Absent,
    Once(Bytes),
    Stream(BoxStream<'static, Result<Bytes, anyhow::Error>>),
}

impl Body {
    pub fn absent() -> Self {
        Self::Absent
    }

    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new())
    }

    pub fn from_bytes<B>(bytes: B) -> Self
    where
        B: Into<Bytes>,
    {
        Self::Once(bytes.into())
    }

    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        anyhow::Error: From<E>,
    {
        Self::Stream(stream.map(|res| res.map_err(anyhow::Error::from)).boxed())
    }

    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Bytes> + Send + 'static,
    {
        Self::Stream(stream.map(Ok::<Bytes, anyhow::Error>).boxed())
    }

    /// Wraps a single buffer as a one-chunk byte stream.
    pub fn streamed<B>(bytes: B) -> Self
    where
        B: Into<Bytes>,
    {
        Self::stream(stream::once(futures_util::future::ready(bytes.into())))
    }

    pub fn text<S>(text: S) -> Self
    where
        S: Into<String>,
    {
        Self::from_bytes(text.into().into_bytes())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Body::Absent)
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Body::Stream(_))
    }

    pub fn into_stream(self) -> Option<BoxStream<'static, Result<Bytes, anyhow::Error>>> {
        match self {
            Body::Absent | Body::Once(_) => None,
            Body::Stream(stream) => Some(stream),
        }
    }

    /// Reads the whole body into memory. An absent body collects to an empty buffer.
    pub async fn collect(self) -> Result<Bytes, anyhow::Error> {
        match self {
            Body::Absent => Ok(Bytes::new()),
            Body::Once(bytes) => Ok(bytes),
            Body::Stream(mut stream) => {
                let mut collected = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    collected.extend_from_slice(&chunk?);
                }
                Ok(collected.freeze())
            }
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::absent()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Absent => f.write_str("Body::Absent"),
            Body::Once(bytes) => f
                .debug_struct("Body::Once")
                .field("len", &bytes.len())
                .finish(),
            Body::Stream(_) => f.debug_tuple("Body::Stream").finish(),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::from_bytes(value)
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Once(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::text(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::text(value)
    }
}
