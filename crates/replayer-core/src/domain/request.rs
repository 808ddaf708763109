//! Transport-level request/response shapes.
//!
//! A `TransportRequest` is built fresh per execution, owned by the unit that
//! built it and dropped once the transport call returns. Nothing here is
//! persisted.

use std::fmt;

use super::envelope::FormSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the transport should treat the downloaded payload.
///
/// The builder only picks the shape; decoding is a transport concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestShape {
    Plain,
    Texture,
    AudioClip { audio_type: Option<String> },
    AssetBundle,
}

impl RequestShape {
    /// Media shapes download the whole body before the call is considered done.
    pub fn is_media(&self) -> bool {
        !matches!(self, RequestShape::Plain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Bytes(Vec<u8>),
    Form(Vec<FormSection>),
}

/// An executable request descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub target: String,
    pub body: Option<RequestBody>,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub shape: RequestShape,
}

impl TransportRequest {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            body: None,
            content_type: None,
            headers: Vec::new(),
            shape: RequestShape::Plain,
        }
    }

    pub fn with_shape(mut self, shape: RequestShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }
}

/// What the transport observed when the call returned (as opposed to faulting).
///
/// `error` carries a transport-reported problem such as a timeout or a refused
/// connection; `status` is absent in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: Option<u16>,
    pub error: Option<String>,
    pub bytes_received: u64,
}

impl TransportResponse {
    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            error: None,
            bytes_received: 0,
        }
    }

    pub fn reported_error(error: impl Into<String>) -> Self {
        Self {
            status: None,
            error: Some(error.into()),
            bytes_received: 0,
        }
    }

    pub fn with_bytes_received(mut self, bytes: u64) -> Self {
        self.bytes_received = bytes;
        self
    }

    /// 2xx and no transport-reported error.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && matches!(self.status, Some(s) if (200..300).contains(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::ok(TransportResponse::with_status(200), true)]
    #[case::no_content(TransportResponse::with_status(204), true)]
    #[case::redirect(TransportResponse::with_status(302), false)]
    #[case::not_found(TransportResponse::with_status(404), false)]
    #[case::server_error(TransportResponse::with_status(503), false)]
    #[case::timeout(TransportResponse::reported_error("timed out"), false)]
    fn success_means_2xx_without_error(#[case] response: TransportResponse, #[case] ok: bool) {
        assert_eq!(response.is_success(), ok);
    }

    #[test]
    fn status_with_error_is_not_success() {
        let mut response = TransportResponse::with_status(200);
        response.error = Some("body truncated".to_string());
        assert!(!response.is_success());
    }
}
