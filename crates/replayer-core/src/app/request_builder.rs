//! RequestBuilder - Envelope から TransportRequest への変換
//!
//! kind ごとの request shape を決めるだけの純粋関数です。
//! ダウンロードした payload の解釈（texture / audio / asset bundle）は
//! Transport の責務で、ここでは shape を選ぶだけです。
//!
//! # kind ごとの変換
//! - GET / HEAD: target のみ
//! - POST: body = postData（無ければ form）、content-type
//! - PUT: POST と同じ形で組み立て、method を PUT に付け替える
//! - TEXTURE / AUDIO_CLIP / ASSET_BUNDLE: GET + 専用 shape
//! - DELETE / PATCH / 未知: UnsupportedKind

use crate::domain::{
    Envelope, Method, Payload, RequestBody, RequestKind, RequestShape, TransportRequest,
    UnsupportedKind,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, envelope: &Envelope) -> Result<TransportRequest, UnsupportedKind> {
        let request = match envelope.kind() {
            RequestKind::Get => TransportRequest::new(Method::Get, envelope.target()),
            RequestKind::Head => TransportRequest::new(Method::Head, envelope.target()),
            RequestKind::Post => {
                post_shape(envelope, envelope.type_args().post_data.clone())
            }
            RequestKind::Put => {
                let mut request = post_shape(envelope, envelope.type_args().put_data.clone());
                request.method = Method::Put;
                request
            }
            RequestKind::Texture => TransportRequest::new(Method::Get, envelope.target())
                .with_shape(RequestShape::Texture),
            RequestKind::AudioClip => TransportRequest::new(Method::Get, envelope.target())
                .with_shape(RequestShape::AudioClip {
                    audio_type: envelope.type_args().audio_type.clone(),
                }),
            RequestKind::AssetBundle => TransportRequest::new(Method::Get, envelope.target())
                .with_shape(RequestShape::AssetBundle),
            RequestKind::Delete | RequestKind::Patch | RequestKind::Unknown(_) => {
                return Err(UnsupportedKind(envelope.kind().clone()));
            }
        };

        let headers = envelope.headers().map(parse_header_blob).unwrap_or_default();
        Ok(request.with_headers(headers))
    }
}

fn post_shape(envelope: &Envelope, data: Option<Payload>) -> TransportRequest {
    let args = envelope.type_args();
    let body = match data {
        Some(payload) => Some(RequestBody::Bytes(payload.into_bytes())),
        None if !args.form.is_empty() => Some(RequestBody::Form(args.form.clone())),
        None => None,
    };

    let mut request = TransportRequest::new(Method::Post, envelope.target())
        .with_content_type(args.content_type.clone());
    request.body = body;
    request
}

/// Headers the transport derives from the rebuilt request; recorded values
/// would no longer match it.
const FRAMING_HEADERS: [&str; 4] = ["content-length", "transfer-encoding", "host", "connection"];

/// Parse a raw `Name: value` header blob (CRLF or LF separated).
///
/// Lines without a colon or with an empty name are dropped, as are framing
/// headers (`Content-Length`, `Transfer-Encoding`, `Host`, `Connection`).
pub fn parse_header_blob(blob: &str) -> Vec<(String, String)> {
    blob.lines()
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            let name = name.trim();
            if name.is_empty() || is_framing_header(name) {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn is_framing_header(name: &str) -> bool {
    FRAMING_HEADERS
        .iter()
        .any(|framing| name.eq_ignore_ascii_case(framing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::loader::decode_recording;
    use crate::app::loader::tests::recording_of;
    use crate::domain::{FormSection, TypeArgs};
    use rstest::rstest;

    fn build(envelope: &Envelope) -> Result<TransportRequest, UnsupportedKind> {
        RequestBuilder::new().build(envelope)
    }

    #[test]
    fn get_roundtrips_from_recording() {
        let url = "https://cdn.example.com/path?q=1&x=%20y";
        let doc = recording_of(&[serde_json::json!({"kind": "GET", "target": url})]);
        let loaded = decode_recording(&doc).unwrap();

        let request = build(loaded.batch.get(0).unwrap()).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.target, url);
        assert!(request.body.is_none());
        assert_eq!(request.shape, RequestShape::Plain);
    }

    #[test]
    fn head_has_no_body() {
        let request = build(&Envelope::new(RequestKind::Head, "http://h/")).unwrap();
        assert_eq!(request.method, Method::Head);
        assert!(request.body.is_none());
    }

    #[test]
    fn post_carries_body_and_content_type() {
        let env = Envelope::new(RequestKind::Post, "http://p/").with_type_args(TypeArgs {
            post_data: Some(Payload::Text("{\"a\":1}".to_string())),
            content_type: Some("application/json".to_string()),
            ..TypeArgs::default()
        });
        let request = build(&env).unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(RequestBody::Bytes(b"{\"a\":1}".to_vec())));
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
    }

    #[test]
    fn put_is_retagged_not_post() {
        let env = Envelope::new(RequestKind::Put, "http://p/").with_type_args(TypeArgs {
            post_data: Some(Payload::Text("ignored".to_string())),
            put_data: Some(Payload::Bytes(vec![1, 2, 3])),
            content_type: Some("application/octet-stream".to_string()),
            ..TypeArgs::default()
        });
        let request = build(&env).unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(request.body, Some(RequestBody::Bytes(vec![1, 2, 3])));
        assert_eq!(
            request.content_type.as_deref(),
            Some("application/octet-stream")
        );
    }

    #[test]
    fn post_without_data_falls_back_to_form() {
        let form = vec![FormSection {
            name: "file".to_string(),
            data: Payload::Text("contents".to_string()),
            file_name: Some("a.txt".to_string()),
            content_type: Some("text/plain".to_string()),
        }];
        let env = Envelope::new(RequestKind::Post, "http://p/").with_type_args(TypeArgs {
            form: form.clone(),
            ..TypeArgs::default()
        });
        let request = build(&env).unwrap();
        assert_eq!(request.body, Some(RequestBody::Form(form)));
    }

    #[test]
    fn audio_clip_carries_audio_type() {
        let env = Envelope::new(RequestKind::AudioClip, "http://a/clip.ogg").with_type_args(
            TypeArgs {
                audio_type: Some("OGGVORBIS".to_string()),
                ..TypeArgs::default()
            },
        );
        let request = build(&env).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.shape,
            RequestShape::AudioClip {
                audio_type: Some("OGGVORBIS".to_string())
            }
        );
    }

    #[rstest]
    #[case::texture(RequestKind::Texture, RequestShape::Texture)]
    #[case::asset_bundle(RequestKind::AssetBundle, RequestShape::AssetBundle)]
    fn media_kinds_are_gets_with_a_shape(#[case] kind: RequestKind, #[case] shape: RequestShape) {
        let request = build(&Envelope::new(kind, "http://m/")).unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.shape, shape);
        assert!(request.shape.is_media());
    }

    #[rstest]
    #[case::delete(RequestKind::Delete)]
    #[case::patch(RequestKind::Patch)]
    #[case::unknown(RequestKind::Unknown("TotallyUnknownType".to_string()))]
    fn unbuilt_kinds_are_unsupported(#[case] kind: RequestKind) {
        let err = build(&Envelope::new(kind.clone(), "http://x/")).unwrap_err();
        assert_eq!(err, UnsupportedKind(kind));
    }

    #[test]
    fn header_blob_becomes_extra_headers() {
        let env = Envelope::new(RequestKind::Get, "http://h/")
            .with_headers("X-Trace: abc\r\nAccept: */*\r\nbroken line\r\n: no-name\r\n");
        let request = build(&env).unwrap();
        assert_eq!(
            request.headers,
            vec![
                ("X-Trace".to_string(), "abc".to_string()),
                ("Accept".to_string(), "*/*".to_string()),
            ]
        );
    }

    #[rstest]
    #[case::content_length("Content-Length: 50")]
    #[case::transfer_encoding("Transfer-Encoding: chunked")]
    #[case::host("Host: recorded.example")]
    #[case::connection("connection: keep-alive")]
    #[case::upper_case("CONTENT-LENGTH: 3")]
    fn framing_headers_are_not_replayed(#[case] line: &str) {
        let blob = format!("X-Trace: abc\r\n{line}\r\n");
        assert_eq!(
            parse_header_blob(&blob),
            vec![("X-Trace".to_string(), "abc".to_string())]
        );
    }

    #[test]
    fn post_body_is_not_paired_with_a_recorded_length() {
        let env = Envelope::new(RequestKind::Post, "http://p/")
            .with_type_args(TypeArgs {
                post_data: Some(Payload::Text("x".to_string())),
                ..TypeArgs::default()
            })
            .with_headers("Content-Length: 50\r\nHost: recorded.example\r\nAccept: */*");
        let request = build(&env).unwrap();
        assert_eq!(request.body, Some(RequestBody::Bytes(b"x".to_vec())));
        assert_eq!(
            request.headers,
            vec![("Accept".to_string(), "*/*".to_string())]
        );
    }
}
