//! HttpTransport - reqwest による Transport 実装
//!
//! # エラーの振り分け
//! - 返ってきた response（非 2xx 含む）: Ok(TransportResponse)
//! - timeout / 接続失敗: Ok(TransportResponse::reported_error)（failed 扱い）
//! - request が組み立てられない、プロトコルエラー等: Err(TransportError)（exceptioned 扱い）
//!
//! body は常に最後まで読みます。media shape（texture / audio / asset bundle）
//! の場合、2xx でも body が空なら失敗として報告します。中身のデコードはしません。

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

use crate::config::TransportConfig;
use crate::domain::{
    FormSection, Method, ReplayError, RequestBody, RequestShape, TransportError,
    TransportRequest, TransportResponse,
};
use crate::ports::Transport;

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, ReplayError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ReplayError::TransportSetup(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn prepare(&self, request: TransportRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, request.target.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match request.body {
            Some(RequestBody::Bytes(bytes)) => {
                if let Some(content_type) = &request.content_type {
                    builder = builder.header(CONTENT_TYPE, content_type.as_str());
                }
                builder = builder.body(bytes);
            }
            // multipart sets its own content-type with the boundary
            Some(RequestBody::Form(sections)) => {
                builder = builder.multipart(multipart_form(sections)?);
            }
            None => {
                if let Some(content_type) = &request.content_type {
                    builder = builder.header(CONTENT_TYPE, content_type.as_str());
                }
            }
        }
        Ok(builder)
    }
}

fn multipart_form(sections: Vec<FormSection>) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for section in sections {
        let mut part = Part::bytes(section.data.into_bytes());
        if let Some(file_name) = section.file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = section.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        }
        form = form.part(section.name, part);
    }
    Ok(form)
}

fn shape_name(shape: &RequestShape) -> &'static str {
    match shape {
        RequestShape::Plain => "plain",
        RequestShape::Texture => "texture",
        RequestShape::AudioClip { .. } => "audio clip",
        RequestShape::AssetBundle => "asset bundle",
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let shape = request.shape.clone();
        let expects_body = request.method != Method::Head;
        let builder = self.prepare(request)?;

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() || e.is_connect() => {
                return Ok(TransportResponse::reported_error(e.to_string()));
            }
            Err(e) if e.is_builder() => return Err(TransportError::InvalidRequest(e.to_string())),
            Err(e) => return Err(TransportError::Protocol(e.to_string())),
        };

        let status = response.status().as_u16();
        let mut result = TransportResponse::with_status(status);
        match response.bytes().await {
            Ok(body) => {
                result = result.with_bytes_received(body.len() as u64);
                if shape.is_media() && expects_body && body.is_empty() && result.is_success() {
                    result.error = Some(format!("empty {} payload", shape_name(&shape)));
                }
            }
            Err(e) => result.error = Some(format!("body read failed: {e}")),
        }
        Ok(result)
    }
}
