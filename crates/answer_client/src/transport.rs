use std::time::Duration;

use answer_core::{SessionId, StreamChunk};
use answer_logging::{answer_debug, answer_info};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;

use crate::frame::FrameDecoder;
use crate::{AskRequest, FailureKind, TransportError};

#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// API root; `/ask` and `/ask/cancel/{session_id}` are appended to it.
    pub base_url: String,
    /// Bearer token sent on every request when present.
    pub token: Option<String>,
    pub connect_timeout: Duration,
    /// Longest silence tolerated between two body chunks of an answer stream.
    pub read_timeout: Duration,
    pub cancel_timeout: Duration,
    pub max_frame_bytes: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: "https://ai.dastgheibqoba.info/api".to_string(),
            token: None,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(120),
            cancel_timeout: Duration::from_secs(5),
            max_frame_bytes: 1024 * 1024,
        }
    }
}

pub trait ChunkSink: Send + Sync {
    fn emit(&self, chunk: StreamChunk);
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Streams decoded chunks into `sink`. Returns once the body ends or right
    /// after the first terminal chunk.
    async fn ask(&self, request: &AskRequest, sink: &dyn ChunkSink) -> Result<(), TransportError>;

    /// Asks the backend to stop generating for `session_id`.
    async fn cancel(&self, session_id: &SessionId) -> Result<(), TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .read_timeout(settings.read_timeout)
            .build()
            .map_err(|err| TransportError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, TransportError> {
        let mut url = reqwest::Url::parse(&self.settings.base_url)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| TransportError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.settings.token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn ask(&self, request: &AskRequest, sink: &dyn ChunkSink) -> Result<(), TransportError> {
        let url = self.endpoint(&["ask"])?;
        let body = serde_json::to_vec(request)
            .map_err(|err| TransportError::new(FailureKind::InvalidRequest, err.to_string()))?;

        let response = self
            .authorize(self.client.post(url))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.bytes().await {
                Ok(body) => rejection_detail(&body),
                Err(err) => {
                    answer_debug!("Could not read rejection body: {}", err);
                    None
                }
            };
            return Err(TransportError::new(
                FailureKind::Rejected {
                    status: status.as_u16(),
                    detail,
                },
                status.to_string(),
            ));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);
        if is_json {
            // The backend answers with a plain JSON object when it has nothing to search.
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            for chunk in direct_answer_chunks(&body)? {
                sink.emit(chunk);
            }
            return Ok(());
        }

        let mut decoder = FrameDecoder::new(self.settings.max_frame_bytes);
        let mut stream = response.bytes_stream();
        while let Some(bytes) = stream.next().await {
            let bytes = bytes.map_err(map_reqwest_error)?;
            for chunk in decoder.push(&bytes) {
                let terminal = chunk.is_terminal();
                sink.emit(chunk);
                if terminal {
                    return Ok(());
                }
            }
        }
        if let Some(chunk) = decoder.finish() {
            sink.emit(chunk);
        }
        Ok(())
    }

    async fn cancel(&self, session_id: &SessionId) -> Result<(), TransportError> {
        let url = self.endpoint(&["ask", "cancel", session_id.as_str()])?;
        let response = self
            .authorize(self.client.post(url))
            .timeout(self.settings.cancel_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(
                FailureKind::Rejected {
                    status: status.as_u16(),
                    detail: None,
                },
                status.to_string(),
            ));
        }
        answer_info!("Cancel sent for session {}", session_id);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

fn rejection_detail(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail)
}

#[derive(Debug, Deserialize)]
struct DirectAnswer {
    answer: String,
    #[serde(default)]
    sources: Vec<answer_core::Source>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    found_in_docs: bool,
}

fn direct_answer_chunks(body: &[u8]) -> Result<[StreamChunk; 2], TransportError> {
    let direct: DirectAnswer = serde_json::from_slice(body)
        .map_err(|err| TransportError::new(FailureKind::Protocol, err.to_string()))?;
    Ok([
        StreamChunk::Answer {
            content: direct.answer,
        },
        StreamChunk::Done {
            sources: direct.sources,
            keywords: direct.keywords,
            found_in_docs: direct.found_in_docs,
        },
    ])
}

fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or(content_type).trim();
    mime.eq_ignore_ascii_case("application/json")
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}
