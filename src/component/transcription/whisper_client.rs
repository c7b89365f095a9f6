use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use log::{debug, info};
use reqwest::blocking::{Client, multipart};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 一段轉錄文字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(rename = "start")]
    pub start_seconds: f64,
    #[serde(rename = "end")]
    pub end_seconds: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

/// 語音轉錄服務
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio_path: &Path) -> PipelineResult<Transcript>;
}

/// OpenAI 相容的 `/audio/transcriptions` 客戶端
pub struct WhisperClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl WhisperClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> PipelineResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Transcription(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// 未設定金鑰時回傳 `None`，轉錄階段會整個略過
    pub fn from_config(config: &Config) -> PipelineResult<Option<Self>> {
        config
            .transcription_key()
            .map(|key| {
                Self::new(
                    config.transcription_endpoint.clone(),
                    config.transcription_model.clone(),
                    key,
                    config.http_timeout(),
                )
            })
            .transpose()
    }
}

impl Transcriber for WhisperClient {
    fn transcribe(&self, audio_path: &Path) -> PipelineResult<Transcript> {
        debug!("上傳音訊至 {}: {}", self.endpoint, audio_path.display());

        let form = multipart::Form::new()
            .file("file", audio_path)
            .map_err(|e| {
                PipelineError::Transcription(format!("無法讀取 {}: {e}", audio_path.display()))
            })?
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| PipelineError::Transcription(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PipelineError::Transcription(format!(
                "轉錄服務回應 {status}: {body}"
            )));
        }

        let body = response
            .text()
            .map_err(|e| PipelineError::Transcription(e.to_string()))?;
        let transcript = parse_transcription_response(&body)?;

        info!("轉錄完成，共 {} 段", transcript.segments.len());
        Ok(transcript)
    }
}

/// 解析 `verbose_json` 回應
pub fn parse_transcription_response(body: &str) -> PipelineResult<Transcript> {
    serde_json::from_str(body)
        .map_err(|e| PipelineError::Transcription(format!("無法解析轉錄回應: {e}")))
}

/// 有設定轉錄服務時才執行，否則回傳 `None`
pub fn transcribe(
    transcriber: Option<&dyn Transcriber>,
    audio_path: &Path,
) -> PipelineResult<Option<Transcript>> {
    match transcriber {
        Some(service) => service.transcribe(audio_path).map(Some),
        None => {
            info!("未設定轉錄金鑰，略過轉錄");
            Ok(None)
        }
    }
}
