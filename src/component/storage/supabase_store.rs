use super::{BlobStore, StoredObject};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use anyhow::{Context, Result};
use log::debug;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 每次列表請求的筆數上限
const LIST_PAGE_SIZE: usize = 1000;

/// Supabase Storage REST 客戶端
pub struct SupabaseStore {
    http: Client,
    base_url: Url,
    api_key: String,
    bucket: String,
}

#[derive(Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: usize,
    offset: usize,
    #[serde(rename = "sortBy")]
    sort_by: SortBy,
}

#[derive(Serialize)]
struct SortBy {
    column: &'static str,
    order: &'static str,
}

#[derive(Deserialize)]
struct ListEntry {
    name: String,
    metadata: Option<ObjectMetadata>,
}

#[derive(Deserialize)]
struct ObjectMetadata {
    mimetype: Option<String>,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    prefixes: [&'a str; 1],
}

impl SupabaseStore {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("無效的 SUPABASE_URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("無效的 SUPABASE_URL: {base_url}");
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("無法建立 HTTP 客戶端")?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            bucket: bucket.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.supabase_url.as_deref().context("缺少 SUPABASE_URL")?;
        let key = config.supabase_key.clone().context("缺少 SUPABASE_KEY")?;
        let bucket = config
            .supabase_bucket
            .clone()
            .context("缺少 SUPABASE_BUCKET")?;
        Self::new(url, key, bucket, config.http_timeout())
    }

    /// `<base>/storage/v1/<route...>/<remote_path>`，每段路徑各自編碼
    fn endpoint(&self, route: &[&str], remote_path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["storage", "v1"])
                .extend(route)
                .extend(remote_path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn object_url(&self, remote_path: &str) -> Url {
        self.endpoint(&["object", self.bucket.as_str()], remote_path)
    }

    /// 公開讀取網址
    #[must_use]
    pub fn public_url(&self, remote_path: &str) -> String {
        self.endpoint(&["object", "public", self.bucket.as_str()], remote_path)
            .to_string()
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
    }

    fn list_page(&self, prefix: &str, offset: usize) -> Result<Vec<ListEntry>, String> {
        let url = self.endpoint(&["object", "list", self.bucket.as_str()], "");
        let body = ListRequest {
            prefix,
            limit: LIST_PAGE_SIZE,
            offset,
            sort_by: SortBy {
                column: "name",
                order: "asc",
            },
        };

        let response = self
            .authorized(self.http.post(url))
            .json(&body)
            .send()
            .map_err(|e| e.to_string())?;
        let response = ensure_success(response)?;
        response.json().map_err(|e| e.to_string())
    }
}

/// 非 2xx 回應轉為包含狀態碼與內容的錯誤訊息
fn ensure_success(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(format!("HTTP {status}: {body}"))
}

impl BlobStore for SupabaseStore {
    fn list(&self, prefix: &str) -> PipelineResult<Vec<StoredObject>> {
        let list_error = |message: String| PipelineError::List {
            prefix: prefix.to_string(),
            message,
        };

        let mut objects = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.list_page(prefix, offset).map_err(list_error)?;
            let page_len = page.len();

            // 沒有 metadata 的項目是資料夾
            objects.extend(page.into_iter().filter_map(|entry| {
                let metadata = entry.metadata?;
                Some(StoredObject {
                    name: entry.name,
                    mime_type: metadata
                        .mimetype
                        .unwrap_or_else(|| "application/octet-stream".to_string()),
                })
            }));

            if page_len < LIST_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }

        debug!("佇列 {prefix} 共 {} 個檔案", objects.len());
        Ok(objects)
    }

    fn download(&self, remote_path: &str) -> PipelineResult<Vec<u8>> {
        let download_error = |message: String| PipelineError::Download {
            remote_path: remote_path.to_string(),
            message,
        };

        let response = self
            .authorized(self.http.get(self.object_url(remote_path)))
            .send()
            .map_err(|e| download_error(e.to_string()))?;
        let response = ensure_success(response).map_err(download_error)?;
        let bytes = response
            .bytes()
            .map_err(|e| download_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn upload(&self, remote_path: &str, bytes: Vec<u8>, mime_type: &str) -> PipelineResult<String> {
        let upload_error = |message: String| PipelineError::Upload {
            remote_path: remote_path.to_string(),
            message,
        };

        let response = self
            .authorized(self.http.post(self.object_url(remote_path)))
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .map_err(|e| upload_error(e.to_string()))?;
        ensure_success(response).map_err(upload_error)?;

        Ok(self.public_url(remote_path))
    }

    fn delete(&self, remote_path: &str) -> PipelineResult<()> {
        let delete_error = |message: String| PipelineError::Delete {
            remote_path: remote_path.to_string(),
            message,
        };

        let url = self.endpoint(&["object", self.bucket.as_str()], "");
        let response = self
            .authorized(self.http.delete(url))
            .json(&DeleteRequest {
                prefixes: [remote_path],
            })
            .send()
            .map_err(|e| delete_error(e.to_string()))?;
        ensure_success(response).map_err(delete_error)?;
        Ok(())
    }
}
