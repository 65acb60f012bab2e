use crate::domain::model::UploadResponse;
use crate::domain::ports::{ConfigProvider, SessionStore};
use crate::utils::error::{ClientError, Result, LOGIN_PATH};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// REST API 的薄封裝：附加 bearer token、處理 401、轉換錯誤
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new<C: ConfigProvider>(config: &C, session: Arc<dyn SessionStore>) -> Result<Self> {
        crate::utils::validation::validate_url("api_base_url", config.api_base_url())?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            base_url: config.api_base_url().trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(session) = self.session.load()? {
            request = request.bearer_auth(session.token);
        }
        Ok(request)
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Network error: {}", e);
                return Err(ClientError::NetworkError(e));
            }
        };

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 {
            tracing::warn!("Received 401, clearing session and redirecting to {}", LOGIN_PATH);
            self.session.clear()?;
            return Err(ClientError::UnauthorizedError {
                redirect_to: LOGIN_PATH.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        tracing::error!("HTTP error {}: {}", status.as_u16(), message);
        Err(ClientError::from_status(status.as_u16(), message))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.dispatch(request).await?;
        let bytes = response.bytes().await?;
        // 空回應視為 JSON null，讓 `()` 與 Option 之類的型別可以接受
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_json(self.request(Method::GET, path)?).await
    }

    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        self.send_json(self.request(Method::GET, path)?.query(query))
            .await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(self.request(Method::POST, path)?.json(body))
            .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(self.request(Method::PUT, path)?.json(body))
            .await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send_json(self.request(Method::PATCH, path)?.json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.dispatch(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// multipart 表單送出（新增/編輯寵物、上傳圖片）
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<T> {
        self.send_json(self.request(method, path)?.multipart(form))
            .await
    }

    /// 上傳單一檔案，回傳伺服器儲存後的網址
    pub async fn upload_file(&self, path: &str, field: &str, file: &Path) -> Result<String> {
        let part = file_part(file).await?;
        let form = Form::new().part(field.to_string(), part);
        let response: UploadResponse = self.send_multipart(Method::POST, path, form).await?;
        Ok(response.url)
    }
}

/// 讀取本機檔案並依副檔名設定 MIME type
pub async fn file_part(file: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(file).await?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(file))?;
    Ok(part)
}

fn mime_for(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
