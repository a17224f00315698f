//! # 请求发送模块
//!
//! ## 设计思路
//!
//! 把“已构建好的载荷 → HTTP 请求”这一步收敛到单一实现：
//! JSON 载荷走 `application/json`，multipart 载荷走 `multipart/form-data`，
//! 两种形态各自由 `reqwest` 设置内容类型，调用方不手写 header。
//!
//! ## 实现思路
//!
//! - 客户端在构造时创建一次并复用，超时参数来自 `ApiClientConfig`。
//! - Bearer 凭据为显式配置，不读全局存储；未配置则不携带。
//! - 非 2xx 响应优先透传后端响应体中的错误文案
//!   （`errorMessages` 数组或 `message` 字段），取不到时用通用兜底文案。
//! - 网络错误按超时 / 连接失败 / 其他分流映射到 `AppError`。

use std::time::{Duration, Instant};

use serde_json::Value;

use crate::entity::EntityKind;
use crate::error::AppError;
use crate::payload::{FormPart, SubmissionPayload};

/// 客户端配置。
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// 后端基地址（如 `https://api.example.com`）。
    pub base_url: String,
    /// Bearer 凭据；由调用方显式传入，本层不负责鉴权逻辑。
    pub bearer_token: Option<String>,
    /// 请求总超时（秒）。
    pub request_timeout_secs: u64,
    /// 建立连接超时（秒）。
    pub connect_timeout_secs: u64,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 8,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// 提交结果。
///
/// `image_url` 为后端解析后的图片地址（可能是存储路径），
/// 编辑表单用它回填 `StoredPath` 引用。
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub status: u16,
    pub image_url: Option<String>,
    pub body: Value,
}

/// REST 提交客户端。
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// 根据配置创建客户端，内部 HTTP 客户端复用以减少握手开销。
    pub fn new(config: ApiClientConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| AppError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;

        Ok(Self { http, config })
    }

    /// 创建实体（`POST`）。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use food_order_client::client::{ApiClient, ApiClientConfig};
    /// use food_order_client::entity::EntityKind;
    ///
    /// # async fn demo(payload: food_order_client::payload::SubmissionPayload) -> Result<(), food_order_client::error::AppError> {
    /// let client = ApiClient::new(ApiClientConfig::new("https://api.example.com"))?;
    /// let outcome = client.create(EntityKind::Category, payload).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(
        &self,
        entity: EntityKind,
        payload: SubmissionPayload,
    ) -> Result<SubmitOutcome, AppError> {
        self.send(
            reqwest::Method::POST,
            entity.create_path().to_string(),
            entity,
            payload,
        )
        .await
    }

    /// 更新实体（`PUT`）。
    pub async fn update(
        &self,
        entity: EntityKind,
        id: u64,
        payload: SubmissionPayload,
    ) -> Result<SubmitOutcome, AppError> {
        self.send(reqwest::Method::PUT, entity.update_path(id), entity, payload)
            .await
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: String,
        entity: EntityKind,
        payload: SubmissionPayload,
    ) -> Result<SubmitOutcome, AppError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        log::info!("📤 提交 {} 表单 - {} {}", entity, method, url);
        let started = Instant::now();

        let mut request = self.http.request(method, &url);

        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        request = match payload {
            SubmissionPayload::Json(body) => request.json(&body),
            SubmissionPayload::Multipart(parts) => request.multipart(Self::to_multipart(parts)?),
        };

        let response = request.send().await.map_err(|e| self.map_send_error(e))?;
        let outcome = Self::handle_response(response).await?;

        log::info!(
            "✅ 表单提交完成 - HTTP {} elapsed={}ms",
            outcome.status,
            started.elapsed().as_millis()
        );

        Ok(outcome)
    }

    /// 把结构化部件列表转换为 `reqwest` multipart 表单。
    fn to_multipart(parts: Vec<FormPart>) -> Result<reqwest::multipart::Form, AppError> {
        let mut form = reqwest::multipart::Form::new();

        for part in parts {
            match part {
                FormPart::Text { name, value } => {
                    form = form.text(name, value);
                }
                FormPart::Binary {
                    name,
                    filename,
                    mime,
                    bytes,
                } => {
                    let binary = reqwest::multipart::Part::bytes(bytes.to_vec())
                        .file_name(filename)
                        .mime_str(&mime)
                        .map_err(|e| AppError::Network(format!("非法的 MIME 类型：{}", e)))?;
                    form = form.part(name, binary);
                }
            }
        }

        Ok(form)
    }

    async fn handle_response(response: reqwest::Response) -> Result<SubmitOutcome, AppError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("读取响应失败：{}", e)))?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            let message = extract_backend_message(&body)
                .unwrap_or_else(|| "请求失败，请稍后重试".to_string());
            return Err(AppError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let image_url = extract_image_url(&body);
        Ok(SubmitOutcome {
            status: status.as_u16(),
            image_url,
            body,
        })
    }

    /// 统一映射 reqwest 错误到业务错误。
    fn map_send_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(format!("请求超时（{}秒）", self.config.request_timeout_secs))
        } else if e.is_connect() {
            AppError::Network(format!("无法连接：{}", e))
        } else {
            AppError::Network(format!("请求失败：{}", e))
        }
    }
}

/// 从非 2xx 响应体中提取后端错误文案。
fn extract_backend_message(body: &Value) -> Option<String> {
    if let Some(messages) = body.get("errorMessages").and_then(Value::as_array) {
        let collected: Vec<&str> = messages.iter().filter_map(Value::as_str).collect();
        if !collected.is_empty() {
            return Some(collected.join("；"));
        }
    }

    body.get("message").and_then(Value::as_str).map(str::to_string)
}

/// 从成功响应体中提取解析后的图片地址（顶层或 `result` 包装内）。
fn extract_image_url(body: &Value) -> Option<String> {
    body.get("imageUrl")
        .or_else(|| body.get("result").and_then(|result| result.get("imageUrl")))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::ScalarField;
    use crate::payload::{build_submission, Operation};
    use crate::image_form::{ImageFieldConfig, ImageReference};
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// 读取完整 HTTP 请求：先收齐头部，再按 Content-Length 收齐 body。
    fn read_http_request(stream: &mut TcpStream) -> (String, Vec<u8>) {
        let mut data = Vec::new();
        let mut tmp = [0u8; 4096];

        let header_end = loop {
            let n = stream.read(&mut tmp).expect("read request failed");
            if n == 0 {
                break data.len();
            }
            data.extend_from_slice(&tmp[..n]);
            if let Some(pos) = find_subsequence(&data, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&data[..header_end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);

        let mut body = data[header_end..].to_vec();
        while body.len() < content_length {
            let n = stream.read(&mut tmp).expect("read body failed");
            if n == 0 {
                break;
            }
            body.extend_from_slice(&tmp[..n]);
        }

        (headers, body)
    }

    fn write_json_response(stream: &mut TcpStream, status_line: &str, body: &str) {
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream
            .write_all(response.as_bytes())
            .expect("write response failed");
        stream.flush().expect("flush failed");
    }

    fn spawn_stub_server(
        status_line: &'static str,
        response_body: &'static str,
    ) -> (u16, thread::JoinHandle<(String, Vec<u8>)>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let port = listener.local_addr().expect("read local addr failed").port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");
            let request = read_http_request(&mut stream);
            write_json_response(&mut stream, status_line, response_body);
            request
        });

        (port, handle)
    }

    fn category_json_payload() -> SubmissionPayload {
        let scalars = vec![
            ScalarField::text("name", "饮品"),
            ScalarField::flag("isActive", true),
        ];
        build_submission(
            &ImageReference::RemoteUrl("https://x/a.png".to_string()),
            &scalars,
            &ImageFieldConfig::with_prefixes(["/CategoryImages/"]),
            Operation::Create,
        )
        .expect("build should succeed")
    }

    #[tokio::test]
    async fn create_sends_json_body_with_bearer_token() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (port, server) = spawn_stub_server(
            "200 OK",
            r#"{"result":{"imageUrl":"/CategoryImages/new.png"}}"#,
        );

        let config = ApiClientConfig::new(format!("http://127.0.0.1:{}", port))
            .with_bearer_token("test-token");
        let client = ApiClient::new(config).expect("client init failed");

        let outcome = client
            .create(EntityKind::Category, category_json_payload())
            .await
            .expect("create should succeed");

        let (headers, body) = server.join().expect("server thread failed");
        let headers_lower = headers.to_lowercase();

        assert!(headers_lower.starts_with("post /api/category http/1.1"));
        assert!(headers_lower.contains("authorization: bearer test-token"));
        assert!(headers_lower.contains("content-type: application/json"));

        let sent: Value = serde_json::from_slice(&body).expect("request body should be json");
        assert_eq!(sent["name"], "饮品");
        assert_eq!(sent["imageUrl"], "https://x/a.png");

        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.image_url.as_deref(), Some("/CategoryImages/new.png"));
    }

    #[tokio::test]
    async fn update_sends_multipart_body_with_url_text_field() {
        let (port, server) = spawn_stub_server("200 OK", r#"{"imageUrl":"https://x/a.png"}"#);

        let scalars = vec![ScalarField::text("name", "饮品")];
        let payload = build_submission(
            &ImageReference::RemoteUrl("https://x/a.png".to_string()),
            &scalars,
            &ImageFieldConfig::with_prefixes(["/CategoryImages/"]),
            Operation::Update { scalars_changed: true },
        )
        .expect("build should succeed");

        let client = ApiClient::new(ApiClientConfig::new(format!("http://127.0.0.1:{}", port)))
            .expect("client init failed");

        let outcome = client
            .update(EntityKind::Category, 7, payload)
            .await
            .expect("update should succeed");

        let (headers, body) = server.join().expect("server thread failed");
        let headers_lower = headers.to_lowercase();

        assert!(headers_lower.starts_with("put /api/category/7 http/1.1"));
        assert!(headers_lower.contains("content-type: multipart/form-data"));

        // 文本字段 ImageUrl 携带地址；无二进制 image 部件
        assert!(find_subsequence(&body, b"name=\"ImageUrl\"").is_some());
        assert!(find_subsequence(&body, b"https://x/a.png").is_some());
        assert!(find_subsequence(&body, b"name=\"image\"").is_none());

        assert_eq!(outcome.image_url.as_deref(), Some("https://x/a.png"));
    }

    #[tokio::test]
    async fn backend_error_messages_are_surfaced_verbatim() {
        let (port, server) = spawn_stub_server(
            "400 Bad Request",
            r#"{"errorMessages":["分类名称已存在","图片不合法"]}"#,
        );

        let client = ApiClient::new(ApiClientConfig::new(format!("http://127.0.0.1:{}", port)))
            .expect("client init failed");

        let result = client
            .create(EntityKind::Category, category_json_payload())
            .await;
        server.join().expect("server thread failed");

        match result {
            Err(AppError::Backend { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "分类名称已存在；图片不合法");
            }
            other => panic!("expected backend error, got {:?}", other.map(|o| o.status)),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_falls_back_to_generic_message() {
        let (port, server) = spawn_stub_server("500 Internal Server Error", "boom");

        let client = ApiClient::new(ApiClientConfig::new(format!("http://127.0.0.1:{}", port)))
            .expect("client init failed");

        let result = client
            .create(EntityKind::Category, category_json_payload())
            .await;
        server.join().expect("server thread failed");

        match result {
            Err(AppError::Backend { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "请求失败，请稍后重试");
            }
            other => panic!("expected backend error, got {:?}", other.map(|o| o.status)),
        }
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        // 端口先占后放，保证无人监听
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
            listener.local_addr().expect("read local addr failed").port()
        };

        let client = ApiClient::new(ApiClientConfig::new(format!("http://127.0.0.1:{}", port)))
            .expect("client init failed");

        let result = client
            .create(EntityKind::Category, category_json_payload())
            .await;

        assert!(matches!(result, Err(AppError::Network(_))));
    }
}
