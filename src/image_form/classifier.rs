//! # 输入分类模块
//!
//! ## 设计思路
//!
//! 把用户在图片输入框中粘贴的任意字符串识别为三种可接受形式之一：
//! `data:` URI、`http(s)` 绝对地址、实体专属的服务端相对路径。
//! 识别失败时返回校验错误，由调用方阻止提交并提示可接受形式。
//!
//! ## 实现思路
//!
//! - Base64 形式用预编译正则匹配固定子类型白名单，载荷部分不限字符集，
//!   非法 Base64 字符留给解码阶段报解码错误。
//! - URL 形式用 `reqwest::Url` 解析，scheme 仅接受 `http` / `https`。
//! - 本函数为纯函数，不做任何网络或存储 I/O。

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ImageFieldError, ImageReference};

/// `data:image/<子类型>;base64,<载荷>` 匹配模式。
///
/// 子类型白名单固定为 png / jpeg / jpg / gif / bmp。
static DATA_URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:image/(png|jpeg|jpg|gif|bmp);base64,(.*)$")
        .expect("data uri pattern must compile")
});

/// 对原始字符串输入做分类。
///
/// - 首尾空白会被裁剪；空字符串视为“未提供值”，返回校验错误。
/// - `allowed_path_prefixes` 为实体专属的存储路径前缀白名单
///   （如分类为 `/CategoryImages/`，菜品为 `/MenuImages/`）。
///
/// # 示例
/// ```rust,ignore
/// use food_order_client::image_form::{classify, ImageReference};
///
/// let prefixes = vec!["/CategoryImages/".to_string()];
/// let reference = classify("https://cdn.example.com/a.png", &prefixes)?;
/// assert!(matches!(reference, ImageReference::RemoteUrl(_)));
/// # Ok::<(), food_order_client::image_form::ImageFieldError>(())
/// ```
pub fn classify(
    input: &str,
    allowed_path_prefixes: &[String],
) -> Result<ImageReference, ImageFieldError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ImageFieldError::Validation("未提供图片内容".to_string()));
    }

    if let Some(caps) = DATA_URI_PATTERN.captures(trimmed) {
        return Ok(ImageReference::InlineData {
            subtype: caps[1].to_string(),
            payload: caps[2].to_string(),
        });
    }

    // 相对路径无法被解析为绝对 URL，会自然落到前缀匹配分支。
    if let Ok(url) = reqwest::Url::parse(trimmed) {
        if url.scheme() == "http" || url.scheme() == "https" {
            return Ok(ImageReference::RemoteUrl(trimmed.to_string()));
        }
    }

    if allowed_path_prefixes
        .iter()
        .any(|prefix| trimmed.starts_with(prefix.as_str()))
    {
        return Ok(ImageReference::StoredPath(trimmed.to_string()));
    }

    Err(ImageFieldError::Validation(
        "无法识别的图片输入：仅支持 http/https 地址、data:image Base64 字符串或服务端相对路径"
            .to_string(),
    ))
}
