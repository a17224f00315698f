//! # Base64 解码模块
//!
//! ## 设计思路
//!
//! 把 `InlineData` 形式的图片引用转换为可用于 multipart 上传的二进制文件。
//! 在真正解码前先按载荷长度估算解码后体积上限，超限直接拒绝，
//! 避免超大载荷先分配内存再失败。
//!
//! ## 实现思路
//!
//! - 估算公式：`(len + 3) / 4 * 3`，全程 checked 运算防溢出。
//! - 解码失败（非法 Base64 字符）映射为解码错误，由调用方转为表单提示。
//! - 合成文件名固定为 `imageFromBase64.png`，扩展名仅作展示用途，
//!   不要求与真实 MIME 子类型一致。

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;

use super::ImageFieldError;

/// Base64 解码产物的合成文件名。
pub const BASE64_FILE_NAME: &str = "imageFromBase64.png";

/// 解码产物：带 MIME 与文件名标记的二进制文件。
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImageFile {
    /// 合成文件名（固定为 [`BASE64_FILE_NAME`]）。
    pub filename: String,
    /// 原始 `data:` URI 携带的 MIME 类型。
    pub mime: String,
    /// 解码后的原始字节。
    pub bytes: Bytes,
}

/// 将 `InlineData` 的子类型与 Base64 载荷解码为二进制文件。
///
/// `max_decoded_bytes` 为解码后体积上限（字节），超限返回资源限制错误。
///
/// # 示例
/// ```rust,ignore
/// use food_order_client::image_form::decode_inline_data;
///
/// let file = decode_inline_data("png", "aGVsbG8=", 10 * 1024 * 1024)?;
/// assert_eq!(file.bytes.as_ref(), b"hello");
/// # Ok::<(), food_order_client::image_form::ImageFieldError>(())
/// ```
pub fn decode_inline_data(
    subtype: &str,
    payload: &str,
    max_decoded_bytes: u64,
) -> Result<DecodedImageFile, ImageFieldError> {
    let normalized = payload.trim();

    if normalized.is_empty() {
        return Err(ImageFieldError::Decode("Base64 载荷为空".to_string()));
    }

    let estimated_len = estimate_decoded_upper_bound_len(normalized)?;
    if estimated_len > max_decoded_bytes {
        return Err(ImageFieldError::ResourceLimit(format!(
            "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated_len as f64 / 1024.0 / 1024.0,
            max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    let decoded = general_purpose::STANDARD
        .decode(normalized)
        .map_err(|e| ImageFieldError::Decode(format!("Base64 解码失败：{}", e)))?;

    Ok(DecodedImageFile {
        filename: BASE64_FILE_NAME.to_string(),
        mime: format!("image/{}", subtype),
        bytes: Bytes::from(decoded),
    })
}

/// 按载荷长度估算解码后体积的上界。
fn estimate_decoded_upper_bound_len(payload: &str) -> Result<u64, ImageFieldError> {
    let len = payload.len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| ImageFieldError::ResourceLimit("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| ImageFieldError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
}
