//! # 配置模块
//!
//! ## 设计思路
//!
//! 将图片字段的所有“可调策略”集中到 `ImageFieldConfig`：
//! 存储路径前缀白名单、Base64 解码体积上限、以及 `RemoteUrl`
//! 在创建 / 更新两条链路上的载荷形态。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用配置（与后端现状兼容）。
//! - 创建默认 JSON、更新默认 multipart 的不对称来源于历史上两处独立
//!   演化的调用点，这里用两个独立开关原样保留，切勿静默统一
//!   （待产品侧确认后再收敛）。
//! - 体积上限通过带范围校验的 setter 调整，避免误配成 0 或天文数字。

use super::ImageFieldError;

const MIN_INLINE_DECODED_BYTES: u64 = 1024;
const MAX_INLINE_DECODED_BYTES: u64 = 64 * 1024 * 1024;

/// 提交载荷形态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `application/json` 请求体，图片以字符串属性携带。
    Json,
    /// `multipart/form-data` 请求体，图片以二进制或文本字段携带。
    Multipart,
}

/// 图片字段配置（按实体种类各持有一份）。
#[derive(Debug, Clone)]
pub struct ImageFieldConfig {
    /// 允许的服务端存储路径前缀（实体专属）。
    pub allowed_path_prefixes: Vec<String>,
    /// Base64 解码后体积上限（字节）。
    pub max_inline_decoded_bytes: u64,
    /// `RemoteUrl` 在创建请求上的载荷形态。
    pub remote_url_create_shape: PayloadShape,
    /// `RemoteUrl` 在更新请求上的载荷形态。
    pub remote_url_update_shape: PayloadShape,
}

impl Default for ImageFieldConfig {
    fn default() -> Self {
        Self {
            allowed_path_prefixes: Vec::new(),
            max_inline_decoded_bytes: 10 * 1024 * 1024,
            remote_url_create_shape: PayloadShape::Json,
            remote_url_update_shape: PayloadShape::Multipart,
        }
    }
}

impl ImageFieldConfig {
    /// 以指定前缀白名单构造配置，其余字段取默认值。
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_path_prefixes: prefixes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// 调整 Base64 解码体积上限。
    ///
    /// 上限必须在 1 KB ~ 64 MB 之间。
    pub fn set_max_inline_decoded_bytes(&mut self, value: u64) -> Result<(), ImageFieldError> {
        if !(MIN_INLINE_DECODED_BYTES..=MAX_INLINE_DECODED_BYTES).contains(&value) {
            return Err(ImageFieldError::Validation(format!(
                "max_inline_decoded_bytes 必须在 {} ~ {} 字节之间",
                MIN_INLINE_DECODED_BYTES, MAX_INLINE_DECODED_BYTES
            )));
        }

        self.max_inline_decoded_bytes = value;
        Ok(())
    }
}
