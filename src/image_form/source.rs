//! # 图片引用数据模型
//!
//! ## 设计思路
//!
//! 将“图片字段当前状态”建模为五态互斥的 tagged union：
//! 任意时刻恰好一个变体生效，互斥不变式由类型系统直接保证，
//! 表单侧无需再手工清理另一个输入框的残留值。

use bytes::Bytes;

use super::ImageFieldError;

/// 图片字段的当前引用状态。
#[derive(Debug, Clone, PartialEq)]
pub enum ImageReference {
    /// 未设置图片。
    None,
    /// 通过文件选择器挑选的本地文件，提交前由表单独占持有。
    UploadedFile(UploadedFile),
    /// 用户粘贴或服务端返回的 `http(s)` 绝对地址。
    RemoteUrl(String),
    /// 用户粘贴的 `data:` URI（MIME 子类型 + Base64 载荷）。
    InlineData { subtype: String, payload: String },
    /// 服务端相对路径（如 `/CategoryImages/x.png`），未改动时不会重新上传。
    StoredPath(String),
}

impl ImageReference {
    /// 是否未设置图片。
    pub fn is_none(&self) -> bool {
        matches!(self, ImageReference::None)
    }
}

/// 文件选择器挑选的图片文件。
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// 原始文件名。
    pub filename: String,
    /// 选择器声明的 MIME 类型。
    pub mime: String,
    /// 文件原始字节。
    pub bytes: Bytes,
}

impl UploadedFile {
    /// 从文件选择器结果构造，并通过文件签名（magic bytes）校验确为图片。
    pub fn from_picked(
        filename: impl Into<String>,
        mime: impl Into<String>,
        bytes: Bytes,
    ) -> Result<Self, ImageFieldError> {
        if bytes.is_empty() {
            return Err(ImageFieldError::Validation("图片文件内容为空".to_string()));
        }

        let kind = infer::get(&bytes)
            .ok_or_else(|| ImageFieldError::Validation("无法识别所选文件类型".to_string()))?;

        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ImageFieldError::Validation(format!(
                "所选文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }

        Ok(Self {
            filename: filename.into(),
            mime: mime.into(),
            bytes,
        })
    }
}
