//! # 载荷构建模块
//!
//! ## 设计思路
//!
//! 按固定优先级评估图片引用，命中即停，产出恰好一个提交载荷：
//!
//! | 条件 | 载荷形态 | 图片字段编码 |
//! |------|----------|--------------|
//! | `UploadedFile` | multipart | 二进制挂在 `image` 字段 |
//! | `InlineData` | multipart | 先解码为二进制再挂 `image` 字段 |
//! | `RemoteUrl` | 按实体配置（创建默认 JSON，更新默认 multipart） | 字符串字段携带 URL |
//! | `StoredPath`（仅编辑） | 标量未变为 JSON，已变为实体的更新形态 | 字符串字段携带原路径 |
//! | 以上皆无 | — | 校验错误：必须提供图片 |
//!
//! 创建 / 更新在 `RemoteUrl` 上的形态差异是源系统两处独立调用点的
//! 历史行为，这里按配置原样复刻，不做硬编码。
//!
//! ## 实现思路
//!
//! 本模块为纯函数，不触网：multipart 产出为结构化部件列表，
//! 由 `client` 层再转换为 `reqwest` 表单，决策表因此可离线穷举测试。

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::image_form::{
    decode_inline_data, ImageFieldConfig, ImageFieldError, ImageReference, PayloadShape,
};

use super::ScalarField;

/// multipart 中二进制图片的字段名。
pub const IMAGE_BINARY_FIELD: &str = "image";
/// JSON 请求体中图片地址的属性名。
pub const IMAGE_URL_JSON_KEY: &str = "imageUrl";
/// multipart 中图片地址文本字段名（后端历史命名，与 JSON 属性名大小写不同）。
pub const IMAGE_URL_FORM_FIELD: &str = "ImageUrl";

/// 提交操作类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update {
        /// 除图片外的标量字段是否有改动。
        scalars_changed: bool,
    },
}

/// multipart 载荷的单个部件。
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    Binary {
        name: String,
        filename: String,
        mime: String,
        bytes: Bytes,
    },
}

/// 一次提交的完整请求体。
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionPayload {
    Json(Value),
    Multipart(Vec<FormPart>),
}

impl SubmissionPayload {
    /// JSON 形态的请求体（非 JSON 时为 `None`）。
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            SubmissionPayload::Json(value) => Some(value),
            SubmissionPayload::Multipart(_) => None,
        }
    }

    /// multipart 形态的部件列表（非 multipart 时为 `None`）。
    pub fn parts(&self) -> Option<&[FormPart]> {
        match self {
            SubmissionPayload::Json(_) => None,
            SubmissionPayload::Multipart(parts) => Some(parts),
        }
    }
}

/// 按决策表构建提交载荷。
///
/// # 示例
/// ```rust,ignore
/// use food_order_client::image_form::{ImageFieldConfig, ImageReference};
/// use food_order_client::payload::{build_submission, Operation, ScalarField};
///
/// let config = ImageFieldConfig::with_prefixes(["/CategoryImages/"]);
/// let scalars = vec![ScalarField::text("name", "饮品"), ScalarField::flag("isActive", true)];
/// let payload = build_submission(
///     &ImageReference::RemoteUrl("https://x/a.png".into()),
///     &scalars,
///     &config,
///     Operation::Create,
/// )?;
/// assert!(payload.as_json().is_some());
/// # Ok::<(), food_order_client::image_form::ImageFieldError>(())
/// ```
pub fn build_submission(
    reference: &ImageReference,
    scalars: &[ScalarField],
    config: &ImageFieldConfig,
    operation: Operation,
) -> Result<SubmissionPayload, ImageFieldError> {
    match reference {
        ImageReference::UploadedFile(file) => Ok(SubmissionPayload::Multipart(with_binary_part(
            scalars,
            file.filename.clone(),
            file.mime.clone(),
            file.bytes.clone(),
        ))),

        ImageReference::InlineData { subtype, payload } => {
            let decoded = decode_inline_data(subtype, payload, config.max_inline_decoded_bytes)?;
            Ok(SubmissionPayload::Multipart(with_binary_part(
                scalars,
                decoded.filename,
                decoded.mime,
                decoded.bytes,
            )))
        }

        ImageReference::RemoteUrl(url) => {
            let shape = match operation {
                Operation::Create => config.remote_url_create_shape,
                Operation::Update { .. } => config.remote_url_update_shape,
            };
            Ok(with_url_string(scalars, url, shape))
        }

        ImageReference::StoredPath(path) => match operation {
            Operation::Create => Err(ImageFieldError::Validation(
                "已存储路径仅可用于编辑流程".to_string(),
            )),
            Operation::Update { scalars_changed } => {
                let shape = if scalars_changed {
                    config.remote_url_update_shape
                } else {
                    PayloadShape::Json
                };
                Ok(with_url_string(scalars, path, shape))
            }
        },

        ImageReference::None => Err(ImageFieldError::Validation("必须提供图片".to_string())),
    }
}

/// 标量字段 + 二进制图片部件。
fn with_binary_part(
    scalars: &[ScalarField],
    filename: String,
    mime: String,
    bytes: Bytes,
) -> Vec<FormPart> {
    let mut parts = scalar_parts(scalars);
    parts.push(FormPart::Binary {
        name: IMAGE_BINARY_FIELD.to_string(),
        filename,
        mime,
        bytes,
    });
    parts
}

/// 标量字段 + 字符串形式的图片地址，按指定形态编码。
fn with_url_string(scalars: &[ScalarField], url: &str, shape: PayloadShape) -> SubmissionPayload {
    match shape {
        PayloadShape::Json => {
            let mut object = json_object(scalars);
            object.insert(
                IMAGE_URL_JSON_KEY.to_string(),
                Value::String(url.to_string()),
            );
            SubmissionPayload::Json(Value::Object(object))
        }
        PayloadShape::Multipart => {
            let mut parts = scalar_parts(scalars);
            parts.push(FormPart::Text {
                name: IMAGE_URL_FORM_FIELD.to_string(),
                value: url.to_string(),
            });
            SubmissionPayload::Multipart(parts)
        }
    }
}

fn scalar_parts(scalars: &[ScalarField]) -> Vec<FormPart> {
    scalars
        .iter()
        .map(|field| FormPart::Text {
            name: field.name.to_string(),
            value: field.value.as_form_text(),
        })
        .collect()
}

fn json_object(scalars: &[ScalarField]) -> Map<String, Value> {
    scalars
        .iter()
        .map(|field| (field.name.to_string(), field.value.to_json()))
        .collect()
}
