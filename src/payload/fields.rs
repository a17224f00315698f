//! # 标量字段模块
//!
//! ## 设计思路
//!
//! 名称、描述、价格、数量、分类引用、启用标记等标量字段
//! 需要随任一载荷形态一起提交：
//! - multipart：全部编码为字符串表单字段，数值用十进制文本（后端按文本解析）
//! - JSON：使用原生类型（数值为 number，标记为 bool）

use serde_json::Value;

/// 标量字段值。
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
}

impl ScalarValue {
    /// multipart 表单字段的文本编码。
    pub fn as_form_text(&self) -> String {
        match self {
            ScalarValue::Text(text) => text.clone(),
            ScalarValue::Integer(value) => value.to_string(),
            ScalarValue::Number(value) => value.to_string(),
            ScalarValue::Flag(value) => value.to_string(),
        }
    }

    /// JSON 请求体的原生值编码。
    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Text(text) => Value::String(text.clone()),
            ScalarValue::Integer(value) => Value::from(*value),
            ScalarValue::Number(value) => Value::from(*value),
            ScalarValue::Flag(value) => Value::Bool(*value),
        }
    }
}

/// 具名标量字段。
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    /// 字段名（JSON 属性名与 multipart 字段名一致）。
    pub name: &'static str,
    pub value: ScalarValue,
}

impl ScalarField {
    pub fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: ScalarValue::Text(value.into()),
        }
    }

    pub fn integer(name: &'static str, value: i64) -> Self {
        Self {
            name,
            value: ScalarValue::Integer(value),
        }
    }

    pub fn number(name: &'static str, value: f64) -> Self {
        Self {
            name,
            value: ScalarValue::Number(value),
        }
    }

    pub fn flag(name: &'static str, value: bool) -> Self {
        Self {
            name,
            value: ScalarValue::Flag(value),
        }
    }
}
