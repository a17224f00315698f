//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各调用点分散的
//! `.map_err(|e| e.to_string())`、`format!(...)` 等不一致模式。
//!
//! 对外接口统一返回 `Result<T, AppError>`，
//! 前端通过 `Serialize` 获得结构化的错误信息。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ImageFieldError` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，方便 IPC / JSON 透传。
//! - 所有分支都可恢复：表单保持已填写状态，由用户决定是否重试。

use serde::Serialize;

use crate::image_form::ImageFieldError;

/// 应用级统一错误类型
///
/// 校验 / 解码错误在发起网络请求前就地拦截；
/// 网络与后端错误原样透传可读消息，表单数据不丢失。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片字段处理错误（分类 / 解码 / 体积限制）
    #[error("{0}")]
    Field(#[from] ImageFieldError),

    /// 网络层错误（连接失败、发送失败等）
    #[error("网络错误：{0}")]
    Network(String),

    /// 请求超时
    #[error("请求超时：{0}")]
    Timeout(String),

    /// 后端返回非 2xx 响应
    ///
    /// `message` 优先取后端响应体内的错误文案，取不到时为通用兜底文案。
    #[error("后端错误（HTTP {status}）：{message}")]
    Backend { status: u16, message: String },

    /// 同一表单已有提交在途，本次提交被拒绝
    #[error("提交进行中：{0}")]
    SubmitInFlight(String),
}

impl AppError {
    /// 判断该错误是否应在本地拦截（未发起网络请求）。
    pub fn is_local(&self) -> bool {
        matches!(self, AppError::Field(_) | AppError::SubmitInFlight(_))
    }
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
