//! # 图片字段错误模型
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载图片字段链路中的本地错误来源，
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! 网络类错误不在此处建模，由 crate 级 `AppError` 承载。

/// 图片字段统一错误类型。
///
/// 三个分支均为本地可恢复错误：提交不会发起，表单保持可编辑。
#[derive(Debug, thiserror::Error)]
pub enum ImageFieldError {
    /// 输入不满足三种可接受形式，或必填字段缺失
    #[error("校验错误：{0}")]
    Validation(String),

    /// Base64 载荷包含非法字符，无法解码
    #[error("解码错误：{0}")]
    Decode(String),

    /// Base64 预计解码体积超过配置上限
    #[error("资源限制：{0}")]
    ResourceLimit(String),
}

impl From<ImageFieldError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: ImageFieldError) -> Self {
        error.to_string()
    }
}
