//! # 提交载荷模块（payload）
//!
//! ## 设计思路
//!
//! 后端的创建 / 更新端点同时接受 `application/json` 与
//! `multipart/form-data` 两种请求体，但每种形态期望固定的内容类型。
//! 该模块把“已校验的图片引用 + 表单标量字段”转换为恰好一个载荷，
//! 决策表集中在 `builder`，与网络层完全解耦（纯函数，可离线测试）。
//!
//! - `fields`：标量字段及其两种编码规则（multipart 十进制文本 / JSON 原生值）
//! - `builder`：按优先级评估的载荷形态决策表

mod builder;
mod fields;

pub use builder::{
    build_submission, FormPart, Operation, SubmissionPayload, IMAGE_BINARY_FIELD,
    IMAGE_URL_FORM_FIELD, IMAGE_URL_JSON_KEY,
};
pub use fields::{ScalarField, ScalarValue};
