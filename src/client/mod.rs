//! # 客户端模块（client）
//!
//! ## 设计思路
//!
//! 承载与后端 REST 端点的全部交互：
//! - `http`：创建（`POST`）/ 更新（`PUT`）请求发送，按载荷形态编码
//!   请求体与内容类型，凭据作为显式配置传入（不读任何全局存储）。
//! - `submit_gate`：同一表单实例同一时刻至多一个在途提交，
//!   许可采用 RAII 释放，任何退出路径都不会卡死表单。
//!
//! 失败不做自动重试：错误原样返回，表单保持已填写状态由用户重试。

mod http;
mod submit_gate;

pub use http::{ApiClient, ApiClientConfig, SubmitOutcome};
pub use submit_gate::{SubmitGate, SubmitPermit};
