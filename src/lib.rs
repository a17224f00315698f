//! # 食品订购客户端 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            表单视图层（分类 / 菜品 / 用户资料）            │
//! │                                                          │
//! │  ImageFieldState ── PreviewResolver ── SubmitGate        │
//! │       │  (互斥图片引用 + 预览资源生命周期)                │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            本 crate（Rust）                      │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ image_form ── 图片输入分类·解码·预览·表单状态         │
//! │  │   ├─ classifier   URL / Base64 / 存储路径识别          │
//! │  │   ├─ decoder      Base64 → 二进制（体积上限）          │
//! │  │   └─ preview      本地预览句柄 (显式释放)              │
//! │  │                                                       │
//! │  ├─ payload ──── 提交载荷构建 (JSON / multipart 决策表)   │
//! │  ├─ entity ───── 实体种类·端点·标量字段 DTO               │
//! │  ├─ client ───── REST 提交 (reqwest) + 单飞行提交门闸     │
//! │  └─ order_status 订单状态自动推进 (可取消定时任务)        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有对外接口的返回类型 |
//! | [`image_form`] | 图片引用分类、Base64 解码、预览解析、表单互斥状态 |
//! | [`payload`] | 按决策表把图片引用与标量字段组装为唯一提交载荷 |
//! | [`entity`] | 分类 / 菜品 / 用户资料的端点、路径前缀与字段 DTO |
//! | [`client`] | 创建 / 更新请求发送、Bearer 凭据、同表单提交互斥 |
//! | [`order_status`] | 按订单号登记的可取消状态推进任务 |

pub mod client;
pub mod entity;
pub mod error;
pub mod image_form;
pub mod order_status;
pub mod payload;
