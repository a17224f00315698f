//! # 图片表单模块（image_form）
//!
//! ## 设计思路
//!
//! 分类 / 菜品 / 用户资料三类编辑表单共用同一套图片字段逻辑，
//! 该模块将“输入识别 → 解码校验 → 预览 → 表单状态”按职责拆分，
//! 取代各表单各写一份的重复实现。
//!
//! - `source`：图片引用数据模型（五态互斥的 tagged union）
//! - `classifier`：纯函数字符串分类（URL / Base64 / 存储路径）
//! - `decoder`：Base64 → 二进制，带体积上限
//! - `preview`：预览来源解析与本地预览句柄的显式生命周期
//! - `form_state`：表单侧状态持有者，维护互斥不变式
//! - `config/error`：按实体配置、错误模型
//!
//! ## 实现思路
//!
//! 分类与解码均为纯函数，不做任何网络或存储 I/O，
//! 便于在不起网络的情况下对边界输入做穷举测试。
//! 预览句柄采用“先同步释放旧句柄、再获取新句柄”的顺序，
//! 释放操作幂等，组件卸载时兜底释放。

mod classifier;
mod config;
mod decoder;
mod error;
mod form_state;
mod preview;
mod source;

pub use classifier::classify;
pub use config::{ImageFieldConfig, PayloadShape};
pub use decoder::{decode_inline_data, DecodedImageFile, BASE64_FILE_NAME};
pub use error::ImageFieldError;
pub use form_state::ImageFieldState;
pub use preview::{PreviewRegistry, PreviewResolver, PreviewSource, PreviewWarning};
pub use source::{ImageReference, UploadedFile};
