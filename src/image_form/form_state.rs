//! # 表单状态模块
//!
//! ## 设计思路
//!
//! 每个编辑表单持有一份 `ImageFieldState`，作为图片字段互斥不变式的
//! 唯一持有者：选择文件会清掉已输入的 URL / Base64 文本，反之亦然。
//! 状态内部用五态 tagged union 表达，互斥由类型直接保证。
//!
//! 各表单实例互不共享可变状态。

use bytes::Bytes;

use super::{classify, ImageFieldConfig, ImageFieldError, ImageReference, UploadedFile};

/// 单个表单实例的图片字段状态。
#[derive(Debug)]
pub struct ImageFieldState {
    config: ImageFieldConfig,
    reference: ImageReference,
}

impl ImageFieldState {
    pub fn new(config: ImageFieldConfig) -> Self {
        Self {
            config,
            reference: ImageReference::None,
        }
    }

    /// 当前生效的图片引用。
    pub fn reference(&self) -> &ImageReference {
        &self.reference
    }

    pub fn config(&self) -> &ImageFieldConfig {
        &self.config
    }

    /// 选择本地文件。成功后替换任何既有引用（含文本输入）。
    pub fn set_file(
        &mut self,
        filename: impl Into<String>,
        mime: impl Into<String>,
        bytes: Bytes,
    ) -> Result<(), ImageFieldError> {
        let file = UploadedFile::from_picked(filename, mime, bytes)?;
        self.reference = ImageReference::UploadedFile(file);
        Ok(())
    }

    /// 输入 URL / Base64 文本。
    ///
    /// - 空白输入视为清空字段（不报错）。
    /// - 分类失败时字段被清空并返回校验错误，由调用方展示提示；
    ///   已选择的文件同样会被清掉（互斥）。
    pub fn set_text_input(&mut self, input: &str) -> Result<(), ImageFieldError> {
        if input.trim().is_empty() {
            self.reference = ImageReference::None;
            return Ok(());
        }

        match classify(input, &self.config.allowed_path_prefixes) {
            Ok(reference) => {
                self.reference = reference;
                Ok(())
            }
            Err(err) => {
                self.reference = ImageReference::None;
                Err(err)
            }
        }
    }

    /// 加载服务端返回的既有图片值（编辑流程进入时调用）。
    pub fn load_existing(&mut self, value: &str) -> Result<(), ImageFieldError> {
        self.set_text_input(value)
    }

    /// 清空字段。
    pub fn clear(&mut self) {
        self.reference = ImageReference::None;
    }
}
