//! # 提交门闸模块
//!
//! ## 设计思路
//!
//! 同一表单实例同一时刻至多一个在途提交，避免重复创建实体。
//! 门闸发放 RAII 许可：许可在 Drop 时归还占用位，
//! 无论提交成功、失败还是提前返回，表单都不会被永久锁死。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AppError;

/// 单个表单实例的提交门闸。
#[derive(Debug, Default)]
pub struct SubmitGate {
    busy: Arc<AtomicBool>,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试开始一次提交。
    ///
    /// 已有提交在途时返回 `SubmitInFlight` 错误，不触网。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use food_order_client::client::SubmitGate;
    ///
    /// let gate = SubmitGate::new();
    /// let _permit = gate.try_begin()?;
    /// assert!(gate.try_begin().is_err());
    /// # Ok::<(), food_order_client::error::AppError>(())
    /// ```
    pub fn try_begin(&self) -> Result<SubmitPermit, AppError> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| {
                AppError::SubmitInFlight("同一表单的上一次提交尚未完成".to_string())
            })?;

        Ok(SubmitPermit {
            busy: Arc::clone(&self.busy),
        })
    }

    /// 当前是否有提交在途。
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

/// 一次在途提交的许可，Drop 时归还。
#[derive(Debug)]
pub struct SubmitPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
