//! # 订单状态推进模块
//!
//! ## 设计思路
//!
//! 管理端订单列表会在延时后把订单状态自动向前推进一档
//! （确认 → 备餐 → 待取餐）。这里把它建模为按订单号登记的
//! 显式可取消任务，取代环境副作用式的裸定时器：
//! 人工改动状态或组件卸载时取消，取消后回调绝不执行。
//!
//! ## 实现思路
//!
//! - 每个订单号至多一个待执行任务，重复登记会先取消旧任务。
//! - 取消标志用 `Arc<AtomicBool>`，任务睡醒后先查标志再执行回调。
//! - 任务自然完成后自行从登记表摘除（仅当登记的仍是自己）。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 订单状态自动推进调度器。
#[derive(Debug, Default)]
pub struct StatusAdvanceScheduler {
    pending: Arc<Mutex<HashMap<u64, Arc<AtomicBool>>>>,
}

impl StatusAdvanceScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为订单登记一次延时推进。
    ///
    /// 必须在 tokio 运行时上下文内调用。同一订单的旧任务会被取消。
    ///
    /// # 示例
    /// ```rust,ignore
    /// use std::time::Duration;
    /// use food_order_client::order_status::StatusAdvanceScheduler;
    ///
    /// # async fn demo() {
    /// let scheduler = StatusAdvanceScheduler::new();
    /// scheduler.schedule(1001, Duration::from_secs(30), || {
    ///     // 推进订单 1001 状态
    /// });
    /// # }
    /// ```
    pub fn schedule<F>(&self, order_id: u64, delay: Duration, advance: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));

        if let Ok(mut pending) = self.pending.lock() {
            if let Some(previous) = pending.insert(order_id, Arc::clone(&cancelled)) {
                previous.store(true, Ordering::SeqCst);
            }
        }

        let pending = Arc::clone(&self.pending);
        let flag = Arc::clone(&cancelled);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if !flag.load(Ordering::SeqCst) {
                advance();
            }

            if let Ok(mut pending) = pending.lock() {
                // 仅当登记的仍是本任务的标志时才摘除，避免误删后续登记
                if pending
                    .get(&order_id)
                    .is_some_and(|current| Arc::ptr_eq(current, &flag))
                {
                    pending.remove(&order_id);
                }
            }
        });
    }

    /// 取消指定订单的待执行任务（人工改动状态时调用）。
    ///
    /// 返回是否确实取消了一个待执行任务。
    pub fn cancel(&self, order_id: u64) -> bool {
        let Ok(mut pending) = self.pending.lock() else {
            return false;
        };

        match pending.remove(&order_id) {
            Some(flag) => {
                flag.store(true, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// 取消全部待执行任务（列表组件卸载时调用）。
    pub fn cancel_all(&self) {
        let Ok(mut pending) = self.pending.lock() else {
            return;
        };

        for (_, flag) in pending.drain() {
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// 当前待执行任务数。
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|pending| pending.len()).unwrap_or(0)
    }
}

impl Drop for StatusAdvanceScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn scheduled_task_fires_after_delay() {
        let scheduler = StatusAdvanceScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&fired);
        scheduler.schedule(1001, Duration::from_millis(20), move || {
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(scheduler.pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn cancelled_task_never_runs() {
        let scheduler = StatusAdvanceScheduler::new();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&fired);
        scheduler.schedule(1001, Duration::from_millis(20), move || {
            flag.store(true, Ordering::SeqCst);
        });

        assert!(scheduler.cancel(1001));
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(!fired.load(Ordering::SeqCst));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn cancelling_unknown_order_is_a_no_op() {
        let scheduler = StatusAdvanceScheduler::new();

        assert!(!scheduler.cancel(9999));
    }

    #[tokio::test]
    async fn rescheduling_replaces_the_previous_task() {
        let scheduler = StatusAdvanceScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&runs);
            scheduler.schedule(1001, Duration::from_millis(20), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(scheduler.pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(120)).await;

        // 旧任务被取消，只有最后一次登记执行
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancel_all_clears_every_pending_task() {
        let scheduler = StatusAdvanceScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));

        for order_id in [1, 2, 3] {
            let counter = Arc::clone(&runs);
            scheduler.schedule(order_id, Duration::from_millis(20), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(scheduler.pending_count(), 3);

        scheduler.cancel_all();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
