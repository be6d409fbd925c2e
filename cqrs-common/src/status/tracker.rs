//! 状态跟踪器（StatusTracker）
//!
//! 每个命令实例独占一个跟踪器：
//! - `set_status` 先写入新值，再按订阅顺序同步通知全部观察者；
//! - 同值设置同样视为一次变更，不做抑制；
//! - 观察者返回错误时立即中止通知并向调用方传播，已写入的状态不会回滚；
//! - 状态之间不存在合法性约束，任意状态可迁移到任意状态（含自身）。
//!
//! 修改需要 `&mut self`，因此同一实例的跨线程并发写在安全代码中无法表达，
//! 共享实例需由调用方自行加锁。

use super::{CommandStatus, StatusChange};
use crate::error::{CqrsError, CqrsResult};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 状态观察者回调
pub type StatusObserver = Arc<dyn Fn(&StatusChange) -> anyhow::Result<()> + Send + Sync>;

/// 句柄在进程内全局递增，不同跟踪器签发的句柄互不相同
static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// 订阅句柄
///
/// 交给未签发它的跟踪器时按未订阅处理。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 状态跟踪器
///
/// 克隆时复制当前状态并共享观察者回调。
#[derive(Clone, Default)]
pub struct StatusTracker {
    status: CommandStatus,
    observers: IndexMap<SubscriptionId, StatusObserver>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> CommandStatus {
        self.status
    }

    /// 写入新状态并通知观察者
    ///
    /// 返回错误时，新状态已写入，且出错观察者之前的观察者均已收到通知。
    pub fn set_status(&mut self, status: CommandStatus) -> CqrsResult<()> {
        let change = StatusChange::new(self.status, status);
        self.status = status;

        tracing::trace!(
            old = %change.old_status(),
            new = %change.new_status(),
            observers = self.observers.len(),
            "command status set"
        );

        for (id, observer) in &self.observers {
            observer(&change).map_err(|e| CqrsError::StatusObserver {
                subscription: *id,
                source: e.into(),
            })?;
        }

        Ok(())
    }

    /// 订阅状态变更，允许重复订阅同一回调
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&StatusChange) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(observer))
    }

    /// 以共享回调订阅，便于同一回调挂到多个命令上
    pub fn subscribe_shared(&mut self, observer: StatusObserver) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.observers.insert(id, observer);
        id
    }

    /// 取消订阅；句柄不存在时为空操作并返回 `false`
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        // shift_remove 保持其余观察者的相对顺序
        self.observers.shift_remove(&id).is_some()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl fmt::Debug for StatusTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusTracker")
            .field("status", &self.status)
            .field("observers", &self.observers.len())
            .finish()
    }
}
