use super::{CommandStatus, StatusChange, StatusTracker, SubscriptionId};
use crate::error::CqrsResult;

/// 携带单一状态的对象（通常是命令）
///
/// 实现者只需暴露内部的 [`StatusTracker`]，其余操作均有默认实现。
/// `#[command]` 宏会自动追加 `status` 字段并实现本 trait。
pub trait StatusHolder {
    fn status_tracker(&self) -> &StatusTracker;

    fn status_tracker_mut(&mut self) -> &mut StatusTracker;

    fn status(&self) -> CommandStatus {
        self.status_tracker().status()
    }

    fn set_status(&mut self, status: CommandStatus) -> CqrsResult<()> {
        self.status_tracker_mut().set_status(status)
    }

    fn subscribe_status<F>(&mut self, observer: F) -> SubscriptionId
    where
        Self: Sized,
        F: Fn(&StatusChange) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.status_tracker_mut().subscribe(observer)
    }

    fn unsubscribe_status(&mut self, id: SubscriptionId) -> bool {
        self.status_tracker_mut().unsubscribe(id)
    }
}

impl StatusHolder for StatusTracker {
    fn status_tracker(&self) -> &StatusTracker {
        self
    }

    fn status_tracker_mut(&mut self) -> &mut StatusTracker {
        self
    }
}
