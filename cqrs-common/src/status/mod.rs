//! 命令状态（Command Status）与变更通知
//!
//! - `CommandStatus`：以 HTTP 状态码语义为蓝本的结果码集合；
//! - `StatusChange`：一次状态变更的不可变快照（旧值、新值）；
//! - `StatusTracker`：持有单个状态值，并在每次设置时同步通知观察者；
//! - `StatusHolder`：携带状态的请求对象（命令）需实现的协议。

mod command_status;
mod holder;
mod tracker;

pub use command_status::{CommandStatus, StatusChange};
pub use holder::StatusHolder;
pub use tracker::{StatusObserver, StatusTracker, SubscriptionId};
