//! CQRS 基础库（cqrs-common）
//!
//! 在进程内调度器之上提供命令/查询的通用构件：
//! - 命令状态（`status`）：状态枚举、带有序观察者的状态跟踪器
//! - 请求与处理器（`request`、`handler`）
//! - 调度器（`mediator`）及进程内实现
//! - 命令执行器（`executor`）与查询处理器（`processor`），带执行前后通知
//! - 绑定执行路径的 `BaseCommand` / `BaseQuery`
//!
//! 典型用法：
//! 1. 使用 `#[command]` / `#[query]` 定义请求类型；
//! 2. 实现 `CommandHandler` / `QueryHandler` 并注册到 `InMemoryMediator`；
//! 3. 直接 `send`，或包装为 `BaseCommand` / `BaseQuery` 后调用 `to_result`；
//! 4. 需要观察状态变化时，在命令上 `subscribe_status`。
//!
pub mod base_command;
pub mod base_query;
pub mod context;
pub mod error;
pub mod executor;
pub mod handler;
pub mod mediator;
pub mod processor;
pub mod request;
pub mod status;

pub use base_command::{BaseCommand, CommandRoute};
pub use base_query::{BaseQuery, QueryRoute};
pub use error::{CqrsError, CqrsResult};
pub use mediator::InMemoryMediator;
pub use status::{CommandStatus, StatusChange, StatusHolder, StatusTracker, SubscriptionId};

// 允许在本 crate 内部通过 ::cqrs_common 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::cqrs_common 路径。
extern crate self as cqrs_common;
