use crate::status::StatusHolder;

/// 请求（Request）
///
/// 由调度器路由到唯一处理器并返回单一结果。
///
/// 关联常量：
/// - `NAME`：请求的稳定名称，用于日志、追踪与错误信息。避免依赖 `type_name::<T>()`。
pub trait Request: Send + 'static {
    /// 请求的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 处理器返回的结果类型
    type Response: Send + 'static;
}

/// 命令（Command）
///
/// 表达“意图”的写操作请求，通常会修改状态，并携带一个可变的执行状态
/// （[`CommandStatus`](crate::status::CommandStatus)）。
/// - 建议保持语义化的“动宾结构”命名，如 `CreateBook`、`CloseOrder`。
pub trait Command: Request + StatusHolder {}

/// 查询（Query）
///
/// 表达只读意图，不改变状态。
pub trait Query: Request {}
