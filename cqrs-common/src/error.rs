//! 统一错误定义
//!
//! 覆盖请求路由、状态通知、存储冲突与映射等最小必要集合，
//! 便于上层（HTTP、消息消费者等）统一转换。
//!
use crate::status::SubscriptionId;
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CqrsError {
    // --- 路由/调度 ---
    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: request={request}")]
    AlreadyRegistered { request: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// 既没有执行器/处理器，也没有调度器可用
    #[error("no execution route: request={request}, missing={missing}")]
    Unbound {
        request: &'static str,
        missing: &'static str,
    },

    #[error("request cancelled: {0}")]
    Cancelled(&'static str),

    // --- 命令状态 ---
    #[error("status observer failed: subscription={subscription}, reason={source}")]
    StatusObserver {
        subscription: SubscriptionId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid status code: {0}")]
    InvalidStatusCode(u16),

    // --- 存储/映射 ---
    #[error("missing component: {0}")]
    MissingComponent(&'static str),

    #[error("conflict: {reason}")]
    Conflict { reason: String },

    #[error("mapping error: {reason}")]
    Mapping { reason: String },

    // --- 通用 ---
    #[error("validation: {0}")]
    Validation(String),
}

/// 统一 Result 类型别名
pub type CqrsResult<T> = Result<T, CqrsError>;

impl CqrsError {
    pub fn mapping(reason: impl Into<String>) -> Self {
        Self::Mapping {
            reason: reason.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}
