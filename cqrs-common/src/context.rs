use crate::error::{CqrsError, CqrsResult};
use bon::Builder;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// 业务上下文信息
#[derive(Builder, Default, Debug, Clone, Serialize, Deserialize)]
pub struct BusinessContext {
    /// 关联ID
    correlation_id: Option<String>,
    /// 因果ID
    causation_id: Option<String>,
    /// 发起请求的主体类型（如用户、系统等）
    actor_type: Option<String>,
    /// 发起请求的主体ID
    actor_id: Option<String>,
}

impl BusinessContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }
}

/// 应用层上下文（Application Context）
///
/// 承载一次请求（命令/查询）所需的横切信息，例如：
/// - 业务语境（`BusinessContext`）：关联追踪 `correlation_id`、因果链 `causation_id`、
///   执行者类型/ID 等；
/// - 幂等键（`idempotency_key`）：用于在基础设施层实现请求幂等；
/// - 取消令牌（`cancellation`）：调度、执行与存储操作在开始前检查。
///
/// 典型用法：
/// ```rust
/// use cqrs_common::context::{AppContext, BusinessContext};
///
/// let ctx = AppContext {
///     biz: BusinessContext::builder()
///         .maybe_correlation_id(Some("cor-123".into()))
///         .maybe_actor_type(Some("user".into()))
///         .maybe_actor_id(Some("u-1".into()))
///         .build(),
///     idempotency_key: Some("idem-xyz".into()),
///     ..Default::default()
/// };
/// assert!(ctx.ensure_active().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    /// 业务语境（链路追踪、审计主体、操作因果）
    pub biz: BusinessContext,
    /// 幂等键（可选）
    pub idempotency_key: Option<String>,
    /// 请求级取消令牌
    pub cancellation: CancellationToken,
}

impl AppContext {
    /// 日志与追踪使用的关联ID
    pub fn correlation_id(&self) -> Option<&str> {
        self.biz.correlation_id()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// 已取消时返回 `CqrsError::Cancelled`
    pub fn ensure_active(&self) -> CqrsResult<()> {
        if self.is_cancelled() {
            return Err(CqrsError::Cancelled("cancellation requested"));
        }
        Ok(())
    }
}
