//! 调度器（Mediator）
//!
//! - 负责根据请求的具体类型路由到对应的处理器，并返回处理器的结果；
//! - 框架可提供不同实现（如进程内、消息队列等）；
//! - `Mediator` 带有泛型方法，通常以具体实现类型注入使用；
//!   需要以 trait object 持有时，使用按请求类型收窄的 [`SendRequest`]。

mod in_memory;

pub use in_memory::{DuplicatePolicy, InMemoryMediator, MediatorConfig};

use crate::{context::AppContext, error::CqrsResult, request::Request};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Mediator: Send + Sync {
    /// 分发请求到对应处理器
    ///
    /// - `ctx`：应用上下文（链路追踪、幂等键、取消令牌）
    /// - `request`：具体请求实例
    async fn send<R: Request>(&self, ctx: &AppContext, request: R) -> CqrsResult<R::Response>;
}

#[async_trait]
impl<M> Mediator for Arc<M>
where
    M: Mediator,
{
    async fn send<R: Request>(&self, ctx: &AppContext, request: R) -> CqrsResult<R::Response> {
        (**self).send(ctx, request).await
    }
}

/// 针对单一请求类型、可作为 trait object 使用的发送端
#[async_trait]
pub trait SendRequest<R: Request>: Send + Sync {
    async fn send_request(&self, ctx: &AppContext, request: R) -> CqrsResult<R::Response>;
}

#[async_trait]
impl<R, M> SendRequest<R> for M
where
    R: Request,
    M: Mediator,
{
    async fn send_request(&self, ctx: &AppContext, request: R) -> CqrsResult<R::Response> {
        self.send(ctx, request).await
    }
}
