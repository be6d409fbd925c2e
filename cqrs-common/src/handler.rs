use crate::{
    context::AppContext,
    error::CqrsResult,
    request::{Command, Query},
};
use async_trait::async_trait;

#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> CqrsResult<C::Response>;
}

#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(&self, ctx: &AppContext, q: Q) -> CqrsResult<Q::Response>;
}
