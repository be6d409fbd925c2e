//! 查询处理器（QueryProcessor）
//!
//! 与 [`CommandExecutor`](crate::executor::CommandExecutor) 对称：
//! 把查询交给调度器，并在前后发出 `Processing` / `Processed` 通知。
//!
use crate::{context::AppContext, error::CqrsResult, mediator::Mediator, request::Query};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

#[async_trait]
pub trait QueryProcessor: Send + Sync {
    async fn process<Q: Query>(&self, ctx: &AppContext, query: Q) -> CqrsResult<Q::Response>;
}

/// 针对单一查询类型、可作为 trait object 使用的处理器视图
#[async_trait]
pub trait ProcessQuery<Q: Query>: Send + Sync {
    async fn process_query(&self, ctx: &AppContext, query: Q) -> CqrsResult<Q::Response>;
}

#[async_trait]
impl<Q, P> ProcessQuery<Q> for P
where
    Q: Query,
    P: QueryProcessor,
{
    async fn process_query(&self, ctx: &AppContext, query: Q) -> CqrsResult<Q::Response> {
        self.process(ctx, query).await
    }
}

pub enum ProcessEvent<'a> {
    Processing {
        name: &'static str,
        query: &'a (dyn Any + Send),
    },
    Processed {
        name: &'static str,
        result: &'a (dyn Any + Send),
    },
}

impl ProcessEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessEvent::Processing { name, .. } | ProcessEvent::Processed { name, .. } => name,
        }
    }

    pub fn query<T: 'static>(&self) -> Option<&T> {
        match self {
            ProcessEvent::Processing { query, .. } => query.downcast_ref::<T>(),
            ProcessEvent::Processed { .. } => None,
        }
    }

    pub fn result<T: 'static>(&self) -> Option<&T> {
        match self {
            ProcessEvent::Processed { result, .. } => result.downcast_ref::<T>(),
            ProcessEvent::Processing { .. } => None,
        }
    }
}

pub type ProcessListener = Arc<dyn for<'a> Fn(&ProcessEvent<'a>) + Send + Sync>;

/// 基于调度器的查询处理器
pub struct MediatorQueryProcessor<M> {
    mediator: Arc<M>,
    processing: Vec<ProcessListener>,
    processed: Vec<ProcessListener>,
}

impl<M: Mediator> MediatorQueryProcessor<M> {
    pub fn new(mediator: Arc<M>) -> Self {
        Self {
            mediator,
            processing: Vec::new(),
            processed: Vec::new(),
        }
    }

    pub fn on_processing<F>(mut self, listener: F) -> Self
    where
        F: for<'a> Fn(&ProcessEvent<'a>) + Send + Sync + 'static,
    {
        self.processing.push(Arc::new(listener));
        self
    }

    pub fn on_processed<F>(mut self, listener: F) -> Self
    where
        F: for<'a> Fn(&ProcessEvent<'a>) + Send + Sync + 'static,
    {
        self.processed.push(Arc::new(listener));
        self
    }

    pub fn mediator(&self) -> &Arc<M> {
        &self.mediator
    }
}

#[async_trait]
impl<M: Mediator> QueryProcessor for MediatorQueryProcessor<M> {
    async fn process<Q: Query>(&self, ctx: &AppContext, query: Q) -> CqrsResult<Q::Response> {
        tracing::debug!(
            query = Q::NAME,
            correlation_id = ctx.correlation_id(),
            "processing query"
        );

        if !self.processing.is_empty() {
            let event = ProcessEvent::Processing {
                name: Q::NAME,
                query: &query,
            };
            for listener in &self.processing {
                listener(&event);
            }
        }

        let result = self.mediator.send(ctx, query).await?;

        if !self.processed.is_empty() {
            let event = ProcessEvent::Processed {
                name: Q::NAME,
                result: &result,
            };
            for listener in &self.processed {
                listener(&event);
            }
        }

        Ok(result)
    }
}
