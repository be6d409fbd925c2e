//! 已绑定执行路径的查询（BaseQuery）
//!
//! 与 [`BaseCommand`](crate::base_command::BaseCommand) 对称，路径为处理器或调度器。
//! 两者同时提供时处理器优先。

use crate::{
    context::AppContext,
    error::{CqrsError, CqrsResult},
    mediator::{Mediator, SendRequest},
    processor::{ProcessQuery, QueryProcessor},
    request::Query,
};
use std::fmt;
use std::sync::Arc;

pub enum QueryRoute<Q: Query> {
    Processor(Arc<dyn ProcessQuery<Q>>),
    Dispatcher(Arc<dyn SendRequest<Q>>),
    Unbound,
}

impl<Q: Query> QueryRoute<Q> {
    pub fn is_unbound(&self) -> bool {
        matches!(self, QueryRoute::Unbound)
    }
}

impl<Q: Query> Clone for QueryRoute<Q> {
    fn clone(&self) -> Self {
        match self {
            QueryRoute::Processor(p) => QueryRoute::Processor(p.clone()),
            QueryRoute::Dispatcher(d) => QueryRoute::Dispatcher(d.clone()),
            QueryRoute::Unbound => QueryRoute::Unbound,
        }
    }
}

impl<Q: Query> fmt::Debug for QueryRoute<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryRoute::Processor(_) => f.write_str("Processor"),
            QueryRoute::Dispatcher(_) => f.write_str("Dispatcher"),
            QueryRoute::Unbound => f.write_str("Unbound"),
        }
    }
}

pub struct BaseQuery<Q: Query> {
    query: Q,
    route: QueryRoute<Q>,
}

impl<Q: Query> BaseQuery<Q> {
    pub fn new(query: Q) -> Self {
        Self {
            query,
            route: QueryRoute::Unbound,
        }
    }

    pub fn with_processor<P>(query: Q, processor: Arc<P>) -> Self
    where
        P: QueryProcessor + 'static,
    {
        Self {
            query,
            route: QueryRoute::Processor(processor),
        }
    }

    pub fn with_mediator<M>(query: Q, mediator: Arc<M>) -> Self
    where
        M: Mediator + 'static,
    {
        Self {
            query,
            route: QueryRoute::Dispatcher(mediator),
        }
    }

    pub fn bind_processor<P>(mut self, processor: Arc<P>) -> Self
    where
        P: QueryProcessor + 'static,
    {
        self.route = QueryRoute::Processor(processor);
        self
    }

    /// 已绑定处理器时保持不变
    pub fn bind_mediator<M>(mut self, mediator: Arc<M>) -> Self
    where
        M: Mediator + 'static,
    {
        if !matches!(self.route, QueryRoute::Processor(_)) {
            self.route = QueryRoute::Dispatcher(mediator);
        }
        self
    }

    pub fn route(&self) -> &QueryRoute<Q> {
        &self.route
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn into_inner(self) -> Q {
        self.query
    }

    pub async fn to_result(self, ctx: &AppContext) -> CqrsResult<Q::Response> {
        match self.route {
            QueryRoute::Processor(processor) => processor.process_query(ctx, self.query).await,
            QueryRoute::Dispatcher(mediator) => mediator.send_request(ctx, self.query).await,
            QueryRoute::Unbound => Err(CqrsError::Unbound {
                request: Q::NAME,
                missing: "processor",
            }),
        }
    }
}

impl<Q: Query + fmt::Debug> fmt::Debug for BaseQuery<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseQuery")
            .field("query", &self.query)
            .field("route", &self.route)
            .finish()
    }
}
