use crate::{
    context::AppContext,
    error::{CqrsError, CqrsResult},
    handler::{CommandHandler, QueryHandler},
    mediator::Mediator,
    request::{Command, Query, Request},
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type BoxAnySend = Box<dyn Any + Send>;

type HandlerFuture<'a> = Pin<Box<dyn Future<Output = CqrsResult<BoxAnySend>> + Send + 'a>>;

type HandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> HandlerFuture<'a> + Send + Sync>;

/// 重复注册同一请求类型时的处理策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// 拒绝并返回 `AlreadyRegistered`
    #[default]
    Reject,
    /// 以新处理器替换旧处理器
    Replace,
}

/// 进程内调度器配置
#[derive(Clone, Copy, Debug, Default)]
pub struct MediatorConfig {
    pub on_duplicate: DuplicatePolicy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RequestKind {
    Command,
    Query,
}

#[derive(Clone)]
struct Registration {
    name: &'static str,
    kind: RequestKind,
    handler: HandlerFn,
}

/// 基于内存的 Mediator 实现
/// - 通过 TypeId 注册不同请求对应的 Handler（命令与查询共用一张表）
/// - 以类型擦除方式调度，并在调用端进行结果还原
pub struct InMemoryMediator {
    handlers: DashMap<TypeId, Registration>,
    config: MediatorConfig,
}

impl Default for InMemoryMediator {
    fn default() -> Self {
        Self::with_config(MediatorConfig::default())
    }
}

impl InMemoryMediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MediatorConfig) -> Self {
        Self {
            handlers: DashMap::new(),
            config,
        }
    }

    /// 注册命令处理器
    pub fn register_command<C, H>(&self, handler: Arc<H>) -> CqrsResult<()>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let f: HandlerFn = Arc::new(move |boxed, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                // 键与闭包同一泛型 C，正常情况下 downcast 不会失败
                match boxed.downcast::<C>() {
                    Ok(cmd) => {
                        let out = handler.handle(ctx, *cmd).await?;
                        Ok(Box::new(out) as BoxAnySend)
                    }
                    Err(_) => Err(CqrsError::TypeMismatch {
                        expected: C::NAME,
                        found: "unknown",
                    }),
                }
            })
        });

        self.insert::<C>(RequestKind::Command, f)
    }

    /// 注册查询处理器
    pub fn register_query<Q, H>(&self, handler: Arc<H>) -> CqrsResult<()>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let f: HandlerFn = Arc::new(move |boxed, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                match boxed.downcast::<Q>() {
                    Ok(q) => {
                        let out = handler.handle(ctx, *q).await?;
                        Ok(Box::new(out) as BoxAnySend)
                    }
                    Err(_) => Err(CqrsError::TypeMismatch {
                        expected: Q::NAME,
                        found: "unknown",
                    }),
                }
            })
        });

        self.insert::<Q>(RequestKind::Query, f)
    }

    fn insert<R: Request>(&self, kind: RequestKind, handler: HandlerFn) -> CqrsResult<()> {
        let registration = Registration {
            name: R::NAME,
            kind,
            handler,
        };

        match self.handlers.entry(TypeId::of::<R>()) {
            Entry::Occupied(mut e) => match self.config.on_duplicate {
                DuplicatePolicy::Reject => {
                    return Err(CqrsError::AlreadyRegistered { request: R::NAME });
                }
                DuplicatePolicy::Replace => {
                    tracing::warn!(request = R::NAME, ?kind, "replacing registered handler");
                    e.insert(registration);
                }
            },
            Entry::Vacant(e) => {
                tracing::debug!(request = R::NAME, ?kind, "handler registered");
                e.insert(registration);
            }
        }

        Ok(())
    }

    /// 是否已为该请求类型注册处理器
    pub fn is_registered<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    /// 获取已注册的请求名列表（只读视图，无固定顺序）
    pub fn registered_requests(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().name).collect()
    }
}

#[async_trait]
impl Mediator for InMemoryMediator {
    async fn send<R: Request>(&self, ctx: &AppContext, request: R) -> CqrsResult<R::Response> {
        ctx.ensure_active()?;

        // 先克隆出闭包，避免跨 await 持有 DashMap 的读锁
        let Some((kind, f)) = self
            .handlers
            .get(&TypeId::of::<R>())
            .map(|r| (r.kind, r.handler.clone()))
        else {
            return Err(CqrsError::HandlerNotFound(R::NAME));
        };

        tracing::debug!(
            request = R::NAME,
            ?kind,
            correlation_id = ctx.correlation_id(),
            "dispatching request"
        );

        let out = (f)(Box::new(request), ctx).await?;

        match out.downcast::<R::Response>() {
            Ok(res) => Ok(*res),
            Err(_) => Err(CqrsError::TypeMismatch {
                expected: type_name::<R::Response>(),
                found: "unknown",
            }),
        }
    }
}
