//! 命令执行器（CommandExecutor）
//!
//! 将命令交给调度器执行，并在执行前后发出 `Executing` / `Executed` 通知，
//! 便于日志、审计等旁路逻辑挂载。
//!
use crate::{
    context::AppContext,
    error::CqrsResult,
    mediator::Mediator,
    request::Command,
};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// 执行命令并返回结果
    async fn execute<C: Command>(&self, ctx: &AppContext, command: C) -> CqrsResult<C::Response>;
}

/// 针对单一命令类型、可作为 trait object 使用的执行器视图
#[async_trait]
pub trait ExecuteCommand<C: Command>: Send + Sync {
    async fn execute_command(&self, ctx: &AppContext, command: C) -> CqrsResult<C::Response>;
}

#[async_trait]
impl<C, E> ExecuteCommand<C> for E
where
    C: Command,
    E: CommandExecutor,
{
    async fn execute_command(&self, ctx: &AppContext, command: C) -> CqrsResult<C::Response> {
        self.execute(ctx, command).await
    }
}

/// 执行通知
pub enum ExecuteEvent<'a> {
    /// 即将发送命令
    Executing {
        name: &'static str,
        command: &'a (dyn Any + Send),
    },
    /// 命令已成功执行
    Executed {
        name: &'static str,
        result: &'a (dyn Any + Send),
    },
}

impl ExecuteEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            ExecuteEvent::Executing { name, .. } | ExecuteEvent::Executed { name, .. } => name,
        }
    }

    pub fn command<T: 'static>(&self) -> Option<&T> {
        match self {
            ExecuteEvent::Executing { command, .. } => command.downcast_ref::<T>(),
            ExecuteEvent::Executed { .. } => None,
        }
    }

    pub fn result<T: 'static>(&self) -> Option<&T> {
        match self {
            ExecuteEvent::Executed { result, .. } => result.downcast_ref::<T>(),
            ExecuteEvent::Executing { .. } => None,
        }
    }
}

pub type ExecuteListener = Arc<dyn for<'a> Fn(&ExecuteEvent<'a>) + Send + Sync>;

/// 基于调度器的命令执行器
pub struct MediatorCommandExecutor<M> {
    mediator: Arc<M>,
    executing: Vec<ExecuteListener>,
    executed: Vec<ExecuteListener>,
}

impl<M: Mediator> MediatorCommandExecutor<M> {
    pub fn new(mediator: Arc<M>) -> Self {
        Self {
            mediator,
            executing: Vec::new(),
            executed: Vec::new(),
        }
    }

    /// 追加“执行前”监听器，按追加顺序调用
    pub fn on_executing<F>(mut self, listener: F) -> Self
    where
        F: for<'a> Fn(&ExecuteEvent<'a>) + Send + Sync + 'static,
    {
        self.executing.push(Arc::new(listener));
        self
    }

    /// 追加“执行后”监听器，仅在执行成功时调用
    pub fn on_executed<F>(mut self, listener: F) -> Self
    where
        F: for<'a> Fn(&ExecuteEvent<'a>) + Send + Sync + 'static,
    {
        self.executed.push(Arc::new(listener));
        self
    }

    pub fn mediator(&self) -> &Arc<M> {
        &self.mediator
    }
}

#[async_trait]
impl<M: Mediator> CommandExecutor for MediatorCommandExecutor<M> {
    async fn execute<C: Command>(&self, ctx: &AppContext, command: C) -> CqrsResult<C::Response> {
        tracing::debug!(
            command = C::NAME,
            correlation_id = ctx.correlation_id(),
            "executing command"
        );

        if !self.executing.is_empty() {
            let event = ExecuteEvent::Executing {
                name: C::NAME,
                command: &command,
            };
            for listener in &self.executing {
                listener(&event);
            }
        }

        let result = self.mediator.send(ctx, command).await?;

        if !self.executed.is_empty() {
            let event = ExecuteEvent::Executed {
                name: C::NAME,
                result: &result,
            };
            for listener in &self.executed {
                listener(&event);
            }
        }

        Ok(result)
    }
}
