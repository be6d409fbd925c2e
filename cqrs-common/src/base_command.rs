//! 已绑定执行路径的命令（BaseCommand）
//!
//! 命令载荷与其执行路径一起持有，路径在构造时确定：
//! - `Executor`：经由 [`CommandExecutor`] 执行（会触发执行前后通知）；
//! - `Dispatcher`：直接交给调度器；
//! - `Unbound`：没有可用路径，在 `to_result` 时以 `CqrsError::Unbound` 报告。
//!
//! 同时提供执行器与调度器时执行器优先：`bind_mediator` 不会覆盖已绑定的执行器。
//! 该优先级属于实现细节，不应作为契约依赖。

use crate::{
    context::AppContext,
    error::{CqrsError, CqrsResult},
    executor::{CommandExecutor, ExecuteCommand},
    mediator::{Mediator, SendRequest},
    request::Command,
    status::{StatusHolder, StatusTracker},
};
use std::fmt;
use std::sync::Arc;

pub enum CommandRoute<C: Command> {
    Executor(Arc<dyn ExecuteCommand<C>>),
    Dispatcher(Arc<dyn SendRequest<C>>),
    Unbound,
}

impl<C: Command> CommandRoute<C> {
    pub fn is_unbound(&self) -> bool {
        matches!(self, CommandRoute::Unbound)
    }
}

impl<C: Command> Clone for CommandRoute<C> {
    fn clone(&self) -> Self {
        match self {
            CommandRoute::Executor(e) => CommandRoute::Executor(e.clone()),
            CommandRoute::Dispatcher(d) => CommandRoute::Dispatcher(d.clone()),
            CommandRoute::Unbound => CommandRoute::Unbound,
        }
    }
}

impl<C: Command> fmt::Debug for CommandRoute<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandRoute::Executor(_) => f.write_str("Executor"),
            CommandRoute::Dispatcher(_) => f.write_str("Dispatcher"),
            CommandRoute::Unbound => f.write_str("Unbound"),
        }
    }
}

pub struct BaseCommand<C: Command> {
    command: C,
    route: CommandRoute<C>,
}

impl<C: Command> BaseCommand<C> {
    /// 未绑定任何执行路径
    pub fn new(command: C) -> Self {
        Self {
            command,
            route: CommandRoute::Unbound,
        }
    }

    pub fn with_executor<E>(command: C, executor: Arc<E>) -> Self
    where
        E: CommandExecutor + 'static,
    {
        Self {
            command,
            route: CommandRoute::Executor(executor),
        }
    }

    pub fn with_mediator<M>(command: C, mediator: Arc<M>) -> Self
    where
        M: Mediator + 'static,
    {
        Self {
            command,
            route: CommandRoute::Dispatcher(mediator),
        }
    }

    /// 绑定执行器，覆盖任何已有路径
    pub fn bind_executor<E>(mut self, executor: Arc<E>) -> Self
    where
        E: CommandExecutor + 'static,
    {
        self.route = CommandRoute::Executor(executor);
        self
    }

    /// 绑定调度器；若已绑定执行器则保持不变
    pub fn bind_mediator<M>(mut self, mediator: Arc<M>) -> Self
    where
        M: Mediator + 'static,
    {
        if !matches!(self.route, CommandRoute::Executor(_)) {
            self.route = CommandRoute::Dispatcher(mediator);
        }
        self
    }

    pub fn route(&self) -> &CommandRoute<C> {
        &self.route
    }

    pub fn command(&self) -> &C {
        &self.command
    }

    pub fn command_mut(&mut self) -> &mut C {
        &mut self.command
    }

    pub fn into_inner(self) -> C {
        self.command
    }

    /// 沿绑定路径执行命令并返回结果
    pub async fn to_result(self, ctx: &AppContext) -> CqrsResult<C::Response> {
        match self.route {
            CommandRoute::Executor(executor) => executor.execute_command(ctx, self.command).await,
            CommandRoute::Dispatcher(mediator) => mediator.send_request(ctx, self.command).await,
            CommandRoute::Unbound => Err(CqrsError::Unbound {
                request: C::NAME,
                missing: "executor",
            }),
        }
    }
}

impl<C: Command> StatusHolder for BaseCommand<C> {
    fn status_tracker(&self) -> &StatusTracker {
        self.command.status_tracker()
    }

    fn status_tracker_mut(&mut self) -> &mut StatusTracker {
        self.command.status_tracker_mut()
    }
}

impl<C: Command + fmt::Debug> fmt::Debug for BaseCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseCommand")
            .field("command", &self.command)
            .field("route", &self.route)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::MediatorCommandExecutor;
    use crate::handler::CommandHandler;
    use crate::mediator::InMemoryMediator;
    use crate::request::Request;
    use crate::status::{CommandStatus, StatusChange};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Publish {
        title: String,
        status: StatusTracker,
    }

    impl Request for Publish {
        const NAME: &'static str = "Publish";
        type Response = CommandStatus;
    }

    impl StatusHolder for Publish {
        fn status_tracker(&self) -> &StatusTracker {
            &self.status
        }

        fn status_tracker_mut(&mut self) -> &mut StatusTracker {
            &mut self.status
        }
    }

    impl Command for Publish {}

    struct PublishHandler;

    #[async_trait]
    impl CommandHandler<Publish> for PublishHandler {
        async fn handle(&self, _ctx: &AppContext, mut cmd: Publish) -> CqrsResult<CommandStatus> {
            cmd.set_status(CommandStatus::Accepted)?;
            cmd.set_status(CommandStatus::Created)?;
            Ok(cmd.status())
        }
    }

    fn mediator() -> Arc<InMemoryMediator> {
        let m = InMemoryMediator::new();
        m.register_command::<Publish, _>(Arc::new(PublishHandler))
            .unwrap();
        Arc::new(m)
    }

    fn publish(title: &str) -> Publish {
        Publish {
            title: title.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unbound_command_fails_at_point_of_use() {
        let cmd = BaseCommand::new(publish("a"));
        assert!(cmd.route().is_unbound());

        let err = cmd.to_result(&AppContext::default()).await.unwrap_err();
        assert!(matches!(
            err,
            CqrsError::Unbound {
                request: "Publish",
                missing: "executor"
            }
        ));
    }

    #[tokio::test]
    async fn dispatcher_route_sends_through_mediator() {
        let cmd = BaseCommand::with_mediator(publish("b"), mediator());
        let out = cmd.to_result(&AppContext::default()).await.unwrap();
        assert_eq!(out, CommandStatus::Created);
    }

    #[tokio::test]
    async fn observers_travel_with_the_command() {
        let log: Arc<Mutex<Vec<StatusChange>>> = Arc::default();
        let sink = log.clone();

        let mut cmd = BaseCommand::with_mediator(publish("c"), mediator());
        cmd.subscribe_status(move |c: &StatusChange| -> anyhow::Result<()> {
            sink.lock().unwrap().push(*c);
            Ok(())
        });
        cmd.to_result(&AppContext::default()).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                StatusChange::new(CommandStatus::Default, CommandStatus::Accepted),
                StatusChange::new(CommandStatus::Accepted, CommandStatus::Created),
            ]
        );
    }

    #[tokio::test]
    async fn executor_takes_precedence_over_mediator() {
        let executed = Arc::new(AtomicUsize::new(0));
        let counter = executed.clone();
        let executor = Arc::new(
            MediatorCommandExecutor::new(mediator()).on_executing(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let cmd = BaseCommand::new(publish("d"))
            .bind_executor(executor)
            .bind_mediator(mediator());
        assert!(matches!(cmd.route(), CommandRoute::Executor(_)));

        cmd.to_result(&AppContext::default()).await.unwrap();
        assert_eq!(executed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn exposes_payload_and_status() {
        let mut cmd = BaseCommand::new(publish("e"));
        assert_eq!(cmd.command().title, "e");
        cmd.command_mut().title.push('!');
        cmd.set_status(CommandStatus::Conflict).unwrap();
        assert_eq!(cmd.status(), CommandStatus::Conflict);

        let inner = cmd.into_inner();
        assert_eq!(inner.title, "e!");
        assert_eq!(inner.status(), CommandStatus::Conflict);
    }
}
