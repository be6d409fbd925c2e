use async_trait::async_trait;
use cqrs_common::context::{AppContext, BusinessContext};
use cqrs_common::error::{CqrsError, CqrsResult};
use cqrs_common::executor::MediatorCommandExecutor;
use cqrs_common::handler::{CommandHandler, QueryHandler};
use cqrs_common::mediator::{InMemoryMediator, Mediator};
use cqrs_common::status::{CommandStatus, StatusChange, StatusHolder};
use cqrs_common::{BaseCommand, BaseQuery};
use cqrs_macros::{command, query};
use std::sync::Arc;

#[command(result = u32)]
#[derive(Default)]
struct RegisterMember {
    name: String,
}

struct RegisterMemberHandler;

#[async_trait]
impl CommandHandler<RegisterMember> for RegisterMemberHandler {
    async fn handle(&self, _ctx: &AppContext, mut cmd: RegisterMember) -> CqrsResult<u32> {
        cmd.set_status(CommandStatus::Accepted)?;
        println!("RegisterMember: name={}", cmd.name);
        cmd.set_status(CommandStatus::Created)?;
        Ok(42)
    }
}

#[query(result = String)]
struct MemberName {
    id: u32,
}

struct MemberNameHandler;

#[async_trait]
impl QueryHandler<MemberName> for MemberNameHandler {
    async fn handle(&self, _ctx: &AppContext, q: MemberName) -> CqrsResult<String> {
        Ok(format!("member-{}", q.id))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mediator = Arc::new(InMemoryMediator::new());
    mediator.register_command::<RegisterMember, _>(Arc::new(RegisterMemberHandler))?;
    mediator.register_query::<MemberName, _>(Arc::new(MemberNameHandler))?;

    let ctx = AppContext {
        biz: BusinessContext::builder()
            .maybe_correlation_id(Some("cor-1".into()))
            .maybe_actor_type(Some("user".into()))
            .maybe_actor_id(Some("u-1".into()))
            .build(),
        idempotency_key: Some("idem-1".into()),
        ..Default::default()
    };

    let executor = Arc::new(
        MediatorCommandExecutor::new(mediator.clone())
            .on_executing(|e| println!("executing {}", e.name()))
            .on_executed(|e| println!("executed {} -> {:?}", e.name(), e.result::<u32>())),
    );

    let mut cmd = RegisterMember {
        name: "Alice".into(),
        ..Default::default()
    };
    cmd.subscribe_status(|c: &StatusChange| -> anyhow::Result<()> {
        println!("status: {} -> {}", c.old_status(), c.new_status());
        Ok(())
    });

    let id = BaseCommand::with_executor(cmd, executor)
        .to_result(&ctx)
        .await?;

    let name = BaseQuery::with_mediator(MemberName { id }, mediator.clone())
        .to_result(&ctx)
        .await?;
    println!("registered {name}");

    // 未注册的请求 -> 返回 HandlerNotFound 错误
    #[query(result = ())]
    struct Unknown;

    if let Err(CqrsError::HandlerNotFound(name)) = mediator.send(&ctx, Unknown).await {
        eprintln!("HandlerNotFound as expected for request: {}", name);
    }
    Ok(())
}
