use anyhow::Result as AnyResult;
use async_trait::async_trait;
use cqrs_common::context::AppContext;
use cqrs_common::error::{CqrsError, CqrsResult};
use cqrs_common::executor::MediatorCommandExecutor;
use cqrs_common::handler::{CommandHandler, QueryHandler};
use cqrs_common::mediator::{InMemoryMediator, Mediator};
use cqrs_common::status::{CommandStatus, StatusChange, StatusHolder};
use cqrs_common::{BaseCommand, BaseQuery};
use cqrs_macros::{command, query};
use std::sync::{Arc, Mutex};

#[command(result = CommandStatus)]
#[derive(Default)]
struct Checkout {
    book: String,
    steps: Vec<CommandStatus>,
}

struct CheckoutHandler;

#[async_trait]
impl CommandHandler<Checkout> for CheckoutHandler {
    async fn handle(&self, _ctx: &AppContext, mut cmd: Checkout) -> CqrsResult<CommandStatus> {
        if cmd.book.is_empty() {
            cmd.set_status(CommandStatus::NotFound)?;
            return Ok(cmd.status());
        }
        for step in cmd.steps.clone() {
            cmd.set_status(step)?;
        }
        Ok(cmd.status())
    }
}

#[query(result = usize)]
struct Loans;

struct LoansHandler;

#[async_trait]
impl QueryHandler<Loans> for LoansHandler {
    async fn handle(&self, _ctx: &AppContext, _q: Loans) -> CqrsResult<usize> {
        Ok(3)
    }
}

type Log = Arc<Mutex<Vec<(&'static str, CommandStatus, CommandStatus)>>>;

fn record(log: Log, tag: &'static str) -> impl Fn(&StatusChange) -> AnyResult<()> + Send + Sync {
    move |c: &StatusChange| -> AnyResult<()> {
        log.lock()
            .unwrap()
            .push((tag, c.old_status(), c.new_status()));
        Ok(())
    }
}

fn mediator() -> Arc<InMemoryMediator> {
    let m = InMemoryMediator::new();
    m.register_command::<Checkout, _>(Arc::new(CheckoutHandler))
        .unwrap();
    m.register_query::<Loans, _>(Arc::new(LoansHandler)).unwrap();
    Arc::new(m)
}

fn checkout(book: &str, steps: &[CommandStatus]) -> Checkout {
    Checkout {
        book: book.into(),
        steps: steps.to_vec(),
        ..Default::default()
    }
}

#[tokio::test]
async fn repeated_identical_status_is_still_reported() {
    let log: Log = Arc::default();
    let mut cmd = checkout("dune", &[CommandStatus::Created, CommandStatus::Created]);
    cmd.subscribe_status(record(log.clone(), "a"));

    let out = mediator().send(&AppContext::default(), cmd).await.unwrap();

    assert_eq!(out, CommandStatus::Created);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            ("a", CommandStatus::Default, CommandStatus::Created),
            ("a", CommandStatus::Created, CommandStatus::Created),
        ]
    );
}

#[tokio::test]
async fn observers_are_notified_in_subscription_order() {
    let log: Log = Arc::default();
    let mut cmd = checkout("emma", &[CommandStatus::Error]);
    cmd.subscribe_status(record(log.clone(), "a"));
    cmd.subscribe_status(record(log.clone(), "b"));

    BaseCommand::with_mediator(cmd, mediator())
        .to_result(&AppContext::default())
        .await
        .unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            ("a", CommandStatus::Default, CommandStatus::Error),
            ("b", CommandStatus::Default, CommandStatus::Error),
        ]
    );
}

#[tokio::test]
async fn unsubscribed_observer_hears_nothing() {
    let log: Log = Arc::default();
    let mut cmd = checkout("ulysses", &[CommandStatus::Accepted, CommandStatus::Success]);
    let a = cmd.subscribe_status(record(log.clone(), "a"));
    cmd.subscribe_status(record(log.clone(), "b"));
    assert!(cmd.unsubscribe_status(a));
    assert!(!cmd.unsubscribe_status(a));

    mediator().send(&AppContext::default(), cmd).await.unwrap();

    let tags: Vec<&str> = log.lock().unwrap().iter().map(|(t, _, _)| *t).collect();
    assert_eq!(tags, vec!["b", "b"]);
}

#[tokio::test]
async fn failing_observer_surfaces_through_dispatch() {
    let log: Log = Arc::default();
    let mut cmd = checkout("dracula", &[CommandStatus::Conflict, CommandStatus::Success]);
    cmd.subscribe_status(record(log.clone(), "before"));
    let failing = cmd.subscribe_status(|c: &StatusChange| -> AnyResult<()> {
        anyhow::bail!("audit sink rejected {}", c.new_status())
    });
    cmd.subscribe_status(record(log.clone(), "after"));

    let err = mediator()
        .send(&AppContext::default(), cmd)
        .await
        .unwrap_err();

    match err {
        CqrsError::StatusObserver {
            subscription,
            source,
        } => {
            assert_eq!(subscription, failing);
            assert!(source.to_string().contains("Conflict"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // 出错观察者之前的已收到通知，之后的未收到；后续步骤不再执行
    assert_eq!(
        *log.lock().unwrap(),
        vec![("before", CommandStatus::Default, CommandStatus::Conflict)]
    );
}

#[tokio::test]
async fn executor_wraps_status_flow() {
    let events: Arc<Mutex<Vec<String>>> = Arc::default();
    let before = events.clone();
    let after = events.clone();
    let executor = Arc::new(
        MediatorCommandExecutor::new(mediator())
            .on_executing(move |e| before.lock().unwrap().push(format!("executing {}", e.name())))
            .on_executed(move |e| {
                let status = e.result::<CommandStatus>().copied().unwrap_or_default();
                after.lock().unwrap().push(format!("executed {status}"));
            }),
    );

    let status = BaseCommand::with_executor(checkout("", &[]), executor)
        .to_result(&AppContext::default())
        .await
        .unwrap();

    assert_eq!(status, CommandStatus::NotFound);
    assert_eq!(
        *events.lock().unwrap(),
        vec!["executing Checkout".to_string(), "executed NotFound".to_string()]
    );
}

#[tokio::test]
async fn query_round_trip_and_unbound_wrappers() {
    let n = BaseQuery::with_mediator(Loans, mediator())
        .to_result(&AppContext::default())
        .await
        .unwrap();
    assert_eq!(n, 3);

    let err = BaseCommand::new(checkout("dune", &[]))
        .to_result(&AppContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CqrsError::Unbound { request: "Checkout", .. }));
}
