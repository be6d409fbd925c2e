//! 实体写入（EntityWriter）
//!
//! 组合仓储与映射器，为命令处理器提供写入操作。带状态的操作会随进度
//! 更新命令状态，并返回最终状态：
//!
//! | 操作 | 过程中 | 成功 | 其他 |
//! |------|--------|------|------|
//! | `add_and_save` | Added | Created | Error |
//! | `update_and_save` | Modified | Success | NotFound / Unchanged / Error |
//! | `remove_and_save` | Removed | Deleted | NotFound / Error |
//!
//! “成功”指恰好一行受影响。每个访问存储的操作开始前检查取消令牌。
//!
use crate::entity::Entity;
use crate::mapping::Mapper;
use crate::repository::{Change, Repository};
use crate::specification::Specification;
use cqrs_common::context::AppContext;
use cqrs_common::error::{CqrsError, CqrsResult};
use cqrs_common::status::{CommandStatus, StatusHolder};
use std::marker::PhantomData;
use std::sync::Arc;

pub struct EntityWriter<E, C, R> {
    repository: Arc<R>,
    mapper: Option<Arc<dyn Mapper<C, E>>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, C, R> Clone for EntityWriter<E, C, R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            mapper: self.mapper.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, C, R> EntityWriter<E, C, R>
where
    E: Entity,
    C: StatusHolder + Send + Sync + 'static,
    R: Repository<E>,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            mapper: None,
            _entity: PhantomData,
        }
    }

    pub fn with_mapper<M>(mut self, mapper: Arc<M>) -> Self
    where
        M: Mapper<C, E> + 'static,
    {
        self.mapper = Some(mapper);
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn mapper(&self) -> CqrsResult<&dyn Mapper<C, E>> {
        self.mapper
            .as_deref()
            .ok_or(CqrsError::MissingComponent("mapper"))
    }

    /// 提交变更，返回受影响的行数
    pub async fn save_changes(&self, ctx: &AppContext, changes: Vec<Change<E>>) -> CqrsResult<usize> {
        ctx.ensure_active()?;
        self.repository.save(changes).await
    }

    /// 提交变更，恰好一行受影响时返回 `true`
    pub async fn save_one(&self, ctx: &AppContext, changes: Vec<Change<E>>) -> CqrsResult<bool> {
        Ok(self.save_changes(ctx, changes).await? == 1)
    }

    pub fn map_command_to_new_entity(&self, command: &C) -> CqrsResult<E> {
        self.mapper()?.map(command)
    }

    pub fn map_command_to_existing_entity(&self, command: &C, entity: &mut E) -> CqrsResult<()> {
        self.mapper()?.map_into(command, entity)
    }

    /// 新增实体：Added → Created，否则 Error
    pub async fn add_and_save(
        &self,
        ctx: &AppContext,
        command: &mut C,
        entity: E,
    ) -> CqrsResult<CommandStatus> {
        ctx.ensure_active()?;
        command.set_status(CommandStatus::Added)?;

        let status = if self.save_one(ctx, vec![Change::Insert(entity)]).await? {
            CommandStatus::Created
        } else {
            CommandStatus::Error
        };
        finish(command, status)
    }

    /// 更新实体：Modified → Success；不存在为 NotFound，值未变化为 Unchanged，否则 Error
    pub async fn update_and_save(
        &self,
        ctx: &AppContext,
        command: &mut C,
        entity: E,
    ) -> CqrsResult<CommandStatus> {
        ctx.ensure_active()?;
        command.set_status(CommandStatus::Modified)?;

        let status = match self.repository.get(entity.key()).await? {
            None => CommandStatus::NotFound,
            Some(stored) if stored == entity => CommandStatus::Unchanged,
            Some(_) => {
                if self.save_one(ctx, vec![Change::Update(entity)]).await? {
                    CommandStatus::Success
                } else {
                    CommandStatus::Error
                }
            }
        };
        finish(command, status)
    }

    /// 删除唯一匹配的实体；无匹配为 NotFound，多于一个匹配返回 `Conflict` 错误
    pub async fn remove_and_save(
        &self,
        ctx: &AppContext,
        command: &mut C,
        spec: &dyn Specification<E>,
    ) -> CqrsResult<CommandStatus> {
        ctx.ensure_active()?;
        let mut found = self.repository.find(spec).await?;
        if found.len() > 1 {
            return Err(CqrsError::conflict(format!(
                "expected at most one match, found {}",
                found.len()
            )));
        }
        match found.pop() {
            Some(entity) => self.remove_entity_and_save(ctx, command, &entity).await,
            None => finish(command, CommandStatus::NotFound),
        }
    }

    /// 删除已知实体：Removed → Deleted，否则 Error
    pub async fn remove_entity_and_save(
        &self,
        ctx: &AppContext,
        command: &mut C,
        entity: &E,
    ) -> CqrsResult<CommandStatus> {
        ctx.ensure_active()?;
        command.set_status(CommandStatus::Removed)?;

        let status = if self
            .save_one(ctx, vec![Change::Remove(entity.key().clone())])
            .await?
        {
            CommandStatus::Deleted
        } else {
            CommandStatus::Error
        };
        finish(command, status)
    }

    /// 由命令映射出新实体后新增
    pub async fn add_from_command(
        &self,
        ctx: &AppContext,
        command: &mut C,
    ) -> CqrsResult<CommandStatus> {
        let entity = self.map_command_to_new_entity(command)?;
        self.add_and_save(ctx, command, entity).await
    }

    /// 读取已存储实体，写入命令中的变更后更新
    pub async fn update_from_command(
        &self,
        ctx: &AppContext,
        command: &mut C,
        key: &E::Key,
    ) -> CqrsResult<CommandStatus> {
        ctx.ensure_active()?;
        let Some(mut entity) = self.repository.get(key).await? else {
            return finish(command, CommandStatus::NotFound);
        };
        self.map_command_to_existing_entity(command, &mut entity)?;
        self.update_and_save(ctx, command, entity).await
    }
}

fn finish<C: StatusHolder>(command: &mut C, status: CommandStatus) -> CqrsResult<CommandStatus> {
    command.set_status(status)?;
    if status == CommandStatus::Error {
        tracing::debug!(%status, "write did not affect exactly one row");
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_memory::InMemoryRepository;
    use crate::specification::spec;
    use async_trait::async_trait;
    use cqrs_common::status::{StatusChange, StatusTracker};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Shelf {
        id: u32,
        label: &'static str,
    }

    impl Entity for Shelf {
        type Key = u32;

        fn key(&self) -> &u32 {
            &self.id
        }
    }

    fn shelf(id: u32, label: &'static str) -> Shelf {
        Shelf { id, label }
    }

    /// 读取正常，但提交永远不影响任何行
    struct ReadOnly(InMemoryRepository<Shelf>);

    #[async_trait]
    impl Repository<Shelf> for ReadOnly {
        async fn find(&self, spec: &dyn Specification<Shelf>) -> CqrsResult<Vec<Shelf>> {
            self.0.find(spec).await
        }

        async fn get(&self, key: &u32) -> CqrsResult<Option<Shelf>> {
            self.0.get(key).await
        }

        async fn exists(&self, spec: &dyn Specification<Shelf>) -> CqrsResult<bool> {
            self.0.exists(spec).await
        }

        async fn save(&self, _changes: Vec<Change<Shelf>>) -> CqrsResult<usize> {
            Ok(0)
        }

        async fn delete(&self, _spec: &dyn Specification<Shelf>) -> CqrsResult<usize> {
            Ok(0)
        }
    }

    type Trail = Arc<Mutex<Vec<CommandStatus>>>;

    fn tracked() -> (StatusTracker, Trail) {
        let trail: Trail = Arc::default();
        let sink = trail.clone();
        let mut tracker = StatusTracker::new();
        tracker.subscribe(move |c: &StatusChange| -> anyhow::Result<()> {
            sink.lock().unwrap().push(c.new_status());
            Ok(())
        });
        (tracker, trail)
    }

    fn read_only() -> EntityWriter<Shelf, StatusTracker, ReadOnly> {
        EntityWriter::new(Arc::new(ReadOnly(InMemoryRepository::with_rows([
            shelf(1, "a"),
            shelf(2, "b"),
        ]))))
    }

    fn cancelled() -> AppContext {
        let ctx = AppContext::default();
        ctx.cancellation.cancel();
        ctx
    }

    #[tokio::test]
    async fn update_that_affects_no_row_is_error() {
        let (mut cmd, trail) = tracked();
        let status = read_only()
            .update_and_save(&AppContext::default(), &mut cmd, shelf(1, "A"))
            .await
            .unwrap();

        assert_eq!(status, CommandStatus::Error);
        assert_eq!(
            *trail.lock().unwrap(),
            vec![CommandStatus::Modified, CommandStatus::Error]
        );
    }

    #[tokio::test]
    async fn remove_that_affects_no_row_is_error() {
        let (mut cmd, trail) = tracked();
        let status = read_only()
            .remove_entity_and_save(&AppContext::default(), &mut cmd, &shelf(2, "b"))
            .await
            .unwrap();

        assert_eq!(status, CommandStatus::Error);
        assert_eq!(
            *trail.lock().unwrap(),
            vec![CommandStatus::Removed, CommandStatus::Error]
        );
    }

    #[tokio::test]
    async fn cancelled_update_from_command_keeps_status() {
        let repo = Arc::new(InMemoryRepository::with_rows([shelf(1, "a")]));
        let writer: EntityWriter<Shelf, StatusTracker, _> = EntityWriter::new(repo.clone());
        let (mut cmd, trail) = tracked();

        let err = writer
            .update_from_command(&cancelled(), &mut cmd, &1)
            .await
            .unwrap_err();

        assert!(matches!(err, CqrsError::Cancelled(_)));
        assert_eq!(cmd.status(), CommandStatus::Default);
        assert!(trail.lock().unwrap().is_empty());
        assert_eq!(repo.get(&1).await.unwrap(), Some(shelf(1, "a")));
    }

    #[tokio::test]
    async fn cancelled_remove_keeps_status_and_rows() {
        let repo = Arc::new(InMemoryRepository::with_rows([shelf(1, "a")]));
        let writer: EntityWriter<Shelf, StatusTracker, _> = EntityWriter::new(repo.clone());
        let (mut cmd, trail) = tracked();

        let err = writer
            .remove_and_save(&cancelled(), &mut cmd, &spec(|s: &Shelf| s.id == 1))
            .await
            .unwrap_err();

        assert!(matches!(err, CqrsError::Cancelled(_)));
        assert_eq!(cmd.status(), CommandStatus::Default);
        assert!(trail.lock().unwrap().is_empty());
        assert_eq!(repo.len().await, 1);
    }
}
