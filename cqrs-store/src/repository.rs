//! 仓储（Repository）
//!
//! 每种存储后端实现一次的窄接口：按规约查询、按键获取、存在性判断、
//! 批量提交变更与按规约删除。写操作返回受影响的行数。
//!
use crate::entity::Entity;
use crate::specification::Specification;
use async_trait::async_trait;
use cqrs_common::error::CqrsResult;
use std::sync::Arc;

/// 一次待提交的实体变更
#[derive(Debug, Clone, PartialEq)]
pub enum Change<E: Entity> {
    /// 新增；键已存在时不生效
    Insert(E),
    /// 覆盖已存储的同键实体；键不存在或值未变化时不生效
    Update(E),
    /// 按键移除；键不存在时不生效
    Remove(E::Key),
}

#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Entity,
{
    /// 按插入顺序返回满足规约的实体
    async fn find(&self, spec: &dyn Specification<E>) -> CqrsResult<Vec<E>>;

    async fn get(&self, key: &E::Key) -> CqrsResult<Option<E>>;

    async fn exists(&self, spec: &dyn Specification<E>) -> CqrsResult<bool>;

    /// 提交一组变更，返回受影响的行数
    async fn save(&self, changes: Vec<Change<E>>) -> CqrsResult<usize>;

    /// 删除满足规约的实体，返回受影响的行数
    async fn delete(&self, spec: &dyn Specification<E>) -> CqrsResult<usize>;
}

#[async_trait]
impl<E, T> Repository<E> for Arc<T>
where
    E: Entity,
    T: Repository<E> + ?Sized,
{
    async fn find(&self, spec: &dyn Specification<E>) -> CqrsResult<Vec<E>> {
        (**self).find(spec).await
    }

    async fn get(&self, key: &E::Key) -> CqrsResult<Option<E>> {
        (**self).get(key).await
    }

    async fn exists(&self, spec: &dyn Specification<E>) -> CqrsResult<bool> {
        (**self).exists(spec).await
    }

    async fn save(&self, changes: Vec<Change<E>>) -> CqrsResult<usize> {
        (**self).save(changes).await
    }

    async fn delete(&self, spec: &dyn Specification<E>) -> CqrsResult<usize> {
        (**self).delete(spec).await
    }
}
