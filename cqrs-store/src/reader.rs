//! 实体读取（EntityReader）
//!
//! 组合仓储与投影登记表，提供查询处理器常用的读取操作。
//! 每个操作开始前检查取消令牌。
//!
use crate::entity::Entity;
use crate::ordering::OrderBy;
use crate::projection::ProjectionRegistry;
use crate::repository::Repository;
use crate::specification::{AnySpecification, Specification};
use cqrs_common::context::AppContext;
use cqrs_common::error::{CqrsError, CqrsResult};
use std::marker::PhantomData;
use std::sync::Arc;

pub struct EntityReader<E, R> {
    repository: Arc<R>,
    projections: Option<Arc<ProjectionRegistry>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R> Clone for EntityReader<E, R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            projections: self.projections.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, R> EntityReader<E, R>
where
    E: Entity,
    R: Repository<E>,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            projections: None,
            _entity: PhantomData,
        }
    }

    pub fn with_projections(mut self, projections: Arc<ProjectionRegistry>) -> Self {
        self.projections = Some(projections);
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn projector(&self) -> CqrsResult<&ProjectionRegistry> {
        self.projections
            .as_deref()
            .ok_or(CqrsError::MissingComponent("projector"))
    }

    /// 是否存在任意实体
    pub async fn exists_any(&self, ctx: &AppContext) -> CqrsResult<bool> {
        self.exists(ctx, &AnySpecification).await
    }

    pub async fn exists(&self, ctx: &AppContext, spec: &dyn Specification<E>) -> CqrsResult<bool> {
        ctx.ensure_active()?;
        self.repository.exists(spec).await
    }

    pub async fn get(&self, ctx: &AppContext, key: &E::Key) -> CqrsResult<Option<E>> {
        ctx.ensure_active()?;
        self.repository.get(key).await
    }

    /// 至多一个匹配；多于一个时返回 `Conflict`
    pub async fn get_one_or_none(
        &self,
        ctx: &AppContext,
        spec: &dyn Specification<E>,
    ) -> CqrsResult<Option<E>> {
        ctx.ensure_active()?;
        let mut found = self.repository.find(spec).await?;
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            n => Err(CqrsError::conflict(format!(
                "expected at most one match, found {n}"
            ))),
        }
    }

    pub async fn get_one_or_none_as<D>(
        &self,
        ctx: &AppContext,
        spec: &dyn Specification<E>,
    ) -> CqrsResult<Option<D>>
    where
        D: Default + 'static,
    {
        let projector = self.projector()?;
        let found = self.get_one_or_none(ctx, spec).await?;
        Ok(found.map(|e| projector.project::<E, D>(&e)))
    }

    pub async fn list(&self, ctx: &AppContext, spec: &dyn Specification<E>) -> CqrsResult<Vec<E>> {
        ctx.ensure_active()?;
        self.repository.find(spec).await
    }

    pub async fn list_ordered(
        &self,
        ctx: &AppContext,
        spec: &dyn Specification<E>,
        order: &OrderBy<E>,
    ) -> CqrsResult<Vec<E>> {
        let mut rows = self.list(ctx, spec).await?;
        order.sort(&mut rows);
        Ok(rows)
    }

    pub async fn list_as<D>(&self, ctx: &AppContext, spec: &dyn Specification<E>) -> CqrsResult<Vec<D>>
    where
        D: Default + 'static,
    {
        let projector = self.projector()?;
        let rows = self.list(ctx, spec).await?;
        Ok(projector.project_all::<E, D>(&rows))
    }
}
