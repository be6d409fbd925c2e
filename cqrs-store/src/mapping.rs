//! 对象映射（Mapper）
//!
//! 把命令映射为新实体，或把命令中的变更写回已有实体。
//!
use cqrs_common::error::CqrsResult;
use std::sync::Arc;

pub trait Mapper<S, D>: Send + Sync {
    /// 由源对象创建新的目标对象
    fn map(&self, source: &S) -> CqrsResult<D>;

    /// 把源对象写入已有的目标对象
    fn map_into(&self, source: &S, destination: &mut D) -> CqrsResult<()>;
}

type CreateFn<S, D> = Arc<dyn Fn(&S) -> CqrsResult<D> + Send + Sync>;
type ApplyFn<S, D> = Arc<dyn Fn(&S, &mut D) -> CqrsResult<()> + Send + Sync>;

/// 以一对闭包实现的映射器
pub struct FnMapper<S, D> {
    create: CreateFn<S, D>,
    apply: ApplyFn<S, D>,
}

impl<S, D> FnMapper<S, D> {
    pub fn new<C, A>(create: C, apply: A) -> Self
    where
        C: Fn(&S) -> CqrsResult<D> + Send + Sync + 'static,
        A: Fn(&S, &mut D) -> CqrsResult<()> + Send + Sync + 'static,
    {
        Self {
            create: Arc::new(create),
            apply: Arc::new(apply),
        }
    }
}

impl<S, D> Clone for FnMapper<S, D> {
    fn clone(&self) -> Self {
        Self {
            create: self.create.clone(),
            apply: self.apply.clone(),
        }
    }
}

impl<S, D> Mapper<S, D> for FnMapper<S, D> {
    fn map(&self, source: &S) -> CqrsResult<D> {
        (self.create)(source)
    }

    fn map_into(&self, source: &S, destination: &mut D) -> CqrsResult<()> {
        (self.apply)(source, destination)
    }
}
