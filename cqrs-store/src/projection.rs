//! 投影（Projection）
//!
//! 以 (实体类型, 目标类型) 为键登记投影函数。
//! 未登记的组合回退为 `D::default()`。
//!
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

pub trait Projector<E, D>: Send + Sync {
    fn project(&self, entity: &E) -> D;
}

impl<E, D, F> Projector<E, D> for F
where
    F: Fn(&E) -> D + Send + Sync,
{
    fn project(&self, entity: &E) -> D {
        self(entity)
    }
}

type ErasedProjector = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct ProjectionRegistry {
    projections: DashMap<(TypeId, TypeId), ErasedProjector>,
}

impl ProjectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记投影；同一组合重复登记时以新者为准
    pub fn register<E, D, P>(&self, projector: P)
    where
        E: 'static,
        D: 'static,
        P: Projector<E, D> + 'static,
    {
        let typed: Arc<dyn Projector<E, D>> = Arc::new(projector);
        let erased: ErasedProjector = Arc::new(typed);
        if self
            .projections
            .insert((TypeId::of::<E>(), TypeId::of::<D>()), erased)
            .is_some()
        {
            tracing::warn!(
                entity = type_name::<E>(),
                dto = type_name::<D>(),
                "replacing registered projection"
            );
        }
    }

    pub fn contains<E: 'static, D: 'static>(&self) -> bool {
        self.projections
            .contains_key(&(TypeId::of::<E>(), TypeId::of::<D>()))
    }

    fn lookup<E: 'static, D: 'static>(&self) -> Option<Arc<dyn Projector<E, D>>> {
        self.projections
            .get(&(TypeId::of::<E>(), TypeId::of::<D>()))
            .and_then(|p| p.value().downcast_ref::<Arc<dyn Projector<E, D>>>().cloned())
    }

    pub fn project<E: 'static, D: Default + 'static>(&self, entity: &E) -> D {
        match self.lookup::<E, D>() {
            Some(p) => p.project(entity),
            None => {
                tracing::trace!(
                    entity = type_name::<E>(),
                    dto = type_name::<D>(),
                    "no projection registered, using default"
                );
                D::default()
            }
        }
    }

    pub fn project_all<E: 'static, D: Default + 'static>(&self, entities: &[E]) -> Vec<D> {
        match self.lookup::<E, D>() {
            Some(p) => entities.iter().map(|e| p.project(e)).collect(),
            None => entities.iter().map(|_| D::default()).collect(),
        }
    }
}
