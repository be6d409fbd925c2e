//! 内存仓储实现
//!
//! 以 `IndexMap` 保存实体，查询结果保持插入顺序；
//! 一次 `save` 在同一把写锁内完成，其他任务看不到中间状态。
//!
use crate::entity::Entity;
use crate::repository::{Change, Repository};
use crate::specification::Specification;
use async_trait::async_trait;
use cqrs_common::error::CqrsResult;
use indexmap::IndexMap;
use tokio::sync::RwLock;

pub struct InMemoryRepository<E: Entity> {
    rows: RwLock<IndexMap<E::Key, E>>,
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(IndexMap::new()),
        }
    }
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以初始数据构建；键重复时后者覆盖前者
    pub fn with_rows(rows: impl IntoIterator<Item = E>) -> Self {
        let rows = rows.into_iter().map(|e| (e.key().clone(), e)).collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn apply(rows: &mut IndexMap<E::Key, E>, change: Change<E>) -> usize {
        match change {
            Change::Insert(e) => {
                if rows.contains_key(e.key()) {
                    return 0;
                }
                rows.insert(e.key().clone(), e);
                1
            }
            Change::Update(e) => match rows.get_mut(e.key()) {
                Some(stored) if *stored != e => {
                    *stored = e;
                    1
                }
                _ => 0,
            },
            Change::Remove(key) => usize::from(rows.shift_remove(&key).is_some()),
        }
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn find(&self, spec: &dyn Specification<E>) -> CqrsResult<Vec<E>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|e| spec.is_satisfied_by(e))
            .cloned()
            .collect())
    }

    async fn get(&self, key: &E::Key) -> CqrsResult<Option<E>> {
        Ok(self.rows.read().await.get(key).cloned())
    }

    async fn exists(&self, spec: &dyn Specification<E>) -> CqrsResult<bool> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .any(|e| spec.is_satisfied_by(e)))
    }

    async fn save(&self, changes: Vec<Change<E>>) -> CqrsResult<usize> {
        let mut rows = self.rows.write().await;
        let requested = changes.len();
        let affected: usize = changes
            .into_iter()
            .map(|c| Self::apply(&mut rows, c))
            .sum();
        tracing::debug!(requested, affected, "changes saved");
        Ok(affected)
    }

    async fn delete(&self, spec: &dyn Specification<E>) -> CqrsResult<usize> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, e| !spec.is_satisfied_by(e));
        Ok(before - rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specification::{AnySpecification, spec};

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

    #[tokio::test]
    async fn affected_rows_follow_store_rules() {
        let repo = InMemoryRepository::with_rows([shelf(1, "a")]);

        assert_eq!(repo.save(vec![Change::Insert(shelf(1, "dup"))]).await.unwrap(), 0);
        assert_eq!(repo.save(vec![Change::Insert(shelf(2, "b"))]).await.unwrap(), 1);
        assert_eq!(repo.save(vec![Change::Update(shelf(9, "x"))]).await.unwrap(), 0);
        assert_eq!(repo.save(vec![Change::Update(shelf(1, "a"))]).await.unwrap(), 0);
        assert_eq!(repo.save(vec![Change::Update(shelf(1, "A"))]).await.unwrap(), 1);
        assert_eq!(repo.save(vec![Change::Remove(9)]).await.unwrap(), 0);
        assert_eq!(
            repo.save(vec![Change::Remove(2), Change::Insert(shelf(3, "c"))])
                .await
                .unwrap(),
            2
        );

        assert_eq!(repo.get(&1).await.unwrap(), Some(shelf(1, "A")));
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn find_keeps_insertion_order_and_delete_counts() {
        let repo = InMemoryRepository::with_rows([shelf(3, "c"), shelf(1, "a"), shelf(2, "b")]);

        let all = repo.find(&AnySpecification).await.unwrap();
        let ids: Vec<u32> = all.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let odd = spec(|s: &Shelf| s.id % 2 == 1);
        assert!(repo.exists(&odd).await.unwrap());
        assert_eq!(repo.delete(&odd).await.unwrap(), 2);
        assert!(!repo.exists(&odd).await.unwrap());
        assert_eq!(repo.delete(&odd).await.unwrap(), 0);
        assert!(!repo.is_empty().await);
    }
}
