//! 排序（OrderBy）
//!
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// 排序方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, OrderDirection::Asc)
    }

    /// 按方向调整升序比较结果
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        }
    }
}

impl From<bool> for OrderDirection {
    /// `true` 为升序
    fn from(ascending: bool) -> Self {
        if ascending {
            OrderDirection::Asc
        } else {
            OrderDirection::Desc
        }
    }
}

type Comparator<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

/// 排序规则：按键比较，可用 `then_by` 追加次级规则
pub struct OrderBy<E> {
    compare: Comparator<E>,
}

impl<E: 'static> OrderBy<E> {
    pub fn new<K, F>(key: F, direction: OrderDirection) -> Self
    where
        K: Ord,
        F: Fn(&E) -> K + Send + Sync + 'static,
    {
        Self {
            compare: Arc::new(move |a, b| direction.apply(key(a).cmp(&key(b)))),
        }
    }

    pub fn asc<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&E) -> K + Send + Sync + 'static,
    {
        Self::new(key, OrderDirection::Asc)
    }

    pub fn desc<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&E) -> K + Send + Sync + 'static,
    {
        Self::new(key, OrderDirection::Desc)
    }

    /// 主规则相等时使用次级规则
    pub fn then_by(self, next: OrderBy<E>) -> Self {
        let first = self.compare;
        let second = next.compare;
        Self {
            compare: Arc::new(move |a, b| first(a, b).then_with(|| second(a, b))),
        }
    }

    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        (self.compare)(a, b)
    }

    /// 稳定排序
    pub fn sort(&self, items: &mut [E]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

impl<E> Clone for OrderBy<E> {
    fn clone(&self) -> Self {
        Self {
            compare: self.compare.clone(),
        }
    }
}

impl<E> fmt::Debug for OrderBy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBy").finish_non_exhaustive()
    }
}
