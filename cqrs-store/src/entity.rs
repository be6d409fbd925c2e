//! 实体（Entity）抽象
//!
use std::fmt::Debug;
use std::hash::Hash;

/// 具备唯一键的可存储实体
///
/// `PartialEq` 用于判定更新是否实际改变了已存储的值。
pub trait Entity: Clone + PartialEq + Send + Sync + 'static {
    /// 实体键类型
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// 获取实体键
    fn key(&self) -> &Self::Key;
}
