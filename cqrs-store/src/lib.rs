//! CQRS 存储组合库（cqrs-store）
//!
//! 以组合代替多层泛型继承，为命令/查询处理器提供存储访问能力：
//! - 仓储接口（`repository`）与内存实现（`in_memory`）
//! - 规约（`specification`）与排序（`ordering`）
//! - 映射（`mapping`）与投影（`projection`）
//! - 读取（`reader`）与带命令状态的写入（`writer`）
//!
//! 处理器按需持有 `EntityReader` / `EntityWriter`，而不是继承基类。
//!
pub mod entity;
pub mod in_memory;
pub mod mapping;
pub mod ordering;
pub mod projection;
pub mod reader;
pub mod repository;
pub mod specification;
pub mod writer;

pub use entity::Entity;
pub use in_memory::InMemoryRepository;
pub use reader::EntityReader;
pub use repository::{Change, Repository};
pub use writer::EntityWriter;
