//! # RSO数据库模块
//!
//! 合规记录与预约患者的持久化。`ComplianceStore` 是 Web 层依赖的唯一接口，
//! 提供 PostgreSQL 实现与内存实现两种后端。

pub mod connection;
pub mod memory;
pub mod models;
pub mod queries;
pub mod seed;
pub mod store;

// 重新导出主要类型
pub use connection::{DatabasePool, PoolSettings};
pub use memory::MemoryStore;
pub use queries::{DatabaseQueries, PgComplianceStore};
pub use store::ComplianceStore;
