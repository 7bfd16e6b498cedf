//! # RSO管理模块
//!
//! 配置加载与校验、日志初始化

pub mod config;
pub mod logging;

pub use self::config::{ConfigManager, ConfigValidator, RsoConfig};
pub use self::logging::init_logging;
