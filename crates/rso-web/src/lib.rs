//! # RSO Web 模块
//!
//! 合规记录与预约患者的 JSON HTTP 接口。

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::WebServer;
pub use state::AppState;
