//! # RSO Core
//!
//! 放射安全合规系统的核心模块，提供基础数据结构、错误定义、参考表、
//! 阈值分级与输入校验。

pub mod classifier;
pub mod error;
pub mod models;
pub mod reference;
pub mod utils;
pub mod validation;
pub mod view;

pub use classifier::{classify, classify_area, classify_dosimeter, ExposureStatus, ThresholdDomain};
pub use error::{FieldError, Result, RsoError};
pub use models::*;
pub use reference::{DoseRecommendation, ReferenceTables};
pub use validation::Validate;
pub use view::{sort_confirmed, ConfirmedPatientView, SortKey, VendorOrderEstimate};
