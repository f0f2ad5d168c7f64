//! 日志宏统一入口
//!
//! 全部转发到 rat_logger，调用方统一写 `crate::utils::logger::debug!(...)`。

pub use rat_logger::{debug, error, info, warn};
