//! 错误类型模块
//!
//! 压缩协商本身从不失败：未知编码与压缩器构造失败都会降级为 identity。
//! 这里的错误只覆盖写入、配置解析和演示服务的序列化。

use thiserror::Error;

/// RAT RPC 统一错误类型
#[derive(Debug, Error)]
pub enum RatError {
    /// 参数无效
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 底层 IO 错误（写入响应体失败等）
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 压缩器构造或收尾失败
    #[error("压缩错误: {0}")]
    CompressionError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),
}

impl From<toml::de::Error> for RatError {
    fn from(e: toml::de::Error) -> Self {
        RatError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for RatError {
    fn from(e: serde_json::Error) -> Self {
        RatError::SerializationError(e.to_string())
    }
}

/// 结果类型别名
pub type RatResult<T> = Result<T, RatError>;
