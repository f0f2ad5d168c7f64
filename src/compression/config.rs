//! 压缩配置模块

use serde::Deserialize;

use super::types::CompressionType;
use crate::error::RatResult;

/// 默认压缩级别，对应 zlib 的 DefaultCompression
pub const DEFAULT_LEVEL: u32 = 6;

/// 压缩配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// 启用的压缩算法
    pub enabled_algorithms: Vec<CompressionType>,
    /// Deflate 压缩级别 (0-9)
    ///
    /// 不在这里做截断：超出范围的级别会让 deflate 压缩器构造失败，
    /// 编码器随即回退为不压缩。
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled_algorithms: vec![CompressionType::Gzip, CompressionType::Deflate],
            level: DEFAULT_LEVEL,
        }
    }
}

impl CompressionConfig {
    /// 创建新的压缩配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 TOML 文本加载配置，缺省字段取默认值
    pub fn from_toml_str(s: &str) -> RatResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// 启用压缩
    pub fn enable_compression(mut self, enabled: bool) -> Self {
        self.enabled_algorithms = if enabled {
            vec![CompressionType::Gzip, CompressionType::Deflate]
        } else {
            Vec::new()
        };
        self
    }

    /// 设置启用的压缩算法
    pub fn algorithms(mut self, algorithms: Vec<CompressionType>) -> Self {
        self.enabled_algorithms = algorithms;
        self
    }

    /// 启用 Gzip 压缩
    pub fn with_gzip(mut self) -> Self {
        if !self.enabled_algorithms.contains(&CompressionType::Gzip) {
            self.enabled_algorithms.push(CompressionType::Gzip);
        }
        self
    }

    /// 启用 Deflate 压缩
    pub fn with_deflate(mut self) -> Self {
        if !self.enabled_algorithms.contains(&CompressionType::Deflate) {
            self.enabled_algorithms.push(CompressionType::Deflate);
        }
        self
    }

    /// 压缩级别
    pub fn level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// 指定算法是否启用
    pub fn is_enabled(&self, algorithm: CompressionType) -> bool {
        algorithm != CompressionType::None && self.enabled_algorithms.contains(&algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_gzip_and_deflate() {
        let config = CompressionConfig::default();
        assert!(config.is_enabled(CompressionType::Gzip));
        assert!(config.is_enabled(CompressionType::Deflate));
        assert!(!config.is_enabled(CompressionType::None));
        assert_eq!(config.level, DEFAULT_LEVEL);
    }

    #[test]
    fn test_builder() {
        let config = CompressionConfig::new()
            .enable_compression(false)
            .with_deflate()
            .with_deflate()
            .level(10);
        assert_eq!(config.enabled_algorithms, vec![CompressionType::Deflate]);
        assert_eq!(config.level, 10);
    }

    #[test]
    fn test_from_toml_str() {
        let config = CompressionConfig::from_toml_str(
            r#"
            enabled_algorithms = ["deflate"]
            level = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.enabled_algorithms, vec![CompressionType::Deflate]);
        assert_eq!(config.level, 9);

        let config = CompressionConfig::from_toml_str("").unwrap();
        assert_eq!(config.enabled_algorithms.len(), 2);

        assert!(CompressionConfig::from_toml_str("level = \"high\"").is_err());
    }
}
