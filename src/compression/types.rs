//! 压缩算法类型模块

use serde::Deserialize;

/// 压缩算法类型
///
/// 封闭集合：协商层只认识 gzip 与 deflate，其余一律视为不压缩。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionType {
    /// 不压缩（identity）
    #[serde(alias = "identity")]
    None,
    /// Gzip 压缩
    Gzip,
    /// Deflate 压缩（内部实现为原始 flate 流）
    Deflate,
}

impl CompressionType {
    /// 获取压缩算法名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "identity",
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
        }
    }

    /// 获取 Content-Encoding 头部值，identity 不设置该头部
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Gzip => Some("gzip"),
            Self::Deflate => Some("deflate"),
        }
    }

    /// 从 Accept-Encoding 中的单个令牌解析压缩类型
    ///
    /// 区分大小写的精确匹配，不解析 `q=` 权重，也不处理 `*`。
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gzip" => Some(Self::Gzip),
            "deflate" => Some(Self::Deflate),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompressionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
