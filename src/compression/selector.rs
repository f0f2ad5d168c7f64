//! 编码协商模块
//!
//! 根据请求的 Accept-Encoding 选出唯一的响应编码器。
//! 协商只看令牌字面值：按头部中的顺序取第一个可识别且已启用的令牌，
//! 不解析 `q=` 权重，不处理 `*`，大小写敏感。

use std::borrow::Cow;

use hyper::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};

use super::config::CompressionConfig;
use super::encoder::Encoder;
use super::types::CompressionType;

/// 将 Accept-Encoding 拆分为令牌
///
/// 逗号与任意空白都视为分隔符，连续分隔符会被合并。
pub fn tokenize(accept_encoding: &str) -> impl Iterator<Item = &str> {
    accept_encoding
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

/// 返回 Accept-Encoding 中第一个可识别且已启用的压缩类型
pub fn accepted_encoding(accept_encoding: &str, enabled_algorithms: &[CompressionType]) -> CompressionType {
    tokenize(accept_encoding)
        .filter_map(CompressionType::from_token)
        .find(|algorithm| enabled_algorithms.contains(algorithm))
        .unwrap_or(CompressionType::None)
}

/// 压缩编码选择器
///
/// 不持有任何请求级状态，可在多个请求间并发共享。
#[derive(Debug, Clone, Default)]
pub struct CompressionSelector {
    config: CompressionConfig,
}

impl CompressionSelector {
    /// 创建新的选择器
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    /// 当前配置
    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// 根据请求头选择编码器
    pub fn select(&self, request_headers: &HeaderMap) -> Encoder {
        self.select_from_value(request_headers.get(ACCEPT_ENCODING))
    }

    /// 根据 Accept-Encoding 头部值选择编码器，缺失或为空时不压缩
    pub fn select_from_value(&self, accept_encoding: Option<&HeaderValue>) -> Encoder {
        let accept_encoding = match accept_encoding {
            Some(value) if !value.is_empty() => value,
            _ => return Encoder::Identity,
        };

        // 非 ASCII 字节按有损 UTF-8 处理，可识别的令牌都是 ASCII，不受影响
        let header: Cow<'_, str> = String::from_utf8_lossy(accept_encoding.as_bytes());
        let algorithm = accepted_encoding(&header, &self.config.enabled_algorithms);

        crate::utils::logger::debug!("🔍 [Compression] Accept-Encoding: {:?} -> {}", header, algorithm);

        Encoder::for_type(algorithm, self.config.level)
    }
}
