//! RPC 响应写出
//!
//! 服务端在序列化结果之前向选择器要一个编码器，
//! 然后把编解码器产出的字节原样交给编码器写出。

use bytes::{BufMut, Bytes, BytesMut};
use http_body_util::Full;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::Response;

use crate::compression::{CompressionSelector, Encoder};
use crate::error::{RatError, RatResult};

/// 编码器选择接口
///
/// 实现必须是无状态的纯计算，会被多个请求并发调用。
pub trait EncoderSelector: Send + Sync {
    /// 为当前请求选择响应编码器
    fn select(&self, request_headers: &HeaderMap) -> Encoder;
}

impl EncoderSelector for CompressionSelector {
    fn select(&self, request_headers: &HeaderMap) -> Encoder {
        CompressionSelector::select(self, request_headers)
    }
}

/// 默认选择器，永远不压缩
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEncoderSelector;

impl EncoderSelector for DefaultEncoderSelector {
    fn select(&self, _request_headers: &HeaderMap) -> Encoder {
        Encoder::Identity
    }
}

/// RPC 响应构造器
#[derive(Debug, Clone, Default)]
pub struct RpcResponder<S = DefaultEncoderSelector> {
    selector: S,
}

impl<S: EncoderSelector> RpcResponder<S> {
    pub fn new(selector: S) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    /// 按请求协商出的编码写出序列化后的 RPC 结果
    ///
    /// 底层写入失败以 `RatError::IoError` 返回；压缩不可用时退回明文，不报错。
    pub fn respond(
        &self,
        request_headers: &HeaderMap,
        content_type: &str,
        payload: &[u8],
    ) -> RatResult<Response<Full<Bytes>>> {
        let mut headers = HeaderMap::new();
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| RatError::InvalidArgument(format!("无效的 Content-Type: {}", e)))?;
        headers.insert(CONTENT_TYPE, content_type);

        let encoder = self.selector.select(request_headers);
        let writer = encoder.encode(&mut headers, BytesMut::with_capacity(payload.len()).writer());
        let encoding = writer.encoding();
        let body = writer.write_once(payload)?.into_inner().freeze();

        crate::utils::logger::debug!(
            "🗜️ [Compression] 使用 {} 编码，原始大小: {} bytes，输出: {} bytes",
            encoding,
            payload.len(),
            body.len()
        );

        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
        let mut response = Response::new(Full::new(body));
        *response.headers_mut() = headers;
        Ok(response)
    }
}
