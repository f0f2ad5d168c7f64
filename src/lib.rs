//! RAT RPC 响应压缩协商层
//!
//! 根据请求的 Accept-Encoding 为每个 RPC 响应选出一种编码（gzip、deflate 或不压缩），
//! 透明地压缩出站字节并设置 Content-Encoding。
//!
//! ```no_run
//! use hyper::header::HeaderMap;
//! use rat_rpc::{CompressionSelector, RpcResponder};
//!
//! let responder = RpcResponder::new(CompressionSelector::default());
//! let response = responder.respond(&HeaderMap::new(), "application/json", b"{}");
//! ```

pub mod compression;
pub mod error;
pub mod rpc;
pub mod utils;

pub use compression::{CompressionConfig, CompressionSelector, CompressionType, EncodedWriter, Encoder};
pub use error::{RatError, RatResult};
pub use rpc::{DefaultEncoderSelector, EncoderSelector, RpcResponder};

// 方便下游直接使用 hyper 的头部类型
pub use hyper::header::{HeaderMap, HeaderValue};
