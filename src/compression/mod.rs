//! 压缩模块
//!
//! 负责 RPC 响应的出站压缩协商：根据 Accept-Encoding 选择 gzip、deflate
//! 或不压缩，透明地包装响应体写入端，并设置 Content-Encoding。
//! 不处理请求体解压，也不缓存压缩结果。

pub mod types;
pub mod config;
pub mod selector;
pub mod encoder;

// 重新导出主要的公共类型
pub use types::CompressionType;
pub use config::CompressionConfig;
pub use selector::{accepted_encoding, tokenize, CompressionSelector};
pub use encoder::{EncodedWriter, Encoder};
