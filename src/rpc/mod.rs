//! RPC 传输接缝
//!
//! 编解码器只产出序列化字节，看不到压缩；
//! 服务端通过 [`EncoderSelector`] 拿到编码器并写出响应。

pub mod response;

pub use response::{DefaultEncoderSelector, EncoderSelector, RpcResponder};
