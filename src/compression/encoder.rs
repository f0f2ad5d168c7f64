//! 编码器模块
//!
//! `Encoder` 是无状态的压缩策略，可在请求之间共享；
//! `EncodedWriter` 是它为单个响应创建的写入端，只属于该请求。
//!
//! 压缩流在 [`EncodedWriter::finish`] 时收尾一次。调用方忘记 `finish`
//! 时，flate2 的编码器会在 drop 时尽力写出尾部，但错误会被吞掉。

use std::io::{self, Write};

use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_ENCODING};

use super::types::CompressionType;
use crate::error::{RatError, RatResult};

/// 响应编码策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoder {
    /// 原样输出，不设置 Content-Encoding
    #[default]
    Identity,
    /// Gzip，使用默认压缩级别
    Gzip,
    /// Deflate，使用配置的压缩级别
    Deflate { level: u32 },
}

impl Encoder {
    /// 根据压缩类型构造编码器
    pub fn for_type(algorithm: CompressionType, level: u32) -> Self {
        match algorithm {
            CompressionType::None => Self::Identity,
            CompressionType::Gzip => Self::Gzip,
            CompressionType::Deflate => Self::Deflate { level },
        }
    }

    /// 编码器对应的压缩类型
    pub fn compression_type(&self) -> CompressionType {
        match self {
            Self::Identity => CompressionType::None,
            Self::Gzip => CompressionType::Gzip,
            Self::Deflate { .. } => CompressionType::Deflate,
        }
    }

    /// 包装响应体写入端，并在响应头中声明实际使用的编码
    ///
    /// 压缩器构造失败时回退为 identity，且不设置 Content-Encoding。
    pub fn encode<W: Write>(&self, response_headers: &mut HeaderMap, sink: W) -> EncodedWriter<W> {
        match *self {
            Self::Identity => EncodedWriter::identity(sink),
            Self::Gzip => {
                set_content_encoding(response_headers, CompressionType::Gzip);
                EncodedWriter {
                    inner: WriterInner::Gzip(GzEncoder::new(sink, Compression::default())),
                }
            }
            Self::Deflate { level } => match deflate_level(level) {
                Ok(compression) => {
                    set_content_encoding(response_headers, CompressionType::Deflate);
                    EncodedWriter {
                        inner: WriterInner::Deflate(DeflateEncoder::new(sink, compression)),
                    }
                }
                Err(e) => {
                    crate::utils::logger::warn!("🗜️ [Compression] Deflate 压缩器构造失败，回退为不压缩: {}", e);
                    EncodedWriter::identity(sink)
                }
            },
        }
    }
}

fn set_content_encoding(headers: &mut HeaderMap, algorithm: CompressionType) {
    if let Some(value) = algorithm.header_value() {
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static(value));
    }
}

/// 校验 deflate 压缩级别
pub fn deflate_level(level: u32) -> RatResult<Compression> {
    if level > Compression::best().level() {
        return Err(RatError::CompressionError(format!(
            "无效的 deflate 压缩级别: {} (有效范围 0-9)",
            level
        )));
    }
    Ok(Compression::new(level))
}

enum WriterInner<W: Write> {
    Identity(W),
    Gzip(GzEncoder<W>),
    Deflate(DeflateEncoder<W>),
}

/// 单个响应的写入端
pub struct EncodedWriter<W: Write> {
    inner: WriterInner<W>,
}

impl<W: Write> EncodedWriter<W> {
    /// 不压缩的写入端
    pub fn identity(sink: W) -> Self {
        Self {
            inner: WriterInner::Identity(sink),
        }
    }

    /// 实际生效的编码（构造失败回退后为 `None`）
    pub fn encoding(&self) -> CompressionType {
        match self.inner {
            WriterInner::Identity(_) => CompressionType::None,
            WriterInner::Gzip(_) => CompressionType::Gzip,
            WriterInner::Deflate(_) => CompressionType::Deflate,
        }
    }

    /// 写出压缩流尾部并交还底层写入端
    pub fn finish(self) -> io::Result<W> {
        match self.inner {
            WriterInner::Identity(mut sink) => {
                sink.flush()?;
                Ok(sink)
            }
            WriterInner::Gzip(encoder) => encoder.finish(),
            WriterInner::Deflate(encoder) => encoder.finish(),
        }
    }

    /// 一次写入整个响应体后立即收尾
    pub fn write_once(mut self, buf: &[u8]) -> io::Result<W> {
        self.write_all(buf)?;
        self.finish()
    }
}

impl<W: Write> Write for EncodedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            WriterInner::Identity(sink) => sink.write(buf),
            WriterInner::Gzip(encoder) => encoder.write(buf),
            WriterInner::Deflate(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            WriterInner::Identity(sink) => sink.flush(),
            WriterInner::Gzip(encoder) => encoder.flush(),
            WriterInner::Deflate(encoder) => encoder.flush(),
        }
    }
}

impl<W: Write> std::fmt::Debug for EncodedWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedWriter")
            .field("encoding", &self.encoding())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::{DeflateDecoder, GzDecoder};
    use std::io::Read;

    const PAYLOAD: &[u8] = br#"{"jsonrpc":"2.0","result":{"Count":42},"id":1}"#;

    /// 每次写入都失败的写入端
    #[derive(Debug)]
    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_identity_passthrough() {
        let mut headers = HeaderMap::new();
        let out = Encoder::Identity
            .encode(&mut headers, Vec::new())
            .write_once(PAYLOAD)
            .unwrap();
        assert_eq!(out, PAYLOAD);
        assert!(headers.get(CONTENT_ENCODING).is_none());
    }

    #[test]
    fn test_gzip_round_trip() {
        let mut headers = HeaderMap::new();
        let out = Encoder::Gzip
            .encode(&mut headers, Vec::new())
            .write_once(PAYLOAD)
            .unwrap();
        assert_eq!(headers.get(CONTENT_ENCODING).unwrap(), "gzip");

        let mut decoded = Vec::new();
        GzDecoder::new(&out[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, PAYLOAD);
    }

    #[test]
    fn test_deflate_round_trip_multiple_writes() {
        let mut headers = HeaderMap::new();
        let mut writer = Encoder::Deflate { level: 6 }.encode(&mut headers, Vec::new());
        assert_eq!(writer.encoding(), CompressionType::Deflate);
        for chunk in PAYLOAD.chunks(7) {
            writer.write_all(chunk).unwrap();
        }
        let out = writer.finish().unwrap();
        assert_eq!(headers.get(CONTENT_ENCODING).unwrap(), "deflate");

        let mut decoded = Vec::new();
        DeflateDecoder::new(&out[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, PAYLOAD);
    }

    #[test]
    fn test_deflate_invalid_level_falls_back_to_identity() {
        let mut headers = HeaderMap::new();
        let writer = Encoder::Deflate { level: 42 }.encode(&mut headers, Vec::new());
        assert_eq!(writer.encoding(), CompressionType::None);
        let out = writer.write_once(PAYLOAD).unwrap();
        assert_eq!(out, PAYLOAD);
        assert!(headers.get(CONTENT_ENCODING).is_none());
    }

    #[test]
    fn test_deflate_level_bounds() {
        assert!(deflate_level(0).is_ok());
        assert!(deflate_level(9).is_ok());
        assert!(matches!(deflate_level(10), Err(RatError::CompressionError(_))));
    }

    #[test]
    fn test_write_error_propagates() {
        let mut headers = HeaderMap::new();
        let mut writer = Encoder::Identity.encode(&mut headers, BrokenSink);
        let err = writer.write_all(PAYLOAD).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);

        // 压缩数据在收尾时才会落到底层写入端
        let writer = Encoder::Gzip.encode(&mut headers, BrokenSink);
        let err = writer.write_once(PAYLOAD).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_for_type() {
        assert_eq!(Encoder::for_type(CompressionType::None, 6), Encoder::Identity);
        assert_eq!(Encoder::for_type(CompressionType::Gzip, 6), Encoder::Gzip);
        assert_eq!(
            Encoder::for_type(CompressionType::Deflate, 3),
            Encoder::Deflate { level: 3 }
        );
        assert_eq!(Encoder::Deflate { level: 3 }.compression_type(), CompressionType::Deflate);
    }
}
