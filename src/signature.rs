//! # 签名模块
//!
//! 构造嵌入数据之前的自描述头部：
//!
//! ```text
//! [文件名长度: 4 字节大端][载荷长度: 4 字节大端][文件名字节]
//! ```
//!
//! 解码端在一无所知的情况下必须先读出两个定长字段，
//! 因此字段宽度与字节序都是固定的。

use crate::constants::{SIG_FIELD_BYTES, SIG_FIXED_BYTES};
use crate::error::StegoError;

/// 以大端序把 `value` 追加到 `out`。
pub fn write_be_u32(out: &mut Vec<u8>, value: u32) {
    out.extend((0..SIG_FIELD_BYTES).rev().map(|i| (value >> (i * 8)) as u8));
}

/// 从 4 个字节中按大端序读出一个 `u32`。
pub fn read_be_u32(bytes: [u8; SIG_FIELD_BYTES]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte))
}

/// 校验文件名并返回其 32 位长度。
fn validate_filename(filename: &str) -> Result<u32, StegoError> {
    if filename.is_empty() {
        return Err(StegoError::InvalidSignature(
            "filename must not be empty".to_string(),
        ));
    }

    u32::try_from(filename.len()).map_err(|_| {
        StegoError::InvalidSignature(format!(
            "filename is {} bytes long, which does not fit in 32 bits",
            filename.len()
        ))
    })
}

fn encode(filename: &str, filename_len: u32, payload_size: u32) -> Vec<u8> {
    let mut signature = Vec::with_capacity(SIG_FIXED_BYTES + filename.len());
    write_be_u32(&mut signature, filename_len);
    write_be_u32(&mut signature, payload_size);
    signature.extend_from_slice(filename.as_bytes());
    signature
}

/// 构造签名字节序列。
///
/// 输出恰好为 `8 + filename.len()` 字节，文件名不带终止符。
///
/// # Errors
///
/// * 文件名为空。
/// * 文件名长度无法用 32 位表示。
pub fn build_signature(filename: &str, payload_size: u32) -> Result<Vec<u8>, StegoError> {
    let filename_len = validate_filename(filename)?;
    Ok(encode(filename, filename_len, payload_size))
}

/// 已校验的签名内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    filename: String,
    filename_len: u32,
    payload_size: u32,
}

impl Signature {
    /// 校验文件名与载荷长度后创建签名。
    pub fn new(filename: impl Into<String>, payload_size: usize) -> Result<Self, StegoError> {
        let filename = filename.into();
        let filename_len = validate_filename(&filename)?;
        let payload_size = u32::try_from(payload_size).map_err(|_| {
            StegoError::InvalidSignature(format!(
                "payload is {payload_size} bytes long, which does not fit in 32 bits"
            ))
        })?;
        Ok(Self {
            filename,
            filename_len,
            payload_size,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn payload_size(&self) -> u32 {
        self.payload_size
    }

    /// 签名编码后的字节数。
    pub fn encoded_len(&self) -> usize {
        SIG_FIXED_BYTES + self.filename.len()
    }

    /// 编码已校验的签名，与 [`build_signature`] 输出相同。
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(&self.filename, self.filename_len, self.payload_size)
    }
}
