//! # 错误类型模块
//!
//! 库核心使用的强类型错误。命令行层通过 `anyhow` 为其附加上下文。

use std::io;
use std::path::PathBuf;

/// 隐写与提取过程中可能出现的所有错误。
#[derive(Debug, thiserror::Error)]
pub enum StegoError {
    /// 文件不是受支持的栅格图像，或者输出格式不是无损格式。
    #[error("{path}: not a supported image ({reason})")]
    InputFormat { path: PathBuf, reason: String },

    /// 图像的通道布局既不是 8 位 RGB 也不是 8 位 RGBA。
    #[error("{path}: unsupported channel layout {layout}, expected 8-bit RGB or RGBA")]
    Channel { path: PathBuf, layout: String },

    /// 签名 + 数据超出了图像可承载的容量。
    #[error("image is too small: {required} bytes required, {available} bytes available")]
    Capacity { required: u64, available: u64 },

    /// 无法打开、读取或写入文件。
    #[error("cannot access {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 从图像中解码出的长度字段不可信。
    #[error("embedded data is corrupt or missing: {0}")]
    DecodeIntegrity(String),

    /// 签名参数非法 (例如空文件名)。
    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}

impl StegoError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StegoError::FileAccess {
            path: path.into(),
            source,
        }
    }
}
