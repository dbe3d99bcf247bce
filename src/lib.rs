//! # chan_steg 库
//!
//! 本库包含 2 bit LSB 文件隐写工具的核心逻辑：
//! 签名构造、位通道编解码以及图像读写。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod image_io;
pub mod pixels;
pub mod signature;
pub mod steganography;

pub use error::StegoError;
pub use pixels::{ChannelLayout, PixelBuffer};
pub use signature::{Signature, build_signature};
pub use steganography::{embed, extract};
