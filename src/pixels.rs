//! # 像素缓冲区
//!
//! 由图像读取层创建、交给编解码器借用的自有像素网格。

use crate::error::StegoError;
use std::fmt;
use std::path::PathBuf;

/// 每个像素的通道布局，每个通道一个字节。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

impl ChannelLayout {
    /// 每个像素实际存储的通道数。
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelLayout::Rgb => f.write_str("RGB8"),
            ChannelLayout::Rgba => f.write_str("RGBA8"),
        }
    }
}

/// `width * height * channels`，溢出时为 `None`。
fn byte_len(width: u32, height: u32, layout: ChannelLayout) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(layout.channels()))
}

fn size_error(width: u32, height: u32, layout: ChannelLayout, detail: String) -> StegoError {
    StegoError::InputFormat {
        path: PathBuf::from("<memory>"),
        reason: format!("{width}x{height} {layout} buffer {detail}"),
    }
}

/// 按行优先存储的 `width × height` 像素网格。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// 用已有的原始字节创建缓冲区。
    ///
    /// # Errors
    ///
    /// `data` 的长度必须正好等于 `width * height * channels`。
    pub fn new(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        data: Vec<u8>,
    ) -> Result<Self, StegoError> {
        let expected = byte_len(width, height, layout);

        match expected {
            Some(len) if len == data.len() => Ok(Self {
                width,
                height,
                layout,
                data,
            }),
            _ => Err(size_error(
                width,
                height,
                layout,
                format!(
                    "needs {} bytes, got {}",
                    expected.map_or_else(|| "too many".to_string(), |n| n.to_string()),
                    data.len()
                ),
            )),
        }
    }

    /// 创建一个所有通道都为 `fill` 的缓冲区。
    ///
    /// # Errors
    ///
    /// `width * height * channels` 超出 `usize` 时返回错误。
    pub fn filled(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        fill: u8,
    ) -> Result<Self, StegoError> {
        let len = byte_len(width, height, layout).ok_or_else(|| {
            size_error(width, height, layout, "does not fit in memory".to_string())
        })?;
        Self::new(width, height, layout, vec![fill; len])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 像素 `(x, y)` 第一个通道在缓冲区中的字节下标。
    pub fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.layout.channels()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
