//! # 图像读写模块
//!
//! 在 `image` crate 与 [`PixelBuffer`] 之间转换。
//! 只接受 8 位 RGB / RGBA 图像，只写出无损格式，
//! 保证写回后唯一的变化是最低有效位。

use crate::error::StegoError;
use crate::pixels::{ChannelLayout, PixelBuffer};
use image::{
    DynamicImage, ExtendedColorType, ImageDecoder, ImageError, ImageFormat, ImageReader,
};
use std::path::Path;
use tracing::debug;

/// 允许写出的无损容器格式。
const LOSSLESS_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
    ImageFormat::Qoi,
];

fn map_image_error(path: &Path, err: ImageError) -> StegoError {
    match err {
        ImageError::IoError(source) => StegoError::file_access(path, source),
        other => StegoError::InputFormat {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

/// 读取图像文件并返回其像素缓冲区。
///
/// 判断依据是文件中存储的原始颜色类型，而不是解码器展开后的结果，
/// 因此调色板图像不会被悄悄展开成真彩色。
///
/// # Errors
///
/// * 文件无法打开 ([`StegoError::FileAccess`])。
/// * 文件不是可识别的图像 ([`StegoError::InputFormat`])。
/// * 原始通道布局不是 8 位 RGB 或 RGBA ([`StegoError::Channel`])，
///   灰度、调色板以及 16 位图像都会被拒绝。
pub fn load(path: &Path) -> Result<PixelBuffer, StegoError> {
    let decoder = ImageReader::open(path)
        .map_err(|e| StegoError::file_access(path, e))?
        .with_guessed_format()
        .map_err(|e| StegoError::file_access(path, e))?
        .into_decoder()
        .map_err(|e| map_image_error(path, e))?;

    let original = decoder.original_color_type();
    if !matches!(original, ExtendedColorType::Rgb8 | ExtendedColorType::Rgba8) {
        return Err(StegoError::Channel {
            path: path.to_path_buf(),
            layout: format!("{original:?}"),
        });
    }

    let image = DynamicImage::from_decoder(decoder).map_err(|e| map_image_error(path, e))?;
    let (width, height) = (image.width(), image.height());

    let (layout, data) = match image {
        DynamicImage::ImageRgb8(buf) => (ChannelLayout::Rgb, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (ChannelLayout::Rgba, buf.into_raw()),
        other => {
            return Err(StegoError::Channel {
                path: path.to_path_buf(),
                layout: format!("{:?}", other.color()),
            });
        }
    };

    debug!(path = %path.display(), width, height, %layout, "loaded image");
    PixelBuffer::new(width, height, layout, data)
}

/// 将像素缓冲区写入 `path`，格式由扩展名决定。
///
/// 宽、高与通道布局保持不变。
///
/// # Errors
///
/// * 扩展名不对应任何无损格式 ([`StegoError::InputFormat`])。
/// * 编码或写入失败。
pub fn save(buffer: &PixelBuffer, path: &Path) -> Result<(), StegoError> {
    let format = ImageFormat::from_path(path).map_err(|e| map_image_error(path, e))?;

    if !LOSSLESS_FORMATS.contains(&format) {
        return Err(StegoError::InputFormat {
            path: path.to_path_buf(),
            reason: format!("{format:?} is not a lossless output format"),
        });
    }

    let color = match buffer.layout() {
        ChannelLayout::Rgb => ExtendedColorType::Rgb8,
        ChannelLayout::Rgba => ExtendedColorType::Rgba8,
    };

    image::save_buffer_with_format(
        path,
        buffer.as_bytes(),
        buffer.width(),
        buffer.height(),
        color,
        format,
    )
    .map_err(|e| map_image_error(path, e))?;

    debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}
