//! # 位通道编解码器
//!
//! 把 `签名 || 数据` 视为一串 2 bit 数据块，按行优先顺序逐像素写入
//! R、G、B 三个通道的最低 2 位 (Alpha 通道始终跳过)，以及其逆过程。
//!
//! 编码与解码共用同一个寻址函数 [`address`] 和同一个位移函数
//! [`chunk_shift`]，读写对称性由此得到保证。

use crate::constants::{
    BITS_PER_CHANNEL, BITS_PER_PIXEL, CHUNK_MASK, CLEAR_MASK, SIG_FIELD_BYTES, SIG_FIXED_BYTES,
    USABLE_CHANNELS,
};
use crate::error::StegoError;
use crate::pixels::PixelBuffer;
use crate::signature::{Signature, read_be_u32};
use tracing::{debug, info};

/// 一个 2 bit 槽位在像素网格中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAddress {
    pub x: u32,
    pub y: u32,
    /// 像素内的通道下标，取值 0..3 (R, G, B)。
    pub channel: usize,
}

/// 全局比特下标 `bit_index` (步长为 2) 对应的槽位。
pub fn address(bit_index: u64, width: u32) -> SlotAddress {
    let pixel = bit_index / BITS_PER_PIXEL as u64;
    let width = u64::from(width);
    SlotAddress {
        x: (pixel % width) as u32,
        y: (pixel / width) as u32,
        channel: ((bit_index / BITS_PER_CHANNEL as u64) % USABLE_CHANNELS as u64) as usize,
    }
}

/// 源字节内当前数据块的右移量，依次为 6, 4, 2, 0 (高位块在前)。
pub fn chunk_shift(bit_index: u64) -> u32 {
    6 - (bit_index % 8) as u32
}

/// 图像可嵌入的总比特数：`width * height * 6`。
pub fn capacity_bits(width: u32, height: u32) -> u64 {
    (u64::from(width) * u64::from(height)).saturating_mul(BITS_PER_PIXEL as u64)
}

/// 图像可嵌入的总字节数 (向下取整)。
pub fn capacity_bytes(width: u32, height: u32) -> u64 {
    capacity_bits(width, height) / 8
}

/// 扣除签名后最多可隐藏的数据字节数。
///
/// 文件名至少占 1 字节；`filename_len` 来自用户输入，全程饱和运算。
pub fn payload_capacity(width: u32, height: u32, filename_len: usize) -> u64 {
    let overhead = (SIG_FIXED_BYTES as u64).saturating_add(filename_len.max(1) as u64);
    capacity_bytes(width, height).saturating_sub(overhead)
}

fn bits_for(byte_count: u64) -> u64 {
    byte_count.saturating_mul(8)
}

/// 检查 `header_len + payload_len` 字节能否放入 `width × height` 的图像。
///
/// 纯函数，必须在修改任何像素之前调用。
///
/// # Errors
///
/// 容量不足时返回 [`StegoError::Capacity`]，以字节为单位报告所需与可用空间。
pub fn check_capacity(
    width: u32,
    height: u32,
    header_len: usize,
    payload_len: usize,
) -> Result<(), StegoError> {
    let required = (header_len as u64).saturating_add(payload_len as u64);
    let available_bits = capacity_bits(width, height);

    debug!(
        required_bits = bits_for(required),
        available_bits, "capacity check"
    );

    if bits_for(required) > available_bits {
        return Err(StegoError::Capacity {
            required,
            available: available_bits / 8,
        });
    }
    Ok(())
}

/// 沿全局比特游标向像素缓冲区写入字节。
struct BitWriter<'a> {
    buffer: &'a mut PixelBuffer,
    cursor: u64,
}

impl<'a> BitWriter<'a> {
    fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self { buffer, cursor: 0 }
    }

    fn write_byte(&mut self, byte: u8) {
        for _ in 0..(8 / BITS_PER_CHANNEL) {
            let slot = address(self.cursor, self.buffer.width());
            let offset = self.buffer.pixel_offset(slot.x, slot.y) + slot.channel;
            let chunk = (byte >> chunk_shift(self.cursor)) & CHUNK_MASK;

            let target = &mut self.buffer.data_mut()[offset];
            *target = (*target & CLEAR_MASK) | chunk;

            self.cursor += BITS_PER_CHANNEL as u64;
        }
    }

    fn write_all(&mut self, bytes: &[u8]) {
        bytes.iter().for_each(|&byte| self.write_byte(byte));
    }
}

/// 沿全局比特游标从像素缓冲区读出字节。
struct BitReader<'a> {
    buffer: &'a PixelBuffer,
    cursor: u64,
}

impl<'a> BitReader<'a> {
    fn new(buffer: &'a PixelBuffer) -> Self {
        Self { buffer, cursor: 0 }
    }

    fn read_byte(&mut self) -> u8 {
        let mut byte = 0u8;
        for _ in 0..(8 / BITS_PER_CHANNEL) {
            let slot = address(self.cursor, self.buffer.width());
            let offset = self.buffer.pixel_offset(slot.x, slot.y) + slot.channel;
            let chunk = self.buffer.as_bytes()[offset] & CHUNK_MASK;

            byte |= chunk << chunk_shift(self.cursor);
            self.cursor += BITS_PER_CHANNEL as u64;
        }
        byte
    }

    fn read_u32(&mut self) -> u32 {
        let mut field = [0u8; SIG_FIELD_BYTES];
        field.iter_mut().for_each(|b| *b = self.read_byte());
        read_be_u32(field)
    }

    fn read_bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.read_byte()).collect()
    }
}

/// 将签名与数据依次写入像素缓冲区的最低 2 位。
///
/// 容量检查在任何写入之前完成，失败时缓冲区保持原样。
/// 只修改每个像素前三个通道的最低 2 位。
///
/// # Errors
///
/// 容量不足时返回 [`StegoError::Capacity`]。
pub fn embed(buffer: &mut PixelBuffer, header: &[u8], payload: &[u8]) -> Result<(), StegoError> {
    check_capacity(buffer.width(), buffer.height(), header.len(), payload.len())?;

    let mut writer = BitWriter::new(buffer);
    writer.write_all(header);
    writer.write_all(payload);

    debug!(
        bits_written = writer.cursor,
        header_bytes = header.len(),
        payload_bytes = payload.len(),
        "embedded data"
    );
    Ok(())
}

/// 从像素缓冲区中恢复 `(文件名, 数据)`。
///
/// 依次读取文件名长度、数据长度、文件名和数据，全部共用一个比特游标。
/// 解码出的长度在分配内存之前会先与图像容量比较。
///
/// # Errors
///
/// 以下情况返回 [`StegoError::DecodeIntegrity`]：
/// * 图像连签名的两个长度字段都放不下。
/// * 文件名长度为 0。
/// * 解码出的长度超出图像容量。
/// * 文件名不是合法的 UTF-8。
pub fn extract(buffer: &PixelBuffer) -> Result<(String, Vec<u8>), StegoError> {
    let available_bits = capacity_bits(buffer.width(), buffer.height());
    if bits_for(SIG_FIXED_BYTES as u64) > available_bits {
        return Err(StegoError::DecodeIntegrity(format!(
            "image holds only {} bytes, too small for a {}-byte signature",
            available_bits / 8,
            SIG_FIXED_BYTES
        )));
    }

    let mut reader = BitReader::new(buffer);
    let filename_len = reader.read_u32();
    let payload_size = reader.read_u32();
    debug!(filename_len, payload_size, "decoded signature lengths");

    if filename_len == 0 {
        return Err(StegoError::DecodeIntegrity(
            "embedded filename length is zero".to_string(),
        ));
    }

    let total = SIG_FIXED_BYTES as u64 + u64::from(filename_len) + u64::from(payload_size);
    if bits_for(total) > available_bits {
        return Err(StegoError::DecodeIntegrity(format!(
            "signature claims {} bytes of data, but the image holds only {} bytes",
            total,
            available_bits / 8
        )));
    }

    let filename = String::from_utf8(reader.read_bytes(filename_len as usize)).map_err(|_| {
        StegoError::DecodeIntegrity("embedded filename is not valid UTF-8".to_string())
    })?;
    let payload = reader.read_bytes(payload_size as usize);

    info!(filename = %filename, bytes = payload.len(), "extracted hidden file");
    Ok((filename, payload))
}

/// 为 `filename` 与 `payload` 构造签名并嵌入缓冲区，返回所用的签名。
///
/// # Errors
///
/// * 签名参数非法 ([`StegoError::InvalidSignature`])。
/// * 容量不足 ([`StegoError::Capacity`])。
pub fn hide_file(
    buffer: &mut PixelBuffer,
    filename: &str,
    payload: &[u8],
) -> Result<Signature, StegoError> {
    let signature = Signature::new(filename, payload.len())?;
    let header = signature.to_bytes();
    embed(buffer, &header, payload)?;

    info!(
        filename = signature.filename(),
        bytes = signature.payload_size(),
        "hid file in image"
    );
    Ok(signature)
}
