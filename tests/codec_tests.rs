use chan_steg::signature::{read_be_u32, write_be_u32};
use chan_steg::steganography::{
    address, capacity_bits, capacity_bytes, check_capacity, chunk_shift, hide_file,
};
use chan_steg::{
    ChannelLayout, PixelBuffer, Signature, StegoError, build_signature, embed, extract,
};
use rand::RngCore;
use std::collections::HashSet;

/// 创建一个随机像素的缓冲区
fn random_buffer(width: u32, height: u32, layout: ChannelLayout) -> PixelBuffer {
    let mut data = vec![0u8; width as usize * height as usize * layout.channels()];
    rand::rng().fill_bytes(&mut data);
    PixelBuffer::new(width, height, layout, data).expect("buffer size must match")
}

/// 签名布局：两个大端长度字段加原始文件名
#[test]
fn test_signature_layout() {
    let sig = build_signature("a", 1).unwrap();
    assert_eq!(sig, vec![0, 0, 0, 1, 0, 0, 0, 1, b'a']);

    let sig = build_signature("file.txt", 0x0102_0304).unwrap();
    assert_eq!(sig.len(), 8 + "file.txt".len());
    assert_eq!(&sig[0..4], &[0, 0, 0, 8]);
    assert_eq!(&sig[4..8], &[1, 2, 3, 4]);
    assert_eq!(&sig[8..], b"file.txt");
}

#[test]
fn test_signature_rejects_empty_filename() {
    let result = build_signature("", 10);
    assert!(matches!(result, Err(StegoError::InvalidSignature(_))));
}

#[test]
fn test_signature_struct() {
    let sig = Signature::new("photo.raw", 1024).unwrap();
    assert_eq!(sig.filename(), "photo.raw");
    assert_eq!(sig.payload_size(), 1024);
    assert_eq!(sig.encoded_len(), sig.to_bytes().len());

    assert_eq!(sig.to_bytes(), build_signature("photo.raw", 1024).unwrap());
    assert!(matches!(
        Signature::new("", 1),
        Err(StegoError::InvalidSignature(_))
    ));
}

#[test]
fn test_be_u32_helpers() {
    let mut out = Vec::new();
    write_be_u32(&mut out, 0xDEAD_BEEF);
    assert_eq!(out, vec![0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(read_be_u32([0xDE, 0xAD, 0xBE, 0xEF]), 0xDEAD_BEEF);
}

#[test]
fn test_pixel_buffer_rejects_wrong_length() {
    let result = PixelBuffer::new(2, 2, ChannelLayout::Rgba, vec![0; 12]);
    assert!(matches!(result, Err(StegoError::InputFormat { .. })));
}

/// 尺寸相乘溢出时返回错误而不是 panic
#[test]
fn test_filled_rejects_overflowing_dimensions() {
    let result = PixelBuffer::filled(u32::MAX, u32::MAX, ChannelLayout::Rgba, 0);
    assert!(matches!(result, Err(StegoError::InputFormat { .. })));
}

/// 4×4 RGB 图像可容纳 12 字节，"a" + [0x41] 共 10 字节
#[test]
fn test_small_image_round_trip() {
    let mut buffer = PixelBuffer::filled(4, 4, ChannelLayout::Rgb, 0x80).unwrap();
    let header = build_signature("a", 1).unwrap();

    embed(&mut buffer, &header, &[0x41]).unwrap();
    let (filename, payload) = extract(&buffer).unwrap();

    assert_eq!(filename, "a");
    assert_eq!(payload, vec![0x41]);
}

/// 同一 4×4 图像放不下 13 字节，且失败时缓冲区不被修改
#[test]
fn test_small_image_capacity_error() {
    let mut buffer = random_buffer(4, 4, ChannelLayout::Rgb);
    let original = buffer.clone();
    let header = build_signature("a", 4).unwrap();

    let result = embed(&mut buffer, &header, &[1, 2, 3, 4]);
    match result {
        Err(StegoError::Capacity {
            required,
            available,
        }) => {
            assert_eq!(required, 13);
            assert_eq!(available, 12);
        }
        other => panic!("expected a capacity error, got {other:?}"),
    }
    assert_eq!(buffer, original, "buffer must be untouched on failure");
}

/// 恰好填满容量时成功
#[test]
fn test_exact_capacity_fits() {
    let mut buffer = random_buffer(4, 4, ChannelLayout::Rgb);
    let payload = [0xAA, 0x55, 0xFF];
    let header = build_signature("a", payload.len() as u32).unwrap();
    assert_eq!(header.len() + payload.len(), 12);

    embed(&mut buffer, &header, &payload).unwrap();
    let (filename, recovered) = extract(&buffer).unwrap();
    assert_eq!(filename, "a");
    assert_eq!(recovered, payload);
}

#[test]
fn test_capacity_arithmetic() {
    assert_eq!(capacity_bits(4, 4), 96);
    assert_eq!(capacity_bytes(4, 4), 12);
    assert_eq!(capacity_bits(0, 100), 0);

    assert!(check_capacity(4, 4, 9, 3).is_ok());
    assert!(check_capacity(4, 4, 9, 4).is_err());

    // 纯函数：重复调用结果一致
    let first = format!("{:?}", check_capacity(10, 3, 20, 5));
    let second = format!("{:?}", check_capacity(10, 3, 20, 5));
    assert_eq!(first, second);
}

/// 高位块在前，R、G、B 依次写入，RGB 图像
#[test]
fn test_chunk_order_rgb() {
    let mut buffer = PixelBuffer::filled(2, 1, ChannelLayout::Rgb, 0x00).unwrap();
    embed(&mut buffer, &[0b11_10_01_00], &[]).unwrap();
    assert_eq!(buffer.as_bytes(), &[3, 2, 1, 0, 0, 0]);
}

/// RGBA 图像中 Alpha 通道被跳过
#[test]
fn test_chunk_order_skips_alpha() {
    let mut buffer = PixelBuffer::filled(2, 1, ChannelLayout::Rgba, 0x80).unwrap();
    embed(&mut buffer, &[0b11_10_01_00], &[]).unwrap();
    assert_eq!(
        buffer.as_bytes(),
        &[0x83, 0x82, 0x81, 0x80, 0x80, 0x80, 0x80, 0x80]
    );
}

/// 嵌入只改变最低 2 位，且从不触碰 Alpha 通道
#[test]
fn test_bit_isolation() {
    let mut buffer = random_buffer(16, 16, ChannelLayout::Rgba);
    let original = buffer.clone();

    let mut payload = vec![0u8; 100];
    rand::rng().fill_bytes(&mut payload);
    hide_file(&mut buffer, "secret.bin", &payload).unwrap();

    for (before, after) in original
        .as_bytes()
        .chunks_exact(4)
        .zip(buffer.as_bytes().chunks_exact(4))
    {
        for channel in 0..3 {
            assert_eq!(before[channel] & 0xFC, after[channel] & 0xFC);
        }
        assert_eq!(before[3], after[3], "alpha must never change");
    }
}

#[test]
fn test_addressing_is_row_major_and_covers_each_slot_once() {
    let (width, height) = (3u32, 2u32);
    let total = capacity_bits(width, height);

    let first: Vec<_> = (0..total).step_by(2).map(|i| address(i, width)).collect();
    let second: Vec<_> = (0..total).step_by(2).map(|i| address(i, width)).collect();
    assert_eq!(first, second);

    let unique: HashSet<_> = first.iter().map(|s| (s.x, s.y, s.channel)).collect();
    assert_eq!(unique.len(), (width * height * 3) as usize);

    let triple = |i: u64| {
        let slot = address(i, width);
        (slot.x, slot.y, slot.channel)
    };
    assert_eq!(triple(0), (0, 0, 0));
    assert_eq!(triple(2), (0, 0, 1));
    assert_eq!(triple(4), (0, 0, 2));
    assert_eq!(triple(6), (1, 0, 0));
    assert_eq!(triple(18), (0, 1, 0));
    assert_eq!(triple(34), (2, 1, 2));
}

#[test]
fn test_chunk_shift_sequence() {
    let shifts: Vec<u32> = (0..10).step_by(2).map(chunk_shift).collect();
    assert_eq!(shifts, vec![6, 4, 2, 0, 6]);
}

#[test]
fn test_random_round_trip_rgb_and_rgba() {
    for layout in [ChannelLayout::Rgb, ChannelLayout::Rgba] {
        let mut buffer = random_buffer(37, 23, layout);
        let mut payload = vec![0u8; 500];
        rand::rng().fill_bytes(&mut payload);

        hide_file(&mut buffer, "数据.bin", &payload).unwrap();
        let (filename, recovered) = extract(&buffer).unwrap();

        assert_eq!(filename, "数据.bin");
        assert_eq!(recovered, payload);
    }
}

#[test]
fn test_empty_payload_round_trip() {
    let mut buffer = random_buffer(4, 4, ChannelLayout::Rgb);
    hide_file(&mut buffer, "e", &[]).unwrap();

    let (filename, payload) = extract(&buffer).unwrap();
    assert_eq!(filename, "e");
    assert!(payload.is_empty());
}

/// 未经隐写的图像：文件名长度为 0
#[test]
fn test_extract_rejects_zero_filename_length() {
    let buffer = PixelBuffer::filled(8, 8, ChannelLayout::Rgb, 0x00).unwrap();
    assert!(matches!(
        extract(&buffer),
        Err(StegoError::DecodeIntegrity(_))
    ));
}

/// 签名声称的长度超过图像容量时，在分配内存前失败
#[test]
fn test_extract_rejects_oversized_lengths() {
    let mut buffer = random_buffer(8, 8, ChannelLayout::Rgb);
    let header = build_signature("a", u32::MAX).unwrap();
    embed(&mut buffer, &header, &[]).unwrap();

    assert!(matches!(
        extract(&buffer),
        Err(StegoError::DecodeIntegrity(_))
    ));
}

#[test]
fn test_extract_rejects_image_smaller_than_signature() {
    let buffer = random_buffer(2, 2, ChannelLayout::Rgba);
    assert!(matches!(
        extract(&buffer),
        Err(StegoError::DecodeIntegrity(_))
    ));
}

#[test]
fn test_extract_rejects_non_utf8_filename() {
    let mut buffer = random_buffer(8, 8, ChannelLayout::Rgb);
    embed(&mut buffer, &[0, 0, 0, 1, 0, 0, 0, 0, 0xFF], &[]).unwrap();

    assert!(matches!(
        extract(&buffer),
        Err(StegoError::DecodeIntegrity(_))
    ));
}
