/// 签名中每个长度字段占用的比特数。
/// 文件名长度与载荷长度都以 32 位大端整数存储。
pub const SIG_SIZE_BITS: usize = 32;

/// 单个长度字段占用的字节数 (32 / 8 = 4)。
pub const SIG_FIELD_BYTES: usize = SIG_SIZE_BITS / 8;

/// 签名中固定部分的字节数：文件名长度 + 载荷长度。
pub const SIG_FIXED_BYTES: usize = SIG_FIELD_BYTES * 2;

/// 每个颜色通道承载的比特数。
pub const BITS_PER_CHANNEL: usize = 2;

/// 每个像素中参与隐写的通道数 (R, G, B)。
/// 即使图像带有 Alpha 通道，它也永远不会被修改。
pub const USABLE_CHANNELS: usize = 3;

/// 每个像素可承载的比特数 (3 * 2 = 6)。
pub const BITS_PER_PIXEL: usize = USABLE_CHANNELS * BITS_PER_CHANNEL;

/// 取出一个 2 bit 数据块的掩码。
pub const CHUNK_MASK: u8 = 0x03;

/// 清除通道最低 2 位的掩码。
pub const CLEAR_MASK: u8 = 0xFC;
