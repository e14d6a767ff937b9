//! Bit array for packed fingerprint slots.
//! 用于紧凑指纹槽位的位数组

/// Tail bytes so every slot can be read as one little-endian u64.
/// 尾部填充字节，保证任意槽位都能按一个小端 u64 读取
const PADDING: usize = std::mem::size_of::<u64>();

/// Little-endian bit array, bit `i` is bit `i % 8` of byte `i / 8`.
/// 小端位数组，第 `i` 位为第 `i / 8` 字节的第 `i % 8` 位
#[derive(Debug, Clone)]
pub struct Bits(Vec<u8>);

impl Bits {
  /// Create zeroed array holding `size` bits.
  /// 创建可容纳 `size` 位的全零数组
  pub fn new(size: usize) -> Self {
    Bits(vec![0; size.div_ceil(8) + PADDING])
  }

  /// Usable bits (excluding padding).
  /// 可用位数（不含填充）
  #[inline]
  pub fn len(&self) -> usize {
    (self.0.len() - PADDING) * 8
  }

  #[inline(always)]
  fn word(&self, byte_idx: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&self.0[byte_idx..byte_idx + PADDING]);
    u64::from_le_bytes(buf)
  }

  /// Read up to 57 bits starting at `pos`, unmasked.
  /// 从 `pos` 起读取最多 57 位（不掩码）
  #[inline(always)]
  pub fn read_raw(&self, pos: usize) -> u64 {
    self.word(pos >> 3) >> (pos & 7)
  }

  /// Read `mask`-wide unsigned integer at `pos`.
  /// 在 `pos` 处读取 `mask` 宽度的无符号整数
  #[inline(always)]
  pub fn get(&self, pos: usize, mask: u64) -> u64 {
    self.read_raw(pos) & mask
  }

  /// Write `mask`-wide unsigned integer at `pos`.
  /// 在 `pos` 处写入 `mask` 宽度的无符号整数
  #[inline(always)]
  pub fn set(&mut self, pos: usize, mask: u64, val: u64) {
    let byte_idx = pos >> 3;
    let bit_off = pos & 7;
    let old = self.word(byte_idx);
    let new = (old & !(mask << bit_off)) | ((val & mask) << bit_off);
    self.0[byte_idx..byte_idx + PADDING].copy_from_slice(&new.to_le_bytes());
  }

  /// Zero every bit.
  /// 清零所有位
  pub fn clear(&mut self) {
    self.0.fill(0);
  }
}
