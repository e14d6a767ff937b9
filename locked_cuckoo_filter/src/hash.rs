//! Fingerprint and candidate bucket derivation.
//! 指纹与候选桶推导

use gxhash::gxhash64;

/// 64-bit non-cryptographic item hash.
/// 64 位非加密元素哈希
#[inline(always)]
pub fn hash(bytes: &[u8], seed: i64) -> u64 {
  gxhash64(bytes, seed)
}

/// Fingerprint with its two candidate buckets.
/// 指纹及其两个候选桶
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
  pub fp: u64,
  pub i1: usize,
  pub i2: usize,
}

/// Maps items to (fingerprint, i1, i2) for a fixed table geometry.
/// 针对固定表结构将元素映射为 (指纹, i1, i2)
#[derive(Debug, Clone, Copy)]
pub struct Locator {
  fp_mask: u64,
  idx_mask: usize,
  seed: i64,
}

impl Locator {
  /// `n_buckets` must be a power of two.
  /// `n_buckets` 必须为 2 的幂
  pub fn new(fp_bits: u32, n_buckets: usize, seed: i64) -> Self {
    debug_assert!((1..=32).contains(&fp_bits));
    debug_assert!(n_buckets.is_power_of_two());
    Locator {
      fp_mask: (1u64 << fp_bits) - 1,
      idx_mask: n_buckets - 1,
      seed,
    }
  }

  /// Low `fp_bits` of the hash; 0 is the empty sentinel, remapped to 1.
  /// 取哈希低 `fp_bits` 位；0 为空槽标记，映射为 1
  #[inline]
  pub fn fingerprint(&self, h: u64) -> u64 {
    let fp = h & self.fp_mask;
    if fp == 0 { 1 } else { fp }
  }

  /// Primary bucket from the high half of the hash.
  /// 由哈希高 32 位得到主桶
  #[inline]
  pub fn index(&self, h: u64) -> usize {
    ((h >> 32) as usize) & self.idx_mask
  }

  /// Other candidate bucket; `alt_index(alt_index(i, fp), fp) == i`.
  /// 另一个候选桶；满足 `alt_index(alt_index(i, fp), fp) == i`
  #[inline]
  pub fn alt_index(&self, idx: usize, fp: u64) -> usize {
    let h = hash(&(fp as u32).to_le_bytes(), self.seed);
    (idx ^ h as usize) & self.idx_mask
  }

  #[inline]
  pub fn locate(&self, item: &[u8]) -> Pos {
    let h = hash(item, self.seed);
    let fp = self.fingerprint(h);
    let i1 = self.index(h);
    Pos {
      fp,
      i1,
      i2: self.alt_index(i1, fp),
    }
  }
}
