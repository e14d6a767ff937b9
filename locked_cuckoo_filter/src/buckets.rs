//! Bucket storage for cuckoo filter fingerprints.
//! 布谷鸟过滤器指纹的桶存储

use fastrand::Rng;

use crate::bits::Bits;

/// Empty slot marker / 空槽标记
pub const EMPTY: u64 = 0;

/// Widest bucket readable in one u64 load (7 bits lost to the byte offset).
/// 单次 u64 读取可覆盖的最大桶宽（字节内偏移最多占 7 位）
const WORD_BUCKET_BITS: usize = 64 - 7;

/// Fixed-size bucket array of packed fingerprints.
/// 紧凑存放指纹的定长桶数组
#[derive(Debug, Clone)]
pub struct Buckets {
  fp_bits: usize,
  fp_mask: u64,
  entries: usize,
  bucket_bits: usize,
  #[cfg(test)]
  n_buckets: usize,
  /// Whole bucket fits in one load / 整个桶可一次读取
  word: bool,
  bits: Bits,
}

impl Buckets {
  /// `n_buckets * entries * fp_bits` must not overflow.
  /// `n_buckets * entries * fp_bits` 不能溢出
  pub fn new(fp_bits: u32, entries: usize, n_buckets: usize) -> Self {
    let fp_bits = fp_bits as usize;
    let bucket_bits = fp_bits * entries;
    Buckets {
      fp_bits,
      fp_mask: (1u64 << fp_bits) - 1,
      entries,
      bucket_bits,
      #[cfg(test)]
      n_buckets,
      word: bucket_bits <= WORD_BUCKET_BITS,
      bits: Bits::new(bucket_bits * n_buckets),
    }
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.n_buckets
  }

  #[cfg(test)]
  pub fn entries_per_bucket(&self) -> usize {
    self.entries
  }

  /// Bits used by the table.
  /// 表占用的位数
  #[inline]
  pub fn bits(&self) -> u64 {
    self.bits.len() as u64
  }

  #[inline(always)]
  fn slot(&self, idx: usize, i: usize) -> usize {
    self.bucket_bits * idx + self.fp_bits * i
  }

  /// Bit offset of first slot in bucket `idx` equal to `fp`.
  /// 桶 `idx` 中第一个等于 `fp` 的槽位的位偏移
  #[inline]
  fn find(&self, idx: usize, fp: u64) -> Option<usize> {
    let base = self.bucket_bits * idx;
    if self.word {
      let bucket = self.bits.read_raw(base);
      return (0..self.entries)
        .find(|&i| (bucket >> (self.fp_bits * i)) & self.fp_mask == fp)
        .map(|i| base + self.fp_bits * i);
    }
    (0..self.entries)
      .map(|i| base + self.fp_bits * i)
      .find(|&off| self.bits.get(off, self.fp_mask) == fp)
  }

  #[inline]
  pub fn contains(&self, idx: usize, fp: u64) -> bool {
    debug_assert_ne!(fp, EMPTY);
    self.find(idx, fp).is_some()
  }

  /// Slots in bucket `idx` holding `fp`.
  /// 桶 `idx` 中存放 `fp` 的槽位数
  pub fn count(&self, idx: usize, fp: u64) -> usize {
    (0..self.entries)
      .filter(|&i| self.bits.get(self.slot(idx, i), self.fp_mask) == fp)
      .count()
  }

  /// Non-empty slots in bucket `idx`.
  /// 桶 `idx` 中非空槽位数
  #[cfg(test)]
  pub fn occupied(&self, idx: usize) -> usize {
    self.entries - self.count(idx, EMPTY)
  }

  /// Put `fp` in the first empty slot of bucket `idx`.
  /// 将 `fp` 放入桶 `idx` 的第一个空槽
  #[inline]
  pub fn try_insert(&mut self, idx: usize, fp: u64) -> bool {
    debug_assert_ne!(fp, EMPTY);
    match self.find(idx, EMPTY) {
      Some(off) => {
        self.bits.set(off, self.fp_mask, fp);
        true
      }
      None => false,
    }
  }

  /// Swap `fp` into a random slot of full bucket `idx`; return (slot offset, evicted).
  /// 将 `fp` 换入满桶 `idx` 的随机槽位；返回 (槽位偏移, 被踢出的指纹)
  #[inline]
  pub fn random_swap(&mut self, idx: usize, fp: u64, rng: &mut Rng) -> (usize, u64) {
    let off = self.slot(idx, rng.usize(0..self.entries));
    let old = self.bits.get(off, self.fp_mask);
    self.bits.set(off, self.fp_mask, fp);
    debug_assert_ne!(fp, EMPTY);
    debug_assert_ne!(old, EMPTY);
    (off, old)
  }

  /// Write `fp` back at a slot offset from `random_swap`.
  /// 在 `random_swap` 返回的槽位偏移处写回 `fp`
  #[inline]
  pub fn restore(&mut self, off: usize, fp: u64) {
    self.bits.set(off, self.fp_mask, fp);
  }

  /// Clear first slot of bucket `idx` holding `fp`.
  /// 清除桶 `idx` 中第一个存放 `fp` 的槽位
  #[inline]
  pub fn remove(&mut self, idx: usize, fp: u64) -> bool {
    debug_assert_ne!(fp, EMPTY);
    match self.find(idx, fp) {
      Some(off) => {
        self.bits.set(off, self.fp_mask, EMPTY);
        true
      }
      None => false,
    }
  }

  pub fn clear(&mut self) {
    self.bits.clear();
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn basic_ops() {
    let mut rng = Rng::with_seed(1);
    let mut buckets = Buckets::new(8, 4, 1024);
    assert_eq!(buckets.len(), 1024);
    assert_eq!(buckets.bits(), 1024 * 8 * 4);

    for i in 0..4 {
      assert!(!buckets.contains(333, 100 + i));
      assert!(buckets.try_insert(333, 100 + i));
      assert!(buckets.contains(333, 100 + i));
    }
    assert!(!buckets.try_insert(333, 104));
    assert_eq!(buckets.occupied(333), 4);
    assert_eq!(buckets.occupied(332), 0);
    assert_eq!(buckets.occupied(334), 0);

    let (off, old) = buckets.random_swap(333, 104, &mut rng);
    assert!(buckets.contains(333, 104));
    assert!(!buckets.contains(333, old));

    buckets.restore(off, old);
    assert!(buckets.contains(333, old));
    assert!(!buckets.contains(333, 104));
  }

  #[test]
  fn remove_first_match() {
    let mut buckets = Buckets::new(8, 4, 1);
    assert!(buckets.try_insert(0, 10));
    assert!(buckets.try_insert(0, 11));
    assert!(buckets.try_insert(0, 10));
    assert_eq!(buckets.count(0, 10), 2);

    assert!(buckets.remove(0, 10));
    assert_eq!(buckets.count(0, 10), 1);
    assert!(buckets.contains(0, 10));
    assert!(buckets.remove(0, 10));
    assert!(!buckets.remove(0, 10));
    assert_eq!(buckets.occupied(0), 1);

    // Freed slot is reused / 释放的槽位被复用
    assert!(buckets.try_insert(0, 12));
    assert_eq!(buckets.occupied(0), 2);
  }

  /// Buckets wider than one load use the per-slot path
  /// 超过单次读取宽度的桶走逐槽路径
  #[test]
  fn wide_buckets() {
    for (fp_bits, entries) in [(32, 4), (13, 7), (1, 3), (5, 1)] {
      let mut buckets = Buckets::new(fp_bits, entries, 16);
      let max = (1u64 << fp_bits) - 1;
      for idx in [0, 7, 15] {
        for i in 0..entries as u64 {
          let fp = max - (i % max);
          assert!(buckets.try_insert(idx, fp), "{fp_bits}x{entries}");
        }
        assert!(!buckets.try_insert(idx, max));
        assert_eq!(buckets.occupied(idx), entries);
      }
      assert_eq!(buckets.occupied(1), 0);
      assert_eq!(buckets.occupied(14), 0);
      assert!(buckets.contains(15, max));
      buckets.clear();
      assert_eq!(buckets.occupied(15), 0);
    }
  }
}
