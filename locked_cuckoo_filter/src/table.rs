//! Bucket table with bounded eviction walk.
//! 带有限踢出步数的桶表

use fastrand::Rng;

use crate::{
  Error, Result,
  buckets::Buckets,
  conf::Layout,
  hash::{Locator, Pos},
};

/// Unsynchronized cuckoo table, guarded by `Filter`.
/// 非同步的布谷鸟表，由 `Filter` 加锁保护
#[derive(Debug)]
pub(crate) struct Table {
  buckets: Buckets,
  loc: Locator,
  max_kicks: usize,
  rng: Rng,
  len: usize,
  /// (slot offset, previous fp) of each swap in the current walk
  /// 当前踢出过程中每次交换的 (槽位偏移, 原指纹)
  trail: Vec<(usize, u64)>,
}

impl Table {
  pub fn new(layout: &Layout, loc: Locator, rng: Rng) -> Self {
    Table {
      buckets: Buckets::new(layout.fp_bits, layout.entries_per_bucket, layout.n_buckets),
      loc,
      max_kicks: layout.max_displacements,
      rng,
      len: 0,
      trail: Vec::new(),
    }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub fn bits(&self) -> u64 {
    self.buckets.bits()
  }

  #[inline]
  pub fn contains(&self, pos: &Pos) -> bool {
    self.buckets.contains(pos.i1, pos.fp) || self.buckets.contains(pos.i2, pos.fp)
  }

  /// Slots in both candidate buckets holding `pos.fp`.
  /// 两个候选桶中存放 `pos.fp` 的槽位数
  pub fn count(&self, pos: &Pos) -> usize {
    let n = self.buckets.count(pos.i1, pos.fp);
    if pos.i2 == pos.i1 {
      n
    } else {
      n + self.buckets.count(pos.i2, pos.fp)
    }
  }

  /// Insert fingerprint, evicting along a random walk when both buckets are full.
  /// Returns displacements used. On failure every swap is undone.
  /// 插入指纹，两个桶都满时沿随机路径踢出。返回踢出次数，失败时撤销所有交换。
  pub fn insert(&mut self, pos: &Pos) -> Result<usize> {
    if self.buckets.try_insert(pos.i1, pos.fp) || self.buckets.try_insert(pos.i2, pos.fp) {
      self.len += 1;
      return Ok(0);
    }

    let mut fp = pos.fp;
    let mut idx = if self.rng.bool() { pos.i1 } else { pos.i2 };
    self.trail.clear();
    for kick in 1..=self.max_kicks {
      let (off, evicted) = self.buckets.random_swap(idx, fp, &mut self.rng);
      self.trail.push((off, evicted));
      fp = evicted;
      idx = self.loc.alt_index(idx, fp);
      if self.buckets.try_insert(idx, fp) {
        self.len += 1;
        return Ok(kick);
      }
    }

    for &(off, prev) in self.trail.iter().rev() {
      self.buckets.restore(off, prev);
    }
    Err(Error::Full {
      kicks: self.max_kicks,
    })
  }

  pub fn remove(&mut self, pos: &Pos) -> bool {
    let removed = self.buckets.remove(pos.i1, pos.fp) || self.buckets.remove(pos.i2, pos.fp);
    if removed {
      self.len -= 1;
    }
    removed
  }

  pub fn clear(&mut self) {
    self.buckets.clear();
    self.len = 0;
  }

  #[cfg(test)]
  pub fn buckets(&self) -> &Buckets {
    &self.buckets
  }
}
