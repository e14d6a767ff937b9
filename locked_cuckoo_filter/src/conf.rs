//! Filter configuration and sizing
//! 过滤器配置与容量计算

use crate::{Error, Result};

/// Filter configuration options
/// 过滤器配置选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conf {
  /// Capacity target (items)
  /// 容量目标（元素数）
  MaxKeys(usize),

  /// Slots per bucket
  /// 每桶槽位数
  EntriesPerBucket(usize),

  /// Fingerprint width in bits, 1..=32
  /// 指纹位宽，1..=32
  FpBits(u32),

  /// Eviction walk bound
  /// 踢出步数上限
  MaxDisplacements(usize),

  /// Doubling threshold for bucket count, (0, 1]
  /// 桶数翻倍阈值，(0, 1]
  LoadFactor(f64),

  /// Keep operation counters
  /// 记录操作计数
  WithStats(bool),

  /// Verbose diagnostics through `log::debug!`
  /// 通过 `log::debug!` 输出详细诊断
  WithDebug(bool),

  /// Eviction RNG seed
  /// 踢出随机数种子
  Seed(u64),

  /// Item hash seed
  /// 元素哈希种子
  HashSeed(i64),
}

/// Filter configuration
/// 过滤器配置
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  pub max_keys: usize,
  pub entries_per_bucket: usize,
  pub fp_bits: u32,
  pub max_displacements: usize,
  pub load_factor: f64,
  pub with_stats: bool,
  pub with_debug: bool,
  /// `None` seeds from the process RNG
  /// `None` 时从进程级随机数取种子
  pub seed: Option<u64>,
  pub hash_seed: i64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      max_keys: default::MAX_KEYS,
      entries_per_bucket: default::ENTRIES_PER_BUCKET,
      fp_bits: default::FP_BITS,
      max_displacements: default::MAX_DISPLACEMENTS,
      load_factor: default::LOAD_FACTOR,
      with_stats: false,
      with_debug: false,
      seed: None,
      hash_seed: default::HASH_SEED,
    }
  }
}

impl From<&[Conf]> for Config {
  fn from(conf_li: &[Conf]) -> Self {
    let mut config = Self::default();
    for &conf in conf_li {
      match conf {
        Conf::MaxKeys(v) => config.max_keys = v,
        Conf::EntriesPerBucket(v) => config.entries_per_bucket = v,
        Conf::FpBits(v) => config.fp_bits = v,
        Conf::MaxDisplacements(v) => config.max_displacements = v,
        Conf::LoadFactor(v) => config.load_factor = v,
        Conf::WithStats(v) => config.with_stats = v,
        Conf::WithDebug(v) => config.with_debug = v,
        Conf::Seed(v) => config.seed = Some(v),
        Conf::HashSeed(v) => config.hash_seed = v,
      }
    }
    config
  }
}

/// Validated table geometry
/// 校验后的表结构参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
  /// Power of two / 2 的幂
  pub n_buckets: usize,
  pub entries_per_bucket: usize,
  pub fp_bits: u32,
  pub max_displacements: usize,
  /// Load factor check doubled the bucket count
  /// 负载因子检查使桶数翻倍
  pub doubled: bool,
}

impl Layout {
  /// Total slots / 槽位总数
  #[inline]
  pub fn capacity(&self) -> usize {
    self.n_buckets * self.entries_per_bucket
  }
}

impl Config {
  /// Validate and compute bucket count
  /// 校验参数并计算桶数
  ///
  /// `n_buckets = next_power_of_two(max_keys / entries_per_bucket)`, doubled
  /// once if `max_keys / n_buckets / entries_per_bucket > load_factor`.
  /// 若 `max_keys / n_buckets / entries_per_bucket > load_factor` 则翻倍一次。
  pub fn layout(&self) -> Result<Layout> {
    let max_keys = self.max_keys;
    let entries = self.entries_per_bucket;
    let fp_bits = self.fp_bits;
    let load_factor = self.load_factor;

    if max_keys == 0 {
      return Err(Error::conf("max_keys", max_keys, "must be > 0"));
    }
    if entries == 0 {
      return Err(Error::conf("entries_per_bucket", entries, "must be > 0"));
    }
    if !(1..=32).contains(&fp_bits) {
      return Err(Error::conf("fp_bits", fp_bits, "must be in [1, 32]"));
    }
    // Also rejects NaN / 同时拒绝 NaN
    if !(load_factor > 0.0 && load_factor <= 1.0) {
      return Err(Error::conf("load_factor", load_factor, "must be in (0, 1]"));
    }

    const OVERFLOW: &str = "table size overflows usize";
    let mut n_buckets = (max_keys / entries)
      .checked_next_power_of_two()
      .ok_or_else(|| Error::conf("max_keys", max_keys, OVERFLOW))?;

    let load = max_keys as f64 / n_buckets as f64 / entries as f64;
    let doubled = load > load_factor;
    if doubled {
      n_buckets = n_buckets
        .checked_mul(2)
        .ok_or_else(|| Error::conf("max_keys", max_keys, OVERFLOW))?;
    }

    n_buckets
      .checked_mul(entries)
      .and_then(|slots| slots.checked_mul(fp_bits as usize))
      .ok_or_else(|| Error::conf("entries_per_bucket", entries, OVERFLOW))?;

    Ok(Layout {
      n_buckets,
      entries_per_bucket: entries,
      fp_bits,
      max_displacements: self.max_displacements,
      doubled,
    })
  }
}

/// Default values
/// 默认值
pub mod default {
  pub const MAX_KEYS: usize = 100_000;
  pub const ENTRIES_PER_BUCKET: usize = 4;
  pub const FP_BITS: u32 = 16;
  pub const MAX_DISPLACEMENTS: usize = 500;
  pub const LOAD_FACTOR: f64 = 0.95;
  pub const HASH_SEED: i64 = 0x5eed_c0c0_f11e_0001;
}

#[cfg(test)]
mod test {
  use super::*;

  fn layout(conf: &[Conf]) -> Result<Layout> {
    Config::from(conf).layout()
  }

  #[test]
  fn last_conf_wins() {
    let c = Config::from(&[Conf::FpBits(8), Conf::FpBits(12), Conf::Seed(3)][..]);
    assert_eq!(c.fp_bits, 12);
    assert_eq!(c.seed, Some(3));
    assert_eq!(c.max_keys, default::MAX_KEYS);
  }

  #[test]
  fn power_of_two() {
    for max_keys in [1, 2, 5, 100, 100_000] {
      let l = layout(&[Conf::MaxKeys(max_keys)]).unwrap();
      assert!(l.n_buckets.is_power_of_two(), "{max_keys}: {l:?}");
      assert!(l.n_buckets * 4 >= max_keys, "{max_keys}: {l:?}");
    }
  }

  #[test]
  fn doubling() {
    // 5 / 4 = 1 bucket, load 1.25 > 0.95
    let l = layout(&[Conf::MaxKeys(5)]).unwrap();
    assert_eq!(l.n_buckets, 2);
    assert!(l.doubled);

    // 100 / 4 = 25 -> 32, load 0.78
    let l = layout(&[Conf::MaxKeys(100)]).unwrap();
    assert_eq!(l.n_buckets, 32);
    assert!(!l.doubled);

    // 128 / 4 = 32, load 1.0
    let l = layout(&[Conf::MaxKeys(128)]).unwrap();
    assert_eq!(l.n_buckets, 64);
    assert!(l.doubled);
    let l = layout(&[Conf::MaxKeys(128), Conf::LoadFactor(1.0)]).unwrap();
    assert_eq!(l.n_buckets, 32);
  }

  #[test]
  fn reject() {
    let bad = [
      Conf::MaxKeys(0),
      Conf::EntriesPerBucket(0),
      Conf::FpBits(0),
      Conf::FpBits(33),
      Conf::LoadFactor(0.0),
      Conf::LoadFactor(1.5),
      Conf::LoadFactor(f64::NAN),
    ];
    for conf in bad {
      let err = layout(&[conf]).unwrap_err();
      assert!(err.is_config(), "{conf:?}");
    }
    let err = layout(&[Conf::MaxKeys(usize::MAX), Conf::EntriesPerBucket(1)]).unwrap_err();
    assert!(err.is_config());
  }
}
