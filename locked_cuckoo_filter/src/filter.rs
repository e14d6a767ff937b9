//! Thread-safe cuckoo filter.
//! 线程安全的布谷鸟过滤器

use std::{collections::BTreeMap, fmt};

use fastrand::Rng;
use log::debug;
use ordered_ct::OrderedCt;
use parking_lot::{Mutex, RwLock};

use crate::{
  Result,
  conf::{Conf, Config, Layout},
  hash::{Locator, Pos},
  table::Table,
};

/// Stat counter names / 统计计数器名称
pub mod stat {
  /// Successful `add` / 成功的 `add`
  pub const INDEXED: &str = "indexed";
  /// `contains` hit / `contains` 命中
  pub const FOUND: &str = "found";
  /// Successful `delete` / 成功的 `delete`
  pub const DELETED: &str = "deleted";
}

/// Fixed-size cuckoo filter behind a reader/writer lock.
/// 读写锁保护的定长布谷鸟过滤器
///
/// Mutations (`add`, `delete`, `clear`) hold the write lock for the whole
/// call, eviction walk included. `contains` and `count` share the read lock.
/// 修改操作（`add`、`delete`、`clear`）在整个调用期间持有写锁，包括踢出过程。
/// `contains` 与 `count` 共享读锁。
///
/// # Examples
///
/// ```rust
/// use locked_cuckoo_filter::{Conf, Filter};
///
/// let filter = Filter::with_conf(&[Conf::MaxKeys(1000), Conf::WithStats(true)]).unwrap();
/// filter.add("hello").unwrap();
/// assert!(filter.contains("hello"));
/// assert!(filter.delete("hello"));
/// assert!(!filter.contains("hello"));
///
/// let stats = filter.stats().unwrap();
/// assert_eq!(stats["indexed"], 1);
/// assert_eq!(stats["deleted"], 1);
/// ```
pub struct Filter {
  loc: Locator,
  layout: Layout,
  table: RwLock<Table>,
  stats: Option<Mutex<OrderedCt>>,
  debug: bool,
}

impl Filter {
  /// Build from validated config.
  /// 由校验后的配置构建
  pub fn new(config: Config) -> Result<Self> {
    let layout = config.layout()?;
    let loc = Locator::new(layout.fp_bits, layout.n_buckets, config.hash_seed);
    let rng = match config.seed {
      Some(seed) => Rng::with_seed(seed),
      None => Rng::new(),
    };

    if config.with_debug {
      debug!(
        "cuckoo filter: max_keys={} n_buckets={} entries={} fp_bits={} max_kicks={} doubled={}",
        config.max_keys,
        layout.n_buckets,
        layout.entries_per_bucket,
        layout.fp_bits,
        layout.max_displacements,
        layout.doubled
      );
    }

    Ok(Filter {
      loc,
      layout,
      table: RwLock::new(Table::new(&layout, loc, rng)),
      stats: config.with_stats.then(|| Mutex::new(OrderedCt::new())),
      debug: config.with_debug,
    })
  }

  /// Build from option list.
  /// 由配置项列表构建
  pub fn with_conf(conf: &[Conf]) -> Result<Self> {
    Self::new(Config::from(conf))
  }

  #[inline]
  fn locate(&self, item: &[u8]) -> Pos {
    self.loc.locate(item)
  }

  #[inline]
  fn bump(&self, key: &str) {
    if let Some(stats) = &self.stats {
      stats.lock().incr(key, 1);
    }
  }

  fn insert(&self, table: &mut Table, pos: &Pos) -> Result<()> {
    match table.insert(pos) {
      Ok(kicks) => {
        if self.debug && kicks > 0 {
          debug!(
            "cuckoo add: placed after {kicks} displacements, len={}",
            table.len()
          );
        }
        Ok(())
      }
      Err(e) => {
        if self.debug {
          debug!(
            "cuckoo add: {e}, len={} capacity={}",
            table.len(),
            self.layout.capacity()
          );
        }
        Err(e)
      }
    }
  }

  /// Insert item. Adding the same item twice stores two fingerprints.
  /// 插入元素。同一元素插入两次会存储两个指纹。
  ///
  /// Returns [`crate::Error::Full`] when the eviction walk finds no slot;
  /// the table is left unchanged and the caller must rebuild a larger filter.
  /// 踢出过程找不到空位时返回 [`crate::Error::Full`]；表保持不变，调用方需重建更大的过滤器。
  pub fn add(&self, item: impl AsRef<[u8]>) -> Result<()> {
    let pos = self.locate(item.as_ref());
    self.insert(&mut self.table.write(), &pos)?;
    self.bump(stat::INDEXED);
    Ok(())
  }

  /// Insert item unless it may already be present; returns whether it was inserted.
  /// 若元素可能已存在则跳过；返回是否插入
  pub fn add_unique(&self, item: impl AsRef<[u8]>) -> Result<bool> {
    let pos = self.locate(item.as_ref());
    {
      let mut table = self.table.write();
      if table.contains(&pos) {
        return Ok(false);
      }
      self.insert(&mut table, &pos)?;
    }
    self.bump(stat::INDEXED);
    Ok(true)
  }

  /// May contain item; never false for an added, undeleted item.
  /// 可能包含该元素；已添加且未删除的元素一定返回 true
  pub fn contains(&self, item: impl AsRef<[u8]>) -> bool {
    let pos = self.locate(item.as_ref());
    let found = self.table.read().contains(&pos);
    if found {
      self.bump(stat::FOUND);
    }
    found
  }

  /// Remove one fingerprint of item.
  /// 删除该元素的一个指纹
  ///
  /// Only delete items that were added: a colliding fingerprint of another
  /// item sharing the same buckets is indistinguishable and would be removed.
  /// 只应删除已添加的元素：共享候选桶且指纹相同的其他元素无法区分，会被误删。
  pub fn delete(&self, item: impl AsRef<[u8]>) -> bool {
    let pos = self.locate(item.as_ref());
    let removed = self.table.write().remove(&pos);
    if removed {
      self.bump(stat::DELETED);
    }
    removed
  }

  /// Slots across both candidate buckets holding the item's fingerprint.
  /// 两个候选桶中存放该元素指纹的槽位数
  ///
  /// Counts colliding items too, so it bounds duplicate adds from above.
  /// 也会计入指纹冲突的其他元素，因此只是重复插入次数的上界。
  pub fn count(&self, item: impl AsRef<[u8]>) -> usize {
    let pos = self.locate(item.as_ref());
    self.table.read().count(&pos)
  }

  /// Empty every slot. Stat counters are kept.
  /// 清空所有槽位，统计计数保留
  pub fn clear(&self) {
    self.table.write().clear();
    if self.debug {
      debug!("cuckoo clear: capacity={}", self.layout.capacity());
    }
  }

  /// Operation counters sorted by name, `None` unless built with `WithStats`.
  /// 按名称排序的操作计数；未启用 `WithStats` 时为 `None`
  pub fn stats(&self) -> Option<BTreeMap<String, i64>> {
    self.stats.as_ref().map(|stats| stats.lock().snapshot())
  }

  /// Stored fingerprints / 已存储的指纹数
  #[inline]
  pub fn len(&self) -> usize {
    self.table.read().len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Total slots / 槽位总数
  #[inline]
  pub fn capacity(&self) -> usize {
    self.layout.capacity()
  }

  /// Occupied fraction of slots / 已占用槽位比例
  pub fn load(&self) -> f64 {
    self.len() as f64 / self.capacity() as f64
  }

  #[inline]
  pub fn layout(&self) -> &Layout {
    &self.layout
  }

  #[inline]
  pub fn n_buckets(&self) -> usize {
    self.layout.n_buckets
  }

  #[inline]
  pub fn entries_per_bucket(&self) -> usize {
    self.layout.entries_per_bucket
  }

  #[inline]
  pub fn fp_bits(&self) -> u32 {
    self.layout.fp_bits
  }

  #[inline]
  pub fn max_displacements(&self) -> usize {
    self.layout.max_displacements
  }

  /// Bits used by the packed table / 紧凑表占用的位数
  pub fn bits(&self) -> u64 {
    self.table.read().bits()
  }

  /// Upper bound on single-probe false positive rate: `2 * entries / 2^fp_bits`.
  /// 单次查询假阳性率上界：`2 * entries / 2^fp_bits`
  pub fn false_positive_rate(&self) -> f64 {
    let slots = 2.0 * self.layout.entries_per_bucket as f64;
    (slots / (1u64 << self.layout.fp_bits) as f64).min(1.0)
  }
}

impl fmt::Debug for Filter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Filter")
      .field("layout", &self.layout)
      .field("len", &self.len())
      .field("stats", &self.stats.is_some())
      .finish()
  }
}
