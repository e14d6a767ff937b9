//! Ordered counter
//! 有序计数器

use std::{collections::BTreeMap, fmt};

use gxhash::{HashMap, HashMapExt};

use crate::{
  Dir,
  node::{List, NIL},
  sort::sort_by,
};

/// Cursor position / 游标位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
  /// Before head / 头部之前
  Start,
  /// On node / 位于节点
  At(usize),
}

/// Key → count map that keeps insertion order and sorts in place
/// 保持插入顺序、可原地排序的键 → 计数映射
///
/// # Complexity
/// 复杂度
///
/// - incr / decr / get / rm: O(1)
/// - sort_by_key / sort_by_ct: O(n²) worst, O(n) when nearly ordered
///
/// The built-in cursor (`next` / `key_value`) is single-consumer. Use
/// [`OrderedCt::iter`] for a borrowing traversal.
/// 内置游标（`next` / `key_value`）仅供单个消费者使用，借用遍历请用 [`OrderedCt::iter`]。
#[derive(Clone)]
pub struct OrderedCt {
  list: List,
  index: HashMap<String, usize>,
  cursor: Cursor,
}

impl Default for OrderedCt {
  fn default() -> Self {
    Self::new()
  }
}

impl OrderedCt {
  /// Create empty counter / 创建空计数器
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  /// Create with capacity hint / 按容量提示创建
  pub fn with_capacity(cap: usize) -> Self {
    Self {
      list: List::with_capacity(cap),
      index: HashMap::with_capacity(cap),
      cursor: Cursor::Start,
    }
  }

  /// Add `delta` to `key`, appending it at tail if absent; return new count
  /// 给 `key` 加上 `delta`，不存在则追加到尾部；返回新计数
  pub fn incr(&mut self, key: &str, delta: i64) -> i64 {
    if let Some(&idx) = self.index.get(key) {
      let node = &mut self.list.nodes[idx];
      node.ct = node.ct.saturating_add(delta);
      return node.ct;
    }
    let idx = self.list.push_back(key.to_owned(), delta);
    self.index.insert(key.to_owned(), idx);
    delta
  }

  /// Same as `incr(key, -delta)` / 等价于 `incr(key, -delta)`
  #[inline]
  pub fn decr(&mut self, key: &str, delta: i64) -> i64 {
    self.incr(key, delta.saturating_neg())
  }

  /// Count of `key`, 0 if absent / `key` 的计数，不存在为 0
  #[inline]
  pub fn get(&self, key: &str) -> i64 {
    self
      .index
      .get(key)
      .map_or(0, |&idx| self.list.nodes[idx].ct)
  }

  /// Remove `key`, return its count
  /// 删除 `key`，返回其计数
  ///
  /// A cursor sitting on the removed node steps back to its predecessor, so
  /// the next `next()` yields the node that followed it.
  /// 若游标正位于被删节点，则退回到前驱，下一次 `next()` 返回其后继。
  pub fn rm(&mut self, key: &str) -> Option<i64> {
    let idx = self.index.remove(key)?;
    if self.cursor == Cursor::At(idx) {
      let prev = self.list.nodes[idx].prev;
      self.cursor = if prev == NIL {
        Cursor::Start
      } else {
        Cursor::At(prev)
      };
    }
    let (_, ct) = self.list.release(idx);
    Some(ct)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.index.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.index.is_empty()
  }

  /// Drop all keys / 清空所有键
  pub fn clear(&mut self) {
    self.list.clear();
    self.index.clear();
    self.cursor = Cursor::Start;
  }

  /// Advance cursor; first call lands on head. Returns false past tail and rewinds.
  /// 前移游标，首次调用定位到头部。越过尾部时返回 false 并复位。
  #[allow(clippy::should_implement_trait)]
  pub fn next(&mut self) -> bool {
    let nxt = match self.cursor {
      Cursor::Start => self.list.head,
      Cursor::At(idx) => self.list.nodes[idx].next,
    };
    if nxt == NIL {
      self.cursor = Cursor::Start;
      return false;
    }
    self.cursor = Cursor::At(nxt);
    true
  }

  /// Entry under cursor / 游标处的条目
  pub fn key_value(&self) -> Option<(&str, i64)> {
    match self.cursor {
      Cursor::Start => None,
      Cursor::At(idx) => {
        let node = &self.list.nodes[idx];
        Some((node.key.as_str(), node.ct))
      }
    }
  }

  /// Reset cursor before head / 将游标复位到头部之前
  #[inline]
  pub fn rewind(&mut self) {
    self.cursor = Cursor::Start;
  }

  /// Reorder by key, resets cursor / 按键排序，并复位游标
  pub fn sort_by_key(&mut self, dir: Dir) {
    sort_by(&mut self.list, |prev, cur| {
      dir.after(prev.key.as_str(), cur.key.as_str())
    });
    self.cursor = Cursor::Start;
  }

  /// Reorder by count, ties keep current order; resets cursor
  /// 按计数排序，相等时保持当前顺序；并复位游标
  pub fn sort_by_ct(&mut self, dir: Dir) {
    sort_by(&mut self.list, |prev, cur| dir.after(&prev.ct, &cur.ct));
    self.cursor = Cursor::Start;
  }

  /// Sort by key ascending, then drain cursor into a map
  /// 按键升序排序，再通过游标导出为映射
  pub fn snapshot(&mut self) -> BTreeMap<String, i64> {
    self.sort_by_key(Dir::Asc);
    let mut map = BTreeMap::new();
    while self.next() {
      if let Some((k, v)) = self.key_value() {
        map.insert(k.to_owned(), v);
      }
    }
    map
  }

  /// Borrowing iterator in list order / 按链表顺序的借用迭代器
  pub fn iter(&self) -> Iter<'_> {
    Iter {
      list: &self.list,
      cur: self.list.head,
    }
  }

  /// Keys in list order / 按链表顺序的键
  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.iter().map(|(k, _)| k)
  }
}

impl fmt::Debug for OrderedCt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.iter()).finish()
  }
}

/// Iterator over (key, count) / (key, count) 迭代器
pub struct Iter<'a> {
  list: &'a List,
  cur: usize,
}

impl<'a> Iterator for Iter<'a> {
  type Item = (&'a str, i64);

  fn next(&mut self) -> Option<Self::Item> {
    if self.cur == NIL {
      return None;
    }
    let node = &self.list.nodes[self.cur];
    self.cur = node.next;
    Some((node.key.as_str(), node.ct))
  }
}

impl<'a> IntoIterator for &'a OrderedCt {
  type Item = (&'a str, i64);
  type IntoIter = Iter<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a> Extend<(&'a str, i64)> for OrderedCt {
  fn extend<I: IntoIterator<Item = (&'a str, i64)>>(&mut self, iter: I) {
    for (k, v) in iter {
      self.incr(k, v);
    }
  }
}
