//! In-place adjacency sort
//! 原地相邻比较排序
//!
//! Each node, taken in current list order, walks backward past every
//! predecessor that should follow it, then is relinked there. The prefix
//! already visited stays sorted, so one call yields a full stable order.
//! 按当前链表顺序逐个取节点，向前越过所有应排在其后的前驱，再重新链接。
//! 已访问的前缀始终有序，因此一次调用即得到完整的稳定排序。

use crate::node::{List, NIL, Node};

/// Sort direction / 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dir {
  /// Ascending / 升序
  #[default]
  Asc,
  /// Descending / 降序
  Desc,
}

impl Dir {
  /// True if `prev` must be placed after `cur`
  /// 若 `prev` 必须排在 `cur` 之后则为 true
  #[inline]
  pub fn after<T: Ord + ?Sized>(self, prev: &T, cur: &T) -> bool {
    match self {
      Dir::Asc => prev > cur,
      Dir::Desc => prev < cur,
    }
  }
}

pub(crate) fn sort_by(list: &mut List, after: impl Fn(&Node, &Node) -> bool) {
  let mut cur = list.head;
  while cur != NIL {
    let next = list.nodes[cur].next;
    let prev = list.nodes[cur].prev;

    let mut at = prev;
    while at != NIL && after(&list.nodes[at], &list.nodes[cur]) {
      at = list.nodes[at].prev;
    }

    if at != prev {
      list.unlink(cur);
      list.link_after(cur, at);
    }
    cur = next;
  }
}
