//! Arena-backed doubly linked list
//! 基于数组的双向链表

/// Null link / 空链接
pub(crate) const NIL: usize = usize::MAX;

/// List node / 链表节点
#[derive(Debug, Clone)]
pub(crate) struct Node {
  pub key: String,
  pub ct: i64,
  pub prev: usize,
  pub next: usize,
}

/// Node storage with free-slot reuse
/// 复用空闲槽的节点存储
#[derive(Debug, Clone)]
pub(crate) struct List {
  pub nodes: Vec<Node>,
  free: Vec<usize>,
  pub head: usize,
  pub tail: usize,
}

impl List {
  pub fn with_capacity(cap: usize) -> Self {
    Self {
      nodes: Vec::with_capacity(cap),
      free: Vec::new(),
      head: NIL,
      tail: NIL,
    }
  }

  /// Allocate node and append at tail, return its slot
  /// 分配节点并追加到尾部，返回槽位
  pub fn push_back(&mut self, key: String, ct: i64) -> usize {
    let node = Node {
      key,
      ct,
      prev: NIL,
      next: NIL,
    };
    let idx = match self.free.pop() {
      Some(idx) => {
        self.nodes[idx] = node;
        idx
      }
      None => {
        self.nodes.push(node);
        self.nodes.len() - 1
      }
    };
    self.link_after(idx, self.tail);
    idx
  }

  /// Unlink node and recycle its slot, return (key, ct)
  /// 摘除节点并回收槽位，返回 (key, ct)
  pub fn release(&mut self, idx: usize) -> (String, i64) {
    self.unlink(idx);
    self.free.push(idx);
    let node = &mut self.nodes[idx];
    (std::mem::take(&mut node.key), node.ct)
  }

  /// Detach node from its neighbours (slot stays allocated)
  /// 将节点从相邻节点摘除（槽位仍保留）
  pub fn unlink(&mut self, idx: usize) {
    let (prev, next) = {
      let n = &self.nodes[idx];
      (n.prev, n.next)
    };
    if prev == NIL {
      self.head = next;
    } else {
      self.nodes[prev].next = next;
    }
    if next == NIL {
      self.tail = prev;
    } else {
      self.nodes[next].prev = prev;
    }
    let n = &mut self.nodes[idx];
    n.prev = NIL;
    n.next = NIL;
  }

  /// Link detached node right after `at` (`NIL` means at head)
  /// 将已摘除节点链接到 `at` 之后（`NIL` 表示放到头部）
  pub fn link_after(&mut self, idx: usize, at: usize) {
    let next = if at == NIL {
      self.head
    } else {
      self.nodes[at].next
    };
    {
      let n = &mut self.nodes[idx];
      n.prev = at;
      n.next = next;
    }
    if at == NIL {
      self.head = idx;
    } else {
      self.nodes[at].next = idx;
    }
    if next == NIL {
      self.tail = idx;
    } else {
      self.nodes[next].prev = idx;
    }
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.free.clear();
    self.head = NIL;
    self.tail = NIL;
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn keys(list: &List) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = list.head;
    while cur != NIL {
      out.push(list.nodes[cur].key.clone());
      cur = list.nodes[cur].next;
    }
    out
  }

  fn keys_rev(list: &List) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = list.tail;
    while cur != NIL {
      out.push(list.nodes[cur].key.clone());
      cur = list.nodes[cur].prev;
    }
    out
  }

  #[test]
  fn link_both_directions() {
    let mut list = List::with_capacity(4);
    let a = list.push_back("a".into(), 1);
    let b = list.push_back("b".into(), 2);
    list.push_back("c".into(), 3);
    assert_eq!(keys(&list), ["a", "b", "c"]);

    list.unlink(b);
    list.link_after(b, NIL);
    assert_eq!(keys(&list), ["b", "a", "c"]);
    assert_eq!(keys_rev(&list), ["c", "a", "b"]);

    list.unlink(a);
    list.link_after(a, list.tail);
    assert_eq!(keys(&list), ["b", "c", "a"]);
    assert_eq!(keys_rev(&list), ["a", "c", "b"]);
  }

  #[test]
  fn release_reuses_slot() {
    let mut list = List::with_capacity(2);
    list.push_back("a".into(), 1);
    let b = list.push_back("b".into(), 2);
    assert_eq!(list.release(b), ("b".to_string(), 2));
    assert_eq!(keys(&list), ["a"]);
    assert_eq!(list.tail, 0);

    let c = list.push_back("c".into(), 3);
    assert_eq!(c, b);
    assert_eq!(list.nodes.len(), 2);
    assert_eq!(keys_rev(&list), ["c", "a"]);
  }
}
