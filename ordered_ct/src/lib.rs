//! Insertion-ordered counter with in-place sort
//! 保持插入顺序并支持原地排序的计数器
//!
//! Keys live in a doubly linked list (default order = first insertion) with a
//! hash index for O(1) update. `sort_by_key` / `sort_by_ct` relink nodes in
//! place instead of rebuilding the list.
//! 键存放在双向链表中（默认顺序为首次插入顺序），配合哈希索引实现 O(1) 更新。
//! `sort_by_key` / `sort_by_ct` 原地重新链接节点，而不是重建链表。
//!
//! ```
//! use ordered_ct::{Dir, OrderedCt};
//!
//! let mut ct = OrderedCt::new();
//! ct.incr("b", 1);
//! ct.incr("a", 1);
//! ct.incr("a", 1);
//! assert_eq!(ct.keys().collect::<Vec<_>>(), ["b", "a"]);
//!
//! ct.sort_by_key(Dir::Asc);
//! assert!(ct.next());
//! assert_eq!(ct.key_value(), Some(("a", 2)));
//! assert!(ct.next());
//! assert_eq!(ct.key_value(), Some(("b", 1)));
//! assert!(!ct.next());
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod ct;
mod node;
mod sort;

pub use ct::{Iter, OrderedCt};
pub use sort::Dir;
