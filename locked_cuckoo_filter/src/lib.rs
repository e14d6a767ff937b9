//! Fixed-size [cuckoo filter][cuckoo filter] behind a reader/writer lock.
//! 读写锁保护的定长布谷鸟过滤器
//!
//! Supports deletion, approximate membership and optional operation counters.
//! The bucket count is a power of two, fingerprints are bit-packed, and the
//! eviction walk is bounded and seedable.
//! 支持删除、近似成员查询与可选的操作计数。桶数为 2 的幂，指纹紧凑存放，踢出步数有上限且随机种子可设定。
//!
//! # Examples
//!
//! ```
//! use locked_cuckoo_filter::{Conf, Filter};
//!
//! let filter = Filter::with_conf(&[Conf::MaxKeys(900), Conf::Seed(1)]).unwrap();
//! assert!(!filter.contains("foo"));
//! filter.add("foo").unwrap();
//! assert!(filter.contains("foo"));
//! assert_eq!(filter.n_buckets(), 256);
//! ```
//!
//! A full filter rejects the insert and stays intact:
//! 过滤器满时拒绝插入，已有内容不受影响：
//!
//! ```
//! use locked_cuckoo_filter::{Conf, Filter};
//!
//! let filter = Filter::with_conf(&[Conf::MaxKeys(8), Conf::MaxDisplacements(10)]).unwrap();
//! let mut added = Vec::new();
//! for i in 0u32..64 {
//!   match filter.add(i.to_le_bytes()) {
//!     Ok(()) => added.push(i),
//!     Err(e) => assert!(e.is_full()),
//!   }
//! }
//! assert!(added.len() <= filter.capacity());
//! assert!(added.iter().all(|i| filter.contains(i.to_le_bytes())));
//! ```
//!
//! [cuckoo filter]: https://www.cs.cmu.edu/~dga/papers/cuckoo-conext2014.pdf
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bits;
mod buckets;
mod conf;
mod error;
mod filter;
mod hash;
mod table;

pub use conf::{Conf, Config, Layout, default};
pub use error::{Error, Result};
pub use filter::{Filter, stat};
pub use hash::{Locator, Pos, hash};
