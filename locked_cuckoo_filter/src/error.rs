//! Error types / 错误类型

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
  /// Invalid construction parameter / 无效的构造参数
  #[error("invalid config {name}={val}: {rule}")]
  Config {
    name: &'static str,
    val: String,
    rule: &'static str,
  },

  /// Eviction walk exhausted, rebuild a larger filter
  /// 踢出次数耗尽，需重建更大的过滤器
  #[error("filter full: no free slot after {kicks} displacements")]
  Full { kicks: usize },
}

impl Error {
  pub(crate) fn conf(name: &'static str, val: impl ToString, rule: &'static str) -> Self {
    Self::Config {
      name,
      val: val.to_string(),
      rule,
    }
  }

  /// Filter full / 过滤器已满
  #[inline]
  pub fn is_full(&self) -> bool {
    matches!(self, Self::Full { .. })
  }

  /// Config rejected / 配置被拒绝
  #[inline]
  pub fn is_config(&self) -> bool {
    matches!(self, Self::Config { .. })
  }
}
