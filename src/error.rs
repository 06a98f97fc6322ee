/// Errors that can occur when configuring a ConcurrentMap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The configuration cannot describe a usable shard table.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

impl Error {
    pub(crate) const ZERO_SHARDS: Error =
        Error::InvalidConfiguration("shard count must be greater than 0");
}
