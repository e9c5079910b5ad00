use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeriveError {
    #[error("too many seeds: {count} > {max}")]
    TooManySeeds { count: usize, max: usize },

    #[error("seed {index} is {len} bytes, longer than {max}")]
    SeedTooLong { index: usize, len: usize, max: usize },
}
