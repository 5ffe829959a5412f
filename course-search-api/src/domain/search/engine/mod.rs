//! Search engine implementations.

mod elasticsearch;
#[cfg(test)]
mod mock;

pub use elasticsearch::ElasticSearchEngine;
#[cfg(test)]
pub use mock::MockSearchEngine;
