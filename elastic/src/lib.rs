mod client;
mod elastic_url;
pub mod models;

pub(crate) use elastic_url::*;

pub use client::*;
pub use models::*;
