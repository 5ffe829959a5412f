mod bulk;
mod search;
mod suggest;

pub use bulk::*;
pub use search::*;
pub use suggest::*;
