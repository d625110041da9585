mod graph;
mod snapshot;
mod store;

pub use store::SocialGraph;

pub(crate) use graph::{GraphInner, UserRecord};
