mod schema;
pub(crate) mod store;

pub use store::{RecordStore, Tables};
