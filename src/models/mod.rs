mod record;
mod sync_run;

pub use record::{Post, Repository, Video};
pub use sync_run::SyncRun;
