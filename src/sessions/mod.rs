mod demo;
mod load;
mod parse;
mod record;

pub use load::{SessionSource, SnapshotWatcher, spawn_load};
pub use record::{SessionRecord, SessionSnapshot, SessionStats};
