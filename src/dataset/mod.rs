//! Family dataset
//!
//! Parsing, derived statistics and the write-once snapshot.

mod dates;
mod error;
mod loader;
mod types;

pub use dates::submission_year;
pub use error::{LoadError, LoadResult};
pub use loader::{load, parse_members, DatasetSource, StaticSource};
pub use types::{
    display_name, normalize_name, DatasetSnapshot, DerivedStats, FamilyMember, SnapshotStore,
};

#[cfg(feature = "native")]
pub use loader::{FileSource, HttpSource, NativeSource};

/// Current calendar year in local time
pub fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Local::now().year()
}
