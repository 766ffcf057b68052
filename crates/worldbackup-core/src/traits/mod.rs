//! Capability traits defined in `worldbackup-core` and implemented by other
//! crates. The watch engine only ever talks to these.

pub mod archive;
pub mod clock;
pub mod filesystem;

pub use archive::Archiver;
pub use clock::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
pub use filesystem::{DirEntryMeta, FileSystem};

#[cfg(any(test, feature = "test-util"))]
pub use clock::{ManualClock, SequentialIdGenerator};
