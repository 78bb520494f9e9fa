//! Diffing and reconciliation engine.
//!
//! Leaf-first:
//!
//! - `flatten`: nested JSON ⇄ flat dotted keys
//! - `locale`: locale discovery and on-disk layouts
//! - `snapshot`: previous committed version of a file
//! - `changes`: added / replaced / deleted keys of the main locale
//! - `missing`: keys other locales still lack
//! - `translate`: batched backend calls and merging
//! - `writer`: ordered output files
//! - `sync`: the run that ties them together

pub mod changes;
pub mod flatten;
pub mod locale;
pub mod missing;
pub mod progress;
pub mod snapshot;
pub mod sync;
pub mod translate;
pub mod writer;

pub use changes::ChangeSet;
pub use flatten::{FlatMap, flatten, unflatten};
pub use locale::{Layout, LocaleInfo, LocaleSet};
pub use missing::MissingKeys;
pub use snapshot::{GitSnapshots, MemorySnapshots, SnapshotProvider};
pub use sync::{FilePlan, SyncOptions, SyncPlan, SyncSummary, plan_sync, run_sync};
pub use translate::{TranslationBackend, Translations};
