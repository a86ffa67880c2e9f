//! Pipeline entry points for archive operations.
//!
//! - `run_archive`: Mirror one event into a static snapshot directory
//! - `rewrite`: Document rewriting passes used while archiving

pub mod archive;
pub mod rewrite;

pub use archive::{ArchiveStage, Archiver, run_archive};
pub use rewrite::{detail_local_path, rewrite_files, rewrite_self_links};
