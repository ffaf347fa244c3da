pub mod file_mover;
pub mod manifest_writer;
pub mod ranking;

pub use file_mover::{DryRunMover, FileMover, FsMover};
pub use manifest_writer::{Manifest, ManifestEntry, ManifestWriter};
pub use ranking::{area_range, rank_by_area};
