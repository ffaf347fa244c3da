pub mod bounding_box;
pub mod file_tree;
pub mod loaders;
pub mod permutation;

pub use bounding_box::{AnnotationRecord, BoundingBox, RecordParser};
pub use file_tree::FileTree;
pub use loaders::{discover_count, load_all_records, load_record};
pub use permutation::{RankEntry, RankPermutation};
