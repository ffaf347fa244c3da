pub mod record_loader;

pub use record_loader::{discover_count, load_all_records, load_record};
