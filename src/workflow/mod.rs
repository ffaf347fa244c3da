pub mod rename_journal;
pub mod two_phase;

pub use rename_journal::{RenameJournal, RollbackOutcome};
pub use two_phase::{RenameReport, TwoPhaseRename};
