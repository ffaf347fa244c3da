//! 重命名日志
//!
//! 记录已完成的每一步移动，失败时按相反顺序撤销

use crate::services::FileMover;
use std::path::PathBuf;
use tracing::{error, warn};

/// 一步已完成的移动
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveStep {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// 回滚结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RollbackOutcome {
    /// 成功撤销的步数
    pub restored: usize,
    /// 撤销失败的步骤，文件停留在 `to`
    pub failed: Vec<MoveStep>,
}

#[derive(Debug, Default)]
pub struct RenameJournal {
    steps: Vec<MoveStep>,
}

impl RenameJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, from: PathBuf, to: PathBuf) {
        self.steps.push(MoveStep { from, to });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 按相反顺序撤销全部步骤
    ///
    /// 某一步撤销失败后继续撤销其余步骤
    pub async fn rollback<M: FileMover>(self, mover: &M) -> RollbackOutcome {
        let mut outcome = RollbackOutcome::default();
        warn!("↩️ 开始回滚 {} 步重命名", self.steps.len());

        for step in self.steps.into_iter().rev() {
            match mover.move_file(&step.to, &step.from).await {
                Ok(()) => outcome.restored += 1,
                Err(e) => {
                    error!(
                        "回滚失败 {} -> {}: {}",
                        step.to.display(),
                        step.from.display(),
                        e
                    );
                    outcome.failed.push(step);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::FsMover;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rollback_restores_in_reverse() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("0.json");
        let b = dir.path().join("new1.json");
        let c = dir.path().join("1.json");
        std::fs::write(&a, "a").unwrap();

        let mut journal = RenameJournal::new();
        assert!(journal.is_empty());
        std::fs::rename(&a, &b).unwrap();
        journal.record(a.clone(), b.clone());
        std::fs::rename(&b, &c).unwrap();
        journal.record(b.clone(), c.clone());
        assert_eq!(journal.len(), 2);

        let outcome = journal.rollback(&FsMover).await;

        assert_eq!(outcome.restored, 2);
        assert!(outcome.failed.is_empty());
        assert_eq!(std::fs::read_to_string(&a).unwrap(), "a");
        assert!(!b.exists());
        assert!(!c.exists());
    }

    #[tokio::test]
    async fn test_rollback_reports_failures() {
        let dir = tempdir().unwrap();
        let mut journal = RenameJournal::new();
        // 目标文件从未存在，撤销必然失败
        journal.record(dir.path().join("0.png"), dir.path().join("new0.png"));

        let outcome = journal.rollback(&FsMover).await;

        assert_eq!(outcome.restored, 0);
        assert_eq!(outcome.failed.len(), 1);
    }
}
