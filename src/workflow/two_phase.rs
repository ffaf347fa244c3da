//! 两阶段重命名流程
//!
//! 第一阶段把 `<i>.<ext>` 移到临时名 `<prefix><rank>.<ext>`，
//! 第二阶段再把临时名移回 `<rank>.<ext>`。所有文件树按同一个排列、
//! 同一个顺序处理，保证标注与图片的序号始终对齐。

use crate::error::{AppError, AppResult, FileError, PlanError};
use crate::models::{FileTree, RankPermutation};
use crate::services::FileMover;
use crate::workflow::RenameJournal;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 每移动多少个文件输出一次进度
const PROGRESS_EVERY: usize = 1000;

/// 重命名结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    /// 文件对数量
    pub pairs: usize,
    /// 文件树数量
    pub trees: usize,
    pub phase_one_moves: usize,
    pub phase_two_moves: usize,
    /// 序号不变的文件对
    pub unchanged: usize,
}

impl RenameReport {
    pub fn total_moves(&self) -> usize {
        self.phase_one_moves + self.phase_two_moves
    }
}

/// 两阶段重命名
pub struct TwoPhaseRename<'a, M> {
    trees: Vec<FileTree>,
    temp_prefix: String,
    count: usize,
    mover: &'a M,
}

impl<'a, M: FileMover> TwoPhaseRename<'a, M> {
    pub fn new(
        trees: Vec<FileTree>,
        temp_prefix: impl Into<String>,
        count: usize,
        mover: &'a M,
    ) -> Self {
        Self {
            trees,
            temp_prefix: temp_prefix.into(),
            count,
            mover,
        }
    }

    /// 预检，不改动任何文件
    ///
    /// - 所有源文件存在
    /// - 所有临时文件名未被占用
    /// - 临时文件名与最终文件名两两不同
    pub async fn preflight(&self) -> AppResult<()> {
        let mut seen: HashSet<PathBuf> = HashSet::with_capacity(self.count * self.trees.len() * 2);

        for tree in &self.trees {
            for index in 0..self.count {
                let path = tree.path_for(index);
                if !exists(&path).await? {
                    return Err(PlanError::MissingSource { path }.into());
                }
                if !seen.insert(path.clone()) {
                    return Err(PlanError::NameCollision { path }.into());
                }
            }
        }

        for tree in &self.trees {
            for rank in 0..self.count {
                let path = tree.temp_path_for(&self.temp_prefix, rank);
                if !seen.insert(path.clone()) {
                    return Err(PlanError::NameCollision { path }.into());
                }
                if exists(&path).await? {
                    return Err(PlanError::TempOccupied { path }.into());
                }
            }
        }

        debug!(
            "预检通过: {} 个文件树 × {} 个文件",
            self.trees.len(),
            self.count
        );
        Ok(())
    }

    /// 执行预检与两阶段重命名
    ///
    /// 任一步失败时按相反顺序撤销已完成的步骤，再返回 `PlanError::Aborted`
    pub async fn run(&self, perm: &RankPermutation) -> AppResult<RenameReport> {
        if perm.len() != self.count {
            return Err(PlanError::LengthMismatch {
                permutation: perm.len(),
                expected: self.count,
            }
            .into());
        }

        self.preflight().await?;

        let mut report = RenameReport {
            pairs: self.count,
            trees: self.trees.len(),
            unchanged: perm.fixed_points(),
            ..Default::default()
        };
        if self.count == 0 {
            return Ok(report);
        }

        let mut journal = RenameJournal::new();

        info!("🔀 第一阶段: 移动到临时文件名 ({}*)", self.temp_prefix);
        for old_index in 0..self.count {
            let rank = perm.rank_of(old_index);
            for tree in &self.trees {
                let from = tree.path_for(old_index);
                let to = tree.temp_path_for(&self.temp_prefix, rank);
                self.step(&mut journal, from, to).await?;
                report.phase_one_moves += 1;
            }
            log_progress(1, report.phase_one_moves);
        }

        info!("🔀 第二阶段: 移回最终文件名");
        for rank in 0..self.count {
            for tree in &self.trees {
                let from = tree.temp_path_for(&self.temp_prefix, rank);
                let to = tree.path_for(rank);
                self.step(&mut journal, from, to).await?;
                report.phase_two_moves += 1;
            }
            log_progress(2, report.phase_two_moves);
        }

        Ok(report)
    }

    async fn step(
        &self,
        journal: &mut RenameJournal,
        from: PathBuf,
        to: PathBuf,
    ) -> AppResult<()> {
        match self.mover.move_file(&from, &to).await {
            Ok(()) => {
                journal.record(from, to);
                Ok(())
            }
            Err(source) => {
                let failed = FileError::RenameFailed { from, to, source };
                tracing::error!("❌ {}", failed);
                let outcome = std::mem::take(journal).rollback(self.mover).await;
                Err(PlanError::Aborted {
                    rolled_back: outcome.restored,
                    rollback_failures: outcome.failed.len(),
                    source: failed,
                }
                .into())
            }
        }
    }
}

async fn exists(path: &Path) -> AppResult<bool> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| AppError::file_read_failed(path, e))
}

fn log_progress(phase: u8, moved: usize) {
    if moved % PROGRESS_EVERY == 0 {
        debug!("第{}阶段已移动 {} 个文件", phase, moved);
    }
}
