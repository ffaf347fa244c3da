//! 文件移动服务 - 业务能力层
//!
//! 只负责"把一个文件改名"能力，不关心顺序和回滚

use std::io;
use std::path::Path;
use tracing::{debug, info};

/// 文件移动能力
#[allow(async_fn_in_trait)]
pub trait FileMover {
    /// 把 `from` 重命名为 `to`
    async fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// 不改动文件系统时返回 `true`
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// 真实文件系统
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMover;

impl FileMover for FsMover {
    async fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        debug!("重命名 {} -> {}", from.display(), to.display());
        tokio::fs::rename(from, to).await
    }
}

/// 演练模式：只记录日志
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunMover;

impl FileMover for DryRunMover {
    async fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        info!("[演练] {} -> {}", from.display(), to.display());
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_fs_mover_renames() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("0.png");
        let to = dir.path().join("new3.png");
        std::fs::write(&from, b"img").unwrap();

        FsMover.move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"img");
    }

    #[tokio::test]
    async fn test_dry_run_mover_leaves_files() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("0.png");
        std::fs::write(&from, b"img").unwrap();

        DryRunMover
            .move_file(&from, &dir.path().join("new0.png"))
            .await
            .unwrap();

        assert!(from.exists());
        assert!(DryRunMover.is_dry_run());
        assert!(!FsMover.is_dry_run());
    }
}
