//! 清单写入服务 - 业务能力层
//!
//! 只负责"写排列清单"能力，不关心流程

use crate::error::{AppError, AppResult};
use crate::models::{AnnotationRecord, RankPermutation};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// 清单中的一行：原序号、新序号与面积
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub old_index: usize,
    pub new_index: usize,
    pub area: i64,
}

/// 一次运行的排列清单
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub generated_at: String,
    pub dry_run: bool,
    pub total: usize,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn build(records: &[AnnotationRecord], perm: &RankPermutation, dry_run: bool) -> Self {
        let entries = perm
            .entries()
            .map(|e| ManifestEntry {
                old_index: e.old_index,
                new_index: e.new_index,
                area: records[e.old_index].area,
            })
            .collect();
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            dry_run,
            total: perm.len(),
            entries,
        }
    }
}

/// 清单写入服务
pub struct ManifestWriter {
    manifest_path: PathBuf,
}

impl ManifestWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.manifest_path
    }

    /// 写入清单（覆盖已有文件）
    pub async fn write(&self, manifest: &Manifest) -> AppResult<()> {
        let path = &self.manifest_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file_write_failed(parent, e))?;
        }

        let json = serde_json::to_string_pretty(manifest).map_err(|e| {
            AppError::file_write_failed(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| AppError::file_write_failed(path, e))?;

        info!("📝 清单已写入: {} ({} 条)", path.display(), manifest.total);
        Ok(())
    }
}
