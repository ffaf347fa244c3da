//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 1. **初始化**：写日志文件表头、输出启动信息
//! 2. **加载**：确定文件对数量，并发读取全部标注
//! 3. **排名**：按面积得到排列
//! 4. **重命名**：委托 `workflow::TwoPhaseRename`，演练模式下换成 `DryRunMover`
//! 5. **收尾**：写清单、输出统计

use crate::config::Config;
use crate::models::{
    discover_count, load_all_records, AnnotationRecord, RankPermutation, RecordParser,
};
use crate::services::{
    area_range, rank_by_area, DryRunMover, FileMover, FsMover, Manifest, ManifestWriter,
};
use crate::utils::logging;
use crate::workflow::{RenameReport, TwoPhaseRename};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// 一次运行的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// 文件对数量
    pub total: usize,
    /// 重命名次数（演练模式下为计划次数）
    pub moved: usize,
    /// 序号不变的文件对
    pub unchanged: usize,
    pub dry_run: bool,
    pub min_area: Option<i64>,
    pub max_area: Option<i64>,
}

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(
            &config.annotation_tree().to_string(),
            &config.image_tree().to_string(),
            config.dry_run,
        );

        Ok(Self { config })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunStats> {
        let count = self.resolve_count().await?;

        if count == 0 {
            warn!("⚠️ 没有找到待处理的标注文件，程序结束");
            return Ok(RunStats {
                dry_run: self.config.dry_run,
                ..Default::default()
            });
        }

        let records = self.load_records(count).await?;
        let perm = rank_by_area(&records).context("标注记录序号不连续，无法排名")?;
        let (min_area, max_area) = area_range(&records).context("没有可用的标注记录")?;
        logging::log_records_loaded(count, min_area, max_area);

        let report = if self.config.dry_run {
            self.rename(&perm, count, &DryRunMover).await?
        } else {
            self.rename(&perm, count, &FsMover).await?
        };

        if let Some(path) = &self.config.manifest_path {
            let manifest = Manifest::build(&records, &perm, self.config.dry_run);
            ManifestWriter::with_path(path).write(&manifest).await?;
        }

        let stats = RunStats {
            total: count,
            moved: report.total_moves(),
            unchanged: report.unchanged,
            dry_run: self.config.dry_run,
            min_area: Some(min_area),
            max_area: Some(max_area),
        };
        self.write_summary(&stats)?;
        logging::print_final_stats(
            stats.total,
            stats.moved,
            stats.unchanged,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 配置中的数量，或从标注目录探测
    async fn resolve_count(&self) -> Result<usize> {
        match self.config.file_count {
            Some(count) => Ok(count),
            None => {
                info!("\n📁 正在探测标注文件数量...");
                let count = discover_count(&self.config.annotation_tree()).await?;
                Ok(count)
            }
        }
    }

    /// 加载标注
    async fn load_records(&self, count: usize) -> Result<Vec<AnnotationRecord>> {
        info!("\n📁 正在读取 {} 个标注文件...", count);
        let parser = RecordParser::new(self.config.bbox_key.clone())?;
        let records = load_all_records(
            &parser,
            &self.config.annotation_tree(),
            count,
            self.config.max_concurrent_reads,
        )
        .await
        .context("读取标注失败，未改动任何文件")?;
        Ok(records)
    }

    async fn rename<M: FileMover>(
        &self,
        perm: &RankPermutation,
        count: usize,
        mover: &M,
    ) -> Result<RenameReport> {
        let flow = TwoPhaseRename::new(
            vec![self.config.annotation_tree(), self.config.image_tree()],
            self.config.temp_prefix.clone(),
            count,
            mover,
        );
        let report = flow.run(perm).await?;
        Ok(report)
    }

    fn write_summary(&self, stats: &RunStats) -> Result<()> {
        let path = &self.config.output_log_file;
        logging::append_log_line(path, &format!("文件对: {}", stats.total))?;
        logging::append_log_line(path, &format!("重命名次数: {}", stats.moved))?;
        logging::append_log_line(path, &format!("序号不变: {}", stats.unchanged))?;
        logging::append_log_line(path, &format!("演练模式: {}", stats.dry_run))?;
        if let (Some(min), Some(max)) = (stats.min_area, stats.max_area) {
            logging::append_log_line(path, &format!("面积范围: {} ~ {}", min, max))?;
        }
        Ok(())
    }
}
