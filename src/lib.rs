//! # bbox_reorder
//!
//! 按标注中边框面积重排成对的图片/标注文件
//!
//! 每个序号 `i` 对应一对文件 `<标注目录>/<i>.json` 与 `<图片目录>/<i>.png`。
//! 程序读取全部标注，按 `(x2 - x1) * (y2 - y1)` 升序排名，再用两阶段重命名
//! 让文件名中的序号等于排名，两个目录始终保持对齐。
//!
//! ## 模块结构
//!
//! - `models/` - 边框、文件树、排列，以及标注加载
//! - `services/` - 排名、文件移动、清单写入
//! - `workflow/` - 两阶段重命名与回滚
//! - `orchestrator/` - 应用入口与统计

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnnotationRecord, BoundingBox, FileTree, RankPermutation, RecordParser};
pub use orchestrator::{App, RunStats};
pub use services::{DryRunMover, FileMover, FsMover};
pub use workflow::{RenameReport, TwoPhaseRename};
