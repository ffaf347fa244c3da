//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (确定数量 → 加载 → 排名 → 重命名 → 清单)
//!     ↓
//! workflow::TwoPhaseRename (预检 → 第一阶段 → 第二阶段 / 回滚)
//!     ↓
//! services (能力层：ranking / file_mover / manifest_writer)
//!     ↓
//! models (边框、文件树、排列、记录加载)
//! ```

pub mod app;

pub use app::{App, RunStats};
