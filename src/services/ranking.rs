//! 排名服务 - 业务能力层
//!
//! 只负责"按面积排序"能力，不关心文件

use crate::models::{AnnotationRecord, RankPermutation};

/// 按面积升序排名
///
/// 使用稳定排序，面积相同时保持原序号的先后顺序，结果是确定的。
/// `records` 必须按序号排列且覆盖 `0..n`。
pub fn rank_by_area(records: &[AnnotationRecord]) -> Option<RankPermutation> {
    if records.iter().enumerate().any(|(i, r)| r.index != i) {
        return None;
    }

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| (records[i].area, i));
    RankPermutation::from_order(order)
}

/// 最小与最大面积
pub fn area_range(records: &[AnnotationRecord]) -> Option<(i64, i64)> {
    let min = records.iter().map(|r| r.area).min()?;
    let max = records.iter().map(|r| r.area).max()?;
    Some((min, max))
}
