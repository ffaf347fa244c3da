//! 排名排列

use serde::Serialize;

/// 按面积排序得到的排列
///
/// `order[rank] = old_index`，`rank_of[old_index] = rank`，两者互为逆映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankPermutation {
    order: Vec<usize>,
    rank_of: Vec<usize>,
}

/// 清单中的一行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    pub old_index: usize,
    pub new_index: usize,
}

impl RankPermutation {
    /// 由 `order` 构造；`order` 不是 `0..n` 的排列时返回 `None`
    pub fn from_order(order: Vec<usize>) -> Option<Self> {
        let n = order.len();
        let mut rank_of = vec![usize::MAX; n];
        for (rank, &old) in order.iter().enumerate() {
            if old >= n || rank_of[old] != usize::MAX {
                return None;
            }
            rank_of[old] = rank;
        }
        Some(Self { order, rank_of })
    }

    pub fn identity(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
            rank_of: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 原序号 `old_index` 的新序号
    pub fn rank_of(&self, old_index: usize) -> usize {
        self.rank_of[old_index]
    }

    /// 排名 `rank` 对应的原序号
    pub fn old_index_at(&self, rank: usize) -> usize {
        self.order[rank]
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// 不动点数量，即无需移动的文件对
    pub fn fixed_points(&self) -> usize {
        self.order
            .iter()
            .enumerate()
            .filter(|(rank, &old)| *rank == old)
            .count()
    }

    pub fn entries(&self) -> impl Iterator<Item = RankEntry> + '_ {
        self.rank_of
            .iter()
            .enumerate()
            .map(|(old_index, &new_index)| RankEntry {
                old_index,
                new_index,
            })
    }
}
