use serde::Serialize;
use std::str::FromStr;

use crate::error::AppError;
use crate::models::Salesman;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankBy {
    #[default]
    Sales,
    Commission,
}

impl FromStr for RankBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sales" => Ok(RankBy::Sales),
            "commission" => Ok(RankBy::Commission),
            other => Err(AppError::BadRequest(format!("Unknown ranking '{}'", other))),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Listed,
}

impl RankTier {
    /// Tier for a zero-based leaderboard position
    pub fn for_position(index: usize) -> Self {
        match index {
            0 => RankTier::Gold,
            1 => RankTier::Silver,
            2 => RankTier::Bronze,
            _ => RankTier::Listed,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankedSalesman {
    /// One-based
    pub rank: usize,
    pub tier: RankTier,
    pub salesman: Salesman,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub entries: Vec<RankedSalesman>,
    /// Sales of whoever ranks first under the chosen ordering
    pub top_sales: u64,
    /// Mean sales per salesman, rounded half away from zero
    pub average_sales: u64,
}

impl Leaderboard {
    pub fn build(salesmen: &[Salesman], rank_by: RankBy) -> Self {
        let mut sorted = salesmen.to_vec();
        // stable: ties keep backend order
        match rank_by {
            RankBy::Sales => sorted.sort_by(|a, b| b.total_sales.cmp(&a.total_sales)),
            RankBy::Commission => {
                sorted.sort_by(|a, b| b.total_commission.cmp(&a.total_commission))
            }
        }

        let top_sales = sorted.first().map_or(0, |s| s.total_sales);
        let average_sales = if salesmen.is_empty() {
            0
        } else {
            let total: u64 = salesmen.iter().map(|s| s.total_sales).sum();
            (total as f64 / salesmen.len() as f64).round() as u64
        };

        let entries = sorted
            .into_iter()
            .enumerate()
            .map(|(index, salesman)| RankedSalesman {
                rank: index + 1,
                tier: RankTier::for_position(index),
                salesman,
            })
            .collect();

        Self {
            entries,
            top_sales,
            average_sales,
        }
    }

    pub fn podium(&self) -> &[RankedSalesman] {
        &self.entries[..self.entries.len().min(3)]
    }
}
