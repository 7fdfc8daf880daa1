//! Derived views over collections fetched wholesale from the backend

pub mod commissions;
pub mod dashboard;
pub mod leaderboard;
pub mod records;

pub use commissions::CommissionSummary;
pub use dashboard::DashboardStats;
pub use leaderboard::{Leaderboard, RankBy, RankTier};
pub use records::{
    count_applications, count_installations, filter_installations, search_applications,
    search_salesmen, StatusFilter,
};
