use serde::Serialize;

use crate::models::Commission;

/// Totals for one commission period
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSummary {
    pub period: String,
    pub statements: Vec<Commission>,
    pub total_commission: u64,
    pub total_revenue: u64,
    pub total_sales: u64,
    pub total_activations: u64,
    /// Activations as a percentage of sales; 0 when there were no sales
    pub activation_rate: f64,
    pub unpaid_count: usize,
}

impl CommissionSummary {
    pub fn for_period(commissions: &[Commission], period: &str) -> Self {
        let statements: Vec<Commission> = commissions
            .iter()
            .filter(|commission| commission.period == period)
            .cloned()
            .collect();

        let total_commission = statements.iter().map(|c| c.total_commission).sum();
        let total_revenue = statements.iter().map(|c| c.total_revenue).sum();
        let total_sales: u64 = statements.iter().map(|c| c.total_sales).sum();
        let total_activations: u64 = statements.iter().map(|c| c.successful_activations).sum();
        let unpaid_count = statements.iter().filter(|c| !c.paid).count();

        let activation_rate = if total_sales > 0 {
            total_activations as f64 / total_sales as f64 * 100.0
        } else {
            0.0
        };

        Self {
            period: period.to_string(),
            statements,
            total_commission,
            total_revenue,
            total_sales,
            total_activations,
            activation_rate,
            unpaid_count,
        }
    }
}

/// Distinct periods present, newest first
pub fn periods(commissions: &[Commission]) -> Vec<String> {
    let mut periods: Vec<String> = commissions.iter().map(|c| c.period.clone()).collect();
    periods.sort_unstable_by(|a, b| b.cmp(a));
    periods.dedup();
    periods
}
