use serde::Serialize;

use super::records::count_applications;
use crate::auth::{Role, Session};
use crate::backend::DataAccess;
use crate::error::AppResult;
use crate::models::{Application, ApplicationStatus};

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_applications: usize,
    pub pending_applications: usize,
    pub active_applications: usize,
    /// Only populated for dealers
    pub total_salesmen: usize,
}

impl DashboardStats {
    /// Dealers see every application under the dealer plus the salesmen
    /// head count; agents see only their own applications
    pub async fn load(api: &dyn DataAccess, session: &Session) -> AppResult<Self> {
        match session.role {
            Role::Dealer => {
                let (applications, salesmen) = tokio::try_join!(
                    api.get_applications(session.dealer_id, None),
                    api.get_salesmen(session.dealer_id),
                )?;
                Ok(Self::from_applications(&applications, salesmen.len()))
            }
            Role::Agent => {
                let agent_id = session.require_agent_id()?;
                let applications = api
                    .get_applications(session.dealer_id, Some(agent_id))
                    .await?;
                Ok(Self::from_applications(&applications, 0))
            }
        }
    }

    fn from_applications(applications: &[Application], total_salesmen: usize) -> Self {
        Self {
            total_applications: applications.len(),
            pending_applications: count_applications(applications, ApplicationStatus::Pending),
            active_applications: count_applications(applications, ApplicationStatus::Active),
            total_salesmen,
        }
    }
}
