use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::DemoAccount;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dealer,
    Agent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Dealer => f.write_str("dealer"),
            Role::Agent => f.write_str("agent"),
        }
    }
}

/// Identity of the signed-in dealer or agent
///
/// Passed explicitly into every view and into the intake wizard; nothing
/// reads it from ambient storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    pub dealer_id: u32,
    pub agent_id: Option<u32>,
}

impl Session {
    pub fn dealer(dealer_id: u32) -> Self {
        Self {
            role: Role::Dealer,
            dealer_id,
            agent_id: None,
        }
    }

    pub fn agent(dealer_id: u32, agent_id: u32) -> Self {
        Self {
            role: Role::Agent,
            dealer_id,
            agent_id: Some(agent_id),
        }
    }

    pub fn is_dealer(&self) -> bool {
        self.role == Role::Dealer
    }

    /// Agent filter for application and commission queries: agents only see
    /// their own records, dealers see everything under the dealer
    pub fn agent_scope(&self) -> Option<u32> {
        match self.role {
            Role::Agent => self.agent_id,
            Role::Dealer => None,
        }
    }

    pub fn require_agent_id(&self) -> AppResult<u32> {
        self.agent_id.ok_or_else(|| {
            AppError::Authentication("An agent id is required for this view".to_string())
        })
    }
}

/// Login collaborator: exchanges credentials for a session
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> AppResult<Session>;
}

/// Placeholder authenticator backed by the configured demo account table
pub struct DemoAuthenticator {
    accounts: Vec<DemoAccount>,
}

impl DemoAuthenticator {
    pub fn new(accounts: Vec<DemoAccount>) -> Self {
        Self { accounts }
    }
}

impl Authenticator for DemoAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> AppResult<Session> {
        let username = username.trim().to_lowercase();
        let account = self
            .accounts
            .iter()
            .find(|account| account.username.to_lowercase() == username)
            .filter(|account| account.password == password)
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        tracing::info!("Logged in as {} (dealer {})", account.role, account.dealer_id);

        Ok(Session {
            role: account.role,
            dealer_id: account.dealer_id,
            agent_id: match account.role {
                Role::Agent => account.agent_id,
                Role::Dealer => None,
            },
        })
    }
}
