//! Domain services.
//!
//! Each service owns its own registries and graphs and takes the shared
//! [`BankConfig`](crate::config::BankConfig) at construction:
//!
//! - [`AccountService`]: accounts, customers, balance movements
//! - [`AuthenticationService`]: users and salted credentials
//! - [`RegistrationService`]: validated sign-up with id and email indexes
//! - [`TransactionService`]: transaction log, review queue, transfer network
//! - [`RiskAnalysisService`]: risk scores and per-account profiles
//! - [`AnalyticsService`]: customer network and batch prioritization

pub mod account;
pub mod analytics;
pub mod auth;
pub mod registration;
pub mod risk;
pub mod transaction;

pub use account::{AccountQuery, AccountService};
pub use analytics::AnalyticsService;
pub use auth::{normalize_username, validate_password, AuthenticationService};
pub use registration::{RegistrationRequest, RegistrationService, UserCriteria};
pub use risk::{RiskAnalysisService, RiskAssessment, RiskLevel, RiskProfile};
pub use transaction::{NetworkAnalysis, TransactionService};
