//! # solar-support
//!
//! Customer support core for the solar portal: ticket repository, status
//! workflow and the form validation shared by every submission page.
//!
//! ## Features
//!
//! - **Support Tickets** - Sequential `TKT-<year>-<NNNN>` tickets with categories, priorities and statuses
//! - **Status Workflow** - Start / complete / cancel / reopen actions per status
//! - **Dashboard Stats** - Per-status counts and tickets resolved today
//! - **Form Validation** - One validator for contact, ticket, partner and quote forms
//! - **GraphQL API** - Queries and mutations for the dashboards to mount
//! - **Repository Pattern** - Async trait with an in-memory implementation
//!
//! ## Usage
//!
//! ### In a Service
//!
//! ```rust,no_run
//! use solar_support::{InMemoryTicketRepository, SharedTicketRepository, SupportConfig};
//! use std::sync::Arc;
//!
//! let config = SupportConfig::default();
//! let repo: SharedTicketRepository = Arc::new(InMemoryTicketRepository::from_config(config));
//!
//! // Use in GraphQL schema
//! // Schema::build(SupportQueries, SupportMutations, EmptySubscription)
//! //     .data(repo)
//! //     .finish()
//! ```
//!
//! ### Validation
//!
//! ```rust
//! use solar_support::validation::{format_phone, is_valid_email};
//!
//! assert_eq!(format_phone("5551234567"), "555-123-4567");
//! assert!(is_valid_email("owner@example.com"));
//! ```

pub mod clock;
pub mod config;
pub mod graphql;
pub mod models;
pub mod repository;
pub mod seed;
pub mod validation;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::SupportConfig;
pub use graphql::{SupportMutations, SupportQueries};
pub use models::*;
pub use repository::{InMemoryTicketRepository, SharedTicketRepository, TicketRepository};
pub use validation::{Validate, ValidationErrors};

use thiserror::Error;

/// Support system errors
#[derive(Error, Debug)]
pub enum SupportError {
    #[error("Ticket not found: {0}")]
    TicketNotFound(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: TicketStatus, to: TicketStatus },

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SupportError>;
