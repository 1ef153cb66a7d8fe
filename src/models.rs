use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SupportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: u64,
    pub ticket_number: String,
    pub subject: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_company: Option<String>,
    pub assigned_to: Option<String>,
    pub resolution: Option<String>,
    pub user_type: String,
}

impl Ticket {
    /// Display code shared by every ticket: `TKT-<year>-<sequence>`, sequence padded to 4 digits.
    pub fn format_number(year: i32, sequence: u64) -> String {
        format!("TKT-{}-{:04}", year, sequence)
    }

    /// Actions the ticket views offer for the current status
    pub fn available_actions(&self) -> &'static [TicketAction] {
        self.status.available_actions()
    }
}

#[derive(Debug, Clone, Copy, Enum, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    Hardware,
    Financing,
    Installation,
    Sales,
    General,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 5] = [
        TicketCategory::Hardware,
        TicketCategory::Financing,
        TicketCategory::Installation,
        TicketCategory::Sales,
        TicketCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketCategory::Hardware => "hardware",
            TicketCategory::Financing => "financing",
            TicketCategory::Installation => "installation",
            TicketCategory::Sales => "sales",
            TicketCategory::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketCategory::Hardware => "Hardware Issue",
            TicketCategory::Financing => "Financing Question",
            TicketCategory::Installation => "Installation Support",
            TicketCategory::Sales => "Sales Inquiry",
            TicketCategory::General => "General Question",
        }
    }
}

#[derive(Debug, Clone, Copy, Enum, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    pub const ALL: [TicketPriority; 4] = [
        TicketPriority::Low,
        TicketPriority::Medium,
        TicketPriority::High,
        TicketPriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
            TicketPriority::Urgent => "urgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketPriority::Low => "Low",
            TicketPriority::Medium => "Medium",
            TicketPriority::High => "High",
            TicketPriority::Urgent => "Urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, Enum, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Cancelled,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Cancelled => "Cancelled",
        }
    }

    /// Buttons offered by the ticket views for this status.
    pub fn available_actions(&self) -> &'static [TicketAction] {
        match self {
            TicketStatus::Open => &[TicketAction::Start, TicketAction::Cancel],
            TicketStatus::InProgress => &[TicketAction::Complete, TicketAction::Cancel],
            TicketStatus::Resolved | TicketStatus::Cancelled => &[TicketAction::Reopen],
        }
    }

    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        self.available_actions()
            .iter()
            .any(|action| action.target_status() == next)
    }
}

/// Named status changes exposed to end users
#[derive(Debug, Clone, Copy, Enum, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    Start,
    Complete,
    Cancel,
    Reopen,
}

impl TicketAction {
    pub fn target_status(&self) -> TicketStatus {
        match self {
            TicketAction::Start => TicketStatus::InProgress,
            TicketAction::Complete => TicketStatus::Resolved,
            TicketAction::Cancel => TicketStatus::Cancelled,
            TicketAction::Reopen => TicketStatus::Open,
        }
    }
}

macro_rules! wire_enum_traits {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = SupportError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| SupportError::InvalidInput(format!("unknown {}: {:?}", $what, s)))
            }
        }
    };
}

wire_enum_traits!(TicketCategory, "ticket category");
wire_enum_traits!(TicketPriority, "ticket priority");
wire_enum_traits!(TicketStatus, "ticket status");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total_open: u64,
    pub in_progress: u64,
    pub total_resolved: u64,
    pub cancelled: u64,
    pub resolved_today: u64,
    pub avg_response_time: String,
}

impl TicketStats {
    pub fn total(&self) -> u64 {
        self.total_open + self.in_progress + self.total_resolved + self.cancelled
    }
}

// Input types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketData {
    pub subject: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_company: Option<String>,
    pub user_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub category: Option<TicketCategory>,
    pub priority: Option<TicketPriority>,
    pub search: Option<String>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.status.is_some_and(|s| s != ticket.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != ticket.category) {
            return false;
        }
        if self.priority.is_some_and(|p| p != ticket.priority) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                [
                    &ticket.subject,
                    &ticket.ticket_number,
                    &ticket.customer_name,
                    &ticket.customer_email,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}
