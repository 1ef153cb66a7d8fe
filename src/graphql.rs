//! GraphQL API for the support ticket repository
//!
//! Provides SupportQueries and SupportMutations that the portal's service
//! merges into its own schema.
//!
//! ## Usage in Services
//!
//! Services put a [`SharedTicketRepository`] in the GraphQL context. The
//! repository is built once by the composition root; resolvers never create
//! their own.

use async_graphql::{Context, ErrorExtensions, InputObject, Object, Result as GraphQLResult};

use crate::models::{Ticket, TicketAction, TicketFilter, TicketStats, TicketStatus};
use crate::repository::SharedTicketRepository;
use crate::validation::{SupportTicketForm, ValidationErrors};
use crate::SupportError;

/// Shown to end users when an update targets a ticket that is gone
pub const UPDATE_FAILED_MESSAGE: &str = "Unable to update ticket, please try again";

const DEFAULT_RECENT_LIMIT: i32 = 5;

#[derive(Debug, Clone, Default, InputObject)]
pub struct CreateTicketInput {
    pub subject: String,
    pub category: String,
    pub priority: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub customer_company: Option<String>,
    pub user_type: String,
}

impl From<CreateTicketInput> for SupportTicketForm {
    fn from(input: CreateTicketInput) -> Self {
        SupportTicketForm {
            subject: input.subject,
            category: input.category,
            priority: input.priority,
            description: input.description,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_phone: input.customer_phone.unwrap_or_default(),
            customer_company: input.customer_company.unwrap_or_default(),
            user_type: input.user_type,
        }
    }
}

fn validation_error(errors: ValidationErrors) -> async_graphql::Error {
    async_graphql::Error::new("Please correct the highlighted fields").extend_with(|_, e| {
        e.set("code", "VALIDATION_FAILED");
        for (field, message) in errors.iter() {
            e.set(field, message.to_string());
        }
    })
}

fn update_error(err: SupportError) -> async_graphql::Error {
    match err {
        SupportError::TicketNotFound(id) => {
            tracing::warn!(id, "Ticket update failed: not found");
            async_graphql::Error::new(UPDATE_FAILED_MESSAGE).extend_with(|_, e| e.set("code", "NOT_FOUND"))
        }
        SupportError::InvalidTransition { from, to } => {
            async_graphql::Error::new(format!("Cannot move ticket from {} to {}", from.label(), to.label()))
                .extend_with(|_, e| e.set("code", "INVALID_TRANSITION"))
        }
        other => async_graphql::Error::new(other.to_string()),
    }
}

fn found(id: u64, ticket: Option<Ticket>) -> GraphQLResult<Ticket> {
    ticket.ok_or_else(|| update_error(SupportError::TicketNotFound(id)))
}

pub struct SupportQueries;

#[Object(name = "Query", extends)]
impl SupportQueries {
    /// Get a single support ticket by ID
    async fn support_ticket(&self, ctx: &Context<'_>, id: u64) -> GraphQLResult<Option<Ticket>> {
        let repo = ctx.data::<SharedTicketRepository>()?;

        let ticket = repo.get_by_id(id).await?;
        Ok(ticket)
    }

    /// List support tickets, newest first, optionally filtered
    async fn support_tickets(
        &self,
        ctx: &Context<'_>,
        filter: Option<TicketFilter>,
    ) -> GraphQLResult<Vec<Ticket>> {
        let repo = ctx.data::<SharedTicketRepository>()?;

        let tickets = match filter {
            Some(filter) => repo.list_filtered(&filter).await?,
            None => repo.list().await?,
        };
        Ok(tickets)
    }

    /// Most recently updated tickets for the dashboard activity feed
    async fn recent_support_tickets(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
    ) -> GraphQLResult<Vec<Ticket>> {
        let repo = ctx.data::<SharedTicketRepository>()?;

        let limit = usize::try_from(limit.unwrap_or(DEFAULT_RECENT_LIMIT)).unwrap_or(0);
        let tickets = repo.get_recent(limit).await?;
        Ok(tickets)
    }

    /// Per-status counts for the support dashboard
    async fn support_ticket_stats(&self, ctx: &Context<'_>) -> GraphQLResult<TicketStats> {
        let repo = ctx.data::<SharedTicketRepository>()?;

        let stats = repo.get_stats().await?;
        Ok(stats)
    }
}

pub struct SupportMutations;

#[Object(name = "Mutation", extends)]
impl SupportMutations {
    /// Create a new support ticket from the submission form
    async fn create_support_ticket(
        &self,
        ctx: &Context<'_>,
        input: CreateTicketInput,
    ) -> GraphQLResult<Ticket> {
        let repo = ctx.data::<SharedTicketRepository>()?;

        let data = SupportTicketForm::from(input)
            .into_create_data()
            .map_err(validation_error)?;
        let ticket = repo.create(data).await?;
        Ok(ticket)
    }

    /// Set a ticket's status, optionally recording a resolution note
    async fn update_support_ticket_status(
        &self,
        ctx: &Context<'_>,
        id: u64,
        status: TicketStatus,
        resolution: Option<String>,
    ) -> GraphQLResult<Ticket> {
        let repo = ctx.data::<SharedTicketRepository>()?;

        let ticket = repo
            .update_status(id, status, resolution)
            .await
            .map_err(update_error)?;
        found(id, ticket)
    }

    /// Cancel a ticket, keeping the reason as its resolution
    async fn cancel_support_ticket(
        &self,
        ctx: &Context<'_>,
        id: u64,
        reason: String,
    ) -> GraphQLResult<Ticket> {
        let repo = ctx.data::<SharedTicketRepository>()?;

        let ticket = repo.cancel(id, &reason).await.map_err(update_error)?;
        found(id, ticket)
    }

    /// Apply a workflow button (start, complete, cancel, reopen)
    async fn apply_ticket_action(
        &self,
        ctx: &Context<'_>,
        id: u64,
        action: TicketAction,
        note: Option<String>,
    ) -> GraphQLResult<Ticket> {
        let repo = ctx.data::<SharedTicketRepository>()?;

        let ticket = repo
            .apply_action(id, action, note)
            .await
            .map_err(update_error)?;
        found(id, ticket)
    }
}
