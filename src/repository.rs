use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::SupportConfig;
use crate::models::{
    CreateTicketData, Ticket, TicketAction, TicketFilter, TicketStats, TicketStatus,
};
use crate::{seed, Result, SupportError};

/// Repository handle shared by the dashboards, ticket list and submission forms
pub type SharedTicketRepository = Arc<dyn TicketRepository>;

/// Ticket storage seam.
///
/// Lookups and updates on an unknown id return `Ok(None)`; errors are
/// reserved for rejected status transitions.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Prepare the repository for queries. Safe to call more than once.
    async fn initialize(&self) -> Result<()>;

    /// All tickets, newest `created_at` first
    async fn list(&self) -> Result<Vec<Ticket>>;

    /// Tickets in the given status, in repository order
    async fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>>;

    /// Tickets matching every set field of the filter, in `list()` order
    async fn list_filtered(&self, filter: &TicketFilter) -> Result<Vec<Ticket>>;

    async fn get_by_id(&self, id: u64) -> Result<Option<Ticket>>;

    /// Create a new open ticket. Input is expected to be validated already.
    async fn create(&self, data: CreateTicketData) -> Result<Ticket>;

    /// Move a ticket to `status`.
    ///
    /// `resolution` overwrites the stored note when given (a blank note clears
    /// it); `None` keeps whatever note the ticket already carries.
    async fn update_status(
        &self,
        id: u64,
        status: TicketStatus,
        resolution: Option<String>,
    ) -> Result<Option<Ticket>>;

    async fn get_stats(&self) -> Result<TicketStats>;

    /// Up to `limit` tickets, most recently updated first
    async fn get_recent(&self, limit: usize) -> Result<Vec<Ticket>>;

    async fn len(&self) -> Result<usize>;

    async fn cancel(&self, id: u64, reason: &str) -> Result<Option<Ticket>> {
        self.update_status(id, TicketStatus::Cancelled, Some(format!("Cancelled: {}", reason)))
            .await
    }

    /// Apply one of the workflow buttons shown for a ticket
    async fn apply_action(
        &self,
        id: u64,
        action: TicketAction,
        note: Option<String>,
    ) -> Result<Option<Ticket>> {
        match action {
            TicketAction::Cancel => {
                let reason = note.unwrap_or_else(|| "No reason provided".to_string());
                self.cancel(id, &reason).await
            }
            _ => self.update_status(id, action.target_status(), note).await,
        }
    }
}

struct TicketState {
    /// Newest first
    tickets: Vec<Ticket>,
    next_id: u64,
}

/// Process-local ticket repository
pub struct InMemoryTicketRepository {
    state: RwLock<TicketState>,
    clock: Arc<dyn Clock>,
    config: SupportConfig,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self::with_clock(SupportConfig::default(), Arc::new(SystemClock))
    }

    /// Build from config, loading the sample tickets when `seed_demo_data` is set
    pub fn from_config(config: SupportConfig) -> Self {
        let seed_demo_data = config.seed_demo_data;
        let repo = Self::with_clock(config, Arc::new(SystemClock));

        if seed_demo_data {
            let tickets = seed::sample_tickets(repo.clock.now(), repo.config.ticket_year);
            repo.seeded(tickets)
        } else {
            repo
        }
    }

    pub fn with_clock(config: SupportConfig, clock: Arc<dyn Clock>) -> Self {
        let next_id = config.first_sequence.max(1);
        Self {
            state: RwLock::new(TicketState {
                tickets: Vec::new(),
                next_id,
            }),
            clock,
            config,
        }
    }

    /// Replace the stored tickets with `tickets`; numbering continues after the highest id.
    pub fn seeded(self, mut tickets: Vec<Ticket>) -> Self {
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        {
            let mut state = self.state.write();
            let highest = tickets.iter().map(|t| t.id).max().unwrap_or(0);
            state.next_id = state.next_id.max(highest + 1);
            state.tickets = tickets;
            tracing::info!(
                count = state.tickets.len(),
                next_id = state.next_id,
                "Seeded support tickets"
            );
        }
        self
    }

    /// Timestamp for a mutation of a ticket last touched at `previous`, always after it
    fn touch(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = self.clock.now();
        if now > previous {
            now
        } else {
            previous + Duration::milliseconds(1)
        }
    }
}

impl Default for InMemoryTicketRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.with_timezone(&Local).date_naive() == b.with_timezone(&Local).date_naive()
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn initialize(&self) -> Result<()> {
        tracing::debug!(count = self.state.read().tickets.len(), "Ticket repository ready");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        let mut tickets = self.state.read().tickets.clone();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tickets)
    }

    async fn list_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>> {
        let tickets: Vec<_> = self
            .state
            .read()
            .tickets
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        tracing::debug!(%status, count = tickets.len(), "Listed tickets by status");
        Ok(tickets)
    }

    async fn list_filtered(&self, filter: &TicketFilter) -> Result<Vec<Ticket>> {
        let tickets = self.list().await?;
        Ok(tickets.into_iter().filter(|t| filter.matches(t)).collect())
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Ticket>> {
        Ok(self.state.read().tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, data: CreateTicketData) -> Result<Ticket> {
        let now = self.clock.now();
        let mut state = self.state.write();

        let id = state.next_id;
        state.next_id += 1;

        let ticket = Ticket {
            id,
            ticket_number: Ticket::format_number(self.config.ticket_year, id),
            subject: data.subject,
            category: data.category,
            priority: data.priority,
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
            description: data.description,
            customer_name: data.customer_name,
            customer_email: data.customer_email,
            customer_phone: data.customer_phone,
            customer_company: data.customer_company,
            assigned_to: None,
            resolution: None,
            user_type: data.user_type,
        };

        state.tickets.insert(0, ticket.clone());
        tracing::info!(
            ticket_number = %ticket.ticket_number,
            category = %ticket.category,
            priority = %ticket.priority,
            "Created support ticket"
        );

        Ok(ticket)
    }

    async fn update_status(
        &self,
        id: u64,
        status: TicketStatus,
        resolution: Option<String>,
    ) -> Result<Option<Ticket>> {
        let mut state = self.state.write();

        let Some(ticket) = state.tickets.iter_mut().find(|t| t.id == id) else {
            tracing::warn!(id, %status, "Status update for unknown ticket");
            return Ok(None);
        };

        if self.config.enforce_transitions && !ticket.status.can_transition_to(status) {
            tracing::warn!(
                ticket_number = %ticket.ticket_number,
                from = %ticket.status,
                to = %status,
                "Rejected status transition"
            );
            return Err(SupportError::InvalidTransition {
                from: ticket.status,
                to: status,
            });
        }

        let previous = ticket.status;
        ticket.status = status;
        ticket.updated_at = self.touch(ticket.updated_at);

        if let Some(note) = resolution {
            ticket.resolution = if note.trim().is_empty() { None } else { Some(note) };
        }

        tracing::info!(
            ticket_number = %ticket.ticket_number,
            from = %previous,
            to = %status,
            "Updated ticket status"
        );

        Ok(Some(ticket.clone()))
    }

    async fn get_stats(&self) -> Result<TicketStats> {
        let today = self.clock.now();
        let state = self.state.read();

        let mut stats = TicketStats {
            total_open: 0,
            in_progress: 0,
            total_resolved: 0,
            cancelled: 0,
            resolved_today: 0,
            avg_response_time: self.config.avg_response_time.clone(),
        };

        for ticket in &state.tickets {
            match ticket.status {
                TicketStatus::Open => stats.total_open += 1,
                TicketStatus::InProgress => stats.in_progress += 1,
                TicketStatus::Resolved => {
                    stats.total_resolved += 1;
                    if same_local_day(ticket.updated_at, today) {
                        stats.resolved_today += 1;
                    }
                }
                TicketStatus::Cancelled => stats.cancelled += 1,
            }
        }

        tracing::debug!(?stats, "Computed ticket stats");
        Ok(stats)
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<Ticket>> {
        let mut tickets = self.state.read().tickets.clone();
        tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        tickets.truncate(limit);
        Ok(tickets)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.state.read().tickets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::{TicketCategory, TicketPriority};
    use tokio_test::{assert_err, assert_ok};

    fn ticket_data(subject: &str) -> CreateTicketData {
        CreateTicketData {
            subject: subject.to_string(),
            category: TicketCategory::Hardware,
            priority: TicketPriority::Medium,
            description: "Inverter shows a red fault light".to_string(),
            customer_name: "Dana Reyes".to_string(),
            customer_email: "dana@example.com".to_string(),
            customer_phone: None,
            customer_company: None,
            user_type: "homeowner".to_string(),
        }
    }

    fn manual_repo(config: SupportConfig) -> (InMemoryTicketRepository, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let repo = InMemoryTicketRepository::with_clock(config, clock.clone());
        (repo, clock)
    }

    fn seeded_repo() -> (InMemoryTicketRepository, Arc<ManualClock>) {
        let (repo, clock) = manual_repo(SupportConfig::default());
        let tickets = seed::sample_tickets(clock.now(), 2024);
        (repo.seeded(tickets), clock)
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let (repo, _) = seeded_repo();
        assert_ok!(repo.initialize().await);
        assert_ok!(repo.initialize().await);
        assert_eq!(repo.len().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_numbers() -> anyhow::Result<()> {
        let (repo, clock) = seeded_repo();

        let first = repo.create(ticket_data("Panel output dropped")).await?;
        clock.advance(Duration::seconds(1));
        let second = repo.create(ticket_data("Monitoring app offline")).await?;

        assert_eq!(first.id, 11);
        assert_eq!(first.ticket_number, "TKT-2024-0011");
        assert_eq!(second.id, 12);
        assert_eq!(second.ticket_number, "TKT-2024-0012");
        assert_eq!(first.status, TicketStatus::Open);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(first.resolution, None);
        assert_eq!(first.assigned_to, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_unseeded_repository_starts_at_first_sequence() -> anyhow::Result<()> {
        let (repo, _) = manual_repo(SupportConfig {
            ticket_year: 2025,
            first_sequence: 500,
            ..SupportConfig::default()
        });

        let ticket = repo.create(ticket_data("Quote follow-up")).await?;
        assert_eq!(ticket.ticket_number, "TKT-2025-0500");
        Ok(())
    }

    #[tokio::test]
    async fn test_created_ticket_is_newest_in_list() -> anyhow::Result<()> {
        let (repo, clock) = seeded_repo();
        clock.advance(Duration::minutes(1));

        let created = repo.create(ticket_data("Battery not charging")).await?;
        let tickets = repo.list().await?;

        assert_eq!(tickets.len(), 11);
        assert_eq!(tickets[0], created);
        assert!(tickets
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_a_snapshot() -> anyhow::Result<()> {
        let (repo, _) = seeded_repo();

        let mut first = repo.list().await?;
        first[0].subject = "changed by caller".to_string();
        first.clear();

        let second = repo.list().await?;
        let third = repo.list().await?;
        assert_eq!(second.len(), 10);
        assert_ne!(second[0].subject, "changed by caller");
        assert_eq!(second, third);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_by_status() -> anyhow::Result<()> {
        let (repo, _) = seeded_repo();

        let open = repo.list_by_status(TicketStatus::Open).await?;
        assert!(!open.is_empty());
        assert!(open.iter().all(|t| t.status == TicketStatus::Open));

        let total: usize = {
            let mut total = 0;
            for status in TicketStatus::ALL {
                total += repo.list_by_status(status).await?.len();
            }
            total
        };
        assert_eq!(total, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_by_id() -> anyhow::Result<()> {
        let (repo, _) = seeded_repo();

        let ticket = repo.get_by_id(3).await?.expect("seeded ticket");
        assert_eq!(ticket.ticket_number, "TKT-2024-0003");
        assert!(repo.get_by_id(999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_sets_resolution_and_bumps_updated_at() -> anyhow::Result<()> {
        let (repo, clock) = manual_repo(SupportConfig::default());
        let ticket = repo.create(ticket_data("Inverter fault")).await?;

        clock.advance(Duration::minutes(10));
        let resolved = repo
            .update_status(ticket.id, TicketStatus::Resolved, Some("fixed".to_string()))
            .await?
            .expect("ticket exists");

        assert_eq!(resolved.status, TicketStatus::Resolved);
        assert_eq!(resolved.resolution.as_deref(), Some("fixed"));
        assert!(resolved.updated_at > ticket.updated_at);
        assert_eq!(resolved.created_at, ticket.created_at);
        assert_eq!(resolved.ticket_number, ticket.ticket_number);
        Ok(())
    }

    #[tokio::test]
    async fn test_updated_at_moves_forward_when_clock_stands_still() -> anyhow::Result<()> {
        let (repo, _) = manual_repo(SupportConfig::default());
        let ticket = repo.create(ticket_data("Inverter fault")).await?;

        let started = repo
            .update_status(ticket.id, TicketStatus::InProgress, None)
            .await?
            .expect("ticket exists");
        assert!(started.updated_at > ticket.updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_ticket_leaves_collection_unchanged() -> anyhow::Result<()> {
        let (repo, _) = seeded_repo();
        let before = repo.list().await?;

        let result = repo
            .update_status(404, TicketStatus::Resolved, Some("n/a".to_string()))
            .await?;

        assert!(result.is_none());
        assert_eq!(repo.list().await?, before);
        assert!(repo.cancel(404, "duplicate").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_reopen_keeps_resolution_unless_cleared() -> anyhow::Result<()> {
        let (repo, _) = manual_repo(SupportConfig::default());
        let ticket = repo.create(ticket_data("SREC payment missing")).await?;

        repo.update_status(ticket.id, TicketStatus::Resolved, Some("Payment reissued".to_string()))
            .await?;
        let reopened = repo
            .update_status(ticket.id, TicketStatus::Open, None)
            .await?
            .expect("ticket exists");
        assert_eq!(reopened.resolution.as_deref(), Some("Payment reissued"));

        let cleared = repo
            .update_status(ticket.id, TicketStatus::Open, Some("  ".to_string()))
            .await?
            .expect("ticket exists");
        assert_eq!(cleared.resolution, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_cancel_prefixes_reason() -> anyhow::Result<()> {
        let (repo, _) = manual_repo(SupportConfig::default());
        let ticket = repo.create(ticket_data("Duplicate request")).await?;

        let cancelled = repo
            .cancel(ticket.id, "opened twice")
            .await?
            .expect("ticket exists");
        assert_eq!(cancelled.status, TicketStatus::Cancelled);
        assert_eq!(cancelled.resolution.as_deref(), Some("Cancelled: opened twice"));
        Ok(())
    }

    #[tokio::test]
    async fn test_repository_accepts_any_status_by_default() -> anyhow::Result<()> {
        let (repo, _) = manual_repo(SupportConfig::default());
        let ticket = repo.create(ticket_data("Quick fix")).await?;

        let resolved = repo
            .update_status(ticket.id, TicketStatus::Resolved, None)
            .await?
            .expect("ticket exists");
        assert_eq!(resolved.status, TicketStatus::Resolved);
        Ok(())
    }

    #[tokio::test]
    async fn test_enforced_workflow_rejects_illegal_transition() -> anyhow::Result<()> {
        let (repo, _) = manual_repo(SupportConfig {
            enforce_transitions: true,
            ..SupportConfig::default()
        });
        let ticket = repo.create(ticket_data("Roof leak after install")).await?;

        let err = assert_err!(
            repo.update_status(ticket.id, TicketStatus::Resolved, None).await
        );
        assert!(matches!(
            err,
            SupportError::InvalidTransition {
                from: TicketStatus::Open,
                to: TicketStatus::Resolved
            }
        ));

        let unchanged = repo.get_by_id(ticket.id).await?.expect("ticket exists");
        assert_eq!(unchanged, ticket);

        let started = repo
            .update_status(ticket.id, TicketStatus::InProgress, None)
            .await?;
        assert_eq!(started.map(|t| t.status), Some(TicketStatus::InProgress));
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_action_walks_workflow() -> anyhow::Result<()> {
        let (repo, _) = manual_repo(SupportConfig {
            enforce_transitions: true,
            ..SupportConfig::default()
        });
        let ticket = repo.create(ticket_data("Meter reading wrong")).await?;

        let started = repo.apply_action(ticket.id, TicketAction::Start, None).await?.unwrap();
        assert_eq!(started.status, TicketStatus::InProgress);

        let done = repo
            .apply_action(ticket.id, TicketAction::Complete, Some("Meter recalibrated".to_string()))
            .await?
            .unwrap();
        assert_eq!(done.status, TicketStatus::Resolved);
        assert_eq!(done.resolution.as_deref(), Some("Meter recalibrated"));

        let reopened = repo.apply_action(ticket.id, TicketAction::Reopen, None).await?.unwrap();
        assert_eq!(reopened.status, TicketStatus::Open);

        let cancelled = repo.apply_action(ticket.id, TicketAction::Cancel, None).await?.unwrap();
        assert_eq!(cancelled.resolution.as_deref(), Some("Cancelled: No reason provided"));
        Ok(())
    }

    #[tokio::test]
    async fn test_stats_count_resolved_today() -> anyhow::Result<()> {
        let (repo, _) = seeded_repo();
        let before = repo.get_stats().await?;
        assert_eq!(before.resolved_today, 0);

        let open = repo.list_by_status(TicketStatus::Open).await?;
        assert!(open.len() >= 2);
        for ticket in open.iter().take(2) {
            repo.update_status(ticket.id, TicketStatus::Resolved, Some("done".to_string()))
                .await?;
        }

        let stats = repo.get_stats().await?;
        assert_eq!(stats.resolved_today, 2);
        assert_eq!(stats.total_resolved, before.total_resolved + 2);
        assert_eq!(stats.total_open, before.total_open - 2);
        assert_eq!(stats.total() as usize, repo.len().await?);
        assert_eq!(stats.avg_response_time, "2.4 hours");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_recent_orders_by_updated_at() -> anyhow::Result<()> {
        let (repo, clock) = seeded_repo();
        clock.advance(Duration::minutes(1));

        repo.update_status(1, TicketStatus::InProgress, None).await?;
        let recent = repo.get_recent(3).await?;

        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, 1);
        assert!(recent
            .windows(2)
            .all(|pair| pair[0].updated_at >= pair[1].updated_at));
        assert_eq!(repo.get_recent(50).await?.len(), 10);
        assert!(repo.get_recent(0).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_filtered() -> anyhow::Result<()> {
        let (repo, _) = seeded_repo();
        let created = repo.create(ticket_data("Shading on east array")).await?;

        let by_search = repo
            .list_filtered(&TicketFilter {
                search: Some("EAST ARRAY".to_string()),
                ..TicketFilter::default()
            })
            .await?;
        assert_eq!(by_search, vec![created.clone()]);

        let by_number = repo
            .list_filtered(&TicketFilter {
                search: Some(created.ticket_number.clone()),
                status: Some(TicketStatus::Open),
                ..TicketFilter::default()
            })
            .await?;
        assert_eq!(by_number.len(), 1);

        let everything = repo.list_filtered(&TicketFilter::default()).await?;
        assert_eq!(everything, repo.list().await?);
        Ok(())
    }

    #[test]
    fn test_from_config_seeds_demo_data() {
        let repo = InMemoryTicketRepository::from_config(SupportConfig {
            seed_demo_data: true,
            ..SupportConfig::default()
        });
        assert_eq!(tokio_test::block_on(repo.len()).unwrap(), 10);

        let empty = InMemoryTicketRepository::from_config(SupportConfig::default());
        assert_eq!(tokio_test::block_on(empty.len()).unwrap(), 0);
    }
}
