//! Sample tickets for demo mode and tests.
//!
//! Kept apart from the repository so production instances start empty unless
//! the composition root asks for demo data.

use chrono::{DateTime, Duration, Utc};

use crate::models::{Ticket, TicketCategory, TicketPriority, TicketStatus};

struct SampleTicket {
    subject: &'static str,
    category: TicketCategory,
    priority: TicketPriority,
    status: TicketStatus,
    /// Age of the ticket in hours
    opened_hours_ago: i64,
    /// Hours between creation and the last update
    updated_after_hours: i64,
    description: &'static str,
    customer_name: &'static str,
    customer_email: &'static str,
    customer_phone: Option<&'static str>,
    customer_company: Option<&'static str>,
    assigned_to: Option<&'static str>,
    resolution: Option<&'static str>,
    user_type: &'static str,
}

const SAMPLE_TICKETS: [SampleTicket; 10] = [
    SampleTicket {
        subject: "Inverter showing fault code E-21",
        category: TicketCategory::Hardware,
        priority: TicketPriority::High,
        status: TicketStatus::Resolved,
        opened_hours_ago: 240,
        updated_after_hours: 30,
        description: "Inverter display shows fault E-21 every afternoon and production drops to zero.",
        customer_name: "Maria Gonzalez",
        customer_email: "maria.gonzalez@example.com",
        customer_phone: Some("555-201-3344"),
        customer_company: None,
        assigned_to: Some("Field Service Team"),
        resolution: Some("Replaced faulty DC isolator; inverter back online."),
        user_type: "homeowner",
    },
    SampleTicket {
        subject: "SREC payment not received for Q2",
        category: TicketCategory::Financing,
        priority: TicketPriority::Medium,
        status: TicketStatus::Resolved,
        opened_hours_ago: 216,
        updated_after_hours: 48,
        description: "Our quarterly SREC payment has not arrived although generation was reported on time.",
        customer_name: "James Whitfield",
        customer_email: "j.whitfield@example.com",
        customer_phone: None,
        customer_company: None,
        assigned_to: Some("SREC Desk"),
        resolution: Some("Payment reissued after correcting the bank routing number."),
        user_type: "homeowner",
    },
    SampleTicket {
        subject: "Reschedule installation crew visit",
        category: TicketCategory::Installation,
        priority: TicketPriority::Low,
        status: TicketStatus::Cancelled,
        opened_hours_ago: 192,
        updated_after_hours: 20,
        description: "Need to move the installation date because the roof inspection was postponed.",
        customer_name: "Priya Natarajan",
        customer_email: "priya.n@example.com",
        customer_phone: Some("555-877-1290"),
        customer_company: None,
        assigned_to: None,
        resolution: Some("Cancelled: customer booked a new date through the portal"),
        user_type: "homeowner",
    },
    SampleTicket {
        subject: "Commission statement missing two installs",
        category: TicketCategory::Sales,
        priority: TicketPriority::Medium,
        status: TicketStatus::InProgress,
        opened_hours_ago: 168,
        updated_after_hours: 26,
        description: "March commission statement does not include the Bakersfield and Fresno installs.",
        customer_name: "Derek Holloway",
        customer_email: "derek@brightpathsolar.example",
        customer_phone: Some("555-430-9981"),
        customer_company: Some("BrightPath Solar"),
        assigned_to: Some("Partner Success"),
        resolution: None,
        user_type: "partner",
    },
    SampleTicket {
        subject: "Battery backup not switching during outage",
        category: TicketCategory::Hardware,
        priority: TicketPriority::Urgent,
        status: TicketStatus::InProgress,
        opened_hours_ago: 120,
        updated_after_hours: 4,
        description: "Home lost power for an hour yesterday and the battery never took over the critical loads panel.",
        customer_name: "Alan Cho",
        customer_email: "alan.cho@example.com",
        customer_phone: Some("555-660-2218"),
        customer_company: None,
        assigned_to: Some("Field Service Team"),
        resolution: None,
        user_type: "homeowner",
    },
    SampleTicket {
        subject: "Virtual Power Plant enrollment question",
        category: TicketCategory::General,
        priority: TicketPriority::Low,
        status: TicketStatus::Open,
        opened_hours_ago: 96,
        updated_after_hours: 0,
        description: "How does the VPP program compensate for battery dispatch events?",
        customer_name: "Grace Okafor",
        customer_email: "grace.okafor@example.com",
        customer_phone: None,
        customer_company: None,
        assigned_to: None,
        resolution: None,
        user_type: "homeowner",
    },
    SampleTicket {
        subject: "Loan documents need co-signer update",
        category: TicketCategory::Financing,
        priority: TicketPriority::High,
        status: TicketStatus::Open,
        opened_hours_ago: 72,
        updated_after_hours: 0,
        description: "Co-signer name is misspelled on the solar loan agreement and the lender rejected it.",
        customer_name: "Tom Becker",
        customer_email: "tbecker@example.com",
        customer_phone: Some("555-319-7745"),
        customer_company: None,
        assigned_to: None,
        resolution: None,
        user_type: "homeowner",
    },
    SampleTicket {
        subject: "Permit status for 12 pending projects",
        category: TicketCategory::Installation,
        priority: TicketPriority::Medium,
        status: TicketStatus::Open,
        opened_hours_ago: 48,
        updated_after_hours: 0,
        description: "Installation tracker shows permits pending for over 30 days on 12 projects in Kern County.",
        customer_name: "Lena Marsh",
        customer_email: "lena@sunridge-installs.example",
        customer_phone: Some("555-902-4410"),
        customer_company: Some("Sunridge Installs"),
        assigned_to: None,
        resolution: None,
        user_type: "partner",
    },
    SampleTicket {
        subject: "Request for commercial quote",
        category: TicketCategory::Sales,
        priority: TicketPriority::Medium,
        status: TicketStatus::Open,
        opened_hours_ago: 24,
        updated_after_hours: 0,
        description: "Warehouse roof of 40,000 sq ft, looking for a quote including battery storage.",
        customer_name: "Victor Ramos",
        customer_email: "vramos@ramoslogistics.example",
        customer_phone: Some("555-115-6623"),
        customer_company: Some("Ramos Logistics"),
        assigned_to: None,
        resolution: None,
        user_type: "business",
    },
    SampleTicket {
        subject: "Monitoring app shows no production data",
        category: TicketCategory::Hardware,
        priority: TicketPriority::Medium,
        status: TicketStatus::Open,
        opened_hours_ago: 6,
        updated_after_hours: 0,
        description: "The monitoring app has shown zero production since the router was replaced.",
        customer_name: "Sofia Lindqvist",
        customer_email: "sofia.l@example.com",
        customer_phone: None,
        customer_company: None,
        assigned_to: None,
        resolution: None,
        user_type: "homeowner",
    },
];

/// The ten demo tickets, ids `1..=10`, newest first, timestamped relative to `now`.
pub fn sample_tickets(now: DateTime<Utc>, year: i32) -> Vec<Ticket> {
    SAMPLE_TICKETS
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let id = index as u64 + 1;
            let created_at = now - Duration::hours(sample.opened_hours_ago);
            Ticket {
                id,
                ticket_number: Ticket::format_number(year, id),
                subject: sample.subject.to_string(),
                category: sample.category,
                priority: sample.priority,
                status: sample.status,
                created_at,
                updated_at: created_at + Duration::hours(sample.updated_after_hours),
                description: sample.description.to_string(),
                customer_name: sample.customer_name.to_string(),
                customer_email: sample.customer_email.to_string(),
                customer_phone: sample.customer_phone.map(str::to_string),
                customer_company: sample.customer_company.map(str::to_string),
                assigned_to: sample.assigned_to.map(str::to_string),
                resolution: sample.resolution.map(str::to_string),
                user_type: sample.user_type.to_string(),
            }
        })
        .rev()
        .collect()
}
