//! Field validation shared by every submission form.
//!
//! A [`Validator`] walks the fields of a form, keeps the first failure per
//! field and hands back a [`ValidationErrors`] map the page shows inline next
//! to each input. Format rules ([`Rule::Email`], [`Rule::Phone`]) accept an
//! empty value so optional fields can use them; pair them with
//! [`Rule::Required`] when the field must be filled.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{CreateTicketData, TicketCategory, TicketPriority};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{3}-\d{4}$").expect("phone pattern compiles"));

/// `local@domain.tld`, no whitespace. Not a full RFC 5322 check.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Exactly `NNN-NNN-NNNN`
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Live phone formatter: keeps at most 10 digits and re-inserts the hyphens.
pub fn format_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(10).collect();

    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

/// Per-field error messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::default();
        errors.add(field, message.to_string());
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Records `message` unless the field already has an error
    fn add(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_insert(message);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Trimmed value must be non-empty
    Required,
    Email,
    Phone,
    /// Required only when the condition holds
    RequiredIf(bool),
}

impl Rule {
    /// Presence checks trim; format checks see the raw value
    fn check(&self, value: &str) -> bool {
        let blank = value.trim().is_empty();
        match self {
            Rule::Required => !blank,
            Rule::RequiredIf(condition) => !condition || !blank,
            Rule::Email => blank || is_valid_email(value),
            Rule::Phone => blank || is_valid_phone(value),
        }
    }

    fn message(&self, label: &str) -> String {
        match self {
            Rule::Required | Rule::RequiredIf(_) => format!("{} is required", label),
            Rule::Email => "Please enter a valid email address".to_string(),
            Rule::Phone => "Please enter a valid phone number (XXX-XXX-XXXX)".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `rules` in order and records the first one that fails
    pub fn field(&mut self, field: &str, label: &str, value: &str, rules: &[Rule]) -> &mut Self {
        if let Some(rule) = rules.iter().find(|rule| !rule.check(value)) {
            self.errors.add(field, rule.message(label));
        }
        self
    }

    /// Records `message` when `condition` is false
    pub fn ensure(&mut self, field: &str, condition: bool, message: &str) -> &mut Self {
        if !condition {
            self.errors.add(field, message.to_string());
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn is_partner(user_type: &str) -> bool {
    user_type.trim().eq_ignore_ascii_case("partner")
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// General contact page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub user_type: String,
    pub subject: String,
    pub message: String,
}

impl Validate for ContactForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("name", "Name", &self.name, &[Rule::Required])
            .field("email", "Email", &self.email, &[Rule::Required, Rule::Email])
            .field("user_type", "User type", &self.user_type, &[Rule::Required])
            .field(
                "company",
                "Company",
                &self.company,
                &[Rule::RequiredIf(is_partner(&self.user_type))],
            )
            .field("subject", "Subject", &self.subject, &[Rule::Required])
            .field("message", "Message", &self.message, &[Rule::Required]);
        v.finish()
    }
}

/// Support ticket submission page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupportTicketForm {
    pub subject: String,
    pub category: String,
    pub priority: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_company: String,
    pub user_type: String,
}

impl SupportTicketForm {
    /// Validate and convert into repository input; optional fields left blank become `None`.
    pub fn into_create_data(self) -> Result<CreateTicketData, ValidationErrors> {
        self.validate()?;

        let category = self
            .category
            .parse::<TicketCategory>()
            .map_err(|_| ValidationErrors::single("category", "Please select a valid category"))?;
        let priority = self
            .priority
            .parse::<TicketPriority>()
            .map_err(|_| ValidationErrors::single("priority", "Please select a valid priority"))?;

        Ok(CreateTicketData {
            subject: self.subject,
            category,
            priority,
            description: self.description,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: optional(self.customer_phone),
            customer_company: optional(self.customer_company),
            user_type: self.user_type,
        })
    }
}

impl Validate for SupportTicketForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("subject", "Subject", &self.subject, &[Rule::Required])
            .field("category", "Category", &self.category, &[Rule::Required])
            .field("priority", "Priority", &self.priority, &[Rule::Required])
            .field("description", "Description", &self.description, &[Rule::Required])
            .field("customer_name", "Name", &self.customer_name, &[Rule::Required])
            .field(
                "customer_email",
                "Email",
                &self.customer_email,
                &[Rule::Required, Rule::Email],
            )
            .field("user_type", "User type", &self.user_type, &[Rule::Required])
            .field(
                "customer_company",
                "Company",
                &self.customer_company,
                &[Rule::RequiredIf(is_partner(&self.user_type))],
            );

        if !self.category.trim().is_empty() {
            v.ensure(
                "category",
                self.category.parse::<TicketCategory>().is_ok(),
                "Please select a valid category",
            );
        }
        if !self.priority.trim().is_empty() {
            v.ensure(
                "priority",
                self.priority.parse::<TicketPriority>().is_ok(),
                "Please select a valid priority",
            );
        }

        v.finish()
    }
}

/// Installer / sales partner signup page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartnerSignupForm {
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub partner_type: String,
    pub message: String,
}

impl Validate for PartnerSignupForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("company_name", "Company name", &self.company_name, &[Rule::Required])
            .field("contact_name", "Contact name", &self.contact_name, &[Rule::Required])
            .field("email", "Email", &self.email, &[Rule::Required, Rule::Email])
            .field("phone", "Phone", &self.phone, &[Rule::Required])
            .field("partner_type", "Partner type", &self.partner_type, &[Rule::Required]);
        v.finish()
    }
}

/// Consultation quote request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub monthly_bill: String,
    pub notes: String,
}

impl QuoteForm {
    /// Keystroke handler for the phone input
    pub fn set_phone(&mut self, input: &str) {
        self.phone = format_phone(input);
    }
}

impl Validate for QuoteForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("name", "Name", &self.name, &[Rule::Required])
            .field("email", "Email", &self.email, &[Rule::Required, Rule::Email])
            .field("phone", "Phone", &self.phone, &[Rule::Required, Rule::Phone])
            .field("address", "Address", &self.address, &[Rule::Required])
            .field("monthly_bill", "Monthly bill", &self.monthly_bill, &[Rule::Required]);
        v.finish()
    }
}
