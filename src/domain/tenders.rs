//! Tender postings and the applications submitted against them

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{
    clean_lines, require_text, update_text, Editable, HasStatus, Record, Repliable, ResourceKind,
    ReviewStatus, ValidationError,
};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

/// Tender status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TenderStatus {
    Published,
    #[default]
    Draft,
    Closed,
}

impl TenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
            Self::Closed => "closed",
        }
    }
}

/// Tender posting entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenderPosting {
    pub id: Uuid,
    pub reference_no: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub budget: Option<Decimal>,
    pub publish_date: NaiveDate,
    pub closing_date: NaiveDate,
    pub status: TenderStatus,
    /// Display-only application counter
    pub applications: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a tender
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTenderRequest {
    pub reference_no: String,
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
    pub closing_date: NaiveDate,
    #[serde(default)]
    pub status: TenderStatus,
}

/// Request DTO for updating a tender
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateTenderRequest {
    #[serde(default)]
    pub reference_no: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub budget: Option<Decimal>,
    #[serde(default)]
    pub publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
}

fn check_dates(publish: NaiveDate, closing: NaiveDate) -> Result<(), ValidationError> {
    if closing < publish {
        return Err(ValidationError::new(
            "closing_date",
            "must not be before the publish date",
        ));
    }
    Ok(())
}

fn check_budget(budget: Option<Decimal>) -> Result<(), ValidationError> {
    match budget {
        Some(b) if b.is_sign_negative() => {
            Err(ValidationError::new("budget", "must not be negative"))
        }
        _ => Ok(()),
    }
}

impl Record for TenderPosting {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Editable for TenderPosting {
    type Create = CreateTenderRequest;
    type Update = UpdateTenderRequest;

    fn create(input: CreateTenderRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let publish_date = input.publish_date.unwrap_or_else(|| now.date_naive());
        check_dates(publish_date, input.closing_date)?;
        check_budget(input.budget)?;

        Ok(Self {
            id: Uuid::new_v4(),
            reference_no: require_text("reference_no", &input.reference_no)?,
            title: require_text("title", &input.title)?,
            category: require_text("category", &input.category)?,
            description: require_text("description", &input.description)?,
            requirements: clean_lines(input.requirements),
            budget: input.budget,
            publish_date,
            closing_date: input.closing_date,
            status: input.status,
            applications: 0,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, input: UpdateTenderRequest) -> Result<(), ValidationError> {
        let mut next = self.clone();
        update_text("reference_no", &mut next.reference_no, input.reference_no)?;
        update_text("title", &mut next.title, input.title)?;
        update_text("category", &mut next.category, input.category)?;
        update_text("description", &mut next.description, input.description)?;
        if let Some(requirements) = input.requirements {
            next.requirements = clean_lines(requirements);
        }
        if input.budget.is_some() {
            check_budget(input.budget)?;
            next.budget = input.budget;
        }
        next.publish_date = input.publish_date.unwrap_or(next.publish_date);
        next.closing_date = input.closing_date.unwrap_or(next.closing_date);
        check_dates(next.publish_date, next.closing_date)?;
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

impl HasStatus for TenderPosting {
    type Status = TenderStatus;

    fn status(&self) -> TenderStatus {
        self.status
    }

    fn set_status(&mut self, status: TenderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

impl Listable for TenderPosting {
    const LABEL: &'static str = "tenders";
    const SEARCH_FIELDS: &'static [&'static str] = &["reference_no", "title", "category", "description"];
    const FILTER_FIELDS: &'static [&'static str] = &["status", "category"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "reference_no",
        "title",
        "category",
        "budget",
        "publish_date",
        "closing_date",
        "status",
        "applications",
    ];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("publish_date", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "reference_no" => Some(&self.reference_no),
            "title" => Some(&self.title),
            "category" => Some(&self.category),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "category" => Some(Cow::Borrowed(&self.category)),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "reference_no" => SortValue::text(&self.reference_no),
            "title" => SortValue::text(&self.title),
            "category" => SortValue::text(&self.category),
            "budget" => self.budget.map_or(SortValue::Missing, SortValue::Decimal),
            "publish_date" => SortValue::Date(self.publish_date),
            "closing_date" => SortValue::Date(self.closing_date),
            "status" => SortValue::text(self.status.as_str()),
            "applications" => SortValue::count(self.applications),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for TenderPosting {
    const KIND: ResourceKind = ResourceKind::Tender;
    const PATH: &'static str = "tenders";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.tenders
    }

    fn label(&self) -> String {
        format!("{} {}", self.reference_no, self.title)
    }
}

/// Application submitted by a supplier against a tender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenderApplication {
    pub id: Uuid,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub tender_reference: String,
    pub category: String,
    pub proposal: String,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
    pub replied_at: Option<DateTime<Utc>>,
    pub reply: Option<String>,
}

impl Record for TenderApplication {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasStatus for TenderApplication {
    type Status = ReviewStatus;

    fn status(&self) -> ReviewStatus {
        self.status
    }

    fn set_status(&mut self, status: ReviewStatus, _now: DateTime<Utc>) {
        self.status = status;
    }
}

impl Repliable for TenderApplication {
    fn reply_recipient(&self) -> (&str, &str) {
        (&self.contact_name, &self.email)
    }

    fn reply_subject(&self) -> String {
        format!("Your application for tender {}", self.tender_reference)
    }

    fn record_reply(&mut self, message: String, at: DateTime<Utc>) {
        self.reply = Some(message);
        self.replied_at = Some(at);
        if self.status == ReviewStatus::New {
            self.status = ReviewStatus::Reviewed;
        }
    }
}

impl Listable for TenderApplication {
    const LABEL: &'static str = "tender applications";
    const SEARCH_FIELDS: &'static [&'static str] =
        &["company_name", "contact_name", "email", "tender_reference", "proposal"];
    const FILTER_FIELDS: &'static [&'static str] = &["status", "category", "tender_reference"];
    const SORT_FIELDS: &'static [&'static str] = &[
        "company_name",
        "contact_name",
        "tender_reference",
        "category",
        "status",
        "submitted_at",
        "replied_at",
    ];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("submitted_at", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "company_name" => Some(&self.company_name),
            "contact_name" => Some(&self.contact_name),
            "email" => Some(&self.email),
            "tender_reference" => Some(&self.tender_reference),
            "proposal" => Some(&self.proposal),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "category" => Some(Cow::Borrowed(&self.category)),
            "tender_reference" => Some(Cow::Borrowed(&self.tender_reference)),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "company_name" => SortValue::text(&self.company_name),
            "contact_name" => SortValue::text(&self.contact_name),
            "tender_reference" => SortValue::text(&self.tender_reference),
            "category" => SortValue::text(&self.category),
            "status" => SortValue::text(self.status.as_str()),
            "submitted_at" => SortValue::Timestamp(self.submitted_at),
            "replied_at" => self.replied_at.into(),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for TenderApplication {
    const KIND: ResourceKind = ResourceKind::TenderApplication;
    const PATH: &'static str = "tender-applications";
    const ARCHIVABLE: bool = true;
    const REPLYABLE: bool = true;

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.tender_applications
    }

    fn label(&self) -> String {
        format!("{} ({})", self.company_name, self.tender_reference)
    }

    fn archive(&mut self) -> bool {
        let changed = self.status != ReviewStatus::Archived;
        self.status = ReviewStatus::Archived;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request() -> CreateTenderRequest {
        CreateTenderRequest {
            reference_no: "TND-2026-014".into(),
            title: "Conveyor belt replacement".into(),
            category: "Mechanical".into(),
            description: "Supply and install".into(),
            requirements: vec!["ISO 9001".into(), "  ".into()],
            budget: Some(Decimal::from_str("125000.00").unwrap()),
            publish_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            closing_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            status: TenderStatus::Published,
        }
    }

    #[test]
    fn create_drops_blank_requirements() {
        let tender = TenderPosting::create(request(), Utc::now()).unwrap();
        assert_eq!(tender.requirements, vec!["ISO 9001".to_string()]);
        assert_eq!(tender.applications, 0);
    }

    #[test]
    fn closing_before_publish_is_rejected() {
        let mut req = request();
        req.closing_date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let err = TenderPosting::create(req, Utc::now()).unwrap_err();
        assert_eq!(err.field, "closing_date");

        let mut tender = TenderPosting::create(request(), Utc::now()).unwrap();
        let err = tender
            .apply(UpdateTenderRequest {
                closing_date: NaiveDate::from_ymd_opt(2026, 1, 1),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.field, "closing_date");
        assert_eq!(tender.closing_date, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
    }

    #[test]
    fn negative_budget_is_rejected() {
        let mut req = request();
        req.budget = Some(Decimal::from_str("-1").unwrap());
        assert!(TenderPosting::create(req, Utc::now()).is_err());
    }

    #[test]
    fn budget_sorts_numerically() {
        let mut small = TenderPosting::create(request(), Utc::now()).unwrap();
        small.budget = Some(Decimal::from_str("9000").unwrap());
        let large = TenderPosting::create(request(), Utc::now()).unwrap();
        assert!(small.sort_value("budget") < large.sort_value("budget"));
    }

    #[test]
    fn reply_moves_new_application_to_reviewed() {
        let mut app = TenderApplication {
            id: Uuid::new_v4(),
            company_name: "Atacama Engineering".into(),
            contact_name: "Luis Soto".into(),
            email: "luis@example.com".into(),
            phone: None,
            tender_reference: "TND-2026-014".into(),
            category: "Mechanical".into(),
            proposal: "We propose...".into(),
            status: ReviewStatus::New,
            submitted_at: Utc::now(),
            replied_at: None,
            reply: None,
        };
        app.record_reply("Received".into(), Utc::now());
        assert_eq!(app.status, ReviewStatus::Reviewed);

        app.status = ReviewStatus::Approved;
        app.record_reply("Follow-up".into(), Utc::now());
        assert_eq!(app.status, ReviewStatus::Approved);
        assert!(app.archive());
        assert!(!app.archive());
    }
}
