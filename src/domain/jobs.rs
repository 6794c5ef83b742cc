//! Careers page job postings

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{
    clean_lines, require_text, update_text, Editable, HasStatus, Record, ResourceKind,
    ValidationError,
};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

/// Job posting status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    #[default]
    Draft,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Draft => "draft",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Contract => "contract",
            Self::Internship => "internship",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub description: String,
    pub requirements: Vec<String>,
    pub posted_date: NaiveDate,
    pub closing_date: Option<NaiveDate>,
    pub status: JobStatus,
    /// Display-only applicant counter
    pub applicants: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(default)]
    pub employment_type: EmploymentType,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: JobStatus,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateJobRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
}

impl Record for JobPosting {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Editable for JobPosting {
    type Create = CreateJobRequest;
    type Update = UpdateJobRequest;

    fn create(input: CreateJobRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let posted_date = now.date_naive();
        if input.closing_date.is_some_and(|d| d < posted_date) {
            return Err(ValidationError::new("closing_date", "must not be in the past"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title: require_text("title", &input.title)?,
            department: require_text("department", &input.department)?,
            location: require_text("location", &input.location)?,
            employment_type: input.employment_type,
            description: require_text("description", &input.description)?,
            requirements: clean_lines(input.requirements),
            posted_date,
            closing_date: input.closing_date,
            status: input.status,
            applicants: 0,
        })
    }

    fn apply(&mut self, input: UpdateJobRequest) -> Result<(), ValidationError> {
        let mut next = self.clone();
        update_text("title", &mut next.title, input.title)?;
        update_text("department", &mut next.department, input.department)?;
        update_text("location", &mut next.location, input.location)?;
        update_text("description", &mut next.description, input.description)?;
        if let Some(requirements) = input.requirements {
            next.requirements = clean_lines(requirements);
        }
        next.employment_type = input.employment_type.unwrap_or(next.employment_type);
        if let Some(closing) = input.closing_date {
            if closing < next.posted_date {
                return Err(ValidationError::new(
                    "closing_date",
                    "must not be before the posted date",
                ));
            }
            next.closing_date = Some(closing);
        }
        *self = next;
        Ok(())
    }
}

impl HasStatus for JobPosting {
    type Status = JobStatus;

    fn status(&self) -> JobStatus {
        self.status
    }

    fn set_status(&mut self, status: JobStatus, _now: DateTime<Utc>) {
        self.status = status;
    }
}

impl Listable for JobPosting {
    const LABEL: &'static str = "job postings";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "department", "location"];
    const FILTER_FIELDS: &'static [&'static str] = &["status", "department", "employment_type"];
    const SORT_FIELDS: &'static [&'static str] =
        &["title", "department", "location", "posted_date", "closing_date", "applicants"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("posted_date", SortDirection::Desc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "department" => Some(&self.department),
            "location" => Some(&self.location),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "department" => Some(Cow::Borrowed(&self.department)),
            "employment_type" => Some(Cow::Borrowed(self.employment_type.as_str())),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "title" => SortValue::text(&self.title),
            "department" => SortValue::text(&self.department),
            "location" => SortValue::text(&self.location),
            "posted_date" => SortValue::Date(self.posted_date),
            "closing_date" => self.closing_date.map_or(SortValue::Missing, SortValue::Date),
            "applicants" => SortValue::count(self.applicants),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for JobPosting {
    const KIND: ResourceKind = ResourceKind::Job;
    const PATH: &'static str = "jobs";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.jobs
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}
