//! Upcoming deadlines tracked on the dashboard (tender closings, filings,
//! contract renewals)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::{clean_lines, require_text, update_text, Editable, Record, ResourceKind, ValidationError};
use crate::query::{Listable, SortDirection, SortValue};
use crate::store::{AdminStore, Collection, Resource};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    fn rank(&self) -> u64 {
        *self as u64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deadline {
    pub id: Uuid,
    pub title: String,
    /// e.g. "tender", "regulatory", "contract"
    pub deadline_type: String,
    pub due_date: NaiveDate,
    /// Days from today until `due_date`; negative once overdue
    #[serde(default)]
    pub days_left: i64,
    pub priority: Priority,
    pub details: Vec<String>,
}

impl Deadline {
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    pub fn is_due_within(&self, today: NaiveDate, days: i64) -> bool {
        (0..=days).contains(&self.days_until(today))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeadlineRequest {
    pub title: String,
    pub deadline_type: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateDeadlineRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub deadline_type: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub details: Option<Vec<String>>,
}

impl Record for Deadline {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Editable for Deadline {
    type Create = CreateDeadlineRequest;
    type Update = UpdateDeadlineRequest;

    fn create(input: CreateDeadlineRequest, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let mut deadline = Self {
            id: Uuid::new_v4(),
            title: require_text("title", &input.title)?,
            deadline_type: require_text("deadline_type", &input.deadline_type)?.to_lowercase(),
            due_date: input.due_date,
            days_left: 0,
            priority: input.priority,
            details: clean_lines(input.details),
        };
        deadline.refresh(now.date_naive());
        Ok(deadline)
    }

    fn apply(&mut self, input: UpdateDeadlineRequest) -> Result<(), ValidationError> {
        let mut next = self.clone();
        update_text("title", &mut next.title, input.title)?;
        if let Some(kind) = input.deadline_type {
            next.deadline_type = require_text("deadline_type", &kind)?.to_lowercase();
        }
        if let Some(details) = input.details {
            next.details = clean_lines(details);
        }
        next.due_date = input.due_date.unwrap_or(next.due_date);
        next.priority = input.priority.unwrap_or(next.priority);
        *self = next;
        Ok(())
    }
}

impl Listable for Deadline {
    const LABEL: &'static str = "deadlines";
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "deadline_type"];
    const FILTER_FIELDS: &'static [&'static str] = &["priority", "deadline_type"];
    const SORT_FIELDS: &'static [&'static str] = &["title", "due_date", "days_left", "priority"];
    const DEFAULT_SORT: (&'static str, SortDirection) = ("due_date", SortDirection::Asc);

    fn search_text(&self, field: &str) -> Option<&str> {
        match field {
            "title" => Some(&self.title),
            "deadline_type" => Some(&self.deadline_type),
            _ => None,
        }
    }

    fn filter_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "priority" => Some(Cow::Borrowed(self.priority.as_str())),
            "deadline_type" => Some(Cow::Borrowed(&self.deadline_type)),
            _ => None,
        }
    }

    fn sort_value(&self, field: &str) -> SortValue {
        match field {
            "title" => SortValue::text(&self.title),
            // days_left follows due_date; sorting on the date keeps it correct
            // even before a refresh
            "due_date" | "days_left" => SortValue::Date(self.due_date),
            "priority" => SortValue::count(self.priority.rank()),
            _ => SortValue::Missing,
        }
    }
}

impl Resource for Deadline {
    const KIND: ResourceKind = ResourceKind::Deadline;
    const PATH: &'static str = "deadlines";

    fn collection(store: &AdminStore) -> &Collection<Self> {
        &store.deadlines
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn refresh(&mut self, today: NaiveDate) {
        self.days_left = self.days_until(today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deadline(due: NaiveDate) -> Deadline {
        Deadline::create(
            CreateDeadlineRequest {
                title: "Environmental permit renewal".into(),
                deadline_type: "Regulatory".into(),
                due_date: due,
                priority: Priority::High,
                details: vec!["File with ministry".into(), " ".into()],
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn days_left_follows_the_calendar() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut d = deadline(NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
        d.refresh(today);
        assert_eq!(d.days_left, 7);
        assert!(d.is_due_within(today, 7));

        d.refresh(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(d.days_left, -2);
        assert!(!d.is_due_within(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(), 7));
    }

    #[test]
    fn create_normalises_fields() {
        let d = deadline(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert_eq!(d.deadline_type, "regulatory");
        assert_eq!(d.details, vec!["File with ministry".to_string()]);
        assert!(d.days_left > 0);
    }

    #[test]
    fn priority_sorts_by_severity() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::Low < Priority::Medium);
    }
}
