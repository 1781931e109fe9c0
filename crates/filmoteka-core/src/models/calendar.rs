use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;

/// Which slice of the calendar is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarTab {
    #[default]
    Active,
    Archive,
}

impl CalendarTab {
    pub fn as_query_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archive => "archive",
        }
    }
}

impl FromStr for CalendarTab {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archive" => Ok(Self::Archive),
            other => Err(CoreError::UnknownView(other.to_string())),
        }
    }
}

impl std::fmt::Display for CalendarTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query_str())
    }
}

/// A scheduled viewing, as listed by the calendar endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedEvent {
    #[serde(rename = "id")]
    pub event_id: i64,
    /// Local film key.
    pub film: i64,
    #[serde(default)]
    pub film_tmdb_id: Option<u64>,
    pub film_title: String,
    pub planned_date: NaiveDate,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub note: Option<String>,
}

/// Body of a calendar event creation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPlannedEvent {
    pub film: i64,
    pub planned_date: NaiveDate,
    pub note: String,
}

impl NewPlannedEvent {
    /// Client-side check mirrored from the server model: no dates in the past.
    pub fn validate(&self, today: NaiveDate) -> Result<(), &'static str> {
        if self.planned_date < today {
            Err("Дата планируемого просмотра не может быть в прошлом")
        } else {
            Ok(())
        }
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}
