use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{PerformanceId, UserId};

/// Lifecycle status assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

/// A scheduled live performance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub id: PerformanceId,
    pub title: String,
    pub content: String,
    pub genre: String,
    pub band_name: String,
    pub venue: String,
    /// ISO date, possibly followed by a time component.
    pub performance_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: PerformanceStatus,
    pub user_id: UserId,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Performance {
    /// Calendar day of the performance, if the date is readable.
    pub fn date(&self) -> Option<NaiveDate> {
        let day = self.performance_date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// Server-side search filters. Blank fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_name: Option<String>,
}

impl SearchFilters {
    /// Query parameters for `GET /api/performances/search`.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        [
            ("keyword", &self.keyword),
            ("genre", &self.genre),
            ("bandName", &self.band_name),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (name, v.to_string()))
        })
        .collect()
    }

    /// True when no filter has a non-blank value.
    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }
}

/// Request body for `POST /api/performances`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerformanceRequest {
    pub title: String,
    pub content: String,
    pub genre: String,
    pub band_name: String,
    pub venue: String,
    pub performance_date: String,
    pub start_time: String,
    pub end_time: String,
}

/// Request body for `PUT /api/performances/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePerformanceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// A performance placed on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: PerformanceId,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub venue: String,
    pub genre: String,
    pub band_name: String,
    pub performance: Performance,
}

impl CalendarEvent {
    /// Returns `None` when the performance date cannot be read.
    pub fn from_performance(performance: &Performance) -> Option<Self> {
        Some(Self {
            id: performance.id,
            title: performance.title.clone(),
            date: performance.date()?,
            time: performance.start_time.clone(),
            venue: performance.venue.clone(),
            genre: performance.genre.clone(),
            band_name: performance.band_name.clone(),
            performance: performance.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_skips_blank_filters() {
        let filters = SearchFilters {
            keyword: Some("  jazz night ".to_string()),
            genre: Some("   ".to_string()),
            band_name: Some("The Quartet".to_string()),
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("keyword", "jazz night".to_string()),
                ("bandName", "The Quartet".to_string())
            ]
        );
        assert!(SearchFilters::default().is_empty());
    }

    #[test]
    fn performance_date_accepts_datetime_strings() {
        let performance: Performance = serde_json::from_value(serde_json::json!({
            "id": 3,
            "title": "Late Set",
            "content": "An evening of improvised music",
            "genre": "JAZZ",
            "bandName": "The Quartet",
            "venue": "Blue Room",
            "performanceDate": "2025-03-14T00:00:00",
            "startTime": "21:00",
            "endTime": "23:00",
            "status": "UPCOMING",
            "userId": 9
        }))
        .unwrap();
        assert_eq!(performance.date(), NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(performance.status, PerformanceStatus::Upcoming);

        let event = CalendarEvent::from_performance(&performance).unwrap();
        assert_eq!(event.time, "21:00");
    }
}
