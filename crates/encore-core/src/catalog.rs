//! Client-side holder for fetched performances and the active search.

use chrono::NaiveDate;

use crate::models::{CalendarEvent, Performance, SearchFilters};

/// Performances fetched from the API plus the results of the last search.
///
/// Loading a fresh list resets the search results: results only appear once
/// a search has been run explicitly.
#[derive(Debug, Clone, Default)]
pub struct PerformanceCatalog {
    performances: Vec<Performance>,
    filtered: Vec<Performance>,
    search_filters: SearchFilters,
}

impl PerformanceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_performances(&mut self, performances: Vec<Performance>) {
        self.performances = performances;
        self.filtered.clear();
    }

    pub fn set_filtered(&mut self, performances: Vec<Performance>) {
        self.filtered = performances;
    }

    pub fn set_search_filters(&mut self, filters: SearchFilters) {
        self.search_filters = filters;
    }

    pub fn clear_filters(&mut self) {
        self.search_filters = SearchFilters::default();
        self.filtered.clear();
    }

    pub fn performances(&self) -> &[Performance] {
        &self.performances
    }

    pub fn filtered(&self) -> &[Performance] {
        &self.filtered
    }

    pub fn search_filters(&self) -> &SearchFilters {
        &self.search_filters
    }

    /// Filter the loaded performances without a round trip.
    ///
    /// The keyword matches title, description, band or venue; genre must
    /// match exactly; band name matches as a substring. All comparisons
    /// ignore case, and blank filters match everything.
    pub fn filter_local(&self, filters: &SearchFilters) -> Vec<Performance> {
        let keyword = normalized(&filters.keyword);
        let genre = normalized(&filters.genre);
        let band = normalized(&filters.band_name);

        self.performances
            .iter()
            .filter(|p| {
                keyword.as_ref().is_none_or(|k| {
                    [&p.title, &p.content, &p.band_name, &p.venue]
                        .iter()
                        .any(|field| field.to_lowercase().contains(k.as_str()))
                })
            })
            .filter(|p| genre.as_ref().is_none_or(|g| p.genre.to_lowercase() == *g))
            .filter(|p| {
                band.as_ref()
                    .is_none_or(|b| p.band_name.to_lowercase().contains(b.as_str()))
            })
            .cloned()
            .collect()
    }

    /// Search results as calendar entries, ordered by day then start time.
    /// Performances with unreadable dates are left out.
    pub fn calendar_events(&self) -> Vec<CalendarEvent> {
        let mut events: Vec<CalendarEvent> = self
            .filtered
            .iter()
            .filter_map(CalendarEvent::from_performance)
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        events
    }

    /// Calendar entries on a single day.
    pub fn events_on(&self, date: NaiveDate) -> Vec<CalendarEvent> {
        self.calendar_events()
            .into_iter()
            .filter(|e| e.date == date)
            .collect()
    }

    /// Up to `limit` search results dated strictly after `today`.
    pub fn upcoming(&self, today: NaiveDate, limit: usize) -> Vec<&Performance> {
        self.filtered
            .iter()
            .filter(|p| p.date().is_some_and(|d| d > today))
            .take(limit)
            .collect()
    }
}

fn normalized(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}
