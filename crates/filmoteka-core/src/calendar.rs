//! Calendar listing helpers: date grouping, relative labels, pagination.

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use url::Url;

use crate::models::PlannedEvent;

/// Server page size for calendar listings.
pub const PAGE_SIZE: u32 = 12;

/// Russian month names in the genitive case ("5 января").
const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Events sharing one planned date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub date: NaiveDate,
    pub events: Vec<PlannedEvent>,
}

/// Group events by planned date.
///
/// Groups appear in order of their first event and events keep their
/// relative order, so the server's ordering survives untouched.
pub fn group_by_date(events: Vec<PlannedEvent>) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    for event in events {
        match groups.iter_mut().find(|g| g.date == event.planned_date) {
            Some(group) => group.events.push(event),
            None => groups.push(DateGroup {
                date: event.planned_date,
                events: vec![event],
            }),
        }
    }
    groups
}

/// Human label for a group heading, relative to `today`.
pub fn format_date(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Сегодня".to_string(),
        1 => "Завтра".to_string(),
        _ => format!("{} {}", date.day(), MONTHS_GENITIVE[date.month0() as usize]),
    }
}

/// [`format_date`] against the local system clock.
pub fn format_date_local(date: NaiveDate) -> String {
    format_date(date, Local::now().date_naive())
}

/// Position within a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    /// Derive the current page from the `next`/`previous` links of a page.
    ///
    /// The first page's `previous` link carries no `page` parameter, so a bare
    /// `previous` means we are on page 2.
    pub fn from_links(count: u64, next: Option<&str>, previous: Option<&str>, page_size: u32) -> Self {
        let current_page = if let Some(n) = next.and_then(page_param) {
            n.saturating_sub(1).max(1)
        } else if let Some(prev) = previous {
            page_param(prev).map_or(2, |p| p.saturating_add(1))
        } else {
            1
        };

        let page_size = u64::from(page_size.max(1));
        let total_pages = count.div_ceil(page_size).max(1);
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);

        Self {
            current_page,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

fn page_param(link: &str) -> Option<u32> {
    let url = Url::parse(link)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(link)))
        .ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: i64, planned: NaiveDate) -> PlannedEvent {
        PlannedEvent {
            event_id: id,
            film: id,
            film_tmdb_id: Some(id as u64 + 1000),
            film_title: format!("Film {id}"),
            planned_date: planned,
            note: None,
        }
    }

    #[test]
    fn test_group_by_date_is_stable() {
        let events = vec![
            event(1, date(2024, 1, 1)),
            event(2, date(2024, 1, 2)),
            event(3, date(2024, 1, 1)),
        ];
        let groups = group_by_date(events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, date(2024, 1, 1));
        let ids: Vec<i64> = groups[0].events.iter().map(|e| e.event_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(groups[1].events.len(), 1);
    }

    #[test]
    fn test_group_by_date_empty() {
        assert!(group_by_date(Vec::new()).is_empty());
    }

    #[test]
    fn test_format_date_relative_labels() {
        let today = date(2024, 3, 14);
        assert_eq!(format_date(today, today), "Сегодня");
        assert_eq!(format_date(date(2024, 3, 15), today), "Завтра");
        assert_eq!(format_date(date(2024, 3, 13), today), "13 марта");
        assert_eq!(format_date(date(2025, 1, 5), today), "5 января");
    }

    #[test]
    fn test_format_date_tomorrow_across_year_end() {
        assert_eq!(format_date(date(2025, 1, 1), date(2024, 12, 31)), "Завтра");
    }

    #[test]
    fn test_format_date_local_today() {
        assert_eq!(format_date_local(Local::now().date_naive()), "Сегодня");
    }

    #[test]
    fn test_pagination_from_next_link() {
        let p = Pagination::from_links(
            30,
            Some("http://localhost:8000/api/calendar_events/?page=2&view=active"),
            None,
            PAGE_SIZE,
        );
        assert_eq!(p, Pagination { current_page: 1, total_pages: 3 });
        assert!(p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn test_pagination_from_previous_link() {
        let bare = Pagination::from_links(30, None, Some("/api/calendar_events/?view=active"), PAGE_SIZE);
        assert_eq!(bare.current_page, 2);

        let last = Pagination::from_links(30, None, Some("/api/calendar_events/?page=2"), PAGE_SIZE);
        assert_eq!(last.current_page, 3);
        assert!(!last.has_next());

        let huge = Pagination::from_links(10, None, Some("/api/calendar_events/?page=4294967295"), PAGE_SIZE);
        assert_eq!(huge.current_page, u32::MAX);
    }

    #[test]
    fn test_pagination_single_page() {
        let p = Pagination::from_links(0, None, None, PAGE_SIZE);
        assert_eq!(p, Pagination { current_page: 1, total_pages: 1 });
        let p = Pagination::from_links(12, None, None, PAGE_SIZE);
        assert_eq!(p.total_pages, 1);
        let p = Pagination::from_links(13, Some("?page=2"), None, PAGE_SIZE);
        assert_eq!(p.total_pages, 2);
    }
}
