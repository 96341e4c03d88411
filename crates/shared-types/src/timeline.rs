use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    Deadline,
    CourtDate,
    DocumentDate,
    PaymentDate,
    Generic,
}

/// One dated (or date-bearing but unparsed) event in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// None when the source text matched a date pattern but did not parse.
    pub event_date: Option<NaiveDate>,
    pub event_kind: TimelineEventKind,
    pub is_deadline: bool,
    pub is_court_date: bool,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub source_text: String,
}

impl TimelineEntry {
    /// Sort key: dated entries ascending, unparsed entries last.
    pub fn sort_key(&self) -> (bool, Option<NaiveDate>) {
        (self.event_date.is_none(), self.event_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: Option<NaiveDate>) -> TimelineEntry {
        TimelineEntry {
            event_date: date,
            event_kind: TimelineEventKind::Generic,
            is_deadline: false,
            is_court_date: false,
            confidence: 0.5,
            source_text: String::new(),
        }
    }

    #[test]
    fn unparsed_entries_sort_last() {
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 1);
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 15);
        let mut v = vec![entry(None), entry(d1), entry(d2)];
        v.sort_by_key(TimelineEntry::sort_key);
        assert_eq!(v[0].event_date, d2);
        assert_eq!(v[1].event_date, d1);
        assert_eq!(v[2].event_date, None);
    }
}
