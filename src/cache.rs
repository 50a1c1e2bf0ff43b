use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub daily: String,
    pub weekly: Option<String>,
    pub monthly: Option<String>,
}

impl Reading {
    pub fn daily_only(daily: impl Into<String>) -> Self {
        Self {
            daily: daily.into(),
            weekly: None,
            monthly: None,
        }
    }

    /// Labelled sections in display order, skipping empty ones.
    pub fn sections(&self) -> Vec<(&'static str, &str)> {
        let mut sections = vec![("Daily", self.daily.as_str())];
        if let Some(weekly) = self.weekly.as_deref() {
            sections.push(("Weekly", weekly));
        }
        if let Some(monthly) = self.monthly.as_deref() {
            sections.push(("Monthly", monthly));
        }
        sections.retain(|(_, text)| !text.trim().is_empty());
        sections
    }
}

/// The shared marker is good for the calendar day it was written on only.
pub fn is_fresh(last_fetched: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_fetched == Some(today)
}
