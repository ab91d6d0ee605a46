//! Growth report over the owner's reflections.
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::Category;
use crate::constants::GROWTH_PRAISE_THRESHOLD;
use crate::numbers::percent;
use crate::reflection::{ReflectionLog, ReflectionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryStats {
    pub total: usize,
    pub completed: usize,
}

impl CategoryStats {
    #[must_use]
    pub fn rate_percent(&self) -> u32 {
        percent(self.completed, self.total)
    }
}

/// Monday-based week containing `day`, as an inclusive range.
#[must_use]
pub fn week_of(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let back = u64::from(day.weekday().num_days_from_monday());
    let start = day.checked_sub_days(Days::new(back)).unwrap_or(day);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
    (start, end)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthReport {
    pub total: usize,
    pub completed: usize,
    pub attempted: usize,
    pub categories: BTreeMap<Category, CategoryStats>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// Ids of owned entries dated this week, newest first.
    pub this_week: Vec<u64>,
}

impl GrowthReport {
    /// Summarize the entries the user owns, relative to `today`.
    #[must_use]
    pub fn build(log: &ReflectionLog, today: NaiveDate) -> Self {
        let (week_start, week_end) = week_of(today);
        let owned = log.owned();

        let mut categories: BTreeMap<Category, CategoryStats> = BTreeMap::new();
        let mut completed = 0;
        let mut attempted = 0;
        let mut this_week = Vec::new();

        for entry in &owned {
            let stats = categories.entry(entry.category).or_default();
            stats.total += 1;
            match entry.status {
                ReflectionStatus::Completed => {
                    completed += 1;
                    stats.completed += 1;
                }
                ReflectionStatus::Failed => attempted += 1,
                ReflectionStatus::InProgress => {}
            }
            if entry.date >= week_start && entry.date <= week_end {
                this_week.push(entry.id);
            }
        }

        Self {
            total: owned.len(),
            completed,
            attempted,
            categories,
            week_start,
            week_end,
            this_week,
        }
    }

    #[must_use]
    pub fn praise(&self) -> &'static str {
        if self.completed >= GROWTH_PRAISE_THRESHOLD {
            "Truly impressive!"
        } else {
            "You are making steady progress!"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::{NewReflection, Visibility};
    use Category::{Communication, Mindset, Relationships};
    use ReflectionStatus::{Completed, Failed};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn add(
        log: &mut ReflectionLog,
        day: NaiveDate,
        category: Category,
        status: ReflectionStatus,
        owner: bool,
    ) {
        log.record(NewReflection {
            title: "entry".into(),
            category,
            date: day,
            visibility: Visibility::Private,
            status,
            is_owner: owner,
            body: "text".into(),
        })
        .unwrap();
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-05-15 is a Wednesday
        assert_eq!(week_of(date(5, 15)), (date(5, 13), date(5, 19)));
        assert_eq!(week_of(date(5, 13)), (date(5, 13), date(5, 19)));
        assert_eq!(week_of(date(5, 19)), (date(5, 13), date(5, 19)));
    }

    #[test]
    fn counts_only_owned_entries() {
        let mut log = ReflectionLog::empty();
        add(&mut log, date(5, 14), Mindset, Completed, true);
        add(&mut log, date(5, 2), Mindset, Failed, true);
        add(&mut log, date(5, 15), Communication, Completed, true);
        add(&mut log, date(5, 15), Communication, Completed, false);

        let report = GrowthReport::build(&log, date(5, 16));
        assert_eq!(report.total, 3);
        assert_eq!(report.completed, 2);
        assert_eq!(report.attempted, 1);
        assert_eq!(report.categories[&Mindset].rate_percent(), 50);
        assert_eq!(report.categories[&Communication].total, 1);
        assert_eq!(report.this_week.len(), 2);
        assert_eq!(report.praise(), "You are making steady progress!");
    }

    #[test]
    fn praise_after_five_completions() {
        let mut log = ReflectionLog::empty();
        for d in 1..=5 {
            add(&mut log, date(6, d), Relationships, Completed, true);
        }
        let report = GrowthReport::build(&log, date(6, 5));
        assert_eq!(report.praise(), "Truly impressive!");
    }
}
