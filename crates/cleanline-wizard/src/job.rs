/*
[INPUT]:  Hourly rate, arrival/completion instants, task checklist
[OUTPUT]: Elapsed time, earned pay and completion percentage for a visit
[POS]:    Job domain - derived figures shown on the completion summary
[UPDATE]: When pay rules or summary contents change
*/

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::checklist::TaskChecklist;

/// A cleaner's visit to one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobVisit {
    pub job_id: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub hourly_rate: Decimal,
    pub arrived_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Figures for the completion screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub job_id: String,
    pub elapsed_minutes: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub earned: Decimal,
    pub percent_complete: u8,
}

impl JobVisit {
    pub fn new(job_id: impl Into<String>, hourly_rate: Decimal) -> Self {
        Self {
            job_id: job_id.into(),
            hourly_rate,
            arrived_at: None,
            completed_at: None,
        }
    }

    pub fn mark_arrived(&mut self, at: DateTime<Utc>) {
        self.arrived_at = Some(at);
        self.completed_at = None;
    }

    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.completed_at = Some(at);
    }

    /// Time on site, measured to `now` while the visit is still open
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        let Some(arrived) = self.arrived_at else {
            return Duration::zero();
        };
        let end = self.completed_at.unwrap_or(now);
        (end - arrived).max(Duration::zero())
    }

    /// Pay for `elapsed` at the hourly rate, rounded to cents
    pub fn pay_for(&self, elapsed: Duration) -> Decimal {
        let minutes = Decimal::from(elapsed.num_minutes().max(0));
        (self.hourly_rate * minutes / Decimal::from(60)).round_dp(2)
    }

    pub fn summary(&self, checklist: &TaskChecklist, now: DateTime<Utc>) -> JobSummary {
        let elapsed = self.elapsed(now);
        JobSummary {
            job_id: self.job_id.clone(),
            elapsed_minutes: elapsed.num_minutes(),
            earned: self.pay_for(elapsed),
            percent_complete: checklist.percent_complete(),
        }
    }
}

/// Render a duration as `1h 05m`
pub fn format_elapsed(elapsed: Duration) -> String {
    let minutes = elapsed.num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_elapsed_and_pay() {
        let mut visit = JobVisit::new("job-1", Decimal::from_str("24.50").unwrap());
        visit.mark_arrived(at(9, 0));
        visit.mark_completed(at(11, 30));

        let elapsed = visit.elapsed(at(18, 0));
        assert_eq!(elapsed.num_minutes(), 150);
        assert_eq!(visit.pay_for(elapsed), Decimal::from_str("61.25").unwrap());
        assert_eq!(format_elapsed(elapsed), "2h 30m");
    }

    #[test]
    fn test_open_visit_measures_to_now() {
        let mut visit = JobVisit::new("job-1", Decimal::from(30));
        visit.mark_arrived(at(9, 0));
        assert_eq!(visit.elapsed(at(9, 45)).num_minutes(), 45);
    }

    #[test]
    fn test_visit_without_arrival_is_zero() {
        let visit = JobVisit::new("job-1", Decimal::from(30));
        assert_eq!(visit.elapsed(at(12, 0)), Duration::zero());
        assert_eq!(visit.pay_for(Duration::zero()), Decimal::ZERO);
    }

    #[test]
    fn test_summary_includes_checklist_progress() {
        let mut checklist = TaskChecklist::from_descriptions(["A", "B", "C", "D"]);
        checklist.toggle(1).unwrap();
        let mut visit = JobVisit::new("job-9", Decimal::from(20));
        visit.mark_arrived(at(8, 0));

        let summary = visit.summary(&checklist, at(9, 0));
        assert_eq!(summary.elapsed_minutes, 60);
        assert_eq!(summary.earned, Decimal::from(20));
        assert_eq!(summary.percent_complete, 25);
    }
}
