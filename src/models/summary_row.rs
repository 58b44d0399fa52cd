use super::time_entry::TimeEntry;
use serde::Serialize;

/// Total time booked against one group key over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub entity: String,
    pub project: String,
    pub sub_project: String,
    pub period_start: String,
    pub period_end: String,
    pub total_duration: i64,
}

impl SummaryRow {
    /// Start a new group from its first entry. The group keeps this entry's
    /// spelling of entity, project and sub-project; later rows that differ
    /// only in case do not overwrite it.
    pub fn seed(entry: TimeEntry) -> Self {
        Self {
            entity: entry.entity,
            project: entry.project,
            sub_project: entry.sub_project,
            period_start: entry.date.clone(),
            period_end: entry.date,
            total_duration: entry.duration,
        }
    }

    pub fn accepts(&self, entry: &TimeEntry) -> bool {
        self.entity.eq_ignore_ascii_case(&entry.entity)
            && self.project.eq_ignore_ascii_case(&entry.project)
            && self.sub_project.eq_ignore_ascii_case(&entry.sub_project)
    }

    pub fn extend(&mut self, entry: TimeEntry) {
        self.period_end = entry.date;
        self.total_duration += entry.duration;
    }

    /// `start -- end`, as shown in the report.
    pub fn period(&self) -> String {
        format!("{} -- {}", self.period_start, self.period_end)
    }
}
