use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    pub id: Option<i64>,      // ⇔ tempus.id (None until inserted)
    pub date: String,         // ⇔ tempus.date (TEXT "YYYY-MM-DD")
    pub entity: String,       // ⇔ tempus.entity (legacy "company")
    pub project: String,      // ⇔ tempus.project
    pub sub_project: String,  // ⇔ tempus.sub_project
    pub duration: i64,        // ⇔ tempus.duration (seconds)
    pub description: String,  // ⇔ tempus.description
}

impl TimeEntry {
    pub fn new(
        date: impl Into<String>,
        entity: impl Into<String>,
        project: impl Into<String>,
        sub_project: impl Into<String>,
        duration: i64,
    ) -> Self {
        Self {
            id: None,
            date: date.into(),
            entity: entity.into(),
            project: project.into(),
            sub_project: sub_project.into(),
            duration,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
