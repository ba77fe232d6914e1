use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An assignment posted to a course site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "entityId")]
    pub id: String,
    pub title: String,
    /// Owning course site id.
    pub context: String,
    pub instructions: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "dueTime")]
    pub due_time: Option<DueTime>,
    #[serde(rename = "allowResubmission", default)]
    pub allow_resubmission: bool,
    pub creator: Option<String>,
    #[serde(rename = "gradeScale")]
    pub grade_scale: Option<String>,
    #[serde(rename = "gradeScaleMaxPoints")]
    pub grade_scale_max_points: Option<String>,
}

/// The portal serves due dates as epoch millis plus a pre-formatted string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueTime {
    pub time: i64,
    #[serde(default)]
    pub display: Option<String>,
}

impl Assignment {
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        let due = self.due_time.as_ref()?;
        Utc.timestamp_millis_opt(due.time).single()
    }

    /// Prefer the portal's own display string; fall back to the timestamp.
    pub fn due_display(&self) -> Option<String> {
        if let Some(display) = self.due_time.as_ref().and_then(|d| d.display.clone()) {
            return Some(display);
        }
        self.due_date().map(|d| d.format("%Y-%m-%d %H:%M").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_portal_assignment_json() {
        let json = r#"{
            "entityId": "a1b2",
            "title": "Problem Set 3",
            "context": "site-42",
            "instructions": "<p>Show your work.</p>",
            "status": "OPEN",
            "dueTime": {"time": 1767225600000, "display": "Jan 1, 2026"},
            "allowResubmission": true,
            "creator": "prof",
            "gradeScale": "SCORE_GRADE_TYPE",
            "gradeScaleMaxPoints": "100"
        }"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.id, "a1b2");
        assert_eq!(assignment.context, "site-42");
        assert!(assignment.allow_resubmission);
        assert_eq!(assignment.due_display().as_deref(), Some("Jan 1, 2026"));
        assert_eq!(assignment.due_date().unwrap().timestamp_millis(), 1767225600000);
    }

    #[test]
    fn missing_due_time_is_tolerated() {
        let json = r#"{"entityId": "x", "title": "Survey", "context": "site-1"}"#;
        let assignment: Assignment = serde_json::from_str(json).unwrap();
        assert!(assignment.due_date().is_none());
        assert!(assignment.due_display().is_none());
        assert!(!assignment.allow_resubmission);
    }
}
