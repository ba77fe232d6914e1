use serde::{Deserialize, Serialize};

/// A course site the user is enrolled in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub site_type: Option<String>,
    #[serde(default)]
    pub props: Option<CourseProps>,
}

/// Site properties bag; the portal keeps the academic term in here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseProps {
    pub term: Option<String>,
}

impl Course {
    pub fn term(&self) -> Option<&str> {
        self.props.as_ref().and_then(|p| p.term.as_deref())
    }
}
