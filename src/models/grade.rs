use serde::{Deserialize, Serialize};

/// A gradebook entry for one assessed item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    #[serde(rename = "itemName")]
    pub item_name: String,
    /// Raw grade string as entered by the instructor; may be non-numeric.
    pub grade: Option<String>,
    pub points: Option<f64>,
}

impl Grade {
    /// Percentage score when both the grade and the max points parse cleanly.
    pub fn percentage(&self) -> Option<f64> {
        let earned: f64 = self.grade.as_deref()?.trim().parse().ok()?;
        let max = self.points?;
        if max > 0.0 {
            Some(earned / max * 100.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_from_numeric_grade() {
        let grade = Grade {
            item_name: "Midterm".to_string(),
            grade: Some("85".to_string()),
            points: Some(100.0),
        };
        assert_eq!(grade.percentage(), Some(85.0));
    }

    #[test]
    fn percentage_absent_for_letter_grades() {
        let grade = Grade {
            item_name: "Essay".to_string(),
            grade: Some("A-".to_string()),
            points: Some(10.0),
        };
        assert!(grade.percentage().is_none());
    }

    #[test]
    fn percentage_absent_for_zero_max() {
        let grade = Grade {
            item_name: "Extra credit".to_string(),
            grade: Some("3".to_string()),
            points: Some(0.0),
        };
        assert!(grade.percentage().is_none());
    }
}
