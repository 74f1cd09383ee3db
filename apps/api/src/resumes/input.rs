//! Request bodies for the resume library and the checks they must pass before
//! anything is written.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct ResumeInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub file_type: Option<String>,
    pub company_id: Option<Uuid>,
}

impl ResumeInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text(&self.title, "Title is required")?;
        require_text(&self.content, "Content is required")
    }
}

/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub file_type: Option<String>,
    pub company_id: Option<Uuid>,
}

impl ResumePatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            require_text(title, "Title is required")?;
        }
        if let Some(content) = &self.content {
            require_text(content, "Content is required")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisInput {
    pub resume_id: Uuid,
    #[serde(default)]
    pub skills: Vec<String>,
    pub sentiment: String,
    pub confidence: f64,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    pub overall_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub cultural_fit: f64,
}

impl AnalysisInput {
    pub fn validate(&self) -> Result<(), AppError> {
        check_range("confidence", self.confidence, 0.0, 1.0)?;
        check_range("overall_score", self.overall_score, 0.0, 100.0)?;
        check_range("cultural_fit", self.cultural_fit, 0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisPatch {
    pub skills: Option<Vec<String>>,
    pub sentiment: Option<String>,
    pub confidence: Option<f64>,
    pub key_phrases: Option<Vec<String>>,
    pub overall_score: Option<f64>,
    pub strengths: Option<Vec<String>>,
    pub improvements: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
    pub cultural_fit: Option<f64>,
}

impl AnalysisPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(v) = self.confidence {
            check_range("confidence", v, 0.0, 1.0)?;
        }
        if let Some(v) = self.overall_score {
            check_range("overall_score", v, 0.0, 100.0)?;
        }
        if let Some(v) = self.cultural_fit {
            check_range("cultural_fit", v, 0.0, 1.0)?;
        }
        Ok(())
    }
}

fn require_text(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}

/// Inclusive on both ends. NaN never passes.
fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), AppError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be between {min} and {max}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analysis(confidence: f64, overall_score: f64, cultural_fit: f64) -> AnalysisInput {
        let mut input: AnalysisInput = serde_json::from_value(json!({
            "resume_id": Uuid::nil(),
            "sentiment": "positive",
            "confidence": 0.5,
            "overall_score": 50.0,
            "cultural_fit": 0.5,
        }))
        .unwrap();
        input.confidence = confidence;
        input.overall_score = overall_score;
        input.cultural_fit = cultural_fit;
        input
    }

    #[test]
    fn test_resume_requires_title_and_content() {
        let input: ResumeInput = serde_json::from_value(json!({ "content": "text" })).unwrap();
        assert!(matches!(input.validate(), Err(AppError::Validation(ref m)) if m == "Title is required"));

        let input: ResumeInput =
            serde_json::from_value(json!({ "title": "CV", "content": "  " })).unwrap();
        assert!(matches!(input.validate(), Err(AppError::Validation(ref m)) if m == "Content is required"));
    }

    #[test]
    fn test_empty_patch_is_valid_but_blank_title_is_not() {
        assert!(ResumePatch::default().validate().is_ok());
        let patch = ResumePatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_analysis_range_bounds_are_inclusive() {
        assert!(analysis(0.0, 0.0, 0.0).validate().is_ok());
        assert!(analysis(1.0, 100.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_analysis_out_of_range_values_are_rejected() {
        let err = analysis(1.2, 50.0, 0.5).validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "confidence must be between 0 and 1"));
        assert!(analysis(0.5, 100.5, 0.5).validate().is_err());
        assert!(analysis(0.5, 50.0, -0.1).validate().is_err());
        assert!(analysis(f64::NAN, 50.0, 0.5).validate().is_err());
    }

    #[test]
    fn test_analysis_patch_checks_only_present_fields() {
        assert!(AnalysisPatch::default().validate().is_ok());
        let patch = AnalysisPatch {
            overall_score: Some(101.0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_analysis_lists_default_to_empty() {
        let input = analysis(0.5, 50.0, 0.5);
        assert!(input.skills.is_empty());
        assert!(input.recommendations.is_empty());
    }
}
