//! Job posting draft: the state behind the "post a job" form.

use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::models::NewJob;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "required_skills")]
    skills: Vec<String>,
}

impl JobDraft {
    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    /// Adds a trimmed skill tag. Blank input and exact duplicates are ignored.
    /// Returns whether the tag was added.
    pub fn add_skill(&mut self, input: &str) -> bool {
        let skill = input.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.skills.retain(|s| s != skill);
    }

    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.department.trim().is_empty()
            && !self.location.trim().is_empty()
            && !self.skills.is_empty()
    }

    /// Re-applies tag normalisation to skills that arrived as a JSON list.
    pub fn normalized(mut self) -> Self {
        let raw = std::mem::take(&mut self.skills);
        for skill in &raw {
            self.add_skill(skill);
        }
        self
    }

    pub fn submit(self) -> Result<NewJob, AppError> {
        if !self.is_submittable() {
            return Err(AppError::Validation(
                "Title, department, location and at least one skill are required".to_string(),
            ));
        }
        let description = self.description.trim();
        Ok(NewJob {
            title: self.title.trim().to_string(),
            department: self.department.trim().to_string(),
            location: self.location.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            required_skills: self.skills,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> JobDraft {
        JobDraft {
            title: "Backend Engineer".to_string(),
            department: "Engineering".to_string(),
            location: "Remote".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_skills_is_not_submittable() {
        let draft = filled();
        assert!(!draft.is_submittable());
        assert!(matches!(draft.submit(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_add_skill_trims_and_ignores_blank_and_duplicates() {
        let mut draft = filled();
        assert!(draft.add_skill("  Rust "));
        assert!(!draft.add_skill("Rust"));
        assert!(!draft.add_skill("   "));
        assert!(draft.add_skill("SQL"));
        assert_eq!(draft.skills(), ["Rust", "SQL"]);
    }

    #[test]
    fn test_remove_skill() {
        let mut draft = filled();
        draft.add_skill("Rust");
        draft.add_skill("Go");
        draft.remove_skill("Rust");
        assert_eq!(draft.skills(), ["Go"]);
    }

    #[test]
    fn test_blank_required_field_blocks_submit() {
        let mut draft = filled();
        draft.add_skill("Rust");
        draft.location = "  ".to_string();
        assert!(!draft.is_submittable());
    }

    #[test]
    fn test_submit_trims_and_drops_empty_description() {
        let mut draft = filled();
        draft.title = "  Backend Engineer ".to_string();
        draft.add_skill("Rust");
        let job = draft.submit().unwrap();
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.description, None);
        assert_eq!(job.required_skills, vec!["Rust"]);
    }

    #[test]
    fn test_normalized_cleans_json_skills() {
        let draft: JobDraft = serde_json::from_value(serde_json::json!({
            "title": "QA",
            "department": "Engineering",
            "location": "Remote",
            "required_skills": [" Selenium ", "", "Selenium", "Cypress"]
        }))
        .unwrap();
        let draft = draft.normalized();
        assert_eq!(draft.skills(), ["Selenium", "Cypress"]);
    }
}
