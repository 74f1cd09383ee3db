use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{AnalysisRow, ResumeRow};
use crate::resumes::input::{AnalysisInput, AnalysisPatch, ResumeInput, ResumePatch};

const RESUME_NOT_FOUND: &str = "Resume not found";
const ANALYSIS_NOT_FOUND: &str = "Analysis not found";

#[derive(Debug, Clone, Serialize)]
pub struct ResumeWithAnalyses {
    #[serde(flatten)]
    pub resume: ResumeRow,
    pub analyses: Vec<AnalysisRow>,
}

/// An analysis together with the resume it belongs to, for company-wide views.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompanyAnalysisRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub analysis: AnalysisRow,
    pub resume_title: String,
}

async fn ensure_company_exists(pool: &PgPool, company_id: Uuid) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM companies WHERE id = $1)")
        .bind(company_id)
        .fetch_one(pool)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Company {company_id} does not exist")))
    }
}

pub async fn create_resume(
    pool: &PgPool,
    user_id: Uuid,
    input: &ResumeInput,
) -> Result<ResumeRow, AppError> {
    input.validate()?;
    if let Some(company_id) = input.company_id {
        ensure_company_exists(pool, company_id).await?;
    }

    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (user_id, title, content, file_type, company_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(input.title.trim())
    .bind(&input.content)
    .bind(&input.file_type)
    .bind(input.company_id)
    .fetch_one(pool)
    .await?;

    info!("Resume {} stored for user {user_id}", row.id);
    Ok(row)
}

pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeWithAnalyses>, AppError> {
    let resumes = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let ids: Vec<Uuid> = resumes.iter().map(|r| r.id).collect();
    let analyses = sqlx::query_as::<_, AnalysisRow>(
        r#"
        SELECT * FROM analyses
        WHERE user_id = $1 AND resume_id = ANY($2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(attach_analyses(resumes, analyses))
}

/// Groups analyses under their resume, keeping the order of both inputs.
fn attach_analyses(resumes: Vec<ResumeRow>, analyses: Vec<AnalysisRow>) -> Vec<ResumeWithAnalyses> {
    resumes
        .into_iter()
        .map(|resume| {
            let analyses = analyses
                .iter()
                .filter(|a| a.resume_id == resume.id)
                .cloned()
                .collect();
            ResumeWithAnalyses { resume, analyses }
        })
        .collect()
}

async fn find_resume(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(RESUME_NOT_FOUND.to_string()))
}

pub async fn get_resume(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<ResumeWithAnalyses, AppError> {
    let resume = find_resume(pool, user_id, id).await?;
    let analyses = list_analyses(pool, user_id, id).await?;
    Ok(ResumeWithAnalyses { resume, analyses })
}

pub async fn update_resume(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    patch: &ResumePatch,
) -> Result<ResumeRow, AppError> {
    patch.validate()?;
    if let Some(company_id) = patch.company_id {
        ensure_company_exists(pool, company_id).await?;
    }

    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET
            title      = COALESCE($3, title),
            content    = COALESCE($4, content),
            file_type  = COALESCE($5, file_type),
            company_id = COALESCE($6, company_id),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(patch.title.as_deref().map(str::trim))
    .bind(&patch.content)
    .bind(&patch.file_type)
    .bind(patch.company_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(RESUME_NOT_FOUND.to_string()))
}

/// Analyses of the resume go with it (`ON DELETE CASCADE`).
pub async fn delete_resume(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(RESUME_NOT_FOUND.to_string()));
    }
    info!("Resume {id} deleted by user {user_id}");
    Ok(())
}

pub async fn create_analysis(
    pool: &PgPool,
    user_id: Uuid,
    input: &AnalysisInput,
) -> Result<AnalysisRow, AppError> {
    input.validate()?;
    // the resume must belong to the caller
    find_resume(pool, user_id, input.resume_id).await?;

    let row = sqlx::query_as::<_, AnalysisRow>(
        r#"
        INSERT INTO analyses
            (resume_id, user_id, skills, sentiment, confidence, key_phrases,
             overall_score, strengths, improvements, recommendations, cultural_fit)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(input.resume_id)
    .bind(user_id)
    .bind(&input.skills)
    .bind(&input.sentiment)
    .bind(input.confidence)
    .bind(&input.key_phrases)
    .bind(input.overall_score)
    .bind(&input.strengths)
    .bind(&input.improvements)
    .bind(&input.recommendations)
    .bind(input.cultural_fit)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Newest first.
pub async fn list_analyses(
    pool: &PgPool,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<Vec<AnalysisRow>, AppError> {
    Ok(sqlx::query_as::<_, AnalysisRow>(
        r#"
        SELECT * FROM analyses
        WHERE resume_id = $1 AND user_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(resume_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_analysis(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<AnalysisRow, AppError> {
    sqlx::query_as::<_, AnalysisRow>("SELECT * FROM analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(ANALYSIS_NOT_FOUND.to_string()))
}

pub async fn update_analysis(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    patch: &AnalysisPatch,
) -> Result<AnalysisRow, AppError> {
    patch.validate()?;

    sqlx::query_as::<_, AnalysisRow>(
        r#"
        UPDATE analyses SET
            skills          = COALESCE($3, skills),
            sentiment       = COALESCE($4, sentiment),
            confidence      = COALESCE($5, confidence),
            key_phrases     = COALESCE($6, key_phrases),
            overall_score   = COALESCE($7, overall_score),
            strengths       = COALESCE($8, strengths),
            improvements    = COALESCE($9, improvements),
            recommendations = COALESCE($10, recommendations),
            cultural_fit    = COALESCE($11, cultural_fit)
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&patch.skills)
    .bind(&patch.sentiment)
    .bind(patch.confidence)
    .bind(&patch.key_phrases)
    .bind(patch.overall_score)
    .bind(&patch.strengths)
    .bind(&patch.improvements)
    .bind(&patch.recommendations)
    .bind(patch.cultural_fit)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(ANALYSIS_NOT_FOUND.to_string()))
}

pub async fn delete_analysis(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(ANALYSIS_NOT_FOUND.to_string()));
    }
    Ok(())
}

/// Every analysis of every resume filed under the company, regardless of owner.
/// Callers check the role.
pub async fn company_analyses(
    pool: &PgPool,
    company_id: Uuid,
) -> Result<Vec<CompanyAnalysisRow>, AppError> {
    Ok(sqlx::query_as::<_, CompanyAnalysisRow>(
        r#"
        SELECT a.*, r.title AS resume_title
        FROM analyses a
        JOIN resumes r ON r.id = a.resume_id
        WHERE r.company_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn resume(id: Uuid) -> ResumeRow {
        ResumeRow {
            id,
            user_id: Uuid::nil(),
            title: "CV".to_string(),
            content: "text".to_string(),
            file_type: None,
            company_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn analysis(resume_id: Uuid, score: f64) -> AnalysisRow {
        AnalysisRow {
            id: Uuid::new_v4(),
            resume_id,
            user_id: Uuid::nil(),
            skills: vec![],
            sentiment: "neutral".to_string(),
            confidence: 0.5,
            key_phrases: vec![],
            overall_score: score,
            strengths: vec![],
            improvements: vec![],
            recommendations: vec![],
            cultural_fit: 0.5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_attach_analyses_groups_by_resume() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let grouped = attach_analyses(
            vec![resume(a), resume(b)],
            vec![analysis(a, 90.0), analysis(b, 40.0), analysis(a, 70.0)],
        );

        assert_eq!(grouped.len(), 2);
        let scores: Vec<f64> = grouped[0].analyses.iter().map(|x| x.overall_score).collect();
        assert_eq!(scores, vec![90.0, 70.0]);
        assert_eq!(grouped[1].analyses.len(), 1);
    }

    #[test]
    fn test_resume_without_analyses_serializes_flat() {
        let grouped = attach_analyses(vec![resume(Uuid::nil())], vec![]);
        let json = serde_json::to_value(&grouped[0]).unwrap();
        assert_eq!(json["title"], "CV");
        assert_eq!(json["analyses"], serde_json::json!([]));
    }
}
