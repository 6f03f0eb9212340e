//! Quality report repository.
//!
//! Content edits go through `update_report`; status changes go through
//! `apply_report_transition`, which only succeeds when the stored row still
//! has the status and version the caller read.

use chrono::{DateTime, Utc};

use lqa_core::audit_detail::StatusChangedDetail;
use lqa_core::entities::{LqaErrorEntry, NewQualityReport, QualityReport};
use lqa_core::enums::{AuditAction, EntityType, ReportStatus};
use lqa_core::ids::PREFIX_REPORT;

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_f64, get_opt_string, now, parse_datetime, parse_enum,
    parse_optional_datetime, to_json_text, to_json_value,
};
use crate::service::LqaService;
use crate::updates::report::{ReportTransition, ReportUpdate};

const SELECT_COLS: &str = "id, freelancer_id, project_name, report_type, lqa_score, qs_score, \
    lqa_errors, status, reviewer_id, reviewer_comments, translator_comments, submission_date, \
    review_deadline, finalization_date, final_reviewer_comments, version, created_at, updated_at";

fn row_to_report(row: &libsql::Row) -> Result<QualityReport, DatabaseError> {
    let errors_json: String = row.get(6)?;
    let lqa_errors: Vec<LqaErrorEntry> = serde_json::from_str(&errors_json)
        .map_err(|e| DatabaseError::Query(format!("Invalid lqa_errors JSON: {e}")))?;

    Ok(QualityReport {
        id: row.get(0)?,
        freelancer_id: row.get(1)?,
        project_name: row.get(2)?,
        report_type: parse_enum(&row.get::<String>(3)?)?,
        lqa_score: get_opt_f64(row, 4)?,
        qs_score: get_opt_f64(row, 5)?,
        lqa_errors,
        status: parse_enum(&row.get::<String>(7)?)?,
        reviewer_id: get_opt_string(row, 8)?,
        reviewer_comments: get_opt_string(row, 9)?,
        translator_comments: get_opt_string(row, 10)?,
        submission_date: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
        review_deadline: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        finalization_date: parse_optional_datetime(get_opt_string(row, 13)?.as_deref())?,
        final_reviewer_comments: get_opt_string(row, 14)?,
        version: row.get(15)?,
        created_at: parse_datetime(&row.get::<String>(16)?)?,
        updated_at: parse_datetime(&row.get::<String>(17)?)?,
    })
}

/// Filter for `list_reports`. Empty fields match everything.
#[derive(Debug, Default, Clone)]
pub struct ReportFilter {
    pub freelancer_id: Option<String>,
    pub statuses: Vec<ReportStatus>,
    pub reviewer_id: Option<String>,
    pub limit: Option<u32>,
}

impl LqaService {
    /// Insert a new draft report.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the input fails validation,
    /// `DatabaseError::NoResult` if the freelancer does not exist, or
    /// `DatabaseError` if the insert fails.
    pub async fn create_report(
        &self,
        actor_id: Option<&str>,
        input: &NewQualityReport,
    ) -> Result<QualityReport, DatabaseError> {
        input
            .validate()
            .map_err(|e| DatabaseError::InvalidState(e.to_string()))?;
        self.get_freelancer(&input.freelancer_id).await?;

        let now = now();
        let ts = format_datetime(&now);
        let id = self.db().generate_id(PREFIX_REPORT).await?;

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT INTO quality_reports (id, freelancer_id, project_name, report_type,
                 lqa_score, qs_score, lqa_errors, status, reviewer_id, reviewer_comments,
                 version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11, ?12)",
            libsql::params![
                id.as_str(),
                input.freelancer_id.as_str(),
                input.project_name.as_str(),
                input.report_type.as_str(),
                input.lqa_score,
                input.qs_score,
                to_json_text(&input.lqa_errors)?,
                ReportStatus::Draft.as_str(),
                input.reviewer_id.as_deref(),
                input.reviewer_comments.as_deref(),
                ts.as_str(),
                ts.as_str()
            ],
        )
        .await?;
        self.record_audit(
            &tx,
            actor_id,
            EntityType::Report,
            &id,
            AuditAction::Created,
            Some(to_json_value(input)?),
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(report_id = %id, freelancer_id = %input.freelancer_id, "report created");
        self.get_report(&id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no report has this ID.
    pub async fn get_report(&self, id: &str) -> Result<QualityReport, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM quality_reports WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_report(&row)
    }

    /// Reports matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_reports(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<QualityReport>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref fid) = filter.freelancer_id {
            params.push(libsql::Value::Text(fid.clone()));
            conditions.push(format!("freelancer_id = ?{}", params.len()));
        }
        if !filter.statuses.is_empty() {
            let mut placeholders = Vec::with_capacity(filter.statuses.len());
            for status in &filter.statuses {
                params.push(libsql::Value::Text(status.as_str().to_string()));
                placeholders.push(format!("?{}", params.len()));
            }
            conditions.push(format!("status IN ({})", placeholders.join(", ")));
        }
        if let Some(ref rid) = filter.reviewer_id {
            params.push(libsql::Value::Text(rid.clone()));
            conditions.push(format!("reviewer_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM quality_reports {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut reports = Vec::new();
        while let Some(row) = rows.next().await? {
            reports.push(row_to_report(&row)?);
        }
        Ok(reports)
    }

    /// Every report of `freelancer_id` whose scores count towards aggregation.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_eligible_reports(
        &self,
        freelancer_id: &str,
    ) -> Result<Vec<QualityReport>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM quality_reports
                     WHERE freelancer_id = ?1 AND status IN (?2, ?3)
                     ORDER BY created_at DESC, rowid DESC"
                ),
                libsql::params![
                    freelancer_id,
                    ReportStatus::Finalized.as_str(),
                    ReportStatus::TranslatorAccepted.as_str()
                ],
            )
            .await?;
        let mut reports = Vec::new();
        while let Some(row) = rows.next().await? {
            reports.push(row_to_report(&row)?);
        }
        Ok(reports)
    }

    /// Reports still awaiting the translator whose deadline is at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_expired_reviews(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<QualityReport>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM quality_reports
                     WHERE status = ?1 AND review_deadline IS NOT NULL AND review_deadline <= ?2
                     ORDER BY review_deadline, rowid"
                ),
                libsql::params![
                    ReportStatus::PendingTranslatorReview.as_str(),
                    format_datetime(&now)
                ],
            )
            .await?;
        let mut reports = Vec::new();
        while let Some(row) = rows.next().await? {
            reports.push(row_to_report(&row)?);
        }
        Ok(reports)
    }

    /// Apply a content edit. Never changes status.
    ///
    /// Score fields are frozen once the report is finalized; the check is part
    /// of the UPDATE so it holds even against a concurrent finalization.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the report does not exist,
    /// `DatabaseError::InvalidState` if the edit touches scores of a finalized
    /// report, or `DatabaseError` if the update fails.
    pub async fn update_report(
        &self,
        actor_id: Option<&str>,
        id: &str,
        update: &ReportUpdate,
    ) -> Result<QualityReport, DatabaseError> {
        if update.is_empty() {
            return self.get_report(id).await;
        }

        let now = now();
        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref name) = update.project_name {
            params.push(libsql::Value::Text(name.clone()));
            sets.push(format!("project_name = ?{}", params.len()));
        }
        if let Some(lqa) = update.lqa_score {
            params.push(lqa.map_or(libsql::Value::Null, libsql::Value::Real));
            sets.push(format!("lqa_score = ?{}", params.len()));
        }
        if let Some(qs) = update.qs_score {
            params.push(qs.map_or(libsql::Value::Null, libsql::Value::Real));
            sets.push(format!("qs_score = ?{}", params.len()));
        }
        if let Some(ref errors) = update.lqa_errors {
            params.push(libsql::Value::Text(to_json_text(errors)?));
            sets.push(format!("lqa_errors = ?{}", params.len()));
        }
        if let Some(ref reviewer) = update.reviewer_id {
            params.push(reviewer.clone().map_or(libsql::Value::Null, libsql::Value::Text));
            sets.push(format!("reviewer_id = ?{}", params.len()));
        }
        if let Some(ref comments) = update.reviewer_comments {
            params.push(comments.clone().map_or(libsql::Value::Null, libsql::Value::Text));
            sets.push(format!("reviewer_comments = ?{}", params.len()));
        }

        params.push(libsql::Value::Text(format_datetime(&now)));
        sets.push(format!("updated_at = ?{}", params.len()));
        sets.push("version = version + 1".to_string());

        params.push(libsql::Value::Text(id.to_string()));
        let mut sql = format!(
            "UPDATE quality_reports SET {} WHERE id = ?{}",
            sets.join(", "),
            params.len()
        );
        if update.touches_scores() {
            params.push(libsql::Value::Text(ReportStatus::Finalized.as_str().to_string()));
            sql = format!("{sql} AND status <> ?{}", params.len());
        }

        let tx = self.db().conn().transaction().await?;
        let affected = tx.execute(&sql, libsql::params_from_iter(params)).await?;
        if affected == 0 {
            tx.rollback().await?;
            let existing = self.get_report(id).await?;
            return Err(DatabaseError::InvalidState(format!(
                "scores of report {id} cannot change once it is {}",
                existing.status
            )));
        }
        self.record_audit(
            &tx,
            actor_id,
            EntityType::Report,
            id,
            AuditAction::Updated,
            Some(to_json_value(update)?),
            now,
        )
        .await?;
        tx.commit().await?;

        self.get_report(id).await
    }

    /// Move a report from `transition.from` to `transition.to`.
    ///
    /// The UPDATE is conditioned on both the expected status and version, so
    /// at most one of several concurrent transitions on the same report wins.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the report does not exist,
    /// `DatabaseError::Conflict` if it changed since it was read, or
    /// `DatabaseError` if the update fails.
    pub async fn apply_report_transition(
        &self,
        actor_id: Option<&str>,
        id: &str,
        transition: &ReportTransition,
    ) -> Result<QualityReport, DatabaseError> {
        let now = now();
        let opt_ts = |dt: Option<DateTime<Utc>>| dt.map(|d| format_datetime(&d));

        let tx = self.db().conn().transaction().await?;
        let affected = tx
            .execute(
                "UPDATE quality_reports SET
                     status = ?1,
                     submission_date = COALESCE(?2, submission_date),
                     review_deadline = COALESCE(?3, review_deadline),
                     finalization_date = COALESCE(?4, finalization_date),
                     translator_comments = COALESCE(?5, translator_comments),
                     final_reviewer_comments = COALESCE(?6, final_reviewer_comments),
                     version = version + 1,
                     updated_at = ?7
                 WHERE id = ?8 AND status = ?9 AND version = ?10",
                libsql::params![
                    transition.to.as_str(),
                    opt_ts(transition.submission_date),
                    opt_ts(transition.review_deadline),
                    opt_ts(transition.finalization_date),
                    transition.translator_comments.as_deref(),
                    transition.final_reviewer_comments.as_deref(),
                    format_datetime(&now),
                    id,
                    transition.from.as_str(),
                    transition.expected_version
                ],
            )
            .await?;

        if affected == 0 {
            tx.rollback().await?;
            // Distinguish a missing report from a lost race.
            self.get_report(id).await?;
            tracing::warn!(
                report_id = %id,
                expected_status = %transition.from,
                expected_version = transition.expected_version,
                "report transition lost a concurrent update"
            );
            return Err(DatabaseError::Conflict {
                id: id.to_string(),
                expected_status: transition.from.to_string(),
                expected_version: transition.expected_version,
            });
        }

        let detail = StatusChangedDetail {
            from: transition.from.to_string(),
            to: transition.to.to_string(),
            action: transition.action.to_string(),
            reason: transition.reason().map(String::from),
        };
        self.record_audit(
            &tx,
            actor_id,
            EntityType::Report,
            id,
            AuditAction::StatusChanged,
            Some(to_json_value(&detail)?),
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            report_id = %id,
            from = %transition.from,
            to = %transition.to,
            action = %transition.action,
            "report status changed"
        );
        self.get_report(id).await
    }
}
