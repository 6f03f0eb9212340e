//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation, with dynamic filtering.

use chrono::{DateTime, Utc};
use lqa_core::audit_detail::EscalationDetail;
use lqa_core::entities::AuditEntry;
use lqa_core::enums::{AuditAction, EntityType};
use lqa_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_string, now, parse_datetime, parse_enum, parse_optional_json,
    to_json_value,
};
use crate::service::LqaService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub actor_id: Option<String>,
    pub limit: Option<u32>,
}

impl LqaService {
    /// Append an audit entry. Called by every mutation method.
    ///
    /// Runs on the connection handed in so it can join the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(
        &self,
        conn: &libsql::Connection,
        entry: &AuditEntry,
    ) -> Result<(), DatabaseError> {
        conn.execute(
            "INSERT INTO audit_trail (id, actor_id, entity_type, entity_id, action, detail, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            libsql::params![
                entry.id.as_str(),
                entry.actor_id.as_deref(),
                entry.entity_type.as_str(),
                entry.entity_id.as_str(),
                entry.action.as_str(),
                entry.detail.as_ref().map(std::string::ToString::to_string),
                format_datetime(&entry.created_at)
            ],
        )
        .await?;
        Ok(())
    }

    /// Build and append an audit entry with a fresh ID.
    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn record_audit(
        &self,
        conn: &libsql::Connection,
        actor_id: Option<&str>,
        entity_type: EntityType,
        entity_id: &str,
        action: AuditAction,
        detail: Option<serde_json::Value>,
        at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let id = self.db().generate_id(PREFIX_AUDIT).await?;
        self.append_audit(
            conn,
            &AuditEntry {
                id,
                actor_id: actor_id.map(String::from),
                entity_type,
                entity_id: entity_id.to_string(),
                action,
                detail,
                created_at: at,
            },
        )
        .await
    }

    /// Record the escalation rules that fired for a freelancer in one check.
    ///
    /// All entries are written in a single transaction: either every event is
    /// recorded or none is.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any INSERT fails.
    pub async fn record_escalations(
        &self,
        actor_id: Option<&str>,
        freelancer_id: &str,
        details: &[EscalationDetail],
    ) -> Result<(), DatabaseError> {
        if details.is_empty() {
            return Ok(());
        }

        let at = now();
        let tx = self.db().conn().transaction().await?;
        for detail in details {
            self.record_audit(
                &tx,
                actor_id,
                EntityType::Freelancer,
                freelancer_id,
                AuditAction::EscalationRaised,
                Some(to_json_value(detail)?),
                at,
            )
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(ref actor) = filter.actor_id {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, actor_id, entity_type, entity_id, action, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next().await? {
            entries.push(AuditEntry {
                id: row.get::<String>(0)?,
                actor_id: get_opt_string(&row, 1)?,
                entity_type: parse_enum(&row.get::<String>(2)?)?,
                entity_id: row.get::<String>(3)?,
                action: parse_enum(&row.get::<String>(4)?)?,
                detail: parse_optional_json(get_opt_string(&row, 5)?.as_deref())?,
                created_at: parse_datetime(&row.get::<String>(6)?)?,
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn append_and_filter() {
        let svc = test_service().await;
        let at = now();

        for (i, action) in [AuditAction::Created, AuditAction::StatusChanged, AuditAction::StatusChanged]
            .into_iter()
            .enumerate()
        {
            svc.append_audit(
                svc.db().conn(),
                &AuditEntry {
                    id: format!("aud-{i:08x}"),
                    actor_id: Some("usr-00000001".into()),
                    entity_type: EntityType::Report,
                    entity_id: "rpt-00000001".into(),
                    action,
                    detail: None,
                    created_at: at,
                },
            )
            .await
            .unwrap();
        }

        let all = svc
            .query_audit(&AuditFilter {
                entity_id: Some("rpt-00000001".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let transitions = svc
            .query_audit(&AuditFilter {
                action: Some(AuditAction::StatusChanged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(transitions.len(), 2);

        let limited = svc
            .query_audit(&AuditFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn detail_roundtrips_as_json() {
        let svc = test_service().await;
        svc.record_audit(
            svc.db().conn(),
            None,
            EntityType::Settings,
            "qst-00000001",
            AuditAction::SettingsChanged,
            Some(serde_json::json!({"lqa_weight": 4.0})),
            now(),
        )
        .await
        .unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                entity_type: Some(EntityType::Settings),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].detail.as_ref().unwrap()["lqa_weight"], 4.0);
        assert!(entries[0].id.starts_with("aud-"));
    }

    #[tokio::test]
    async fn escalations_are_recorded_against_freelancer() {
        let svc = test_service().await;
        let warning = EscalationDetail {
            kind: "freelancer_warning".into(),
            scores: vec![62.33],
            threshold: 70.0,
        };
        let streak = EscalationDetail {
            kind: "consecutive_low_lqa".into(),
            scores: vec![60.0, 65.0, 62.0],
            threshold: 70.0,
        };
        svc.record_escalations(
            Some("usr-00000001"),
            "frl-00000001",
            &[warning.clone(), streak.clone()],
        )
        .await
        .unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                entity_type: Some(EntityType::Freelancer),
                action: Some(AuditAction::EscalationRaised),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.entity_id == "frl-00000001"));
        let mut stored: Vec<EscalationDetail> = entries
            .iter()
            .map(|e| serde_json::from_value(e.detail.clone().unwrap()).unwrap())
            .collect();
        stored.sort_by(|a, b| a.kind.cmp(&b.kind));
        assert_eq!(stored, vec![streak, warning]);
    }

    #[tokio::test]
    async fn no_escalations_records_nothing() {
        let svc = test_service().await;
        svc.record_escalations(None, "frl-00000001", &[]).await.unwrap();
        let entries = svc.query_audit(&AuditFilter::default()).await.unwrap();
        assert!(entries.is_empty());
    }
}
