//! Quality settings repository.
//!
//! Settings are append-only: saving a new record deactivates the previous
//! one, so the history stays queryable.

use lqa_core::audit_detail::SettingsChangedDetail;
use lqa_core::entities::{QualitySettings, SettingsRecord};
use lqa_core::enums::{AuditAction, EntityType};
use lqa_core::ids::PREFIX_SETTINGS;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_f64, get_opt_string, now, parse_datetime, to_json_value};
use crate::service::LqaService;

const SELECT_COLS: &str = "id, dispute_period_days, probation_threshold, lqa_weight, \
    qs_multiplier, is_active, created_by, created_at";

fn row_to_settings(row: &libsql::Row) -> Result<SettingsRecord, DatabaseError> {
    let days: i64 = row.get(1)?;
    Ok(SettingsRecord {
        id: row.get(0)?,
        settings: QualitySettings {
            dispute_period_days: u32::try_from(days).map_err(|_| {
                DatabaseError::Query(format!("dispute_period_days out of range: {days}"))
            })?,
            probation_threshold: get_f64(row, 2)?,
            lqa_weight: get_f64(row, 3)?,
            qs_multiplier: get_f64(row, 4)?,
        },
        is_active: row.get::<i64>(5)? != 0,
        created_by: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl LqaService {
    /// The currently active settings record, if one has been saved.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_active_settings(&self) -> Result<Option<SettingsRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM quality_settings WHERE is_active = 1"),
                (),
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_settings(&row)?)),
            None => Ok(None),
        }
    }

    /// Save `settings` as the new active record.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the values are out of range, or
    /// `DatabaseError` if the write fails.
    pub async fn set_active_settings(
        &self,
        actor_id: Option<&str>,
        settings: QualitySettings,
    ) -> Result<SettingsRecord, DatabaseError> {
        settings
            .validate()
            .map_err(|e| DatabaseError::InvalidState(e.to_string()))?;

        let previous = self.get_active_settings().await?;
        let now = now();
        let id = self.db().generate_id(PREFIX_SETTINGS).await?;
        let record = SettingsRecord {
            id: id.clone(),
            settings,
            is_active: true,
            created_by: actor_id.map(String::from),
            created_at: now,
        };

        let tx = self.db().conn().transaction().await?;
        tx.execute("UPDATE quality_settings SET is_active = 0 WHERE is_active = 1", ())
            .await?;
        tx.execute(
            "INSERT INTO quality_settings (id, dispute_period_days, probation_threshold,
                 lqa_weight, qs_multiplier, is_active, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
            libsql::params![
                id.as_str(),
                i64::from(settings.dispute_period_days),
                settings.probation_threshold,
                settings.lqa_weight,
                settings.qs_multiplier,
                actor_id,
                format_datetime(&now)
            ],
        )
        .await?;

        let detail = SettingsChangedDetail {
            previous_id: previous.map(|p| p.id),
            dispute_period_days: settings.dispute_period_days,
            probation_threshold: settings.probation_threshold,
            lqa_weight: settings.lqa_weight,
            qs_multiplier: settings.qs_multiplier,
        };
        self.record_audit(
            &tx,
            actor_id,
            EntityType::Settings,
            &id,
            AuditAction::SettingsChanged,
            Some(to_json_value(&detail)?),
            now,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(settings_id = %id, "quality settings updated");
        Ok(record)
    }

    /// Settings records, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_settings_history(
        &self,
        limit: u32,
    ) -> Result<Vec<SettingsRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM quality_settings
                     ORDER BY created_at DESC, rowid DESC LIMIT ?1"
                ),
                [i64::from(limit)],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_settings(&row)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn no_active_settings_on_fresh_db() {
        let svc = test_service().await;
        assert!(svc.get_active_settings().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saving_replaces_active_record() {
        let svc = test_service().await;
        let first = svc
            .set_active_settings(Some("usr-admin"), QualitySettings::default())
            .await
            .unwrap();
        let second = svc
            .set_active_settings(
                Some("usr-admin"),
                QualitySettings {
                    probation_threshold: 75.0,
                    ..QualitySettings::default()
                },
            )
            .await
            .unwrap();

        let active = svc.get_active_settings().await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
        assert!((active.settings.probation_threshold - 75.0).abs() < f64::EPSILON);

        let history = svc.list_settings_history(10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert!(!history[1].is_active);
        assert_eq!(history[1].id, first.id);

        let audit = svc
            .query_audit(&AuditFilter {
                entity_id: Some(second.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AuditAction::SettingsChanged);
        let detail = audit[0].detail.as_ref().unwrap();
        assert_eq!(detail["previous_id"], first.id.as_str());
    }

    #[tokio::test]
    async fn rejects_invalid_settings() {
        let svc = test_service().await;
        let result = svc
            .set_active_settings(
                None,
                QualitySettings {
                    dispute_period_days: 0,
                    ..QualitySettings::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
        assert!(svc.get_active_settings().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_dispute_period_past_upper_bound() {
        let svc = test_service().await;
        let result = svc
            .set_active_settings(
                None,
                QualitySettings {
                    dispute_period_days: 100_000_000,
                    ..QualitySettings::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
        assert!(svc.get_active_settings().await.unwrap().is_none());
    }
}
