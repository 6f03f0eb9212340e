//! Freelancer repository.
//!
//! The review workflow only reads freelancers; creation exists so records can
//! be seeded by the operator CLI.

use lqa_core::entities::Freelancer;
use lqa_core::enums::{AuditAction, EntityType, FreelancerStatus};
use lqa_core::ids::PREFIX_FREELANCER;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, now, parse_datetime, parse_enum, to_json_value};
use crate::service::LqaService;

const SELECT_COLS: &str = "id, full_name, email, status, created_at";

fn row_to_freelancer(row: &libsql::Row) -> Result<Freelancer, DatabaseError> {
    Ok(Freelancer {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl LqaService {
    /// Create an active freelancer.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the insert fails (e.g. duplicate email).
    pub async fn create_freelancer(
        &self,
        actor_id: Option<&str>,
        full_name: &str,
        email: &str,
    ) -> Result<Freelancer, DatabaseError> {
        let now = now();
        let id = self.db().generate_id(PREFIX_FREELANCER).await?;

        let freelancer = Freelancer {
            id: id.clone(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            status: FreelancerStatus::Active,
            created_at: now,
        };

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT INTO freelancers (id, full_name, email, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![
                id.as_str(),
                full_name,
                email,
                freelancer.status.as_str(),
                format_datetime(&now)
            ],
        )
        .await?;
        self.record_audit(
            &tx,
            actor_id,
            EntityType::Freelancer,
            &id,
            AuditAction::Created,
            Some(to_json_value(&freelancer)?),
            now,
        )
        .await?;
        tx.commit().await?;

        Ok(freelancer)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no freelancer has this ID.
    pub async fn get_freelancer(&self, id: &str) -> Result<Freelancer, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM freelancers WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_freelancer(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_freelancers(&self, limit: u32) -> Result<Vec<Freelancer>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM freelancers ORDER BY full_name LIMIT ?1"),
                [i64::from(limit)],
            )
            .await?;

        let mut freelancers = Vec::new();
        while let Some(row) = rows.next().await? {
            freelancers.push(row_to_freelancer(&row)?);
        }
        Ok(freelancers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{seed_freelancer, test_service};

    #[tokio::test]
    async fn create_freelancer_roundtrip() {
        let svc = test_service().await;
        let freelancer = seed_freelancer(&svc, "Ana Silva").await;

        assert!(freelancer.id.starts_with("frl-"));
        assert_eq!(freelancer.status, FreelancerStatus::Active);

        let fetched = svc.get_freelancer(&freelancer.id).await.unwrap();
        assert_eq!(fetched, freelancer);
    }

    #[tokio::test]
    async fn missing_freelancer_is_no_result() {
        let svc = test_service().await;
        let result = svc.get_freelancer("frl-deadbeef").await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let svc = test_service().await;
        svc.create_freelancer(None, "Ana", "ana@example.com").await.unwrap();
        let result = svc.create_freelancer(None, "Ana B", "ana@example.com").await;
        assert!(result.is_err());
        assert_eq!(svc.list_freelancers(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let svc = test_service().await;
        seed_freelancer(&svc, "Zoe Park").await;
        seed_freelancer(&svc, "Ana Silva").await;

        let names: Vec<_> = svc
            .list_freelancers(10)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.full_name)
            .collect();
        assert_eq!(names, vec!["Ana Silva", "Zoe Park"]);
    }

    #[tokio::test]
    async fn create_is_audited() {
        let svc = test_service().await;
        let freelancer = seed_freelancer(&svc, "Ana Silva").await;
        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(freelancer.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, AuditAction::Created);
    }
}
