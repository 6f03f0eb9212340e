//! Internal user repository: admins, project managers, reviewers.

use lqa_core::entities::User;
use lqa_core::enums::{AuditAction, EntityType, UserRole};
use lqa_core::ids::PREFIX_USER;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, now, parse_datetime, parse_enum, to_json_value};
use crate::service::LqaService;

const SELECT_COLS: &str = "id, full_name, email, role, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        role: parse_enum(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl LqaService {
    /// Create an internal user.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` for the `system` role, which is
    /// reserved for scheduled jobs, or `DatabaseError` if the insert fails.
    pub async fn create_user(
        &self,
        actor_id: Option<&str>,
        full_name: &str,
        email: &str,
        role: UserRole,
    ) -> Result<User, DatabaseError> {
        if role == UserRole::System {
            return Err(DatabaseError::InvalidState(
                "the system role cannot be assigned to a user".into(),
            ));
        }

        let now = now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        let user = User {
            id: id.clone(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            role,
            created_at: now,
        };

        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "INSERT INTO users (id, full_name, email, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![id.as_str(), full_name, email, role.as_str(), format_datetime(&now)],
        )
        .await?;
        self.record_audit(
            &tx,
            actor_id,
            EntityType::User,
            &id,
            AuditAction::Created,
            Some(to_json_value(&user)?),
            now,
        )
        .await?;
        tx.commit().await?;

        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no user has this ID.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users(&self, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users ORDER BY full_name LIMIT ?1"),
                [i64::from(limit)],
            )
            .await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    /// All users holding any of `roles`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users_by_roles(&self, roles: &[UserRole]) -> Result<Vec<User>, DatabaseError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = (1..=roles.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let params: Vec<libsql::Value> = roles
            .iter()
            .map(|r| libsql::Value::Text(r.as_str().to_string()))
            .collect();
        let sql =
            format!("SELECT {SELECT_COLS} FROM users WHERE role IN ({placeholders}) ORDER BY full_name");
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }
}
