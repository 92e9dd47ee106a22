//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserUuid;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    role::Role,
    user::{NewUser, User, UserUpdate},
};
use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::value_object::user_password::UserPassword;
use crate::error::UserResult;

/// Columns selected for every user lookup
const USER_SELECT: &str = r#"
    SELECT
        u.id,
        u.uuid,
        u.name,
        u.user_name,
        u.email,
        u.password_hash,
        u.phone_number,
        u.created_at,
        u.updated_at,
        r.id AS role_id,
        r.code AS role_code
    FROM users u
    INNER JOIN roles r ON r.id = u.role_id
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one<T>(&self, condition: &str, value: T) -> UserResult<Option<User>>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send + 'static,
    {
        let sql = format!("{} WHERE {} = $1", USER_SELECT, condition);

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> UserResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (
                uuid,
                name,
                user_name,
                email,
                password_hash,
                phone_number,
                role_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user.uuid.as_uuid())
        .bind(&user.name)
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(user.password.as_phc_string())
        .bind(&user.phone_number)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        self.find_one("u.id", id).await
    }

    async fn find_by_uuid(&self, uuid: &UserUuid) -> UserResult<Option<User>> {
        self.find_one("u.uuid", *uuid.as_uuid()).await
    }

    async fn find_by_user_name(&self, user_name: &str) -> UserResult<Option<User>> {
        self.find_one("u.user_name", user_name.to_owned()).await
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        self.find_one("u.email", email.to_owned()).await
    }

    async fn update(&self, uuid: &UserUuid, changes: &UserUpdate) -> UserResult<bool> {
        let password_hash = changes
            .password
            .as_ref()
            .map(|p| p.as_phc_string().to_owned());

        // A NULL hash keeps the stored one
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                user_name = $3,
                email = $4,
                phone_number = $5,
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
            WHERE uuid = $1
            "#,
        )
        .bind(uuid.as_uuid())
        .bind(&changes.name)
        .bind(&changes.user_name)
        .bind(&changes.email)
        .bind(&changes.phone_number)
        .bind(password_hash)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgUserRepository {
    async fn find_by_code(&self, code: &str) -> UserResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, code FROM roles WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| Role::new(r.id, r.code)))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    uuid: Uuid,
    name: String,
    user_name: String,
    email: String,
    password_hash: String,
    phone_number: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    role_id: i32,
    role_code: String,
}

impl UserRow {
    fn into_user(self) -> UserResult<User> {
        Ok(User {
            id: self.id,
            uuid: UserUuid::from_uuid(self.uuid),
            name: self.name,
            user_name: self.user_name,
            email: self.email,
            password: UserPassword::from_phc_string(self.password_hash)?,
            phone_number: self.phone_number,
            role: Role::new(self.role_id, self.role_code),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i32,
    code: String,
}
