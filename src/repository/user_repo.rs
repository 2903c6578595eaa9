// ==========================================
// GPL Cart - user / role repository
// ==========================================
// Constraint: email is unique across the installation, stored lowercase
// ==========================================

use crate::domain::{Role, User};
use crate::engine::password;
use crate::repository::database::{Database, Executor, Record};
use crate::repository::error::RepositoryResult;
use crate::repository::query::{Conditions, QueryOptions};

const TABLE: &str = "user";
const ROLE_TABLE: &str = "role";

/// Stored form of an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ===== transactional helpers =====

    pub fn find_tx(ex: &Executor, user_id: i64) -> RepositoryResult<Option<User>> {
        ex.fetch_as(TABLE, &Conditions::new().eq("user_id", user_id))
    }

    pub fn exists_tx(ex: &Executor, user_id: i64) -> RepositoryResult<bool> {
        ex.exists(TABLE, &Conditions::new().eq("user_id", user_id))
    }

    pub fn find_by_email_tx(ex: &Executor, email: &str) -> RepositoryResult<Option<User>> {
        ex.fetch_as(TABLE, &Conditions::new().eq("email", normalize_email(email)))
    }

    /// Whether another user already uses `email`
    pub fn email_taken_tx(
        ex: &Executor,
        email: &str,
        exclude_user_id: Option<i64>,
    ) -> RepositoryResult<bool> {
        let mut conditions = Conditions::new().eq("email", normalize_email(email));
        if let Some(id) = exclude_user_id {
            conditions = conditions.ne("user_id", id);
        }
        ex.exists(TABLE, &conditions)
    }

    pub fn role_exists_tx(ex: &Executor, role_id: i64) -> RepositoryResult<bool> {
        ex.exists(ROLE_TABLE, &Conditions::new().eq("role_id", role_id))
    }

    pub fn insert_tx(ex: &Executor, record: &Record) -> RepositoryResult<i64> {
        ex.insert(TABLE, record)
    }

    pub fn update_tx(ex: &Executor, user_id: i64, record: &Record) -> RepositoryResult<usize> {
        ex.update(TABLE, record, &Conditions::new().eq("user_id", user_id))
    }

    // ===== shared-connection API =====

    pub fn find(&self, user_id: i64) -> RepositoryResult<Option<User>> {
        self.db.with(|ex| Self::find_tx(ex, user_id))
    }

    pub fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.db.with(|ex| Self::find_by_email_tx(ex, email))
    }

    pub fn find_role(&self, role_id: i64) -> RepositoryResult<Option<Role>> {
        self.db
            .with(|ex| ex.fetch_as(ROLE_TABLE, &Conditions::new().eq("role_id", role_id)))
    }

    pub fn list_roles(&self) -> RepositoryResult<Vec<Role>> {
        self.db.with(|ex| {
            ex.fetch_all_as(ROLE_TABLE, &Conditions::new(), &QueryOptions::new().order_by("role_id"))
        })
    }

    /// Enabled user matching email and password
    ///
    /// # Returns
    /// - Ok(None): unknown email, disabled account or wrong password
    pub fn authenticate(&self, email: &str, plain: &str) -> RepositoryResult<Option<User>> {
        let Some(user) = self.find_by_email(email)? else {
            return Ok(None);
        };
        if !user.status || !password::verify_password(plain, &user.hash) {
            return Ok(None);
        }
        Ok(Some(user))
    }
}
