// ==========================================
// GPL Cart - category repository
// ==========================================

use crate::domain::{Category, CategoryGroup};
use crate::repository::database::{Database, Executor, Record};
use crate::repository::error::RepositoryResult;
use crate::repository::query::{Conditions, QueryOptions};

const TABLE: &str = "category";
const GROUP_TABLE: &str = "category_group";

pub struct CategoryRepository {
    db: Database,
}

impl CategoryRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn find_tx(ex: &Executor, category_id: i64) -> RepositoryResult<Option<Category>> {
        ex.fetch_as(TABLE, &Conditions::new().eq("category_id", category_id))
    }

    pub fn exists_tx(ex: &Executor, category_id: i64) -> RepositoryResult<bool> {
        ex.exists(TABLE, &Conditions::new().eq("category_id", category_id))
    }

    pub fn find_group_tx(
        ex: &Executor,
        category_group_id: i64,
    ) -> RepositoryResult<Option<CategoryGroup>> {
        ex.fetch_as(
            GROUP_TABLE,
            &Conditions::new().eq("category_group_id", category_group_id),
        )
    }

    pub fn insert_tx(ex: &Executor, record: &Record) -> RepositoryResult<i64> {
        ex.insert(TABLE, record)
    }

    pub fn update_tx(ex: &Executor, category_id: i64, record: &Record) -> RepositoryResult<usize> {
        ex.update(TABLE, record, &Conditions::new().eq("category_id", category_id))
    }

    pub fn find(&self, category_id: i64) -> RepositoryResult<Option<Category>> {
        self.db.with(|ex| Self::find_tx(ex, category_id))
    }

    pub fn find_group(&self, category_group_id: i64) -> RepositoryResult<Option<CategoryGroup>> {
        self.db.with(|ex| Self::find_group_tx(ex, category_group_id))
    }

    /// Categories of a group ordered by weight
    pub fn list_by_group(&self, category_group_id: i64) -> RepositoryResult<Vec<Category>> {
        self.db.with(|ex| {
            ex.fetch_all_as(
                TABLE,
                &Conditions::new().eq("category_group_id", category_group_id),
                &QueryOptions::new().order_by("weight"),
            )
        })
    }

    /// Direct children of a category (parent 0 = roots)
    pub fn children(&self, category_group_id: i64, parent_id: i64) -> RepositoryResult<Vec<Category>> {
        self.db.with(|ex| {
            ex.fetch_all_as(
                TABLE,
                &Conditions::new()
                    .eq("category_group_id", category_group_id)
                    .eq("parent_id", parent_id),
                &QueryOptions::new().order_by("weight"),
            )
        })
    }
}
