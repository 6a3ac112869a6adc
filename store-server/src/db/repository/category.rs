//! Category Repository

use std::collections::HashMap;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Category, CategoryBrief, CategoryCreate, CategoryUpdate, Lifecycle};
use crate::utils::now_millis;
use crate::utils::slug::slugify;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category ORDER BY name ASC")
            .await?
            .take(0)?;
        Ok(categories)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let record_id = parse_record_id(TABLE, id)?;
        let category: Option<Category> = self.base.db().select(record_id).await?;
        Ok(category)
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let rows: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Navigation entries: live categories flagged for the menu
    pub async fn menu(&self) -> RepoResult<Vec<CategoryBrief>> {
        let rows: Vec<CategoryBrief> = self
            .base
            .db()
            .query(
                "SELECT id, name, slug FROM category \
                 WHERE show_on_menu = true AND lifecycle = 'ACTIVE' ORDER BY name ASC",
            )
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Live products per category, for the back-office listing
    pub async fn product_counts(&self) -> RepoResult<HashMap<RecordId, i64>> {
        let memberships: Vec<Vec<RecordId>> = self
            .base
            .db()
            .query("SELECT VALUE categories FROM product WHERE lifecycle = 'ACTIVE'")
            .await?
            .take(0)?;

        let mut counts: HashMap<RecordId, i64> = HashMap::new();
        for categories in memberships {
            for category in categories {
                *counts.entry(category).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<&RecordId>) -> RepoResult<bool> {
        let owners: Vec<RecordId> = self
            .base
            .db()
            .query("SELECT VALUE id FROM category WHERE slug = $slug")
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;
        Ok(owners.iter().any(|owner| Some(owner) != exclude))
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "Category name must contain at least one letter or digit".to_string(),
            ));
        }
        if self.slug_taken(&slug, None).await? {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.name
            )));
        }

        let now = now_millis();
        let category = Category {
            id: None,
            name: data.name,
            slug,
            description: data.description,
            show_on_menu: data.show_on_menu,
            lifecycle: Lifecycle::Active,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Full replace; the slug is always regenerated from the new name
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "Category name must contain at least one letter or digit".to_string(),
            ));
        }
        if self.slug_taken(&slug, Some(&record_id)).await? {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.name
            )));
        }

        // A soft-deleted category never shows on the menu, whatever the payload says
        let show_on_menu = data.show_on_menu && !existing.lifecycle.is_deleted();

        let updated = Category {
            id: None,
            name: data.name,
            slug,
            description: data.description,
            show_on_menu,
            lifecycle: existing.lifecycle,
            created_at: existing.created_at,
            updated_at: now_millis(),
        };

        let rows: Vec<Category> = self
            .base
            .db()
            .query("UPDATE $thing CONTENT $data RETURN AFTER")
            .bind(("thing", record_id))
            .bind(("data", updated))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
    }

    /// Flip menu visibility; refused for soft-deleted categories
    pub async fn toggle_show_on_menu(&self, id: &str) -> RepoResult<Category> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;
        if existing.lifecycle.is_deleted() {
            return Err(RepoError::State(
                "A deleted category cannot appear on the menu".to_string(),
            ));
        }

        let rows: Vec<Category> = self
            .base
            .db()
            .query("UPDATE $thing SET show_on_menu = $value, updated_at = $now RETURN AFTER")
            .bind(("thing", record_id))
            .bind(("value", !existing.show_on_menu))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
    }

    /// Flip the lifecycle state. Entering the soft-deleted state also
    /// clears menu visibility.
    pub async fn toggle_soft_delete(&self, id: &str) -> RepoResult<Category> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

        let next = existing.lifecycle.toggled();
        let show_on_menu = existing.show_on_menu && !next.is_deleted();

        let rows: Vec<Category> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET lifecycle = $lifecycle, show_on_menu = $menu, \
                 updated_at = $now RETURN AFTER",
            )
            .bind(("thing", record_id))
            .bind(("lifecycle", next))
            .bind(("menu", show_on_menu))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
    }

    /// Hard delete, legal only from the soft-deleted state. Products
    /// drop their reference to the removed category in the same
    /// transaction.
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;
        if !existing.lifecycle.can_purge() {
            return Err(RepoError::State(
                "Category must be soft-deleted before it can be removed".to_string(),
            ));
        }

        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE product SET categories -= $cat WHERE categories CONTAINS $cat; \
                 DELETE $cat; \
                 COMMIT TRANSACTION;",
            )
            .bind(("cat", record_id))
            .await?
            .check()?;
        Ok(())
    }
}
