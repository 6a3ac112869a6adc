//! Supplier Repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Supplier, SupplierCreate, SupplierUpdate};
use crate::utils::now_millis;
use crate::utils::slug::slugify;

const TABLE: &str = "supplier";

#[derive(Clone)]
pub struct SupplierRepository {
    base: BaseRepository,
}

impl SupplierRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Supplier>> {
        let suppliers: Vec<Supplier> = self
            .base
            .db()
            .query("SELECT * FROM supplier ORDER BY name ASC")
            .await?
            .take(0)?;
        Ok(suppliers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Supplier>> {
        let record_id = parse_record_id(TABLE, id)?;
        let supplier: Option<Supplier> = self.base.db().select(record_id).await?;
        Ok(supplier)
    }

    /// True when another record already owns `slug`. Passing `exclude`
    /// lets a record keep its own slug on rename.
    async fn slug_taken(&self, slug: &str, exclude: Option<&RecordId>) -> RepoResult<bool> {
        let owners: Vec<RecordId> = self
            .base
            .db()
            .query("SELECT VALUE id FROM supplier WHERE slug = $slug")
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;
        Ok(owners.iter().any(|owner| Some(owner) != exclude))
    }

    pub async fn create(&self, data: SupplierCreate) -> RepoResult<Supplier> {
        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "Supplier name must contain at least one letter or digit".to_string(),
            ));
        }
        if self.slug_taken(&slug, None).await? {
            return Err(RepoError::Duplicate(format!(
                "Supplier '{}' already exists",
                data.name
            )));
        }

        let now = now_millis();
        let supplier = Supplier {
            id: None,
            name: data.name,
            slug,
            contact_name: data.contact_name,
            email: data.email,
            phone: data.phone,
            address: data.address,
            description: data.description,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Supplier> = self.base.db().create(TABLE).content(supplier).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create supplier".to_string()))
    }

    /// Full replace; the slug is always regenerated from the new name
    pub async fn update(&self, id: &str, data: SupplierUpdate) -> RepoResult<Supplier> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Supplier {id} not found")))?;

        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "Supplier name must contain at least one letter or digit".to_string(),
            ));
        }
        if self.slug_taken(&slug, Some(&record_id)).await? {
            return Err(RepoError::Duplicate(format!(
                "Supplier '{}' already exists",
                data.name
            )));
        }

        let updated = Supplier {
            id: None,
            name: data.name,
            slug,
            contact_name: data.contact_name,
            email: data.email,
            phone: data.phone,
            address: data.address,
            description: data.description,
            created_at: existing.created_at,
            updated_at: now_millis(),
        };

        let rows: Vec<Supplier> = self
            .base
            .db()
            .query("UPDATE $thing CONTENT $data RETURN AFTER")
            .bind(("thing", record_id))
            .bind(("data", updated))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Supplier {id} not found")))
    }

    /// Hard delete, refused while any product still references the supplier
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_record_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Supplier {id} not found")))?;

        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }

        let counts: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() FROM product WHERE supplier = $supplier GROUP ALL")
            .bind(("supplier", record_id.clone()))
            .await?
            .take(0)?;
        let in_use = counts.first().map(|row| row.count).unwrap_or(0);
        if in_use > 0 {
            return Err(RepoError::State(format!(
                "Supplier is referenced by {in_use} product(s) and cannot be deleted"
            )));
        }

        let _deleted: Option<Supplier> = self.base.db().delete(record_id).await?;
        Ok(())
    }
}
