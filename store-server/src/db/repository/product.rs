//! Product Repository
//!
//! Catalog CRUD, storefront projections and the two-phase delete. Every
//! create, edit and lifecycle change appends to the product history.

use std::collections::HashMap;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, HistoryRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{
    Category, HistoryAction, Lifecycle, Product, ProductCreate, ProductDetail, ProductListItem,
    ProductQuery, ProductUpdate, Supplier, TopSaleItem,
};
use crate::utils::now_millis;
use crate::utils::slug::slugify;
use shared::PageResult;

const TABLE: &str = "product";

/// Fields the listing projection selects
const LIST_FIELDS: &str =
    "id, name, slug, price, quantity, discount, active, lifecycle, categories, pictures, created_at";

#[derive(Debug, serde::Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
    history: HistoryRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db.clone()),
            history: HistoryRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let record_id = parse_record_id(TABLE, id)?;
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    /// Full view with supplier and categories resolved
    pub async fn find_detail(&self, id: &str) -> RepoResult<Option<ProductDetail>> {
        let record_id = parse_record_id(TABLE, id)?;
        let rows: Vec<ProductDetail> = self
            .base
            .db()
            .query("SELECT * FROM $thing FETCH supplier, categories")
            .bind(("thing", record_id))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_detail_by_slug(&self, slug: &str) -> RepoResult<Option<ProductDetail>> {
        let rows: Vec<ProductDetail> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE slug = $slug LIMIT 1 FETCH supplier, categories")
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Filtered catalog page, newest first. With no filters this is the
    /// back-office view of everything including soft-deleted records;
    /// storefront callers filter on `active` / `deleted`.
    pub async fn find_paged(&self, q: &ProductQuery) -> RepoResult<PageResult<ProductListItem>> {
        let category = q
            .category_id
            .as_deref()
            .map(|id| parse_record_id("category", id))
            .transpose()?;

        // A slug filter that matches no category matches no products
        let category_by_slug = match q.category_slug.as_deref() {
            Some(slug) => {
                let ids: Vec<RecordId> = self
                    .base
                    .db()
                    .query("SELECT VALUE id FROM category WHERE slug = $slug LIMIT 1")
                    .bind(("slug", slug.to_string()))
                    .await?
                    .take(0)?;
                match ids.into_iter().next() {
                    Some(id) => Some(id),
                    None => return Ok(PageResult::new(Vec::new(), 0)),
                }
            }
            None => None,
        };

        let mut conditions = Vec::new();
        if q.keyword.is_some() {
            conditions.push(
                "(string::lowercase(name) CONTAINS string::lowercase($keyword) \
                 OR string::lowercase(short_description ?? '') CONTAINS string::lowercase($keyword))",
            );
        }
        if category.is_some() {
            conditions.push("categories CONTAINS $category");
        }
        if category_by_slug.is_some() {
            conditions.push("categories CONTAINS $category_by_slug");
        }
        if q.slug.is_some() {
            conditions.push("slug = $slug");
        }
        if q.min_price.is_some() {
            conditions.push("price >= $min_price");
        }
        if q.max_price.is_some() {
            conditions.push("price <= $max_price");
        }
        if q.active.is_some() {
            conditions.push("active = $active");
        }
        match q.deleted {
            Some(true) => conditions.push("lifecycle = 'SOFT_DELETED'"),
            Some(false) => conditions.push("lifecycle = 'ACTIVE'"),
            None => {}
        }
        match q.published {
            Some(true) => conditions.push("(active = true AND lifecycle = 'ACTIVE')"),
            Some(false) => conditions.push("(active = false OR lifecycle = 'SOFT_DELETED')"),
            None => {}
        }
        if q.year.is_some() {
            conditions.push("time::year(time::from::unix(created_at / 1000)) = $year");
        }
        if q.month.is_some() {
            conditions.push("time::month(time::from::unix(created_at / 1000)) = $month");
        }
        if q.day.is_some() {
            conditions.push("time::day(time::from::unix(created_at / 1000)) = $day");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            "SELECT count() AS total FROM product{} GROUP ALL",
            where_clause
        );
        let select_sql = format!(
            "SELECT {} FROM product{} ORDER BY created_at DESC LIMIT {} START {} FETCH categories",
            LIST_FIELDS, where_clause, q.limit, q.offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.base.db().query(sql);
        if let Some(ref keyword) = q.keyword {
            qb = qb.bind(("keyword", keyword.clone()));
        }
        if let Some(category) = category {
            qb = qb.bind(("category", category));
        }
        if let Some(category_by_slug) = category_by_slug {
            qb = qb.bind(("category_by_slug", category_by_slug));
        }
        if let Some(ref slug) = q.slug {
            qb = qb.bind(("slug", slug.clone()));
        }
        if let Some(min_price) = q.min_price {
            qb = qb.bind(("min_price", min_price));
        }
        if let Some(max_price) = q.max_price {
            qb = qb.bind(("max_price", max_price));
        }
        if let Some(active) = q.active {
            qb = qb.bind(("active", active));
        }
        if let Some(year) = q.year {
            qb = qb.bind(("year", year));
        }
        if let Some(month) = q.month {
            qb = qb.bind(("month", month));
        }
        if let Some(day) = q.day {
            qb = qb.bind(("day", day));
        }

        let mut result = qb.await?;
        let counts: Vec<CountRow> = result.take(0)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);
        let items: Vec<ProductListItem> = result.take(1)?;

        Ok(PageResult::new(items, total))
    }

    /// Best sellers by units across non-cancelled orders
    pub async fn find_top_sales(&self, limit: usize) -> RepoResult<Vec<TopSaleItem>> {
        #[derive(Debug, serde::Deserialize)]
        struct SoldLine {
            product: RecordId,
            quantity: i64,
        }

        let lines: Vec<Vec<SoldLine>> = self
            .base
            .db()
            .query("SELECT VALUE details FROM order WHERE status != 'CANCELLED'")
            .await?
            .take(0)?;

        let mut sold: HashMap<RecordId, i64> = HashMap::new();
        for line in lines.into_iter().flatten() {
            *sold.entry(line.product).or_insert(0) += line.quantity;
        }

        let mut ranked: Vec<(RecordId, i64)> = sold.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        #[derive(Debug, serde::Deserialize)]
        struct Row {
            id: RecordId,
            name: String,
            slug: String,
            price: f64,
            #[serde(default)]
            discount: f64,
        }

        let ids: Vec<RecordId> = ranked.iter().map(|(id, _)| id.clone()).collect();
        let rows: Vec<Row> = self
            .base
            .db()
            .query(
                "SELECT id, name, slug, price, discount FROM product \
                 WHERE id IN $ids AND lifecycle = 'ACTIVE' AND active = true",
            )
            .bind(("ids", ids))
            .await?
            .take(0)?;

        let mut by_id: HashMap<RecordId, Row> = rows
            .into_iter()
            .map(|row| (row.id.clone(), row))
            .collect();

        // keep sales rank, drop products hidden since their last sale
        let items = ranked
            .into_iter()
            .filter_map(|(id, units)| {
                by_id.remove(&id).map(|row| TopSaleItem {
                    id: row.id,
                    name: row.name,
                    slug: row.slug,
                    price: row.price,
                    discount: row.discount,
                    sold: units,
                })
            })
            .collect();
        Ok(items)
    }

    /// Live products sharing at least one category, excluding the
    /// product itself
    pub async fn find_related(&self, id: &str, limit: usize) -> RepoResult<Vec<ProductListItem>> {
        let record_id = parse_record_id(TABLE, id)?;
        let product = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;
        if product.categories.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM product \
             WHERE id != $id AND categories CONTAINSANY $cats \
             AND lifecycle = 'ACTIVE' AND active = true \
             ORDER BY created_at DESC LIMIT {} FETCH categories",
            LIST_FIELDS, limit
        );
        let rows: Vec<ProductListItem> = self
            .base
            .db()
            .query(sql)
            .bind(("id", record_id))
            .bind(("cats", product.categories))
            .await?
            .take(0)?;
        Ok(rows)
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<&RecordId>) -> RepoResult<bool> {
        let owners: Vec<RecordId> = self
            .base
            .db()
            .query("SELECT VALUE id FROM product WHERE slug = $slug")
            .bind(("slug", slug.to_string()))
            .await?
            .take(0)?;
        Ok(owners.iter().any(|owner| Some(owner) != exclude))
    }

    async fn require_supplier(&self, id: &str) -> RepoResult<RecordId> {
        let record_id = parse_record_id("supplier", id)?;
        let supplier: Option<Supplier> = self.base.db().select(record_id.clone()).await?;
        if supplier.is_none() {
            return Err(RepoError::NotFound(format!("Supplier {id} does not exist")));
        }
        Ok(record_id)
    }

    async fn require_categories(&self, ids: &[String]) -> RepoResult<Vec<RecordId>> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let record_id = parse_record_id("category", id)?;
            let category: Option<Category> = self.base.db().select(record_id.clone()).await?;
            if category.is_none() {
                return Err(RepoError::NotFound(format!("Category {id} does not exist")));
            }
            out.push(record_id);
        }
        Ok(out)
    }

    pub async fn create(&self, data: ProductCreate, user_id: &str) -> RepoResult<Product> {
        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "Product name must contain at least one letter or digit".to_string(),
            ));
        }
        if self.slug_taken(&slug, None).await? {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                data.name
            )));
        }

        let supplier = self.require_supplier(&data.supplier).await?;
        let categories = self.require_categories(&data.categories).await?;

        let now = now_millis();
        let product = Product {
            id: None,
            name: data.name,
            slug,
            short_description: data.short_description,
            description: data.description,
            meta_title: data.meta_title,
            price: data.price,
            quantity: data.quantity,
            discount: data.discount,
            active: true,
            lifecycle: Lifecycle::Active,
            supplier,
            categories,
            pictures: data.pictures,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))?;

        self.history
            .append(&created, user_id, HistoryAction::Create, "Created")
            .await?;
        Ok(created)
    }

    /// Full replace; the slug is always regenerated from the new name
    /// and the mandatory edit reason lands in the history.
    pub async fn update(&self, id: &str, data: ProductUpdate, user_id: &str) -> RepoResult<Product> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

        let slug = slugify(&data.name);
        if slug.is_empty() {
            return Err(RepoError::Validation(
                "Product name must contain at least one letter or digit".to_string(),
            ));
        }
        if self.slug_taken(&slug, Some(&record_id)).await? {
            return Err(RepoError::Duplicate(format!(
                "Product '{}' already exists",
                data.name
            )));
        }

        let supplier = self.require_supplier(&data.supplier).await?;
        let categories = self.require_categories(&data.categories).await?;

        let updated = Product {
            id: None,
            name: data.name,
            slug,
            short_description: data.short_description,
            description: data.description,
            meta_title: data.meta_title,
            price: data.price,
            quantity: data.quantity,
            discount: data.discount,
            active: existing.active,
            lifecycle: existing.lifecycle,
            supplier,
            categories,
            pictures: data.pictures,
            created_at: existing.created_at,
            updated_at: now_millis(),
        };

        let rows: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $thing CONTENT $data RETURN AFTER")
            .bind(("thing", record_id))
            .bind(("data", updated))
            .await?
            .take(0)?;
        let saved = rows
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

        self.history
            .append(&saved, user_id, HistoryAction::Update, &data.edit_reason)
            .await?;
        Ok(saved)
    }

    /// Flip storefront visibility; refused for soft-deleted products
    pub async fn toggle_active(&self, id: &str) -> RepoResult<Product> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;
        if existing.lifecycle.is_deleted() {
            return Err(RepoError::State(
                "A deleted product cannot be shown on the storefront".to_string(),
            ));
        }

        let rows: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $thing SET active = $value, updated_at = $now RETURN AFTER")
            .bind(("thing", record_id))
            .bind(("value", !existing.active))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    /// Flip the lifecycle state and record it. Entering the soft-deleted
    /// state clears storefront visibility; restoring leaves the product
    /// hidden until it is re-enabled.
    pub async fn toggle_soft_delete(
        &self,
        id: &str,
        user_id: &str,
        reason: &str,
    ) -> RepoResult<Product> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

        let next = existing.lifecycle.toggled();
        let active = existing.active && !next.is_deleted();

        let rows: Vec<Product> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET lifecycle = $lifecycle, active = $active, \
                 updated_at = $now RETURN AFTER",
            )
            .bind(("thing", record_id))
            .bind(("lifecycle", next))
            .bind(("active", active))
            .bind(("now", now_millis()))
            .await?
            .take(0)?;
        let saved = rows
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

        let action = if next.is_deleted() {
            HistoryAction::Delete
        } else {
            HistoryAction::Update
        };
        self.history.append(&saved, user_id, action, reason).await?;
        Ok(saved)
    }

    /// Hard delete, legal only from the soft-deleted state. History
    /// entries stay behind with the name snapshot.
    pub async fn delete(&self, id: &str, user_id: &str) -> RepoResult<()> {
        let record_id = parse_record_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;
        if !existing.lifecycle.can_purge() {
            return Err(RepoError::State(
                "Product must be soft-deleted before it can be removed".to_string(),
            ));
        }

        self.history
            .append(&existing, user_id, HistoryAction::Delete, "Permanently removed")
            .await?;

        let _deleted: Option<Product> = self.base.db().delete(record_id).await?;
        Ok(())
    }
}
