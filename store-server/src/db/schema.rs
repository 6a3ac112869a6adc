//! Table and index definitions applied at startup
//!
//! Tables stay schemaless; the definitions here exist for the unique
//! constraints (slugs, codes) and the indexes behind date and status
//! filters. Everything is `IF NOT EXISTS` so startup is idempotent.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS product;
    DEFINE INDEX IF NOT EXISTS product_slug ON product FIELDS slug UNIQUE;
    DEFINE INDEX IF NOT EXISTS product_created_at ON product FIELDS created_at;

    DEFINE TABLE IF NOT EXISTS category;
    DEFINE INDEX IF NOT EXISTS category_slug ON category FIELDS slug UNIQUE;

    DEFINE TABLE IF NOT EXISTS supplier;
    DEFINE INDEX IF NOT EXISTS supplier_slug ON supplier FIELDS slug UNIQUE;

    DEFINE TABLE IF NOT EXISTS discount;
    DEFINE INDEX IF NOT EXISTS discount_code ON discount FIELDS code UNIQUE;

    DEFINE TABLE IF NOT EXISTS order;
    DEFINE INDEX IF NOT EXISTS order_code ON order FIELDS code UNIQUE;
    DEFINE INDEX IF NOT EXISTS order_date ON order FIELDS order_date;
    DEFINE INDEX IF NOT EXISTS order_status ON order FIELDS status;

    DEFINE TABLE IF NOT EXISTS product_history;
    DEFINE INDEX IF NOT EXISTS history_product ON product_history FIELDS product;
    DEFINE INDEX IF NOT EXISTS history_action_time ON product_history FIELDS action_time;
";

/// Apply all table and index definitions
pub async fn define(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(SCHEMA).await?.check()?;
    Ok(())
}
