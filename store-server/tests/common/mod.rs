//! Shared test fixtures
//!
//! Every test gets its own RocksDB directory; the `TempDir` must stay
//! alive for the duration of the test or the database vanishes under it.

#![allow(dead_code)]

use store_server::db::models::{
    CategoryCreate, DiscountCreate, DiscountKind, OrderCreate, ProductCreate, SupplierCreate,
};
use store_server::db::repository::{
    CategoryRepository, DiscountRepository, OrderRepository, ProductRepository, SupplierRepository,
};
use store_server::utils::now_millis;
use store_server::{Config, ServerState};
use tempfile::TempDir;

pub const TEST_USER: &str = "user:tester";

pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

pub async fn test_state() -> (ServerState, TempDir) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let db_path = tmp.path().join("store.db");
    let config = Config::with_overrides(db_path.to_string_lossy().to_string(), "127.0.0.1:0");
    let state = ServerState::initialize(&config).await.expect("state init");
    (state, tmp)
}

pub fn order_repo(state: &ServerState) -> OrderRepository {
    OrderRepository::new(state.get_db(), state.get_write_lock())
}

/// Unique-ish name so slugs never collide across cases
pub fn unique(prefix: &str) -> String {
    format!("{} {:08x}", prefix, rand::random::<u32>())
}

pub async fn seed_supplier(state: &ServerState, name: &str) -> String {
    let repo = SupplierRepository::new(state.get_db());
    let supplier = repo
        .create(SupplierCreate {
            name: name.to_string(),
            contact_name: None,
            email: None,
            phone: None,
            address: None,
            description: None,
        })
        .await
        .expect("create supplier");
    supplier.id.expect("supplier id").to_string()
}

pub async fn seed_category(state: &ServerState, name: &str) -> String {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .create(CategoryCreate {
            name: name.to_string(),
            description: None,
            show_on_menu: true,
        })
        .await
        .expect("create category");
    category.id.expect("category id").to_string()
}

pub fn product_create(
    name: &str,
    supplier_id: &str,
    categories: &[String],
    price: f64,
    quantity: i64,
    discount: f64,
) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        short_description: None,
        description: None,
        meta_title: None,
        price,
        quantity,
        discount,
        supplier: supplier_id.to_string(),
        categories: categories.to_vec(),
        pictures: Vec::new(),
    }
}

/// Create a product and return its record id as a string
pub async fn seed_product(
    state: &ServerState,
    name: &str,
    supplier_id: &str,
    price: f64,
    quantity: i64,
    discount: f64,
) -> String {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .create(
            product_create(name, supplier_id, &[], price, quantity, discount),
            TEST_USER,
        )
        .await
        .expect("create product");
    product.id.expect("product id").to_string()
}

/// Create a percentage discount valid for another day
pub async fn seed_discount(
    state: &ServerState,
    code: &str,
    amount: f64,
    min_price: f64,
    quantity: i64,
) -> String {
    let repo = DiscountRepository::new(state.get_db());
    let discount = repo
        .create(DiscountCreate {
            code: code.to_string(),
            kind: DiscountKind::Percentage,
            amount,
            min_price,
            quantity,
            active: true,
            expiry_date: now_millis() + DAY_MILLIS,
        })
        .await
        .expect("create discount");
    discount.id.expect("discount id").to_string()
}

pub fn order_create(name: &str) -> OrderCreate {
    OrderCreate {
        name: name.to_string(),
        email: "buyer@example.com".to_string(),
        phone: "555-0100".to_string(),
        ship_address: "1 Test Lane".to_string(),
        note: None,
    }
}

/// Open an empty order for TEST_USER and return its id
pub async fn seed_order(state: &ServerState) -> String {
    let order = order_repo(state)
        .create(order_create("Test Buyer"), TEST_USER)
        .await
        .expect("create order");
    order.id.expect("order id").to_string()
}
