//! Catalog invariants: derived slugs, uniqueness, the two-phase delete and
//! the product history log.

mod common;

use common::*;
use store_server::db::models::{
    CategoryUpdate, HistoryAction, HistoryQuery, ProductUpdate, SupplierUpdate,
};
use store_server::db::repository::{
    CategoryRepository, HistoryRepository, ProductRepository, RepoError, SupplierRepository,
};

fn product_update(name: &str, supplier: &str, reason: &str) -> ProductUpdate {
    ProductUpdate {
        name: name.to_string(),
        short_description: None,
        description: None,
        meta_title: None,
        price: 1_000.0,
        quantity: 5,
        discount: 0.0,
        supplier: supplier.to_string(),
        categories: Vec::new(),
        pictures: Vec::new(),
        edit_reason: reason.to_string(),
    }
}

#[tokio::test]
async fn slug_is_derived_from_name_on_create_and_update() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let repo = ProductRepository::new(state.get_db());

    let product = repo
        .create(
            product_create("Gaming Mouse Mk4", &supplier, &[], 100.0, 5, 0.0),
            TEST_USER,
        )
        .await
        .expect("create");
    assert_eq!(product.slug, "gaming-mouse-mk4");

    let id = product.id.unwrap().to_string();
    let renamed = repo
        .update(&id, product_update("Laser Mouse Mk5", &supplier, "rename"), TEST_USER)
        .await
        .expect("update");
    assert_eq!(renamed.slug, "laser-mouse-mk5", "slug follows the name");
}

#[tokio::test]
async fn rename_to_self_never_conflicts() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let repo = ProductRepository::new(state.get_db());

    let product = repo
        .create(
            product_create("Mechanical Keyboard", &supplier, &[], 100.0, 5, 0.0),
            TEST_USER,
        )
        .await
        .expect("create");
    let id = product.id.unwrap().to_string();

    let unchanged = repo
        .update(
            &id,
            product_update("Mechanical Keyboard", &supplier, "touch"),
            TEST_USER,
        )
        .await
        .expect("rename to self");
    assert_eq!(unchanged.slug, "mechanical-keyboard");
}

#[tokio::test]
async fn duplicate_product_name_is_a_conflict() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let repo = ProductRepository::new(state.get_db());

    repo.create(
        product_create("Ultrawide Monitor", &supplier, &[], 100.0, 5, 0.0),
        TEST_USER,
    )
    .await
    .expect("first create");

    let duplicate = repo
        .create(
            product_create("Ultrawide Monitor", &supplier, &[], 200.0, 1, 0.0),
            TEST_USER,
        )
        .await;
    assert!(matches!(duplicate, Err(RepoError::Duplicate(_))));
}

#[tokio::test]
async fn product_update_requires_existing_supplier() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let repo = ProductRepository::new(state.get_db());

    let product = repo
        .create(
            product_create(&unique("Dock"), &supplier, &[], 100.0, 5, 0.0),
            TEST_USER,
        )
        .await
        .expect("create");
    let id = product.id.unwrap().to_string();

    let result = repo
        .update(
            &id,
            product_update("Dock Station", "supplier:does_not_exist", "vendor change"),
            TEST_USER,
        )
        .await;
    assert!(matches!(result, Err(RepoError::NotFound(_))));
}

#[tokio::test]
async fn hard_delete_is_two_phase() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let repo = ProductRepository::new(state.get_db());

    let product = repo
        .create(
            product_create(&unique("Microphone"), &supplier, &[], 100.0, 5, 0.0),
            TEST_USER,
        )
        .await
        .expect("create");
    let id = product.id.unwrap().to_string();

    // Phase order is enforced: no purge while the product is live
    let premature = repo.delete(&id, TEST_USER).await;
    assert!(matches!(premature, Err(RepoError::State(_))));

    let marked = repo
        .toggle_soft_delete(&id, TEST_USER, "discontinued")
        .await
        .expect("soft delete");
    assert!(marked.lifecycle.is_deleted());
    assert!(!marked.active, "soft delete force-clears visibility");

    repo.delete(&id, TEST_USER).await.expect("hard delete");
    assert!(repo.find_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn restore_leaves_product_hidden() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let repo = ProductRepository::new(state.get_db());

    let product = repo
        .create(
            product_create(&unique("Speaker"), &supplier, &[], 100.0, 5, 0.0),
            TEST_USER,
        )
        .await
        .expect("create");
    let id = product.id.unwrap().to_string();

    repo.toggle_soft_delete(&id, TEST_USER, "out of season")
        .await
        .expect("soft delete");
    let restored = repo
        .toggle_soft_delete(&id, TEST_USER, "back in season")
        .await
        .expect("restore");

    assert!(!restored.lifecycle.is_deleted());
    assert!(!restored.active, "restore must not re-publish automatically");
}

#[tokio::test]
async fn history_grows_with_every_catalog_action() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let repo = ProductRepository::new(state.get_db());
    let histories = HistoryRepository::new(state.get_db());

    let product = repo
        .create(
            product_create("Studio Light", &supplier, &[], 100.0, 5, 0.0),
            TEST_USER,
        )
        .await
        .expect("create");
    let id = product.id.unwrap().to_string();

    repo.update(&id, product_update("Studio Light V2", &supplier, "new revision"), TEST_USER)
        .await
        .expect("update");
    repo.toggle_soft_delete(&id, TEST_USER, "discontinued")
        .await
        .expect("soft delete");

    let page = histories
        .find_paged(&HistoryQuery {
            product_id: Some(id.clone()),
            ..Default::default()
        })
        .await
        .expect("history query");
    assert_eq!(page.total, 3);

    for action in [HistoryAction::Create, HistoryAction::Update, HistoryAction::Delete] {
        assert_eq!(
            page.items.iter().filter(|h| h.action == action).count(),
            1,
            "expected exactly one {:?} entry",
            action
        );
    }
    assert!(page.items.iter().all(|h| h.user_id == TEST_USER));
    let update = page
        .items
        .iter()
        .find(|h| h.action == HistoryAction::Update)
        .unwrap();
    assert_eq!(update.reason, "new revision");
}

#[tokio::test]
async fn history_survives_hard_delete_and_purges_exactly() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let repo = ProductRepository::new(state.get_db());
    let histories = HistoryRepository::new(state.get_db());

    let product = repo
        .create(
            product_create("Capture Card", &supplier, &[], 100.0, 5, 0.0),
            TEST_USER,
        )
        .await
        .expect("create");
    let id = product.id.unwrap().to_string();

    repo.toggle_soft_delete(&id, TEST_USER, "discontinued")
        .await
        .expect("soft delete");
    repo.delete(&id, TEST_USER).await.expect("hard delete");

    let page = histories
        .find_paged(&HistoryQuery {
            product_id: Some(id.clone()),
            ..Default::default()
        })
        .await
        .expect("history query");
    assert_eq!(page.total, 3, "create, soft delete, hard delete");
    assert!(
        page.items.iter().all(|h| h.product_name == "Capture Card"),
        "entries keep the name snapshot after the product is gone"
    );

    // Purge removes exactly the listed ids, nothing else
    let doomed: Vec<String> = page
        .items
        .iter()
        .take(2)
        .map(|h| h.id.clone().unwrap().to_string())
        .collect();
    let removed = histories.purge(&doomed).await.expect("purge");
    assert_eq!(removed, 2);

    let rest = histories
        .find_paged(&HistoryQuery {
            product_id: Some(id),
            ..Default::default()
        })
        .await
        .expect("history query");
    assert_eq!(rest.total, 1);

    // Purging the same ids again removes nothing
    let removed_again = histories.purge(&doomed).await.expect("repeat purge");
    assert_eq!(removed_again, 0);
}

#[tokio::test]
async fn supplier_delete_is_refused_while_referenced() {
    let (state, _tmp) = test_state().await;
    let supplier_name = unique("Acme");
    let supplier = seed_supplier(&state, &supplier_name).await;
    seed_product(&state, &unique("Tripod"), &supplier, 100.0, 5, 0.0).await;

    let suppliers = SupplierRepository::new(state.get_db());
    let blocked = suppliers.delete(&supplier).await;
    assert!(matches!(blocked, Err(RepoError::State(_))));

    // Renaming still works, and to-self renames never conflict
    let updated = suppliers
        .update(
            &supplier,
            SupplierUpdate {
                name: supplier_name,
                contact_name: None,
                email: None,
                phone: None,
                address: None,
                description: None,
            },
        )
        .await
        .expect("rename to self");
    assert!(updated.id.is_some());
}

#[tokio::test]
async fn category_two_phase_delete_detaches_products() {
    let (state, _tmp) = test_state().await;
    let supplier = seed_supplier(&state, &unique("Acme")).await;
    let category = seed_category(&state, &unique("Peripherals")).await;

    let products = ProductRepository::new(state.get_db());
    let product = products
        .create(
            product_create(
                &unique("Trackball"),
                &supplier,
                &[category.clone()],
                100.0,
                5,
                0.0,
            ),
            TEST_USER,
        )
        .await
        .expect("create product");
    let product_id = product.id.unwrap().to_string();
    assert_eq!(product.categories.len(), 1);

    let categories = CategoryRepository::new(state.get_db());
    let premature = categories.delete(&category).await;
    assert!(matches!(premature, Err(RepoError::State(_))));

    categories
        .toggle_soft_delete(&category)
        .await
        .expect("soft delete");
    categories.delete(&category).await.expect("hard delete");

    let detached = products.find_by_id(&product_id).await.unwrap().unwrap();
    assert!(
        detached.categories.is_empty(),
        "deleting a category removes the membership link"
    );
}

#[tokio::test]
async fn soft_deleted_category_leaves_the_menu_and_stays_off_it() {
    let (state, _tmp) = test_state().await;
    let category = seed_category(&state, &unique("Seasonal")).await;
    let categories = CategoryRepository::new(state.get_db());

    let marked = categories
        .toggle_soft_delete(&category)
        .await
        .expect("soft delete");
    assert!(marked.lifecycle.is_deleted());
    assert!(!marked.show_on_menu);

    let toggle = categories.toggle_show_on_menu(&category).await;
    assert!(
        matches!(toggle, Err(RepoError::State(_))),
        "deleted categories cannot rejoin the menu"
    );

    let update = categories
        .update(
            &category,
            CategoryUpdate {
                name: unique("Seasonal"),
                description: None,
                show_on_menu: true,
            },
        )
        .await
        .expect("update while deleted");
    assert!(
        !update.show_on_menu,
        "updates cannot sneak a deleted category onto the menu"
    );
}
