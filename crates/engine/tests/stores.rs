use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    ContactNew, ContactUpdate, DocumentKind, Engine, EngineError, GroupNew, GroupScope,
    GroupUpdate, PostDocumentCmd, StockItemNew, StoreRole,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob", "carol"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

#[tokio::test]
async fn creator_becomes_owner() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", Some("Via Roma 1"), "alice").await.unwrap();

    let members = engine.store_members(&store_id, "alice").await.unwrap();
    assert_eq!(members, vec![("alice".to_string(), StoreRole::Owner)]);

    let store = engine.store(&store_id, "alice").await.unwrap();
    assert_eq!(store.name, "Main");
    assert_eq!(store.address.as_deref(), Some("Via Roma 1"));
}

#[tokio::test]
async fn stores_lists_only_memberships() {
    let (engine, _db) = engine_with_db().await;
    let main = engine.new_store("Main", None, "alice").await.unwrap();
    engine.new_store("Bob's", None, "bob").await.unwrap();

    let stores = engine.stores("alice").await.unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].id, main);
}

#[tokio::test]
async fn member_management_is_owner_only() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();

    engine
        .upsert_store_member(&store_id, "alice", "bob", StoreRole::Staff)
        .await
        .unwrap();

    // Staff can read and write store data but not manage members.
    let err = engine
        .upsert_store_member(&store_id, "bob", "carol", StoreRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = engine
        .remove_store_member(&store_id, "bob", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Role change through the same upsert path.
    engine
        .upsert_store_member(&store_id, "alice", "bob", StoreRole::Manager)
        .await
        .unwrap();
    let members = engine.store_members(&store_id, "alice").await.unwrap();
    assert!(members.contains(&("bob".to_string(), StoreRole::Manager)));

    engine
        .remove_store_member(&store_id, "alice", "bob")
        .await
        .unwrap();
    let remaining = engine.stores("bob").await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn unknown_user_cannot_be_added() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();

    let err = engine
        .upsert_store_member(&store_id, "alice", "nobody", StoreRole::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn staff_member_can_write_store_data() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();
    engine
        .upsert_store_member(&store_id, "alice", "bob", StoreRole::Staff)
        .await
        .unwrap();

    let item = engine
        .new_stock_item(&store_id, "bob", StockItemNew::new("Bolts").quantity(2.0))
        .await
        .unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    engine
        .post_document(
            PostDocumentCmd::new(&store_id, "bob", DocumentKind::Sale, date)
                .line(item.id, 1.0, None),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn store_delete_is_owner_only_and_cascades() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();
    engine
        .upsert_store_member(&store_id, "alice", "bob", StoreRole::Manager)
        .await
        .unwrap();

    let item = engine
        .new_stock_item(&store_id, "alice", StockItemNew::new("Bolts").quantity(5.0))
        .await
        .unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, date)
                .line(item.id, 1.0, None),
        )
        .await
        .unwrap();

    let err = engine.delete_store(&store_id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.delete_store(&store_id, "alice").await.unwrap();
    let err = engine.store(&store_id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn group_tree_updates_and_detaches() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();
    let parent = engine
        .new_group(
            &store_id,
            "alice",
            GroupNew {
                name: "Hardware".to_string(),
                parent_group_id: None,
            },
        )
        .await
        .unwrap();
    let child = engine
        .new_group(
            &store_id,
            "alice",
            GroupNew {
                name: "Fasteners".to_string(),
                parent_group_id: Some(parent.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(child.parent_group_id, Some(parent.id));

    let err = engine
        .update_group(
            &store_id,
            child.id,
            "alice",
            GroupUpdate {
                parent_group_id: Some(Some(child.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let item = engine
        .new_stock_item(&store_id, "alice", StockItemNew::new("Bolts").group(child.id))
        .await
        .unwrap();

    // Deleting a group detaches its items instead of deleting them.
    engine.delete_group(&store_id, child.id, "alice").await.unwrap();
    let fetched = engine.stock_item(&store_id, item.id, "alice").await.unwrap();
    assert_eq!(fetched.group_id, None);
    let ungrouped = engine
        .stock_items(&store_id, "alice", GroupScope::Ungrouped)
        .await
        .unwrap();
    assert_eq!(ungrouped.len(), 1);
}

#[tokio::test]
async fn group_parent_must_live_in_same_store() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();
    let other_store = engine.new_store("Branch", None, "alice").await.unwrap();
    let foreign = engine
        .new_group(
            &other_store,
            "alice",
            GroupNew {
                name: "Hardware".to_string(),
                parent_group_id: None,
            },
        )
        .await
        .unwrap();

    let err = engine
        .new_group(
            &store_id,
            "alice",
            GroupNew {
                name: "Fasteners".to_string(),
                parent_group_id: Some(foreign.id),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn contact_update_clears_fields_explicitly() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();

    let mut cmd = ContactNew::new("Rossi");
    cmd.email = Some("rossi@example.com".to_string());
    cmd.phone = Some("555-0100".to_string());
    let customer = engine.new_customer(&store_id, "alice", cmd).await.unwrap();

    let updated = engine
        .update_customer(
            &store_id,
            customer.id,
            "alice",
            ContactUpdate {
                email: Some(None),
                notes: Some(Some("preferred".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, None);
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    assert_eq!(updated.notes.as_deref(), Some("preferred"));
}

#[tokio::test]
async fn deleting_referenced_customer_keeps_document() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();
    let customer = engine
        .new_customer(&store_id, "alice", ContactNew::new("Rossi"))
        .await
        .unwrap();
    let item = engine
        .new_stock_item(&store_id, "alice", StockItemNew::new("Bolts").quantity(5.0))
        .await
        .unwrap();

    let date = chrono::NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
    let document = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, date)
                .customer(customer.id)
                .line(item.id, 1.0, None),
        )
        .await
        .unwrap();

    engine
        .delete_customer(&store_id, customer.id, "alice")
        .await
        .unwrap();

    // The document survives with the reference nulled out.
    let document = engine.document(&store_id, document.id, "alice").await.unwrap();
    assert_eq!(document.customer_id, None);
}

#[tokio::test]
async fn customers_and_suppliers_are_separate() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();
    let customer = engine
        .new_customer(&store_id, "alice", ContactNew::new("Rossi"))
        .await
        .unwrap();

    let err = engine
        .supplier(&store_id, customer.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    engine
        .new_supplier(&store_id, "alice", ContactNew::new("Acme"))
        .await
        .unwrap();
    assert_eq!(engine.customers(&store_id, "alice").await.unwrap().len(), 1);
    assert_eq!(engine.suppliers(&store_id, "alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_contact_update_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();

    let err = engine
        .update_customer(&store_id, Uuid::new_v4(), "alice", ContactUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
