use chrono::{NaiveDate, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    DocumentHeaderPatch, DocumentKind, DocumentStatus, Engine, EngineError, PostDocumentCmd,
    StockItemNew,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob"] {
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

async fn store_with_item(engine: &Engine, quantity: f64) -> (String, Uuid) {
    let store_id = engine.new_store("Main", None, "alice").await.unwrap();
    let item = engine
        .new_stock_item(
            &store_id,
            "alice",
            StockItemNew::new("Bolts").quantity(quantity),
        )
        .await
        .unwrap();
    (store_id, item.id)
}

fn july(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 7, day).unwrap()
}

#[tokio::test]
async fn sale_decrements_stock() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 5.0).await;

    let document = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(1))
                .line(item_id, 3.0, Some(1.5)),
        )
        .await
        .unwrap();

    assert_eq!(document.status, DocumentStatus::Open);
    assert_eq!(document.created_by, "alice");
    assert_eq!(document.lines.len(), 1);
    assert_eq!(document.lines[0].quantity, 3.0);

    let item = engine.stock_item(&store_id, item_id, "alice").await.unwrap();
    assert_eq!(item.quantity, 2.0);
}

#[tokio::test]
async fn kinds_map_to_expected_signs() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 0.0).await;

    let cases = [
        (DocumentKind::Purchase, 4.0, 4.0),
        (DocumentKind::AdjustmentIn, 2.0, 6.0),
        (DocumentKind::AdjustmentOut, 1.0, 5.0),
        (DocumentKind::Sale, 5.0, 0.0),
    ];
    for (kind, quantity, expected) in cases {
        engine
            .post_document(
                PostDocumentCmd::new(&store_id, "alice", kind, july(1))
                    .line(item_id, quantity, None),
            )
            .await
            .unwrap();
        let item = engine.stock_item(&store_id, item_id, "alice").await.unwrap();
        assert_eq!(item.quantity, expected, "after {kind:?}");
    }
}

#[tokio::test]
async fn cancel_restores_quantities() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 5.0).await;

    let document = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(1))
                .line(item_id, 3.0, None),
        )
        .await
        .unwrap();

    let cancelled = engine
        .cancel_document(&store_id, document.id, "alice", Utc::now())
        .await
        .unwrap();

    assert_eq!(cancelled.status, DocumentStatus::Cancelled);
    assert!(cancelled.cancelled_at.is_some());
    assert_eq!(cancelled.cancelled_by.as_deref(), Some("alice"));
    // Lines are kept for audit.
    assert_eq!(cancelled.lines.len(), 1);

    let item = engine.stock_item(&store_id, item_id, "alice").await.unwrap();
    assert_eq!(item.quantity, 5.0);
}

#[tokio::test]
async fn multi_line_posting_applies_every_line_in_order() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, bolts_id) = store_with_item(&engine, 1.0).await;
    let nuts = engine
        .new_stock_item(&store_id, "alice", StockItemNew::new("Nuts").quantity(2.0))
        .await
        .unwrap();

    let document = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Purchase, july(2))
                .line(bolts_id, 10.0, Some(0.1))
                .line(nuts.id, 20.0, Some(0.05)),
        )
        .await
        .unwrap();

    assert_eq!(document.lines.len(), 2);
    assert_eq!(document.lines[0].line_no, 0);
    assert_eq!(document.lines[0].item_id, bolts_id);
    assert_eq!(document.lines[1].line_no, 1);
    assert_eq!(document.lines[1].item_id, nuts.id);

    let bolts = engine.stock_item(&store_id, bolts_id, "alice").await.unwrap();
    assert_eq!(bolts.quantity, 11.0);
    let nuts = engine.stock_item(&store_id, nuts.id, "alice").await.unwrap();
    assert_eq!(nuts.quantity, 22.0);
}

#[tokio::test]
async fn posting_rolls_back_when_a_line_item_is_missing() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 5.0).await;

    let err = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Purchase, july(3))
                .line(item_id, 2.0, None)
                .line(Uuid::new_v4(), 1.0, None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    // The first line's delta must have been rolled back with the document.
    let item = engine.stock_item(&store_id, item_id, "alice").await.unwrap();
    assert_eq!(item.quantity, 5.0);
    let documents = engine.documents(&store_id, "alice").await.unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn posting_against_another_stores_item_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, _item_id) = store_with_item(&engine, 5.0).await;
    let other_store = engine.new_store("Branch", None, "alice").await.unwrap();
    let foreign_item = engine
        .new_stock_item(&other_store, "alice", StockItemNew::new("Nuts").quantity(9.0))
        .await
        .unwrap();

    let err = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(1))
                .line(foreign_item.id, 1.0, None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let foreign_item = engine
        .stock_item(&other_store, foreign_item.id, "alice")
        .await
        .unwrap();
    assert_eq!(foreign_item.quantity, 9.0);
}

#[tokio::test]
async fn document_without_lines_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, _item_id) = store_with_item(&engine, 5.0).await;

    let err = engine
        .post_document(PostDocumentCmd::new(
            &store_id,
            "alice",
            DocumentKind::Sale,
            july(1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let documents = engine.documents(&store_id, "alice").await.unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn non_positive_line_quantity_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 5.0).await;

    for quantity in [0.0, -1.0, f64::NAN] {
        let err = engine
            .post_document(
                PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(1))
                    .line(item_id, quantity, None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}

#[tokio::test]
async fn negative_stock_is_permitted() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 2.0).await;

    engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(1))
                .line(item_id, 5.0, None),
        )
        .await
        .unwrap();

    let item = engine.stock_item(&store_id, item_id, "alice").await.unwrap();
    assert_eq!(item.quantity, -3.0);
}

#[tokio::test]
async fn second_cancel_is_rejected_and_applies_nothing() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 5.0).await;

    let document = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(1))
                .line(item_id, 3.0, None),
        )
        .await
        .unwrap();

    engine
        .cancel_document(&store_id, document.id, "alice", Utc::now())
        .await
        .unwrap();
    let err = engine
        .cancel_document(&store_id, document.id, "alice", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadyCancelled(_)));

    let item = engine.stock_item(&store_id, item_id, "alice").await.unwrap();
    assert_eq!(item.quantity, 5.0);
}

#[tokio::test]
async fn documents_are_scoped_by_store() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 5.0).await;
    let other_store = engine.new_store("Branch", None, "alice").await.unwrap();

    let document = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(1))
                .line(item_id, 1.0, None),
        )
        .await
        .unwrap();

    let err = engine
        .document(&other_store, document.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let documents = engine.documents(&other_store, "alice").await.unwrap();
    assert!(documents.is_empty());
}

#[tokio::test]
async fn documents_list_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 100.0).await;

    for day in [1, 3, 2] {
        engine
            .post_document(
                PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(day))
                    .line(item_id, 1.0, None),
            )
            .await
            .unwrap();
    }

    let documents = engine.documents(&store_id, "alice").await.unwrap();
    let dates: Vec<_> = documents.iter().map(|d| d.document_date).collect();
    assert_eq!(dates, vec![july(3), july(2), july(1)]);
}

#[tokio::test]
async fn header_update_is_partial() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 5.0).await;
    let customer = engine
        .new_customer(&store_id, "alice", engine::ContactNew::new("Rossi"))
        .await
        .unwrap();

    let document = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "alice", DocumentKind::Sale, july(1))
                .customer(customer.id)
                .line(item_id, 1.0, None),
        )
        .await
        .unwrap();

    // Only notes: date and customer keep their values.
    let updated = engine
        .update_document_header(
            &store_id,
            document.id,
            "alice",
            DocumentHeaderPatch {
                notes: Some("corrected".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("corrected"));
    assert_eq!(updated.customer_id, Some(customer.id));
    assert_eq!(updated.document_date, july(1));

    // Explicit clear of the customer reference.
    let updated = engine
        .update_document_header(
            &store_id,
            document.id,
            "alice",
            DocumentHeaderPatch {
                document_date: Some(july(4)),
                customer_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.customer_id, None);
    assert_eq!(updated.document_date, july(4));
    assert_eq!(updated.notes.as_deref(), Some("corrected"));

    // The stock effect never changes through header updates.
    let item = engine.stock_item(&store_id, item_id, "alice").await.unwrap();
    assert_eq!(item.quantity, 4.0);
}

#[tokio::test]
async fn non_member_cannot_touch_documents() {
    let (engine, _db) = engine_with_db().await;
    let (store_id, item_id) = store_with_item(&engine, 5.0).await;

    let err = engine
        .post_document(
            PostDocumentCmd::new(&store_id, "bob", DocumentKind::Sale, july(1))
                .line(item_id, 1.0, None),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.documents(&store_id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}
