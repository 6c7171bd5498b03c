use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, patch, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{contacts, documents, groups, memberships, stock, stores, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/stores", post(stores::create).get(stores::list))
        .route(
            "/stores/{store_id}",
            get(stores::get).put(stores::update).delete(stores::remove),
        )
        .route(
            "/stores/{store_id}/members",
            get(memberships::list).post(memberships::upsert),
        )
        .route(
            "/stores/{store_id}/members/{username}",
            delete(memberships::remove),
        )
        .route(
            "/stores/{store_id}/groups",
            get(groups::list).post(groups::create),
        )
        .route(
            "/stores/{store_id}/groups/{group_id}",
            put(groups::update).delete(groups::remove),
        )
        .route(
            "/stores/{store_id}/stock",
            get(stock::list).post(stock::create),
        )
        .route(
            "/stores/{store_id}/stock/{item_id}",
            get(stock::get).put(stock::update).delete(stock::remove),
        )
        .route(
            "/stores/{store_id}/stock/{item_id}/image",
            post(stock::set_image),
        )
        .route(
            "/stores/{store_id}/customers",
            get(contacts::customer_list).post(contacts::customer_create),
        )
        .route(
            "/stores/{store_id}/customers/{customer_id}",
            get(contacts::customer_get)
                .put(contacts::customer_update)
                .delete(contacts::customer_remove),
        )
        .route(
            "/stores/{store_id}/suppliers",
            get(contacts::supplier_list).post(contacts::supplier_create),
        )
        .route(
            "/stores/{store_id}/suppliers/{supplier_id}",
            get(contacts::supplier_get)
                .put(contacts::supplier_update)
                .delete(contacts::supplier_remove),
        )
        .route(
            "/stores/{store_id}/documents",
            get(documents::list).post(documents::post_new),
        )
        .route(
            "/stores/{store_id}/documents/{document_id}",
            get(documents::get).patch(documents::update_header),
        )
        .route(
            "/stores/{store_id}/documents/{document_id}/cancel",
            post(documents::cancel),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use base64::Engine as _;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("connect in-memory db");
        migration::Migrator::up(&db, None).await.expect("migrate");
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "INSERT INTO users (username, password) VALUES (?, ?);",
            vec!["alice".into(), "password".into()],
        ))
        .await
        .expect("seed user");

        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .expect("build engine");
        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    fn basic_auth(username: &str, password: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        format!("Basic {encoded}")
    }

    fn authed(method: &str, uri: &str, body: serde_json::Value) -> HttpRequest<Body> {
        HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth("alice", "password"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request")
    }

    async fn json_body(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.expect("read body").to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn missing_auth_is_401() {
        let app = test_router().await;
        let res = app
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/stores")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = test_router().await;
        let res = app
            .oneshot(
                HttpRequest::builder()
                    .method("GET")
                    .uri("/stores")
                    .header(header::AUTHORIZATION, basic_auth("alice", "nope"))
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn post_document_moves_stock() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(authed(
                "POST",
                "/stores",
                serde_json::json!({"name": "Main", "address": null}),
            ))
            .await
            .expect("create store");
        assert_eq!(res.status(), StatusCode::CREATED);
        let store = json_body(res).await;
        let store_id = store["id"].as_str().expect("store id").to_string();

        let res = app
            .clone()
            .oneshot(authed(
                "POST",
                &format!("/stores/{store_id}/stock"),
                serde_json::json!({"name": "Bolts", "quantity": 5.0}),
            ))
            .await
            .expect("create item");
        assert_eq!(res.status(), StatusCode::CREATED);
        let item = json_body(res).await;
        let item_id = item["id"].as_str().expect("item id").to_string();

        let res = app
            .clone()
            .oneshot(authed(
                "POST",
                &format!("/stores/{store_id}/documents"),
                serde_json::json!({
                    "kind": "sale",
                    "document_date": "2026-07-01",
                    "lines": [{"item_id": item_id, "quantity": 3.0, "unit_price": 1.5}]
                }),
            ))
            .await
            .expect("post document");
        assert_eq!(res.status(), StatusCode::CREATED);
        let document = json_body(res).await;
        assert_eq!(document["status"], "open");
        let document_id = document["id"].as_str().expect("document id").to_string();

        let res = app
            .clone()
            .oneshot(authed(
                "GET",
                &format!("/stores/{store_id}/stock/{item_id}"),
                serde_json::json!({}),
            ))
            .await
            .expect("get item");
        let item = json_body(res).await;
        assert_eq!(item["quantity"], 2.0);

        let res = app
            .clone()
            .oneshot(authed(
                "POST",
                &format!("/stores/{store_id}/documents/{document_id}/cancel"),
                serde_json::json!({}),
            ))
            .await
            .expect("cancel document");
        assert_eq!(res.status(), StatusCode::OK);
        let cancelled = json_body(res).await;
        assert_eq!(cancelled["status"], "cancelled");

        let res = app
            .oneshot(authed(
                "GET",
                &format!("/stores/{store_id}/stock/{item_id}"),
                serde_json::json!({}),
            ))
            .await
            .expect("get item");
        let item = json_body(res).await;
        assert_eq!(item["quantity"], 5.0);
    }

    #[tokio::test]
    async fn empty_document_is_422() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(authed(
                "POST",
                "/stores",
                serde_json::json!({"name": "Main"}),
            ))
            .await
            .expect("create store");
        let store = json_body(res).await;
        let store_id = store["id"].as_str().expect("store id").to_string();

        let res = app
            .oneshot(authed(
                "POST",
                &format!("/stores/{store_id}/documents"),
                serde_json::json!({
                    "kind": "purchase",
                    "document_date": "2026-07-01",
                    "lines": []
                }),
            ))
            .await
            .expect("post document");
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_store_is_404() {
        let app = test_router().await;
        let res = app
            .oneshot(authed("GET", "/stores/nope", serde_json::json!({})))
            .await
            .expect("request");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
