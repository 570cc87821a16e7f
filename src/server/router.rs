use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use crate::store::Store;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
}

/// Build the router for all endpoints.
pub fn build_router(store: Arc<Store>) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/products",
            get(handlers::list_products)
                .post(handlers::upsert_product)
                .delete(handlers::delete_product)
                .fallback(handlers::products_not_allowed),
        )
        .route(
            "/api/waste",
            get(handlers::list_waste)
                .post(handlers::upsert_waste)
                .delete(handlers::delete_waste)
                .fallback(handlers::waste_not_allowed),
        )
        .route(
            "/api/report",
            get(handlers::report).fallback(handlers::report_not_allowed),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SeedCatalog;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn setup() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::with_catalog(temp_dir.path().join("db.json"), SeedCatalog::empty());
        (build_router(Arc::new(store)), temp_dir)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _temp) = setup();
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], crate::version());
    }

    #[tokio::test]
    async fn product_lifecycle() {
        let (app, _temp) = setup();
        let lavash = json!({"category": "breads_dough", "name": "Lavash", "price": "5", "unit": "pcs"});

        let response = send(&app, Method::POST, "/api/products", Some(lavash.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["message"], "Product added");

        let response = send(&app, Method::POST, "/api/products", Some(lavash)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let edit = json!({
            "category": "breads_dough", "name": "Lavash", "price": 6.5, "unit": "pcs",
            "oldCategory": "breads_dough", "oldName": "Lavash"
        });
        let response = send(&app, Method::POST, "/api/products", Some(edit)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/api/products", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let listing = body_json(response).await;
        assert_eq!(listing["breads_dough"]["Lavash"], json!({"price": 6.5, "unit": "pcs"}));

        let uri = "/api/products?category=breads_dough&name=Lavash";
        assert_eq!(send(&app, Method::DELETE, uri, None).await.status(), StatusCode::OK);
        assert_eq!(
            send(&app, Method::DELETE, uri, None).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn product_errors() {
        let (app, _temp) = setup();

        let missing_unit = json!({"category": "fruits", "name": "Kiwi", "price": 1});
        let response = send(&app, Method::POST, "/api/products", Some(missing_unit)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());

        let edit = json!({
            "category": "fruits", "name": "Kiwi", "price": 1, "unit": "g",
            "oldCategory": "fruits", "oldName": "Nope"
        });
        let response = send(&app, Method::POST, "/api/products", Some(edit)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::DELETE, "/api/products?category=fruits", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::POST, "/api/products", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn waste_lifecycle() {
        let (app, _temp) = setup();
        let entry = json!({
            "date": "2024-01-01", "category": "A", "product": "X",
            "quantity": 2, "unit": "pcs", "value": 10
        });

        let response = send(&app, Method::POST, "/api/waste", Some(entry.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["message"], "Entry saved");

        let response = send(&app, Method::POST, "/api/waste", Some(entry)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let edit = json!({
            "id": "1", "date": "2024-01-01", "category": "A", "product": "X",
            "quantity": 3, "unit": "pcs", "value": 15
        });
        let response = send(&app, Method::POST, "/api/waste", Some(edit)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, Method::GET, "/api/waste?date=2024-01-01", None).await;
        let rows = body_json(response).await;
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["id"], 1);
        assert_eq!(rows[0]["value"], 15.0);

        assert_eq!(
            send(&app, Method::DELETE, "/api/waste?id=1", None).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            send(&app, Method::DELETE, "/api/waste?id=1", None).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn waste_errors() {
        let (app, _temp) = setup();

        let response = send(&app, Method::GET, "/api/waste", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::DELETE, "/api/waste", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, Method::DELETE, "/api/waste?id=abc", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let zero = json!({
            "id": "0", "date": "2024-01-01", "category": "A", "product": "X",
            "quantity": 1, "unit": "pcs", "value": 1
        });
        let response = send(&app, Method::POST, "/api/waste", Some(zero)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let edit = json!({
            "id": 9, "date": "2024-01-01", "category": "A", "product": "X",
            "quantity": 1, "unit": "pcs", "value": 1
        });
        let response = send(&app, Method::POST, "/api/waste", Some(edit)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let missing = json!({"date": "2024-01-01", "category": "A", "product": "X"});
        let response = send(&app, Method::POST, "/api/waste", Some(missing)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn report_json_and_csv() {
        let (app, _temp) = setup();
        for (date, category, product, value) in [
            ("2024-01-01", "A", "X", 10),
            ("2024-01-05", "A", "Y", 5),
            ("2024-02-01", "B", "X", 7),
        ] {
            let entry = json!({
                "date": date, "category": category, "product": product,
                "quantity": 1, "unit": "pcs", "value": value
            });
            send(&app, Method::POST, "/api/waste", Some(entry)).await;
        }

        let response = send(
            &app,
            Method::GET,
            "/api/report?start=2024-01-01&end=2024-01-31",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let summary = body_json(response).await;
        assert_eq!(summary["byProduct"], json!({"X": 10.0, "Y": 5.0}));
        assert_eq!(summary["byCategory"], json!({"A": 15.0}));
        assert_eq!(summary["total"], 15.0);

        let response = send(&app, Method::GET, "/api/report?format=csv", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"waste_report.csv\""
        );
        let csv = body_text(response).await;
        assert!(csv.starts_with("Type,Name,Value ($)\n"));
        assert!(csv.ends_with("total,Total,22.00\n"));
    }

    #[tokio::test]
    async fn unsupported_methods() {
        let (app, _temp) = setup();

        let response = send(&app, Method::PUT, "/api/products", None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, POST, DELETE");

        let response = send(&app, Method::PATCH, "/api/waste", None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = send(&app, Method::POST, "/api/report", None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
        assert_eq!(body_json(response).await["error"], "Method Not Allowed");
    }
}
