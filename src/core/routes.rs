// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::handlers::health::health_handler))

        // Session and account
        .route("/session", get(crate::handlers::auth::session_handler))
        .route("/auth/login", post(crate::handlers::auth::login_handler))
        .route("/auth/register", post(crate::handlers::auth::register_handler))
        .route("/auth/logout", post(crate::handlers::auth::logout_handler))
        .route("/profile", patch(crate::handlers::profile::update_profile_handler))
        .route("/membership/purchase", post(crate::handlers::membership::purchase_handler))

        // Bookings
        .route(
            "/bookings",
            get(crate::handlers::bookings::list_bookings_handler)
                .post(crate::handlers::bookings::book_class_handler),
        )
        .route("/bookings/{id}", delete(crate::handlers::bookings::cancel_booking_handler))

        // Catalog
        .route("/catalog/plans", get(crate::handlers::catalog::plans_handler))
        .route("/catalog/classes", get(crate::handlers::catalog::classes_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::startup::build_state;
    use crate::models::api::{BookingsResponse, SessionResponse};
    use crate::models::booking::Booking;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_router() -> Router {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080
            [storage]
            backend = "memory"
            [logging]
            "#,
        )
        .unwrap();

        build_router(Arc::new(build_state(&config).unwrap()))
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    async fn register_anna(router: &Router) {
        let (status, _) = send(
            router,
            Method::POST,
            "/auth/register",
            Some(json!({"name": "Anna", "email": "a@x.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_session_starts_anonymous() {
        let router = create_test_router();
        let (status, body) = send(&router, Method::GET, "/session", None).await;

        assert_eq!(status, StatusCode::OK);
        let session: SessionResponse = serde_json::from_value(body).unwrap();
        assert!(!session.authenticated);
        assert!(session.user.is_none());
    }

    #[tokio::test]
    async fn test_register_purchase_flow() {
        let router = create_test_router();
        register_anna(&router).await;

        let (_, body) = send(&router, Method::GET, "/session", None).await;
        assert!(body.get("membership_days_left").is_none());

        let (status, body) = send(
            &router,
            Method::POST,
            "/membership/purchase",
            Some(json!({"plan": "Premium", "style": "Ballet", "class_count": 16})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let membership = &body["user"]["membership"];
        assert_eq!(membership["plan"], "Premium");
        assert_eq!(membership["style"], "Ballet");
        assert_eq!(membership["remaining_classes"], 16);
        assert_eq!(membership["total_classes"], 16);
        assert_eq!(body["membership_days_left"], 30);
    }

    #[tokio::test]
    async fn test_auth_error_statuses() {
        let router = create_test_router();
        register_anna(&router).await;

        let (status, body) = send(
            &router,
            Method::POST,
            "/auth/register",
            Some(json!({"name": "Anna", "email": "a@x.com", "password": "other"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (status, _) = send(
            &router,
            Method::POST,
            "/auth/login",
            Some(json!({"email": "a@x.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &router,
            Method::POST,
            "/auth/login",
            Some(json!({"email": "b@x.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_logout_then_login() {
        let router = create_test_router();
        register_anna(&router).await;

        let (status, _) = send(&router, Method::POST, "/auth/logout", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&router, Method::GET, "/session", None).await;
        assert_eq!(body["authenticated"], false);

        let (status, body) = send(
            &router,
            Method::POST,
            "/auth/login",
            Some(json!({"email": "a@x.com", "password": "secret1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Anna");
    }

    #[tokio::test]
    async fn test_profile_update() {
        let router = create_test_router();

        let (status, body) = send(&router, Method::PATCH, "/profile", Some(json!({"name": "Ghost"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], false);

        register_anna(&router).await;
        let (_, body) = send(&router, Method::PATCH, "/profile", Some(json!({"phone": "+1 555 0100"}))).await;
        assert_eq!(body["user"]["name"], "Anna");
        assert_eq!(body["user"]["phone"], "+1 555 0100");

        let (status, body) = send(&router, Method::PATCH, "/profile", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user"]["phone"], "+1 555 0100");
    }

    #[tokio::test]
    async fn test_booking_lifecycle() {
        let router = create_test_router();
        let booking_body = json!({
            "date": "2026-10-20",
            "time": "18:00 - 19:30",
            "weekday": "Tuesday",
            "class_name": "Ballet",
            "instructor": "Elena Petrova"
        });

        let (status, _) = send(&router, Method::POST, "/bookings", Some(booking_body.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        register_anna(&router).await;
        let (status, _) = send(&router, Method::POST, "/bookings", Some(booking_body.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        send(
            &router,
            Method::POST,
            "/membership/purchase",
            Some(json!({"plan": "Basic", "class_count": 8})),
        )
        .await;

        let (status, body) = send(&router, Method::POST, "/bookings", Some(booking_body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let booking: Booking = serde_json::from_value(body).unwrap();

        let (_, body) = send(&router, Method::GET, "/bookings", None).await;
        let listed: BookingsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(listed.bookings, vec![booking.clone()]);

        let (_, body) = send(&router, Method::GET, "/session", None).await;
        assert_eq!(body["user"]["membership"]["remaining_classes"], 7);

        let (status, _) = send(&router, Method::DELETE, "/bookings/unknown", None).await;
        assert_eq!(status, StatusCode::OK);

        let uri = format!("/bookings/{}", booking.id);
        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&router, Method::GET, "/bookings", None).await;
        assert_eq!(body["bookings"], json!([]));
        let (_, body) = send(&router, Method::GET, "/session", None).await;
        assert_eq!(body["user"]["membership"]["remaining_classes"], 8);
    }

    #[tokio::test]
    async fn test_catalog_endpoints() {
        let router = create_test_router();

        let (status, body) = send(&router, Method::GET, "/catalog/plans", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[1]["name"], "Premium");

        let (_, body) = send(&router, Method::GET, "/catalog/classes", None).await;
        assert_eq!(body["classes"].as_array().unwrap().len(), 4);
        assert_eq!(body["time_slots"][0]["time"], "10:00 - 11:30");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let router = create_test_router();
        let (status, body) = send(&router, Method::GET, "/timetable", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No route for /timetable");
    }
}
