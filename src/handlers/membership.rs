use crate::core::error::StorageError;
use crate::core::state::AppState;
use crate::models::api::{PurchaseRequest, SessionResponse};
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::debug;

/// Buy a membership for the signed-in user
///
/// POST /membership/purchase
pub async fn purchase_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PurchaseRequest>,
) -> Result<Json<SessionResponse>, StorageError> {
    match state.catalog.find_plan(&body.plan) {
        Some(plan) if plan.class_count != body.class_count => debug!(
            plan = %plan.name,
            listed = plan.class_count,
            requested = body.class_count,
            "Purchase with a class count other than the listed one"
        ),
        Some(_) => {}
        None => debug!(plan = %body.plan, "Purchase for a plan outside the catalog"),
    }

    let mut session = state.session();
    session.purchase_membership(&body.plan, body.style.as_deref(), body.class_count)?;

    Ok(Json(SessionResponse::from_session(&session)))
}
