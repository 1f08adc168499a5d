use crate::core::state::AppState;
use crate::models::catalog::{DanceClass, MembershipPlan, TimeSlot};
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct ClassListing {
    pub classes: Vec<DanceClass>,
    pub time_slots: Vec<TimeSlot>,
}

/// GET /catalog/plans
pub async fn plans_handler(State(state): State<Arc<AppState>>) -> Json<Vec<MembershipPlan>> {
    Json(state.catalog.plans.clone())
}

/// GET /catalog/classes
pub async fn classes_handler(State(state): State<Arc<AppState>>) -> Json<ClassListing> {
    Json(ClassListing {
        classes: state.catalog.classes.clone(),
        time_slots: state.catalog.time_slots.clone(),
    })
}
