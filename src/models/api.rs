use serde::{Deserialize, Serialize};

use crate::models::booking::Booking;
use crate::models::user::User;
use crate::session::store::SessionStore;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct PurchaseRequest {
    pub plan: String,
    #[serde(default)]
    pub style: Option<String>,
    pub class_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_days_left: Option<u32>,
}

impl SessionResponse {
    pub fn from_session(session: &SessionStore) -> Self {
        Self {
            authenticated: session.is_authenticated(),
            user: session.user().cloned(),
            membership_days_left: session.membership_days_left(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingsResponse {
    pub success: bool,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
