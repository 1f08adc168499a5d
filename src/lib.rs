pub mod core {
    pub mod config;
    pub mod error;
    pub mod state;
    pub mod routes;
    pub mod startup;
    pub mod tracing_init;
}

pub mod models {
    pub mod api;
    pub mod booking;
    pub mod catalog;
    pub mod credential;
    pub mod membership;
    pub mod user;
}

pub mod storage {
    pub mod file;
    pub mod kv;
    pub mod snapshot;
}

pub mod stores {
    pub mod booking_list;
    pub mod credential_registry;
}

pub mod session {
    pub mod notifier;
    pub mod store;
}

pub mod handlers {
    pub mod auth;
    pub mod bookings;
    pub mod catalog;
    pub mod fallback;
    pub mod health;
    pub mod membership;
    pub mod profile;
}

pub mod utils {
    pub mod auth;
    pub mod ids;
    pub mod time;
}
