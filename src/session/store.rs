use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::config::MembershipConfig;
use crate::core::error::{AuthError, BookingError, StorageError};
use crate::models::booking::{Booking, BookingRequest};
use crate::models::credential::CredentialRecord;
use crate::models::membership::Membership;
use crate::models::user::{User, UserUpdate};
use crate::session::notifier::{notify_if_permitted, Notification, Notifier};
use crate::storage::kv::KeyValueStore;
use crate::storage::snapshot;
use crate::stores::{booking_list::BookingList, credential_registry::CredentialRegistry};
use crate::utils::auth::verify_password;
use crate::utils::ids::generate_id;
use crate::utils::time::days_until;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// The signed-in identity, its membership and its bookings.
///
/// Constructed once at startup and shared by reference. Every mutation of the
/// user is written to storage before it becomes visible in memory, so a
/// failed write leaves the session as it was.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    settings: MembershipConfig,
    clock: Clock,
    registry: CredentialRegistry,
    bookings: BookingList,
    user: Option<User>,
}

impl SessionStore {
    /// Open a session over `storage`, restoring any saved sign-in
    pub fn open(
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        settings: MembershipConfig,
    ) -> Result<Self, StorageError> {
        Self::open_with_clock(storage, notifier, settings, Arc::new(Utc::now))
    }

    pub fn open_with_clock(
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        settings: MembershipConfig,
        clock: Clock,
    ) -> Result<Self, StorageError> {
        let mut store = Self {
            storage,
            notifier,
            settings,
            clock,
            registry: CredentialRegistry::new(),
            bookings: BookingList::new(),
            user: None,
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-read the registry and the session snapshot from storage.
    ///
    /// An unreadable session snapshot is discarded and the session starts
    /// anonymous. An unreadable registry is an error.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.registry = CredentialRegistry::load(&*self.storage)?;
        self.bookings.clear();

        self.user = match snapshot::load::<User>(&*self.storage) {
            Ok(user) => user,
            Err(e @ (StorageError::Corrupt { .. } | StorageError::UnsupportedVersion { .. })) => {
                warn!(error = %e, "Discarding unreadable session snapshot");
                snapshot::clear::<User>(&*self.storage)?;
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(user) = &self.user {
            info!(user_id = %user.id, email = %user.email, "Session restored");
            self.check_membership_expiration();
        }

        Ok(())
    }

    pub fn state(&self) -> SessionState {
        if self.user.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn membership(&self) -> Option<&Membership> {
        self.user.as_ref()?.membership.as_ref()
    }

    pub fn bookings(&self) -> &[Booking] {
        self.bookings.bookings()
    }

    pub fn registry(&self) -> &CredentialRegistry {
        &self.registry
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        let Some(record) = self.registry.find_by_email(email) else {
            warn!(email = %email, "Login for unknown email");
            return Err(AuthError::NotFound);
        };

        if !verify_password(password, &record.password) {
            warn!(email = %email, "Login with wrong password");
            return Err(AuthError::InvalidCredential);
        }

        let user = record.to_user();
        snapshot::save(&*self.storage, &user)?;

        info!(user_id = %user.id, email = %user.email, "User logged in");

        self.bookings.clear();
        Ok(&*self.user.insert(user))
    }

    pub fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<String>,
    ) -> Result<&User, AuthError> {
        if self.registry.contains_email(email) {
            warn!(email = %email, "Registration for existing email");
            return Err(AuthError::AlreadyExists);
        }

        let record = CredentialRecord {
            id: generate_id(),
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            phone,
        };
        let user = record.to_user();

        self.registry.append(record, &*self.storage)?;
        if let Err(e) = snapshot::save(&*self.storage, &user) {
            if let Err(undo) = self.registry.discard(&user.id, &*self.storage) {
                error!(error = %undo, email = %email, "Could not roll back registration");
            }
            return Err(e.into());
        }

        info!(
            user_id = %user.id,
            email = %user.email,
            registered_users = self.registry.len(),
            "User registered"
        );

        self.bookings.clear();
        Ok(&*self.user.insert(user))
    }

    /// Sign out and forget the saved session. Bookings are dropped with it.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        snapshot::clear::<User>(&*self.storage)?;
        let previous = self.user.take();
        self.bookings.clear();

        if let Some(user) = previous {
            info!(user_id = %user.id, "User logged out");
        }

        Ok(())
    }

    /// Merge profile fields into the current user. No-op when anonymous.
    pub fn update_user(&mut self, update: UserUpdate) -> Result<Option<&User>, StorageError> {
        let Some(current) = &self.user else {
            debug!("Profile update ignored for anonymous session");
            return Ok(None);
        };

        if update.is_empty() {
            debug!(user_id = %current.id, "Empty profile update");
            return Ok(self.user.as_ref());
        }

        let mut updated = current.clone();
        updated.apply(update);
        snapshot::save(&*self.storage, &updated)?;

        info!(user_id = %updated.id, "Profile updated");

        Ok(Some(&*self.user.insert(updated)))
    }

    /// Replace the current membership with a fresh one. No-op when anonymous.
    ///
    /// Plan and class count are taken as given; nothing is checked against
    /// the catalog.
    pub fn purchase_membership(
        &mut self,
        plan: &str,
        style: Option<&str>,
        class_count: u32,
    ) -> Result<Option<&Membership>, StorageError> {
        let Some(current) = &self.user else {
            debug!("Membership purchase ignored for anonymous session");
            return Ok(None);
        };

        let membership = Membership::new(
            plan,
            style.map(str::to_string),
            class_count,
            (self.clock)(),
            self.settings.validity_days,
        );
        let expires_at = membership.expires_at;

        let mut updated = current.clone();
        updated.membership = Some(membership);
        snapshot::save(&*self.storage, &updated)?;

        info!(
            user_id = %updated.id,
            plan = %plan,
            style = ?style,
            class_count = class_count,
            expires_at = %expires_at,
            "Membership purchased"
        );

        self.user = Some(updated);

        notify_if_permitted(
            &*self.notifier,
            Notification {
                title: "Membership activated".to_string(),
                body: format!(
                    "Your \"{}\" membership is active until {}",
                    plan,
                    expires_at.format("%Y-%m-%d")
                ),
            },
        );

        Ok(self.membership())
    }

    /// Whole days until the membership expires, zero once it has
    pub fn membership_days_left(&self) -> Option<u32> {
        Some(self.membership()?.days_remaining((self.clock)()))
    }

    /// Warn when the membership runs out within the configured window.
    ///
    /// Returns the number of days left when a warning was issued.
    pub fn check_membership_expiration(&self) -> Option<u32> {
        let membership = self.membership()?;
        let days_left = days_until(membership.expires_at, (self.clock)());

        if days_left <= 0 || days_left > i64::from(self.settings.expiry_warning_days) {
            return None;
        }

        let days_left = days_left as u32;
        notify_if_permitted(
            &*self.notifier,
            Notification {
                title: "Membership expiring soon".to_string(),
                body: format!(
                    "Your \"{}\" membership expires in {} {}. Don't forget to renew!",
                    membership.plan,
                    days_left,
                    if days_left == 1 { "day" } else { "days" }
                ),
            },
        );

        Some(days_left)
    }

    /// Whether the membership style allows `class_name`. True without a
    /// membership, since there is nothing to restrict.
    pub fn style_matches(&self, class_name: &str) -> bool {
        self.membership()
            .map_or(true, |m| m.style_matches(class_name, &self.settings.all_styles_label))
    }

    pub fn can_book(&self, class_name: &str) -> bool {
        self.check_booking(class_name).is_ok()
    }

    fn check_booking(&self, class_name: &str) -> Result<&User, BookingError> {
        let user = self.user.as_ref().ok_or(BookingError::NotAuthenticated)?;
        let membership = user.membership.as_ref().ok_or(BookingError::NoMembership)?;

        if membership.is_expired((self.clock)()) {
            return Err(BookingError::MembershipExpired);
        }

        if !membership.has_classes_left() {
            return Err(BookingError::NoClassesRemaining);
        }

        if !membership.style_matches(class_name, &self.settings.all_styles_label) {
            return Err(BookingError::StyleMismatch {
                allowed: membership.style.clone().unwrap_or_default(),
            });
        }

        Ok(user)
    }

    /// Book a class against the membership, taking one credit.
    pub fn book_class(&mut self, request: BookingRequest) -> Result<Booking, BookingError> {
        let current = match self.check_booking(&request.class_name) {
            Ok(user) => user,
            Err(e) => {
                debug!(class = %request.class_name, error = %e, "Booking refused");
                return Err(e);
            }
        };

        let mut updated = current.clone();
        if let Some(membership) = updated.membership.as_mut() {
            membership.consume_class();
        }
        snapshot::save(&*self.storage, &updated)?;

        let remaining = updated
            .membership
            .as_ref()
            .map_or(0, |m| m.remaining_classes);
        self.user = Some(updated);

        let booking = request.into_booking(generate_id());
        self.bookings.add_booking(booking.clone());

        info!(
            booking_id = %booking.id,
            class = %booking.class_name,
            date = %booking.date,
            time = %booking.time,
            remaining_classes = remaining,
            "Class booked"
        );

        Ok(booking)
    }

    /// Cancel a booking and give its credit back. Unknown ids are a no-op.
    pub fn cancel_booking(&mut self, id: &str) -> Result<Option<Booking>, StorageError> {
        if self.bookings.get(id).is_none() {
            debug!(booking_id = %id, "Cancel for unknown booking ignored");
            return Ok(None);
        }

        if let Some(current) = &self.user {
            if current.membership.is_some() {
                let mut updated = current.clone();
                if let Some(membership) = updated.membership.as_mut() {
                    membership.refund_class();
                }
                snapshot::save(&*self.storage, &updated)?;
                self.user = Some(updated);
            }
        }

        let cancelled = self.bookings.cancel_booking(id);
        info!(booking_id = %id, "Booking cancelled");

        Ok(cancelled)
    }
}
