use crate::models::booking::Booking;

/// Reservations made during the current session. Held in memory only.
#[derive(Debug, Default)]
pub struct BookingList {
    bookings: Vec<Booking>,
}

impl BookingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a booking. Overlapping slots are not detected.
    pub fn add_booking(&mut self, booking: Booking) {
        self.bookings.push(booking);
    }

    /// Remove the first booking with `id`. Unknown ids are a no-op.
    pub fn cancel_booking(&mut self, id: &str) -> Option<Booking> {
        let index = self.bookings.iter().position(|booking| booking.id == id)?;
        Some(self.bookings.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn clear(&mut self) {
        self.bookings.clear();
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}
