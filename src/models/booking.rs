use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A reserved class slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    /// Time slot label, e.g. "18:00 - 19:30"
    pub time: String,
    pub weekday: String,
    pub class_name: String,
    pub instructor: String,
}

/// Booking details submitted by the caller; the id is assigned on confirmation
#[derive(Clone, Debug, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub time: String,
    pub weekday: String,
    pub class_name: String,
    pub instructor: String,
}

impl BookingRequest {
    pub fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            date: self.date,
            time: self.time,
            weekday: self.weekday,
            class_name: self.class_name,
            instructor: self.instructor,
        }
    }
}
