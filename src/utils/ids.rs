/// Random 16-character hex identifier for users and bookings.
pub fn generate_id() -> String {
    let bytes: [u8; 8] = rand::random();
    hex::encode(bytes)
}
