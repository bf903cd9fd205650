// ── Domain model ──

pub mod mac;
pub mod site;
pub mod station;

pub use mac::MacAddress;
pub use site::Site;
pub use station::Station;
