pub mod availability;
pub mod directory;

pub use availability::{availability_for, select_slot};
pub use directory::{matches_filter, DoctorDirectory};
