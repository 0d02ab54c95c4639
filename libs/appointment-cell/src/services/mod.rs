pub mod booking;
pub mod flow;
pub mod registry;
pub mod store;

pub use booking::{confirmation_message, AppointmentBookingService};
pub use flow::BookingFlow;
pub use registry::FlowRegistry;
pub use store::{AppointmentStore, SupabaseAppointmentStore};
