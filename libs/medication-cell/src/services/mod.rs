pub mod catalog;
pub mod interaction;
pub mod selection;

pub use catalog::MedicationCatalog;
pub use interaction::{find_interactions, pair_count, InteractionChecker};
pub use selection::MedicationSelection;
