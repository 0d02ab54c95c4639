use axum::{
    extract::{Extension, Path},
    Json,
};
use tracing::{debug, info};

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{CheckInteractionsRequest, InteractionReport, Medication, MedicationListResponse};
use crate::services::{InteractionChecker, MedicationCatalog, MedicationSelection};

#[axum::debug_handler]
pub async fn list_medications() -> Result<Json<MedicationListResponse>, AppError> {
    let catalog = MedicationCatalog::new();
    let medications = catalog.medications().to_vec();

    Ok(Json(MedicationListResponse {
        total: medications.len(),
        medications,
    }))
}

#[axum::debug_handler]
pub async fn get_medication(
    Path(medication_id): Path<u32>,
) -> Result<Json<Medication>, AppError> {
    let catalog = MedicationCatalog::new();
    let medication = catalog.get(medication_id)?;

    Ok(Json(medication.clone()))
}

#[axum::debug_handler]
pub async fn check_interactions(
    Extension(user): Extension<User>,
    Json(request): Json<CheckInteractionsRequest>,
) -> Result<Json<InteractionReport>, AppError> {
    debug!("User {} checking interactions for {:?}", user.id, request.medication_ids);

    let checker = InteractionChecker::default();

    // Re-adding an id already in the selection is a no-op.
    let selection = MedicationSelection::from_ids(request.medication_ids);
    for id in selection.ids() {
        checker.catalog().get(*id)?;
    }

    let report = checker.check(&selection);

    info!(
        "Interaction check for user {}: {} medications, {} interactions",
        user.id,
        report.medications.len(),
        report.interactions.len()
    );

    Ok(Json(report))
}
