use axum::{
    extract::{Path, Query},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use shared_models::error::AppError;

use crate::models::{DoctorAvailabilityResponse, DoctorSearchFilters, DoctorSearchResponse, Doctor};
use crate::services::{availability_for, DoctorDirectory};

#[derive(Debug, Deserialize)]
pub struct DoctorSearchQuery {
    pub specialty: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub day: Option<String>,
}

#[axum::debug_handler]
pub async fn search_doctors(
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<DoctorSearchResponse>, AppError> {
    let directory = DoctorDirectory::new();

    let filters = DoctorSearchFilters {
        specialty: query.specialty,
        name: query.name,
    };

    let doctors: Vec<Doctor> = directory.search(&filters).into_iter().cloned().collect();

    Ok(Json(DoctorSearchResponse {
        total: doctors.len(),
        doctors,
    }))
}

#[axum::debug_handler]
pub async fn get_doctor(
    Path(doctor_id): Path<u32>,
) -> Result<Json<Doctor>, AppError> {
    let directory = DoctorDirectory::new();
    let doctor = directory.get(doctor_id)?;

    Ok(Json(doctor.clone()))
}

#[axum::debug_handler]
pub async fn get_doctor_availability(
    Path(doctor_id): Path<u32>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<DoctorAvailabilityResponse>, AppError> {
    debug!("Fetching availability for doctor {} (day: {:?})", doctor_id, query.day);

    let directory = DoctorDirectory::new();
    let doctor = directory.get(doctor_id)?;

    let availability = availability_for(doctor, query.day.as_deref());
    let total_slots = availability.iter().map(|entry| entry.slots.len()).sum();

    Ok(Json(DoctorAvailabilityResponse {
        doctor_id,
        availability,
        total_slots,
    }))
}
