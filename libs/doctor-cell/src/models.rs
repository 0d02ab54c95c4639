use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub image: String,
    pub rating: f32,
    pub availability: Vec<DayAvailability>,
}

/// Bookable slots on one weekday, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub day: String,
    pub slots: Vec<String>,
}

impl DayAvailability {
    pub fn new(day: &str, slots: &[&str]) -> Self {
        Self {
            day: day.to_string(),
            slots: slots.iter().map(|slot| slot.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSearchFilters {
    pub specialty: Option<String>,
    pub name: Option<String>,
}

impl DoctorSearchFilters {
    pub fn new(specialty: &str, name: &str) -> Self {
        Self {
            specialty: Some(specialty.to_string()),
            name: Some(name.to_string()),
        }
    }
}

/// A concrete (doctor, day, time) choice, checked against availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSelection {
    pub doctor_id: u32,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DoctorSearchResponse {
    pub doctors: Vec<Doctor>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DoctorAvailabilityResponse {
    pub doctor_id: u32,
    pub availability: Vec<DayAvailability>,
    pub total_slots: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DoctorError {
    #[error("Doctor {0} not found")]
    NotFound(u32),

    #[error("{doctor} has no {time} slot on {day}")]
    SlotUnavailable {
        doctor: String,
        day: String,
        time: String,
    },
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound(_) => AppError::NotFound(err.to_string()),
            DoctorError::SlotUnavailable { .. } => AppError::ValidationError(err.to_string()),
        }
    }
}
