use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::{Doctor, DoctorError, SlotSelection};
use shared_models::auth::User;
use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStep {
    Search,
    Select,
    Details,
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStep::Search => write!(f, "search"),
            BookingStep::Select => write!(f, "select"),
            BookingStep::Details => write!(f, "details"),
        }
    }
}

/// What a submission carries: the chosen slot, if any, and the visit reason.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub selection: Option<SlotSelection>,
    pub reason: String,
}

/// Row written to the `appointments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub user_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub reason: String,
}

impl AppointmentRecord {
    pub fn new(user: &User, slot: &SlotSelection, reason: &str) -> Self {
        Self {
            user_id: user.id.clone(),
            doctor_id: slot.doctor_id.to_string(),
            doctor_name: slot.doctor_name.clone(),
            doctor_specialty: slot.doctor_specialty.clone(),
            appointment_date: slot.day.clone(),
            appointment_time: slot.time.clone(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: u32,
    pub day: String,
    pub time: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub day: String,
    pub time: String,
    pub message: String,
    pub notification_sent: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSearchRequest {
    pub specialty: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigateRequest {
    pub step: BookingStep,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectSlotRequest {
    pub doctor_id: u32,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReasonRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFlowView {
    pub id: Uuid,
    pub step: BookingStep,
    pub specialty: String,
    pub name: String,
    pub doctors: Vec<Doctor>,
    pub selection: Option<SlotSelection>,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFlowResponse {
    pub confirmation: BookingConfirmation,
    pub flow: Option<BookingFlowView>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppointmentError {
    #[error("Please sign in to book an appointment")]
    AuthenticationRequired,

    #[error("Please select a doctor, day and time")]
    MissingSelection,

    #[error("Please provide a reason for your visit")]
    EmptyReason,

    #[error("No doctors match your search criteria")]
    NoMatchingDoctors,

    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: BookingStep, to: BookingStep },

    #[error("This action is only available in the {required} step (current: {current})")]
    StepRequired { required: BookingStep, current: BookingStep },

    #[error("Doctor {0} is not among the doctors matching your search")]
    DoctorNotListed(u32),

    #[error("Booking flow {0} not found")]
    FlowNotFound(Uuid),

    #[error(transparent)]
    Doctor(#[from] DoctorError),

    /// Store failure; carries the store's own message.
    #[error("{0}")]
    Persistence(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::AuthenticationRequired => AppError::AuthenticationRequired(err.to_string()),
            AppointmentError::MissingSelection | AppointmentError::EmptyReason => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::NoMatchingDoctors
            | AppointmentError::InvalidTransition { .. }
            | AppointmentError::StepRequired { .. }
            | AppointmentError::DoctorNotListed(_) => AppError::Conflict(err.to_string()),
            AppointmentError::FlowNotFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::Doctor(doctor_err) => doctor_err.into(),
            AppointmentError::Persistence(message) => AppError::Database(message),
        }
    }
}
