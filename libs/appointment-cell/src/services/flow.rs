use chrono::{DateTime, Utc};
use uuid::Uuid;

use doctor_cell::models::{Doctor, DoctorSearchFilters, SlotSelection};
use doctor_cell::services::{select_slot, DoctorDirectory};

use crate::models::{AppointmentError, BookingDraft, BookingFlowView, BookingStep};

/// One patient's walk through search → select → details.
///
/// The slot is only ever set together with doctor, day and time, so being in
/// `Details` always implies a complete selection.
#[derive(Debug, Clone)]
pub struct BookingFlow {
    id: Uuid,
    owner_id: String,
    step: BookingStep,
    specialty: String,
    name: String,
    selection: Option<SlotSelection>,
    reason: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingFlow {
    pub fn new(owner_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            step: BookingStep::Search,
            specialty: String::new(),
            name: String::new(),
            selection: None,
            reason: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn selection(&self) -> Option<&SlotSelection> {
        self.selection.as_ref()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn filters(&self) -> DoctorSearchFilters {
        DoctorSearchFilters::new(&self.specialty, &self.name)
    }

    pub fn matching_doctors<'a>(&self, directory: &'a DoctorDirectory) -> Vec<&'a Doctor> {
        directory.search(&self.filters())
    }

    /// Filters can change from any step; omitted fields keep their value.
    pub fn update_search(&mut self, specialty: Option<String>, name: Option<String>) {
        if let Some(specialty) = specialty {
            self.specialty = specialty;
        }
        if let Some(name) = name {
            self.name = name;
        }
        self.touch();
    }

    pub fn go_to(&mut self, step: BookingStep, directory: &DoctorDirectory) -> Result<(), AppointmentError> {
        match step {
            BookingStep::Search => {}
            BookingStep::Select => {
                if self.matching_doctors(directory).is_empty() {
                    return Err(AppointmentError::NoMatchingDoctors);
                }
            }
            BookingStep::Details => {
                if self.selection.is_none() {
                    return Err(AppointmentError::InvalidTransition {
                        from: self.step,
                        to: step,
                    });
                }
            }
        }

        self.step = step;
        self.touch();
        Ok(())
    }

    pub fn select_slot(
        &mut self,
        directory: &DoctorDirectory,
        doctor_id: u32,
        day: &str,
        time: &str,
    ) -> Result<&SlotSelection, AppointmentError> {
        self.require_step(BookingStep::Select)?;

        directory.get(doctor_id)?;
        if !self.matching_doctors(directory).iter().any(|doctor| doctor.id == doctor_id) {
            return Err(AppointmentError::DoctorNotListed(doctor_id));
        }

        let selection = select_slot(directory, doctor_id, day, time)?;

        self.step = BookingStep::Details;
        self.touch();
        Ok(self.selection.insert(selection))
    }

    pub fn set_reason(&mut self, reason: &str) -> Result<(), AppointmentError> {
        self.require_step(BookingStep::Details)?;

        self.reason = reason.to_string();
        self.touch();
        Ok(())
    }

    pub fn require_step(&self, required: BookingStep) -> Result<(), AppointmentError> {
        if self.step != required {
            return Err(AppointmentError::StepRequired {
                required,
                current: self.step,
            });
        }
        Ok(())
    }

    pub fn draft(&self) -> BookingDraft {
        BookingDraft {
            selection: self.selection.clone(),
            reason: self.reason.clone(),
        }
    }

    /// Back to an empty search after a successful booking.
    pub fn reset(&mut self) {
        self.step = BookingStep::Search;
        self.specialty.clear();
        self.name.clear();
        self.selection = None;
        self.reason.clear();
        self.touch();
    }

    pub fn view(&self, directory: &DoctorDirectory) -> BookingFlowView {
        BookingFlowView {
            id: self.id,
            step: self.step,
            specialty: self.specialty.clone(),
            name: self.name.clone(),
            doctors: self.matching_doctors(directory).into_iter().cloned().collect(),
            selection: self.selection.clone(),
            reason: self.reason.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
