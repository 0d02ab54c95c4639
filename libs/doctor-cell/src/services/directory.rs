use std::borrow::Cow;
use std::sync::LazyLock;

use tracing::debug;

use crate::models::{DayAvailability, Doctor, DoctorError, DoctorSearchFilters};

const WEEKDAY_MORNING_AND_AFTERNOON: [&str; 5] = ["9:00 AM", "10:00 AM", "11:00 AM", "2:00 PM", "3:00 PM"];
const EARLY_START: [&str; 5] = ["8:00 AM", "9:00 AM", "10:00 AM", "1:00 PM", "2:00 PM"];

static DOCTORS: LazyLock<Vec<Doctor>> = LazyLock::new(|| {
    vec![
        Doctor {
            id: 1,
            name: "Dr. Sarah Johnson".to_string(),
            specialty: "Cardiologist".to_string(),
            image: "https://images.unsplash.com/photo-1594824476967-48c8b964273f?ixlib=rb-4.0.3&auto=format&fit=crop&w=987&q=80".to_string(),
            rating: 4.8,
            availability: vec![
                DayAvailability::new("Monday", &WEEKDAY_MORNING_AND_AFTERNOON),
                DayAvailability::new("Wednesday", &WEEKDAY_MORNING_AND_AFTERNOON),
                DayAvailability::new("Friday", &WEEKDAY_MORNING_AND_AFTERNOON),
            ],
        },
        Doctor {
            id: 2,
            name: "Dr. James Williams".to_string(),
            specialty: "Neurologist".to_string(),
            image: "https://images.unsplash.com/photo-1612349317150-e413f6a5b16d?ixlib=rb-4.0.3&auto=format&fit=crop&w=2940&q=80".to_string(),
            rating: 4.9,
            availability: vec![
                DayAvailability::new("Tuesday", &EARLY_START),
                DayAvailability::new("Thursday", &EARLY_START),
            ],
        },
        Doctor {
            id: 3,
            name: "Dr. Emily Rodriguez".to_string(),
            specialty: "Pediatrician".to_string(),
            image: "https://images.unsplash.com/photo-1559839734-2b71ea197ec2?ixlib=rb-4.0.3&auto=format&fit=crop&w=2940&q=80".to_string(),
            rating: 4.7,
            availability: vec![
                DayAvailability::new("Monday", &EARLY_START),
                DayAvailability::new("Wednesday", &EARLY_START),
                DayAvailability::new("Friday", &EARLY_START),
            ],
        },
    ]
});

/// Case-insensitive substring match; an empty or absent filter matches everything.
/// The filter is taken as typed, whitespace included.
pub fn matches_filter(value: &str, filter: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Read-only doctor directory. Backed by the built-in list unless a test
/// supplies its own.
#[derive(Debug, Clone)]
pub struct DoctorDirectory {
    doctors: Cow<'static, [Doctor]>,
}

impl Default for DoctorDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self {
            doctors: Cow::Borrowed(DOCTORS.as_slice()),
        }
    }

    pub fn with_doctors(doctors: Vec<Doctor>) -> Self {
        Self {
            doctors: Cow::Owned(doctors),
        }
    }

    pub fn all(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn get(&self, doctor_id: u32) -> Result<&Doctor, DoctorError> {
        self.doctors
            .iter()
            .find(|doctor| doctor.id == doctor_id)
            .ok_or(DoctorError::NotFound(doctor_id))
    }

    /// Specialty and name filters are AND-combined, directory order is kept.
    pub fn search(&self, filters: &DoctorSearchFilters) -> Vec<&Doctor> {
        let results: Vec<&Doctor> = self
            .doctors
            .iter()
            .filter(|doctor| {
                matches_filter(&doctor.specialty, filters.specialty.as_deref())
                    && matches_filter(&doctor.name, filters.name.as_deref())
            })
            .collect();

        debug!(
            "Doctor search specialty={:?} name={:?} matched {}",
            filters.specialty, filters.name, results.len()
        );

        results
    }
}
