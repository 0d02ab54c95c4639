use crate::models::{DayAvailability, Doctor, DoctorError, SlotSelection};
use crate::services::directory::DoctorDirectory;

impl Doctor {
    /// Availability for one weekday, matched case-insensitively.
    pub fn availability_on(&self, day: &str) -> Option<&DayAvailability> {
        let day = day.trim();
        self.availability
            .iter()
            .find(|entry| entry.day.eq_ignore_ascii_case(day))
    }

    pub fn has_slot(&self, day: &str, time: &str) -> bool {
        self.availability_on(day)
            .map(|entry| entry.slots.iter().any(|slot| slot == time.trim()))
            .unwrap_or(false)
    }

    pub fn total_slots(&self) -> usize {
        self.availability.iter().map(|entry| entry.slots.len()).sum()
    }
}

/// Availability, optionally narrowed to a single day. An unknown day yields
/// nothing rather than an error.
pub fn availability_for(doctor: &Doctor, day: Option<&str>) -> Vec<DayAvailability> {
    match day.map(str::trim).filter(|day| !day.is_empty()) {
        Some(day) => doctor.availability_on(day).cloned().into_iter().collect(),
        None => doctor.availability.clone(),
    }
}

/// Resolves a booking slot. The stored day and time keep the directory's
/// spelling, whatever casing the caller used.
pub fn select_slot(
    directory: &DoctorDirectory,
    doctor_id: u32,
    day: &str,
    time: &str,
) -> Result<SlotSelection, DoctorError> {
    let doctor = directory.get(doctor_id)?;

    let unavailable = || DoctorError::SlotUnavailable {
        doctor: doctor.name.clone(),
        day: day.trim().to_string(),
        time: time.trim().to_string(),
    };

    let entry = doctor.availability_on(day).ok_or_else(unavailable)?;
    let slot = entry
        .slots
        .iter()
        .find(|slot| slot.as_str() == time.trim())
        .ok_or_else(unavailable)?;

    Ok(SlotSelection {
        doctor_id: doctor.id,
        doctor_name: doctor.name.clone(),
        doctor_specialty: doctor.specialty.clone(),
        day: entry.day.clone(),
        time: slot.clone(),
    })
}
