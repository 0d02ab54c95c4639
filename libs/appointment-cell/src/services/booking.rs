use std::sync::Arc;

use tracing::{debug, info, warn};

use doctor_cell::services::{select_slot, DoctorDirectory};
use notification_cell::models::ConfirmationRequest;
use notification_cell::services::ConfirmationNotifier;
use shared_models::auth::Session;

use crate::models::{
    AppointmentError, AppointmentRecord, BookAppointmentRequest, BookingConfirmation, BookingDraft, BookingStep,
};
use crate::services::flow::BookingFlow;
use crate::services::store::AppointmentStore;

pub fn confirmation_message(doctor_name: &str, day: &str, time: &str) -> String {
    format!(
        "Your appointment with {} on {} at {} has been confirmed.",
        doctor_name, day, time
    )
}

/// Validates, stores, then notifies. Only the store decides success; the
/// confirmation email is best effort.
pub struct AppointmentBookingService {
    store: Arc<dyn AppointmentStore>,
    notifier: Arc<dyn ConfirmationNotifier>,
    directory: DoctorDirectory,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<dyn AppointmentStore>, notifier: Arc<dyn ConfirmationNotifier>) -> Self {
        Self::with_directory(store, notifier, DoctorDirectory::new())
    }

    pub fn with_directory(
        store: Arc<dyn AppointmentStore>,
        notifier: Arc<dyn ConfirmationNotifier>,
        directory: DoctorDirectory,
    ) -> Self {
        Self {
            store,
            notifier,
            directory,
        }
    }

    pub fn directory(&self) -> &DoctorDirectory {
        &self.directory
    }

    pub async fn submit(
        &self,
        session: Option<&Session>,
        draft: &BookingDraft,
    ) -> Result<BookingConfirmation, AppointmentError> {
        let session = session.ok_or(AppointmentError::AuthenticationRequired)?;
        let slot = draft.selection.as_ref().ok_or(AppointmentError::MissingSelection)?;

        let reason = draft.reason.trim();
        if reason.is_empty() {
            return Err(AppointmentError::EmptyReason);
        }

        let record = AppointmentRecord::new(&session.user, slot, reason);
        self.store.insert_appointment(&record, &session.access_token).await?;

        info!(
            "Appointment booked for user {} with {} on {} at {}",
            session.user.id, slot.doctor_name, slot.day, slot.time
        );

        let notification_sent = self.notify(session, &record).await;

        Ok(BookingConfirmation {
            doctor_name: slot.doctor_name.clone(),
            doctor_specialty: slot.doctor_specialty.clone(),
            day: slot.day.clone(),
            time: slot.time.clone(),
            message: confirmation_message(&slot.doctor_name, &slot.day, &slot.time),
            notification_sent,
        })
    }

    /// Submits the draft held by a flow. The flow itself is left untouched.
    pub async fn submit_flow(
        &self,
        session: Option<&Session>,
        flow: &BookingFlow,
    ) -> Result<BookingConfirmation, AppointmentError> {
        if session.is_none() {
            return Err(AppointmentError::AuthenticationRequired);
        }
        flow.require_step(BookingStep::Details)?;

        self.submit(session, &flow.draft()).await
    }

    /// One-shot booking without a stored flow.
    pub async fn book(
        &self,
        session: Option<&Session>,
        request: &BookAppointmentRequest,
    ) -> Result<BookingConfirmation, AppointmentError> {
        if session.is_none() {
            return Err(AppointmentError::AuthenticationRequired);
        }

        let selection = select_slot(&self.directory, request.doctor_id, &request.day, &request.time)?;
        let draft = BookingDraft {
            selection: Some(selection),
            reason: request.reason.clone(),
        };

        self.submit(session, &draft).await
    }

    async fn notify(&self, session: &Session, record: &AppointmentRecord) -> bool {
        let Some(patient_email) = session.user.email.as_deref().filter(|email| !email.is_empty()) else {
            warn!("User {} has no email address, skipping confirmation", session.user.id);
            return false;
        };

        let request = ConfirmationRequest {
            doctor_name: record.doctor_name.clone(),
            doctor_specialty: record.doctor_specialty.clone(),
            date: record.appointment_date.clone(),
            time: record.appointment_time.clone(),
            patient_email: patient_email.to_string(),
            patient_name: session.user.display_name(),
            reason: record.reason.clone(),
        };

        match self.notifier.send_confirmation(&request, &session.access_token).await {
            Ok(()) => {
                debug!("Confirmation sent to {}", patient_email);
                true
            }
            Err(e) => {
                warn!("Error sending confirmation email: {}", e);
                false
            }
        }
    }
}
