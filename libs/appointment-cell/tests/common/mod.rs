#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use appointment_cell::models::{AppointmentError, AppointmentRecord};
use appointment_cell::services::{AppointmentBookingService, AppointmentStore};
use notification_cell::models::{ConfirmationRequest, NotificationError};
use notification_cell::services::ConfirmationNotifier;

/// Store double that records every insert and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    pub inserts: Mutex<Vec<(AppointmentRecord, String)>>,
    pub failure: Option<String>,
}

impl RecordingStore {
    pub fn failing(message: &str) -> Self {
        Self {
            inserts: Mutex::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.lock().unwrap().len()
    }

    pub fn last_record(&self) -> Option<AppointmentRecord> {
        self.inserts.lock().unwrap().last().map(|(record, _)| record.clone())
    }
}

#[async_trait]
impl AppointmentStore for RecordingStore {
    async fn insert_appointment(&self, record: &AppointmentRecord, auth_token: &str) -> Result<(), AppointmentError> {
        self.inserts
            .lock()
            .unwrap()
            .push((record.clone(), auth_token.to_string()));

        match &self.failure {
            Some(message) => Err(AppointmentError::Persistence(message.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<ConfirmationRequest>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmationNotifier for RecordingNotifier {
    async fn send_confirmation(&self, request: &ConfirmationRequest, _auth_token: &str) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(request.clone());

        if self.fail {
            return Err(NotificationError::Provider {
                status: 503,
                message: "mail relay unavailable".to_string(),
            });
        }
        Ok(())
    }
}

pub fn booking_service(
    store: &Arc<RecordingStore>,
    notifier: &Arc<RecordingNotifier>,
) -> AppointmentBookingService {
    AppointmentBookingService::new(store.clone(), notifier.clone())
}
