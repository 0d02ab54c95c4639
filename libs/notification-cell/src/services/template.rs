use crate::models::{ConfirmationRequest, EmailMessage};

pub const CONFIRMATION_SUBJECT: &str = "Your Appointment Has Been Confirmed";

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn render_confirmation_html(request: &ConfirmationRequest) -> String {
    format!(
        "<h1>Appointment Confirmation</h1>\
         <p>Dear {patient},</p>\
         <p>Your appointment has been successfully scheduled:</p>\
         <ul>\
         <li><strong>Doctor:</strong> {doctor}</li>\
         <li><strong>Specialty:</strong> {specialty}</li>\
         <li><strong>Date:</strong> {date}</li>\
         <li><strong>Time:</strong> {time}</li>\
         <li><strong>Reason:</strong> {reason}</li>\
         </ul>\
         <p>If you need to reschedule or cancel your appointment, please contact us.</p>\
         <p>Best regards,<br>Medical Clinic Team</p>",
        patient = escape_html(&request.patient_name),
        doctor = escape_html(&request.doctor_name),
        specialty = escape_html(&request.doctor_specialty),
        date = escape_html(&request.date),
        time = escape_html(&request.time),
        reason = escape_html(&request.reason),
    )
}

pub fn confirmation_email(request: &ConfirmationRequest, from: &str) -> EmailMessage {
    EmailMessage {
        from: from.to_string(),
        to: vec![request.patient_email.trim().to_string()],
        subject: CONFIRMATION_SUBJECT.to_string(),
        html: render_confirmation_html(request),
    }
}
