use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::auth::Session;
use shared_models::error::AppError;

use crate::models::{
    BookAppointmentRequest, BookingConfirmation, BookingFlowView, NavigateRequest, SelectSlotRequest,
    SubmitFlowResponse, UpdateReasonRequest, UpdateSearchRequest,
};
use crate::router::AppointmentState;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), AppError> {
    debug!("One-shot booking for user {} with doctor {}", session.user.id, request.doctor_id);

    let confirmation = state.booking.book(Some(&session), &request).await?;

    Ok((StatusCode::CREATED, Json(confirmation)))
}

#[axum::debug_handler]
pub async fn create_flow(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
) -> Result<(StatusCode, Json<BookingFlowView>), AppError> {
    let flow = state.flows.create(&session.user.id).await;

    Ok((StatusCode::CREATED, Json(flow.view(state.booking.directory()))))
}

#[axum::debug_handler]
pub async fn get_flow(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
    Path(flow_id): Path<Uuid>,
) -> Result<Json<BookingFlowView>, AppError> {
    let flow = state.flows.get(flow_id, &session.user.id).await?;

    Ok(Json(flow.view(state.booking.directory())))
}

#[axum::debug_handler]
pub async fn update_search(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
    Path(flow_id): Path<Uuid>,
    Json(request): Json<UpdateSearchRequest>,
) -> Result<Json<BookingFlowView>, AppError> {
    let directory = state.booking.directory();

    let view = state
        .flows
        .update(flow_id, &session.user.id, |flow| {
            flow.update_search(request.specialty, request.name);
            Ok(flow.view(directory))
        })
        .await?;

    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn navigate_flow(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
    Path(flow_id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<BookingFlowView>, AppError> {
    let directory = state.booking.directory();

    let view = state
        .flows
        .update(flow_id, &session.user.id, |flow| {
            flow.go_to(request.step, directory)?;
            Ok(flow.view(directory))
        })
        .await?;

    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn select_slot(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
    Path(flow_id): Path<Uuid>,
    Json(request): Json<SelectSlotRequest>,
) -> Result<Json<BookingFlowView>, AppError> {
    let directory = state.booking.directory();

    let view = state
        .flows
        .update(flow_id, &session.user.id, |flow| {
            flow.select_slot(directory, request.doctor_id, &request.day, &request.time)?;
            Ok(flow.view(directory))
        })
        .await?;

    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn update_reason(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
    Path(flow_id): Path<Uuid>,
    Json(request): Json<UpdateReasonRequest>,
) -> Result<Json<BookingFlowView>, AppError> {
    let directory = state.booking.directory();

    let view = state
        .flows
        .update(flow_id, &session.user.id, |flow| {
            flow.set_reason(&request.reason)?;
            Ok(flow.view(directory))
        })
        .await?;

    Ok(Json(view))
}

/// Books the flow's draft. The flow resets to an empty search only once the
/// appointment is stored; on failure it keeps everything the user entered.
/// `flow` is absent when the flow was discarded while the booking was saved.
#[axum::debug_handler]
pub async fn submit_flow(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
    Path(flow_id): Path<Uuid>,
) -> Result<Json<SubmitFlowResponse>, AppError> {
    let flow = state.flows.get(flow_id, &session.user.id).await?;

    let confirmation = state.booking.submit_flow(Some(&session), &flow).await?;

    info!("Booking flow {} submitted", flow_id);

    // Already stored; a missing flow only loses the reset.
    let directory = state.booking.directory();
    let view = match state
        .flows
        .update(flow_id, &session.user.id, |flow| {
            flow.reset();
            Ok(flow.view(directory))
        })
        .await
    {
        Ok(view) => Some(view),
        Err(e) => {
            warn!("Could not reset booking flow {} after submit: {}", flow_id, e);
            None
        }
    };

    Ok(Json(SubmitFlowResponse {
        confirmation,
        flow: view,
    }))
}

#[axum::debug_handler]
pub async fn delete_flow(
    State(state): State<Arc<AppointmentState>>,
    Extension(session): Extension<Session>,
    Path(flow_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.flows.remove(flow_id, &session.user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
