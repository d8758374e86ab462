use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    DonorType, FieldDescriptor, FieldInputs, FormSession, OpenDonations, RecordRef, RowFields,
};
use super::gateway::{CandidateLoader, NotificationGateway};
use super::selection::{DonationSelection, SelectionState};
use super::service::{GiftEntryError, GiftEntryService};

/// Everything the form knows at the moment the operator presses save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowSubmissionRequest {
    pub batch_id: RecordRef,
    pub donor_type: DonorType,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub inputs: FieldInputs,
    #[serde(default)]
    pub row: RowFields,
    #[serde(default)]
    pub selection: SelectionState,
}

impl RowSubmissionRequest {
    pub fn into_session(self) -> (FormSession, RowFields) {
        let session = FormSession {
            batch_id: self.batch_id,
            donor_type: self.donor_type,
            fields: self.fields,
            inputs: self.inputs,
            donation: DonationSelection::with_selection(self.selection),
        };
        (session, self.row)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenDonationsRequest {
    pub donor_id: RecordRef,
    pub donor_type: DonorType,
}

/// Router builder exposing row preparation and candidate lookup.
pub fn gift_entry_router<L, N>(service: Arc<GiftEntryService<L, N>>) -> Router
where
    L: CandidateLoader + 'static,
    N: NotificationGateway + 'static,
{
    Router::new()
        .route("/api/v1/gift-entry/rows", post(prepare_row_handler::<L, N>))
        .route(
            "/api/v1/gift-entry/open-donations",
            post(open_donations_handler::<L, N>),
        )
        .with_state(service)
}

pub(crate) async fn prepare_row_handler<L, N>(
    State(service): State<Arc<GiftEntryService<L, N>>>,
    axum::Json(request): axum::Json<RowSubmissionRequest>,
) -> Response
where
    L: CandidateLoader + 'static,
    N: NotificationGateway + 'static,
{
    let (session, raw) = request.into_session();
    match service.prepare_row(&session, raw) {
        Ok(row) => (StatusCode::OK, axum::Json(json!({ "row": row }))).into_response(),
        Err(GiftEntryError::Validation(failure)) => {
            let payload = json!({
                "error": service
                    .config()
                    .messages
                    .required_fields_message(&failure.missing_fields),
                "missing_fields": failure.missing_fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other),
    }
}

pub(crate) async fn open_donations_handler<L, N>(
    State(service): State<Arc<GiftEntryService<L, N>>>,
    axum::Json(request): axum::Json<OpenDonationsRequest>,
) -> Response
where
    L: CandidateLoader + 'static,
    N: NotificationGateway + 'static,
{
    let mut donation = DonationSelection::new();
    let ticket = donation.begin_load();
    let pending = service
        .fetch_open_donations(ticket, &request.donor_id, request.donor_type)
        .await;
    match service.finish_load(&mut donation, pending) {
        Ok(_) => {
            let donations = OpenDonations {
                open_opportunities: donation.open_opportunities().to_vec(),
                unpaid_payments: donation.unpaid_payments().to_vec(),
            };
            (StatusCode::OK, axum::Json(donations)).into_response()
        }
        Err(error @ GiftEntryError::CandidateLoad(_)) => {
            error_response(StatusCode::BAD_GATEWAY, &error)
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &other),
    }
}

fn error_response(status: StatusCode, error: &GiftEntryError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
