use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::TicketExt,
    dtos::{
        FilterTicketDto, Response, SubmitTicketDto, TicketCreatedDto, TicketData,
        TicketListResponseDto, TicketQueryDto, TicketResponseDto, UpdateTicketDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::{ticketmodel::TicketCategory, usermodel::UserRole},
    AppState,
};

// Submissions carry video, so the default 2 MB body limit is far too small.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Public routes: the submission form posts here without an account.
pub fn support_handler() -> Router {
    Router::new().route(
        "/tickets",
        post(submit_ticket).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
}

/// Auth-gated routes: board and detail reads, triage updates.
pub fn support_query_handler() -> Router {
    Router::new()
        .route("/tickets", get(list_tickets).patch(update_ticket))
        .route("/tickets/:ticket_id", get(get_ticket))
}

pub async fn submit_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let mut form = SubmitTicketDto::default();
    let mut video: Option<(String, Bytes)> = None;
    let mut screenshots: Vec<(String, Bytes)> = Vec::new();

    // Buffer the whole form first: nothing is written to disk or the
    // database until the draft has passed validation.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "clientName" => {
                form.client_name = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
            }
            "clientEmail" => {
                form.client_email = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
            }
            "clientPhone" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
                if !value.trim().is_empty() {
                    form.client_phone = Some(value);
                }
            }
            "category" => {
                form.category = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
            }
            "message" => {
                form.message = field
                    .text()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
            }
            "video" => {
                let filename = field.file_name().unwrap_or("video").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
                if !bytes.is_empty() {
                    video = Some((filename, bytes));
                }
            }
            "screenshots" => {
                let filename = field.file_name().unwrap_or("screenshot").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| HttpError::bad_request(e.to_string()))?;
                if !bytes.is_empty() {
                    screenshots.push((filename, bytes));
                }
            }
            _ => {}
        }
    }

    form.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let category = TicketCategory::parse(&form.category)
        .ok_or_else(|| HttpError::bad_request("Invalid category"))?;

    // Attachments are stored before the record references them; any failure
    // aborts the submission with no ticket written. Already-stored files are
    // left behind as orphans.
    let mut video_url: Option<String> = None;
    if let Some((filename, bytes)) = video {
        let url = app_state
            .attachments
            .store(&filename, &bytes)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        video_url = Some(url);
    }

    let mut screenshot_urls = Vec::with_capacity(screenshots.len());
    for (filename, bytes) in screenshots {
        let url = app_state
            .attachments
            .store(&filename, &bytes)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        screenshot_urls.push(url);
    }

    let ticket = app_state
        .db_client
        .save_ticket(
            form.client_name,
            form.client_email,
            form.client_phone,
            category,
            form.message,
            video_url,
            screenshot_urls,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("ticket {} submitted by {}", ticket.id, ticket.client_email);

    Ok((
        StatusCode::CREATED,
        Json(TicketCreatedDto {
            status: "success".to_string(),
            ticket_id: ticket.id.to_string(),
        }),
    ))
}

pub async fn list_tickets(
    Query(query_params): Query<TicketQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let tickets = match auth.user.role {
        UserRole::Developer => match &query_params.email {
            Some(email) => app_state
                .db_client
                .get_client_tickets(email)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?,
            None => app_state
                .db_client
                .get_tickets()
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?,
        },
        UserRole::Client => {
            // Clients only ever see their own tickets.
            if let Some(email) = &query_params.email {
                if email != &auth.user.email {
                    return Err(HttpError::unauthorized(
                        ErrorMessage::PermissionDenied.to_string(),
                    ));
                }
            }
            app_state
                .db_client
                .get_client_tickets(&auth.user.email)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?
        }
    };

    let results = tickets.len() as i64;

    Ok(Json(TicketListResponseDto {
        status: "success".to_string(),
        tickets: FilterTicketDto::filter_tickets(&tickets),
        results,
    }))
}

pub async fn get_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .db_client
        .get_ticket(ticket_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::TicketNotFound.to_string()))?;

    if auth.user.role == UserRole::Client && ticket.client_email != auth.user.email {
        return Err(HttpError::unauthorized(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    Ok(Json(TicketResponseDto {
        status: "success".to_string(),
        data: TicketData {
            ticket: FilterTicketDto::filter_ticket(&ticket),
        },
    }))
}

pub async fn update_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    // Only developers triage the board.
    if auth.user.role != UserRole::Developer {
        return Err(HttpError::unauthorized(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    // The status value is written verbatim: the board decides what moves
    // where, the server only records it.
    let ticket = app_state
        .db_client
        .update_ticket(body.id, body.status, body.assigned_to)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::TicketNotFound.to_string()))?;

    tracing::info!(
        "ticket {} moved to {} (assigned: {})",
        ticket.id,
        ticket.status,
        ticket.assigned_to.as_deref().unwrap_or("-")
    );

    Ok(Json(Response {
        status: "success",
        message: "Ticket updated successfully".to_string(),
    }))
}
