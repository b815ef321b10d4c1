use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDateTime;
use model::entities::patient_procedure;
use persistence::GenericDao;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{HandlerError, dao_error, not_found};
use crate::schemas::{ApiResponse, AppState};

/// Request body for recording a procedure
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateProcedureRequest {
    /// Billing code of the procedure
    #[validate(range(min = 0))]
    pub procedure_code: i32,
    /// When the procedure took place (YYYY-MM-DDTHH:MM:SS)
    pub procedure_date: NaiveDateTime,
    /// Patient the procedure was performed on; must exist
    #[validate(range(min = 1))]
    pub patient_id: i32,
}

/// Request body for updating a procedure; absent fields are left unchanged
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProcedureRequest {
    #[validate(range(min = 0))]
    pub procedure_code: Option<i32>,
    pub procedure_date: Option<NaiveDateTime>,
    #[validate(range(min = 1))]
    pub patient_id: Option<i32>,
}

/// Procedure response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcedureResponse {
    pub id: i32,
    pub procedure_code: i32,
    pub procedure_date: NaiveDateTime,
    pub patient_id: i32,
}

impl From<patient_procedure::Model> for ProcedureResponse {
    fn from(model: patient_procedure::Model) -> Self {
        Self {
            id: model.id,
            procedure_code: model.procedure_code,
            procedure_date: model.procedure_date,
            patient_id: model.patient_id,
        }
    }
}

/// Optional filters for listing procedures
#[derive(Debug, Deserialize, IntoParams)]
pub struct ProcedureQuery {
    /// Only return procedures with this code
    pub procedure_code: Option<i32>,
}

fn dao(state: &AppState) -> GenericDao<patient_procedure::Entity> {
    GenericDao::new(state.db.clone())
}

/// Record a new procedure
#[utoipa::path(
    post,
    path = "/api/v1/procedures",
    tag = "procedures",
    request_body = CreateProcedureRequest,
    responses(
        (status = 201, description = "Procedure created successfully", body = ApiResponse<ProcedureResponse>),
        (status = 400, description = "Invalid request or unknown patient", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_procedure(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateProcedureRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ProcedureResponse>>), HandlerError> {
    trace!("Entering create_procedure function");

    let new_procedure = patient_procedure::ActiveModel {
        procedure_code: Set(request.procedure_code),
        procedure_date: Set(request.procedure_date),
        patient_id: Set(request.patient_id),
        ..Default::default()
    };

    let saved = dao(&state)
        .save_or_update(new_procedure)
        .await
        .map_err(|e| dao_error(e, "Failed to create procedure"))?;

    info!(
        "Procedure {} recorded for patient {} with ID: {}",
        saved.procedure_code, saved.patient_id, saved.id
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            ProcedureResponse::from(saved),
            "Procedure created successfully",
        )),
    ))
}

/// List procedures, optionally filtered by code
#[utoipa::path(
    get,
    path = "/api/v1/procedures",
    tag = "procedures",
    params(ProcedureQuery),
    responses(
        (status = 200, description = "Procedures retrieved successfully", body = ApiResponse<Vec<ProcedureResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_procedures(
    Query(query): Query<ProcedureQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProcedureResponse>>>, HandlerError> {
    let procedures = dao(&state);
    let result = match query.procedure_code {
        Some(code) => procedures.get_by_column_equal("procedureCode", code).await,
        None => procedures.get_all().await,
    }
    .map_err(|e| dao_error(e, "Failed to retrieve procedures"))?;

    debug!("Retrieved {} procedures", result.len());
    Ok(Json(ApiResponse::ok(
        result.into_iter().map(ProcedureResponse::from).collect(),
        "Procedures retrieved successfully",
    )))
}

/// Get a specific procedure by ID
#[utoipa::path(
    get,
    path = "/api/v1/procedures/{procedure_id}",
    tag = "procedures",
    params(
        ("procedure_id" = i32, Path, description = "Procedure ID"),
    ),
    responses(
        (status = 200, description = "Procedure retrieved successfully", body = ApiResponse<ProcedureResponse>),
        (status = 404, description = "Procedure not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_procedure(
    Path(procedure_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProcedureResponse>>, HandlerError> {
    match dao(&state).get_by_id(procedure_id).await {
        Ok(Some(model)) => Ok(Json(ApiResponse::ok(
            ProcedureResponse::from(model),
            "Procedure retrieved successfully",
        ))),
        Ok(None) => {
            warn!("Procedure with ID {} not found", procedure_id);
            Err(not_found("Procedure", procedure_id))
        }
        Err(e) => Err(dao_error(e, "Failed to retrieve procedure")),
    }
}

/// Update a procedure
#[utoipa::path(
    put,
    path = "/api/v1/procedures/{procedure_id}",
    tag = "procedures",
    params(
        ("procedure_id" = i32, Path, description = "Procedure ID"),
    ),
    request_body = UpdateProcedureRequest,
    responses(
        (status = 200, description = "Procedure updated successfully", body = ApiResponse<ProcedureResponse>),
        (status = 404, description = "Procedure not found", body = crate::schemas::ErrorResponse),
        (status = 400, description = "Invalid request or unknown patient", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_procedure(
    Path(procedure_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateProcedureRequest>>,
) -> Result<Json<ApiResponse<ProcedureResponse>>, HandlerError> {
    let procedures = dao(&state);
    let existing = procedures
        .get_by_id(procedure_id)
        .await
        .map_err(|e| dao_error(e, "Failed to look up procedure"))?
        .ok_or_else(|| {
            warn!("Procedure with ID {} not found for update", procedure_id);
            not_found("Procedure", procedure_id)
        })?;

    let mut active: patient_procedure::ActiveModel = existing.into();
    if let Some(code) = request.procedure_code {
        active.procedure_code = Set(code);
    }
    if let Some(date) = request.procedure_date {
        active.procedure_date = Set(date);
    }
    if let Some(patient_id) = request.patient_id {
        active.patient_id = Set(patient_id);
    }

    let updated = procedures
        .save_or_update(active)
        .await
        .map_err(|e| dao_error(e, "Failed to update procedure"))?;

    info!("Procedure with ID {} updated successfully", procedure_id);
    Ok(Json(ApiResponse::ok(
        ProcedureResponse::from(updated),
        "Procedure updated successfully",
    )))
}

/// Delete a procedure
#[utoipa::path(
    delete,
    path = "/api/v1/procedures/{procedure_id}",
    tag = "procedures",
    params(
        ("procedure_id" = i32, Path, description = "Procedure ID"),
    ),
    responses(
        (status = 200, description = "Procedure deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Procedure not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_procedure(
    Path(procedure_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    let procedures = dao(&state);
    let existing = procedures
        .get_by_id(procedure_id)
        .await
        .map_err(|e| dao_error(e, "Failed to look up procedure"))?
        .ok_or_else(|| {
            warn!("Procedure with ID {} not found for deletion", procedure_id);
            not_found("Procedure", procedure_id)
        })?;

    procedures
        .delete(existing)
        .await
        .map_err(|e| dao_error(e, "Failed to delete procedure"))?;

    info!("Procedure with ID {} deleted successfully", procedure_id);
    Ok(Json(ApiResponse::ok(
        format!("Procedure {} deleted", procedure_id),
        "Procedure deleted successfully",
    )))
}
