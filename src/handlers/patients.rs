use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use model::entities::{patient, patient_procedure};
use persistence::GenericDao;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::procedures::ProcedureResponse;
use super::{HandlerError, dao_error, not_found};
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new patient
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreatePatientRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, max = 20))]
    pub gender: String,
}

/// Request body for updating a patient; absent fields are left unchanged
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdatePatientRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(min = 1, max = 20))]
    pub gender: Option<String>,
}

/// Patient response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
}

impl From<patient::Model> for PatientResponse {
    fn from(model: patient::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            gender: model.gender,
        }
    }
}

fn dao(state: &AppState) -> GenericDao<patient::Entity> {
    GenericDao::new(state.db.clone())
}

/// Create a new patient
#[utoipa::path(
    post,
    path = "/api/v1/patients",
    tag = "patients",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created successfully", body = ApiResponse<PatientResponse>),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_patient(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreatePatientRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<PatientResponse>>), HandlerError> {
    trace!("Entering create_patient function");

    let new_patient = patient::ActiveModel {
        first_name: Set(request.first_name),
        last_name: Set(request.last_name),
        date_of_birth: Set(request.date_of_birth),
        gender: Set(request.gender),
        ..Default::default()
    };

    let saved = dao(&state)
        .save_or_update(new_patient)
        .await
        .map_err(|e| dao_error(e, "Failed to create patient"))?;

    info!("Patient created successfully with ID: {}", saved.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            PatientResponse::from(saved),
            "Patient created successfully",
        )),
    ))
}

/// Get all patients
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    tag = "patients",
    responses(
        (status = 200, description = "Patients retrieved successfully", body = ApiResponse<Vec<PatientResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_patients(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PatientResponse>>>, HandlerError> {
    let patients = dao(&state)
        .get_all()
        .await
        .map_err(|e| dao_error(e, "Failed to retrieve patients"))?;

    debug!("Retrieved {} patients", patients.len());
    Ok(Json(ApiResponse::ok(
        patients.into_iter().map(PatientResponse::from).collect(),
        "Patients retrieved successfully",
    )))
}

/// Get a specific patient by ID
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}",
    tag = "patients",
    params(
        ("patient_id" = i32, Path, description = "Patient ID"),
    ),
    responses(
        (status = 200, description = "Patient retrieved successfully", body = ApiResponse<PatientResponse>),
        (status = 404, description = "Patient not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_patient(
    Path(patient_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PatientResponse>>, HandlerError> {
    match dao(&state).get_by_id(patient_id).await {
        Ok(Some(model)) => Ok(Json(ApiResponse::ok(
            PatientResponse::from(model),
            "Patient retrieved successfully",
        ))),
        Ok(None) => {
            warn!("Patient with ID {} not found", patient_id);
            Err(not_found("Patient", patient_id))
        }
        Err(e) => Err(dao_error(e, "Failed to retrieve patient")),
    }
}

/// Update a patient
#[utoipa::path(
    put,
    path = "/api/v1/patients/{patient_id}",
    tag = "patients",
    params(
        ("patient_id" = i32, Path, description = "Patient ID"),
    ),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated successfully", body = ApiResponse<PatientResponse>),
        (status = 404, description = "Patient not found", body = crate::schemas::ErrorResponse),
        (status = 400, description = "Invalid request", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_patient(
    Path(patient_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdatePatientRequest>>,
) -> Result<Json<ApiResponse<PatientResponse>>, HandlerError> {
    let patients = dao(&state);
    let existing = patients
        .get_by_id(patient_id)
        .await
        .map_err(|e| dao_error(e, "Failed to look up patient"))?
        .ok_or_else(|| {
            warn!("Patient with ID {} not found for update", patient_id);
            not_found("Patient", patient_id)
        })?;

    let mut active: patient::ActiveModel = existing.into();
    if let Some(first_name) = request.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = request.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(date_of_birth) = request.date_of_birth {
        active.date_of_birth = Set(date_of_birth);
    }
    if let Some(gender) = request.gender {
        active.gender = Set(gender);
    }

    let updated = patients
        .save_or_update(active)
        .await
        .map_err(|e| dao_error(e, "Failed to update patient"))?;

    info!("Patient with ID {} updated successfully", patient_id);
    Ok(Json(ApiResponse::ok(
        PatientResponse::from(updated),
        "Patient updated successfully",
    )))
}

/// Delete a patient
///
/// Patients that still have procedures cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/v1/patients/{patient_id}",
    tag = "patients",
    params(
        ("patient_id" = i32, Path, description = "Patient ID"),
    ),
    responses(
        (status = 200, description = "Patient deleted successfully", body = ApiResponse<String>),
        (status = 400, description = "Patient still has procedures", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Patient not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_patient(
    Path(patient_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    let rows = dao(&state)
        .delete_by_id(patient_id)
        .await
        .map_err(|e| dao_error(e, "Failed to delete patient"))?;

    if rows == 0 {
        warn!("Patient with ID {} not found for deletion", patient_id);
        return Err(not_found("Patient", patient_id));
    }

    info!("Patient with ID {} deleted successfully", patient_id);
    Ok(Json(ApiResponse::ok(
        format!("Patient {} deleted", patient_id),
        "Patient deleted successfully",
    )))
}

/// Get every procedure recorded for a patient
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/procedures",
    tag = "patients",
    params(
        ("patient_id" = i32, Path, description = "Patient ID"),
    ),
    responses(
        (status = 200, description = "Procedures retrieved successfully", body = ApiResponse<Vec<ProcedureResponse>>),
        (status = 404, description = "Patient not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_patient_procedures(
    Path(patient_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ProcedureResponse>>>, HandlerError> {
    let exists = dao(&state)
        .get_by_id(patient_id)
        .await
        .map_err(|e| dao_error(e, "Failed to look up patient"))?
        .is_some();
    if !exists {
        return Err(not_found("Patient", patient_id));
    }

    let procedures = GenericDao::<patient_procedure::Entity>::new(state.db.clone())
        .get_by_column_equal("patient", patient_id)
        .await
        .map_err(|e| dao_error(e, "Failed to retrieve procedures"))?;

    debug!("Patient {} has {} procedures", patient_id, procedures.len());
    Ok(Json(ApiResponse::ok(
        procedures.into_iter().map(ProcedureResponse::from).collect(),
        "Procedures retrieved successfully",
    )))
}
