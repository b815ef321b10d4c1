use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::patients::{CreatePatientRequest, PatientResponse, UpdatePatientRequest};
use crate::handlers::procedures::{
    CreateProcedureRequest, ProcedureResponse, UpdateProcedureRequest,
};
use crate::handlers::users::{RoleResponse, UserResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection every DAO is built from
    pub db: DatabaseConnection,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: &str) -> Self {
        Self {
            data,
            message: message.to_string(),
            success: true,
        }
    }
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::patients::create_patient,
        crate::handlers::patients::get_patients,
        crate::handlers::patients::get_patient,
        crate::handlers::patients::update_patient,
        crate::handlers::patients::delete_patient,
        crate::handlers::patients::get_patient_procedures,
        crate::handlers::procedures::create_procedure,
        crate::handlers::procedures::get_procedures,
        crate::handlers::procedures::get_procedure,
        crate::handlers::procedures::update_procedure,
        crate::handlers::procedures::delete_procedure,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::get_user_roles,
    ),
    components(
        schemas(
            ApiResponse<PatientResponse>,
            ApiResponse<Vec<PatientResponse>>,
            ApiResponse<ProcedureResponse>,
            ApiResponse<Vec<ProcedureResponse>>,
            ApiResponse<UserResponse>,
            ApiResponse<Vec<UserResponse>>,
            ApiResponse<Vec<RoleResponse>>,
            ErrorResponse,
            HealthResponse,
            CreatePatientRequest,
            UpdatePatientRequest,
            PatientResponse,
            CreateProcedureRequest,
            UpdateProcedureRequest,
            ProcedureResponse,
            UserResponse,
            RoleResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "patients", description = "Patient records"),
        (name = "procedures", description = "Procedures recorded for patients"),
        (name = "users", description = "Staff users and their roles"),
    ),
    info(
        title = "clinicrecords API",
        description = "Clinical records store: patients, procedures, users and roles",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
