use crate::handlers::{
    health::health_check,
    patients::{
        create_patient, delete_patient, get_patient, get_patient_procedures, get_patients,
        update_patient,
    },
    procedures::{
        create_procedure, delete_procedure, get_procedure, get_procedures, update_procedure,
    },
    users::{get_user, get_user_roles, get_users},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Patient CRUD routes
        .route("/api/v1/patients", post(create_patient))
        .route("/api/v1/patients", get(get_patients))
        .route("/api/v1/patients/:patient_id", get(get_patient))
        .route("/api/v1/patients/:patient_id", put(update_patient))
        .route("/api/v1/patients/:patient_id", delete(delete_patient))
        .route(
            "/api/v1/patients/:patient_id/procedures",
            get(get_patient_procedures),
        )
        // Procedure CRUD routes
        .route("/api/v1/procedures", post(create_procedure))
        .route("/api/v1/procedures", get(get_procedures))
        .route("/api/v1/procedures/:procedure_id", get(get_procedure))
        .route("/api/v1/procedures/:procedure_id", put(update_procedure))
        .route("/api/v1/procedures/:procedure_id", delete(delete_procedure))
        // Users are read-only over HTTP
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id/roles", get(get_user_roles))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
