#[cfg(test)]
mod integration_tests {
    use crate::handlers::patients::{CreatePatientRequest, UpdatePatientRequest};
    use crate::handlers::procedures::{CreateProcedureRequest, UpdateProcedureRequest};
    use crate::schemas::{ApiResponse, ErrorResponse};
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use serde_json::Value;

    async fn test_server() -> TestServer {
        let app = setup_test_app().await;
        TestServer::new(app).unwrap()
    }

    fn ids(rows: &[Value]) -> Vec<i64> {
        rows.iter().map(|row| row["id"].as_i64().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() {
        let server = test_server().await;

        let response = server.get("/api-docs/openapi.json").await;

        response.assert_status(StatusCode::OK);
        let doc: Value = response.json();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/v1/patients"));
        assert!(paths.contains_key("/api/v1/patients/{patient_id}/procedures"));
        assert!(paths.contains_key("/api/v1/procedures/{procedure_id}"));
        assert!(paths.contains_key("/api/v1/users/{user_id}/roles"));
    }

    // Patients

    #[tokio::test]
    async fn test_get_patients() {
        let server = test_server().await;

        let response = server.get("/api/v1/patients").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Patients retrieved successfully");
        assert_eq!(ids(&body.data), vec![1, 2, 3]);
        assert_eq!(body.data[0]["last_name"], "Curry");
        assert_eq!(body.data[0]["date_of_birth"], "1947-11-11");
    }

    #[tokio::test]
    async fn test_get_patient_by_id() {
        let server = test_server().await;

        let response = server.get("/api/v1/patients/2").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["first_name"], "Karen");
        assert_eq!(body.data["gender"], "F");
    }

    #[tokio::test]
    async fn test_get_patient_not_found() {
        let server = test_server().await;

        let response = server.get("/api/v1/patients/99999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "NOT_FOUND");
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_create_patient() {
        let server = test_server().await;

        let create_request = CreatePatientRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            gender: "F".to_string(),
        };

        let response = server.post("/api/v1/patients").json(&create_request).await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Patient created successfully");
        assert_eq!(body.data["id"], 4);
        assert_eq!(body.data["last_name"], "Lovelace");

        let list: ApiResponse<Vec<Value>> = server.get("/api/v1/patients").await.json();
        assert_eq!(list.data.len(), 4);
    }

    #[tokio::test]
    async fn test_create_patient_validation_error() {
        let server = test_server().await;

        let create_request = CreatePatientRequest {
            first_name: "".to_string(),
            last_name: "Nobody".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            gender: "F".to_string(),
        };

        let response = server.post("/api/v1/patients").json(&create_request).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_patient() {
        let server = test_server().await;

        let update_request = UpdatePatientRequest {
            first_name: None,
            last_name: Some("Curry-Smith".to_string()),
            date_of_birth: None,
            gender: None,
        };

        let response = server
            .put("/api/v1/patients/1")
            .json(&update_request)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.message, "Patient updated successfully");
        assert_eq!(body.data["last_name"], "Curry-Smith");
        // Untouched fields keep their stored values
        assert_eq!(body.data["first_name"], "Barney");
    }

    #[tokio::test]
    async fn test_update_patient_not_found() {
        let server = test_server().await;

        let update_request = UpdatePatientRequest {
            first_name: Some("Ghost".to_string()),
            last_name: None,
            date_of_birth: None,
            gender: None,
        };

        let response = server
            .put("/api/v1/patients/99999")
            .json(&update_request)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_patient_with_procedures_is_rejected() {
        let server = test_server().await;

        let response = server.delete("/api/v1/patients/1").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "CONSTRAINT_VIOLATION");

        // The patient is still there
        server.get("/api/v1/patients/1").await.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_patient() {
        let server = test_server().await;

        let create_request = CreatePatientRequest {
            first_name: "Temp".to_string(),
            last_name: "Patient".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 6, 30).unwrap(),
            gender: "M".to_string(),
        };
        let created: ApiResponse<Value> = server
            .post("/api/v1/patients")
            .json(&create_request)
            .await
            .json();
        let patient_id = created.data["id"].as_i64().unwrap();

        let response = server.delete(&format!("/api/v1/patients/{}", patient_id)).await;
        response.assert_status(StatusCode::OK);

        server
            .get(&format!("/api/v1/patients/{}", patient_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .delete(&format!("/api/v1/patients/{}", patient_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_patient_procedures() {
        let server = test_server().await;

        let response = server.get("/api/v1/patients/1/procedures").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(ids(&body.data), vec![1, 2, 3]);
        assert!(body.data.iter().all(|p| p["patient_id"] == 1));

        server
            .get("/api/v1/patients/99999/procedures")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    // Procedures

    #[tokio::test]
    async fn test_get_procedure_by_id() {
        let server = test_server().await;

        let response = server.get("/api/v1/procedures/1").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["procedure_code"], 97001);
        assert_eq!(body.data["patient_id"], 1);
        assert_eq!(body.data["procedure_date"], "2018-01-05T09:00:00");
    }

    #[tokio::test]
    async fn test_get_procedures() {
        let server = test_server().await;

        let response = server.get("/api/v1/procedures").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(ids(&body.data), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_get_procedures_filtered_by_code() {
        let server = test_server().await;

        let response = server
            .get("/api/v1/procedures")
            .add_query_param("procedure_code", 97001)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(ids(&body.data), vec![1, 4]);
    }

    #[tokio::test]
    async fn test_create_procedure() {
        let server = test_server().await;

        let procedure_date = NaiveDate::from_ymd_opt(2018, 2, 17)
            .unwrap()
            .and_hms_opt(10, 25, 10)
            .unwrap();
        let create_request = CreateProcedureRequest {
            procedure_code: 777777,
            procedure_date,
            patient_id: 3,
        };

        let response = server
            .post("/api/v1/procedures")
            .json(&create_request)
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.message, "Procedure created successfully");
        assert_eq!(body.data["id"], 8);
        assert_eq!(body.data["procedure_code"], 777777);

        let for_patient: ApiResponse<Vec<Value>> =
            server.get("/api/v1/patients/3/procedures").await.json();
        assert_eq!(ids(&for_patient.data), vec![6, 7, 8]);
    }

    #[tokio::test]
    async fn test_create_procedure_for_unknown_patient() {
        let server = test_server().await;

        let create_request = CreateProcedureRequest {
            procedure_code: 97001,
            procedure_date: NaiveDate::from_ymd_opt(2018, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            patient_id: 99,
        };

        let response = server
            .post("/api/v1/procedures")
            .json(&create_request)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "CONSTRAINT_VIOLATION");

        let all: ApiResponse<Vec<Value>> = server.get("/api/v1/procedures").await.json();
        assert_eq!(all.data.len(), 7);
    }

    #[tokio::test]
    async fn test_update_procedure_code() {
        let server = test_server().await;

        let update_request = UpdateProcedureRequest {
            procedure_code: Some(888888),
            procedure_date: None,
            patient_id: None,
        };

        let response = server
            .put("/api/v1/procedures/6")
            .json(&update_request)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["procedure_code"], 888888);
        assert_eq!(body.data["patient_id"], 3);

        let reread: ApiResponse<Value> = server.get("/api/v1/procedures/6").await.json();
        assert_eq!(reread.data["procedure_code"], 888888);
    }

    #[tokio::test]
    async fn test_update_procedure_not_found() {
        let server = test_server().await;

        let update_request = UpdateProcedureRequest {
            procedure_code: Some(1),
            procedure_date: None,
            patient_id: None,
        };

        let response = server
            .put("/api/v1/procedures/99999")
            .json(&update_request)
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_procedure() {
        let server = test_server().await;

        let response = server.delete("/api/v1/procedures/3").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<String> = response.json();
        assert_eq!(body.message, "Procedure deleted successfully");

        server
            .get("/api/v1/procedures/3")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        let remaining: ApiResponse<Vec<Value>> =
            server.get("/api/v1/patients/1/procedures").await.json();
        assert_eq!(ids(&remaining.data), vec![1, 2]);

        server
            .delete("/api/v1/procedures/3")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    // Users

    #[tokio::test]
    async fn test_get_users_hides_password() {
        let server = test_server().await;

        let response = server.get("/api/v1/users").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(ids(&body.data), vec![1, 2]);
        assert_eq!(body.data[0]["user_name"], "jcoyne");
        assert!(body.data.iter().all(|u| u.get("password").is_none()));
    }

    #[tokio::test]
    async fn test_get_users_by_user_name() {
        let server = test_server().await;

        let response = server
            .get("/api/v1/users")
            .add_query_param("user_name", "fhensen")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(ids(&body.data), vec![2]);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let server = test_server().await;

        server
            .get("/api/v1/users/99999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_user_roles() {
        let server = test_server().await;

        let response = server.get("/api/v1/users/1/roles").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        let role_types: Vec<&str> = body
            .data
            .iter()
            .map(|r| r["role_type"].as_str().unwrap())
            .collect();
        assert_eq!(role_types, vec!["admin", "clinician"]);
        assert!(body.data.iter().all(|r| r["user_name"] == "jcoyne"));

        server
            .get("/api/v1/users/99999/roles")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
