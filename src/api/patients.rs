use std::sync::Arc;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::errors::api::access::AccessError;
use crate::services::RoleGuard;
use crate::stores::PatientStore;
use crate::types::dto::patients::{CreatePatientRequest, PatientResponse};
use crate::types::internal::role::Role;

/// Registry listings are capped to keep the front desk snappy
const PATIENT_LIST_LIMIT: u64 = 200;

const PATIENT_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin1, Role::Staff];

/// Patient registry API endpoints
pub struct PatientsApi {
    guard: Arc<RoleGuard>,
    patient_store: Arc<PatientStore>,
}

impl PatientsApi {
    pub fn new(guard: Arc<RoleGuard>, patient_store: Arc<PatientStore>) -> Self {
        Self {
            guard,
            patient_store,
        }
    }
}

/// API tags for patient endpoints
#[derive(Tags)]
enum PatientTags {
    /// Patient registry
    Patients,
}

#[OpenApi(prefix_path = "/patients")]
impl PatientsApi {
    /// List registered patients, newest first
    #[oai(path = "/", method = "get", tag = "PatientTags::Patients")]
    async fn list(&self, req: &Request) -> Result<Json<Vec<PatientResponse>>, AccessError> {
        self.guard.authorize(req, PATIENT_ROLES).await?;

        let patients = self.patient_store.list(PATIENT_LIST_LIMIT).await?;

        Ok(Json(patients.into_iter().map(PatientResponse::from).collect()))
    }

    /// Register a patient
    #[oai(path = "/", method = "post", tag = "PatientTags::Patients")]
    async fn create(
        &self,
        req: &Request,
        body: Json<CreatePatientRequest>,
    ) -> Result<Json<PatientResponse>, AccessError> {
        self.guard.authorize(req, PATIENT_ROLES).await?;

        let body = body.0;
        let full_name = body.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(AccessError::bad_request("Patient name must not be empty"));
        }

        let patient = self
            .patient_store
            .create(
                full_name,
                body.phone.unwrap_or_default(),
                body.address.unwrap_or_default(),
                body.birth_date,
            )
            .await?;

        Ok(Json(PatientResponse::from(patient)))
    }
}
