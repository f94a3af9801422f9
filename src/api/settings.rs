use std::sync::Arc;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::errors::api::access::AccessError;
use crate::services::RoleGuard;
use crate::stores::setting_store::SettingsUpdate;
use crate::stores::SettingStore;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::settings::{SettingsResponse, UpdateSettingsRequest};
use crate::types::internal::role::Role;

const SETTINGS_ROLES: &[Role] = &[Role::Creator];

/// Clinic settings API endpoints
pub struct SettingsApi {
    guard: Arc<RoleGuard>,
    setting_store: Arc<SettingStore>,
}

impl SettingsApi {
    pub fn new(guard: Arc<RoleGuard>, setting_store: Arc<SettingStore>) -> Self {
        Self {
            guard,
            setting_store,
        }
    }
}

/// API tags for settings endpoints
#[derive(Tags)]
enum SettingTags {
    /// Clinic settings
    Settings,
}

#[OpenApi(prefix_path = "/settings")]
impl SettingsApi {
    /// Get the clinic settings
    #[oai(path = "/", method = "get", tag = "SettingTags::Settings")]
    async fn get(&self, req: &Request) -> Result<Json<SettingsResponse>, AccessError> {
        self.guard.authorize(req, SETTINGS_ROLES).await?;

        let setting = self.setting_store.get().await?;

        Ok(Json(SettingsResponse::from(setting)))
    }

    /// Update the clinic letterhead fields
    #[oai(path = "/", method = "put", tag = "SettingTags::Settings")]
    async fn update(
        &self,
        req: &Request,
        body: Json<UpdateSettingsRequest>,
    ) -> Result<Json<SettingsResponse>, AccessError> {
        self.guard.authorize(req, SETTINGS_ROLES).await?;

        let body = body.0;
        let setting = self
            .setting_store
            .update(SettingsUpdate {
                clinic_name: body.clinic_name,
                clinic_address: body.clinic_address,
                clinic_phone: body.clinic_phone,
                receipt_footer: body.receipt_footer,
            })
            .await?;

        Ok(Json(SettingsResponse::from(setting)))
    }

    /// Reset the clinic-wide receipt counter to 0
    #[oai(path = "/reset-counter", method = "post", tag = "SettingTags::Settings")]
    async fn reset_counter(&self, req: &Request) -> Result<Json<MessageResponse>, AccessError> {
        let actor = self.guard.authorize(req, SETTINGS_ROLES).await?;

        self.setting_store.reset_serial().await?;

        tracing::info!(by = %actor.username, "clinic receipt counter reset");

        Ok(Json(MessageResponse {
            message: "Receipt counter reset".to_string(),
        }))
    }
}
