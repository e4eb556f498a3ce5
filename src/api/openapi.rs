//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{activities, attachments, catalog, clients, equipment, health, hierarchy};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ouvrage API",
        version = "1.0.0",
        description = "Field Service Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Jean Collonville", email = "jcollonville@b-612.fr")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Activities
        activities::list_activities,
        activities::get_activity,
        activities::create_activity,
        activities::update_activity,
        activities::delete_activity,
        activities::request_transition,
        activities::list_allowed_transitions,
        activities::link_equipment,
        activities::unlink_equipment,
        activities::list_linked_equipment,
        activities::add_spare_part_usage,
        activities::remove_spare_part_usage,
        activities::list_spare_part_usages,
        activities::add_intervention,
        activities::list_interventions,
        activities::delete_intervention,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Catalog
        catalog::list_models,
        catalog::get_model,
        catalog::create_model,
        catalog::update_model,
        catalog::delete_model,
        catalog::list_spare_parts,
        catalog::get_spare_part,
        catalog::create_spare_part,
        catalog::delete_spare_part,
        // Hierarchy
        hierarchy::get_hierarchy,
        // Attachments
        attachments::upload_activity_attachment,
        attachments::upload_equipment_attachment,
        attachments::list_activity_attachments,
        attachments::list_equipment_attachments,
        attachments::download_attachment,
        attachments::delete_attachment,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::ActivityState,
            crate::models::enums::Urgency,
            crate::models::enums::Role,
            crate::models::enums::AttachmentOwner,
            // Activities
            crate::models::activity::Activity,
            crate::models::activity::ActivitySummary,
            crate::models::activity::ActivityQuery,
            crate::models::activity::CreateActivity,
            crate::models::activity::UpdateActivity,
            crate::models::activity::TransitionRequest,
            crate::models::activity::TransitionResponse,
            crate::models::activity::AllowedTransitions,
            crate::models::activity::LinkEquipment,
            crate::models::activity::LinkedEquipment,
            crate::models::activity::AddSparePartUsage,
            crate::models::activity::SparePartUsage,
            // Interventions
            crate::models::intervention::Intervention,
            crate::models::intervention::CreateIntervention,
            // Clients
            crate::models::client::Client,
            crate::models::client::ClientQuery,
            crate::models::client::CreateClient,
            crate::models::client::UpdateClient,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentDetails,
            crate::models::equipment::EquipmentQuery,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Catalog
            crate::models::equipment_model::EquipmentModel,
            crate::models::equipment_model::EquipmentModelQuery,
            crate::models::equipment_model::CreateEquipmentModel,
            crate::models::equipment_model::UpdateEquipmentModel,
            crate::models::spare_part::SparePart,
            crate::models::spare_part::SparePartQuery,
            crate::models::spare_part::CreateSparePart,
            // Hierarchy
            crate::models::hierarchy::HierarchyReport,
            crate::models::hierarchy::HierarchyClient,
            crate::models::hierarchy::HierarchyGroup,
            crate::models::hierarchy::HierarchyEquipment,
            // Attachments
            crate::models::attachment::Attachment,
            crate::models::attachment::AttachmentQuery,
            attachments::UploadForm,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldViolation,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "activities", description = "Activity (work order) management"),
        (name = "clients", description = "Client management"),
        (name = "equipment", description = "Equipment management"),
        (name = "catalog", description = "Equipment model and spare part catalog"),
        (name = "hierarchy", description = "Client / activity / equipment hierarchy"),
        (name = "attachments", description = "File attachments")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
