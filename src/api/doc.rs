//! OpenAPI document for every REST endpoint.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::handlers::{buildings, events, memberships, organizations, profiles, system};

/// OpenAPI description of the service, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "campus-events",
        description = "Campus events backend: buildings, organizations, memberships, profiles, events and their audit trail."
    ),
    paths(
        buildings::list_buildings,
        buildings::create_building,
        buildings::delete_building,
        buildings::building_events,
        events::event_ids,
        events::get_event,
        events::create_event,
        events::update_event,
        events::delete_event,
        events::organization_events,
        events::event_logs,
        organizations::create_organization,
        organizations::profile_organizations,
        organizations::organization_details,
        organizations::organization_logs,
        memberships::add_member,
        memberships::remove_member,
        profiles::create_profile,
        profiles::delete_profile,
        profiles::profile_exists,
        profiles::search_profiles,
        profiles::profile_logs,
        system::health_handler,
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Buildings", description = "Campus buildings and cascade deletion"),
        (name = "Events", description = "Events and their guarded mutations"),
        (name = "Organizations", description = "Organizations and their members"),
        (name = "Memberships", description = "Admin-only membership management"),
        (name = "Profiles", description = "User profiles"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` JWT security scheme.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
