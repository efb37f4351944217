//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Owner-scoped feed and vaccine inventory backed by MongoDB. \
                       Every response body is `{status, error, data?}`; the caller \
                       is identified by the user id header set by the auth gateway.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/feeds", api = domain_inventory::ApiDoc, tags = ["Feeds"]),
        (path = "/api/vaccines", api = domain_inventory::ApiDoc, tags = ["Vaccines"])
    ),
    tags(
        (name = "Feeds", description = "Feed stock: feedName, kilogram, sack"),
        (name = "Vaccines", description = "Vaccine stock: vaccineName, milliliter, bottle")
    )
)]
pub struct ApiDoc;
