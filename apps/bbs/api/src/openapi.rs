use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Bulletin Board API",
        version = "0.1.0",
        description = "Public comment board: list and post comments over tRPC-style procedures"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/trpc", api = domain_comments::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
