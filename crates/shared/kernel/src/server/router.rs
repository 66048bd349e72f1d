use super::{ApiState, health};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Operational endpoints shared by every deployment.
pub fn system_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(health::health_handler))
}
