use utoipa::OpenApi;

use crate::forecast::{ForecastDay, WeeklySummary};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::weather::get_forecast,
        crate::api::weather::get_weekly_summary,
    ),
    components(
        schemas(ForecastDay, WeeklySummary)
    ),
    tags((name = "weather", description = "Forecast proxy with solar energy estimates"))
)]
pub struct ApiDoc;
