//! Weather forecast API endpoints

use axum::{extract::State, Json};

use crate::{
    api::{error::ApiError, query::Coordinates},
    forecast::{forecast_days, ForecastDay, SeriesError, SeriesSelection, WeeklySummary},
    state::AppState,
};

/// GET /api/forecast - Daily forecast with estimated solar production
#[cfg_attr(feature = "swagger", utoipa::path(
    get,
    path = "/api/forecast",
    params(crate::api::query::CoordinatesQuery),
    responses(
        (status = 200, description = "One record per forecast day", body = [ForecastDay]),
        (status = 422, description = "Invalid latitude or longitude"),
        (status = 500, description = "Upstream forecast API failed")
    ),
    tag = "weather"
))]
pub async fn get_forecast(
    State(st): State<AppState>,
    Coordinates(location): Coordinates,
) -> Result<Json<Vec<ForecastDay>>, ApiError> {
    let forecast = st
        .weather
        .fetch(location, SeriesSelection::DAILY_FORECAST)
        .await
        .map_err(ApiError::upstream)?;

    let daily = forecast.daily.ok_or(SeriesError::Missing("daily"))?;
    Ok(Json(forecast_days(&daily, &st.cfg.solar)?))
}

/// GET /api/weeklySummary - Aggregate statistics for the forecast week
#[cfg_attr(feature = "swagger", utoipa::path(
    get,
    path = "/api/weeklySummary",
    params(crate::api::query::CoordinatesQuery),
    responses(
        (status = 200, description = "Weekly aggregate", body = WeeklySummary),
        (status = 422, description = "Invalid latitude or longitude"),
        (status = 500, description = "Upstream forecast API failed")
    ),
    tag = "weather"
))]
pub async fn get_weekly_summary(
    State(st): State<AppState>,
    Coordinates(location): Coordinates,
) -> Result<Json<WeeklySummary>, ApiError> {
    let forecast = st
        .weather
        .fetch(location, SeriesSelection::WEEKLY_SUMMARY)
        .await
        .map_err(ApiError::upstream)?;

    let daily = forecast.daily.ok_or(SeriesError::Missing("daily"))?;
    let hourly = forecast.hourly.ok_or(SeriesError::Missing("hourly"))?;
    let summary = WeeklySummary::from_series(
        &daily,
        &hourly,
        st.cfg.summary.precipitation_days_threshold,
    )?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router;
    use crate::config::Config;
    use crate::forecast::{DailySeries, ForecastResponse, GeoLocation, HourlySeries, MockWeatherSource};
    use axum::{body::Body, http::Request, http::StatusCode};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn get(source: MockWeatherSource, uri: &str) -> (StatusCode, serde_json::Value) {
        let cfg = Config::default();
        let app = router(AppState::with_source(cfg.clone(), Arc::new(source)), &cfg);
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn two_days() -> ForecastResponse {
        ForecastResponse {
            daily: Some(DailySeries {
                time: vec![
                    NaiveDate::from_ymd_opt(2025, 1, 17).unwrap(),
                    NaiveDate::from_ymd_opt(2025, 1, 18).unwrap(),
                ],
                weather_code: vec![Some(3), Some(2)],
                temperature_2m_max: vec![Some(5.0), Some(10.0)],
                temperature_2m_min: vec![Some(0.0), Some(1.0)],
                sunshine_duration: vec![Some(36_000.0), Some(28_800.0)],
            }),
            hourly: None,
        }
    }

    #[tokio::test]
    async fn test_forecast_uses_daily_selection() {
        let mut source = MockWeatherSource::new();
        source
            .expect_fetch()
            .withf(|location, selection| {
                *location
                    == GeoLocation {
                        latitude: 49.3814,
                        longitude: 22.1446,
                    }
                    && *selection == SeriesSelection::DAILY_FORECAST
            })
            .times(1)
            .returning(|_, _| Ok(two_days()));

        let (status, body) = get(source, "/api/forecast?latitude=49.3814&longitude=22.1446").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!([
                {
                    "date": "2025-01-17",
                    "weather_code": 3,
                    "temp_min": 0.0,
                    "temp_max": 5.0,
                    "estimated_energy_kwh": 5.0
                },
                {
                    "date": "2025-01-18",
                    "weather_code": 2,
                    "temp_min": 1.0,
                    "temp_max": 10.0,
                    "estimated_energy_kwh": 4.0
                }
            ])
        );
    }

    #[tokio::test]
    async fn test_invalid_params_never_reach_upstream() {
        let mut source = MockWeatherSource::new();
        source.expect_fetch().never();

        let (status, body) = get(source, "/api/forecast?latitude=invalid&longitude=invalid").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["errors"]["latitude"].is_array());
        assert!(body["errors"]["longitude"].is_array());
    }

    #[tokio::test]
    async fn test_forecast_missing_daily_is_upstream_failure() {
        let mut source = MockWeatherSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Ok(ForecastResponse::default()));

        let (status, body) = get(source, "/api/forecast?latitude=10&longitude=10").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Failed to fetch weather data." }));
    }

    #[tokio::test]
    async fn test_weekly_summary_uses_hourly_selection() {
        let mut source = MockWeatherSource::new();
        source
            .expect_fetch()
            .withf(|_, selection| *selection == SeriesSelection::WEEKLY_SUMMARY)
            .times(1)
            .returning(|_, _| {
                Ok(ForecastResponse {
                    daily: Some(DailySeries {
                        time: Vec::new(),
                        weather_code: vec![Some(61), Some(63), Some(65), Some(1)],
                        temperature_2m_max: vec![Some(9.5), Some(11.0), Some(8.0), Some(7.0)],
                        temperature_2m_min: vec![Some(2.0), Some(1.5), Some(3.0), Some(0.5)],
                        sunshine_duration: vec![Some(100.0), Some(200.0), Some(300.0), Some(400.0)],
                    }),
                    hourly: Some(HourlySeries {
                        surface_pressure: vec![Some(1010.0), Some(1011.0)],
                    }),
                })
            });

        let (status, body) = get(source, "/api/weeklySummary?latitude=52.2&longitude=21.0").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "avg_pressure": 1010.5,
                "avg_sunshine": 250.0,
                "min_temp": 0.5,
                "max_temp": 11.0,
                "weekly_summary": "without precipitation"
            })
        );
    }

    #[tokio::test]
    async fn test_weekly_summary_upstream_error() {
        let mut source = MockWeatherSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Err(anyhow::anyhow!("forecast API error: HTTP 503")));

        let (status, body) = get(source, "/api/weeklySummary?latitude=1&longitude=1").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch weather data.");
    }
}
