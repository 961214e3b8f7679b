//! Latitude/longitude query validation shared by the weather endpoints.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::api::error::ApiError;
use crate::forecast::GeoLocation;

/// Raw query string values; parsed by hand so that non-numeric input
/// becomes a field error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "swagger", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "swagger", into_params(parameter_in = Query))]
pub struct CoordinatesQuery {
    /// Latitude in degrees, -90 to 90
    #[cfg_attr(feature = "swagger", param(value_type = f64))]
    pub latitude: Option<String>,
    /// Longitude in degrees, -180 to 180
    #[cfg_attr(feature = "swagger", param(value_type = f64))]
    pub longitude: Option<String>,
}

#[derive(Debug, Validate)]
struct CoordinateValues {
    #[validate(range(
        min = -90.0,
        max = 90.0,
        message = "The latitude field must be between -90 and 90."
    ))]
    latitude: Option<f64>,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "The longitude field must be between -180 and 180."
    ))]
    longitude: Option<f64>,
}

impl CoordinatesQuery {
    pub fn into_location(self) -> Result<GeoLocation, ValidationErrors> {
        let mut parse_errors = Vec::new();
        let latitude = parse_coordinate("latitude", self.latitude.as_deref(), &mut parse_errors);
        let longitude = parse_coordinate("longitude", self.longitude.as_deref(), &mut parse_errors);

        let values = CoordinateValues {
            latitude,
            longitude,
        };
        let mut errors = match values.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(range_errors) => range_errors,
        };
        for (field, error) in parse_errors {
            errors.add(field, error);
        }

        match (values.latitude, values.longitude) {
            (Some(latitude), Some(longitude)) if errors.errors().is_empty() => Ok(GeoLocation {
                latitude,
                longitude,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_coordinate(
    field: &'static str,
    raw: Option<&str>,
    errors: &mut Vec<(&'static str, ValidationError)>,
) -> Option<f64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        errors.push((
            field,
            ValidationError::new("required")
                .with_message(Cow::Owned(format!("The {field} field is required."))),
        ));
        return None;
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            errors.push((
                field,
                ValidationError::new("numeric")
                    .with_message(Cow::Owned(format!("The {field} field must be a number."))),
            ));
            None
        }
    }
}

/// Extractor yielding a validated location or a 422 listing the bad fields.
#[derive(Debug, Clone, Copy)]
pub struct Coordinates(pub GeoLocation);

#[async_trait]
impl<S> FromRequestParts<S> for Coordinates
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<CoordinatesQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(query.into_location()?))
    }
}
