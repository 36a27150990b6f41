//! Request construction for the UK coronavirus dashboard API.
//!
//! One GET endpoint, two query parameters: `filters` scopes the query to
//! an area, `structure` maps our output field names onto upstream metric
//! names. The death metrics differ by area granularity (see
//! `Area::deaths_field_keys`), so the structure is derived per request.

use super::error::DataError;
use crate::domain::Area;
use reqwest::Url;
use serde::Serialize;

/// Production endpoint of the dashboard API.
pub const API_ENDPOINT: &str = "https://api.coronavirus.data.gov.uk/v1/data";

/// The `structure` query parameter: output field name → upstream metric.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StructureParam {
    date: &'static str,
    new_cases: &'static str,
    total_cases: &'static str,
    new_deaths: &'static str,
    total_deaths: &'static str,
    new_hospital_admissions: &'static str,
    occupied_beds_with_ventilator: &'static str,
}

/// A fully built, query-escaped request for one area's time series.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    area_name: String,
    url: Url,
}

impl ApiRequest {
    /// Build the request for an area against the given endpoint.
    pub fn for_area(endpoint: &str, area: &Area) -> Result<ApiRequest, DataError> {
        let filters = format!(
            "areaType={};areaName={}",
            area.area_type(),
            area.area_name()
        );

        let deaths = area.deaths_field_keys();
        let structure = StructureParam {
            date: "date",
            new_cases: "newCasesByPublishDate",
            total_cases: "cumCasesByPublishDate",
            new_deaths: deaths.new_deaths,
            total_deaths: deaths.total_deaths,
            new_hospital_admissions: "newAdmissions",
            occupied_beds_with_ventilator: "covidOccupiedMVBeds",
        };
        let structure = serde_json::to_string(&structure)
            .map_err(|e| DataError::Other(format!("structure serialization: {e}")))?;

        let url = Url::parse_with_params(
            endpoint,
            &[("filters", filters.as_str()), ("structure", structure.as_str())],
        )
        .map_err(|e| DataError::Other(format!("invalid request URL: {e}")))?;

        Ok(ApiRequest {
            area_name: area.area_name().to_string(),
            url,
        })
    }

    /// The full request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The area the request is scoped to, for progress display and cache
    /// metadata.
    pub fn area_name(&self) -> &str {
        &self.area_name
    }

    /// Request identity: hash of the full URL. Keys the response cache
    /// and survives endpoint or parameter changes without collisions.
    pub fn cache_key(&self) -> String {
        blake3::hash(self.url.as_str().as_bytes())
            .to_hex()
            .to_string()
    }
}
