//! Insight Routes

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use insights::{InsightOverlay, InsightReport};
use serde::Deserialize;
use std::sync::Arc;

use crate::{ApiError, AppState};

/// Optional current reading to plot over the dataset.
/// The overlay is only used when all three values are present.
#[derive(Debug, Default, Deserialize)]
pub struct OverlayQuery {
    pub air_temperature: Option<f64>,
    pub torque: Option<f64>,
    pub rotational_speed: Option<f64>,
}

impl OverlayQuery {
    fn overlay(&self) -> Option<InsightOverlay> {
        Some(InsightOverlay {
            air_temperature: self.air_temperature?,
            torque: self.torque?,
            rotational_speed: self.rotational_speed?,
        })
    }
}

/// Chart data for the historical dataset
pub async fn get_insights(
    State(state): State<Arc<AppState>>,
    query: Result<Query<OverlayQuery>, QueryRejection>,
) -> Result<Json<InsightReport>, ApiError> {
    let Query(params) = query?;
    let report = state.insights(params.overlay()).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_overlay_is_ignored() {
        let query = OverlayQuery {
            air_temperature: Some(300.0),
            torque: None,
            rotational_speed: Some(1500.0),
        };
        assert!(query.overlay().is_none());
        assert!(OverlayQuery::default().overlay().is_none());
    }
}
