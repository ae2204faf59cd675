//! Dashboard Route

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Html,
};
use data_validator::ValidationError;
use feature_engine::RawInput;
use insights::InsightOverlay;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

use crate::page::DashboardPage;
use crate::{ApiError, AppState};

/// Form fields as submitted. Numbers stay text until parsed so that a
/// cleared field still renders the page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub machine_type: Option<String>,
    pub air_temperature: Option<String>,
    pub process_temperature: Option<String>,
    pub rotational_speed: Option<String>,
    pub torque: Option<String>,
    pub tool_wear: Option<String>,
    /// Present when the predict button was pressed
    pub predict: Option<String>,
    /// Present when the charts checkbox is ticked
    pub show_charts: Option<String>,
}

impl DashboardQuery {
    /// Reading shown in the form. Missing or empty fields take the form
    /// defaults, the first machine type selected; unparseable ones are
    /// reported and also fall back.
    fn input(&self, machine_types: &[String]) -> (RawInput, Vec<ValidationError>) {
        let mut errors = Vec::new();
        let input = RawInput {
            machine_type: self
                .machine_type
                .clone()
                .filter(|t| !t.is_empty())
                .or_else(|| machine_types.first().cloned())
                .unwrap_or_default(),
            air_temperature: parse_field(&self.air_temperature, "air_temperature", 300.0, &mut errors),
            process_temperature: parse_field(
                &self.process_temperature,
                "process_temperature",
                305.0,
                &mut errors,
            ),
            rotational_speed: parse_field(&self.rotational_speed, "rotational_speed", 1500, &mut errors),
            torque: parse_field(&self.torque, "torque", 50.0, &mut errors),
            tool_wear: parse_field(&self.tool_wear, "tool_wear", 100, &mut errors),
        };
        (input, errors)
    }
}

fn parse_field<T: FromStr>(
    raw: &Option<String>,
    field: &'static str,
    default: T,
    errors: &mut Vec<ValidationError>,
) -> T {
    match raw.as_deref().map(str::trim) {
        None | Some("") => default,
        Some(text) => text.parse().unwrap_or_else(|_| {
            errors.push(ValidationError::NotANumber {
                field,
                value: text.to_string(),
            });
            default
        }),
    }
}

/// Render the dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Html<String> {
    let (params, rejection) = match query {
        Ok(Query(params)) => (params, None),
        Err(e) => (DashboardQuery::default(), Some(ApiError::from(e))),
    };

    let machine_types = state.artifacts.encoder().type_encoder().classes();
    let (input, errors) = params.input(machine_types);
    let show_charts = params.show_charts.is_some();

    let prediction = if let Some(e) = rejection {
        Some(Err(e))
    } else if !errors.is_empty() {
        Some(Err(ApiError::Validation(errors)))
    } else if params.predict.is_some() {
        Some(state.predict_blocking(input.clone()).await)
    } else {
        None
    };

    let charts = if show_charts {
        Some(state.insights(Some(InsightOverlay::from(&input))).await)
    } else {
        None
    };

    let page = DashboardPage {
        machine_types,
        input: &input,
        bounds: state.validator.config(),
        prediction,
        show_charts,
        charts,
    };
    Html(page.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults() {
        let classes = vec!["H".to_string(), "L".to_string(), "M".to_string()];
        let (input, errors) = DashboardQuery::default().input(&classes);

        assert!(errors.is_empty());
        assert_eq!(input.machine_type, "H");
        assert_eq!(input.air_temperature, 300.0);
        assert_eq!(input.process_temperature, 305.0);
        assert_eq!(input.rotational_speed, 1500);
        assert_eq!(input.torque, 50.0);
        assert_eq!(input.tool_wear, 100);
    }

    #[test]
    fn test_query_overrides_defaults() {
        let query = DashboardQuery {
            machine_type: Some("L".into()),
            torque: Some("42.5".into()),
            rotational_speed: Some(" 1800 ".into()),
            ..Default::default()
        };
        let (input, errors) = query.input(&[]);
        assert!(errors.is_empty());
        assert_eq!(input.machine_type, "L");
        assert_eq!(input.torque, 42.5);
        assert_eq!(input.rotational_speed, 1800);
        assert_eq!(input.tool_wear, 100);
    }

    #[test]
    fn test_empty_field_takes_default() {
        let query = DashboardQuery {
            air_temperature: Some(String::new()),
            tool_wear: Some("".into()),
            ..Default::default()
        };
        let (input, errors) = query.input(&["L".to_string()]);
        assert!(errors.is_empty());
        assert_eq!(input.air_temperature, 300.0);
        assert_eq!(input.tool_wear, 100);
    }

    #[test]
    fn test_unparseable_field_is_reported() {
        let query = DashboardQuery {
            torque: Some("fifty".into()),
            rotational_speed: Some("1500.5".into()),
            ..Default::default()
        };
        let (input, errors) = query.input(&["L".to_string()]);
        assert_eq!(input.torque, 50.0);
        assert_eq!(
            errors,
            vec![
                ValidationError::NotANumber {
                    field: "rotational_speed",
                    value: "1500.5".into(),
                },
                ValidationError::NotANumber {
                    field: "torque",
                    value: "fifty".into(),
                },
            ]
        );
    }
}
