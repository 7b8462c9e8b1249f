use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{errors::ServiceError, ml::LinearModel, models::Order};

/// One projected day of demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// ISO `YYYY-MM-DD`
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    /// Unclamped; a falling trend can project below zero.
    pub predicted_quantity: f64,
}

/// Demand projection for the days following the last observed order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastResult(pub Vec<ForecastPoint>);

impl ForecastResult {
    pub fn points(&self) -> &[ForecastPoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dates(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|p| p.date.format("%Y-%m-%d").to_string())
            .collect()
    }

    pub fn quantities(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.predicted_quantity).collect()
    }
}

/// Day number in the proleptic Gregorian calendar, 0001-01-01 being day 1.
pub fn date_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Projects daily demand for `product_id` by a straight-line fit of order
/// quantity against order date.
///
/// Orders for other products are ignored; the rest are ordered by date
/// (stable, so same-day orders keep their given order). At least two
/// historical points are required, and the horizon must end on a date chrono
/// can represent.
#[instrument(skip(orders), fields(order_count = orders.len()))]
pub fn forecast_demand(
    product_id: i64,
    horizon: u32,
    orders: &[Order],
) -> Result<ForecastResult, ServiceError> {
    let mut history: Vec<&Order> = orders.iter().filter(|o| o.product_id == product_id).collect();
    history.sort_by_key(|o| o.order_date);

    if history.len() < 2 {
        return Err(ServiceError::InsufficientData(format!(
            "product {} has {} historical order(s), at least 2 are required",
            product_id,
            history.len()
        )));
    }

    let x: Vec<f64> = history
        .iter()
        .map(|o| date_ordinal(o.order_day()) as f64)
        .collect();
    let y: Vec<f64> = history.iter().map(|o| o.quantity as f64).collect();

    let model = LinearModel::fit(&x, &y).ok_or_else(|| {
        ServiceError::InsufficientData(format!("product {} history cannot be fitted", product_id))
    })?;
    debug!(slope = model.slope, intercept = model.intercept, "fitted demand trend");

    // `history` is non-empty past the length check.
    let last_day = history[history.len() - 1].order_day();
    last_day
        .checked_add_signed(Duration::days(i64::from(horizon)))
        .ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "forecast horizon of {} days past {} leaves the supported calendar",
                horizon, last_day
            ))
        })?;
    let points = last_day
        .iter_days()
        .skip(1)
        .take(horizon as usize)
        .map(|date| ForecastPoint {
            date,
            predicted_quantity: model.predict(date_ordinal(date) as f64),
        })
        .collect::<Vec<_>>();

    info!(
        product_id,
        history_points = history.len(),
        horizon,
        "Generated demand forecast"
    );
    Ok(ForecastResult(points))
}

mod iso_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    fn order(product_id: i64, day: u32, quantity: i64) -> Order {
        Order {
            id: i64::from(day),
            product_id,
            supplier_id: 1,
            quantity,
            order_date: Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap(),
            status: "Delivered".to_string(),
        }
    }

    #[test]
    fn ordinal_matches_proleptic_day_count() {
        assert_eq!(date_ordinal(NaiveDate::from_ymd_opt(1, 1, 1).unwrap()), 1);
        assert_eq!(
            date_ordinal(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            738_886
        );
    }

    #[test]
    fn extrapolates_exact_linear_growth() {
        // quantity = 2 * day_index + 10
        let orders: Vec<Order> = (0..5).map(|i| order(1, 1 + i, 2 * i as i64 + 10)).collect();
        let result = forecast_demand(1, 3, &orders).unwrap();

        assert_eq!(result.dates(), vec!["2024-03-06", "2024-03-07", "2024-03-08"]);
        for (k, q) in result.quantities().into_iter().enumerate() {
            let day_index = 5.0 + k as f64;
            assert_relative_eq!(q, 2.0 * day_index + 10.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn fewer_than_two_points_is_insufficient() {
        assert_matches!(
            forecast_demand(1, 3, &[]),
            Err(ServiceError::InsufficientData(_))
        );
        assert_matches!(
            forecast_demand(1, 3, &[order(1, 1, 5)]),
            Err(ServiceError::InsufficientData(_))
        );
    }

    #[test]
    fn other_products_do_not_count_as_history() {
        let orders = vec![order(1, 1, 5), order(2, 2, 7), order(2, 3, 9)];
        assert_matches!(
            forecast_demand(1, 3, &orders),
            Err(ServiceError::InsufficientData(_))
        );
    }

    #[test]
    fn unsorted_history_is_ordered_by_date() {
        let orders = vec![order(1, 10, 30), order(1, 2, 14), order(1, 6, 22)];
        let result = forecast_demand(1, 1, &orders).unwrap();
        assert_eq!(result.dates(), vec!["2024-03-11"]);
        assert_relative_eq!(result.quantities()[0], 32.0, epsilon = 1e-6);
    }

    #[test]
    fn falling_trend_is_not_clamped() {
        let orders = vec![order(1, 1, 10), order(1, 2, 5)];
        let result = forecast_demand(1, 3, &orders).unwrap();
        assert_relative_eq!(result.quantities()[2], -10.0, epsilon = 1e-6);
    }

    #[test]
    fn same_day_history_projects_the_mean() {
        let orders = vec![order(1, 4, 10), order(1, 4, 20)];
        let result = forecast_demand(1, 2, &orders).unwrap();
        assert_eq!(result.quantities(), vec![15.0, 15.0]);
    }

    #[test]
    fn zero_horizon_is_empty() {
        let orders = vec![order(1, 1, 10), order(1, 2, 5)];
        assert!(forecast_demand(1, 0, &orders).unwrap().is_empty());
    }

    #[test]
    fn horizon_past_the_calendar_is_an_error() {
        let edge = NaiveDate::MAX.pred_opt().unwrap();
        let near_max = |id: i64, date: NaiveDate, quantity: i64| Order {
            id,
            product_id: 1,
            supplier_id: 1,
            quantity,
            order_date: Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()),
            status: "Delivered".to_string(),
        };
        let orders = vec![
            near_max(1, edge.pred_opt().unwrap().pred_opt().unwrap(), 4),
            near_max(2, edge.pred_opt().unwrap(), 6),
        ];
        assert_matches!(
            forecast_demand(1, 5, &orders),
            Err(ServiceError::ValidationError(_))
        );

        let orders = vec![order(1, 1, 10), order(1, 2, 5)];
        assert_matches!(
            forecast_demand(1, u32::MAX, &orders),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn serializes_as_date_quantity_pairs() {
        let orders = vec![order(1, 1, 1), order(1, 2, 2)];
        let json = serde_json::to_value(forecast_demand(1, 1, &orders).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "date": "2024-03-03", "predicted_quantity": 3.0 }])
        );
    }
}
