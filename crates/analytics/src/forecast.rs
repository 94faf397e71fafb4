use crate::error::AnalyticsError;
use crate::ratios::checked_ratio;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A fitted ordinary-least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: Decimal,
    pub intercept: Decimal,
}

impl TrendLine {
    /// Fits a line through `series`.
    ///
    /// Needs at least two points with distinct x values.
    pub fn fit(series: &[(Decimal, Decimal)]) -> Result<Self, AnalyticsError> {
        if series.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                operation: "linear_trend_forecast".to_string(),
                required: 2,
                actual: series.len(),
            });
        }

        let n = Decimal::from(series.len());
        let mean_x = series.iter().map(|(x, _)| *x).sum::<Decimal>() / n;
        let mean_y = series.iter().map(|(_, y)| *y).sum::<Decimal>() / n;

        let (sxy, sxx) = series.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(sxy, sxx), (x, y)| {
                let dx = *x - mean_x;
                (sxy + dx * (*y - mean_y), sxx + dx * dx)
            },
        );

        if sxx.is_zero() {
            // Every observation shares one x: there is no direction to extrapolate.
            return Err(AnalyticsError::InsufficientData {
                operation: "linear_trend_forecast".to_string(),
                required: 2,
                actual: 1,
            });
        }

        let slope = checked_ratio("trend_slope", sxy, sxx)?;
        Ok(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, x: Decimal) -> Decimal {
        self.intercept + self.slope * x
    }
}

/// Fits a straight line through `series` and evaluates it `horizon` steps past
/// the last observed x.
///
/// The step is the average spacing of the input x values. This is a coarse
/// trend indicator: no seasonality and no confidence interval.
pub fn linear_trend_forecast(
    series: &[(Decimal, Decimal)],
    horizon: usize,
) -> Result<Vec<(Decimal, Decimal)>, AnalyticsError> {
    let line = TrendLine::fit(series)?;

    // `fit` guarantees at least two points.
    let (first_x, last_x) = match (series.first(), series.last()) {
        (Some((first, _)), Some((last, _))) => (*first, *last),
        _ => return Ok(Vec::new()),
    };
    let step = (last_x - first_x) / Decimal::from(series.len() - 1);

    tracing::debug!(
        slope = %line.slope,
        intercept = %line.intercept,
        step = %step,
        horizon,
        "Fitted linear trend."
    );

    Ok((1..=horizon)
        .map(|k| {
            let x = last_x + step * Decimal::from(k);
            (x, line.predict(x))
        })
        .collect())
}
