use configuration::{AlertRuleConfig, AlertSettings, Severity};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
pub mod error;

pub use error::{AlerterError, ParseComparatorError};

/// How a metric value is compared against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    pub fn holds(&self, value: Decimal, threshold: Decimal) -> bool {
        match self {
            Comparator::Lt => value < threshold,
            Comparator::Le => value <= threshold,
            Comparator::Gt => value > threshold,
            Comparator::Ge => value >= threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }
}

impl FromStr for Comparator {
    type Err = ParseComparatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lt" | "<" => Ok(Comparator::Lt),
            "le" | "<=" => Ok(Comparator::Le),
            "gt" | ">" => Ok(Comparator::Gt),
            "ge" | ">=" => Ok(Comparator::Ge),
            _ => Err(ParseComparatorError(s.to_string())),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed threshold rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRule {
    pub metric: String,
    pub comparator: Comparator,
    pub threshold: Decimal,
    pub message: String,
    pub severity: Severity,
}

impl TryFrom<&AlertRuleConfig> for AlertRule {
    type Error = AlerterError;

    fn try_from(config: &AlertRuleConfig) -> Result<Self, Self::Error> {
        let comparator = config
            .comparator
            .parse()
            .map_err(|ParseComparatorError(comparator)| AlerterError::UnknownComparator {
                metric: config.metric.clone(),
                comparator,
            })?;
        Ok(Self {
            metric: config.metric.trim().to_string(),
            comparator,
            threshold: config.threshold,
            message: config.message.clone(),
            severity: config.severity,
        })
    }
}

/// A rule whose condition held for the evaluated metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub metric: String,
    pub value: Decimal,
    pub comparator: Comparator,
    pub threshold: Decimal,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} = {} ({} {})",
            self.severity,
            self.metric,
            self.value.round_dp(4).normalize(),
            self.comparator,
            self.threshold
        )?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Evaluates configured threshold rules against metric maps.
#[derive(Debug, Clone, Default)]
pub struct ThresholdAlerter {
    rules: Vec<AlertRule>,
}

impl ThresholdAlerter {
    /// Creates a new `ThresholdAlerter` from the `[alerts]` settings.
    ///
    /// Returns `Ok(None)` when alerting is disabled, so callers can skip the
    /// alert section entirely. Fails on the first rule with an unknown
    /// comparator.
    pub fn new(settings: &AlertSettings) -> Result<Option<Self>, AlerterError> {
        if !settings.enabled {
            tracing::warn!("Threshold alerts are disabled in the configuration.");
            return Ok(None);
        }
        let rules = settings
            .rules
            .iter()
            .map(AlertRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Self::with_rules(rules)))
    }

    pub fn with_rules(rules: Vec<AlertRule>) -> Self {
        Self { rules }
    }

    /// Returns every triggered alert, most severe first.
    ///
    /// A rule whose metric is undefined (`None`) never triggers. A rule whose
    /// metric is not in the map at all is skipped with a warning, since it
    /// usually means a typo in the configuration. Rules for metrics that
    /// belong to a different report should be evaluated against that report.
    pub fn evaluate(&self, metrics: &BTreeMap<String, Option<Decimal>>) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .rules
            .iter()
            .filter_map(|rule| match metrics.get(&rule.metric) {
                Some(Some(value)) => rule.comparator.holds(*value, rule.threshold).then(|| Alert {
                    metric: rule.metric.clone(),
                    value: *value,
                    comparator: rule.comparator,
                    threshold: rule.threshold,
                    severity: rule.severity,
                    message: rule.message.clone(),
                }),
                Some(None) => {
                    tracing::debug!(metric = %rule.metric, "Metric is undefined; rule not evaluated.");
                    None
                }
                None => {
                    tracing::warn!(metric = %rule.metric, "Alert rule references an unknown metric.");
                    None
                }
            })
            .collect();
        alerts.sort_by(|a, b| b.severity.cmp(&a.severity));

        for alert in &alerts {
            tracing::info!(metric = %alert.metric, severity = %alert.severity, "Alert triggered.");
        }
        alerts
    }

    /// Like `evaluate`, but only for rules whose metric is present in `metrics`.
    ///
    /// Used when one rule set covers several reports: rules for metrics of
    /// another report are silently left out instead of warned about.
    pub fn evaluate_present(&self, metrics: &BTreeMap<String, Option<Decimal>>) -> Vec<Alert> {
        let relevant = ThresholdAlerter::with_rules(
            self.rules
                .iter()
                .filter(|rule| metrics.contains_key(&rule.metric))
                .cloned()
                .collect(),
        );
        relevant.evaluate(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn metrics(entries: &[(&str, Option<Decimal>)]) -> BTreeMap<String, Option<Decimal>> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn default_alerter() -> ThresholdAlerter {
        ThresholdAlerter::new(&AlertSettings::default()).unwrap().unwrap()
    }

    #[test]
    fn comparators_parse_words_and_symbols() {
        assert_eq!("lt".parse::<Comparator>(), Ok(Comparator::Lt));
        assert_eq!(" >= ".parse::<Comparator>(), Ok(Comparator::Ge));
        assert_eq!("GT".parse::<Comparator>(), Ok(Comparator::Gt));
        assert_eq!(
            "==".parse::<Comparator>(),
            Err(ParseComparatorError("==".to_string()))
        );
    }

    #[test]
    fn unknown_comparator_is_rejected() {
        let mut settings = AlertSettings::default();
        settings.rules[1].comparator = "below".to_string();
        let err = ThresholdAlerter::new(&settings).unwrap_err();
        assert_eq!(
            err,
            AlerterError::UnknownComparator {
                metric: "adr".to_string(),
                comparator: "below".to_string()
            }
        );
    }

    #[test]
    fn disabled_alerts_build_no_alerter() {
        let settings = AlertSettings {
            enabled: false,
            ..AlertSettings::default()
        };
        assert!(ThresholdAlerter::new(&settings).unwrap().is_none());
    }

    #[test]
    fn default_rules_flag_weak_kpis() {
        let alerts = default_alerter().evaluate(&metrics(&[
            ("occupancy_rate", Some(dec!(0.52))),
            ("adr", Some(dec!(112))),
            ("revpar_dispersion", Some(dec!(0.45))),
            ("channel_share_gap.OTA", Some(dec!(0))),
            ("net_margin", Some(dec!(9.4))),
            ("net_debt_to_equity", Some(dec!(0.515))),
            ("cash", Some(dec!(1135))),
        ]));
        let flagged: Vec<&str> = alerts.iter().map(|a| a.metric.as_str()).collect();
        // Most severe first; OTA only ties for the lead.
        assert_eq!(flagged, vec!["net_debt_to_equity", "occupancy_rate", "revpar_dispersion"]);
    }

    #[test]
    fn undefined_and_unknown_metrics_never_trigger() {
        let alerts = default_alerter().evaluate(&metrics(&[("occupancy_rate", None), ("adr", None)]));
        assert!(alerts.is_empty());
    }

    #[test]
    fn evaluate_present_ignores_rules_for_other_reports() {
        let alerts = default_alerter().evaluate_present(&metrics(&[("cash", Some(dec!(900)))]));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].to_string(), "[critical] cash = 900 (< 1000): Cash position is below 1000.");
    }

    #[test]
    fn ota_rule_fires_only_when_ota_leads() {
        let alerter = default_alerter();
        let leading = alerter.evaluate_present(&metrics(&[("channel_share_gap.OTA", Some(dec!(0.05)))]));
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].severity, Severity::Info);

        let trailing = alerter.evaluate_present(&metrics(&[("channel_share_gap.OTA", Some(dec!(-0.05)))]));
        assert!(trailing.is_empty());
    }
}
