//! Dynamic pricing configuration carried by an event.

use crate::{BoxOfficeError, BoxOfficeResult};
use serde::{Deserialize, Serialize};

/// One threshold/percentage step of a dynamic pricing schedule.
///
/// The rule fires once the number of available seats falls to or below
/// `threshold`, raising the running price by `percentage` percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    /// Seats-remaining threshold. Must be zero or greater.
    pub threshold: i64,
    /// Percentage increase applied when the rule fires.
    pub percentage: f64,
    /// Optional human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PricingRule {
    /// Creates a rule without a description.
    #[must_use]
    pub fn new(threshold: i64, percentage: f64) -> Self {
        Self {
            threshold,
            percentage,
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Rejects rules the pricing engine cannot apply.
    pub fn validate(&self) -> BoxOfficeResult<()> {
        if self.threshold < 0 {
            return Err(BoxOfficeError::pricing(format!(
                "rule threshold must be >= 0, got {}",
                self.threshold
            )));
        }
        if !self.percentage.is_finite() {
            return Err(BoxOfficeError::pricing("rule percentage must be a finite number"));
        }
        // A multiplier of zero or below would make the price non-positive.
        if self.percentage <= -100.0 {
            return Err(BoxOfficeError::pricing(format!(
                "rule percentage must be greater than -100, got {}",
                self.percentage
            )));
        }
        Ok(())
    }
}

/// Dynamic pricing settings. Rule order is significant and preserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DynamicPricing {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<PricingRule>,
}

impl DynamicPricing {
    /// Pricing disabled, no rules.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Pricing enabled with the given ordered rules.
    #[must_use]
    pub fn with_rules(rules: Vec<PricingRule>) -> Self {
        Self {
            enabled: true,
            rules,
        }
    }

    /// Validates every rule, reporting the first offending position.
    pub fn validate(&self) -> BoxOfficeResult<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            rule.validate().map_err(|e| match e {
                BoxOfficeError::Pricing(msg) => {
                    BoxOfficeError::pricing(format!("rule #{index}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
