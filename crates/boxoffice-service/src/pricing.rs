//! Dynamic ticket pricing.
//!
//! Prices are computed at read time from the event snapshot and are never
//! cached: `sold_tickets` moves independently of any cached event's TTL.

use boxoffice_core::{BoxOfficeError, BoxOfficeResult, Event, PricingRule};

/// Current ticket price given inventory and an ordered rule list.
///
/// With pricing disabled the base price is returned unchanged. Otherwise every
/// rule whose threshold is at or above the number of available seats raises
/// the running price by its percentage, in the order given; matches compound.
/// The result is rounded to cents, halves away from zero.
pub fn current_price(
    base_price: f64,
    total_seats: u32,
    sold_tickets: u32,
    enabled: bool,
    rules: &[PricingRule],
) -> BoxOfficeResult<f64> {
    if !base_price.is_finite() || base_price < 0.0 {
        return Err(BoxOfficeError::pricing(format!(
            "base price must be a non-negative number, got {base_price}"
        )));
    }
    if !enabled {
        return Ok(base_price);
    }

    let available = i64::from(total_seats) - i64::from(sold_tickets);

    let mut price = base_price;
    for (index, rule) in rules.iter().enumerate() {
        rule.validate().map_err(|e| match e {
            BoxOfficeError::Pricing(msg) => {
                BoxOfficeError::pricing(format!("rule #{index}: {msg}"))
            }
            other => other,
        })?;
        if available <= rule.threshold {
            price *= 1.0 + rule.percentage / 100.0;
        }
    }

    Ok(round_to_cents(price))
}

/// Current price of an event's tickets.
pub fn event_price(event: &Event) -> BoxOfficeResult<f64> {
    current_price(
        event.ticket_price,
        event.total_seats,
        event.sold_tickets,
        event.dynamic_pricing.enabled,
        &event.dynamic_pricing.rules,
    )
}

fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Vec<PricingRule> {
        vec![PricingRule::new(10, 10.0), PricingRule::new(5, 20.0)]
    }

    #[test]
    fn test_single_rule_applies() {
        assert_eq!(current_price(100.0, 100, 92, true, &rules()).unwrap(), 110.0);
    }

    #[test]
    fn test_matching_rules_compound() {
        assert_eq!(current_price(100.0, 100, 96, true, &rules()).unwrap(), 132.0);
    }

    #[test]
    fn test_wide_thresholds_compound_in_order() {
        let schedule = vec![PricingRule::new(50, 10.0), PricingRule::new(20, 20.0)];
        assert_eq!(current_price(100.0, 100, 60, true, &schedule).unwrap(), 110.0);
        assert_eq!(current_price(100.0, 100, 85, true, &schedule).unwrap(), 132.0);
        assert_eq!(current_price(100.0, 100, 85, false, &schedule).unwrap(), 100.0);
    }

    #[test]
    fn test_disabled_returns_base_price() {
        assert_eq!(current_price(100.0, 100, 96, false, &rules()).unwrap(), 100.0);
        assert_eq!(current_price(19.999, 10, 9, false, &rules()).unwrap(), 19.999);
    }

    #[test]
    fn test_no_rule_matches_plenty_of_seats() {
        assert_eq!(current_price(100.0, 100, 10, true, &rules()).unwrap(), 100.0);
    }

    #[test]
    fn test_order_is_preserved_not_sorted() {
        let reversed = vec![PricingRule::new(5, 20.0), PricingRule::new(10, 10.0)];
        assert_eq!(current_price(100.0, 100, 92, true, &reversed).unwrap(), 110.0);
        assert_eq!(current_price(100.0, 100, 96, true, &reversed).unwrap(), 132.0);
    }

    #[test]
    fn test_oversold_inventory_still_prices() {
        assert_eq!(current_price(50.0, 10, 12, true, &rules()).unwrap(), 66.0);
    }

    #[test]
    fn test_rounds_to_cents() {
        let rules = vec![PricingRule::new(0, 10.0)];
        assert_eq!(current_price(33.33, 1, 1, true, &rules).unwrap(), 36.66);
    }

    #[test]
    fn test_malformed_rule_is_an_error() {
        let bad = vec![PricingRule::new(10, 10.0), PricingRule::new(-1, 5.0)];
        let err = current_price(100.0, 100, 50, true, &bad).unwrap_err();
        assert!(matches!(err, BoxOfficeError::Pricing(ref m) if m.contains("rule #1")));

        let nan = vec![PricingRule::new(3, f64::NAN)];
        assert!(current_price(100.0, 100, 50, true, &nan).is_err());
    }

    #[test]
    fn test_invalid_base_price_is_an_error() {
        assert!(current_price(-1.0, 10, 0, false, &[]).is_err());
        assert!(current_price(f64::INFINITY, 10, 0, true, &[]).is_err());
    }
}
