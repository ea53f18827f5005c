use bigdecimal::{BigDecimal, Zero};

/// A delivery fee tier as the formatting and bounds helpers see it.
#[derive(Debug, Clone, PartialEq)]
pub struct TierEntry {
    pub label: String,
    pub fee: BigDecimal,
    pub sort_order: i32,
}

/// Renders a single tier for display. Implementations may localize; the
/// default rule is `"{label}: {fee}"`.
pub trait TierFormatter {
    fn format_tier(&self, label: &str, fee: &BigDecimal) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTierFormatter;

impl TierFormatter for DefaultTierFormatter {
    fn format_tier(&self, label: &str, fee: &BigDecimal) -> String {
        format!("{label}: {fee}")
    }
}

/// One display line for a listing's tiers, sorted by `sort_order` and joined
/// with `", "`. A listing without tiers renders as `"-"`.
pub fn tier_summary(tiers: &[TierEntry], formatter: &dyn TierFormatter) -> String {
    if tiers.is_empty() {
        return "-".to_string();
    }
    let mut sorted: Vec<&TierEntry> = tiers.iter().collect();
    sorted.sort_by_key(|tier| tier.sort_order);
    sorted
        .iter()
        .map(|tier| formatter.format_tier(&tier.label, &tier.fee))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Min and max fee across a listing's tier set, `(0, 0)` when it has none.
/// These bound the delivery fee range in an estimate; the concrete tier is
/// chosen by the farmer later in the order lifecycle.
pub fn delivery_fee_bounds(tiers: &[TierEntry]) -> (BigDecimal, BigDecimal) {
    let mut fees = tiers.iter().map(|tier| &tier.fee);
    let Some(first) = fees.next() else {
        return (BigDecimal::zero(), BigDecimal::zero());
    };
    let (mut min, mut max) = (first, first);
    for fee in fees {
        if fee < min {
            min = fee;
        }
        if fee > max {
            max = fee;
        }
    }
    (min.clone(), max.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn tier(label: &str, fee: &str, sort_order: i32) -> TierEntry {
        TierEntry {
            label: label.to_string(),
            fee: BigDecimal::from_str(fee).expect("valid decimal"),
            sort_order,
        }
    }

    #[test]
    fn summary_sorts_by_sort_order() {
        let tiers = vec![tier("10-20km", "4", 3), tier("0-5km", "1", 1), tier("5-10km", "2", 2)];
        assert_eq!(
            tier_summary(&tiers, &DefaultTierFormatter),
            "0-5km: 1, 5-10km: 2, 10-20km: 4"
        );
    }

    #[test]
    fn empty_tier_set_renders_a_dash() {
        assert_eq!(tier_summary(&[], &DefaultTierFormatter), "-");
    }

    #[test]
    fn custom_formatter_replaces_the_default_rule() {
        struct Parenthesized;
        impl TierFormatter for Parenthesized {
            fn format_tier(&self, label: &str, fee: &BigDecimal) -> String {
                format!("{label} ({fee})")
            }
        }
        let tiers = vec![tier("0-5km", "1", 1)];
        assert_eq!(tier_summary(&tiers, &Parenthesized), "0-5km (1)");
    }

    #[test]
    fn bounds_span_the_tier_fees() {
        let tiers = vec![
            tier("0-5km", "1", 1),
            tier("5-10km", "2", 2),
            tier("10-20km", "4", 3),
            tier("20-30km", "6", 4),
        ];
        let (min, max) = delivery_fee_bounds(&tiers);
        assert_eq!(min, BigDecimal::from(1));
        assert_eq!(max, BigDecimal::from(6));
    }

    #[test]
    fn bounds_of_empty_set_are_zero() {
        let (min, max) = delivery_fee_bounds(&[]);
        assert_eq!(min, BigDecimal::zero());
        assert_eq!(max, BigDecimal::zero());
    }
}
