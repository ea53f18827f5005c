use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

/// Inputs for one quote computation. The same struct feeds the live estimate
/// endpoint and the snapshot taken at order creation, so both paths cannot
/// drift apart.
///
/// `gutting_requested` and `delivery_requested` must already be forced to
/// `false` by the caller when the listing does not offer the capability.
#[derive(Debug, Clone, Default)]
pub struct QuoteInput {
    /// Missing quantity (a half-filled form) computes as zero.
    pub quantity_kg: Option<BigDecimal>,
    /// Alpha-inclusive unit price, see [`display_unit_price`].
    pub display_unit_price_per_kg: BigDecimal,
    pub gutting_requested: bool,
    pub gutting_price_per_kg: BigDecimal,
    pub beta_rate: BigDecimal,
    pub delivery_requested: bool,
    /// Lowest fee across the listing's delivery tiers.
    pub delivery_fee_min: BigDecimal,
    /// Highest fee across the listing's delivery tiers.
    pub delivery_fee_max: BigDecimal,
    pub free_delivery_min_kg: Option<BigDecimal>,
}

/// A cost breakdown. The true delivery fee is unknown until the farmer picks
/// a concrete tier after the order is placed, so delivery and the total are
/// reported as a range that collapses when min equals max.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBreakdown {
    pub fish_subtotal: BigDecimal,
    pub gutting_fee: BigDecimal,
    pub support_fee: BigDecimal,
    pub delivery_min: BigDecimal,
    pub delivery_max: BigDecimal,
    pub total_min: BigDecimal,
    pub total_max: BigDecimal,
    pub is_range: bool,
    pub free_delivery_applied: bool,
}

/// The restaurant-facing unit price: the farmer's base price with the
/// platform markup applied on top.
pub fn display_unit_price(base_price_per_kg: &BigDecimal, alpha_rate: &BigDecimal) -> BigDecimal {
    base_price_per_kg * (BigDecimal::from(1) + alpha_rate)
}

/// Parse a user-supplied decimal leniently: blank or malformed input becomes
/// `None` so that live estimates stay renderable while the user is typing.
pub fn lenient_decimal(raw: Option<&str>) -> Option<BigDecimal> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| BigDecimal::from_str(s).ok())
}

/// Compute a cost breakdown. Never fails: absent quantity degrades to zero.
pub fn compute_quote(input: &QuoteInput) -> QuoteBreakdown {
    let quantity = input.quantity_kg.clone().unwrap_or_else(BigDecimal::zero);

    let fish_subtotal = &quantity * &input.display_unit_price_per_kg;
    let gutting_fee = if input.gutting_requested {
        &quantity * &input.gutting_price_per_kg
    } else {
        BigDecimal::zero()
    };
    // Beta applies to the fish subtotal only, not the gutting fee.
    let support_fee = &fish_subtotal * &input.beta_rate;

    let mut free_delivery_applied = false;
    let (delivery_min, delivery_max) = if !input.delivery_requested {
        (BigDecimal::zero(), BigDecimal::zero())
    } else {
        match &input.free_delivery_min_kg {
            Some(min_kg) if quantity >= *min_kg => {
                free_delivery_applied = true;
                (BigDecimal::zero(), BigDecimal::zero())
            }
            _ => (input.delivery_fee_min.clone(), input.delivery_fee_max.clone()),
        }
    };

    let total_min = &fish_subtotal + &gutting_fee + &support_fee + &delivery_min;
    let total_max = &fish_subtotal + &gutting_fee + &support_fee + &delivery_max;
    let is_range = delivery_min != delivery_max;

    QuoteBreakdown {
        fish_subtotal,
        gutting_fee,
        support_fee,
        delivery_min,
        delivery_max,
        total_min,
        total_max,
        is_range,
        free_delivery_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> BigDecimal {
        BigDecimal::from_str(raw).expect("valid decimal")
    }

    fn full_input() -> QuoteInput {
        QuoteInput {
            quantity_kg: Some(dec("10")),
            display_unit_price_per_kg: display_unit_price(&dec("2"), &dec("0.1")),
            gutting_requested: true,
            gutting_price_per_kg: dec("0.5"),
            beta_rate: dec("0.05"),
            delivery_requested: true,
            delivery_fee_min: dec("1"),
            delivery_fee_max: dec("6"),
            free_delivery_min_kg: None,
        }
    }

    #[test]
    fn display_unit_price_applies_markup() {
        assert_eq!(display_unit_price(&dec("2"), &dec("0.1")), dec("2.2"));
        assert_eq!(display_unit_price(&dec("3"), &dec("0")), dec("3"));
    }

    #[test]
    fn full_breakdown_matches_hand_computation() {
        let quote = compute_quote(&full_input());
        assert_eq!(quote.fish_subtotal, dec("22"));
        assert_eq!(quote.gutting_fee, dec("5"));
        assert_eq!(quote.support_fee, dec("1.1"));
        assert_eq!(quote.delivery_min, dec("1"));
        assert_eq!(quote.delivery_max, dec("6"));
        assert_eq!(quote.total_min, dec("29.1"));
        assert_eq!(quote.total_max, dec("34.1"));
        assert!(quote.is_range);
        assert!(!quote.free_delivery_applied);
    }

    #[test]
    fn free_delivery_threshold_collapses_the_range() {
        let mut input = full_input();
        input.free_delivery_min_kg = Some(dec("8"));
        let quote = compute_quote(&input);
        assert_eq!(quote.delivery_min, BigDecimal::zero());
        assert_eq!(quote.delivery_max, BigDecimal::zero());
        assert_eq!(quote.total_min, dec("28.1"));
        assert_eq!(quote.total_max, dec("28.1"));
        assert!(!quote.is_range);
        assert!(quote.free_delivery_applied);
    }

    #[test]
    fn threshold_not_met_keeps_the_fee_range() {
        let mut input = full_input();
        input.free_delivery_min_kg = Some(dec("20"));
        let quote = compute_quote(&input);
        assert_eq!(quote.delivery_min, dec("1"));
        assert_eq!(quote.delivery_max, dec("6"));
        assert!(!quote.free_delivery_applied);
    }

    #[test]
    fn delivery_not_requested_ignores_threshold_and_fees() {
        let mut input = full_input();
        input.delivery_requested = false;
        input.free_delivery_min_kg = Some(dec("8"));
        let quote = compute_quote(&input);
        assert_eq!(quote.delivery_min, BigDecimal::zero());
        assert_eq!(quote.delivery_max, BigDecimal::zero());
        assert!(!quote.is_range);
        assert!(!quote.free_delivery_applied);
    }

    #[test]
    fn gutting_not_requested_drops_the_fee() {
        let mut input = full_input();
        input.gutting_requested = false;
        let quote = compute_quote(&input);
        assert_eq!(quote.gutting_fee, BigDecimal::zero());
        assert_eq!(quote.total_min, dec("24.1"));
    }

    #[test]
    fn missing_quantity_degrades_to_zero_without_failing() {
        let mut input = full_input();
        input.quantity_kg = None;
        let quote = compute_quote(&input);
        assert_eq!(quote.fish_subtotal, BigDecimal::zero());
        assert_eq!(quote.gutting_fee, BigDecimal::zero());
        assert_eq!(quote.support_fee, BigDecimal::zero());
        // Delivery is still requested and the threshold is not met, so the
        // tier bounds remain the only non-zero component.
        assert_eq!(quote.total_min, dec("1"));
        assert_eq!(quote.total_max, dec("6"));
    }

    #[test]
    fn lenient_decimal_rejects_garbage_and_blank_input() {
        assert_eq!(lenient_decimal(Some("2.5")), Some(dec("2.5")));
        assert_eq!(lenient_decimal(Some(" 2.5 ")), Some(dec("2.5")));
        assert_eq!(lenient_decimal(Some("abc")), None);
        assert_eq!(lenient_decimal(Some("")), None);
        assert_eq!(lenient_decimal(None), None);
    }

    #[test]
    fn single_tier_fee_collapses_the_range() {
        let mut input = full_input();
        input.delivery_fee_min = dec("3");
        input.delivery_fee_max = dec("3");
        let quote = compute_quote(&input);
        assert!(!quote.is_range);
        assert_eq!(quote.total_min, quote.total_max);
    }
}
