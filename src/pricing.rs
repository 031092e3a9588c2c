//! # Price Calculator
//!
//! Pure money arithmetic for carts and orders. Amounts are
//! [`Decimal`]s at currency precision (two places); the subtotal is rounded
//! half away from zero, so `0.005` becomes `0.01`.

use crate::model::{CartAggregate, CartLine, RestaurantRef};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CURRENCY_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("{fee} fee must not be negative (got {amount})")]
    NegativeFee { fee: &'static str, amount: Decimal },

    #[error("order amount is too large to price")]
    Overflow,
}

/// Delivery and service fees for one restaurant.
///
/// Both fees are non-negative by construction, which keeps every computed
/// total non-negative too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    delivery_fee: Decimal,
    service_fee: Decimal,
}

impl FeeSchedule {
    pub fn new(delivery_fee: Decimal, service_fee: Decimal) -> Result<Self, PricingError> {
        Ok(Self {
            delivery_fee: non_negative("delivery", delivery_fee)?,
            service_fee: non_negative("service", service_fee)?,
        })
    }

    /// The storefront's stock fees: 10.00 delivery and 5.00 service.
    pub fn standard() -> Self {
        Self {
            delivery_fee: Decimal::new(1000, 2),
            service_fee: Decimal::new(500, 2),
        }
    }

    /// Fees for `restaurant`, falling back to `defaults` for anything the
    /// restaurant does not set.
    pub fn for_restaurant(
        restaurant: &RestaurantRef,
        defaults: &FeeSchedule,
    ) -> Result<Self, PricingError> {
        Self::new(
            restaurant.delivery_fee.unwrap_or(defaults.delivery_fee),
            restaurant.service_fee.unwrap_or(defaults.service_fee),
        )
    }

    pub fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    pub fn service_fee(&self) -> Decimal {
        self.service_fee
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for FeeSchedule {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            delivery_fee: Decimal,
            service_fee: Decimal,
        }
        let raw = Raw::deserialize(deserializer)?;
        FeeSchedule::new(raw.delivery_fee, raw.service_fee).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
}

pub struct PriceCalculator;

impl PriceCalculator {
    pub fn compute(cart: &CartAggregate, fees: &FeeSchedule) -> Result<PriceBreakdown, PricingError> {
        Self::compute_lines(cart.lines(), fees)
    }

    /// Fails with [`PricingError::Overflow`] when any line total, the
    /// subtotal or the grand total leaves `Decimal`'s range.
    pub fn compute_lines(
        lines: &[CartLine],
        fees: &FeeSchedule,
    ) -> Result<PriceBreakdown, PricingError> {
        let exact = lines.iter().try_fold(Decimal::ZERO, |sum, line| {
            line.line_total().and_then(|total| sum.checked_add(total))
        });
        let subtotal = round_currency(exact.ok_or(PricingError::Overflow)?);
        let delivery_fee = round_currency(fees.delivery_fee);
        let service_fee = round_currency(fees.service_fee);
        let total = subtotal
            .checked_add(delivery_fee)
            .and_then(|sum| sum.checked_add(service_fee))
            .ok_or(PricingError::Overflow)?;
        Ok(PriceBreakdown {
            subtotal,
            delivery_fee,
            service_fee,
            total,
        })
    }
}

pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn non_negative(fee: &'static str, amount: Decimal) -> Result<Decimal, PricingError> {
    if amount < Decimal::ZERO {
        return Err(PricingError::NegativeFee { fee, amount });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuItem;
    use proptest::prelude::*;

    fn cents(value: i64) -> Decimal {
        Decimal::new(value, 2)
    }

    #[test]
    fn test_empty_cart_costs_only_fees() {
        let breakdown =
            PriceCalculator::compute(&CartAggregate::new(), &FeeSchedule::standard()).unwrap();
        assert_eq!(breakdown.subtotal, Decimal::ZERO);
        assert_eq!(breakdown.total, cents(1500));
    }

    #[test]
    fn test_subtotal_rounds_half_away_from_zero() {
        let mut cart = CartAggregate::new();
        // 3 x 0.335 = 1.005
        cart.add(&MenuItem::new("m1", "Mint", Decimal::new(335, 3)), &"r1".into())
            .unwrap();
        cart.set_quantity(&"m1".into(), 3).unwrap();

        let fees = FeeSchedule::new(Decimal::ZERO, Decimal::ZERO).unwrap();
        let breakdown = PriceCalculator::compute(&cart, &fees).unwrap();
        assert_eq!(breakdown.subtotal, cents(101));
        assert_eq!(breakdown.total, cents(101));
    }

    #[test]
    fn test_negative_fee_is_rejected() {
        let err = FeeSchedule::new(cents(-1), cents(0)).unwrap_err();
        assert_eq!(
            err,
            PricingError::NegativeFee {
                fee: "delivery",
                amount: cents(-1)
            }
        );
        assert!(serde_json::from_str::<FeeSchedule>(
            r#"{"deliveryFee":"1.00","serviceFee":"-2.00"}"#
        )
        .is_err());
    }

    #[test]
    fn test_restaurant_overrides_defaults() {
        let restaurant = RestaurantRef {
            delivery_fee: Some(cents(1500)),
            ..RestaurantRef::new("r1", "Mobile Diner")
        };
        let fees = FeeSchedule::for_restaurant(&restaurant, &FeeSchedule::standard()).unwrap();
        assert_eq!(fees.delivery_fee(), cents(1500));
        assert_eq!(fees.service_fee(), cents(500));
    }

    #[test]
    fn test_amounts_beyond_decimal_range_are_an_error() {
        let line = |price: Decimal, quantity| CartLine {
            item_id: "m1".into(),
            name: "Caviar".into(),
            unit_price: price,
            quantity,
        };
        let fees = FeeSchedule::standard();

        let doubled = [line(Decimal::MAX, 2)];
        assert_eq!(
            PriceCalculator::compute_lines(&doubled, &fees),
            Err(PricingError::Overflow)
        );

        let summed = [line(Decimal::MAX, 1), line(Decimal::ONE, 1)];
        assert_eq!(
            PriceCalculator::compute_lines(&summed, &fees),
            Err(PricingError::Overflow)
        );

        // The subtotal fits but the fees push the total over.
        let at_limit = [line(Decimal::MAX, 1)];
        assert_eq!(
            PriceCalculator::compute_lines(&at_limit, &fees),
            Err(PricingError::Overflow)
        );
        let free = FeeSchedule::new(Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(
            PriceCalculator::compute_lines(&at_limit, &free).unwrap().total,
            Decimal::MAX
        );
    }

    fn line_strategy() -> impl Strategy<Value = CartLine> {
        (0i64..100_000, 0u32..4, 1u32..20).prop_map(|(price, scale, quantity)| CartLine {
            item_id: format!("m{price}").into(),
            name: "Item".into(),
            unit_price: Decimal::new(price, scale),
            quantity,
        })
    }

    proptest! {
        #[test]
        fn prop_total_is_subtotal_plus_fees(
            lines in prop::collection::vec(line_strategy(), 0..8),
            delivery in 0i64..5_000,
            service in 0i64..5_000,
        ) {
            let fees = FeeSchedule::new(cents(delivery), cents(service)).unwrap();
            let breakdown = PriceCalculator::compute_lines(&lines, &fees).unwrap();

            prop_assert_eq!(
                breakdown.total,
                breakdown.subtotal + breakdown.delivery_fee + breakdown.service_fee
            );
            prop_assert!(breakdown.subtotal >= Decimal::ZERO);
            prop_assert!(breakdown.total >= breakdown.subtotal);
            prop_assert!(breakdown.subtotal.scale() <= CURRENCY_SCALE);

            let exact: Decimal = lines
                .iter()
                .map(|line| line.unit_price * Decimal::from(line.quantity))
                .sum();
            prop_assert!((breakdown.subtotal - exact).abs() <= Decimal::new(5, 3));
            prop_assert_eq!(Ok(breakdown), PriceCalculator::compute_lines(&lines, &fees));
        }
    }
}
