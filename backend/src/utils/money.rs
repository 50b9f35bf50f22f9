//! Integer money arithmetic.
//!
//! All amounts are minor units (cents) and all VAT rates are basis points,
//! so every computation stays in `i64` with a single well-defined rounding
//! step per line.

use serde::{Deserialize, Serialize};

/// Net, VAT and gross amounts of one priced sale line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineAmounts {
    pub net_cents: i64,
    pub vat_cents: i64,
    pub total_cents: i64,
}

/// VAT due on a net amount, rounded half-up.
pub fn vat_amount(net_cents: i64, vat_rate_bps: i64) -> i64 {
    (net_cents * vat_rate_bps + 5_000) / 10_000
}

/// Prices one sale line: net is quantity times unit price, VAT is rounded
/// half-up on the net.
pub fn line_amounts(unit_price_cents: i64, quantity: i64, vat_rate_bps: i64) -> LineAmounts {
    let net_cents = unit_price_cents * quantity;
    let vat_cents = vat_amount(net_cents, vat_rate_bps);
    LineAmounts {
        net_cents,
        vat_cents,
        total_cents: net_cents + vat_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vat_rounds_half_up() {
        // 7.5% of 100 cents = 7.5 cents, rounds to 8.
        assert_eq!(vat_amount(100, 750), 8);
        // 7.5% of 1000 cents = 75 cents exactly.
        assert_eq!(vat_amount(1000, 750), 75);
        // 7.5% of 99 cents = 7.425, rounds down to 7.
        assert_eq!(vat_amount(99, 750), 7);
        assert_eq!(vat_amount(0, 750), 0);
        assert_eq!(vat_amount(12345, 0), 0);
    }

    #[test]
    fn line_amounts_combine_quantity_and_vat() {
        let line = line_amounts(250, 3, 750);
        assert_eq!(line.net_cents, 750);
        assert_eq!(line.vat_cents, 56); // 56.25 rounds down
        assert_eq!(line.total_cents, 806);

        let exempt = line_amounts(500, 2, 0);
        assert_eq!(exempt.net_cents, 1000);
        assert_eq!(exempt.vat_cents, 0);
        assert_eq!(exempt.total_cents, 1000);
    }
}
