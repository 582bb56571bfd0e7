//! Position state owned by the backtest simulator.

use num_traits::Signed;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// Holdings in a single instrument.
///
/// Quantity is signed: positive for long, negative for short, zero for
/// flat. Only the backtest simulator mutates a position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    /// Signed quantity held
    pub quantity: Decimal,
    /// Average entry price of the open quantity
    pub avg_entry_price: Decimal,
    /// Last price the position was marked at
    pub current_price: Decimal,
    /// Unrealized profit/loss at the current mark
    pub unrealized_pnl: Decimal,
    /// Realized profit/loss accumulated over closed quantity
    pub realized_pnl: Decimal,
}

impl Position {
    /// A flat position.
    pub fn flat() -> Self {
        Self::default()
    }

    /// Check if this is a long position.
    pub fn is_long(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Check if this is a short position.
    pub fn is_short(&self) -> bool {
        self.quantity < Decimal::ZERO
    }

    /// Check if the position is flat.
    pub fn is_flat(&self) -> bool {
        self.quantity == Decimal::ZERO
    }

    /// Market value at the current mark.
    pub fn market_value(&self) -> Decimal {
        self.quantity * self.current_price
    }

    /// Mark the position to a new price and refresh unrealized P&L.
    pub fn mark(&mut self, price: Decimal) {
        self.current_price = price;
        self.unrealized_pnl = self.quantity * (price - self.avg_entry_price);
    }

    /// Apply a fill. Returns the realized P&L of any closed quantity.
    pub fn apply_fill(&mut self, side: Side, quantity: Decimal, price: Decimal) -> Decimal {
        let fill_qty = side.sign() * quantity;

        let mut realized = Decimal::ZERO;

        let same_direction = (self.quantity > Decimal::ZERO && fill_qty > Decimal::ZERO)
            || (self.quantity < Decimal::ZERO && fill_qty < Decimal::ZERO);

        if same_direction || self.quantity == Decimal::ZERO {
            // Adding to the position: update the average entry price
            let total_cost = self.quantity * self.avg_entry_price + fill_qty * price;
            let new_quantity = self.quantity + fill_qty;
            if new_quantity != Decimal::ZERO {
                self.avg_entry_price = total_cost / new_quantity;
            }
            self.quantity = new_quantity;
        } else {
            // Reducing or reversing
            let close_qty = fill_qty.abs().min(self.quantity.abs());

            realized = if self.quantity > Decimal::ZERO {
                close_qty * (price - self.avg_entry_price)
            } else {
                close_qty * (self.avg_entry_price - price)
            };
            self.realized_pnl += realized;

            let remaining = fill_qty.abs() - close_qty;
            if remaining > Decimal::ZERO {
                // Position reversed
                self.quantity = fill_qty.signum() * remaining;
                self.avg_entry_price = price;
            } else {
                self.quantity += fill_qty;
                if self.quantity == Decimal::ZERO {
                    self.avg_entry_price = Decimal::ZERO;
                }
            }
        }

        self.mark(price);
        realized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_open_and_mark() {
        let mut position = Position::flat();
        position.apply_fill(Side::Buy, dec!(100), dec!(150));

        assert!(position.is_long());
        assert_eq!(position.avg_entry_price, dec!(150));

        position.mark(dec!(160));
        assert_eq!(position.unrealized_pnl, dec!(1000));
        assert_eq!(position.market_value(), dec!(16000));
    }

    #[test]
    fn test_average_up() {
        let mut position = Position::flat();
        position.apply_fill(Side::Buy, dec!(100), dec!(150));
        let realized = position.apply_fill(Side::Buy, dec!(100), dec!(160));

        assert_eq!(realized, Decimal::ZERO);
        assert_eq!(position.quantity, dec!(200));
        assert_eq!(position.avg_entry_price, dec!(155));
    }

    #[test]
    fn test_close_realizes_pnl() {
        let mut position = Position::flat();
        position.apply_fill(Side::Buy, dec!(100), dec!(150));
        let realized = position.apply_fill(Side::Sell, dec!(100), dec!(160));

        assert_eq!(realized, dec!(1000));
        assert!(position.is_flat());
        assert_eq!(position.realized_pnl, dec!(1000));
        assert_eq!(position.unrealized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_short_round_trip() {
        let mut position = Position::flat();
        position.apply_fill(Side::Sell, dec!(50), dec!(200));
        assert!(position.is_short());

        let realized = position.apply_fill(Side::Buy, dec!(50), dec!(190));
        assert_eq!(realized, dec!(500));
        assert!(position.is_flat());
    }

    #[test]
    fn test_reversal() {
        let mut position = Position::flat();
        position.apply_fill(Side::Buy, dec!(100), dec!(100));
        let realized = position.apply_fill(Side::Sell, dec!(150), dec!(110));

        assert_eq!(realized, dec!(1000));
        assert_eq!(position.quantity, dec!(-50));
        assert_eq!(position.avg_entry_price, dec!(110));
    }
}
