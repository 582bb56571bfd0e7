//! Trade records emitted by the backtest simulator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fill direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Sign for position arithmetic (+1 for buy, -1 for sell).
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => -Decimal::ONE,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// One round trip (or still-open leg) through a position.
///
/// Created by the simulator when the position changes sign or magnitude.
/// A trade still held at the end of the series keeps `exit_index == None`;
/// closed trades are never mutated again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Bar index the position was opened at
    pub entry_index: usize,
    /// Timestamp of the entry bar (Unix ms)
    pub entry_timestamp: i64,
    /// Bar index the position was closed at, if closed
    pub exit_index: Option<usize>,
    /// Timestamp of the exit bar, if closed
    pub exit_timestamp: Option<i64>,
    /// Signed quantity (positive long, negative short)
    pub quantity: Decimal,
    /// Fill price at entry, slippage included
    pub entry_price: Decimal,
    /// Fill price at exit, slippage included
    pub exit_price: Option<Decimal>,
    /// Total commissions charged on entry and exit
    pub costs: Decimal,
    /// Realized P&L net of costs; `None` while the trade is open
    pub pnl: Option<Decimal>,
}

impl Trade {
    /// Open a new trade.
    pub fn open(
        entry_index: usize,
        entry_timestamp: i64,
        quantity: Decimal,
        entry_price: Decimal,
        entry_cost: Decimal,
    ) -> Self {
        Self {
            entry_index,
            entry_timestamp,
            exit_index: None,
            exit_timestamp: None,
            quantity,
            entry_price,
            exit_price: None,
            costs: entry_cost,
            pnl: None,
        }
    }

    /// Close the trade at a fill price, charging the exit commission.
    pub fn close(
        &mut self,
        exit_index: usize,
        exit_timestamp: i64,
        exit_price: Decimal,
        exit_cost: Decimal,
    ) {
        self.exit_index = Some(exit_index);
        self.exit_timestamp = Some(exit_timestamp);
        self.exit_price = Some(exit_price);
        self.costs += exit_cost;
        self.pnl = Some(self.quantity * (exit_price - self.entry_price) - self.costs);
    }

    /// Whether the trade is still open.
    pub fn is_open(&self) -> bool {
        self.exit_index.is_none()
    }

    /// Whether the trade ended profitable. Open trades report `None`.
    pub fn is_winner(&self) -> Option<bool> {
        self.pnl.map(|p| p > Decimal::ZERO)
    }
}
