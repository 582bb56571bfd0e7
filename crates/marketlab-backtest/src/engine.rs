//! Bar-by-bar position simulation.

use marketlab_core::error::{BacktestError, EngineResult};
use marketlab_core::types::{Bar, BarSeries, EquityCurve, Position, Side, SignalSeries, Trade};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

const BPS: Decimal = dec!(10000);

/// Commission charged per fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", content = "value", rename_all = "snake_case")]
pub enum CommissionModel {
    /// Flat amount per fill
    Fixed(Decimal),
    /// Rate applied to fill notional (0.001 = 0.1%)
    Proportional(Decimal),
}

impl CommissionModel {
    fn charge(&self, notional: Decimal) -> Decimal {
        match self {
            CommissionModel::Fixed(fee) => *fee,
            CommissionModel::Proportional(rate) => notional * rate,
        }
    }
}

impl Default for CommissionModel {
    fn default() -> Self {
        CommissionModel::Proportional(dec!(0.001))
    }
}

/// Backtest simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Starting cash
    pub initial_capital: Decimal,
    /// Basis points charged against the fill direction
    pub slippage_bps: Decimal,
    /// Commission model applied to every fill
    pub commission: CommissionModel,
    /// Signal level that opens a long position
    pub enter_long: f64,
    /// Signal level that opens a short position (when shorts are enabled)
    pub enter_short: f64,
    /// Crossing this level back toward zero flattens the position
    pub exit_threshold: f64,
    /// Whether short positions may be opened
    pub allow_short: bool,
    /// Fraction of current equity allocated to a new position, costs
    /// included
    pub sizing_fraction: Decimal,
    /// Hard cash floor; a fill that would breach it aborts the run
    pub cash_floor: Decimal,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_capital: dec!(100000),
            slippage_bps: dec!(5),
            commission: CommissionModel::default(),
            enter_long: 0.5,
            enter_short: -0.5,
            exit_threshold: 0.0,
            allow_short: false,
            sizing_fraction: Decimal::ONE,
            cash_floor: Decimal::ZERO,
        }
    }
}

impl SimulatorConfig {
    fn validate(&self) -> Result<(), BacktestError> {
        if self.initial_capital <= Decimal::ZERO {
            return Err(BacktestError::InvalidParameter(
                "initial capital must be positive".to_string(),
            ));
        }
        if self.sizing_fraction <= Decimal::ZERO || self.sizing_fraction > Decimal::ONE {
            return Err(BacktestError::InvalidParameter(
                "sizing fraction must be in (0, 1]".to_string(),
            ));
        }
        if self.slippage_bps < Decimal::ZERO {
            return Err(BacktestError::InvalidParameter(
                "slippage cannot be negative".to_string(),
            ));
        }
        if !(self.enter_long.is_finite()
            && self.enter_short.is_finite()
            && self.exit_threshold.is_finite())
        {
            return Err(BacktestError::InvalidParameter(
                "signal thresholds must be finite".to_string(),
            ));
        }
        if self.enter_long <= self.exit_threshold {
            return Err(BacktestError::InvalidParameter(
                "enter-long threshold must sit above the exit threshold".to_string(),
            ));
        }
        if self.enter_short >= self.exit_threshold {
            return Err(BacktestError::InvalidParameter(
                "enter-short threshold must sit below the exit threshold".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything a finished simulation hands to the analyzer and the
/// reporting collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Equity marked at every bar close
    pub equity_curve: EquityCurve,
    /// Closed trades plus at most one open terminal trade
    pub trades: Vec<Trade>,
    /// Terminal position, marked but not force-closed
    pub final_position: Position,
    /// Terminal cash
    pub cash: Decimal,
    /// Net P&L realized by closed trades
    pub realized_pnl: Decimal,
    /// Mark-to-market P&L of the terminal open position
    pub unrealized_pnl: Decimal,
}

/// Deterministic, lookahead-free signal replay.
///
/// Walks the series in order, keeping a {flat, long, short} state driven by
/// the configured thresholds. Bars with an undefined signal never trigger a
/// transition. A run either completes the full series or fails atomically;
/// no partial curve is returned.
#[derive(Debug, Clone)]
pub struct BacktestSimulator {
    config: SimulatorConfig,
}

impl BacktestSimulator {
    /// Create a simulator, validating the configuration.
    pub fn new(config: SimulatorConfig) -> Result<Self, BacktestError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Replay the signal over the series.
    pub fn run(&self, series: &BarSeries, signal: &SignalSeries) -> EngineResult<BacktestResult> {
        if signal.len() != series.len() {
            return Err(BacktestError::InvalidParameter(format!(
                "signal length {} does not match series length {}",
                signal.len(),
                series.len()
            ))
            .into());
        }

        let mut cash = self.config.initial_capital;
        let mut position = Position::flat();
        let mut trades: Vec<Trade> = Vec::new();
        let mut curve = EquityCurve::new();

        for (index, bar) in series.iter().enumerate() {
            let close = to_decimal(bar.close);

            // 1. Mark the open position to this close
            position.mark(close);

            // 2. Evaluate the signal; an undefined signal holds state
            if let Some(value) = signal.get(index) {
                if position.is_long() && value <= self.config.exit_threshold {
                    self.close_position(&mut cash, &mut position, &mut trades, index, bar)?;
                } else if position.is_short() && value >= self.config.exit_threshold {
                    self.close_position(&mut cash, &mut position, &mut trades, index, bar)?;
                }

                if position.is_flat() {
                    if value > self.config.enter_long {
                        self.open_position(
                            Side::Buy,
                            &mut cash,
                            &mut position,
                            &mut trades,
                            index,
                            bar,
                        )?;
                    } else if self.config.allow_short && value < self.config.enter_short {
                        self.open_position(
                            Side::Sell,
                            &mut cash,
                            &mut position,
                            &mut trades,
                            index,
                            bar,
                        )?;
                    }
                }
            }

            // 3. Record equity at the close
            curve.push(bar.timestamp, cash + position.market_value());
        }

        let realized_pnl = trades.iter().filter_map(|t| t.pnl).sum();
        let unrealized_pnl = position.unrealized_pnl;

        debug!(
            symbol = %series.symbol,
            bars = series.len(),
            trades = trades.len(),
            %realized_pnl,
            %unrealized_pnl,
            "simulation complete"
        );

        Ok(BacktestResult {
            equity_curve: curve,
            trades,
            final_position: position,
            cash,
            realized_pnl,
            unrealized_pnl,
        })
    }

    /// Fill price for a taker on `side`: slippage always works against the
    /// fill direction.
    fn fill_price(&self, close: Decimal, side: Side) -> Decimal {
        close * (Decimal::ONE + side.sign() * self.config.slippage_bps / BPS)
    }

    fn open_position(
        &self,
        side: Side,
        cash: &mut Decimal,
        position: &mut Position,
        trades: &mut Vec<Trade>,
        index: usize,
        bar: &Bar,
    ) -> Result<(), BacktestError> {
        let fill_price = self.fill_price(to_decimal(bar.close), side);
        if fill_price <= Decimal::ZERO {
            return Ok(());
        }

        let equity = *cash + position.market_value();
        let allocation = equity * self.config.sizing_fraction;

        // The allocation covers the commission as well as the notional;
        // taking the commission as the exact remainder keeps
        // notional + commission == allocation under Decimal rounding
        let (notional, commission) = match self.config.commission {
            CommissionModel::Proportional(rate) => {
                let notional = allocation / (Decimal::ONE + rate);
                (notional, allocation - notional)
            }
            CommissionModel::Fixed(fee) => (allocation - fee, fee),
        };

        if notional <= Decimal::ZERO {
            return Err(BacktestError::InsufficientCapital {
                required: commission,
                available: allocation,
            });
        }

        let cash_after = match side {
            Side::Buy => *cash - notional - commission,
            Side::Sell => *cash + notional - commission,
        };
        if cash_after < self.config.cash_floor {
            return Err(BacktestError::InsufficientCapital {
                required: notional + commission,
                available: *cash - self.config.cash_floor,
            });
        }

        let quantity = notional / fill_price;
        position.apply_fill(side, quantity, fill_price);
        *cash = cash_after;

        debug!(index, %fill_price, %quantity, side = %side, "opened position");
        trades.push(Trade::open(
            index,
            bar.timestamp,
            side.sign() * quantity,
            fill_price,
            commission,
        ));
        Ok(())
    }

    fn close_position(
        &self,
        cash: &mut Decimal,
        position: &mut Position,
        trades: &mut Vec<Trade>,
        index: usize,
        bar: &Bar,
    ) -> Result<(), BacktestError> {
        let side = if position.is_long() {
            Side::Sell
        } else {
            Side::Buy
        };
        let quantity = position.quantity.abs();
        let fill_price = self.fill_price(to_decimal(bar.close), side);
        let notional = quantity * fill_price;
        let commission = self.config.commission.charge(notional);

        let cash_after = match side {
            Side::Sell => *cash + notional - commission,
            Side::Buy => *cash - notional - commission,
        };
        if cash_after < self.config.cash_floor {
            return Err(BacktestError::InsufficientCapital {
                required: notional + commission,
                available: *cash - self.config.cash_floor,
            });
        }

        position.apply_fill(side, quantity, fill_price);
        *cash = cash_after;

        debug!(index, %fill_price, %quantity, side = %side, "closed position");
        if let Some(trade) = trades.last_mut().filter(|t| t.is_open()) {
            trade.close(index, bar.timestamp, fill_price, commission);
        }
        Ok(())
    }
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default()
}
