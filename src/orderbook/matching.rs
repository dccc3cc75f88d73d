//! Contains the core matching engine logic for the order book.
//!
//! Market orders sweep the opposite side best price first. Inside a price
//! level the [`Limit`] walks its queue in arrival order, so the combined rule
//! is strict price-time priority with execution at the resting price.

use super::book::OrderBook;
use super::error::OrderBookError;
use super::limit::{Limit, Match};
use super::order::{Order, OrderId, Price, Quantity, Side, UserId};
use super::trade::{FillSummary, Trade, TradeResult};
use crate::utils::monotonic_time_nanos;
use tracing::{debug, info, warn};

impl OrderBook {
    /// Execute `order` immediately against the opposite side of the book.
    ///
    /// The order must be fully fillable: when its size exceeds the total
    /// resting volume on the opposite side the call fails before touching
    /// any state. Otherwise limits are swept in price priority (asks lowest
    /// first for a bid, bids highest first for an ask), emptied limits are
    /// pruned, fully consumed resting orders leave the index, and every match
    /// is appended to the trade ledger with the incoming side as aggressor.
    ///
    /// The market order itself never rests and is not indexed.
    ///
    /// # Errors
    /// [`OrderBookError::InvalidSize`] for a non-positive size,
    /// [`OrderBookError::InsufficientLiquidity`] when the opposite side
    /// cannot absorb the order and [`OrderBookError::NotionalOverflow`] when
    /// the quote amount of the fill cannot be represented. The book is
    /// unchanged on every error.
    pub fn place_market_order(&mut self, mut order: Order) -> Result<Vec<Match>, OrderBookError> {
        Self::validate_size(order.size)?;

        let side = order.side;
        let available = self.total_volume(side.opposite());
        if order.size > available {
            warn!(
                "Order book {}: not enough volume [size: {}] for {} market order [size: {}]",
                self.market, available, side, order.size
            );
            return Err(OrderBookError::InsufficientLiquidity {
                side,
                requested: order.size,
                available,
            });
        }

        if self.simulate_market_order(side, order.size).notional.is_none() {
            warn!(
                "Order book {}: notional overflow for {} market order [size: {}]",
                self.market, side, order.size
            );
            return Err(OrderBookError::NotionalOverflow {
                side,
                size: order.size,
            });
        }

        let mut matches = Vec::new();
        let mut filled_orders = Vec::new();
        let mut empty_limits = Vec::new();

        let levels = match side {
            Side::Bid => &mut self.asks,
            Side::Ask => &mut self.bids,
        };

        let price_iter: Box<dyn Iterator<Item = (&Price, &mut Limit)> + '_> = match side {
            Side::Bid => Box::new(levels.iter_mut()),
            Side::Ask => Box::new(levels.iter_mut().rev()),
        };

        for (price, limit) in price_iter {
            let fill = limit.fill(&mut order);
            matches.extend(fill.matches);
            filled_orders.extend(fill.filled_orders.iter().map(Order::id));

            if limit.is_empty() {
                empty_limits.push(*price);
            }

            if order.is_filled() {
                break;
            }
        }

        for price in &empty_limits {
            levels.remove(price);
        }

        for order_id in &filled_orders {
            self.orders.remove(order_id);
        }

        for m in &matches {
            self.trades.append(Trade::from_match(m, monotonic_time_nanos()));
        }

        debug_assert!(order.is_filled(), "market order left unfilled");
        debug_assert!(self.check_invariants());

        let summary = FillSummary::from_matches(&matches);
        info!(
            "Order book {}: filled market order => ID: {} | side: {} | size: {} | price: {}",
            self.market,
            order.id,
            side,
            summary.total_size,
            summary.average_price.unwrap_or_default()
        );
        debug!(
            "Order book {}: {} matches, {} limits removed, {} resting orders filled",
            self.market,
            matches.len(),
            empty_limits.len(),
            filled_orders.len()
        );

        if let Some(listener) = &self.trade_listener {
            listener(&TradeResult::new(
                self.market.clone(),
                order.id,
                side,
                matches.clone(),
            ));
        }

        Ok(matches)
    }

    /// Create a market order for `user_id` and execute it.
    ///
    /// Returns the id given to the market order together with its matches.
    ///
    /// # Errors
    /// Same as [`Self::place_market_order`].
    pub fn submit_market_order(
        &mut self,
        user_id: impl Into<UserId>,
        side: Side,
        size: Quantity,
    ) -> Result<(OrderId, Vec<Match>), OrderBookError> {
        let order = Order::new(user_id, side, size);
        let order_id = order.id;
        let matches = self.place_market_order(order)?;
        Ok((order_id, matches))
    }

    /// Estimate the execution of a market order without mutating the book.
    ///
    /// Walks the opposite side in priority order and stops once `size` is
    /// covered. When the book cannot absorb the full size the summary covers
    /// only the available volume. A notional that cannot be represented is
    /// reported as `None` together with the average price.
    #[must_use]
    pub fn simulate_market_order(&self, side: Side, size: Quantity) -> FillSummary {
        let mut remaining = size;
        let mut summary = FillSummary::default();

        'levels: for limit in self.limits(side.opposite()) {
            for resting in limit.orders() {
                if remaining <= Quantity::ZERO {
                    break 'levels;
                }
                let take = remaining.min(resting.size());
                remaining -= take;
                summary.add(limit.price(), take);
            }
        }

        summary
    }
}
