//! A single price level: a FIFO queue of resting orders at one price on one
//! side of the book, plus the fill arithmetic between two orders.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::order::{Order, OrderId, Price, Quantity, Side, UserId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::trace;

/// One execution between a bid and an ask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Id of the ask (sell) order
    pub ask_order_id: OrderId,
    /// Id of the bid (buy) order
    pub bid_order_id: OrderId,
    /// Owner of the ask order
    pub ask_user_id: UserId,
    /// Owner of the bid order
    pub bid_user_id: UserId,
    /// Executed size
    pub size_filled: Quantity,
    /// Execution price, always the price of the resting limit
    pub price: Price,
    /// Side of the incoming (aggressor) order
    pub taker_side: Side,
}

impl Match {
    /// Id of the resting (maker) order.
    #[must_use]
    pub fn maker_order_id(&self) -> OrderId {
        match self.taker_side {
            Side::Bid => self.ask_order_id,
            Side::Ask => self.bid_order_id,
        }
    }

    /// Id of the incoming (taker) order.
    #[must_use]
    pub fn taker_order_id(&self) -> OrderId {
        match self.taker_side {
            Side::Bid => self.bid_order_id,
            Side::Ask => self.ask_order_id,
        }
    }

    #[must_use]
    pub fn maker_user_id(&self) -> &str {
        match self.taker_side {
            Side::Bid => &self.ask_user_id,
            Side::Ask => &self.bid_user_id,
        }
    }

    #[must_use]
    pub fn taker_user_id(&self) -> &str {
        match self.taker_side {
            Side::Bid => &self.bid_user_id,
            Side::Ask => &self.ask_user_id,
        }
    }

    /// Price times size, `None` when the product cannot be represented.
    #[must_use]
    pub fn notional(&self) -> Option<Quantity> {
        self.price.checked_mul(self.size_filled)
    }
}

/// Outcome of filling an incoming order against one limit.
#[derive(Debug, Default)]
pub struct LimitFill {
    /// Matches in the order they were produced (FIFO over resting orders)
    pub matches: Vec<Match>,
    /// Resting orders that were fully consumed and removed from the limit
    pub filled_orders: Vec<Order>,
}

/// All resting orders at one price on one side of the book.
#[derive(Debug, Clone)]
pub struct Limit {
    price: Price,
    orders: VecDeque<Order>,
    total_volume: Quantity,
}

impl Limit {
    /// Create an empty limit at `price`.
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_volume: Quantity::ZERO,
        }
    }

    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Sum of the remaining sizes of the resident orders.
    #[must_use]
    pub fn total_volume(&self) -> Quantity {
        self.total_volume
    }

    /// Number of resident orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resident orders in time priority.
    pub fn orders(&self) -> impl DoubleEndedIterator<Item = &Order> + ExactSizeIterator {
        self.orders.iter()
    }

    /// The order first in line at this price.
    #[must_use]
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    #[must_use]
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    /// Append an order to the back of the queue.
    ///
    /// # Errors
    /// [`OrderBookError::VolumeOverflow`] when the aggregate volume would no
    /// longer be representable. The limit is unchanged.
    pub fn add_order(&mut self, mut order: Order) -> Result<(), OrderBookError> {
        self.total_volume = self.total_volume.checked_add(order.size).ok_or(
            OrderBookError::VolumeOverflow {
                side: order.side,
                price: self.price,
                size: order.size,
            },
        )?;
        order.limit = Some(self.price);
        trace!(
            "Limit {}: added order {} size {}",
            self.price, order.id, order.size
        );
        self.orders.push_back(order);
        self.debug_check_volume();
        Ok(())
    }

    /// Remove an order by id.
    ///
    /// Returns the removed order with its back-reference cleared, or `None`
    /// when the order is not resident here (the volume is left untouched).
    /// The caller is responsible for evicting the order from the book's id
    /// index.
    pub fn delete_order(&mut self, order_id: OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|o| o.id == order_id)?;
        let mut order = self.orders.remove(position)?;
        order.limit = None;
        self.total_volume -= order.size;
        trace!(
            "Limit {}: deleted order {} size {}",
            self.price, order.id, order.size
        );
        self.debug_check_volume();
        Some(order)
    }

    /// Fill `incoming` against the resident orders in time priority.
    ///
    /// Stops as soon as `incoming` is filled, leaving the rest of the queue
    /// untouched. Resident orders that are fully consumed are removed and
    /// returned in [`LimitFill::filled_orders`].
    pub fn fill(&mut self, incoming: &mut Order) -> LimitFill {
        let mut fill = LimitFill::default();
        let mut filled_ids = Vec::new();
        let mut size_matched = Quantity::ZERO;

        for resting in self.orders.iter_mut() {
            if incoming.is_filled() {
                break;
            }

            let m = Self::fill_order(incoming, resting, self.price);
            size_matched += m.size_filled;
            fill.matches.push(m);

            if resting.is_filled() {
                filled_ids.push(resting.id);
            }
        }

        self.total_volume -= size_matched;

        for order_id in filled_ids {
            if let Some(order) = self.delete_order(order_id) {
                fill.filled_orders.push(order);
            }
        }

        self.debug_check_volume();
        fill
    }

    /// Execute the incoming `taker` against the resting `maker` at `price`.
    ///
    /// The bid and ask ids are assigned from each order's side; the match's
    /// `taker_side` is always `taker`'s side. Both sizes drop by the smaller
    /// of the two and the execution price is the resting limit's price.
    pub(crate) fn fill_order(taker: &mut Order, maker: &mut Order, price: Price) -> Match {
        debug_assert_ne!(taker.side, maker.side, "orders on the same side cannot match");

        let size_filled = taker.size.min(maker.size);
        taker.reduce(size_filled);
        maker.reduce(size_filled);

        let (bid, ask) = if taker.is_bid() {
            (&*taker, &*maker)
        } else {
            (&*maker, &*taker)
        };

        Match {
            ask_order_id: ask.id,
            bid_order_id: bid.id,
            ask_user_id: ask.user_id.clone(),
            bid_user_id: bid.user_id.clone(),
            size_filled,
            price,
            taker_side: taker.side,
        }
    }

    #[inline]
    fn debug_check_volume(&self) {
        debug_assert_eq!(
            self.total_volume,
            self.orders.iter().map(|o| o.size).sum::<Quantity>(),
            "aggregate volume drifted from resident order sizes at {}",
            self.price
        );
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[price: {} | total volume: {}]",
            self.price, self.total_volume
        )
    }
}
