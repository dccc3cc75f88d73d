//! Order book operations like placing and canceling resting orders

use super::book::{OrderBook, OrderLocation};
use super::error::OrderBookError;
use super::limit::Limit;
use super::order::{Order, OrderId, Price, Quantity, Side, UserId};
use tracing::trace;

impl OrderBook {
    /// Rest `order` at `price` on its side of the book.
    ///
    /// The limit for that price is created on first use. No crossing check
    /// is made against the opposite side: a limit order priced through the
    /// best opposite price simply rests, and only market orders take
    /// liquidity.
    ///
    /// # Errors
    /// [`OrderBookError::InvalidSize`] for a non-positive remaining size,
    /// [`OrderBookError::InvalidPrice`] / [`OrderBookError::InvalidTickSize`]
    /// for a bad price, [`OrderBookError::DuplicateOrderId`] when the id is
    /// already resting and [`OrderBookError::VolumeOverflow`] when the side's
    /// total volume could no longer be represented.
    pub fn place_limit_order(
        &mut self,
        order: Order,
        price: Price,
    ) -> Result<OrderId, OrderBookError> {
        Self::validate_size(order.size)?;
        self.validate_price(price)?;
        if self.orders.contains_key(&order.id) {
            return Err(OrderBookError::DuplicateOrderId(order.id));
        }

        let (order_id, side) = (order.id, order.side);
        if self.total_volume(side).checked_add(order.size).is_none() {
            return Err(OrderBookError::VolumeOverflow {
                side,
                price,
                size: order.size,
            });
        }

        trace!(
            "Order book {}: placing limit order {} {} {} @ {}",
            self.market, order_id, side, order.size, price
        );

        let levels = match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        let limit = levels.entry(price).or_insert_with(|| {
            trace!("Order book {}: new {} limit at {}", self.market, side, price);
            Limit::new(price)
        });
        if let Err(error) = limit.add_order(order) {
            if limit.is_empty() {
                levels.remove(&price);
            }
            return Err(error);
        }

        self.orders.insert(order_id, OrderLocation { side, price });
        Ok(order_id)
    }

    /// Create an order for `user_id` and rest it at `price`.
    ///
    /// # Errors
    /// Same as [`Self::place_limit_order`].
    pub fn submit_limit_order(
        &mut self,
        user_id: impl Into<UserId>,
        side: Side,
        size: Quantity,
        price: Price,
    ) -> Result<OrderId, OrderBookError> {
        self.place_limit_order(Order::new(user_id, side, size), price)
    }

    /// Cancel a resting order and return it.
    ///
    /// The order leaves its limit, the limit is pruned if it becomes empty,
    /// and the id leaves the index.
    ///
    /// # Errors
    /// [`OrderBookError::OrderNotFound`] when the id is not resting (never
    /// placed, already filled or already canceled). The book is unchanged.
    pub fn cancel_order(&mut self, order_id: OrderId) -> Result<Order, OrderBookError> {
        let location = *self
            .orders
            .get(&order_id)
            .ok_or(OrderBookError::OrderNotFound(order_id))?;

        let order = self
            .remove_resting_order(order_id, location)
            .ok_or(OrderBookError::OrderNotFound(order_id))?;

        trace!(
            "Order book {}: canceled order {} {} {} @ {}",
            self.market, order_id, order.side, order.size, location.price
        );
        Ok(order)
    }

    /// Remove a resting order from its limit, prune the limit when it becomes
    /// empty and drop the id from the index.
    pub(super) fn remove_resting_order(
        &mut self,
        order_id: OrderId,
        location: OrderLocation,
    ) -> Option<Order> {
        let levels = self.side_levels_mut(location.side);
        let limit = levels.get_mut(&location.price)?;
        let order = limit.delete_order(order_id);

        if limit.is_empty() {
            levels.remove(&location.price);
            trace!(
                "Order book {}: removed empty {} limit at {}",
                self.market, location.side, location.price
            );
        }

        if order.is_some() {
            self.orders.remove(&order_id);
        } else {
            debug_assert!(false, "indexed order {order_id} missing from its limit");
        }
        order
    }
}
