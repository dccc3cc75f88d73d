//! Mass cancel operations for bulk order removal.
//!
//! Cancels every resting order of a user, of one side, or of the whole
//! book. All of them go through the single-order removal path, so empty
//! limits are pruned and the id index stays consistent exactly as with
//! [`OrderBook::cancel_order`].

use super::book::OrderBook;
use super::order::{OrderId, Side};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Result of a mass cancel operation.
///
/// Contains the ids of all orders that were canceled, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct MassCancelResult {
    canceled_order_ids: Vec<OrderId>,
}

impl MassCancelResult {
    pub(crate) fn new(canceled_order_ids: Vec<OrderId>) -> Self {
        Self { canceled_order_ids }
    }

    /// Returns the number of orders canceled.
    #[must_use]
    #[inline]
    pub fn canceled_count(&self) -> usize {
        self.canceled_order_ids.len()
    }

    /// Returns the canceled order ids, in processing order.
    #[must_use]
    #[inline]
    pub fn canceled_order_ids(&self) -> &[OrderId] {
        &self.canceled_order_ids
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.canceled_order_ids.is_empty()
    }
}

impl std::fmt::Display for MassCancelResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MassCancelResult {{ canceled: {} }}", self.canceled_count())
    }
}

impl OrderBook {
    /// Cancel every resting order owned by `user_id`.
    pub fn cancel_orders_by_user(&mut self, user_id: &str) -> MassCancelResult {
        trace!(
            "Order book {}: mass cancel orders for user {}",
            self.market, user_id
        );
        let order_ids = self.user_order_ids(user_id);
        self.cancel_order_batch(&order_ids)
    }

    /// Cancel every resting order on `side`.
    pub fn cancel_orders_by_side(&mut self, side: Side) -> MassCancelResult {
        trace!(
            "Order book {}: mass cancel orders on side {}",
            self.market, side
        );
        let order_ids: Vec<OrderId> = self
            .limits(side)
            .flat_map(|limit| limit.orders().map(|o| o.id()))
            .collect();
        self.cancel_order_batch(&order_ids)
    }

    /// Cancel every resting order in the book.
    pub fn cancel_all_orders(&mut self) -> MassCancelResult {
        trace!("Order book {}: mass cancel all orders", self.market);
        let mut result = self.cancel_orders_by_side(Side::Bid).canceled_order_ids;
        result.extend(self.cancel_orders_by_side(Side::Ask).canceled_order_ids);
        MassCancelResult::new(result)
    }

    fn cancel_order_batch(&mut self, order_ids: &[OrderId]) -> MassCancelResult {
        let canceled = order_ids
            .iter()
            .filter_map(|order_id| {
                let location = self.order_location(*order_id)?;
                self.remove_resting_order(*order_id, location)
                    .map(|order| order.id())
            })
            .collect();
        debug_assert!(self.check_invariants());
        MassCancelResult::new(canceled)
    }
}
