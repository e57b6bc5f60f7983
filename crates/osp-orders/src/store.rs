//! Order persistence.
//!
//! # Contract
//!
//! [`OrderStore`] is append-only: `save` appends, `find_all` returns every
//! stored order in insertion order. There is no update, delete or lookup by
//! id. Implementations must be safe to share between request handlers, hence
//! the `Send + Sync` bound and `&self` receivers.
//!
//! [`InMemoryOrderStore`] is the only backend. Contents are lost on restart.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::types::Order;

/// Append-only order persistence.
pub trait OrderStore: Send + Sync {
    /// Append one order. Never replaces an existing entry.
    fn save(&self, order: Order) -> anyhow::Result<()>;

    /// Snapshot of all stored orders, oldest first.
    fn find_all(&self) -> anyhow::Result<Vec<Order>>;
}

impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    fn save(&self, order: Order) -> anyhow::Result<()> {
        (**self).save(order)
    }

    fn find_all(&self) -> anyhow::Result<Vec<Order>> {
        (**self).find_all()
    }
}

/// Process-local order list guarded by an `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written Vec behind
    // (push is the only mutation), so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Order>> {
        self.orders.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Order>> {
        self.orders.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl OrderStore for InMemoryOrderStore {
    fn save(&self, order: Order) -> anyhow::Result<()> {
        self.write().push(order);
        Ok(())
    }

    fn find_all(&self) -> anyhow::Result<Vec<Order>> {
        Ok(self.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderType;
    use chrono::{NaiveDate, TimeZone, Utc};
    use osp_portfolio::Micros;
    use uuid::Uuid;

    fn order(n: u128) -> Order {
        Order {
            id: Uuid::from_u128(n),
            order_type: OrderType::Buy,
            total_amount: Micros::from_units(100),
            execution_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 8, 9, 30, 0).unwrap(),
            breakdown: vec![],
        }
    }

    #[test]
    fn new_store_is_empty() {
        let s = InMemoryOrderStore::new();
        assert!(s.is_empty());
        assert!(s.find_all().unwrap().is_empty());
    }

    #[test]
    fn save_appends_in_order() {
        let s = InMemoryOrderStore::new();
        for n in 1..=3 {
            s.save(order(n)).unwrap();
        }
        let ids: Vec<u128> = s.find_all().unwrap().iter().map(|o| o.id.as_u128()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn duplicate_ids_are_both_kept() {
        let s = InMemoryOrderStore::new();
        s.save(order(7)).unwrap();
        s.save(order(7)).unwrap();
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn find_all_is_a_snapshot() {
        let s = InMemoryOrderStore::new();
        s.save(order(1)).unwrap();
        let snap = s.find_all().unwrap();
        s.save(order(2)).unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn arc_store_delegates() {
        let s = Arc::new(InMemoryOrderStore::new());
        let handle: Arc<InMemoryOrderStore> = Arc::clone(&s);
        handle.save(order(1)).unwrap();
        assert_eq!(OrderStore::find_all(&s).unwrap().len(), 1);
    }
}
