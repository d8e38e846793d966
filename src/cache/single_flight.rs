use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slots = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Per-key gate so concurrent misses on one key run a single fetch.
#[derive(Clone, Default)]
pub struct SingleFlight {
    slots: Slots,
}

pub struct FlightGuard {
    slots: Slots,
    key: String,
    _permit: OwnedMutexGuard<()>,
}

impl SingleFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other task holds `key`, then holds it until the guard drops.
    pub async fn acquire(&self, key: &str) -> FlightGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        FlightGuard {
            slots: self.slots.clone(),
            key: key.to_string(),
            _permit: slot.lock_owned().await,
        }
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference from the map and one held by our permit: nobody waits.
        if slots
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) <= 2)
        {
            slots.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_slot_released_after_last_guard() {
        let flights = SingleFlight::new();
        {
            let _guard = flights.acquire("k").await;
            assert_eq!(flights.in_flight(), 1);
        }
        assert_eq!(flights.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_second_caller_waits_for_first() {
        let flights = SingleFlight::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let flights = flights.clone();
            let order = order.clone();
            async move {
                let _guard = flights.acquire("k").await;
                tokio::time::sleep(Duration::from_millis(20)).await;
                order.lock().unwrap().push(1);
            }
        };
        let second = {
            let flights = flights.clone();
            let order = order.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                let _guard = flights.acquire("k").await;
                order.lock().unwrap().push(2);
            }
        };

        tokio::join!(first, second);
        assert_eq!(*order.lock().unwrap(), [1, 2]);
        assert_eq!(flights.in_flight(), 0);
    }
}
