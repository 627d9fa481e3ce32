use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per device id.
///
/// Writes that read a device's assigned sum and then store a new quantity
/// hold the device's guard for the whole read-validate-write sequence, so
/// two writers can never validate against the same stale sum. An entry lives
/// only while some writer holds or waits for it.
#[derive(Debug, Default)]
pub(super) struct DeviceLocks {
    locks: Mutex<HashMap<i32, Arc<AsyncMutex<()>>>>,
}

/// Exclusive access to one device; drops the map entry once unused.
#[derive(Debug)]
pub(super) struct DeviceGuard<'a> {
    locks: &'a DeviceLocks,
    device_id: i32,
    guard: Option<OwnedMutexGuard<()>>,
}

impl DeviceLocks {
    pub(super) async fn lock(&self, device_id: i32) -> DeviceGuard<'_> {
        let lock = {
            let mut locks = self.map();
            Arc::clone(locks.entry(device_id).or_default())
        };
        // built before waiting so a cancelled waiter still cleans up
        let mut entry = DeviceGuard {
            locks: self,
            device_id,
            guard: None,
        };
        entry.guard = Some(lock.lock_owned().await);
        entry
    }

    fn map(&self) -> MutexGuard<'_, HashMap<i32, Arc<AsyncMutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of devices currently locked or waited on.
    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.map().len()
    }
}

impl Drop for DeviceGuard<'_> {
    fn drop(&mut self) {
        // release the device before deciding whether anyone still needs it
        drop(self.guard.take());

        let mut locks = self.locks.map();
        // waiters clone the entry under the map lock, so a count of 1 means
        // only the map itself refers to it
        if locks
            .get(&self.device_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.device_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_device_is_exclusive() {
        let locks = DeviceLocks::default();
        let _guard = locks.lock(1).await;

        let second = tokio::time::timeout(Duration::from_millis(50), locks.lock(1)).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn different_devices_do_not_contend() {
        let locks = DeviceLocks::default();
        let _first = locks.lock(1).await;

        let second = tokio::time::timeout(Duration::from_millis(50), locks.lock(2)).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn released_guard_unblocks_waiter() {
        let locks = DeviceLocks::default();
        let guard = locks.lock(7).await;
        drop(guard);

        let again = tokio::time::timeout(Duration::from_millis(50), locks.lock(7)).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn released_devices_leave_no_entry() {
        let locks = DeviceLocks::default();
        for device_id in 0..100 {
            let _guard = locks.lock(device_id).await;
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn entry_survives_while_someone_waits() {
        let locks = Arc::new(DeviceLocks::default());
        let guard = locks.lock(3).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.lock(3).await;
            })
        };
        // let the waiter clone the entry and park on it
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(guard);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
