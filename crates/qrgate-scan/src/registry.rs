use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Tracks which capture devices are held by live sessions.
#[derive(Clone, Debug, Default)]
pub struct DeviceRegistry {
    claimed: Rc<RefCell<HashSet<String>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `device`, or `None` if another session holds it.
    pub fn claim(&self, device: &str) -> Option<DeviceClaim> {
        if !self.claimed.borrow_mut().insert(device.to_string()) {
            return None;
        }
        log::debug!("claimed {device}");
        Some(DeviceClaim {
            device: device.to_string(),
            claimed: Rc::clone(&self.claimed),
        })
    }

    pub fn is_claimed(&self, device: &str) -> bool {
        self.claimed.borrow().contains(device)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.borrow().len()
    }
}

/// Exclusive hold on a device. Dropping it releases the device.
#[derive(Debug)]
pub struct DeviceClaim {
    device: String,
    claimed: Rc<RefCell<HashSet<String>>>,
}

impl DeviceClaim {
    pub fn device(&self) -> &str {
        &self.device
    }
}

impl Drop for DeviceClaim {
    fn drop(&mut self) {
        self.claimed.borrow_mut().remove(&self.device);
        log::debug!("released {}", self.device);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_exclusive_until_dropped() {
        let registry = DeviceRegistry::new();
        let claim = registry.claim("/dev/video0").unwrap();
        assert_eq!(claim.device(), "/dev/video0");
        assert!(registry.claim("/dev/video0").is_none());
        assert!(registry.is_claimed("/dev/video0"));

        drop(claim);
        assert!(!registry.is_claimed("/dev/video0"));
        assert!(registry.claim("/dev/video0").is_some());
    }

    #[test]
    fn test_devices_are_independent() {
        let registry = DeviceRegistry::new();
        let _front = registry.claim("front").unwrap();
        let _rear = registry.claim("rear").unwrap();
        assert_eq!(registry.claimed_count(), 2);
    }
}
