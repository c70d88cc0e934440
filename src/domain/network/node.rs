use crate::domain::utils::id::NodeId;

/// Pool of identical transmitters or receivers at one node.
#[derive(Debug, Clone)]
pub struct TransceiverBank {
    /// `None` means the node has an unlimited number of devices.
    capacity: Option<u32>,
    in_use: u32,

    /// Widest band (in slots) a single device of this bank can emit or detect.
    pub max_spectral_amplitude: u32,
}

impl TransceiverBank {
    pub fn new(capacity: Option<u32>, max_spectral_amplitude: u32) -> Self {
        TransceiverBank { capacity, in_use: 0, max_spectral_amplitude }
    }

    pub fn has_free(&self) -> bool {
        self.capacity.is_none_or(|capacity| self.in_use < capacity)
    }

    pub fn in_use(&self) -> u32 {
        self.in_use
    }

    /// # Returns
    /// `false` if every device is already in use.
    pub fn allocate(&mut self) -> bool {
        if !self.has_free() {
            return false;
        }
        self.in_use += 1;
        true
    }

    pub fn release(&mut self) -> bool {
        if self.in_use == 0 {
            log::error!("Release of a transceiver was requested, but none is in use.");
            return false;
        }
        self.in_use -= 1;
        true
    }
}

/// Optical node (ROADM) with its transmitter and receiver pools.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub transmitters: TransceiverBank,
    pub receivers: TransceiverBank,
}

impl Node {
    pub fn new(id: NodeId, transmitters: TransceiverBank, receivers: TransceiverBank) -> Self {
        Node { id, transmitters, receivers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_bank() {
        let mut bank = TransceiverBank::new(Some(1), 16);
        assert!(bank.allocate());
        assert!(!bank.has_free());
        assert!(!bank.allocate());
        assert!(bank.release());
        assert!(!bank.release());
    }

    #[test]
    fn test_unlimited_bank() {
        let mut bank = TransceiverBank::new(None, 16);
        for _ in 0..1000 {
            assert!(bank.allocate());
        }
        assert_eq!(bank.in_use(), 1000);
    }
}
