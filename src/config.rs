//! Controller configuration parameters.
//!
//! All tunable timing and bus parameters in one place.  Values can be
//! overridden from persistent storage on targets that have one; the
//! defaults reproduce the shipped board behavior.

use serde::{Deserialize, Serialize};

/// Core controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorConfig {
    // --- Sampling ---
    /// Sampler timer tick rate in Hz.  Each tick samples one signal, so
    /// the per-signal rate is this divided by the signal count.
    pub sampler_tick_hz: u32,
    /// Full sampler rounds that must complete between two status
    /// resolutions.  Guarantees every debounce history has fresh samples
    /// before the resolver runs again.
    pub rounds_per_resolve: u32,

    // --- Bus ---
    /// 7-bit bus slave address of the controller.
    pub bus_address: u8,
    /// Host-side retry budget for one command/response exchange.
    pub max_bus_attempts: u8,
}

/// Upper bound on the encoded size of a config record (varint worst
/// case); sizes the caller's storage buffer.
pub const MAX_ENCODED_LEN: usize = 16;

impl DoorConfig {
    /// Encode for persistent storage (EEPROM page, NVS blob).  Returns
    /// the written prefix of `buf`.
    pub fn write_to<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }

    /// Decode a stored record.
    pub fn read_from(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            // Sampling: 1 kHz tick over 4 signals = 250 Hz per signal,
            // so an 8-sample history spans 32 ms.
            sampler_tick_hz: 1000,
            rounds_per_resolve: 2,

            // Bus
            bus_address: 0x23,
            max_bus_attempts: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::SignalId;

    #[test]
    fn default_config_is_sane() {
        let c = DoorConfig::default();
        assert!(c.sampler_tick_hz > 0);
        assert!(c.rounds_per_resolve >= 2, "resolver must see settled output");
        assert!(c.bus_address < 0x80);
        assert!(c.max_bus_attempts > 0);
    }

    #[test]
    fn per_signal_rate_resolves_bounce() {
        let c = DoorConfig::default();
        let per_signal_hz = c.sampler_tick_hz / SignalId::COUNT as u32;
        // A full 8-sample history must span well under a typical 100 ms
        // response budget.
        let history_ms = 8 * 1000 / per_signal_hz;
        assert!(history_ms <= 50, "history spans {history_ms} ms");
    }

    #[test]
    fn serde_roundtrip() {
        let c = DoorConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: DoorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.sampler_tick_hz, c2.sampler_tick_hz);
        assert_eq!(c.rounds_per_resolve, c2.rounds_per_resolve);
        assert_eq!(c.bus_address, c2.bus_address);
    }

    #[test]
    fn storage_roundtrip() {
        let c = DoorConfig::default();
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let stored = c.write_to(&mut buf).unwrap();
        let c2 = DoorConfig::read_from(stored).unwrap();
        assert_eq!(c.max_bus_attempts, c2.max_bus_attempts);
        assert_eq!(c.sampler_tick_hz, c2.sampler_tick_hz);
        assert_eq!(c.rounds_per_resolve, c2.rounds_per_resolve);
        assert_eq!(c.bus_address, c2.bus_address);
    }

    #[test]
    fn truncated_record_is_rejected() {
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let stored = DoorConfig::default().write_to(&mut buf).unwrap();
        let cut = stored.len() - 1;
        assert!(DoorConfig::read_from(&stored[..cut]).is_err());
    }
}
