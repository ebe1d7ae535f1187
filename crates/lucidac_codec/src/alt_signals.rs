//! U-block alternative signal switches.

use crate::error::CodecError;
use lucidac_catalog::EXTIN_CHANNELS;
use lucidac_common::Clane;
use serde::{Deserialize, Serialize};

/// Cross-lane carrying the constant reference when bit 8 is set.
pub const REF_HALF_CLANE: Clane = Clane::from_raw(7);

/// Cross-lane of external input channel 0; channel `n` uses `8 + n`.
const ACL_BASE_CLANE: usize = 8;

const REF_HALF_BIT: usize = EXTIN_CHANNELS as usize;

/// The nine alternative signal switches of the U-block.
///
/// Bits 0–7 replace cross-lane `8 + n` by external input channel `n`
/// (ACL_IN), bit 8 replaces cross-lane 7 by the constant reference.
/// Serializes as a plain array of nine booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UBlockAltSignals {
    signals: [bool; 9],
}

impl UBlockAltSignals {
    /// All switches off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables external input channel `channel`.
    pub fn set_acl(&mut self, channel: u32, enable: bool) -> Result<(), CodecError> {
        if channel >= EXTIN_CHANNELS {
            return Err(CodecError::AclOutOfRange(channel));
        }
        self.signals[channel as usize] = enable;
        Ok(())
    }

    /// Returns whether external input channel `channel` is enabled.
    pub fn has_acl(&self, channel: u32) -> bool {
        channel < EXTIN_CHANNELS && self.signals[channel as usize]
    }

    /// Cross-lane an external input channel is injected on.
    pub fn acl_to_clane(channel: u32) -> Option<Clane> {
        if channel >= EXTIN_CHANNELS {
            return None;
        }
        Clane::new(ACL_BASE_CLANE + channel as usize)
    }

    /// External input channel that can be injected on `clane`, if any.
    pub fn clane_to_acl(clane: Clane) -> Option<u32> {
        clane
            .index()
            .checked_sub(ACL_BASE_CLANE)
            .map(|channel| channel as u32)
    }

    /// Returns the channel injected on `clane`, if that channel is enabled.
    pub fn active_acl(&self, clane: Clane) -> Option<u32> {
        Self::clane_to_acl(clane).filter(|&channel| self.has_acl(channel))
    }

    /// Enables or disables the constant reference on cross-lane 7.
    pub fn set_ref_half(&mut self, enable: bool) {
        self.signals[REF_HALF_BIT] = enable;
    }

    /// Returns whether the constant reference is enabled.
    pub fn has_ref_half(&self) -> bool {
        self.signals[REF_HALF_BIT]
    }

    /// Returns `true` if no switch is on.
    pub fn is_empty(&self) -> bool {
        !self.signals.iter().any(|&s| s)
    }

    /// Returns the raw switch vector.
    pub fn as_array(&self) -> &[bool; 9] {
        &self.signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acl_channels() {
        let mut alt = UBlockAltSignals::new();
        assert!(alt.is_empty());
        alt.set_acl(0, true).unwrap();
        alt.set_acl(5, true).unwrap();
        assert!(alt.has_acl(0));
        assert!(alt.has_acl(5));
        assert!(!alt.has_acl(1));
        assert!(!alt.has_acl(100));
        alt.set_acl(5, false).unwrap();
        assert!(!alt.has_acl(5));
        assert!(matches!(alt.set_acl(8, true), Err(CodecError::AclOutOfRange(8))));
    }

    #[test]
    fn clane_mapping() {
        assert_eq!(UBlockAltSignals::acl_to_clane(0), Clane::new(8));
        assert_eq!(UBlockAltSignals::acl_to_clane(7), Clane::new(15));
        assert_eq!(UBlockAltSignals::acl_to_clane(8), None);
        assert_eq!(UBlockAltSignals::clane_to_acl(Clane::new(8).unwrap()), Some(0));
        assert_eq!(UBlockAltSignals::clane_to_acl(Clane::new(15).unwrap()), Some(7));
        assert_eq!(UBlockAltSignals::clane_to_acl(Clane::new(7).unwrap()), None);
    }

    #[test]
    fn active_acl_requires_switch() {
        let mut alt = UBlockAltSignals::new();
        let clane = Clane::new(8).unwrap();
        assert_eq!(alt.active_acl(clane), None);
        alt.set_acl(0, true).unwrap();
        assert_eq!(alt.active_acl(clane), Some(0));
    }

    #[test]
    fn ref_half() {
        let mut alt = UBlockAltSignals::new();
        alt.set_ref_half(true);
        assert!(alt.has_ref_half());
        assert!(!alt.is_empty());
        assert_eq!(REF_HALF_CLANE.index(), 7);
    }

    #[test]
    fn serde_as_bool_array() {
        let mut alt = UBlockAltSignals::new();
        alt.set_acl(1, true).unwrap();
        alt.set_ref_half(true);
        let json = serde_json::to_string(&alt).unwrap();
        assert_eq!(
            json,
            "[false,true,false,false,false,false,false,false,true]"
        );
        let back: UBlockAltSignals = serde_json::from_str(&json).unwrap();
        assert_eq!(back, alt);
    }
}
