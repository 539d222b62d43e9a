//! Operating-state model
//!
//! The dimmer's runtime behavior is a small explicit state machine. States
//! describing an active fade carry the intent of the request that started
//! it (toggle vs nudge), so they are assigned where the fade is requested;
//! the settled states are derivable and come from [`derive_settled`].

/// Dimmer operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingState {
    /// Settled at zero brightness
    Off,
    /// Long-press or scheduled fade toward full brightness
    FadeOn,
    /// Settled at nonzero brightness
    On,
    /// Long-press or scheduled fade toward zero
    FadeOff,
    /// Short-press nudge fade in progress
    Adjusting,
}

impl OperatingState {
    /// Whether this state describes an active fade.
    pub fn is_fading(&self) -> bool {
        matches!(
            self,
            OperatingState::FadeOn | OperatingState::FadeOff | OperatingState::Adjusting
        )
    }
}

/// Settled state once no fade is active.
///
/// Reaching the long-press toggle target settles by that target's sign;
/// stopping anywhere else settles by the brightness sign.
pub fn derive_settled(level: u8, long_press_target: u8) -> OperatingState {
    if level == long_press_target {
        if level == 0 {
            OperatingState::Off
        } else {
            OperatingState::On
        }
    } else if level > 0 {
        OperatingState::On
    } else {
        OperatingState::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_off_at_zero() {
        assert_eq!(derive_settled(0, 0), OperatingState::Off);
        assert_eq!(derive_settled(0, 100), OperatingState::Off);
    }

    #[test]
    fn settles_on_when_lit() {
        assert_eq!(derive_settled(100, 100), OperatingState::On);
        assert_eq!(derive_settled(40, 100), OperatingState::On);
        assert_eq!(derive_settled(40, 0), OperatingState::On);
    }

    #[test]
    fn fading_states_report_fading() {
        assert!(OperatingState::FadeOn.is_fading());
        assert!(OperatingState::FadeOff.is_fading());
        assert!(OperatingState::Adjusting.is_fading());
        assert!(!OperatingState::On.is_fading());
        assert!(!OperatingState::Off.is_fading());
    }
}
