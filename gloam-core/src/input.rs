//! Button press classification
//!
//! Turns debounced edge pairs into press intents by held duration. The
//! debouncing itself is a driver concern; this module only ever sees clean
//! edges.

use crate::config::InputConfig;

/// Debounced button edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Button went down.
    Pressed,
    /// Button came back up.
    Released,
}

/// Classified press intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    /// Held shorter than the long-press threshold: brightness nudge.
    Short,
    /// Held at least the long-press threshold: on/off toggle.
    Long,
    /// Held at least the diagnostic threshold: blink readout.
    Diagnostic,
}

/// Classify a completed press by its held duration.
///
/// Thresholds are inclusive at the lower bound: a press of exactly
/// `long_press_ms` is long, exactly `diagnostic_press_ms` is diagnostic.
pub fn classify(held_ms: u64, cfg: &InputConfig) -> PressKind {
    if held_ms >= cfg.diagnostic_press_ms {
        PressKind::Diagnostic
    } else if held_ms >= cfg.long_press_ms {
        PressKind::Long
    } else {
        PressKind::Short
    }
}

/// Tracks the in-flight press between a press edge and its release.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressTracker {
    active: bool,
    pressed_at_ms: u64,
}

impl PressTracker {
    pub const fn new() -> Self {
        Self {
            active: false,
            pressed_at_ms: 0,
        }
    }

    /// Feed one debounced edge. Returns the classified intent on the
    /// release edge of a tracked press; a release with no prior press is
    /// ignored.
    pub fn on_event(
        &mut self,
        event: ButtonEvent,
        now_ms: u64,
        cfg: &InputConfig,
    ) -> Option<PressKind> {
        match event {
            ButtonEvent::Pressed => {
                if !self.active {
                    self.active = true;
                    self.pressed_at_ms = now_ms;
                }
                None
            }
            ButtonEvent::Released => {
                if !self.active {
                    return None;
                }
                self.active = false;
                Some(classify(now_ms - self.pressed_at_ms, cfg))
            }
        }
    }

    /// Whether a press is currently being tracked.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> InputConfig {
        InputConfig::default()
    }

    #[test]
    fn classifies_by_duration() {
        assert_eq!(classify(0, &cfg()), PressKind::Short);
        assert_eq!(classify(999, &cfg()), PressKind::Short);
        assert_eq!(classify(1000, &cfg()), PressKind::Long);
        assert_eq!(classify(4999, &cfg()), PressKind::Long);
        assert_eq!(classify(5000, &cfg()), PressKind::Diagnostic);
        assert_eq!(classify(60_000, &cfg()), PressKind::Diagnostic);
    }

    #[test]
    fn press_then_release_yields_one_intent() {
        let mut tracker = PressTracker::new();
        assert_eq!(tracker.on_event(ButtonEvent::Pressed, 100, &cfg()), None);
        assert!(tracker.is_active());
        assert_eq!(
            tracker.on_event(ButtonEvent::Released, 1300, &cfg()),
            Some(PressKind::Long)
        );
        assert!(!tracker.is_active());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut tracker = PressTracker::new();
        assert_eq!(tracker.on_event(ButtonEvent::Released, 500, &cfg()), None);
        assert!(!tracker.is_active());
    }

    #[test]
    fn repeated_press_edges_keep_the_first_start() {
        let mut tracker = PressTracker::new();
        tracker.on_event(ButtonEvent::Pressed, 0, &cfg());
        tracker.on_event(ButtonEvent::Pressed, 4000, &cfg());
        // Held since t=0, so 5200 ms: diagnostic.
        assert_eq!(
            tracker.on_event(ButtonEvent::Released, 5200, &cfg()),
            Some(PressKind::Diagnostic)
        );
    }
}
