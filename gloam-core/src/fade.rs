//! Fade engine
//!
//! Owns the brightness state machine. Every brightness change funnels
//! through here: button intents and schedule crossings only *request* fades,
//! while the engine is the single writer of the actuator output and the
//! persisted cell. A new request silently supersedes any fade in progress,
//! so an interrupted fade can never corrupt interpolation state.

use crate::brightness::{self, MAX_LEVEL};
use crate::config::FadeConfig;
use crate::state::{derive_settled, OperatingState};
use crate::traits::{Actuator, BrightnessStore};

/// An active linear brightness transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FadeSession {
    /// Brightness the fade started from.
    pub start_level: u8,
    /// Brightness the fade is heading to.
    pub end_level: u8,
    /// Monotonic timestamp the fade started at, milliseconds.
    pub started_at_ms: u64,
    /// Total fade time, milliseconds. Never zero for an active session.
    pub duration_ms: u64,
}

/// The brightness state machine.
pub struct FadeEngine<A, S> {
    actuator: A,
    store: S,
    cfg: FadeConfig,
    level: u8,
    long_press_target: u8,
    increasing: bool,
    fade: Option<FadeSession>,
    state: OperatingState,
}

impl<A: Actuator, S: BrightnessStore> FadeEngine<A, S> {
    /// Restore the engine from the persisted brightness and start the
    /// power-on fade down to dark.
    ///
    /// The actuator is driven to the persisted position first so the light
    /// resumes where it was before fading out.
    pub fn restore(actuator: A, mut store: S, cfg: FadeConfig, now_ms: u64) -> Self {
        let saved = brightness::clamp_level(store.read() as i32);
        let mut engine = Self {
            actuator,
            store,
            cfg,
            level: saved,
            long_press_target: if saved == 0 { 0 } else { MAX_LEVEL },
            increasing: true,
            fade: None,
            state: OperatingState::Off,
        };
        engine.drive_actuator();
        let duration_s = brightness::proportional_duration_s(saved, 0, engine.cfg.full_fade_s);
        engine.request_fade(saved, 0, duration_s, now_ms);
        engine.state = if engine.fade.is_some() {
            OperatingState::FadeOff
        } else {
            derive_settled(engine.level, engine.long_press_target)
        };
        engine
    }

    /// Begin a fade session, superseding any active one. Equal endpoints
    /// clear the session instead: a no-op transition.
    ///
    /// Deliberately does not touch the operating state; the caller sets it
    /// because the *reason* for the fade decides what it means.
    pub fn request_fade(&mut self, start_level: u8, end_level: u8, duration_s: u32, now_ms: u64) {
        if start_level == end_level {
            self.fade = None;
            return;
        }
        self.fade = Some(FadeSession {
            start_level,
            end_level,
            started_at_ms: now_ms,
            duration_ms: duration_s as u64 * 1000,
        });
    }

    /// Long-press behavior: fade all the way to the toggle target.
    ///
    /// The target flips between the two extremes only once a full cycle has
    /// completed (brightness sits exactly on the target); a long press in
    /// mid-fade resumes toward the same extreme. Duration is proportional
    /// to the remaining distance.
    pub fn request_toggle(&mut self, now_ms: u64) {
        if self.level == self.long_press_target {
            self.long_press_target = if self.long_press_target == 0 {
                MAX_LEVEL
            } else {
                0
            };
        }
        let duration_s =
            brightness::proportional_duration_s(self.level, self.long_press_target, self.cfg.full_fade_s);
        let (from, to) = (self.level, self.long_press_target);
        self.request_fade(from, to, duration_s, now_ms);
        if self.long_press_target == MAX_LEVEL {
            self.state = OperatingState::FadeOn;
            self.increasing = true;
        } else {
            self.state = OperatingState::FadeOff;
            self.increasing = false;
        }
    }

    /// Short-press behavior: nudge brightness one step over a fixed, short
    /// fade, ping-ponging the direction at the range bounds.
    ///
    /// The direction flag flips as soon as the *computed* target touches a
    /// bound. A nudge that has nowhere to go settles immediately and
    /// persists. Otherwise the long-press target follows the nudge
    /// direction, so a later long press completes toward that extreme.
    pub fn request_step(&mut self, now_ms: u64) {
        let step = self.cfg.step_size as i32;
        let target = if self.increasing {
            let t = brightness::clamp_level(self.level as i32 + step);
            if t == MAX_LEVEL {
                self.increasing = false;
            }
            t
        } else {
            let t = brightness::clamp_level(self.level as i32 - step);
            if t == 0 {
                self.increasing = true;
            }
            t
        };
        self.request_fade(self.level, target, self.cfg.step_fade_s, now_ms);
        if self.fade.is_none() {
            // Already pinned at the bound the nudge points past.
            self.store.update(self.level);
            self.state = if self.level == 0 {
                OperatingState::Off
            } else {
                OperatingState::On
            };
        } else {
            self.long_press_target = if target > self.level { MAX_LEVEL } else { 0 };
            self.state = OperatingState::Adjusting;
        }
    }

    /// Scheduled behavior: full-range fade toward `target` (0 or 100),
    /// unless a fade is already heading that way or brightness is already
    /// at that bound. Returns whether a fade was started.
    pub fn request_scheduled(&mut self, target: u8, now_ms: u64) -> bool {
        if target == 0 {
            if self.state == OperatingState::FadeOff || self.level == 0 {
                return false;
            }
            let duration_s = brightness::proportional_duration_s(self.level, 0, self.cfg.full_fade_s);
            let from = self.level;
            self.request_fade(from, 0, duration_s, now_ms);
            self.state = OperatingState::FadeOff;
            self.increasing = false;
            self.long_press_target = 0;
        } else {
            if self.state == OperatingState::FadeOn || self.level >= MAX_LEVEL {
                return false;
            }
            let duration_s =
                brightness::proportional_duration_s(self.level, MAX_LEVEL, self.cfg.full_fade_s);
            let from = self.level;
            self.request_fade(from, MAX_LEVEL, duration_s, now_ms);
            self.state = OperatingState::FadeOn;
            self.increasing = true;
            self.long_press_target = MAX_LEVEL;
        }
        true
    }

    /// Advance an active fade: interpolate, drive the actuator, and on
    /// completion snap to the target, persist, and settle the state.
    /// No-op when no fade is active.
    pub fn tick(&mut self, now_ms: u64) {
        let Some(fade) = self.fade else {
            return;
        };
        let elapsed = now_ms.saturating_sub(fade.started_at_ms);
        self.level =
            brightness::interpolate(fade.start_level, fade.end_level, elapsed, fade.duration_ms);
        self.drive_actuator();
        if elapsed >= fade.duration_ms || self.level == fade.end_level {
            self.level = fade.end_level;
            self.fade = None;
            self.store.update(self.level);
            self.state = derive_settled(self.level, self.long_press_target);
        }
    }

    fn drive_actuator(&mut self) {
        self.actuator
            .set_position(brightness::to_actuator_units(self.level, self.cfg.actuator_span));
    }

    /// Current brightness.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Current operating state.
    pub fn state(&self) -> OperatingState {
        self.state
    }

    /// Extreme the next long press drives toward.
    pub fn long_press_target(&self) -> u8 {
        self.long_press_target
    }

    /// Direction the next nudge takes.
    pub fn increasing(&self) -> bool {
        self.increasing
    }

    /// Active fade session, if any.
    pub fn fade(&self) -> Option<&FadeSession> {
        self.fade.as_ref()
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the last commanded position.
    #[derive(Default)]
    struct MockActuator {
        last_position: Option<u16>,
        commands: usize,
    }

    impl Actuator for MockActuator {
        fn set_position(&mut self, units: u16) {
            self.last_position = Some(units);
            self.commands += 1;
        }
    }

    /// In-memory brightness cell counting persist calls.
    struct MockStore {
        value: u8,
        update_calls: usize,
    }

    impl MockStore {
        fn with(value: u8) -> Self {
            Self {
                value,
                update_calls: 0,
            }
        }
    }

    impl BrightnessStore for MockStore {
        fn read(&mut self) -> u8 {
            self.value
        }

        fn update(&mut self, level: u8) {
            self.value = level;
            self.update_calls += 1;
        }
    }

    type TestEngine = FadeEngine<MockActuator, MockStore>;

    fn restored(saved: u8) -> TestEngine {
        FadeEngine::restore(
            MockActuator::default(),
            MockStore::with(saved),
            FadeConfig::default(),
            0,
        )
    }

    /// Engine parked in a settled state at `level`, no fade active.
    fn settled(level: u8, long_press_target: u8, increasing: bool) -> TestEngine {
        FadeEngine {
            actuator: MockActuator::default(),
            store: MockStore::with(level),
            cfg: FadeConfig::default(),
            level,
            long_press_target,
            increasing,
            fade: None,
            state: derive_settled(level, long_press_target),
        }
    }

    #[test]
    fn restore_fades_down_proportionally() {
        let engine = restored(60);
        assert_eq!(engine.level(), 60);
        assert_eq!(engine.long_press_target(), 100);
        assert_eq!(engine.state(), OperatingState::FadeOff);
        let fade = engine.fade().unwrap();
        assert_eq!(fade.start_level, 60);
        assert_eq!(fade.end_level, 0);
        assert_eq!(fade.duration_ms, 2_160_000);
        // Actuator resumed at the persisted position before fading.
        assert_eq!(engine.actuator().last_position, Some(108));
    }

    #[test]
    fn restore_from_dark_settles_off() {
        let engine = restored(0);
        assert_eq!(engine.level(), 0);
        assert_eq!(engine.long_press_target(), 0);
        assert_eq!(engine.state(), OperatingState::Off);
        assert!(engine.fade().is_none());
    }

    #[test]
    fn restore_clamps_garbage_storage() {
        // Fresh storage reads as 0xFF.
        let engine = restored(0xFF);
        assert_eq!(engine.level(), 100);
        assert_eq!(engine.long_press_target(), 100);
    }

    #[test]
    fn equal_endpoints_clear_any_session() {
        let mut engine = settled(50, 100, true);
        engine.request_fade(50, 100, 1800, 0);
        assert!(engine.fade().is_some());
        engine.request_fade(70, 70, 1800, 500);
        assert!(engine.fade().is_none());
    }

    #[test]
    fn toggle_at_target_flips_and_runs_full_range() {
        let mut engine = settled(100, 100, true);
        engine.request_toggle(0);
        assert_eq!(engine.long_press_target(), 0);
        assert_eq!(engine.state(), OperatingState::FadeOff);
        assert!(!engine.increasing());
        let fade = engine.fade().unwrap();
        assert_eq!(fade.duration_ms, 3_600_000);
        assert_eq!(fade.end_level, 0);
    }

    #[test]
    fn toggle_midway_resumes_without_flip() {
        // Interrupted on the way up: a long press keeps heading up.
        let mut engine = settled(50, 100, true);
        engine.request_toggle(0);
        assert_eq!(engine.long_press_target(), 100);
        assert_eq!(engine.state(), OperatingState::FadeOn);
        assert_eq!(engine.fade().unwrap().duration_ms, 1_800_000);
    }

    #[test]
    fn step_clamps_and_flips_direction_at_the_top() {
        let mut engine = settled(90, 100, true);
        engine.request_step(0);
        assert!(!engine.increasing());
        assert_eq!(engine.state(), OperatingState::Adjusting);
        assert_eq!(engine.long_press_target(), 100);
        let fade = engine.fade().unwrap();
        assert_eq!(fade.end_level, 100);
        assert_eq!(fade.duration_ms, 10_000);
    }

    #[test]
    fn step_down_sets_toggle_target_to_dark() {
        let mut engine = settled(60, 100, false);
        engine.request_step(0);
        assert_eq!(engine.fade().unwrap().end_level, 40);
        assert_eq!(engine.long_press_target(), 0);
        assert_eq!(engine.state(), OperatingState::Adjusting);
    }

    #[test]
    fn pinned_step_settles_and_persists() {
        // At the bottom, nudging further down: direction flips, nothing
        // fades, the level persists immediately.
        let mut engine = settled(0, 0, false);
        engine.request_step(0);
        assert!(engine.increasing());
        assert!(engine.fade().is_none());
        assert_eq!(engine.state(), OperatingState::Off);
        assert_eq!(engine.store().update_calls, 1);
    }

    #[test]
    fn step_ping_pongs_across_repeated_presses() {
        let mut engine = settled(60, 100, true);
        let mut now = 0;
        let mut seen = [0u8; 6];
        for target in seen.iter_mut() {
            engine.request_step(now);
            if let Some(fade) = engine.fade() {
                *target = fade.end_level;
            }
            now += 20_000;
            engine.tick(now); // run the nudge to completion
        }
        assert_eq!(seen, [80, 100, 80, 60, 40, 20]);
    }

    #[test]
    fn tick_interpolates_and_drives_actuator() {
        let mut engine = settled(0, 0, true);
        engine.request_fade(0, 100, 10, 0);
        engine.tick(5_000);
        assert_eq!(engine.level(), 50);
        assert_eq!(engine.actuator().last_position, Some(90));
        assert!(engine.fade().is_some());
    }

    #[test]
    fn tick_completion_snaps_persists_and_settles() {
        let mut engine = settled(0, 100, true);
        engine.request_fade(0, 100, 10, 0);
        engine.state = OperatingState::FadeOn;
        engine.tick(10_000);
        assert_eq!(engine.level(), 100);
        assert!(engine.fade().is_none());
        assert_eq!(engine.state(), OperatingState::On);
        assert_eq!(engine.store().value, 100);
        assert_eq!(engine.store().update_calls, 1);
    }

    #[test]
    fn tick_after_completion_is_idempotent() {
        let mut engine = settled(0, 100, true);
        engine.request_fade(0, 100, 10, 0);
        engine.tick(10_000);
        let commands = engine.actuator().commands;
        engine.tick(10_020);
        engine.tick(20_000);
        assert_eq!(engine.level(), 100);
        assert_eq!(engine.store().update_calls, 1);
        assert_eq!(engine.actuator().commands, commands);
    }

    #[test]
    fn new_request_supersedes_active_fade() {
        let mut engine = settled(0, 100, true);
        engine.request_fade(0, 100, 3600, 0);
        engine.tick(1_800_000);
        assert_eq!(engine.level(), 50);
        // Last writer wins; the old session is simply replaced.
        engine.request_toggle(1_800_000);
        let fade = engine.fade().unwrap();
        assert_eq!(fade.start_level, 50);
        assert_eq!(fade.end_level, 100);
        assert_eq!(fade.duration_ms, 1_800_000);
    }

    #[test]
    fn scheduled_on_runs_unless_already_heading_up() {
        let mut engine = settled(30, 100, true);
        assert!(engine.request_scheduled(100, 0));
        assert_eq!(engine.state(), OperatingState::FadeOn);
        assert_eq!(engine.long_press_target(), 100);
        assert_eq!(engine.fade().unwrap().duration_ms, 2_520_000);

        // Already fading on: a second request is refused.
        assert!(!engine.request_scheduled(100, 10));
    }

    #[test]
    fn scheduled_on_refused_at_full_brightness() {
        let mut engine = settled(100, 100, true);
        assert!(!engine.request_scheduled(100, 0));
        assert!(engine.fade().is_none());
    }

    #[test]
    fn scheduled_off_runs_and_retargets_toggle() {
        let mut engine = settled(80, 100, true);
        assert!(engine.request_scheduled(0, 0));
        assert_eq!(engine.state(), OperatingState::FadeOff);
        assert_eq!(engine.long_press_target(), 0);
        assert!(!engine.increasing());
        assert_eq!(engine.fade().unwrap().duration_ms, 2_880_000);
    }

    #[test]
    fn scheduled_off_refused_when_dark() {
        let mut engine = settled(0, 0, true);
        assert!(!engine.request_scheduled(0, 0));
    }
}
