//! Fixed-tick controller
//!
//! One controller instance owns the whole control state: the fade engine,
//! the press tracker, the scheduler, and the indicator policy. It is driven
//! by a single fixed-period tick that performs, in order: button edge
//! handling, fade advancement, indicator refresh, schedule check. Everything
//! is mutated from that one driver, so the core needs no locking anywhere.

use embedded_hal::delay::DelayNs;

use crate::brightness::MAX_LEVEL;
use crate::config::{DimmerConfig, IndicatorConfig, InputConfig};
use crate::fade::FadeEngine;
use crate::input::{ButtonEvent, PressKind, PressTracker};
use crate::schedule::Scheduler;
use crate::state::OperatingState;
use crate::traits::{Actuator, BrightnessStore, Indicator, TimeOfDay};

/// The dimmer control core.
pub struct Controller<A, S, I, C, D> {
    engine: FadeEngine<A, S>,
    indicator: I,
    clock: C,
    delay: D,
    presses: PressTracker,
    schedule: Scheduler,
    input_cfg: InputConfig,
    indicator_cfg: IndicatorConfig,
    last_blink_ms: u64,
}

impl<A, S, I, C, D> Controller<A, S, I, C, D>
where
    A: Actuator,
    S: BrightnessStore,
    I: Indicator,
    C: TimeOfDay,
    D: DelayNs,
{
    /// Build the controller and run the power-on restore sequence: the
    /// actuator resumes the persisted brightness, then fades down to dark.
    pub fn new(
        actuator: A,
        store: S,
        indicator: I,
        clock: C,
        delay: D,
        cfg: DimmerConfig,
        now_ms: u64,
    ) -> Self {
        Self {
            engine: FadeEngine::restore(actuator, store, cfg.fade, now_ms),
            indicator,
            clock,
            delay,
            presses: PressTracker::new(),
            schedule: Scheduler::new(cfg.schedule),
            input_cfg: cfg.input,
            indicator_cfg: cfg.indicator,
            last_blink_ms: 0,
        }
    }

    /// One control tick.
    ///
    /// `button` carries the debounced edge sampled this tick, if any.
    pub fn tick(&mut self, now_ms: u64, button: Option<ButtonEvent>) {
        if let Some(event) = button {
            if let Some(kind) = self.presses.on_event(event, now_ms, &self.input_cfg) {
                self.handle_press(kind, now_ms);
            }
        }
        self.engine.tick(now_ms);
        self.update_indicator(now_ms);
        let hour = self.clock.hour();
        if let Some(target) = self.schedule.poll(hour) {
            self.engine.request_scheduled(target, now_ms);
        }
    }

    fn handle_press(&mut self, kind: PressKind, now_ms: u64) {
        match kind {
            PressKind::Short => self.engine.request_step(now_ms),
            PressKind::Long => self.engine.request_toggle(now_ms),
            PressKind::Diagnostic => self.diagnostic_readout(),
        }
    }

    /// Blink the on/off state back at the user: two blinks when fully dark,
    /// four when fully bright, nothing in between.
    ///
    /// Deliberately blocking: the whole control loop pauses for up to
    /// ~1.6 s. No fade or press needs sub-second service while the user is
    /// holding the button for a readout.
    fn diagnostic_readout(&mut self) {
        let blinks = match self.engine.level() {
            0 => 2,
            MAX_LEVEL => 4,
            _ => return,
        };
        for _ in 0..blinks {
            self.indicator.set_on(true);
            self.delay.delay_ms(self.indicator_cfg.diagnostic_blink_ms);
            self.indicator.set_on(false);
            self.delay.delay_ms(self.indicator_cfg.diagnostic_blink_ms);
        }
    }

    /// Indicator policy: solid while a full fade runs, blinking while a
    /// nudge fade runs, dark when settled.
    fn update_indicator(&mut self, now_ms: u64) {
        match self.engine.state() {
            OperatingState::FadeOn | OperatingState::FadeOff => self.indicator.set_on(true),
            OperatingState::Adjusting => {
                if now_ms.saturating_sub(self.last_blink_ms) > self.indicator_cfg.adjust_blink_ms {
                    self.last_blink_ms = now_ms;
                    self.indicator.toggle();
                }
            }
            _ => self.indicator.set_on(false),
        }
    }

    /// Current brightness.
    pub fn level(&self) -> u8 {
        self.engine.level()
    }

    /// Current operating state.
    pub fn state(&self) -> OperatingState {
        self.engine.state()
    }

    /// The underlying fade engine.
    pub fn engine(&self) -> &FadeEngine<A, S> {
        &self.engine
    }
}
