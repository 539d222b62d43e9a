//! Debounced push button
//!
//! Samples a GPIO level once per control tick and filters contact bounce
//! with a stable-state window, emitting press/release edges. The control
//! core only ever sees the clean edges.

use embedded_hal::digital::InputPin;
use gloam_core::input::ButtonEvent;

/// Default debounce window in milliseconds.
pub const DEBOUNCE_MS: u64 = 10;

/// Pure debounce state machine, fed with raw samples.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window_ms: u64,
    /// Last confirmed level (true = pressed)
    stable: bool,
    /// Raw level currently being observed
    candidate: bool,
    /// When the candidate level first appeared
    candidate_since_ms: u64,
}

impl Debouncer {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            stable: false,
            candidate: false,
            candidate_since_ms: 0,
        }
    }

    /// Feed one raw sample (`true` = pressed). Returns an edge once a new
    /// level has held for the whole debounce window.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        if pressed != self.candidate {
            // Level changed - restart the stability window
            self.candidate = pressed;
            self.candidate_since_ms = now_ms;
            return None;
        }
        if pressed != self.stable && now_ms.wrapping_sub(self.candidate_since_ms) >= self.window_ms
        {
            self.stable = pressed;
            return Some(if pressed {
                ButtonEvent::Pressed
            } else {
                ButtonEvent::Released
            });
        }
        None
    }

    /// Last confirmed level.
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

/// A debounced button bound to an input pin.
pub struct DebouncedButton<P> {
    pin: P,
    /// Pin level that means "pressed"
    active_high: bool,
    debounce: Debouncer,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(pin: P, active_high: bool, window_ms: u64) -> Self {
        Self {
            pin,
            active_high,
            debounce: Debouncer::new(window_ms),
        }
    }

    /// Sample the pin and run the debouncer. Call once per control tick.
    pub fn poll(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let level = self.pin.is_high().ok()?;
        self.debounce.update(level == self.active_high, now_ms)
    }
}
