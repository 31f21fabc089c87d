//! Tick-driven heartbeat indicator

/// Ticks between indicator toggles on the reference board (5 × ~100 ms cycles)
pub const DEFAULT_TICKS_PER_TOGGLE: u32 = 5;

/// Toggles an indicator every `ticks_per_toggle` ticks
///
/// The indicator itself (an LED, a log line) lives behind the callback, which
/// receives the new state on every toggle.
pub struct Heartbeat<F> {
    ticks_per_toggle: u32,
    ticks: u32,
    lit: bool,
    on_toggle: F,
}

impl<F: FnMut(bool)> Heartbeat<F> {
    /// Create a heartbeat; a `ticks_per_toggle` of zero is treated as one
    pub fn new(ticks_per_toggle: u32, on_toggle: F) -> Self {
        Self {
            ticks_per_toggle: ticks_per_toggle.max(1),
            ticks: 0,
            lit: false,
            on_toggle,
        }
    }

    /// Advance by one tick, returning whether the indicator toggled
    ///
    /// The count is checked before it is advanced, so the first toggle lands
    /// on tick `ticks_per_toggle + 1` and every `ticks_per_toggle` ticks after.
    pub fn tick(&mut self) -> bool {
        let toggled = self.ticks == self.ticks_per_toggle;
        if toggled {
            self.ticks = 0;
            self.lit = !self.lit;
            (self.on_toggle)(self.lit);
        }

        self.ticks += 1;
        toggled
    }

    /// Current indicator state
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Heartbeat<fn(bool)> {
    /// A heartbeat with nothing attached
    pub fn silent() -> Self {
        fn ignore(_: bool) {}
        Heartbeat::new(DEFAULT_TICKS_PER_TOGGLE, ignore as fn(bool))
    }
}
