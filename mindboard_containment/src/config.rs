// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine tunables.

/// Every distance, count and delay the engine uses.
///
/// Distances are canvas pixels; delays are milliseconds on the caller's clock.
/// [`Default`] gives the values the editor ships with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct EngineConfig {
    /// Margin between a category's content and the edge of its area.
    pub padding: f64,
    /// Extra distance added to every collision push.
    pub safety_margin: f64,
    /// Upper bound on collision resolution passes.
    pub max_iterations: usize,
    /// Pointer travel that turns a press into a drag.
    pub drag_threshold: f64,
    /// Delay between release and drag cache eviction.
    pub cache_eviction_delay: u64,
    /// Delay before a memo that left its parent is unparented.
    pub unparent_debounce: u64,
    /// Unparent delay used when the pointer moves faster than
    /// [`fast_drag_speed`](Self::fast_drag_speed).
    pub fast_unparent_debounce: u64,
    /// Pointer speed (px/ms) above which the slower unparent delay applies.
    pub fast_drag_speed: f64,
    /// Delay before a finished drag is committed to history.
    pub history_debounce: u64,
    /// Minimum time between category settle passes for one category.
    pub collision_window: u64,
    /// Settle passes allowed per category before the counter resets.
    pub collision_attempt_cap: u32,
    /// Time after which a category's settle counter resets.
    pub collision_reset: u64,
    /// How far a memo must reach into a category to join it.
    pub drop_margin: f64,
    /// Hold time that arms reparent mode on touch.
    pub long_press: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            safety_margin: 5.0,
            max_iterations: 10,
            drag_threshold: 5.0,
            cache_eviction_delay: 500,
            unparent_debounce: 100,
            fast_unparent_debounce: 300,
            fast_drag_speed: 1.0,
            history_debounce: 200,
            collision_window: 1000,
            collision_attempt_cap: 10,
            collision_reset: 10_000,
            drop_margin: 20.0,
            long_press: 500,
        }
    }
}

impl EngineConfig {
    /// The unparent delay for a drag moving at `speed` px/ms.
    pub fn unparent_delay(&self, speed: f64) -> u64 {
        if speed > self.fast_drag_speed {
            self.fast_unparent_debounce
        } else {
            self.unparent_debounce
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparent_delay_adapts_to_speed() {
        let config = EngineConfig::default();
        assert_eq!(config.unparent_delay(0.4), 100);
        assert_eq!(config.unparent_delay(1.0), 100);
        assert_eq!(config.unparent_delay(1.5), 300);
    }
}
