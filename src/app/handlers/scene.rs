//! Handler für Ein- und Aushängen der Szene.

use crate::app::use_cases;
use crate::app::AppState;
use std::time::Duration;

/// Hängt eine Kette mit Versatz und optionaler Freigabe-Verzögerung ein.
pub fn mount(state: &mut AppState, displacement_x: f32, delay_ms: u64) {
    let delay = (delay_ms > 0).then(|| Duration::from_millis(delay_ms));
    use_cases::scene::mount(state, displacement_x, delay, None);
}

/// Baut die aktuelle Kette ab.
pub fn unmount(state: &mut AppState) {
    use_cases::scene::unmount(state);
}
