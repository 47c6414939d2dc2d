//! Use-Case-Funktionen für Ein- und Aushängen der Kette.

use crate::app::AppState;
use crate::core::{RopeChain, RopeWorld};
use glam::Vec3;
use std::time::Duration;

/// Hängt eine neue Kette ein. Eine bereits vorhandene wird vorher abgebaut.
///
/// Die Physik-Welt wird mit den aktuellen Optionen neu angelegt.
pub fn mount(
    state: &mut AppState,
    displacement_x: f32,
    delay: Option<Duration>,
    park_at: Option<Vec3>,
) {
    if state.scene.is_mounted() {
        unmount(state);
    }
    state.scene.world = RopeWorld::new(state.options.solver_config());
    let chain = RopeChain::spawn(
        &mut state.scene.world,
        &state.options.chain,
        displacement_x,
        delay,
        park_at,
    );
    state.scene.height = chain.end_effector_height(&state.scene.world);
    state.scene.band = chain.build_curve(
        state.options.curve_samples,
        state.options.curve_parameterization,
    );
    state.scene.chain = Some(chain);
}

/// Baut die Kette ab: Drag wird abgebrochen, ausstehende Freigabe storniert.
pub fn unmount(state: &mut AppState) {
    state.pointer.drag.cancel();
    if let Some(chain) = state.scene.chain.take() {
        chain.despawn(&mut state.scene.world);
    }
    state.scene.band.clear();
    state.scene.height = None;
    if state.scene.world.body_count() > 0 {
        log::warn!(
            "Nach dem Abbau verbleiben {} Bodies in der Welt",
            state.scene.world.body_count()
        );
    }
}

/// Tauscht die Kette nach dem Hochziehen gegen die versetzte, verzögerte Variante.
///
/// Die neue Karte parkt an der zuletzt gezogenen Position.
pub fn swap_to_blocked(state: &mut AppState) {
    let park_at = state.pointer.drag.last_target();
    state.scene.card_block = true;
    log::info!(
        "Karte über {:.2} gezogen, Ersatz-Kette wird eingehängt",
        state.options.pull_threshold
    );
    let displacement_x = state.options.blocked_displacement_x;
    let delay = state.options.blocked_delay();
    mount(state, displacement_x, Some(delay), park_at);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EndEffectorMode, ReleaseState};

    #[test]
    fn mount_creates_chain_and_band() {
        let mut state = AppState::new();

        mount(&mut state, 0.0, None, None);

        assert!(state.scene.is_mounted());
        assert_eq!(state.scene.world.body_count(), 5);
        assert_eq!(state.scene.band.len(), state.options.curve_samples);
        assert_eq!(state.scene.height, Some(4.0));
    }

    #[test]
    fn mount_twice_replaces_chain() {
        let mut state = AppState::new();

        mount(&mut state, 0.0, None, None);
        mount(&mut state, 2.0, None, None);

        assert_eq!(state.scene.world.body_count(), 5);
        let chain = state.scene.chain.as_ref().expect("Kette erwartet");
        assert_eq!(chain.anchor_position(), Vec3::new(2.0, 4.0, 0.0));
    }

    #[test]
    fn unmount_cancels_drag_and_release() {
        let mut state = AppState::new();
        mount(&mut state, 2.0, Some(Duration::from_millis(2000)), None);
        let token = state
            .scene
            .chain
            .as_ref()
            .and_then(|c| c.release_token())
            .expect("Freigabe erwartet");
        let card_pos = Vec3::ZERO;
        state.pointer.drag.on_pointer_down(
            glam::Vec2::ZERO,
            &state.view.camera,
            state.view.aspect(),
            card_pos,
        );

        unmount(&mut state);

        assert!(token.is_cancelled());
        assert!(!state.pointer.drag.is_dragging());
        assert!(!state.scene.is_mounted());
        assert!(state.scene.band.is_empty());
        assert_eq!(state.scene.height, None);
    }

    #[test]
    fn swap_parks_new_card_at_last_drag_target() {
        let mut state = AppState::new();
        mount(&mut state, 0.0, None, None);
        state.pointer.drag.on_pointer_down(
            glam::Vec2::ZERO,
            &state.view.camera,
            state.view.aspect(),
            Vec3::ZERO,
        );
        let target = state
            .pointer
            .drag
            .on_pointer_move(glam::Vec2::ZERO, &state.view.camera, state.view.aspect())
            .expect("Ziel erwartet");

        swap_to_blocked(&mut state);

        assert!(state.scene.card_block);
        assert!(!state.pointer.drag.is_dragging());
        let chain = state.scene.chain.as_ref().expect("Kette erwartet");
        assert_eq!(chain.mode(), EndEffectorMode::Parked { at: target });
        assert_eq!(chain.release_state(), Some(ReleaseState::Armed));
        assert_eq!(chain.anchor_position(), Vec3::new(2.0, 4.0, 0.0));
    }
}
