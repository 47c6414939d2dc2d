//! Frame-Pipeline: Physik → Drag → Glättung → Band → Stabilisierung → Höhe.

use crate::app::use_cases::scene;
use crate::app::AppState;
use crate::core::PhysicsWorld;

/// Obergrenze für die Frame-Zeit (z.B. nach einem Tab-Wechsel).
const MAX_FRAME_DT: f32 = 0.1;

/// Führt einen Frame in fester Reihenfolge aus.
///
/// Ohne eingehängte Kette passiert nichts. Ungültige Frame-Zeiten zählen als 0.
pub fn advance(state: &mut AppState, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };
    let smoothing = state.options.smoothing_params();
    let stabilizer = state.options.stabilizer_params();
    let aspect = state.view.aspect();

    let current = &mut state.scene;
    let Some(chain) = current.chain.as_mut() else {
        return;
    };
    let world = &mut current.world;

    // 1. Physik-Schritt und Zustand lesen
    world.step(dt);
    chain.step(world, dt);

    // 2. Drag-Ziel vorgeben
    if chain.is_dragging() {
        if let Some(target) =
            state
                .pointer
                .drag
                .on_pointer_move(state.pointer.ndc, &state.view.camera, aspect)
        {
            chain.set_end_effector_target(world, target);
        }
    }

    // 3. + 4. Glättung und Band
    chain.update_smoothing(dt, &smoothing);
    current.band = chain.build_curve(
        state.options.curve_samples,
        state.options.curve_parameterization,
    );

    // 5. Ausrichtung
    chain.stabilize(world, &stabilizer);

    current.height = chain.end_effector_height(&*world);
    current.frame_count += 1;

    let pulled = current
        .height
        .is_some_and(|h| h > state.options.pull_threshold);
    if pulled && !current.card_block {
        scene::swap_to_blocked(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn advance_without_chain_is_noop() {
        let mut state = AppState::new();

        advance(&mut state, DT);

        assert_eq!(state.scene.frame_count, 0);
        assert!(state.scene.band.is_empty());
    }

    #[test]
    fn advance_rebuilds_band_and_height() {
        let mut state = AppState::new();
        scene::mount(&mut state, 0.0, None, None);

        for _ in 0..30 {
            advance(&mut state, DT);
        }

        assert_eq!(state.scene.frame_count, 30);
        assert_eq!(state.scene.band.len(), state.options.curve_samples);
        assert!(state.scene.band.iter().all(|p| p.is_finite()));
        let height = state.scene.height.expect("Höhe erwartet");
        assert!(height < 4.0, "Karte sollte fallen: {height}");
    }

    #[test]
    fn nan_frame_time_does_not_poison_band() {
        let mut state = AppState::new();
        scene::mount(&mut state, 0.0, None, None);
        for _ in 0..10 {
            advance(&mut state, DT);
        }

        advance(&mut state, f32::NAN);
        advance(&mut state, f32::INFINITY);
        for _ in 0..120 {
            advance(&mut state, DT);
        }

        assert!(state.scene.band.iter().all(|p| p.is_finite()));
        let chain = state.scene.chain.as_ref().expect("Kette erwartet");
        let mid1 = chain
            .joint(crate::core::JointRole::Mid1)
            .smoothed
            .expect("Glättung erwartet");
        assert!(mid1.is_finite(), "Glättung vergiftet: {mid1:?}");
    }

    #[test]
    fn pulling_card_above_threshold_swaps_chain_once() {
        let mut state = AppState::new();
        scene::mount(&mut state, 0.0, None, None);
        state.pointer.ndc = Vec2::ZERO;
        crate::app::use_cases::pointer::begin_drag(&mut state);

        // Pointer weit nach oben ziehen, bis die Schwelle überschritten ist
        state.pointer.ndc = Vec2::new(0.0, 0.95);
        for _ in 0..600 {
            advance(&mut state, DT);
            if state.scene.card_block {
                break;
            }
        }

        assert!(state.scene.card_block, "Schwelle nicht erreicht");
        assert!(!state.pointer.drag.is_dragging());
        let chain = state.scene.chain.as_ref().expect("Ersatz-Kette erwartet");
        assert_eq!(chain.anchor_position().x, state.options.blocked_displacement_x);
        assert!(matches!(
            chain.mode(),
            crate::core::EndEffectorMode::Parked { .. }
        ));
    }
}
