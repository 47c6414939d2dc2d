use crate::app::{AppCommand, AppIntent, AppState};
use glam::Vec2;

use super::map_intent_to_commands;

#[test]
fn scene_mounted_maps_to_plain_chain() {
    let state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::SceneMounted);

    assert_eq!(
        commands,
        vec![AppCommand::MountChain {
            displacement_x: 0.0,
            delay_ms: 0
        }]
    );
}

#[test]
fn scene_mounted_after_pull_maps_to_blocked_chain() {
    let mut state = AppState::new();
    state.scene.card_block = true;

    let commands = map_intent_to_commands(&state, AppIntent::SceneMounted);

    assert_eq!(
        commands,
        vec![AppCommand::MountChain {
            displacement_x: 2.0,
            delay_ms: 2000
        }]
    );
}

#[test]
fn pointer_pressed_without_chain_only_moves_pointer() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::PointerPressed {
            screen_pos: Vec2::new(640.0, 360.0),
        },
    );

    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], AppCommand::SetPointer { ndc } if ndc == Vec2::ZERO));
}

#[test]
fn pointer_pressed_with_chain_maps_to_pointer_then_drag_in_order() {
    let mut state = AppState::new();
    crate::app::use_cases::scene::mount(&mut state, 0.0, None, None);

    let commands = map_intent_to_commands(
        &state,
        AppIntent::PointerPressed {
            screen_pos: Vec2::new(0.0, 0.0),
        },
    );

    assert_eq!(commands.len(), 2);
    assert!(
        matches!(commands[0], AppCommand::SetPointer { ndc } if ndc == Vec2::new(-1.0, 1.0))
    );
    assert!(matches!(commands[1], AppCommand::BeginDrag));
}

#[test]
fn pointer_released_without_drag_maps_to_nothing() {
    let state = AppState::new();

    assert!(map_intent_to_commands(&state, AppIntent::PointerReleased).is_empty());
}

#[test]
fn hover_intents_map_to_set_hovered() {
    let state = AppState::new();

    assert_eq!(
        map_intent_to_commands(&state, AppIntent::PointerEntered),
        vec![AppCommand::SetHovered { hovered: true }]
    );
    assert_eq!(
        map_intent_to_commands(&state, AppIntent::PointerLeft),
        vec![AppCommand::SetHovered { hovered: false }]
    );
}
