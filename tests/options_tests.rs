use portfolio_lanyard::{AppCommand, AppController, AppIntent, AppState, LanyardOptions};
use std::path::PathBuf;

fn temp_options_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "portfolio_lanyard_{}_{}.toml",
        name,
        std::process::id()
    ))
}

#[test]
fn test_options_survive_save_and_load() {
    let path = temp_options_path("roundtrip");
    let mut options = LanyardOptions::default();
    options.pull_threshold = 6.5;
    options.drag_retain = 0.8;
    options.chain.anchor_height = 3.5;

    options.save_to_file(&path).expect("Speichern sollte klappen");
    let loaded = LanyardOptions::load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.pull_threshold, 6.5);
    assert_eq!(loaded.drag_retain, 0.8);
    assert_eq!(loaded.chain.anchor_height, 3.5);
    assert_eq!(loaded.curve_samples, options.curve_samples);
}

#[test]
fn test_invalid_options_file_falls_back_to_defaults() {
    let path = temp_options_path("invalid");
    std::fs::write(&path, "timestep = -1.0\n").expect("Schreiben sollte klappen");

    let loaded = LanyardOptions::load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.timestep, LanyardOptions::default().timestep);
}

#[test]
fn test_options_changed_intent_rejects_invalid_values() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    let mut options = LanyardOptions::default();
    options.drag_retain = 1.5;

    let result = controller.handle_intent(
        &mut state,
        AppIntent::OptionsChanged {
            options: Box::new(options),
        },
    );

    assert!(result.is_err());
    assert_eq!(state.options.drag_retain, LanyardOptions::default().drag_retain);
}

#[test]
fn test_save_options_requested_writes_file_and_logs_command() {
    let path = temp_options_path("intent");
    let mut controller = AppController::new();
    let mut state = AppState::new();
    state.options.blocked_delay_ms = 1500;

    controller
        .handle_intent(
            &mut state,
            AppIntent::SaveOptionsRequested {
                path: Some(path.clone()),
            },
        )
        .expect("SaveOptionsRequested sollte ohne Fehler durchlaufen");

    let loaded = LanyardOptions::load_from_file(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.blocked_delay_ms, 1500);
    match state.command_log.entries().last() {
        Some(AppCommand::SaveOptions { path: logged }) => assert_eq!(logged, &path),
        other => panic!("Unerwarteter letzter Command: {other:?}"),
    }
}
