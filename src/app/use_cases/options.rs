//! Use-Case-Funktionen für Laufzeit-Optionen.

use crate::app::AppState;
use crate::shared::LanyardOptions;
use std::path::Path;

/// Übernimmt neue Optionen nach Validierung.
///
/// Physik-Parameter und Kettengeometrie greifen beim nächsten Einhängen.
pub fn apply(state: &mut AppState, options: LanyardOptions) -> anyhow::Result<()> {
    options.validate()?;
    state.pointer.drag.set_retain(options.drag_retain);
    state.view.camera = options.camera();
    state.options = options;
    log::info!("Optionen übernommen");
    Ok(())
}

/// Speichert die aktuellen Optionen.
pub fn save(state: &AppState, path: &Path) -> anyhow::Result<()> {
    state.options.save_to_file(path)
}
