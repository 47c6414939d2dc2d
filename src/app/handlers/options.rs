//! Handler für Optionen.

use crate::app::use_cases;
use crate::app::AppState;
use crate::shared::LanyardOptions;
use std::path::Path;

/// Übernimmt neue Optionen und propagiert Validierungsfehler.
pub fn apply(state: &mut AppState, options: LanyardOptions) -> anyhow::Result<()> {
    use_cases::options::apply(state, options)
}

/// Speichert die Optionen als TOML-Datei.
pub fn save(state: &AppState, path: &Path) -> anyhow::Result<()> {
    use_cases::options::save(state, path)
}
