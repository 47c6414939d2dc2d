//! AppIntent- und AppCommand-Enums für den Intent/Command-Datenfluss.

use crate::shared::LanyardOptions;
use glam::Vec2;
use std::path::PathBuf;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus Host/System ohne direkte Mutationslogik.
#[derive(Debug, Clone, PartialEq)]
pub enum AppIntent {
    /// Szene wurde eingehängt (Kette erzeugen)
    SceneMounted,
    /// Szene wurde ausgehängt (Kette abbauen)
    SceneUnmounted,
    /// Viewport-Größe hat sich geändert
    ViewportResized { size: [f32; 2] },
    /// Pointer ist über der Karte (Hit-Test des Hosts)
    PointerEntered,
    /// Pointer hat die Karte verlassen
    PointerLeft,
    /// Pointer auf der Karte gedrückt (Screen-Pixel)
    PointerPressed { screen_pos: Vec2 },
    /// Pointer bewegt (Screen-Pixel)
    PointerMoved { screen_pos: Vec2 },
    /// Pointer losgelassen
    PointerReleased,
    /// Neuer Frame mit vergangener Zeit in Sekunden
    FrameRequested { dt: f32 },
    /// Optionen wurden geändert
    OptionsChanged { options: Box<LanyardOptions> },
    /// Optionen speichern (None = Standardpfad neben der Binary)
    SaveOptionsRequested { path: Option<PathBuf> },
}

/// Commands sind mutierende Operationen, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Kette erzeugen (Versatz entlang X, Verzögerung der Freigabe in ms)
    MountChain { displacement_x: f32, delay_ms: u64 },
    /// Kette abbauen, laufenden Drag abbrechen
    UnmountChain,
    /// Viewport-Größe setzen
    SetViewportSize { size: [f32; 2] },
    /// Hover-Zustand der Karte setzen
    SetHovered { hovered: bool },
    /// Pointer-Position in NDC setzen
    SetPointer { ndc: Vec2 },
    /// Drag an der aktuellen Pointer-Position starten
    BeginDrag,
    /// Drag beenden
    EndDrag,
    /// Frame-Pipeline ausführen
    AdvanceFrame { dt: f32 },
    /// Neue Optionen übernehmen
    ApplyOptions { options: Box<LanyardOptions> },
    /// Optionen als TOML speichern
    SaveOptions { path: PathBuf },
}
