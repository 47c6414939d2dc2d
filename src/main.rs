//! Portfolio Lanyard (Headless-Treiber).
//!
//! Spielt eine geskriptete Interaktion mit 60 Hz ab: Karte hängen lassen,
//! hochziehen, loslassen. Mit `--dump` wird jede Render-Szene als JSON-Zeile
//! auf stdout ausgegeben.

use glam::{Vec2, Vec3};
use portfolio_lanyard::{AppController, AppIntent, AppState, Camera3D, LanyardOptions};
use std::io::Write;

const FRAME_DT: f32 = 1.0 / 60.0;
const VIEWPORT: [f32; 2] = [1280.0, 720.0];

fn main() -> anyhow::Result<()> {
    AppRunner::run()
}

struct AppRunner {
    state: AppState,
    controller: AppController,
    dump: Option<std::io::StdoutLock<'static>>,
}

impl AppRunner {
    fn run() -> anyhow::Result<()> {
        // Logger initialisieren
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Portfolio Lanyard v{} startet...", env!("CARGO_PKG_VERSION"));

        let dump = std::env::args().skip(1).any(|arg| arg == "--dump");
        let options = LanyardOptions::load_from_file(&LanyardOptions::config_path());

        let mut runner = Self {
            state: AppState::with_options(options),
            controller: AppController::new(),
            dump: dump.then(|| std::io::stdout().lock()),
        };
        runner.script()
    }

    fn intent(&mut self, intent: AppIntent) -> anyhow::Result<()> {
        self.controller.handle_intent(&mut self.state, intent)
    }

    /// Simuliert `seconds` Sekunden und protokolliert die Kartenhöhe.
    fn frames(
        &mut self,
        seconds: f32,
        mut pointer: impl FnMut(f32) -> Option<Vec2>,
    ) -> anyhow::Result<()> {
        let count = (seconds / FRAME_DT).round() as usize;
        for frame in 0..count {
            if let Some(screen_pos) = pointer(frame as f32 / count.max(1) as f32) {
                self.intent(AppIntent::PointerMoved { screen_pos })?;
            }
            self.intent(AppIntent::FrameRequested { dt: FRAME_DT })?;

            if frame % 30 == 0 {
                match self.state.scene.height {
                    Some(height) => log::info!("Höhe: {height:.2}"),
                    None => log::info!("Höhe: -"),
                }
            }
            if let Some(out) = self.dump.as_mut() {
                let scene = self.controller.build_render_scene(&self.state);
                serde_json::to_writer(&mut *out, &scene)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    /// Bildschirmposition der Karte (für den Pointer-Druck).
    fn card_screen_pos(&self) -> Option<Vec2> {
        let chain = self.state.scene.chain.as_ref()?;
        let card = chain.end_effector_position(&self.state.scene.world)?;
        Some(world_to_screen(&self.state.view.camera, card, VIEWPORT))
    }

    fn script(&mut self) -> anyhow::Result<()> {
        self.intent(AppIntent::ViewportResized { size: VIEWPORT })?;
        self.intent(AppIntent::SceneMounted)?;

        log::info!("Karte hängt sich aus");
        self.frames(3.0, |_| None)?;

        let grab = self
            .card_screen_pos()
            .ok_or_else(|| anyhow::anyhow!("Karte nicht gefunden"))?;
        self.intent(AppIntent::PointerEntered)?;
        self.intent(AppIntent::PointerPressed { screen_pos: grab })?;

        log::info!("Karte wird hochgezogen");
        let lift = Vec2::new(grab.x, VIEWPORT[1] * 0.05);
        self.frames(1.5, |t| Some(grab.lerp(lift, t)))?;

        self.intent(AppIntent::PointerReleased)?;
        self.intent(AppIntent::PointerLeft)?;

        log::info!("Karte losgelassen");
        self.frames(4.0, |_| None)?;

        self.intent(AppIntent::SceneUnmounted)?;
        log::info!(
            "Fertig nach {} Frames, {} Commands",
            self.state.scene.frame_count,
            self.state.command_log.len()
        );
        Ok(())
    }
}

/// Projiziert einen Weltpunkt in Screen-Pixel (Ursprung oben links).
fn world_to_screen(camera: &Camera3D, world: Vec3, viewport: [f32; 2]) -> Vec2 {
    let aspect = Camera3D::aspect_of(viewport);
    let clip = camera.projection_matrix(aspect) * camera.view_matrix() * world.extend(1.0);
    let ndc = if clip.w.abs() > f32::EPSILON {
        clip.truncate() / clip.w
    } else {
        Vec3::ZERO
    };
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport[0],
        (1.0 - ndc.y) * 0.5 * viewport[1],
    )
}
