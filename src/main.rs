//! Pokepong entry point
//!
//! The browser build draws with WebGPU on a canvas; the native build runs the
//! same frame loop headless against the draw-call recorder.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use pokepong::renderer::{SetupError, SpriteRenderState, TextureError};
    use pokepong::sim::{InputEvent, Key};
    use pokepong::{Game, SceneConfig, SceneKind, Settings};

    type SharedGame = Rc<RefCell<Game<SpriteRenderState>>>;

    #[derive(Debug, thiserror::Error)]
    enum StartError {
        #[error("Missing page element: {0}")]
        Dom(&'static str),
        #[error("Can't create surface {0}")]
        Surface(#[from] wgpu::CreateSurfaceError),
        #[error("Can't find a GPU {0}")]
        Adapter(#[from] wgpu::RequestAdapterError),
        #[error("Can't set up renderer {0}")]
        Setup(#[from] SetupError),
        #[error("Can't load sprites {0}")]
        Texture(#[from] TextureError),
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Pokepong starting...");
        if let Err(e) = start().await {
            log::error!("Start-up failed: {}", e);
        }
    }

    async fn start() -> Result<(), StartError> {
        let window = web_sys::window().ok_or(StartError::Dom("window"))?;
        let document = window.document().ok_or(StartError::Dom("document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or(StartError::Dom("canvas"))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SpriteRenderState::new(surface, &adapter, width, height).await?;

        // Stored back so the defaults can be edited from devtools
        let mut settings = Settings::load();
        settings.save();
        if let Some(kind) = scene_from_query(&window) {
            settings.scene = kind;
        }
        let scene = SceneConfig::from_kind(settings.scene);
        let game = Game::new(&scene, settings, render_state)?;
        document.set_title(game.title());

        let game = Rc::new(RefCell::new(game));
        setup_input_handlers(game.clone());

        // Start game loop
        start_loop(game);

        log::info!("Pokepong running!");
        Ok(())
    }

    /// `?scene=orchard` overrides the stored scene for this page load
    fn scene_from_query(window: &web_sys::Window) -> Option<SceneKind> {
        let search = window.location().search().ok()?;
        let name = search
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("scene="))?;
        let kind = SceneKind::from_name(name);
        if kind.is_none() {
            log::warn!("Unknown scene '{}'", name);
        }
        kind
    }

    fn setup_input_handlers(game: SharedGame) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_name(&event.key()) else {
                    return;
                };
                // Keep arrow keys from scrolling the page
                event.prevent_default();
                let event = if pressed {
                    InputEvent::KeyDown(key)
                } else {
                    InputEvent::KeyUp(key)
                };
                game.borrow_mut().handle_event(event);
            });
            let _ = window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// The first callback only anchors the clock; rAF time counts from page load
    fn start_loop(game: SharedGame) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game.borrow_mut().start(time);
            request_animation_frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: SharedGame) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: SharedGame, time: f64) {
        let keep_running = game.borrow_mut().frame(time);

        if keep_running {
            request_animation_frame(game);
        } else {
            log::info!("Pokepong stopped");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pokepong::renderer::FrameRecorder;
    use pokepong::{Game, SceneConfig, SceneKind, Settings};

    env_logger::init();
    log::info!("Pokepong (native) starting...");

    let mut settings = Settings::load();
    // `pokepong orchard` overrides the configured scene
    if let Some(name) = std::env::args().nth(1) {
        match SceneKind::from_name(&name) {
            Some(kind) => settings.scene = kind,
            None => {
                log::error!("Unknown scene '{}', expected pong or orchard", name);
                std::process::exit(2);
            }
        }
    }
    let scene = SceneConfig::from_kind(settings.scene);
    let max_frames = settings.headless_frames;
    let step_ms = settings.headless_step_ms;

    let mut game = match Game::new(&scene, settings, FrameRecorder::new()) {
        Ok(game) => game,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Running '{}' headless for up to {} frames", game.title(), max_frames);

    let mut now = 0.0;
    for _ in 0..max_frames {
        now += step_ms;
        if !game.frame(now) || !game.state().match_state.is_running() {
            break;
        }
    }

    let state = game.state();
    match state.match_state.winner() {
        Some(side) => log::info!("{} player won after {:.2}s", side.as_str(), state.elapsed),
        None => log::info!("No winner after {:.2}s", state.elapsed),
    }
    log::info!(
        "Rendered {} frames, {} draw calls",
        game.renderer().frames(),
        game.renderer().draw_calls()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
