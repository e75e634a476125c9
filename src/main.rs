//! Ribbon Snake entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent};

    use ribbon_snake::platform::InputAdapter;
    use ribbon_snake::renderer::{RenderState, TextureCache};
    use ribbon_snake::sim::LevelConfig;
    use ribbon_snake::{Intent, Session, SessionEvent, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputAdapter,
        textures: TextureCache,
        render_state: Option<RenderState>,
        last_time: f64,
        /// Pending animation frame request
        raf_handle: Option<i32>,
        /// Countdown interval
        interval_handle: Option<i32>,
    }

    impl Game {
        fn new(level: LevelConfig, seed: u64) -> Self {
            Self {
                session: Session::new(Tuning::default(), level, Settings::default(), seed),
                input: InputAdapter::new(),
                textures: TextureCache::with_builtins(),
                render_state: None,
                last_time: 0.0,
                raf_handle: None,
                interval_handle: None,
            }
        }

        fn push(&mut self, intent: Option<Intent>) {
            if let Some(intent) = intent {
                self.session.push_intent(intent);
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let Some(frame) = self.session.render(&self.textures, time / 1000.0) else {
                return;
            };
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Forward session events to the DOM HUD
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-time .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.session.countdown().display()));
            }

            let mut finished = false;
            for event in self.session.drain_events() {
                match event {
                    SessionEvent::Progress(score) => {
                        let target = self.session.level().target_score;
                        if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                            el.set_text_content(Some(&format!("{} / {}", score, target)));
                        }
                    }
                    SessionEvent::HitPoints(hp) => {
                        if let Some(el) = document.query_selector("#hud-hp .hud-value").ok().flatten() {
                            el.set_text_content(Some(&"♥".repeat(hp as usize)));
                        }
                    }
                    SessionEvent::GameOver {
                        won,
                        reason,
                        texture_id,
                    } => {
                        log::info!("Game over ({:?}) with texture {}", reason, texture_id);
                        finished = true;
                        if let Some(el) = document.get_element_by_id("game-over") {
                            let _ = el.set_attribute("class", if won { "won" } else { "lost" });
                        }
                        if let Some(el) = document.get_element_by_id("game-over-title") {
                            let title = if won { "Level complete!" } else { "Game over" };
                            el.set_text_content(Some(title));
                        }
                    }
                }
            }

            // The last frame stays on screen
            if finished {
                self.teardown();
            }
        }

        /// Stop the loop and the countdown; the session ignores everything after
        fn teardown(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(handle) = self.raf_handle.take() {
                let _ = window.cancel_animation_frame(handle);
            }
            if let Some(handle) = self.interval_handle.take() {
                window.clear_interval_with_handle(handle);
            }
            self.session.teardown();
        }
    }

    /// Canvas size in CSS pixels (the arena) and device pixels (the surface)
    fn canvas_size(canvas: &HtmlCanvasElement) -> (Vec2, u32, u32) {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        (Vec2::new(client_w as f32, client_h as f32), width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Ribbon Snake starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (arena, width, height) = canvas_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(LevelConfig::LEVEL_ONE, seed)));
        game.borrow_mut().session.resize(arena.x, arena.y);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;
        {
            let mut g = game.borrow_mut();
            render_state.sync_textures(&g.textures);
            g.render_state = Some(render_state);
        }

        setup_input_handlers(&canvas, game.clone());
        setup_texture_controls(game.clone());
        setup_resize(&canvas, game.clone());
        setup_countdown(game.clone());
        setup_teardown(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Ribbon Snake running!");
        Ok(())
    }

    /// Pointer position relative to the canvas, in arena pixels
    fn touch_position(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(Vec2::new(
            (touch.client_x() as f64 - rect.left()) as f32,
            (touch.client_y() as f64 - rect.top()) as f32,
        ))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move / press - absolute position
        for name in ["mousemove", "mousedown"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let intent = g.input.pointer_moved(pos);
                g.push(intent);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_position(&canvas_clone, &event) {
                    let mut g = game.borrow_mut();
                    let intent = g.input.pointer_moved(pos);
                    g.push(intent);
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard d-pad (arrows / WASD)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "i" | "I" => {
                        let on = !g.session.autopilot();
                        g.push(Some(Intent::Autopilot(on)));
                    }
                    key => {
                        let intent = g.input.key_down(key);
                        if intent.is_some() {
                            event.prevent_default();
                        }
                        g.push(intent);
                    }
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let intent = g.input.key_up(&event.key());
                g.push(intent);
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Texture buttons (`data-texture`) and the thickness slider
    fn setup_texture_controls(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Ok(buttons) = document.query_selector_all("[data-texture]") {
            for i in 0..buttons.length() {
                let Some(button) = buttons.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
                    continue;
                };
                let Some(id) = button.get_attribute("data-texture") else {
                    continue;
                };
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    let Some(texture) = g.textures.get(&id).cloned() else {
                        log::warn!("Unknown texture '{}'", id);
                        return;
                    };
                    log::info!("Texture: {}", texture.name);
                    g.push(Some(Intent::TextureSelected {
                        id: id.clone(),
                        render_width: texture.render_width,
                    }));
                });
                let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(slider) = document
            .get_element_by_id("thickness")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let slider_clone = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Ok(value) = slider_clone.value().parse::<f32>() {
                    game.borrow_mut().push(Some(Intent::ThicknessChanged(value)));
                }
            });
            let _ = slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (arena, width, height) = canvas_size(&canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            let mut g = game.borrow_mut();
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
            g.session.resize(arena.x, arena.y);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One `SecondElapsed` intent per second
    fn setup_countdown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_clone = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            game_clone.borrow_mut().push(Some(Intent::SecondElapsed));
        });
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        ) {
            Ok(handle) => game.borrow_mut().interval_handle = Some(handle),
            Err(e) => log::error!("Failed to start countdown: {:?}", e),
        }
        closure.forget();
    }

    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let game_clone = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game_clone, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => game.borrow_mut().raf_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let torn_down = {
            let mut g = game.borrow_mut();
            g.raf_handle = None;
            if g.session.is_torn_down() {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                ribbon_snake::consts::SIM_DT
            };
            g.last_time = time;

            g.session.update(dt);
            g.render(time);
            g.update_hud();
            // update_hud tears the session down on game over
            g.session.is_torn_down()
        };

        if !torn_down {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot run: plays level after level at a fixed 60 Hz and logs
/// what happens.
///
/// Usage: `ribbon-snake [tuning.json] [low|medium|high]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ribbon_snake::consts::SIM_DT;
    use ribbon_snake::renderer::TextureCache;
    use ribbon_snake::sim::LevelConfig;
    use ribbon_snake::{Intent, QualityPreset, Session, SessionEvent, Settings, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ribbon Snake (native) starting...");

    let tuning_json = std::env::args().nth(1).and_then(|path| {
        match std::fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                None
            }
        }
    });
    let tuning = Tuning::load_or_default(tuning_json.as_deref());
    let quality = std::env::args()
        .nth(2)
        .and_then(|arg| QualityPreset::parse(&arg))
        .unwrap_or_default();
    log::info!("Quality: {}", quality.as_str());
    let textures = TextureCache::with_builtins();
    let texture_id = Settings::default().texture_id;
    if let Some(texture) = textures.get(&texture_id) {
        log::info!("Texture: {}", texture.name);
    }

    let mut level = Some(LevelConfig::LEVEL_ONE);
    let mut seed = 42;
    while let Some(current) = level.take() {
        let mut session = Session::new(tuning.clone(), current, Settings::from_preset(quality), seed);
        session.resize(1280.0, 720.0);
        session.push_intent(Intent::Autopilot(true));

        let frames_per_second = (1.0 / SIM_DT).round() as u32;
        let max_frames = (current.time_limit + 1) * frames_per_second;
        let mut outcome = None;

        for frame in 1..=max_frames {
            if frame % frames_per_second == 0 {
                session.push_intent(Intent::SecondElapsed);
            }
            session.update(SIM_DT);

            if frame % (frames_per_second * 10) == 0 {
                let time = f64::from(frame) * f64::from(SIM_DT);
                if let Some(rendered) = session.render(&textures, time) {
                    log::debug!(
                        "t={:.0}s: {} batches, {} vertices",
                        time,
                        rendered.batches.len(),
                        rendered.vertex_count()
                    );
                }
            }

            for event in session.drain_events() {
                match event {
                    SessionEvent::Progress(score) => log::info!("Score: {}", score),
                    SessionEvent::HitPoints(hp) => log::info!("Hit points: {}", hp),
                    SessionEvent::GameOver { won, reason, .. } => outcome = Some((won, reason)),
                }
            }
            if outcome.is_some() {
                break;
            }
        }

        session.teardown();
        match outcome {
            Some((true, _)) => {
                println!("Level {} complete", current.id);
                level = current.next();
                seed += 1;
            }
            Some((false, reason)) => println!("Level {} failed: {:?}", current.id, reason),
            None => println!("Level {} did not finish", current.id),
        }
    }
}
