//! Doodle Balls entry point
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
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, MouseEvent,
        TouchEvent,
    };

    use doodle_balls::audio::WebAudio;
    use doodle_balls::consts::SIM_DT;
    use doodle_balls::platform::RawPointer;
    use doodle_balls::renderer::{RenderState, shapes};
    use doodle_balls::{DoodleError, FrameOutcome, Session, Settings, client_to_canvas};

    const CANVAS_ID: &str = "gameCanvas";
    const STATUS_ID: &str = "status";
    const RESET_ID: &str = "resetButton";

    /// Game instance holding all state
    struct Game {
        session: Session<WebAudio>,
        render_state: RenderState,
        settings: Settings,
        last_time: f64,
        shown_status: String,
    }

    impl Game {
        /// Draw the current state (before it is stepped)
        fn render(&mut self) {
            let vertices = shapes::scene(self.session.state(), self.settings.line_width);
            match self.render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Mirror the session status into the page
        fn update_status(&mut self) {
            if self.shown_status == self.session.status() {
                return;
            }
            self.shown_status = self.session.status().to_string();
            if let Some(el) = document().and_then(|d| d.get_element_by_id(STATUS_ID)) {
                el.set_text_content(Some(&self.shown_status));
            }
        }

        /// Reset the session; returns true if the frame loop must be restarted
        fn reset(&mut self) -> bool {
            let restart = self.session.reset();
            if restart {
                self.last_time = 0.0;
            }
            self.update_status();
            restart
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Doodle Balls starting...");

        if let Err(e) = start().await {
            log::error!("Startup failed: {}", e);
        }
    }

    async fn start() -> Result<(), DoodleError> {
        let window = web_sys::window().ok_or(DoodleError::MissingElement("window"))?;
        let document = window
            .document()
            .ok_or(DoodleError::MissingElement("document"))?;

        // No context menu anywhere (right-drag would otherwise open it)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = document.add_event_listener_with_callback(
                "contextmenu",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or(DoodleError::MissingElement(CANVAS_ID))?
            .dyn_into()
            .map_err(|_| DoodleError::MissingElement(CANVAS_ID))?;

        // Sized to the viewport once; later viewport changes are ignored
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as u32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        // Store defaults on first visit so they can be edited in place
        settings.save();
        let audio = WebAudio::new(&settings);
        let session = Session::new(width as f32, height as f32, settings.tuning, audio);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| DoodleError::Graphics(format!("surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| DoodleError::Graphics(format!("adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| DoodleError::Graphics(format!("device: {}", e)))?;

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state,
            last_time: 0.0,
            shown_status: String::new(),
            settings,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_reset_button(game.clone());

        // First tick waits for the background image
        load_background(game);

        log::info!("Doodle Balls waiting for background image ({}x{})", width, height);
        Ok(())
    }

    fn load_background(game: Rc<RefCell<Game>>) {
        let url = game.borrow().settings.background_url.clone();
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(e) => {
                log::warn!("Cannot create image element: {:?}", e);
                start_game(game);
                return;
            }
        };
        // Needed to read the pixels back from a cross-origin host
        img.set_cross_origin(Some("anonymous"));

        {
            let game = game.clone();
            let img_clone = img.clone();
            let closure = Closure::once(move |_event: web_sys::Event| {
                let size = game.borrow().render_state.size;
                match image_pixels(&img_clone, size) {
                    Ok((w, h, rgba)) => game.borrow_mut().render_state.set_background(w, h, &rgba),
                    Err(e) => log::warn!("{}", e),
                }
                start_game(game);
            });
            img.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let closure = Closure::once(move |_event: web_sys::Event| {
                log::warn!("Background image failed to load, using plain background");
                start_game(game);
            });
            img.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        img.set_src(&url);
    }

    /// Decode an image into RGBA8 pixels through an offscreen 2D canvas,
    /// scaled to `size` (the background is stretched over the canvas anyway)
    fn image_pixels(
        img: &HtmlImageElement,
        size: (u32, u32),
    ) -> Result<(u32, u32, Vec<u8>), DoodleError> {
        let js_err = |e: JsValue| DoodleError::Image(format!("{:?}", e));
        if img.natural_width() == 0 || img.natural_height() == 0 {
            return Err(DoodleError::Image("image has no pixels".to_string()));
        }
        let (w, h) = (size.0.max(1), size.1.max(1));

        let canvas: HtmlCanvasElement = document()
            .ok_or(DoodleError::MissingElement("document"))?
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| DoodleError::Image("offscreen canvas".to_string()))?;
        canvas.set_width(w);
        canvas.set_height(h);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| DoodleError::Image("no 2d context".to_string()))?
            .dyn_into()
            .map_err(|_| DoodleError::Image("no 2d context".to_string()))?;

        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w as f64, h as f64)
            .map_err(js_err)?;
        let data = ctx
            .get_image_data(0.0, 0.0, w as f64, h as f64)
            .map_err(js_err)?;

        Ok((w, h, data.data().0))
    }

    fn start_game(game: Rc<RefCell<Game>>) {
        let restart = {
            let mut g = game.borrow_mut();
            let restart = g.session.start();
            if restart {
                g.last_time = 0.0;
            }
            g.update_status();
            restart
        };
        if restart {
            request_animation_frame(game);
        }
        log::info!("Doodle Balls running!");
    }

    /// Canvas-local position of a client-space point
    fn canvas_pos(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        client_to_canvas(
            Vec2::new(client_x as f32, client_y as f32),
            Vec2::new(rect.left() as f32, rect.top() as f32),
        )
    }

    fn first_touch_pos(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        Some(canvas_pos(canvas, touch.client_x(), touch.client_y()))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - primary button starts a line
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = canvas_pos(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().session.pointer(RawPointer::MouseDown {
                    button: event.button(),
                    pos,
                });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = canvas_pos(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut()
                    .session
                    .pointer(RawPointer::MouseMove { pos });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.pointer(RawPointer::MouseUp);
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - single finger only
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let touches = event.touches().length();
                if let Some(pos) = first_touch_pos(&canvas_clone, &event) {
                    game.borrow_mut()
                        .session
                        .pointer(RawPointer::TouchStart { touches, pos });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = first_touch_pos(&canvas_clone, &event) {
                    game.borrow_mut()
                        .session
                        .pointer(RawPointer::TouchMove { pos });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel (interrupted touch finishes the line too)
        for (name, raw) in [
            ("touchend", RawPointer::TouchEnd),
            ("touchcancel", RawPointer::TouchCancel),
        ] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.pointer(raw);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let outcome = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            // Draw first: the frame shows the state before this step
            g.render();
            let outcome = g.session.advance(dt);
            g.update_status();
            outcome
        };

        match outcome {
            FrameOutcome::Continue => request_animation_frame(game),
            FrameOutcome::Won => {
                // Extra frame so the touching position is visible; without it the
                // last frame shows the balls one tick apart. Stopped until reset.
                game.borrow_mut().render();
                log::info!("Frame loop stopped");
            }
        }
    }

    fn setup_reset_button(game: Rc<RefCell<Game>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(RESET_ID)) else {
            log::warn!("No #{} element, reset disabled", RESET_ID);
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let restart = game.borrow_mut().reset();
            if restart {
                request_animation_frame(game.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use doodle_balls::audio::SilentAudio;
    use doodle_balls::{Session, Settings};
    use glam::Vec2;

    env_logger::init();
    log::info!("Doodle Balls (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless demo: a held (unfinished) ramp under the red ball
    let settings = Settings::load();
    let mut session = Session::new(800.0, 600.0, settings.tuning, SilentAudio);
    session.start();
    session.gesture(doodle_balls::platform::Gesture::Start(Vec2::new(100.0, 540.0)));
    session.gesture(doodle_balls::platform::Gesture::Move(Vec2::new(700.0, 580.0)));

    let max_ticks = 60 * 60;
    match session.run_until_won(max_ticks) {
        Some(ticks) => println!("{} after {} ticks", session.status(), ticks),
        None => println!("No contact within {} ticks", max_ticks),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
