//! Granny Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use granny_dash::audio::{AudioManager, SoundEffect};
    use granny_dash::consts::*;
    use granny_dash::sim::{
        GameEvent, GamePhase, GameState, ObstacleKind, PickupKind, Viewport, tick, time_scale,
    };
    use granny_dash::HighScore;

    /// Background layers and their scroll rate relative to world speed
    const PARALLAX_LAYERS: [(&str, f32); 3] = [
        ("parallax-far", 0.1),
        ("parallax-mid", 0.3),
        ("parallax-near", 0.7),
    ];

    /// Everything the browser shell owns: the simulation plus the DOM,
    /// audio, and persistence collaborators it drives from drained events
    struct Shell {
        state: GameState,
        audio: AudioManager,
        high_score: HighScore,
        last_time: f64,
        parallax: [f32; 3],
        entity_nodes: HashMap<u32, HtmlElement>,
        document: Document,
        world: HtmlElement,
        player_el: HtmlElement,
    }

    impl Shell {
        fn new(
            seed: u64,
            viewport: Viewport,
            document: Document,
            world: HtmlElement,
            player_el: HtmlElement,
        ) -> Self {
            Self {
                state: GameState::new(seed, viewport),
                audio: AudioManager::new(),
                high_score: HighScore::load(),
                last_time: 0.0,
                parallax: [0.0; 3],
                entity_nodes: HashMap::new(),
                document,
                world,
                player_el,
            }
        }

        fn element(&self, id: &str) -> Option<HtmlElement> {
            self.document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into().ok())
        }

        /// Toggle pause, keeping music in step with the phase
        fn toggle_pause(&mut self) {
            self.state.toggle_pause();
            match self.state.phase {
                GamePhase::Paused => {
                    self.audio.pause_bgm();
                    log::info!("Paused");
                }
                GamePhase::Running => {
                    self.audio.resume_bgm();
                    // Avoid folding the whole pause into one delta
                    self.last_time = 0.0;
                }
                _ => {}
            }
        }

        /// Map drained simulation events to audio, haptics, and DOM effects
        fn handle_events(&mut self, events: Vec<GameEvent>) {
            for event in events {
                match event {
                    GameEvent::Jumped { count } => {
                        self.audio.play(SoundEffect::Jump);
                        if count == 2 {
                            vibrate(40);
                            self.burst("particle jump-spark", 4);
                        }
                    }
                    GameEvent::ObstacleHit { kind } => {
                        self.audio.play(SoundEffect::Hit);
                        if kind == ObstacleKind::Cat {
                            self.audio.play(SoundEffect::Cat);
                        }
                        vibrate(100);
                        self.world.set_class_name("world shake");
                    }
                    GameEvent::Slipped => {
                        self.audio.play(SoundEffect::Slip);
                        vibrate(80);
                        self.world.set_class_name("world shake");
                    }
                    GameEvent::Collected { awarded, .. } => {
                        self.audio.play(SoundEffect::Collect);
                        vibrate(30);
                        self.burst("particle collect-spark", 6);
                        log::debug!("Collected {} points", awarded);
                    }
                    GameEvent::SpeedIncreased { speed } => {
                        log::info!("Speed increased to {:.1}", speed);
                    }
                    GameEvent::GraceStarted => {}
                    GameEvent::GraceEnded => {
                        self.world.set_class_name("world");
                    }
                    GameEvent::GameOver { score } => {
                        self.audio.play(SoundEffect::GameOver);
                        self.audio.stop_bgm();
                        vibrate_pattern(&[200, 100, 200]);

                        let is_best = self.high_score.submit(score);
                        if let Some(el) = self.element("final-score") {
                            el.set_text_content(Some(&score.to_string()));
                        }
                        if let Some(el) = self.element("new-best") {
                            el.set_class_name(if is_best { "badge" } else { "badge hidden" });
                        }
                        self.world.set_class_name("world");
                        log::info!("Run ended with score {}", score);
                    }
                }
            }
        }

        /// Scroll the background layers while the world moves
        fn advance_parallax(&mut self, delta_ms: f32) {
            if self.state.phase != GamePhase::Running {
                return;
            }
            let ts = time_scale(delta_ms);
            for (i, (id, factor)) in PARALLAX_LAYERS.iter().enumerate() {
                self.parallax[i] -= self.state.speed * ts * factor;
                if let Some(el) = self.element(id) {
                    let _ = el
                        .style()
                        .set_property("background-position-x", &format!("{}px", self.parallax[i]));
                }
            }
        }

        /// Push simulation state into the DOM
        fn sync_dom(&mut self) {
            let style = self.player_el.style();
            let _ = style.set_property("bottom", &format!("{}%", self.state.player.y));
            let opacity = if self.state.player.blink_dimmed() {
                "0.35"
            } else {
                "1"
            };
            let _ = style.set_property("opacity", opacity);

            self.sync_entities();
            self.update_hud();
            self.sync_overlays();
        }

        /// One positioned div per live entity, created on first sight and
        /// removed when the simulation drops the entity
        fn sync_entities(&mut self) {
            let mut live: HashSet<u32> = HashSet::new();

            for i in 0..self.state.obstacles.len() {
                let (id, kind, x, hit) = {
                    let o = &self.state.obstacles[i];
                    (o.id, o.kind, o.x, o.hit)
                };
                live.insert(id);
                self.ensure_entity_node(id);
                if let Some(el) = self.entity_nodes.get(&id) {
                    let mut class = format!("entity obstacle {}", obstacle_class(kind));
                    if hit {
                        class.push_str(" hit");
                    }
                    el.set_class_name(&class);
                    let style = el.style();
                    let _ = style.set_property("left", &format!("{}px", x));
                    let _ = style.set_property("bottom", &format!("{}%", GROUND_Y_PCT));
                    let _ = style.set_property("width", &format!("{}px", kind.width()));
                    let _ = style.set_property("height", &format!("{}px", kind.height()));
                }
            }

            for i in 0..self.state.pickups.len() {
                let (id, kind, x) = {
                    let p = &self.state.pickups[i];
                    (p.id, p.kind, p.x)
                };
                live.insert(id);
                self.ensure_entity_node(id);
                if let Some(el) = self.entity_nodes.get(&id) {
                    el.set_class_name(&format!("entity pickup {}", pickup_class(kind)));
                    let style = el.style();
                    let _ = style.set_property("left", &format!("{}px", x));
                    let _ = style.set_property("bottom", &format!("{}%", kind.band_pct()));
                    let _ = style.set_property("width", &format!("{}px", kind.width()));
                    let _ = style.set_property("height", &format!("{}px", kind.height()));
                }
            }

            self.entity_nodes.retain(|id, el| {
                if live.contains(id) {
                    true
                } else {
                    el.remove();
                    false
                }
            });
        }

        fn ensure_entity_node(&mut self, id: u32) {
            if self.entity_nodes.contains_key(&id) {
                return;
            }
            if let Ok(el) = self.document.create_element("div") {
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let _ = self.world.append_child(&el);
                    self.entity_nodes.insert(id, el);
                }
            }
        }

        /// Drop all entity nodes (used when a new run clears the world)
        fn clear_entities(&mut self) {
            for (_, el) in self.entity_nodes.drain() {
                el.remove();
            }
        }

        fn update_hud(&self) {
            if let Some(el) = self.element("hud-score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = self.element("hud-multiplier") {
                el.set_text_content(Some(&format!("x{:.1}", self.state.multiplier)));
            }
            if let Some(el) = self.element("hud-lives") {
                el.set_text_content(Some(&"\u{2665}".repeat(self.state.lives as usize)));
            }
            if let Some(el) = self.element("hud-best") {
                el.set_text_content(Some(&self.high_score.best.to_string()));
            }
        }

        fn sync_overlays(&self) {
            if let Some(el) = self.element("pause-menu") {
                el.set_class_name(if self.state.phase == GamePhase::Paused {
                    "screen"
                } else {
                    "screen hidden"
                });
            }
            if let Some(el) = self.element("game-over") {
                el.set_class_name(if self.state.phase == GamePhase::GameOver {
                    "screen"
                } else {
                    "screen hidden"
                });
            }
        }

        /// Short-lived decorative divs near the player, removed by timeout
        fn burst(&self, class: &str, count: u32) {
            let Some(window) = web_sys::window() else { return };
            let origin_x = PLAYER_X + PLAYER_SPRITE_W / 2.0;
            for _ in 0..count {
                let Ok(el) = self.document.create_element("div") else {
                    continue;
                };
                let Ok(el) = el.dyn_into::<HtmlElement>() else {
                    continue;
                };
                el.set_class_name(class);
                let style = el.style();
                let dx = (js_sys::Math::random() as f32 - 0.5) * 40.0;
                let dy = js_sys::Math::random() as f32 * 10.0;
                let _ = style.set_property("left", &format!("{}px", origin_x + dx));
                let _ = style.set_property("bottom", &format!("{}%", self.state.player.y + dy));
                let _ = self.world.append_child(&el);

                let el_clone = el.clone();
                let cb = Closure::once_into_js(move || el_clone.remove());
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    cb.unchecked_ref(),
                    600,
                );
            }
        }
    }

    fn obstacle_class(kind: ObstacleKind) -> &'static str {
        match kind {
            ObstacleKind::Pothole => "pothole",
            ObstacleKind::Rock => "rock",
            ObstacleKind::Hydrant => "hydrant",
            ObstacleKind::Cat => "cat",
        }
    }

    fn pickup_class(kind: PickupKind) -> &'static str {
        match kind {
            PickupKind::Apple => "apple",
            PickupKind::Orange => "orange",
            PickupKind::Cherry => "cherry",
            PickupKind::Banana => "banana",
        }
    }

    fn vibrate(ms: u32) {
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().vibrate_with_duration(ms);
        }
    }

    fn vibrate_pattern(pattern: &[u32]) {
        if let Some(window) = web_sys::window() {
            let arr = js_sys::Array::new();
            for ms in pattern {
                arr.push(&JsValue::from(*ms));
            }
            let _ = window.navigator().vibrate_with_pattern(&arr);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Granny Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let world: HtmlElement = document
            .get_element_by_id("world")
            .expect("no world container")
            .dyn_into()
            .expect("world is not an element");
        let player_el: HtmlElement = document
            .get_element_by_id("player")
            .expect("no player element")
            .dyn_into()
            .expect("player is not an element");

        let viewport = Viewport::new(world.client_width() as f32, world.client_height() as f32);
        let seed = js_sys::Date::now() as u64;
        log::info!(
            "Session seeded with {} ({}x{} viewport)",
            seed,
            viewport.width,
            viewport.height
        );

        let shell = Rc::new(RefCell::new(Shell::new(
            seed, viewport, document, world, player_el,
        )));

        setup_input_handlers(shell.clone());
        setup_buttons(shell.clone());
        setup_audio_toggles(shell.clone());
        setup_auto_pause(shell.clone());

        // Show the stored best before the first run
        shell.borrow().update_hud();

        log::info!("Granny Dash ready, waiting for start");
    }

    fn setup_input_handlers(shell: Rc<RefCell<Shell>>) {
        // Keyboard: jump on Space/ArrowUp, pause on Escape/P
        {
            let shell = shell.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut s = shell.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        s.state.handle_input();
                    }
                    "Escape" | "p" | "P" => s.toggle_pause(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch (jump)
        {
            let shell = shell.clone();
            let world = shell.borrow().world.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                shell.borrow_mut().state.handle_input();
            });
            let _ = world
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse (jump)
        {
            let world = shell.borrow().world.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                shell.borrow_mut().state.handle_input();
            });
            let _ = world
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(shell: Rc<RefCell<Shell>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        for btn_id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(btn_id) {
                let shell = shell.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    start_run(&shell);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Resume button on the pause menu
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                shell.borrow_mut().toggle_pause();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_audio_toggles(shell: Rc<RefCell<Shell>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("bgm-toggle") {
            let shell = shell.clone();
            let btn_el = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut s = shell.borrow_mut();
                let enabled = !s.audio.settings.bgm_enabled;
                s.audio.set_bgm_enabled(enabled);
                let _ = btn_el.set_attribute("class", if enabled { "toggle on" } else { "toggle" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("sfx-toggle") {
            let btn_el = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut s = shell.borrow_mut();
                let enabled = !s.audio.settings.sfx_enabled;
                s.audio.set_sfx_enabled(enabled);
                let _ = btn_el.set_attribute("class", if enabled { "toggle on" } else { "toggle" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(shell: Rc<RefCell<Shell>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let shell = shell.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut s = shell.borrow_mut();
                    if s.state.phase == GamePhase::Running {
                        s.toggle_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut s = shell.borrow_mut();
                if s.state.phase == GamePhase::Running {
                    s.toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Begin a fresh run from the start screen or the game-over screen
    fn start_run(shell: &Rc<RefCell<Shell>>) {
        {
            let mut s = shell.borrow_mut();
            s.state.start();
            s.clear_entities();
            s.audio.start_bgm();
            s.last_time = 0.0;
            s.world.set_class_name("world");

            if let Some(el) = s.element("start-screen") {
                el.set_class_name("screen hidden");
            }
            if let Some(el) = s.element("game-over") {
                el.set_class_name("screen hidden");
            }
            if let Some(el) = s.element("hud") {
                el.set_class_name("hud");
            }
            log::info!("Run started (seed {})", s.state.seed);
        }
        request_animation_frame(shell.clone());
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(shell, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(shell: Rc<RefCell<Shell>>, time: f64) {
        {
            let mut s = shell.borrow_mut();

            let delta_ms = if s.last_time > 0.0 {
                (time - s.last_time) as f32
            } else {
                REFERENCE_FRAME_MS
            };
            s.last_time = time;

            if s.state.phase == GamePhase::Running {
                tick(&mut s.state, delta_ms);
                let events = s.state.drain_events();
                s.handle_events(events);
            }

            s.advance_parallax(delta_ms);
            s.sync_dom();

            // Loop stops on game over; the restart button re-arms it
            if !s.state.is_active() {
                s.last_time = 0.0;
                return;
            }
        }
        request_animation_frame(shell);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Granny Dash (native) starting...");
    log::info!("The browser shell is the playable build; serve the wasm target with `trunk serve`");

    // Headless smoke run: thirty simulated seconds at 60 fps
    headless_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_run() {
    use granny_dash::consts::REFERENCE_FRAME_MS;
    use granny_dash::sim::{GameState, Viewport, tick};

    let mut state = GameState::new(42, Viewport::new(1280.0, 720.0));
    state.start();

    for frame in 0..1800 {
        tick(&mut state, REFERENCE_FRAME_MS);
        if frame % 120 == 0 {
            // Hold a jump rhythm so the run survives a while
            state.handle_input();
        }
        let events = state.drain_events();
        for event in events {
            log::debug!("frame {}: {:?}", frame, event);
        }
        if !state.is_active() {
            break;
        }
    }

    println!(
        "Headless run finished: score {}, lives {}, speed {:.1}, {:?}",
        state.score, state.lives, state.speed, state.phase
    );
}
