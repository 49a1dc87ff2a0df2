//! Brick Login entry point
//!
//! On the web this wires the DOM to a `Session` and paints its snapshots.
//! Natively it plays one headless battle with an autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_shell {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, MouseEvent, TouchEvent};

    use brick_login::consts::{BALL_SIZE, PADDLE_HEIGHT, PADDLE_OFFSET};
    use brick_login::platform::web::{ARENA_ID, DomLayout, ENEMY_ID, LOGIN_BUTTON_ID};
    use brick_login::settings::{SETTINGS_ATTRIBUTE, Settings};
    use brick_login::sim::{Phase, Session, Snapshot};

    /// Page-side state: the session plus what it needs to measure and paint
    struct Shell {
        session: Session,
        layout: DomLayout,
        document: Document,
    }

    impl Shell {
        fn set_style(&self, id: &str, style: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("style", style);
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        /// Paint the current snapshot
        fn render(&self) {
            let snap: Snapshot = self.session.snapshot();
            let phase = snap.phase;
            let battle = snap.battle.as_ref();

            if let Some(card) = self.document.get_element_by_id(ENEMY_ID) {
                let classes = card.class_list();
                let _ = classes.toggle_with_force("hidden", phase.is_terminal());
                let _ = classes.toggle_with_force("loading", phase == Phase::Loading);
                let _ = classes.toggle_with_force("battle", battle.is_some());
            }

            match battle {
                Some(b) => {
                    self.set_style(
                        ENEMY_ID,
                        &format!(
                            "position:absolute;left:0;top:0;pointer-events:none;\
                             transform:translate3d({}px,{}px,0) rotate({}deg);\
                             transition:transform 80ms ease-out",
                            b.enemy.x,
                            b.enemy.y,
                            b.enemy.wobble_degrees()
                        ),
                    );
                    self.set_style(
                        "paddle",
                        &format!(
                            "left:{}px;top:{}px;width:{}px;height:{}px",
                            b.paddle.x,
                            b.arena.height - PADDLE_OFFSET,
                            b.paddle.width,
                            PADDLE_HEIGHT
                        ),
                    );
                    self.set_style(
                        "ball",
                        &format!(
                            "left:{}px;top:{}px;width:{}px;height:{}px",
                            b.ball.pos.x - BALL_SIZE / 2.0,
                            b.ball.pos.y - BALL_SIZE / 2.0,
                            BALL_SIZE,
                            BALL_SIZE
                        ),
                    );
                    self.set_style("hud-progress", &format!("width:{}%", snap.verify_percent));
                    if snap.show_combo {
                        self.set_text("hud-combo", &format!("{:.1}", b.combo));
                    }
                }
                None => self.set_style(ENEMY_ID, ""),
            }
            self.set_hidden("paddle", battle.is_none());
            self.set_hidden("ball", battle.is_none());
            self.set_hidden("hud", battle.is_none());
            self.set_hidden("hud-combo", battle.is_none() || !snap.show_combo);

            match snap.transform {
                Some(t) => {
                    self.set_style(
                        "morph-paddle",
                        &format!(
                            "left:{}px;top:{}px;width:{}px;height:{}px",
                            t.paddle.x, t.paddle.y, t.paddle.width, t.paddle.height
                        ),
                    );
                    self.set_style(
                        "morph-ball",
                        &format!(
                            "left:{}px;top:{}px;width:{}px;height:{}px;opacity:{}",
                            t.ball.x - BALL_SIZE / 2.0,
                            t.ball.y - BALL_SIZE / 2.0,
                            BALL_SIZE,
                            BALL_SIZE,
                            t.ball_opacity
                        ),
                    );
                    self.set_hidden("morph-paddle", false);
                    self.set_hidden("morph-ball", false);
                }
                None => {
                    self.set_hidden("morph-paddle", true);
                    self.set_hidden("morph-ball", true);
                }
            }

            self.set_hidden("victory-card", phase != Phase::Victory);
            self.set_hidden("defeat-card", phase != Phase::Defeat);
        }
    }

    /// Milliseconds on the same clock as requestAnimationFrame timestamps
    fn perf_now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brick Login starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let raw_settings = document
            .get_element_by_id(ARENA_ID)
            .and_then(|el| el.get_attribute(SETTINGS_ATTRIBUTE));
        let settings = Settings::from_attribute(raw_settings.as_deref());

        let seed = js_sys::Date::now() as u64;
        let shell = Rc::new(RefCell::new(Shell {
            session: Session::new(settings, seed),
            layout: DomLayout::new(document.clone()),
            document: document.clone(),
        }));

        setup_login_button(&document, shell.clone());
        setup_arena_input(&document, shell.clone());
        setup_keyboard(shell.clone());
        setup_reset_buttons(&document, shell.clone());

        shell.borrow().render();
        request_animation_frame(shell);

        log::info!("Brick Login running!");
    }

    fn setup_login_button(document: &Document, shell: Rc<RefCell<Shell>>) {
        let Some(btn) = document.get_element_by_id(LOGIN_BUTTON_ID) else {
            log::warn!("No #{} element, sign-in cannot start", LOGIN_BUTTON_ID);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.prevent_default();
            let mut s = shell.borrow_mut();
            if s.session.submit_login(perf_now()) {
                s.render();
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_arena_input(document: &Document, shell: Rc<RefCell<Shell>>) {
        let Some(arena) = document.get_element_by_id(ARENA_ID) else {
            log::warn!("No #{} element, paddle input disabled", ARENA_ID);
            return;
        };

        // Mouse move - absolute position
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = shell.borrow_mut();
                let Shell { session, layout, .. } = &mut *s;
                session.pointer_move(event.client_x() as f32, layout);
            });
            let _ = arena
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let client_x = event.touches().get(0).map(|t| t.client_x()).unwrap_or(0);
                let mut s = shell.borrow_mut();
                let Shell { session, layout, .. } = &mut *s;
                if session.touch_move(client_x as f32, layout) {
                    event.prevent_default();
                }
            });
            let _ = arena
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if shell.borrow_mut().session.key_down(&event.key()) {
                event.prevent_default();
            }
        });
        let _ = window
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_reset_buttons(document: &Document, shell: Rc<RefCell<Shell>>) {
        for id in ["reset-btn-victory", "reset-btn-defeat"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut s = shell.borrow_mut();
                if s.session.reset() {
                    s.render();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Schedule the next frame under the session's current epoch
    fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let token = shell.borrow().session.epoch();
        let closure = Closure::once(move |time: f64| {
            frame(shell, token, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(shell: Rc<RefCell<Shell>>, token: brick_login::sim::Epoch, time: f64) {
        {
            let mut s = shell.borrow_mut();
            let Shell { session, layout, .. } = &mut *s;
            if session.frame(token, time, layout) {
                s.render();
            }
        }

        request_animation_frame(shell);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_shell::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Login (native) starting...");
    log::info!("Native mode plays a headless battle - serve the wasm build for the real page");

    run_headless_battle();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Sign in, sit through the morph, then let an autopilot chase the ball
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_battle() {
    use brick_login::Settings;
    use brick_login::platform::{LayoutProbe, StaticLayout};
    use brick_login::sim::Session;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 180;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let layout = StaticLayout::centered(800.0, 600.0);
    let arena_left = layout.arena_rect().map(|r| r.left()).unwrap_or(0.0);
    let mut session = Session::new(Settings::default(), seed);

    let mut now = 0.0;
    session.submit_login(now);

    for frame in 0..MAX_FRAMES {
        if let Some(battle) = session.battle() {
            // Swing the contact point across the paddle to vary the angle
            let swing = (frame as f32 * 0.013).sin() * battle.paddle.width * 0.3;
            let target = arena_left + battle.ball.pos.x + swing;
            session.pointer_move(target, &layout);
        }

        session.frame(session.epoch(), now, &layout);
        now += FRAME_MS;

        if session.phase().is_terminal() {
            log::info!(
                "Battle over after {} frames: {:?}",
                frame + 1,
                session.phase()
            );
            break;
        }
    }

    match serde_json::to_string(&session.snapshot()) {
        Ok(json) => log::info!("Final snapshot: {}", json),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }
}
