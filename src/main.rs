//! Lane Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlInputElement, MouseEvent};

    use lane_dash::consts::*;
    use lane_dash::highscores::LocalProfile;
    use lane_dash::lane_x;
    use lane_dash::net::{self, LEADERBOARD_LIMIT, LeaderboardRow, PendingHandle, SubmitStatus};
    use lane_dash::sim::{GamePhase, GameState, TickInput, tick};

    /// Depth slices in the text track view
    const TRACK_ROWS: usize = 14;
    /// Track view covers z in [SPAWN_Z, TRACK_END_Z]
    const TRACK_END_Z: f32 = 2.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        last_time: f64,
        profile: LocalProfile,
        pending: PendingHandle,
        submit_status: SubmitStatus,
        leaderboard: Option<Vec<LeaderboardRow>>,
        leaderboard_error: Option<String>,
        /// Smoothed lateral position for display; the lane index is authoritative
        display_x: f32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                input: TickInput::default(),
                last_time: 0.0,
                profile: LocalProfile::load(),
                pending: net::new_pending(),
                submit_status: SubmitStatus::Idle,
                leaderboard: None,
                leaderboard_error: None,
                display_x: 0.0,
            }
        }

        /// Run one simulation step and the per-frame bookkeeping
        fn update(&mut self, dt: f32) {
            let input = self.input.clone();
            tick(&mut self.state, &input, dt);
            // Clear one-shot inputs after processing
            self.input = TickInput::default();

            // Ease the displayed avatar toward its lane
            let target = lane_x(self.state.player.lane);
            let step = LANE_CHANGE_SPEED * dt;
            let delta = target - self.display_x;
            self.display_x += delta.clamp(-step, step);

            self.drain_pending();
            self.handle_game_over();
        }

        /// Start or restart depending on phase (space/enter, overlay buttons)
        fn advance_phase(&mut self) {
            match self.state.phase {
                GamePhase::Menu => self.input.start = true,
                GamePhase::GameOver => {
                    self.input.restart = true;
                    self.submit_status = SubmitStatus::Idle;
                }
                GamePhase::Running => {}
            }
        }

        /// Drop the current run and start a fresh one
        fn restart(&mut self, seed: u64) {
            let difficulty = self.state.difficulty;
            self.state = GameState::new_with_difficulty(seed, difficulty);
            self.state.phase = GamePhase::Running;
            self.submit_status = SubmitStatus::Idle;
            self.display_x = 0.0;
        }

        /// Back to the start screen with a fresh session and leaderboard
        fn to_menu(&mut self, seed: u64) {
            self.state = GameState::new(seed);
            self.submit_status = SubmitStatus::Idle;
            self.display_x = 0.0;
            self.request_leaderboard();
        }

        fn request_leaderboard(&mut self) {
            self.leaderboard = None;
            self.leaderboard_error = None;
            net::fetch_leaderboard(&self.pending, LEADERBOARD_LIMIT);
        }

        /// Move finished HTTP results out of the shared queue
        fn drain_pending(&mut self) {
            let (submit, leaderboard) = match self.pending.lock() {
                Ok(mut p) => (p.submit.take(), p.leaderboard.take()),
                Err(_) => (None, None),
            };

            if let Some(result) = submit {
                // A result arriving after a restart is stale; drop it
                if self.submit_status == SubmitStatus::Submitting {
                    self.submit_status = match result {
                        Ok(response) => {
                            log::info!(
                                "score accepted: {}",
                                response.action.as_deref().unwrap_or("ok")
                            );
                            SubmitStatus::Done
                        }
                        Err(e) => SubmitStatus::Failed(e),
                    };
                }
            }

            if let Some(result) = leaderboard {
                match result {
                    Ok(rows) => {
                        self.leaderboard = Some(rows);
                        self.leaderboard_error = None;
                    }
                    Err(e) => self.leaderboard_error = Some(e),
                }
            }
        }

        /// One-time side effects of the running -> game over transition
        fn handle_game_over(&mut self) {
            if let Some(final_score) = self.state.take_final_score() {
                log::info!("run over: final score {}", final_score);
                if self.profile.record_score(final_score) {
                    self.profile.save();
                }
                if self.profile.has_valid_name() {
                    self.submit_status = SubmitStatus::Submitting;
                    net::submit_score(&self.pending, &self.profile.display_name, final_score);
                } else {
                    log::info!("no display name set, skipping leaderboard submission");
                }
            }
        }

        /// Plain-text view of the track: far rows on top, player at the bottom
        fn render_track(&self) -> String {
            let mut grid = [[false; LANE_COUNT]; TRACK_ROWS];
            for o in &self.state.obstacles {
                if o.z > TRACK_END_Z {
                    continue;
                }
                let t = (o.z - SPAWN_Z) / (TRACK_END_Z - SPAWN_Z);
                let row = ((t * (TRACK_ROWS as f32 - 1.0)).round() as usize).min(TRACK_ROWS - 1);
                grid[row][o.lane as usize] = true;
            }

            let mut lines: Vec<String> = grid
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|occupied| if *occupied { "[#]" } else { " . " })
                        .collect()
                })
                .collect();

            let center = (LANE_COUNT as f32 - 1.0) / 2.0;
        let player_lane = (self.display_x / LANE_WIDTH + center).round() as i32;
            let player_line: String = (0..LANE_COUNT as i32)
                .map(|lane| if lane == player_lane { "[@]" } else { "___" })
                .collect();
            lines.push(player_line);
            lines.join("\n")
        }

        fn render_leaderboard(&self) -> String {
            if let Some(error) = &self.leaderboard_error {
                return format!("Could not load scores: {error}");
            }
            match &self.leaderboard {
                None => "Loading...".to_string(),
                Some(rows) if rows.is_empty() => "No scores yet.".to_string(),
                Some(rows) => rows
                    .iter()
                    .enumerate()
                    .map(|(i, row)| format!("{:>2}. {:<16} {:>8}", i + 1, row.name, row.score))
                    .collect::<Vec<_>>()
                    .join("\n"),
            }
        }

        fn submit_status_line(&self) -> String {
            match &self.submit_status {
                SubmitStatus::Idle => {
                    if self.profile.has_valid_name() {
                        String::new()
                    } else {
                        "Set a name on the start screen to join the leaderboard".to_string()
                    }
                }
                SubmitStatus::Submitting => "Submitting score...".to_string(),
                SubmitStatus::Done => "Score saved to the global leaderboard".to_string(),
                SubmitStatus::Failed(e) => format!("Submission failed: {e}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Update score
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&(self.state.score as u64).to_string()));
            }

            // Update speed
            if let Some(el) = document.query_selector("#hud-speed .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.1}", self.state.speed)));
            }

            // Update best
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.profile.best_score.to_string()));
            }

            // Redraw the track
            if let Some(el) = document.get_element_by_id("track") {
                el.set_text_content(Some(&self.render_track()));
            }

            // Show/hide start screen
            if let Some(el) = document.get_element_by_id("start-screen") {
                if self.state.phase == GamePhase::Menu {
                    let _ = el.set_attribute("class", "");
                    if let Some(list) = document.get_element_by_id("leaderboard-list") {
                        list.set_text_content(Some(&self.render_leaderboard()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&(self.state.score as u64).to_string()));
                    }
                    if let Some(status_el) = document.get_element_by_id("submit-status") {
                        status_el.set_text_content(Some(&self.submit_status_line()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lane Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // First leaderboard load for the start screen
        game.borrow_mut().request_leaderboard();

        setup_input_handlers(game.clone());
        setup_overlay_buttons(game.clone());
        setup_name_input(game.clone());

        request_animation_frame(game);

        log::info!("Lane Dash running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Leave typing in the name field alone
                if let Some(target) = event.target() {
                    if target.dyn_ref::<HtmlInputElement>().is_some() {
                        return;
                    }
                }
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.move_left = true,
                    "ArrowRight" | "d" | "D" => g.input.move_right = true,
                    " " | "Enter" => g.advance_phase(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // On-screen lane buttons
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(btn) = document.get_element_by_id("btn-left") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.move_left = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        if let Some(btn) = document.get_element_by_id("btn-right") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.move_right = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_overlay_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start button on the menu
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().advance_phase();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Leaderboard refresh on the menu
        if let Some(btn) = document.get_element_by_id("refresh-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().request_leaderboard();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play again from the game over screen
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back to the start screen
        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().to_menu(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_name_input(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(el) = document.get_element_by_id("player-name") {
            if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
                input.set_value(&game.borrow().profile.display_name);
            }
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                if let Some(target) = event.target() {
                    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
                        let mut g = game.borrow_mut();
                        g.profile.set_display_name(&input.value());
                        g.profile.save();
                    }
                }
            });
            let _ = el.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Variable per-frame dt; a long frame just moves the world further
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            g.last_time = time;

            g.update(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_dash::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Lane Dash (native) starting...");

    // Headless smoke run: hold the center lane until the first hit.
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut state = GameState::new(seed);
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, 0.0);

    let dt = 1.0 / 60.0;
    let mut ticks = 0u32;
    while state.phase == GamePhase::Running && ticks < 60 * 120 {
        tick(&mut state, &TickInput::default(), dt);
        ticks += 1;
    }

    println!(
        "seed {}: survived {:.1}s, score {}, {} rows spawned",
        seed, state.elapsed, state.score as u64, state.rows_spawned
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
