//! Sign-in session: the phase state machine
//!
//! Form -> Loading -> Transforming -> Battle -> Victory | Defeat -> Form
//!
//! A `Session` owns every piece of mutable state (timer, morph animator,
//! battle). Each phase change bumps an [`Epoch`] and clears the previous
//! phase's timer and animator. Frame callbacks carry the epoch they were
//! scheduled under and are dropped if it no longer matches, so nothing
//! scheduled for an old phase can touch the new one.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::input::{Direction, nudge_paddle_x, pointer_paddle_x};
use super::state::{Arena, BattleState, Phase};
use super::tick::{TickOutcome, tick};
use super::transform::{TransformAnimator, TransformFrame, TransformMeta};
use crate::consts::{LOADING_DELAY_MS, TRANSFORM_DURATION_MS};
use crate::platform::LayoutProbe;
use crate::settings::Settings;

/// Phase generation counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Epoch(self.0.wrapping_add(1))
    }
}

/// Pending Loading -> Transforming switch
#[derive(Debug, Clone, Copy)]
struct LoadingTimer {
    due_ms: f64,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub epoch: Epoch,
    pub battle: Option<BattleState>,
    pub transform: Option<TransformFrame>,
    /// "Verifying your account" bar, grows as the enemy loses hp
    pub verify_percent: f32,
    pub show_combo: bool,
}

/// One sign-in attempt, from the form to the result card
pub struct Session {
    settings: Settings,
    phase: Phase,
    epoch: Epoch,
    loading: Option<LoadingTimer>,
    animator: Option<TransformAnimator>,
    battle: Option<BattleState>,
    rng: Pcg32,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        log::info!("Session created (seed {})", seed);
        Self {
            settings,
            phase: Phase::Form,
            epoch: Epoch::default(),
            loading: None,
            animator: None,
            battle: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Token to hand to the next scheduled frame
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn battle(&self) -> Option<&BattleState> {
        self.battle.as_ref()
    }

    pub fn animator(&self) -> Option<&TransformAnimator> {
        self.animator.as_ref()
    }

    /// Form submit. Ignored outside the Form phase.
    pub fn submit_login(&mut self, now_ms: f64) -> bool {
        if self.phase != Phase::Form {
            return false;
        }
        self.transition(Phase::Loading);
        self.loading = Some(LoadingTimer {
            due_ms: now_ms + LOADING_DELAY_MS,
        });
        true
    }

    /// Close the result card. Only valid from Victory or Defeat.
    pub fn reset(&mut self) -> bool {
        if !self.phase.is_terminal() {
            return false;
        }
        self.transition(Phase::Form);
        true
    }

    /// Run one animation frame scheduled under `token`.
    ///
    /// Does at most one unit of work: the loading timer check, one morph
    /// step, battle setup, or one battle tick. Returns false for a stale
    /// token.
    pub fn frame(&mut self, token: Epoch, now_ms: f64, layout: &impl LayoutProbe) -> bool {
        if token != self.epoch {
            log::debug!(
                "Dropping stale frame (epoch {} != {})",
                token.value(),
                self.epoch.value()
            );
            return false;
        }

        match self.phase {
            Phase::Form | Phase::Victory | Phase::Defeat => {}
            Phase::Loading => self.poll_loading(now_ms, layout),
            Phase::Transforming => self.step_transform(now_ms),
            Phase::Battle => self.step_battle(layout),
        }
        true
    }

    /// Absolute pointer (mouse) position in page coordinates
    pub fn pointer_move(&mut self, client_x: f32, layout: &impl LayoutProbe) -> bool {
        if self.phase != Phase::Battle {
            return false;
        }
        let (Some(battle), Some(arena)) = (self.battle.as_mut(), layout.arena_rect()) else {
            return false;
        };
        battle.paddle.x =
            pointer_paddle_x(client_x, arena.left(), arena.width, battle.paddle.width);
        true
    }

    /// Touch drag; same mapping as the mouse
    pub fn touch_move(&mut self, client_x: f32, layout: &impl LayoutProbe) -> bool {
        self.pointer_move(client_x, layout)
    }

    /// Key press. Returns true when the key was consumed and the browser
    /// default should be suppressed.
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.phase != Phase::Battle {
            return false;
        }
        let Some(direction) = Direction::from_key(key) else {
            return false;
        };
        let Some(battle) = self.battle.as_mut() else {
            return false;
        };
        battle.paddle.x = nudge_paddle_x(
            battle.paddle.x,
            direction,
            battle.arena.width,
            battle.paddle.width,
        );
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        let verify_percent = match (&self.battle, self.phase) {
            (Some(battle), _) => 100.0 - battle.enemy.hp_percent(),
            (None, Phase::Victory) => 100.0,
            _ => 0.0,
        };
        Snapshot {
            phase: self.phase,
            epoch: self.epoch,
            battle: self.battle,
            transform: self.animator.as_ref().map(TransformAnimator::frame),
            verify_percent,
            show_combo: self.settings.show_combo,
        }
    }

    fn transition(&mut self, next: Phase) {
        log::info!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        self.epoch = self.epoch.next();
        // Everything below belongs to the phase being left
        self.loading = None;
        self.animator = None;
        self.battle = None;
    }

    fn poll_loading(&mut self, now_ms: f64, layout: &impl LayoutProbe) {
        let Some(timer) = self.loading else {
            return;
        };
        if now_ms < timer.due_ms {
            return;
        }

        self.transition(Phase::Transforming);

        match (layout.arena_rect(), layout.login_button_rect()) {
            (Some(arena), Some(button)) => {
                let meta = TransformMeta::capture(arena, button);
                self.animator = Some(TransformAnimator::new(meta, now_ms, TRANSFORM_DURATION_MS));
            }
            _ => {
                log::warn!("Login button not measurable, skipping morph");
                self.transition(Phase::Battle);
            }
        }
    }

    fn step_transform(&mut self, now_ms: f64) {
        let Some(animator) = self.animator.as_mut() else {
            self.transition(Phase::Battle);
            return;
        };
        if animator.step(now_ms) {
            self.transition(Phase::Battle);
        }
    }

    fn step_battle(&mut self, layout: &impl LayoutProbe) {
        let Some(battle) = self.battle.as_mut() else {
            self.init_battle(layout);
            return;
        };

        let arena = layout.arena_rect().map(Arena::from).unwrap_or(battle.arena);
        let hp_before = battle.enemy.hp;

        match tick(battle, arena) {
            TickOutcome::Running => {
                if battle.enemy.hp < hp_before {
                    log::debug!("Enemy hit, hp {}/{}", battle.enemy.hp, battle.enemy.max_hp);
                }
            }
            TickOutcome::Victory => self.transition(Phase::Victory),
            TickOutcome::Defeat => self.transition(Phase::Defeat),
        }
    }

    fn init_battle(&mut self, layout: &impl LayoutProbe) {
        match (layout.arena_rect(), layout.enemy_rect()) {
            (Some(arena), Some(enemy)) => {
                let state = BattleState::spawn(
                    Arena::from(arena),
                    Vec2::new(enemy.width, enemy.height),
                    &mut self.rng,
                );
                log::info!(
                    "Battle ready: arena {}x{}, enemy hp {}",
                    arena.width,
                    arena.height,
                    state.enemy.hp
                );
                self.battle = Some(state);
            }
            _ => log::debug!("Battle layout not mounted yet, retrying next frame"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Rect, StaticLayout};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn layout() -> StaticLayout {
        StaticLayout::centered(800.0, 600.0)
    }

    fn session() -> Session {
        Session::new(Settings::default(), 1234)
    }

    /// Drive a fresh session through the morph into Battle with the arena measured
    fn session_in_battle() -> Session {
        let layout = layout();
        let mut s = Session::new(Settings::default(), 77);
        s.submit_login(0.0);
        s.frame(s.epoch(), 900.0, &layout);
        s.frame(s.epoch(), 2000.0, &layout);
        assert_eq!(s.phase(), Phase::Battle);
        s.frame(s.epoch(), 2016.0, &layout);
        assert!(s.battle().is_some());
        s
    }

    #[test]
    fn test_starts_in_form() {
        let s = session();
        assert_eq!(s.phase(), Phase::Form);
        assert!(s.battle().is_none());
        assert!(s.animator().is_none());
    }

    #[test]
    fn test_submit_only_from_form() {
        let mut s = session();
        assert!(s.submit_login(0.0));
        assert_eq!(s.phase(), Phase::Loading);
        let epoch = s.epoch();
        assert!(!s.submit_login(10.0));
        assert_eq!(s.epoch(), epoch);
    }

    #[test]
    fn test_loading_waits_for_delay() {
        let layout = layout();
        let mut s = session();
        s.submit_login(100.0);
        s.frame(s.epoch(), 999.0, &layout);
        assert_eq!(s.phase(), Phase::Loading);
        s.frame(s.epoch(), 1000.0, &layout);
        assert_eq!(s.phase(), Phase::Transforming);
        assert!(s.animator().is_some());
    }

    #[test]
    fn test_transform_ends_on_exact_duration() {
        let layout = layout();
        let mut s = session();
        s.submit_login(0.0);
        s.frame(s.epoch(), 900.0, &layout);
        assert_eq!(s.phase(), Phase::Transforming);

        s.frame(s.epoch(), 900.0 + 550.0, &layout);
        let frame = s.snapshot().transform.unwrap();
        assert_eq!(frame.linear, 0.5);

        s.frame(s.epoch(), 900.0 + 1099.0, &layout);
        assert_eq!(s.phase(), Phase::Transforming);

        s.frame(s.epoch(), 900.0 + 1100.0, &layout);
        assert_eq!(s.phase(), Phase::Battle);
        assert!(s.animator().is_none());
    }

    #[test]
    fn test_missing_button_skips_morph() {
        let mut layout = layout();
        layout.login_button = None;
        let mut s = session();
        s.submit_login(0.0);
        s.frame(s.epoch(), 900.0, &layout);
        assert_eq!(s.phase(), Phase::Battle);
        assert!(s.animator().is_none());
    }

    #[test]
    fn test_battle_init_retries_until_measured() {
        let mut layout = layout();
        layout.enemy = None;
        let mut s = session();
        s.submit_login(0.0);
        s.frame(s.epoch(), 900.0, &layout);
        s.frame(s.epoch(), 2000.0, &layout);
        assert_eq!(s.phase(), Phase::Battle);

        for i in 0..3 {
            assert!(s.frame(s.epoch(), 2000.0 + i as f64 * FRAME_MS, &layout));
            assert!(s.battle().is_none());
        }

        layout.enemy = Some(Rect::new(240.0, 180.0, 320.0, 240.0));
        s.frame(s.epoch(), 2100.0, &layout);
        let battle = s.battle().unwrap();
        assert_eq!(battle.enemy.width, 320.0);
        assert_eq!(battle.paddle.width, 160.0);
    }

    #[test]
    fn test_stale_token_is_dropped() {
        let layout = layout();
        let mut s = session();
        let form_epoch = s.epoch();
        s.submit_login(0.0);
        // A frame scheduled while still in Form must not fire the timer
        assert!(!s.frame(form_epoch, 5000.0, &layout));
        assert_eq!(s.phase(), Phase::Loading);
    }

    #[test]
    fn test_loading_timer_does_not_outlive_its_attempt() {
        let layout = layout();
        let mut s = session_in_battle();
        {
            let battle = s.battle.as_mut().unwrap();
            battle.paddle.x = 0.0;
            battle.ball.pos = Vec2::new(700.0, 588.0);
            battle.ball.vel = Vec2::new(0.0, 5.4);
        }
        s.frame(s.epoch(), 3000.0, &layout);
        assert!(s.reset());

        // Second attempt: the delay counts from the new submit only
        assert!(s.submit_login(10_000.0));
        s.frame(s.epoch(), 10_000.0 + LOADING_DELAY_MS - 1.0, &layout);
        assert_eq!(s.phase(), Phase::Loading);
        s.frame(s.epoch(), 10_000.0 + LOADING_DELAY_MS, &layout);
        assert_eq!(s.phase(), Phase::Transforming);
    }

    #[test]
    fn test_settings_do_not_change_timing() {
        let layout = layout();
        let mut s = Session::new(Settings { show_combo: false }, 5);
        s.submit_login(0.0);
        s.frame(s.epoch(), LOADING_DELAY_MS, &layout);
        assert_eq!(s.phase(), Phase::Transforming);
        s.frame(s.epoch(), LOADING_DELAY_MS + TRANSFORM_DURATION_MS, &layout);
        assert_eq!(s.phase(), Phase::Battle);
        assert!(!s.snapshot().show_combo);
    }

    #[test]
    fn test_input_ignored_outside_battle() {
        let layout = layout();
        let mut s = session();
        assert!(!s.pointer_move(300.0, &layout));
        assert!(!s.touch_move(300.0, &layout));
        assert!(!s.key_down("ArrowLeft"));
    }

    #[test]
    fn test_pointer_and_keys_move_paddle() {
        let layout = layout();
        let mut s = session_in_battle();

        assert!(s.pointer_move(5000.0, &layout));
        assert_eq!(s.battle().unwrap().paddle.x, 640.0);

        assert!(s.key_down("ArrowLeft"));
        assert!((s.battle().unwrap().paddle.x - (640.0 - 160.0 * 0.22)).abs() < 1e-4);

        assert!(!s.key_down("q"));

        assert!(s.touch_move(-100.0, &layout));
        assert_eq!(s.battle().unwrap().paddle.x, 0.0);
    }

    #[test]
    fn test_enemy_defeat_is_victory() {
        let layout = layout();
        let mut s = session_in_battle();
        {
            let battle = s.battle.as_mut().unwrap();
            battle.enemy.hp = 1;
            battle.hit_cooldown = 0;
            battle.ball.pos = Vec2::new(
                battle.enemy.x + battle.enemy.vel.x + battle.enemy.width / 2.0,
                battle.enemy.y + battle.enemy.vel.y + battle.enemy.height + 5.0,
            );
            battle.ball.vel = Vec2::new(0.0, -5.4);
        }
        let epoch = s.epoch();
        s.frame(epoch, 2000.0, &layout);
        assert_eq!(s.phase(), Phase::Victory);
        assert!(s.battle().is_none());
        assert_eq!(s.snapshot().verify_percent, 100.0);

        // The old battle frame token is now dead
        assert!(!s.frame(epoch, 2016.0, &layout));
    }

    #[test]
    fn test_ball_out_is_defeat() {
        let layout = layout();
        let mut s = session_in_battle();
        {
            let battle = s.battle.as_mut().unwrap();
            battle.paddle.x = 0.0;
            battle.ball.pos = Vec2::new(700.0, 588.0);
            battle.ball.vel = Vec2::new(0.0, 5.4);
        }
        s.frame(s.epoch(), 2000.0, &layout);
        assert_eq!(s.phase(), Phase::Defeat);
        assert!(s.battle().is_none());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let layout = layout();
        let mut s = session_in_battle();
        assert!(!s.reset());
        assert_eq!(s.phase(), Phase::Battle);

        {
            let battle = s.battle.as_mut().unwrap();
            battle.combo = 5.0;
            battle.paddle.x = 0.0;
            battle.ball.pos = Vec2::new(700.0, 588.0);
            battle.ball.vel = Vec2::new(0.0, 5.4);
        }
        s.frame(s.epoch(), 2000.0, &layout);
        assert_eq!(s.phase(), Phase::Defeat);

        assert!(s.reset());
        assert_eq!(s.phase(), Phase::Form);
        assert!(s.battle().is_none());
        assert!(!s.reset());
        assert_eq!(s.phase(), Phase::Form);

        // A second attempt starts clean
        assert!(s.submit_login(3000.0));
    }

    #[test]
    fn test_autopilot_session_stays_consistent() {
        let layout = layout();
        let mut s = session_in_battle();
        let arena = layout.arena.unwrap();
        let mut now = 1000.0;
        let mut last_hp = s.battle().unwrap().enemy.hp;

        for _ in 0..5_000 {
            if let Some(battle) = s.battle() {
                let target = arena.left() + battle.ball.pos.x;
                s.pointer_move(target, &layout);
            }
            s.frame(s.epoch(), now, &layout);
            now += FRAME_MS;

            match s.battle() {
                Some(battle) => {
                    assert!(battle.paddle.x >= 0.0);
                    assert!(battle.paddle.x <= battle.arena.width - battle.paddle.width);
                    assert!(battle.enemy.hp <= last_hp);
                    last_hp = battle.enemy.hp;
                }
                None => break,
            }
        }
        assert_ne!(s.phase(), Phase::Defeat);
    }

    #[test]
    fn test_snapshot_serializes() {
        let s = session_in_battle();
        let json = serde_json::to_string(&s.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Battle\""));
        assert!(json.contains("\"hit_cooldown\":0"));
    }
}
