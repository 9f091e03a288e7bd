//! The game loop: pacing, spawning and the terminal-state check.
//!
//! Simulation runs on a fixed step of `FRAME_INTERVAL`. Each rendered frame
//! adds the wall-clock time since the previous one to an accumulator and runs
//! as many whole steps as it holds (capped at `MAX_STEPS_PER_FRAME`), so
//! motion expressed in pixels per step keeps the same speed under load. Any
//! time left in the frame budget is spent waiting on the input channel.

use std::io;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use rand::Rng;

use crate::assets::{AssetStore, Sound, Sprite, SpriteSet};
use crate::audio::{AudioSink, BackgroundMusic};
use crate::consts::*;
use crate::display::{Renderer, TextStyle, CELL_W};
use crate::entities::{Actor, Rect};
use crate::input::{Controls, HoldTracker, KeyInput};
use crate::world::{GameStatus, World};

/// What the display surface reports to the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    Key(KeyInput),
    /// The window went away; the loop exits at the top of the next frame.
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    GameOver,
    Won,
    Closed,
}

/// Time left in a frame's budget after `used`, if any.
pub fn remaining_budget(used: Duration) -> Option<Duration> {
    FRAME_INTERVAL.checked_sub(used).filter(|d| !d.is_zero())
}

pub struct GameLoop<R: Rng> {
    world: World,
    sprites: SpriteSet,
    background: Option<Rc<Sprite>>,
    music: Option<Sound>,
    /// Top row of the background tile currently shown, in pixels.
    background_y: i32,
    rng: R,
    controls: Controls,
    holds: Option<HoldTracker>,
    surface_open: bool,
    input_lost: bool,
    accumulator: Duration,
    /// Wall-clock length of the previous frame.
    frame_time: Option<Duration>,
    frames: u64,
}

impl<R: Rng> GameLoop<R> {
    /// Resolve every asset the run needs up front; missing ones stay `None`.
    pub fn new(world: World, assets: &mut AssetStore, rng: R) -> Self {
        let background = assets.sprite(BACKGROUND_SPRITE);
        let background_y = background.as_ref().map_or(0, |bg| bg.bounds().h);
        Self {
            world,
            sprites: SpriteSet::load(assets),
            background,
            music: assets.sound(MUSIC_SOUND),
            background_y,
            rng,
            controls: Controls::default(),
            holds: None,
            surface_open: true,
            input_lost: false,
            accumulator: Duration::ZERO,
            frame_time: None,
            frames: 0,
        }
    }

    /// Treat a key as released after `window` frames without a press.
    pub fn with_hold_window(mut self, window: u64) -> Self {
        self.holds = Some(HoldTracker::new(window));
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn background_offset(&self) -> i32 {
        self.background_y
    }

    pub fn is_surface_open(&self) -> bool {
        self.surface_open
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Key(input) => {
                if let Some(holds) = self.holds.as_mut() {
                    holds.observe(input, self.frames);
                }
                self.controls.dispatch(input, &mut self.world);
            }
            SurfaceEvent::Closed => {
                info!("display surface closed");
                self.surface_open = false;
            }
        }
    }

    /// Move the background one pixel, wrapping back to the tile height.
    pub fn scroll_background(&mut self) {
        let Some(bg) = &self.background else {
            return;
        };
        self.background_y -= 1;
        if self.background_y < 0 {
            self.background_y = bg.bounds().h;
        }
    }

    /// Random spawns for one step: at most one ufo alive, plus invader fire.
    pub fn roll_spawns(&mut self) {
        if !self.world.has_ufo() && self.rng.gen_ratio(1, UFO_SPAWN_ODDS) {
            debug!("ufo spawned at frame {}", self.world.frame());
            self.world.spawn(Actor::ufo(UFO_ENTRY_X, UFO_ENTRY_Y));
        }

        let rng = &mut self.rng;
        let volley: Vec<Actor> = self
            .world
            .actors()
            .iter()
            .filter(|a| a.kind.is_invader())
            .filter(|_| rng.gen_ratio(1, ENEMY_FIRE_ODDS))
            .map(Actor::enemy_shot)
            .collect();
        for shot in volley {
            self.world.spawn(shot);
        }
    }

    /// One fixed simulation step.
    pub fn step(&mut self) {
        if self.world.status().is_terminal() {
            return;
        }
        self.roll_spawns();
        self.world.update();
    }

    /// Bank `elapsed` and return how many whole steps are now due.
    pub fn steps_due(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= FRAME_INTERVAL && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FRAME_INTERVAL;
            steps += 1;
        }
        if self.accumulator >= FRAME_INTERVAL {
            trace!("dropping {:?} of simulation backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        steps
    }

    pub fn fps_label(&self) -> String {
        match self.frame_time.map(|d| d.as_millis()) {
            Some(ms) if ms > 0 => format!("{} fps", 1000 / ms),
            _ => "--- fps".to_string(),
        }
    }

    pub fn render_frame<S: Renderer + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        surface.clear();
        if let Some(bg) = &self.background {
            surface.draw_image(
                bg,
                Rect::new(0, 0, WIDTH, HEIGHT),
                Rect::new(0, self.background_y, WIDTH, HEIGHT),
            );
        }
        self.world.render(surface, &self.sprites);
        self.draw_score(surface);
        surface.draw_text(&self.fps_label(), 0, HEIGHT - PLAYER_Y_OFFSET, TextStyle::Fps);
        surface.present()
    }

    /// The end screen for a finished run. Does nothing while still running.
    pub fn render_terminal_screen<S: Renderer + ?Sized>(&self, surface: &mut S) -> io::Result<()> {
        let banner = match self.world.status() {
            GameStatus::Running => return Ok(()),
            GameStatus::GameOver => "GAME OVER",
            GameStatus::Won => "GAME WON",
        };
        let hint = "ENTER: try again";

        surface.clear();
        self.draw_score(surface);
        surface.draw_text(banner, centred_x(banner), HEIGHT / 2, TextStyle::Banner);
        surface.draw_text(hint, centred_x(hint), HEIGHT / 2 + 50, TextStyle::Hint);
        surface.present()
    }

    fn draw_score<S: Renderer + ?Sized>(&self, surface: &mut S) {
        surface.draw_text("Score:", 16, 0, TextStyle::Label);
        surface.draw_text(&self.world.player().score().to_string(), 96, 0, TextStyle::Score);
    }

    /// Drive the game until it ends or the surface closes.
    ///
    /// Background music plays for the duration of the call and is stopped on
    /// every exit path.
    pub fn run<S, A>(
        &mut self,
        surface: &mut S,
        events: &Receiver<SurfaceEvent>,
        sink: A,
    ) -> io::Result<LoopExit>
    where
        S: Renderer + ?Sized,
        A: AudioSink,
    {
        info!("game loop started");
        let music = self.music.clone().map(|clip| BackgroundMusic::start(clip, sink));
        let mut last_frame = Instant::now();

        let exit = loop {
            let frame_start = Instant::now();
            let elapsed = frame_start - last_frame;
            if self.frames > 0 {
                self.frame_time = Some(elapsed);
            }
            last_frame = frame_start;
            self.frames += 1;

            self.drain_events(events);
            if !self.surface_open {
                break LoopExit::Closed;
            }

            self.scroll_background();
            match self.world.status() {
                GameStatus::GameOver => {
                    self.render_terminal_screen(surface)?;
                    break LoopExit::GameOver;
                }
                GameStatus::Won => {
                    self.render_terminal_screen(surface)?;
                    break LoopExit::Won;
                }
                GameStatus::Running => {}
            }

            for _ in 0..self.steps_due(elapsed) {
                self.step();
            }
            self.render_frame(surface)?;

            let used = frame_start.elapsed();
            trace!("frame {} used {:?}", self.frames, used);
            if let Some(rest) = remaining_budget(used) {
                self.pace(Instant::now() + rest, events);
            }
        };

        if let Some(music) = music {
            music.stop();
        }
        info!(
            "game loop exited ({exit:?}) after {} frames, score {}",
            self.frames,
            self.world.player().score()
        );
        Ok(exit)
    }

    fn drain_events(&mut self, events: &Receiver<SurfaceEvent>) {
        if let Some(holds) = self.holds.as_mut() {
            for release in holds.expire(self.frames) {
                self.controls.dispatch(release, &mut self.world);
            }
        }
        if self.input_lost {
            return;
        }
        loop {
            match events.try_recv() {
                Ok(event) => self.handle_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("input source disconnected; continuing without input");
                    self.input_lost = true;
                    break;
                }
            }
        }
    }

    /// Wait until `deadline`, handling input as it arrives.
    fn pace(&mut self, deadline: Instant, events: &Receiver<SurfaceEvent>) {
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            if self.input_lost {
                thread::sleep(remaining);
                return;
            }
            match events.recv_timeout(remaining) {
                Ok(event) => self.handle_event(event),
                Err(RecvTimeoutError::Timeout) => return,
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("frame pacing interrupted: input source disconnected");
                    self.input_lost = true;
                }
            }
        }
    }
}

fn centred_x(text: &str) -> i32 {
    (WIDTH / 2 - text.chars().count() as i32 * CELL_W / 2).max(0)
}
