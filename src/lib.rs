//! Invaders: the simulation core of a single-player 2D arcade shooter.
//!
//! - `entities`: actors (player, invaders, shots, ufo) and their behaviour
//! - `collision`: the bounding-box collision pass
//! - `world`: the per-frame update pass, scoring and win/loss detection
//! - `input`: key events → player commands
//! - `game_loop`: fixed-timestep pacing, spawns and the terminal-state machine
//! - `display` / `assets` / `audio`: the collaborators the core draws and plays through

pub mod assets;
pub mod audio;
pub mod collision;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod world;

/// Compile-time game configuration.
pub mod consts {
    use std::time::Duration;

    /// Stage size in pixels.
    pub const WIDTH: i32 = 640;
    pub const HEIGHT: i32 = 480;

    /// Target simulation and render rate.
    pub const DESIRED_FPS: u32 = 50;
    /// One fixed simulation step.
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(1000 / DESIRED_FPS as u64);
    /// Upper bound on catch-up steps run in a single rendered frame.
    pub const MAX_STEPS_PER_FRAME: u32 = 5;

    // ── Motion (pixels per step) ─────────────────────────────────────────────

    pub const PLAYER_SPEED: i32 = 6;
    pub const INVADER_SPEED: i32 = 10;
    pub const SHOT_SPEED: i32 = 10;
    pub const ENEMY_SHOT_SPEED: i32 = 5;
    pub const UFO_SPEED: i32 = 1;

    // ── Scoring ──────────────────────────────────────────────────────────────

    pub const INVADER_POINTS: u32 = 20;
    pub const UFO_POINTS: u32 = 200;
    pub const SHOT_POINTS: u32 = 0;

    // ── Spawning ─────────────────────────────────────────────────────────────

    /// Player's baseline distance from the bottom of the stage.
    pub const PLAYER_Y_OFFSET: i32 = 50;
    /// Extra spacing between invaders in the starting grid.
    pub const INVADER_X_PADDING: i32 = 15;
    pub const INVADER_Y_PADDING: i32 = 20;
    /// How far an invader patrols either side of its home column.
    pub const INVADER_PATROL: i32 = 20;

    /// A ufo spawns with probability 1 / UFO_SPAWN_ODDS per step.
    pub const UFO_SPAWN_ODDS: u32 = 1000;
    pub const UFO_ENTRY_X: i32 = 0;
    pub const UFO_ENTRY_Y: i32 = 20;

    /// Each invader fires with probability 1 / ENEMY_FIRE_ODDS per step.
    pub const ENEMY_FIRE_ODDS: u32 = 4000;

    /// Min steps between two player shots.
    pub const FIRE_COOLDOWN_FRAMES: u32 = 8;

    // ── Assets ───────────────────────────────────────────────────────────────

    pub const PLAYER_SPRITE: &str = "player.txt";
    pub const INVADER_SPRITE: &str = "invader.txt";
    pub const SHOT_SPRITE: &str = "shot.txt";
    pub const UFO_SPRITE: &str = "ufo.txt";
    pub const BACKGROUND_SPRITE: &str = "space.txt";
    pub const MUSIC_SOUND: &str = "music.wav";
}
