//! Actor types: the player, invaders, shots and the bonus ufo.
//!
//! Every actor is a plain `Actor` value tagged with an `ActorKind`; behaviour
//! differences live in `match`es over the kind rather than in trait objects,
//! so the world can keep all of them in one `Vec`.

use crate::assets::SpriteSet;
use crate::consts::*;
use crate::display::Renderer;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in stage pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Overlap test with touching edges counting as contact.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// Who fired a shot; decides direction and what it can hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOwner {
    /// Travels upward, hurts invaders and the ufo.
    Player,
    /// Travels downward, hurts the player.
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    /// Patrols horizontally between its two walls.
    Invader { left_wall: i32, right_wall: i32 },
    Shot { owner: ShotOwner },
    Ufo,
}

pub const PLAYER_SIZE: (i32, i32) = (24, 32);
pub const INVADER_SIZE: (i32, i32) = (24, 32);
pub const SHOT_SIZE: (i32, i32) = (8, 16);
pub const UFO_SIZE: (i32, i32) = (40, 16);

impl ActorKind {
    /// Sprite dimensions in pixels.
    pub fn size(&self) -> (i32, i32) {
        match self {
            ActorKind::Player => PLAYER_SIZE,
            ActorKind::Invader { .. } => INVADER_SIZE,
            ActorKind::Shot { .. } => SHOT_SIZE,
            ActorKind::Ufo => UFO_SIZE,
        }
    }

    pub fn point_value(&self) -> u32 {
        match self {
            ActorKind::Player => 0,
            ActorKind::Invader { .. } => INVADER_POINTS,
            ActorKind::Shot { .. } => SHOT_POINTS,
            ActorKind::Ufo => UFO_POINTS,
        }
    }

    pub fn is_shot(&self) -> bool {
        matches!(self, ActorKind::Shot { .. })
    }

    pub fn is_invader(&self) -> bool {
        matches!(self, ActorKind::Invader { .. })
    }

    fn is_player_shot(&self) -> bool {
        matches!(self, ActorKind::Shot { owner: ShotOwner::Player })
    }

    fn is_enemy_shot(&self) -> bool {
        matches!(self, ActorKind::Shot { owner: ShotOwner::Enemy })
    }
}

/// Why an actor left play. Only destruction earns points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    Destroyed,
    OffStage,
}

// ── Actor ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Actor {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
    pub kind: ActorKind,
    /// Set at most once; never cleared.
    removal: Option<Removal>,
}

impl Actor {
    pub fn new(kind: ActorKind, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            vx: 0,
            vy: 0,
            kind,
            removal: None,
        }
    }

    pub fn with_velocity(self, vx: i32, vy: i32) -> Self {
        Self { vx, vy, ..self }
    }

    /// An invader patrolling `INVADER_PATROL` pixels either side of `x`.
    pub fn invader(x: i32, y: i32) -> Self {
        let kind = ActorKind::Invader {
            left_wall: x - INVADER_PATROL,
            right_wall: x + INVADER_PATROL,
        };
        Actor::new(kind, x, y).with_velocity(INVADER_SPEED, 0)
    }

    pub fn shot(owner: ShotOwner, x: i32, y: i32) -> Self {
        let vy = match owner {
            ShotOwner::Player => -SHOT_SPEED,
            ShotOwner::Enemy => ENEMY_SHOT_SPEED,
        };
        Actor::new(ActorKind::Shot { owner }, x, y).with_velocity(0, vy)
    }

    pub fn ufo(x: i32, y: i32) -> Self {
        Actor::new(ActorKind::Ufo, x, y).with_velocity(UFO_SPEED, 0)
    }

    /// A downward shot leaving from the bottom centre of this actor.
    pub fn enemy_shot(&self) -> Actor {
        let b = self.bounds();
        Actor::shot(ShotOwner::Enemy, b.x + (b.w - SHOT_SIZE.0) / 2, b.bottom())
    }

    pub fn bounds(&self) -> Rect {
        let (w, h) = self.kind.size();
        Rect::new(self.x, self.y, w, h)
    }

    pub fn point_value(&self) -> u32 {
        self.kind.point_value()
    }

    pub fn is_removal_pending(&self) -> bool {
        self.removal.is_some()
    }

    pub fn removal(&self) -> Option<Removal> {
        self.removal
    }

    /// Flag the actor for purge. The first cause sticks.
    pub fn mark_for_removal(&mut self, cause: Removal) {
        if self.removal.is_none() {
            self.removal = Some(cause);
        }
    }

    /// Points owed to the player once this actor is purged.
    pub fn credited_points(&self) -> u32 {
        match self.removal {
            Some(Removal::Destroyed) => self.point_value(),
            _ => 0,
        }
    }

    /// One step of autonomous motion.
    pub fn advance(&mut self) {
        match self.kind {
            ActorKind::Player => {
                let (w, _) = PLAYER_SIZE;
                self.x = (self.x + self.vx).clamp(0, WIDTH - w);
            }
            ActorKind::Invader { left_wall, right_wall } => {
                self.x += self.vx;
                if (self.vx > 0 && self.x >= right_wall) || (self.vx < 0 && self.x <= left_wall) {
                    self.vx = -self.vx;
                }
            }
            ActorKind::Shot { .. } => {
                self.y += self.vy;
                let b = self.bounds();
                if b.bottom() < 0 || b.y > HEIGHT {
                    self.mark_for_removal(Removal::OffStage);
                }
            }
            ActorKind::Ufo => {
                self.x += self.vx;
                let b = self.bounds();
                if b.x > WIDTH || b.right() < 0 {
                    self.mark_for_removal(Removal::OffStage);
                }
            }
        }
    }

    /// Notification that `other` overlapped this actor during a collision pass.
    pub fn on_collision(&mut self, other: &ActorKind) {
        let hit = match self.kind {
            ActorKind::Player => other.is_enemy_shot() || other.is_invader(),
            ActorKind::Invader { .. } | ActorKind::Ufo => other.is_player_shot(),
            ActorKind::Shot { owner: ShotOwner::Player } => {
                matches!(other, ActorKind::Invader { .. } | ActorKind::Ufo)
            }
            ActorKind::Shot { owner: ShotOwner::Enemy } => *other == ActorKind::Player,
        };
        if hit {
            self.mark_for_removal(Removal::Destroyed);
        }
    }

    /// Draw this actor's sprite. Missing sprites draw nothing.
    pub fn render<S: Renderer + ?Sized>(&self, surface: &mut S, sprites: &SpriteSet) {
        if let Some(sprite) = sprites.for_kind(&self.kind) {
            surface.draw_image(sprite, self.bounds(), sprite.bounds());
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// Commands the input layer can issue to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    MoveLeft,
    MoveRight,
    /// Release of the left key; stops only a leftward move.
    StopLeft,
    StopRight,
    Fire,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub actor: Actor,
    score: u32,
    /// Steps left before the next shot is allowed.
    fire_cooldown: u32,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            actor: Actor::new(ActorKind::Player, x, y),
            score: 0,
            fire_cooldown: 0,
        }
    }

    /// Centred horizontally near the bottom of the stage.
    pub fn at_start() -> Self {
        let (w, _) = PLAYER_SIZE;
        Player::new(WIDTH / 2 - w / 2, HEIGHT - PLAYER_Y_OFFSET)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn is_alive(&self) -> bool {
        !self.actor.is_removal_pending()
    }

    pub fn can_fire(&self) -> bool {
        self.is_alive() && self.fire_cooldown == 0
    }

    /// Apply a command. Returns the spawned shot when `Fire` goes through.
    pub fn command(&mut self, cmd: PlayerCommand) -> Option<Actor> {
        match cmd {
            PlayerCommand::MoveLeft => self.actor.vx = -PLAYER_SPEED,
            PlayerCommand::MoveRight => self.actor.vx = PLAYER_SPEED,
            PlayerCommand::StopLeft if self.actor.vx < 0 => self.actor.vx = 0,
            PlayerCommand::StopRight if self.actor.vx > 0 => self.actor.vx = 0,
            PlayerCommand::StopLeft | PlayerCommand::StopRight => {}
            PlayerCommand::Fire => return self.fire(),
        }
        None
    }

    fn fire(&mut self) -> Option<Actor> {
        if !self.can_fire() {
            return None;
        }
        self.fire_cooldown = FIRE_COOLDOWN_FRAMES;
        let b = self.actor.bounds();
        let (sw, sh) = SHOT_SIZE;
        Some(Actor::shot(ShotOwner::Player, b.x + (b.w - sw) / 2, b.y - sh))
    }

    pub fn advance(&mut self) {
        self.actor.advance();
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
    }
}
