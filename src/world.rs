//! The world: live actors, the player, and the per-step update pass.

use log::{debug, info};

use crate::assets::SpriteSet;
use crate::collision;
use crate::consts::*;
use crate::display::Renderer;
use crate::entities::{Actor, ActorKind, Player, PlayerCommand, INVADER_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// The player was hit. Terminal.
    GameOver,
    /// Every invader is gone. Terminal.
    Won,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        *self != GameStatus::Running
    }
}

pub struct World {
    /// Insertion order; affects paint layering only.
    actors: Vec<Actor>,
    player: Player,
    status: GameStatus,
    frame: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// A fresh run: the player at its start position and a full invader grid.
    pub fn new() -> Self {
        let mut world = World::with_player(Player::at_start());
        world.add_invaders();
        info!("world initialised with {} invaders", world.invader_count());
        world
    }

    /// A world holding only `player`; callers add their own actors.
    pub fn with_player(player: Player) -> Self {
        Self {
            actors: Vec::new(),
            player,
            status: GameStatus::Running,
            frame: 0,
        }
    }

    /// Fill the upper stage with a grid of invaders sized from the stage.
    fn add_invaders(&mut self) {
        let (w, h) = INVADER_SIZE;
        let x_pad = w + INVADER_X_PADDING;
        let y_pad = h + INVADER_Y_PADDING;
        let per_row = WIDTH / x_pad - 1;
        let rows = HEIGHT / y_pad - 3;

        for row in 0..rows {
            for col in 0..per_row - 1 {
                self.actors
                    .push(Actor::invader((col + 1) * x_pad, (row + 1) * y_pad));
            }
        }
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Update passes run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn invader_count(&self) -> usize {
        self.actors.iter().filter(|a| a.kind.is_invader()).count()
    }

    pub fn has_ufo(&self) -> bool {
        self.actors.iter().any(|a| a.kind == ActorKind::Ufo)
    }

    /// Add an actor to the end of the live collection.
    pub fn spawn(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    /// Route a player command; a successful `Fire` adds the new shot.
    pub fn command(&mut self, cmd: PlayerCommand) {
        if self.status.is_terminal() {
            return;
        }
        if let Some(shot) = self.player.command(cmd) {
            debug!("player fired at x={}", shot.x);
            self.spawn(shot);
        }
    }

    /// One simulation step.
    ///
    /// Shots run their collision pass before they move, then every surviving
    /// actor advances. The player's pass and move follow. Everything marked
    /// during the step is purged in one compaction at the end, crediting the
    /// player as it goes, so no pending actor survives into the next step.
    pub fn update(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.frame += 1;

        for i in 0..self.actors.len() {
            if self.actors[i].is_removal_pending() {
                continue;
            }
            if self.actors[i].kind.is_shot() {
                collision::collide_at(&mut self.actors, i);
            }
            if !self.actors[i].is_removal_pending() {
                self.actors[i].advance();
            }
        }

        collision::collide(&mut self.actors, &mut self.player.actor);
        if self.player.is_alive() {
            self.player.advance();
        }

        let mut credit = 0u32;
        let mut invaders = 0usize;
        self.actors.retain(|actor| {
            if actor.is_removal_pending() {
                credit = credit.saturating_add(actor.credited_points());
                false
            } else {
                if actor.kind.is_invader() {
                    invaders += 1;
                }
                true
            }
        });
        self.player.add_score(credit);

        if !self.player.is_alive() {
            self.status = GameStatus::GameOver;
            info!("game over at frame {} with score {}", self.frame, self.player.score());
        } else if invaders == 0 {
            self.status = GameStatus::Won;
            info!("game won at frame {} with score {}", self.frame, self.player.score());
        }
    }

    /// Paint every actor, then the player on top.
    pub fn render<S: Renderer + ?Sized>(&self, surface: &mut S, sprites: &SpriteSet) {
        for actor in &self.actors {
            actor.render(surface, sprites);
        }
        self.player.actor.render(surface, sprites);
    }
}
