//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::io;
use std::path::PathBuf;

use invaders::assets::{AssetStore, Sprite};
use invaders::display::{Renderer, TextStyle};
use invaders::entities::{Actor, Player, Rect};
use invaders::world::World;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear,
    Image { sprite: String, dest: Rect, src: Rect },
    Text { text: String, x: i32, y: i32, style: TextStyle },
    Present,
}

/// A headless `Renderer` that only remembers what it was asked to do.
#[derive(Default)]
pub struct RecordingRenderer {
    pub ops: Vec<Op>,
}

impl RecordingRenderer {
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn images_of(&self, name: &str) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Image { sprite, .. } if sprite == name))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn draw_image(&mut self, sprite: &Sprite, dest: Rect, src: Rect) {
        self.ops.push(Op::Image {
            sprite: sprite.name().to_string(),
            dest,
            src,
        });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) {
        self.ops.push(Op::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }

    fn present(&mut self) -> io::Result<()> {
        self.ops.push(Op::Present);
        Ok(())
    }
}

/// The asset directory shipped with the crate.
pub fn bundled_assets() -> AssetStore {
    AssetStore::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("res"))
}

/// Player near the bottom, well clear of anything the tests place up top.
pub fn test_player() -> Player {
    Player::new(300, 430)
}

pub fn world_with(actors: Vec<Actor>) -> World {
    let mut world = World::with_player(test_player());
    for actor in actors {
        world.spawn(actor);
    }
    world
}

/// An invader that never moves.
pub fn still_invader(x: i32, y: i32) -> Actor {
    Actor::invader(x, y).with_velocity(0, 0)
}

/// (kind, x, y) of every live actor, for before/after comparisons.
pub fn snapshot(world: &World) -> Vec<(String, i32, i32)> {
    world
        .actors()
        .iter()
        .map(|a| (format!("{:?}", a.kind), a.x, a.y))
        .collect()
}
