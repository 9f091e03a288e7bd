mod common;

use std::fs;
use std::rc::Rc;

use common::*;
use crossterm::style::Color;
use invaders::assets::*;
use invaders::consts::*;
use invaders::display::{CELL_H, CELL_W};
use invaders::entities::{Actor, ActorKind};
use invaders::error::AssetError;
use invaders::world::World;

// ── Sprite format ─────────────────────────────────────────────────────────────

#[test]
fn parse_reads_colour_header_and_rows() {
    let sprite = Sprite::parse("ship.txt", "!color red\n /\\\n/__\\\n\n").unwrap();
    assert_eq!(sprite.colour(), Color::Red);
    assert_eq!(sprite.rows(), 2);
    assert_eq!(sprite.cols(), 4);
    assert_eq!(sprite.bounds().w, 4 * CELL_W);
    assert_eq!(sprite.bounds().h, 2 * CELL_H);
}

#[test]
fn parse_defaults_to_white_without_header() {
    let sprite = Sprite::parse("dot.txt", "*").unwrap();
    assert_eq!(sprite.colour(), Color::White);
    assert_eq!(sprite.glyph(0, 0), '*');
}

#[test]
fn glyphs_wrap_and_short_rows_pad_with_space() {
    let sprite = Sprite::parse("tile.txt", "ab\nc").unwrap();
    assert_eq!(sprite.glyph(2, 0), 'a');
    assert_eq!(sprite.glyph(-1, 0), 'b');
    assert_eq!(sprite.glyph(0, 3), 'c');
    assert_eq!(sprite.glyph(1, 1), ' ');
}

#[test]
fn parse_rejects_unknown_colour() {
    let err = Sprite::parse("bad.txt", "!color chartreuse\nX").unwrap_err();
    assert!(matches!(
        err,
        AssetError::UnknownColour { ref colour, .. } if colour == "chartreuse"
    ));
}

#[test]
fn parse_rejects_images_without_rows() {
    for text in ["", "!color green", "!color green\n  \n\n"] {
        assert!(
            matches!(Sprite::parse("blank.txt", text), Err(AssetError::Empty(_))),
            "{text:?}"
        );
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[test]
fn bundled_assets_all_load() {
    let mut assets = bundled_assets();
    for name in [
        PLAYER_SPRITE,
        INVADER_SPRITE,
        SHOT_SPRITE,
        UFO_SPRITE,
        BACKGROUND_SPRITE,
    ] {
        assert!(assets.sprite(name).is_some(), "{name}");
    }
    assert!(assets.sound(MUSIC_SOUND).is_some());
}

#[test]
fn sprites_are_cached_by_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "A").unwrap();
    let mut assets = AssetStore::new(dir.path());

    let first = assets.sprite("a.txt").unwrap();
    fs::remove_file(dir.path().join("a.txt")).unwrap();
    let second = assets.sprite("a.txt").unwrap();

    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn missing_sprite_stays_missing() {
    let dir = tempfile::tempdir().unwrap();
    let mut assets = AssetStore::new(dir.path());

    assert!(assets.sprite("late.txt").is_none());
    fs::write(dir.path().join("late.txt"), "L").unwrap();
    assert!(assets.sprite("late.txt").is_none()); // the failure was cached
}

#[test]
fn sounds_load_raw_bytes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("beep.wav"), [1u8, 2, 3]).unwrap();
    fs::write(dir.path().join("empty.wav"), b"").unwrap();
    let mut assets = AssetStore::new(dir.path());

    let beep = assets.sound("beep.wav").unwrap();
    assert_eq!(beep.bytes(), &[1, 2, 3]);
    assert!(!beep.is_active());
    assert!(assets.sound("empty.wav").is_none());
}

#[test]
fn cleanup_stops_active_sounds() {
    let mut assets = bundled_assets();
    let music = assets.sound(MUSIC_SOUND).unwrap();
    music.activate();

    assets.cleanup();
    assert!(!music.is_active());
}

#[test]
fn dropping_the_store_stops_sounds_left_playing() {
    let mut assets = bundled_assets();
    let music = assets.sound(MUSIC_SOUND).unwrap();
    music.activate();

    drop(assets); // an early error return never reached cleanup
    assert!(!music.is_active());
}

// ── Missing sprites ───────────────────────────────────────────────────────────

#[test]
fn missing_sprites_draw_nothing() {
    let sprites = SpriteSet::default();
    let world = World::new();
    let mut r = RecordingRenderer::default();

    world.render(&mut r, &sprites);
    Actor::ufo(0, 20).render(&mut r, &sprites);

    assert!(r.ops.is_empty());
}

#[test]
fn sprite_set_picks_by_kind() {
    let mut assets = bundled_assets();
    let sprites = SpriteSet::load(&mut assets);
    let shot = sprites
        .for_kind(&Actor::shot(invaders::entities::ShotOwner::Enemy, 0, 0).kind)
        .unwrap();
    assert_eq!(shot.name(), SHOT_SPRITE);
    assert_eq!(sprites.for_kind(&ActorKind::Ufo).unwrap().name(), UFO_SPRITE);
}
