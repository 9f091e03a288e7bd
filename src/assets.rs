//! Sprite and sound loading.
//!
//! `AssetStore` is built once at startup and passed to whoever needs assets.
//! Lookups are cached by name, failures included: a missing file is logged on
//! first request and yields `None` from then on, and every draw or play site
//! treats `None` as a no-op.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::style::Color;
use log::{info, warn};

use crate::consts::*;
use crate::display::{CELL_H, CELL_W};
use crate::entities::{ActorKind, Rect};
use crate::error::AssetError;

// ── Sprites ───────────────────────────────────────────────────────────────────

/// A static glyph image. Each glyph covers one `CELL_W × CELL_H` pixel cell;
/// spaces are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    name: String,
    rows: Vec<Vec<char>>,
    cols: usize,
    colour: Color,
}

impl Sprite {
    /// Parse the text sprite format: an optional `!color <name>` header line
    /// followed by one line per glyph row.
    pub fn parse(name: &str, text: &str) -> Result<Sprite, AssetError> {
        let mut lines = text.lines().peekable();
        let mut colour = Color::White;
        if let Some(header) = lines.peek().copied().and_then(|l| l.strip_prefix("!color")) {
            let wanted = header.trim();
            colour = parse_colour(wanted).ok_or_else(|| AssetError::UnknownColour {
                name: name.to_string(),
                colour: wanted.to_string(),
            })?;
            lines.next();
        }

        let mut rows: Vec<Vec<char>> = lines.map(|l| l.chars().collect()).collect();
        while rows.last().is_some_and(|r| r.iter().all(|c| c.is_whitespace())) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(AssetError::Empty(name.to_string()));
        }
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        Ok(Sprite {
            name: name.to_string(),
            rows,
            cols,
            colour,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colour(&self) -> Color {
        self.colour
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Full image extent in pixels, anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.cols as i32 * CELL_W, self.rows.len() as i32 * CELL_H)
    }

    /// Glyph at a cell position, wrapping in both axes so the image tiles.
    pub fn glyph(&self, col: i32, row: i32) -> char {
        if self.cols == 0 {
            return ' ';
        }
        let row = row.rem_euclid(self.rows.len() as i32) as usize;
        let col = col.rem_euclid(self.cols as i32) as usize;
        self.rows[row].get(col).copied().unwrap_or(' ')
    }
}

fn parse_colour(name: &str) -> Option<Color> {
    let colour = match name.to_ascii_lowercase().as_str() {
        "white" => Color::White,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "grey" | "gray" => Color::Grey,
        "dark_red" => Color::DarkRed,
        "dark_green" => Color::DarkGreen,
        "dark_yellow" => Color::DarkYellow,
        "dark_blue" => Color::DarkBlue,
        "dark_magenta" => Color::DarkMagenta,
        "dark_cyan" => Color::DarkCyan,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        _ => return None,
    };
    Some(colour)
}

/// One sprite handle per actor type, resolved once per run.
#[derive(Clone, Debug, Default)]
pub struct SpriteSet {
    pub player: Option<Rc<Sprite>>,
    pub invader: Option<Rc<Sprite>>,
    pub shot: Option<Rc<Sprite>>,
    pub ufo: Option<Rc<Sprite>>,
}

impl SpriteSet {
    pub fn load(assets: &mut AssetStore) -> Self {
        Self {
            player: assets.sprite(PLAYER_SPRITE),
            invader: assets.sprite(INVADER_SPRITE),
            shot: assets.sprite(SHOT_SPRITE),
            ufo: assets.sprite(UFO_SPRITE),
        }
    }

    pub fn for_kind(&self, kind: &ActorKind) -> Option<&Sprite> {
        let handle = match kind {
            ActorKind::Player => &self.player,
            ActorKind::Invader { .. } => &self.invader,
            ActorKind::Shot { .. } => &self.shot,
            ActorKind::Ufo => &self.ufo,
        };
        handle.as_deref()
    }
}

// ── Sounds ────────────────────────────────────────────────────────────────────

/// Raw sound data plus a play flag shared with whichever service loops it.
#[derive(Debug)]
pub struct SoundClip {
    name: String,
    bytes: Vec<u8>,
    active: AtomicBool,
}

pub type Sound = Arc<SoundClip>;

impl SoundClip {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
            active: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        self.active.store(false, Ordering::Release);
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

pub struct AssetStore {
    root: PathBuf,
    sprites: HashMap<String, Option<Rc<Sprite>>>,
    sounds: HashMap<String, Option<Sound>>,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sprites: HashMap::new(),
            sounds: HashMap::new(),
        }
    }

    pub fn sprite(&mut self, name: &str) -> Option<Rc<Sprite>> {
        if let Some(cached) = self.sprites.get(name) {
            return cached.clone();
        }
        let loaded = match self.load_sprite(name) {
            Ok(sprite) => Some(Rc::new(sprite)),
            Err(e) => {
                warn!("{e}");
                None
            }
        };
        self.sprites.insert(name.to_string(), loaded.clone());
        loaded
    }

    pub fn sound(&mut self, name: &str) -> Option<Sound> {
        if let Some(cached) = self.sounds.get(name) {
            return cached.clone();
        }
        let loaded = match self.load_sound(name) {
            Ok(clip) => Some(Arc::new(clip)),
            Err(e) => {
                warn!("{e}");
                None
            }
        };
        self.sounds.insert(name.to_string(), loaded.clone());
        loaded
    }

    /// Stop every sound this store has handed out.
    pub fn cleanup(&self) {
        let stopped = self.stop_sounds();
        info!("asset cleanup stopped {stopped} active sound(s)");
    }

    fn stop_sounds(&self) -> usize {
        let mut stopped = 0;
        for clip in self.sounds.values().flatten() {
            if clip.is_active() {
                clip.stop();
                stopped += 1;
            }
        }
        stopped
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        fs::read(self.root.join(name)).map_err(|source| AssetError::Io {
            name: name.to_string(),
            source,
        })
    }

    fn load_sprite(&self, name: &str) -> Result<Sprite, AssetError> {
        let bytes = self.read(name)?;
        Sprite::parse(name, &String::from_utf8_lossy(&bytes))
    }

    fn load_sound(&self, name: &str) -> Result<SoundClip, AssetError> {
        let bytes = self.read(name)?;
        if bytes.is_empty() {
            return Err(AssetError::Empty(name.to_string()));
        }
        Ok(SoundClip::new(name, bytes))
    }
}

/// Sounds never outlive the store, even when `cleanup` was skipped.
impl Drop for AssetStore {
    fn drop(&mut self) {
        let stopped = self.stop_sounds();
        if stopped > 0 {
            warn!("asset store dropped with {stopped} active sound(s); stopped them");
        }
    }
}
