//! Rendering layer: the `Renderer` interface and its terminal backend.
//!
//! The simulation only ever talks to `Renderer`. `TerminalRenderer` maps the
//! 640×480 pixel stage onto character cells, composes each frame in a back
//! buffer and writes only the cells that changed on `present`.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::assets::Sprite;
use crate::consts::{HEIGHT, WIDTH};
use crate::entities::Rect;

/// Pixel size of one terminal cell.
pub const CELL_W: i32 = 8;
pub const CELL_H: i32 = 16;

/// Stage size in cells.
pub const STAGE_COLS: u16 = (WIDTH / CELL_W) as u16;
pub const STAGE_ROWS: u16 = (HEIGHT / CELL_H) as u16;

// ── Interface ─────────────────────────────────────────────────────────────────

/// HUD text roles; the backend picks the actual look.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Label,
    Score,
    Fps,
    Banner,
    Hint,
}

/// A double-buffered drawing surface. Nothing is visible until `present`.
pub trait Renderer {
    /// Start a new frame from an empty back buffer.
    fn clear(&mut self);

    /// Draw the `src` region of `sprite` into `dest`. `src` wraps around the
    /// sprite's edges, so a small tile can fill a larger destination.
    fn draw_image(&mut self, sprite: &Sprite, dest: Rect, src: Rect);

    /// Draw text with its top-left corner at pixel position (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle);

    /// Make the composed frame visible.
    fn present(&mut self) -> io::Result<()>;
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_LABEL: Color = Color::Green;
const C_SCORE: Color = Color::Red;
const C_FPS: Color = Color::Red;
const C_BANNER: Color = Color::Red;
const C_HINT: Color = Color::White;

fn style_colour(style: TextStyle) -> Color {
    match style {
        TextStyle::Label => C_LABEL,
        TextStyle::Score => C_SCORE,
        TextStyle::Fps => C_FPS,
        TextStyle::Banner => C_BANNER,
        TextStyle::Hint => C_HINT,
    }
}

// ── Terminal backend ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    ch: char,
    colour: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    colour: Color::Reset,
};

pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    back: Vec<Cell>,
    /// What the terminal currently shows.
    front: Vec<Cell>,
}

impl<W: Write> TerminalRenderer<W> {
    /// A renderer for a terminal of `term_cols × term_rows`; anything past
    /// the smaller of the terminal and the stage is clipped.
    pub fn new(out: W, term_cols: u16, term_rows: u16) -> Self {
        let cols = term_cols.min(STAGE_COLS);
        let rows = term_rows.min(STAGE_ROWS);
        let len = cols as usize * rows as usize;
        Self {
            out,
            cols,
            rows,
            back: vec![BLANK; len],
            // Never equal to a drawable cell, so the first present paints everything
            front: vec![
                Cell {
                    ch: '\0',
                    colour: Color::Reset,
                };
                len
            ],
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// The glyph currently on screen at a cell, if inside the surface.
    pub fn visible_glyph(&self, col: u16, row: u16) -> Option<char> {
        self.index(col as i32, row as i32).map(|i| self.front[i].ch)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, colour: Color) {
        if let Some(i) = self.index(col, row) {
            self.back[i] = Cell { ch, colour };
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear(&mut self) {
        self.back.fill(BLANK);
    }

    fn draw_image(&mut self, sprite: &Sprite, dest: Rect, src: Rect) {
        let cols = (dest.w + CELL_W - 1) / CELL_W;
        let rows = (dest.h + CELL_H - 1) / CELL_H;
        let col0 = dest.x.div_euclid(CELL_W);
        let row0 = dest.y.div_euclid(CELL_H);
        let src_col0 = src.x.div_euclid(CELL_W);
        let src_row0 = src.y.div_euclid(CELL_H);

        for r in 0..rows {
            for c in 0..cols {
                let glyph = sprite.glyph(src_col0 + c, src_row0 + r);
                if glyph != ' ' {
                    self.put(col0 + c, row0 + r, glyph, sprite.colour());
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) {
        let col0 = x.div_euclid(CELL_W);
        let row = y.div_euclid(CELL_H);
        let colour = style_colour(style);
        for (i, ch) in text.chars().enumerate() {
            self.put(col0 + i as i32, row, ch, colour);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let mut colour = None;
        for (i, (back, front)) in self.back.iter().zip(self.front.iter()).enumerate() {
            if back == front {
                continue;
            }
            let col = (i % self.cols as usize) as u16;
            let row = (i / self.cols as usize) as u16;
            self.out.queue(cursor::MoveTo(col, row))?;
            if colour != Some(back.colour) {
                self.out.queue(style::SetForegroundColor(back.colour))?;
                colour = Some(back.colour);
            }
            self.out.queue(Print(back.ch))?;
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        self.front.copy_from_slice(&self.back);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_maps_to_eighty_by_thirty_cells() {
        assert_eq!((STAGE_COLS, STAGE_ROWS), (80, 30));
    }

    #[test]
    fn present_only_rewrites_changed_cells() {
        let mut r = TerminalRenderer::new(Vec::new(), 80, 30);
        r.draw_text("Score:", 16, 0, TextStyle::Label);
        r.present().unwrap();
        let first = r.get_ref().len();

        r.clear();
        r.draw_text("Score:", 16, 0, TextStyle::Label);
        r.present().unwrap();
        let second = r.get_ref().len() - first;

        assert!(second < first);
        assert_eq!(r.visible_glyph(2, 0), Some('S'));
    }
}
