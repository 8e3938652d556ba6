//! The [`Canvas`] screen buffer and frame diffing.
//!
//! A canvas is what a [`Model`](crate::Model) draws into. The app loop keeps
//! the previously flushed canvas around and sends a driver only the glyphs
//! that changed.

use pathviz_search::Pos;

use crate::style::Style;

/// A styled character on screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Glyph {
    #[inline]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

impl Default for Glyph {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// A `width × height` screen buffer addressed by `Pos { row, col }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    glyphs: Vec<Glyph>,
    width: i32,
    height: i32,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            glyphs: vec![Glyph::default(); w as usize * h as usize],
            width: w,
            height: h,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn index(&self, p: Pos) -> Option<usize> {
        if p.row >= 0 && p.col >= 0 && p.row < self.height && p.col < self.width {
            Some(p.row as usize * self.width as usize + p.col as usize)
        } else {
            None
        }
    }

    /// The glyph at `p`; a blank glyph outside the canvas.
    pub fn at(&self, p: Pos) -> Glyph {
        self.index(p).map(|i| self.glyphs[i]).unwrap_or_default()
    }

    /// Set the glyph at `p`. No-op outside the canvas.
    pub fn set(&mut self, p: Pos, g: Glyph) {
        if let Some(i) = self.index(p) {
            self.glyphs[i] = g;
        }
    }

    /// Write `text` left to right from `p`, clipped at the right edge.
    /// Returns the number of glyphs written.
    pub fn print(&mut self, p: Pos, text: &str, style: Style) -> usize {
        let mut n = 0;
        for (i, ch) in text.chars().enumerate() {
            let q = p.shift(0, i as i32);
            if self.index(q).is_none() {
                break;
            }
            self.set(q, Glyph::new(ch, style));
            n += 1;
        }
        n
    }

    /// Copy `src` into `self`. Both must have the same size; otherwise
    /// `self` is resized to match.
    pub fn copy_from(&mut self, src: &Canvas) {
        self.glyphs.clone_from(&src.glyphs);
        self.width = src.width;
        self.height = src.height;
    }

    /// Row-major iterator over `(Pos, Glyph)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, Glyph)> + '_ {
        let w = self.width.max(1);
        self.glyphs
            .iter()
            .enumerate()
            .map(move |(i, g)| (Pos::new(i as i32 / w, i as i32 % w), *g))
    }
}

/// A glyph that changed between two frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameGlyph {
    pub glyph: Glyph,
    pub pos: Pos,
}

/// The changes needed to turn one canvas into the next.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub glyphs: Vec<FrameGlyph>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two canvases.
///
/// If the sizes differ every glyph of `curr` is included.
pub fn compute_frame(prev: &Canvas, curr: &Canvas) -> Frame {
    let resized = prev.width != curr.width || prev.height != curr.height;
    let glyphs = curr
        .iter()
        .filter(|&(p, g)| resized || prev.at(p) != g)
        .map(|(pos, glyph)| FrameGlyph { glyph, pos })
        .collect();
    Frame {
        glyphs,
        width: curr.width,
        height: curr.height,
    }
}
