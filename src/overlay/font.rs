//! A tiny built-in bitmap font.
//!
//! Glyphs are 5x7 pixel bitmaps rasterised into an RGBA atlas at startup, so the overlay needs no
//! font file on disk. Lower-case letters are drawn with their upper-case glyph.

use std::sync::Arc;

use glam::{Vec2, Vec4};

use crate::{
    abs::{Texture, TextureError, TextureFilter},
    overlay::renderer::DrawCommand,
};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Glyph cells carry one pixel of padding right and below to keep neighbours from bleeding.
const CELL_WIDTH: u32 = GLYPH_WIDTH + 1;
const CELL_HEIGHT: u32 = GLYPH_HEIGHT + 1;
const ATLAS_COLUMNS: u32 = 8;

/// Each row is five bits wide, most significant bit on the left.
#[rustfmt::skip]
const GLYPHS: &[(char, [u8; 7])] = &[
    (' ', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000]),
    (':', [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000]),
    ('-', [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000]),
    ('.', [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100]),
    ('0', [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
    ('1', [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('2', [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
    ('3', [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
    ('4', [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
    ('5', [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
    ('6', [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
    ('7', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('9', [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
    ('A', [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
    ('D', [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
    ('E', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
    ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('G', [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
    ('H', [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
    ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
    ('J', [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
    ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
    ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('N', [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('P', [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
    ('Q', [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
    ('R', [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
    ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
    ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
    ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('V', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('Y', [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100]),
    ('Z', [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
];

/// Returns the atlas cell of `c`, if the font has a glyph for it.
pub fn glyph_index(c: char) -> Option<usize> {
    let c = c.to_ascii_uppercase();
    GLYPHS.iter().position(|(glyph, _)| *glyph == c)
}

/// Pixel dimensions of the atlas.
pub fn atlas_size() -> (u32, u32) {
    let rows = (GLYPHS.len() as u32).div_ceil(ATLAS_COLUMNS);
    (ATLAS_COLUMNS * CELL_WIDTH, rows * CELL_HEIGHT)
}

/// Rasterises every glyph into RGBA8 pixels: opaque white where a bit is set, transparent
/// elsewhere. Row 0 of the data is the top of the first glyph row.
pub fn rasterize_atlas() -> Vec<u8> {
    let (width, height) = atlas_size();
    let mut pixels = vec![0u8; (width * height * 4) as usize];

    for (index, (_, rows)) in GLYPHS.iter().enumerate() {
        let cell_x = (index as u32 % ATLAS_COLUMNS) * CELL_WIDTH;
        let cell_y = (index as u32 / ATLAS_COLUMNS) * CELL_HEIGHT;

        for (y, row) in rows.iter().enumerate() {
            for x in 0..GLYPH_WIDTH {
                if row & (1 << (GLYPH_WIDTH - 1 - x)) == 0 {
                    continue;
                }
                let offset = (((cell_y + y as u32) * width + cell_x + x) * 4) as usize;
                pixels[offset..offset + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }

    pixels
}

/// UV rectangle `[min, max]` of the glyph in `cell`.
pub fn glyph_uvs(cell: usize) -> [Vec2; 2] {
    let (width, height) = atlas_size();
    let atlas = Vec2::new(width as f32, height as f32);
    let col = cell as u32 % ATLAS_COLUMNS;
    let row = cell as u32 / ATLAS_COLUMNS;

    let min = Vec2::new((col * CELL_WIDTH) as f32, (row * CELL_HEIGHT) as f32) / atlas;
    let size = Vec2::new(GLYPH_WIDTH as f32, GLYPH_HEIGHT as f32) / atlas;
    [min, min + size]
}

/// On-screen size of one glyph at the given font size (the glyph height in pixels).
pub fn char_size(font_size: f32) -> Vec2 {
    Vec2::new(
        font_size * GLYPH_WIDTH as f32 / GLYPH_HEIGHT as f32,
        font_size,
    )
}

/// Horizontal distance between the starts of two neighbouring glyphs.
pub fn advance(font_size: f32) -> f32 {
    font_size * CELL_WIDTH as f32 / GLYPH_HEIGHT as f32
}

/// Lays out `text` with its top-left corner at the origin. Newlines start a new line; characters
/// without a glyph still advance the cursor.
pub fn layout(text: &str, font_size: f32, color: Vec4) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    let mut cursor = Vec2::ZERO;
    let size = char_size(font_size);
    let line_height = font_size * CELL_HEIGHT as f32 / GLYPH_HEIGHT as f32;

    for line in text.lines() {
        for c in line.chars() {
            if let Some(cell) = glyph_index(c) {
                commands.push(DrawCommand {
                    rect: [cursor, cursor + size],
                    uv_rect: glyph_uvs(cell),
                    color,
                });
            }
            cursor.x += advance(font_size);
        }
        cursor.x = 0.0;
        cursor.y += line_height;
    }

    commands
}

/// The font atlas uploaded to the GPU.
pub struct Font {
    atlas: Texture,
}

impl Font {
    /// Rasterises and uploads the built-in glyphs.
    pub fn builtin(gl: &Arc<glow::Context>) -> Result<Self, TextureError> {
        let (width, height) = atlas_size();
        let atlas = Texture::from_rgba(gl, width, height, &rasterize_atlas(), TextureFilter::Nearest)?;
        Ok(Self { atlas })
    }

    pub fn atlas(&self) -> &Texture {
        &self.atlas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_glyph_is_five_bits_wide() {
        for (c, rows) in GLYPHS {
            assert!(rows.iter().all(|row| *row < 32), "glyph {c:?} too wide");
        }
    }

    #[test]
    fn glyph_characters_are_unique() {
        for (i, (c, _)) in GLYPHS.iter().enumerate() {
            assert_eq!(glyph_index(*c), Some(i));
        }
    }

    #[test]
    fn score_text_is_fully_covered() {
        for c in "Score: 0123456789".chars() {
            assert!(glyph_index(c).is_some(), "no glyph for {c:?}");
        }
        assert_eq!(glyph_index('s'), glyph_index('S'));
        assert_eq!(glyph_index('~'), None);
    }

    #[test]
    fn atlas_holds_every_glyph() {
        let (width, height) = atlas_size();
        assert_eq!(width, ATLAS_COLUMNS * CELL_WIDTH);
        assert!(height / CELL_HEIGHT * ATLAS_COLUMNS >= GLYPHS.len() as u32);
        assert_eq!(rasterize_atlas().len(), (width * height * 4) as usize);
    }

    #[test]
    fn rasterised_pixels_match_bits() {
        let pixels = rasterize_atlas();
        let (width, _) = atlas_size();
        let pixel = |x: u32, y: u32| pixels[((y * width + x) * 4 + 3) as usize];

        // The space glyph sits in cell 0 and is empty.
        for y in 0..GLYPH_HEIGHT {
            for x in 0..GLYPH_WIDTH {
                assert_eq!(pixel(x, y), 0);
            }
        }

        // '-' sits in cell 2; its fourth row is solid.
        let cell_x = 2 * CELL_WIDTH;
        for x in 0..GLYPH_WIDTH {
            assert_eq!(pixel(cell_x + x, 3), 255);
            assert_eq!(pixel(cell_x + x, 2), 0);
        }
        // Padding column stays clear.
        assert_eq!(pixel(cell_x + GLYPH_WIDTH, 3), 0);
    }

    #[test]
    fn uvs_stay_inside_the_atlas() {
        for cell in 0..GLYPHS.len() {
            let [min, max] = glyph_uvs(cell);
            assert!(min.cmpge(Vec2::ZERO).all());
            assert!(max.cmple(Vec2::ONE).all());
            assert!(max.cmpgt(min).all());
        }
    }

    #[test]
    fn layout_skips_unknown_characters_but_advances() {
        let commands = layout("A~B", 7.0, Vec4::ONE);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].rect[0], Vec2::ZERO);
        assert_eq!(commands[1].rect[0].x, 2.0 * advance(7.0));
    }

    #[test]
    fn layout_breaks_lines() {
        let commands = layout("1\n2", 7.0, Vec4::ONE);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].rect[0].x, 0.0);
        assert_eq!(commands[1].rect[0].y, 8.0);
    }
}
