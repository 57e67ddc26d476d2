// Tiny built-in pixel font so text never depends on external font assets.
// Lowercase input maps onto the uppercase glyphs; anything without a glyph
// renders as a filled block so missing coverage is visible, not invisible.

const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;
const TEXT_SCALE: u32 = 2;
pub const GLYPH_ADVANCE: u32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
pub const TEXT_HEIGHT: u32 = GLYPH_HEIGHT * TEXT_SCALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    Gray,
    White,
    Red,
    Green,
    Blue,
}

impl TextColor {
    pub const fn rgba(self) -> [u8; 4] {
        match self {
            TextColor::Black => [0, 0, 0, 255],
            TextColor::Gray => [128, 128, 128, 255],
            TextColor::White => [255, 255, 255, 255],
            TextColor::Red => [255, 0, 0, 255],
            TextColor::Green => [0, 255, 0, 255],
            TextColor::Blue => [0, 0, 255, 255],
        }
    }
}

/// Rasterizes one line of text into an RGBA bitmap with a transparent
/// background. Returns (width, height, pixels); empty text yields a
/// one-pixel transparent image so callers never deal with zero extents.
pub fn rasterize_text(text: &str, color: TextColor) -> (u32, u32, Vec<u8>) {
    let char_count = text.chars().count() as u32;
    if char_count == 0 {
        return (1, 1, vec![0, 0, 0, 0]);
    }

    let width = char_count * GLYPH_ADVANCE;
    let height = TEXT_HEIGHT;
    let mut rgba = vec![0u8; width as usize * height as usize * 4];
    let color = color.rgba();

    for (char_index, ch) in text.chars().enumerate() {
        let rows = glyph_rows(ch);
        let origin_x = char_index as u32 * GLYPH_ADVANCE;
        for (row_index, row_bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                    continue;
                }
                for sy in 0..TEXT_SCALE {
                    for sx in 0..TEXT_SCALE {
                        let px = origin_x + col * TEXT_SCALE + sx;
                        let py = row_index as u32 * TEXT_SCALE + sy;
                        let offset = (py as usize * width as usize + px as usize) * 4;
                        rgba[offset..offset + 4].copy_from_slice(&color);
                    }
                }
            }
        }
    }

    (width, height, rgba)
}

const SPACE_ROWS: [u8; 5] = [0, 0, 0, 0, 0];
const UNKNOWN_ROWS: [u8; 5] = [0b111, 0b111, 0b111, 0b111, 0b111];

fn glyph_rows(ch: char) -> [u8; 5] {
    match ch.to_ascii_uppercase() {
        ' ' => SPACE_ROWS,
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b110, 0b101, 0b010],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b010, 0b101, 0b010, 0b101, 0b010],
        '9' => [0b010, 0b101, 0b011, 0b001, 0b110],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b110, 0b001, 0b010, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        _ => UNKNOWN_ROWS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(rgba: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = (y as usize * width as usize + x as usize) * 4;
        [rgba[offset], rgba[offset + 1], rgba[offset + 2], rgba[offset + 3]]
    }

    #[test]
    fn empty_text_yields_single_transparent_pixel() {
        let (width, height, rgba) = rasterize_text("", TextColor::White);
        assert_eq!((width, height), (1, 1));
        assert_eq!(rgba, vec![0, 0, 0, 0]);
    }

    #[test]
    fn width_scales_with_character_count() {
        let (width, height, _) = rasterize_text("ABC", TextColor::White);
        assert_eq!(width, 3 * GLYPH_ADVANCE);
        assert_eq!(height, TEXT_HEIGHT);
    }

    #[test]
    fn glyph_pixels_carry_the_requested_color() {
        let (width, _, rgba) = rasterize_text("T", TextColor::Red);
        // Top row of 'T' is fully lit; its first pixel is at the origin.
        assert_eq!(pixel(&rgba, width, 0, 0), TextColor::Red.rgba());
        // The column gap after the glyph stays transparent.
        assert_eq!(pixel(&rgba, width, GLYPH_WIDTH * TEXT_SCALE, 0)[3], 0);
    }

    #[test]
    fn lowercase_renders_like_uppercase() {
        let lower = rasterize_text("abc", TextColor::White);
        let upper = rasterize_text("ABC", TextColor::White);
        assert_eq!(lower, upper);
    }

    #[test]
    fn unknown_characters_render_as_filled_blocks() {
        let (width, _, rgba) = rasterize_text("\u{00e9}", TextColor::White);
        for y in 0..TEXT_HEIGHT {
            for x in 0..(GLYPH_WIDTH * TEXT_SCALE) {
                assert_eq!(pixel(&rgba, width, x, y)[3], 255);
            }
        }
    }
}
