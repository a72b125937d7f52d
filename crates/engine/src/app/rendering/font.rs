pub(crate) const GLYPH_WIDTH: i32 = 3;
pub(crate) const GLYPH_HEIGHT: i32 = 5;

/// Packs five 3-bit rows, top row first, into one bitmask.
const fn pack(rows: [u16; 5]) -> u16 {
    (rows[0] << 12) | (rows[1] << 9) | (rows[2] << 6) | (rows[3] << 3) | rows[4]
}

const BLANK: u16 = 0;
const UNKNOWN: u16 = pack([0b111, 0b001, 0b010, 0b000, 0b010]);

const DIGITS: [u16; 10] = [
    pack([0b111, 0b101, 0b101, 0b101, 0b111]),
    pack([0b010, 0b110, 0b010, 0b010, 0b111]),
    pack([0b111, 0b001, 0b111, 0b100, 0b111]),
    pack([0b111, 0b001, 0b111, 0b001, 0b111]),
    pack([0b101, 0b101, 0b111, 0b001, 0b001]),
    pack([0b111, 0b100, 0b111, 0b001, 0b111]),
    pack([0b111, 0b100, 0b111, 0b101, 0b111]),
    pack([0b111, 0b001, 0b001, 0b010, 0b010]),
    pack([0b111, 0b101, 0b111, 0b101, 0b111]),
    pack([0b111, 0b101, 0b111, 0b001, 0b111]),
];

const LETTERS: [u16; 26] = [
    pack([0b010, 0b101, 0b111, 0b101, 0b101]),
    pack([0b110, 0b101, 0b110, 0b101, 0b110]),
    pack([0b011, 0b100, 0b100, 0b100, 0b011]),
    pack([0b110, 0b101, 0b101, 0b101, 0b110]),
    pack([0b111, 0b100, 0b110, 0b100, 0b111]),
    pack([0b111, 0b100, 0b110, 0b100, 0b100]),
    pack([0b011, 0b100, 0b101, 0b101, 0b011]),
    pack([0b101, 0b101, 0b111, 0b101, 0b101]),
    pack([0b111, 0b010, 0b010, 0b010, 0b111]),
    pack([0b001, 0b001, 0b001, 0b101, 0b010]),
    pack([0b101, 0b101, 0b110, 0b101, 0b101]),
    pack([0b100, 0b100, 0b100, 0b100, 0b111]),
    pack([0b101, 0b111, 0b111, 0b101, 0b101]),
    pack([0b110, 0b101, 0b101, 0b101, 0b101]),
    pack([0b010, 0b101, 0b101, 0b101, 0b010]),
    pack([0b110, 0b101, 0b110, 0b100, 0b100]),
    pack([0b010, 0b101, 0b101, 0b110, 0b011]),
    pack([0b110, 0b101, 0b110, 0b101, 0b101]),
    pack([0b011, 0b100, 0b010, 0b001, 0b110]),
    pack([0b111, 0b010, 0b010, 0b010, 0b010]),
    pack([0b101, 0b101, 0b101, 0b101, 0b111]),
    pack([0b101, 0b101, 0b101, 0b101, 0b010]),
    pack([0b101, 0b101, 0b111, 0b111, 0b101]),
    pack([0b101, 0b101, 0b010, 0b101, 0b101]),
    pack([0b101, 0b101, 0b010, 0b010, 0b010]),
    pack([0b111, 0b001, 0b010, 0b100, 0b111]),
];

pub(crate) fn glyph_bits(ch: char) -> u16 {
    match ch {
        ' ' => BLANK,
        '0'..='9' => DIGITS[ch as usize - '0' as usize],
        'A'..='Z' => LETTERS[ch as usize - 'A' as usize],
        'a'..='z' => LETTERS[ch as usize - 'a' as usize],
        '.' => pack([0b000, 0b000, 0b000, 0b000, 0b010]),
        ',' => pack([0b000, 0b000, 0b000, 0b010, 0b100]),
        ':' => pack([0b000, 0b010, 0b000, 0b010, 0b000]),
        '-' => pack([0b000, 0b000, 0b111, 0b000, 0b000]),
        '+' => pack([0b000, 0b010, 0b111, 0b010, 0b000]),
        '/' => pack([0b001, 0b001, 0b010, 0b100, 0b100]),
        '%' => pack([0b101, 0b001, 0b010, 0b100, 0b101]),
        '(' => pack([0b001, 0b010, 0b010, 0b010, 0b001]),
        ')' => pack([0b100, 0b010, 0b010, 0b010, 0b100]),
        _ => UNKNOWN,
    }
}

pub(crate) fn glyph_pixel(bits: u16, column: i32, row: i32) -> bool {
    let shift = (GLYPH_HEIGHT - 1 - row) * GLYPH_WIDTH + (GLYPH_WIDTH - 1 - column);
    bits & (1 << shift) != 0
}

pub(crate) fn glyph_advance(pixel_size: i32) -> i32 {
    (GLYPH_WIDTH + 1).saturating_mul(pixel_size)
}

pub(crate) fn line_advance(pixel_size: i32) -> i32 {
    (GLYPH_HEIGHT + 2).saturating_mul(pixel_size)
}
