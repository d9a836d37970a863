//! Pure pagination math for the document export.
//!
//! Text wrapping and the page-overflow check share the same measurement
//! (Helvetica advance widths in thousandths of an em), so a paragraph never
//! wraps by one rule and paginates by another.

/// A4 page size in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

/// Default page margins in points.
pub const MARGIN: f32 = 54.0;

/// Usable content width between the side margins.
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // 'A'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // 'a'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Advance width of one character in 1/1000 em. Characters outside the
/// table use a typical Helvetica advance.
pub fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        ASCII_WIDTHS[(code - 32) as usize]
    } else {
        556
    }
}

/// Width of a string at the given font size, in points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let milli: u32 = text.chars().map(|c| char_width(c) as u32).sum();
    milli as f32 * size / 1000.0
}

/// Greedy word wrap to `max_width` points at `size`.
///
/// Words wider than the content width are hard-broken mid-word so no output
/// line ever exceeds `max_width`. Empty input yields no lines.
pub fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while text_width(word, size) > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut end = 0;
            let mut width = 0.0;
            for (i, c) in word.char_indices() {
                let cw = char_width(c) as f32 * size / 1000.0;
                if width + cw > max_width && end > 0 {
                    break;
                }
                width += cw;
                end = i + c.len_utf8();
            }
            lines.push(word[..end].to_string());
            word = &word[end..];
        }
        if word.is_empty() {
            continue;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if text_width(&format!("{current} {word}"), size) <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ============================================================================
// Page cursor
// ============================================================================

/// A running vertical cursor over a sequence of pages.
///
/// `y` is measured downward from the page top. Placing a block that would
/// cross the bottom margin starts a new page and resets the cursor to the
/// top margin before placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    page: usize,
    y: f32,
    top: f32,
    max_y: f32,
}

impl PageCursor {
    /// Cursor over pages with the given top margin and bottom boundary
    /// (distance from page top at which content must stop).
    pub fn new(top: f32, max_y: f32) -> Self {
        Self {
            page: 0,
            y: top,
            top,
            max_y,
        }
    }

    /// Cursor with the default A4 margins.
    pub fn a4() -> Self {
        Self::new(MARGIN, PAGE_HEIGHT - MARGIN)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Whether a block of `height` fits above the bottom boundary.
    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.max_y
    }

    /// Reserves `height` and returns the (page, y) at which the block
    /// starts. Breaks to a fresh page first if the block would overflow,
    /// unless the cursor already sits at the top margin, in which case the
    /// oversized block is placed anyway rather than looping forever.
    pub fn place(&mut self, height: f32) -> (usize, f32) {
        if !self.fits(height) && self.y > self.top {
            self.break_page();
        }
        let at = (self.page, self.y);
        self.y += height;
        at
    }

    /// Adds vertical spacing without triggering a page break.
    pub fn advance(&mut self, height: f32) {
        self.y += height;
    }

    /// Starts a new page with the cursor back at the top margin.
    pub fn break_page(&mut self) {
        self.page += 1;
        self.y = self.top;
    }
}

// ============================================================================
// Tests
// ============================================================================
