//! ANSI rendering of the editor's visible rows
//!
//! Marks carry `color: <name>` declarations; the names of the default
//! palette map to 24-bit terminal colours here.

use crate::editor::{Editor, Pos, PositionIndex, TextWidget};

/// RGB values of the CSS colour names used by the default palette
fn rgb_for(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name {
        "blue" => (0, 0, 255),
        "chocolate" => (210, 105, 30),
        "darkblue" => (0, 0, 139),
        "darkcyan" => (0, 139, 139),
        "darkgreen" => (0, 100, 0),
        "darkred" => (139, 0, 0),
        "darkslategray" => (47, 79, 79),
        "dimgray" => (105, 105, 105),
        "green" => (0, 128, 0),
        "indigo" => (75, 0, 130),
        "navy" => (0, 0, 128),
        "red" => (255, 0, 0),
        "sienna" => (160, 82, 45),
        _ => return None,
    };
    Some(rgb)
}

/// Colour name out of a `color: <name>` declaration
fn color_name(css: &str) -> Option<&str> {
    css.split(';').find_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        (property.trim() == "color").then(|| value.trim())
    })
}

/// Render the editor's viewport, one string per row, with marks coloured.
///
/// When marks overlap, the first one installed wins.
pub fn render_viewport(editor: &Editor) -> Vec<String> {
    let rows = editor.viewport();
    let mut out = Vec::with_capacity(rows.end - rows.start + 1);

    for row in rows.start..=rows.end {
        let Some(line) = editor.line(row) else {
            break;
        };
        let line_start = editor.index_from_pos(Pos::new(row, 0));
        let line_end = line_start + line.len();

        // Colour per byte of the line
        let mut colors: Vec<Option<(u8, u8, u8)>> = vec![None; line.len()];
        for mark in editor.marks() {
            if mark.end <= line_start || mark.start >= line_end {
                continue;
            }
            let Some(rgb) = color_name(&mark.options.css).and_then(rgb_for) else {
                continue;
            };
            let from = mark.start.max(line_start) - line_start;
            let to = mark.end.min(line_end) - line_start;
            for slot in colors[from..to].iter_mut().filter(|c| c.is_none()) {
                *slot = Some(rgb);
            }
        }

        let mut rendered = String::with_capacity(line.len() * 2);
        let mut current = None;
        for (offset, ch) in line.char_indices() {
            let color = colors[offset];
            if color != current {
                match color {
                    Some((r, g, b)) => rendered.push_str(&format!("\x1b[38;2;{};{};{}m", r, g, b)),
                    None => rendered.push_str("\x1b[0m"),
                }
                current = color;
            }
            rendered.push(ch);
        }
        if current.is_some() {
            rendered.push_str("\x1b[0m");
        }
        out.push(rendered);
    }
    out
}
