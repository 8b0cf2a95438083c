use std::io::{self, Write};

use crossterm::cursor;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType};

use crate::app::Model;
use crate::editor::Line;
use crate::highlight::{DEFAULT_FOREGROUND, Highlight};

use super::status;

/// Welcome banner shown on an empty buffer.
pub fn welcome_message() -> String {
    format!("Kilo editor -- version {}", env!("CARGO_PKG_VERSION"))
}

/// Compose one full frame into `out`.
///
/// The caller writes the accumulated bytes to the terminal in one go.
pub fn render(model: &Model, out: &mut impl Write) -> io::Result<()> {
    queue!(out, cursor::Hide, cursor::MoveTo(0, 0))?;
    draw_rows(model, out)?;
    draw_status_bar(model, out)?;
    draw_message_bar(model, out)?;

    let rx = model.buffer.render_col(model.cursor);
    let row = model.cursor.line.saturating_sub(model.viewport.row_offset());
    let col = rx.saturating_sub(model.viewport.col_offset());
    queue!(
        out,
        cursor::MoveTo(to_u16(col), to_u16(row)),
        cursor::Show
    )
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn draw_rows(model: &Model, out: &mut impl Write) -> io::Result<()> {
    let rows = usize::from(model.viewport.height());
    let cols = usize::from(model.viewport.width());
    let visible = model.viewport.visible_range(model.buffer.line_count());
    let drawn = visible.len();

    for line in &model.buffer.lines()[visible] {
        draw_line(line, model.viewport.col_offset(), cols, out)?;
        end_row(out)?;
    }
    for y in drawn..rows {
        if model.buffer.line_count() == 0 && y == rows / 3 {
            draw_welcome(cols, out)?;
        } else {
            out.write_all(b"~")?;
        }
        end_row(out)?;
    }
    Ok(())
}

fn end_row(out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::UntilNewLine))?;
    out.write_all(b"\r\n")
}

/// Select one of the eight base foreground colors (or 39 for default).
fn set_color(out: &mut impl Write, code: u8) -> io::Result<()> {
    write!(out, "\x1b[{code}m")
}

fn draw_welcome(cols: usize, out: &mut impl Write) -> io::Result<()> {
    let welcome = status::truncate_to_width(&welcome_message(), cols);
    let mut padding = cols.saturating_sub(welcome.chars().count()) / 2;
    if padding > 0 {
        out.write_all(b"~")?;
        padding -= 1;
    }
    queue!(out, Print(" ".repeat(padding)), Print(welcome))
}

/// Printable stand-in for a control character: `^A` shows as `A`.
fn control_symbol(ch: char) -> char {
    u8::try_from(ch)
        .ok()
        .filter(|&byte| byte <= 26)
        .map_or('?', |byte| char::from(b'@' + byte))
}

/// Draw the visible slice of one line, switching colors only when the
/// highlight class changes.
fn draw_line(line: &Line, col_offset: usize, cols: usize, out: &mut impl Write) -> io::Result<()> {
    let render = line.render();
    let start = col_offset.min(render.len());
    let end = (start + cols).min(render.len());
    let mut current: Option<u8> = None;

    for (&ch, &class) in render[start..end]
        .iter()
        .zip(&line.highlights()[start..end])
    {
        if ch.is_control() {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(control_symbol(ch)),
                SetAttribute(Attribute::Reset)
            )?;
            if let Some(code) = current {
                set_color(out, code)?;
            }
        } else if class == Highlight::Normal {
            if current.take().is_some() {
                set_color(out, DEFAULT_FOREGROUND)?;
            }
            queue!(out, Print(ch))?;
        } else {
            let code = class.color();
            if current != Some(code) {
                current = Some(code);
                set_color(out, code)?;
            }
            queue!(out, Print(ch))?;
        }
    }
    set_color(out, DEFAULT_FOREGROUND)
}

fn draw_status_bar(model: &Model, out: &mut impl Write) -> io::Result<()> {
    let cols = usize::from(model.viewport.width());
    queue!(
        out,
        SetAttribute(Attribute::Reverse),
        Print(status::status_line(model, cols)),
        SetAttribute(Attribute::Reset)
    )?;
    out.write_all(b"\r\n")
}

fn draw_message_bar(model: &Model, out: &mut impl Write) -> io::Result<()> {
    queue!(out, Clear(ClearType::UntilNewLine))?;
    if let Some(message) = status::message_line(model, usize::from(model.viewport.width())) {
        queue!(out, Print(message))?;
    }
    Ok(())
}
