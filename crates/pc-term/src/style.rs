//! Serializing a [`Style`] back out as the SGR parameters that would
//! recreate it.
//!
//! A transition always writes all four attribute groups (foreground,
//! background, bold, underline) rather than only the ones that changed —
//! this keeps a rendered row self-contained and replayable on its own,
//! matching the batched-reset-then-reapply style the sequence's renderer
//! produces around every attribute change.
//!
//! An extended-color token (`38;5;<idx>`, `38;2;<r>;<g>;<b>` and their `48;`
//! background counterparts) closes its CSI with `m` and immediately reopens
//! a fresh one (`\x1b[`) rather than continuing with a plain `;`, so that
//! whatever follows it — background, bold, underline — parses as its own
//! SGR parameter list instead of trailing off the end of the extended
//! token's fixed parameter count, where `csi::process` would silently drop
//! it.

use std::io::Write;

use pc_cell::Style;
use pc_color::colour_24_to_8;

pub(crate) fn write_transition(stage: &mut pc_buf::StageBuffer, style: Style) {
    let _ = stage.write_all(b"\x1b[");
    write_fg_token(stage, style);
    write_bg_token(stage, style);
    write_int(stage, if style.is_bold() { 1 } else { 22 });
    let _ = stage.write_all(b";");
    write_int(stage, if style.is_underline() { 4 } else { 24 });
    let _ = stage.write_all(b"m");
}

/// Writes the foreground token, including its own trailing separator —
/// either a plain `;` (the token stays inside the current CSI) or `m\x1b[`
/// (the token closed its CSI and opened a new one).
fn write_fg_token(stage: &mut pc_buf::StageBuffer, style: Style) {
    if !style.has_custom_fg() {
        write_int(stage, 39);
        let _ = stage.write_all(b";");
        return;
    }
    write_color_token(stage, style.fg, 30, 90, 38);
}

fn write_bg_token(stage: &mut pc_buf::StageBuffer, style: Style) {
    if !style.has_custom_bg() {
        write_int(stage, 49);
        let _ = stage.write_all(b";");
        return;
    }
    write_color_token(stage, style.bg, 40, 100, 48);
}

fn write_color_token(
    stage: &mut pc_buf::StageBuffer,
    color: pc_color::Color,
    base: u32,
    bright_base: u32,
    extended: u32,
) {
    match colour_24_to_8(color) {
        Some(idx) if idx < 8 => {
            write_int(stage, base + u32::from(idx));
            let _ = stage.write_all(b";");
        }
        Some(idx) if idx < 16 => {
            write_int(stage, bright_base + u32::from(idx - 8));
            let _ = stage.write_all(b";");
        }
        Some(idx) => {
            write_int(stage, extended);
            let _ = stage.write_all(b";5;");
            write_int(stage, u32::from(idx));
            let _ = stage.write_all(b"m\x1b[");
        }
        None => {
            write_int(stage, extended);
            let _ = stage.write_all(b";2;");
            write_int(stage, u32::from(color.r));
            let _ = stage.write_all(b";");
            write_int(stage, u32::from(color.g));
            let _ = stage.write_all(b";");
            write_int(stage, u32::from(color.b));
            let _ = stage.write_all(b"m\x1b[");
        }
    }
}

fn write_int(stage: &mut pc_buf::StageBuffer, value: u32) {
    let mut buf = itoa::Buffer::new();
    let _ = stage.write_all(buf.format(value).as_bytes());
}
