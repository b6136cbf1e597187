//! CSI (`ESC [ ... <terminator>`) parameter parsing and dispatch.
//!
//! Parameters are `;`-separated decimal runs; an empty run (`;;` or a bare
//! leading/trailing `;`) is its position's *default*, which each handler
//! interprets itself (usually as 0 or 1). This mirrors the per-byte
//! accumulation loop of the sequence's original driver, including the detail
//! that the terminator byte itself is what triggers the final parameter's
//! dispatch.

use smallvec::SmallVec;

use pc_cell::StyleFlags;
use pc_color::{colour_8_to_24, Color};

use crate::{Term, TermError};

/// One parsed CSI parameter: its position, whether it was left empty
/// (the default), and its numeric value (0 when defaulted).
#[derive(Debug, Clone, Copy)]
struct Param {
    is_default: bool,
    value: u32,
}

/// Split the parameter bytes of a CSI sequence (everything before the final
/// terminator byte) into its `;`-separated runs.
fn parse_params(body: &[u8]) -> SmallVec<[Param; 8]> {
    let mut params = SmallVec::new();
    let mut value: u32 = 0;
    let mut has_digits = false;

    for &b in body {
        match b {
            b'0'..=b'9' => {
                has_digits = true;
                value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
            }
            b';' => {
                params.push(Param {
                    is_default: !has_digits,
                    value,
                });
                value = 0;
                has_digits = false;
            }
            _ => {}
        }
    }
    params.push(Param {
        is_default: !has_digits,
        value,
    });
    params
}

/// Entry point: `csi` holds every byte of the sequence including the
/// terminator, not including the leading `ESC [`.
pub(crate) fn process(term: &mut Term, csi: &[u8]) -> Result<(), TermError> {
    let Some((&terminator, body)) = csi.split_last() else {
        return Err(TermError::Malformed);
    };

    // Private/mode-setting sequences (DEC private marks, Set Mode (`h`),
    // and window-manipulation/report sequences) carry no visible effect in
    // this model and are accepted silently. Reset Mode (`l`) is not in this
    // list: a bare `ESC[...l` falls through to dispatch below and comes
    // back `Unsupported`.
    if body
        .iter()
        .any(|&b| matches!(b, b'<' | b'=' | b'>' | b'?'))
        || matches!(terminator, b'h' | 0x70..=0x7E)
    {
        return Ok(());
    }

    // Vim on macOS (with `t_Co=2`) emits a spurious `ESC[31<digit>m` with no
    // defined meaning, which every other platform does not produce; it is
    // consumed here without effect.
    if cfg!(target_os = "macos")
        && terminator == b'm'
        && body.len() == 3
        && body[0] == b'3'
        && body[1] == b'1'
        && body[2].is_ascii_digit()
    {
        return Ok(());
    }

    let params = parse_params(body);

    match terminator {
        b'A' => process_a(term, &params),
        b'B' => process_b(term, &params),
        b'C' => process_c(term, &params),
        b'D' => process_d(term, &params),
        b'E' => process_e(term, &params),
        b'F' => process_f(term, &params),
        b'G' => process_g(term, &params),
        b'H' => process_h(term, &params),
        b'J' => process_j(term, &params),
        b'm' => {
            if let Some(result) = try_extended_sgr(term, &params) {
                result
            } else {
                process_m(term, &params)
            }
        }
        _ => Err(TermError::Unsupported),
    }
}

fn count_or_one(params: &[Param]) -> usize {
    match params.first() {
        Some(p) if !p.is_default && p.value > 0 => p.value as usize,
        _ => 1,
    }
}

fn process_a(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    let n = count_or_one(params);
    term.y = term.y.saturating_sub(n).max(1);
    Ok(())
}

fn process_b(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    let n = count_or_one(params);
    term.y = (term.y + n).min(term.rows);
    Ok(())
}

fn process_c(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    let n = count_or_one(params);
    term.x = (term.x + n).min(term.columns);
    Ok(())
}

fn process_d(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    let n = count_or_one(params);
    term.x = term.x.saturating_sub(n).max(1);
    Ok(())
}

fn process_e(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    term.x = 1;
    process_b(term, params)
}

fn process_f(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    term.x = 1;
    process_a(term, params)
}

fn process_g(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    let n = match params.first() {
        Some(p) if !p.is_default && p.value > 0 => p.value as usize,
        _ => 1,
    };
    if n <= term.columns {
        term.x = n;
    }
    Ok(())
}

/// A parameter present at a given position, resolved to its numeric value
/// (a present-but-empty run defaults to 1). `None` means the position has
/// no parameter at all, which is distinct from a present default — absent
/// axes are left untouched by the caller rather than reset to 1.
fn resolve(param: Option<&Param>) -> Option<usize> {
    param.map(|p| if p.is_default { 1 } else { p.value as usize })
}

fn process_h(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    if let Some(row) = resolve(params.first()) {
        if row <= term.rows {
            term.y = row;
        }
    }
    if let Some(col) = resolve(params.get(1)) {
        if col <= term.columns {
            term.x = col;
        }
    }
    Ok(())
}

fn process_j(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    let mode = params.first().map_or(0, |p| if p.is_default { 0 } else { p.value });
    match mode {
        0 => {
            let from = term.index(term.x, term.y);
            for cell in &mut term.grid[from..] {
                cell.clear();
            }
        }
        1 => {
            let upto = term.index(term.x, term.y);
            for cell in &mut term.grid[..=upto] {
                cell.clear();
            }
        }
        2 | 3 => {
            for cell in &mut term.grid {
                cell.clear();
            }
        }
        _ => return Err(TermError::Malformed),
    }
    Ok(())
}

fn process_m(term: &mut Term, params: &[Param]) -> Result<(), TermError> {
    if params.iter().all(|p| p.is_default) && params.len() == 1 {
        term.style = pc_cell::Style::default();
        return Ok(());
    }
    for p in params {
        let code = if p.is_default { 0 } else { p.value };
        match code {
            0 => term.style = pc_cell::Style::default(),
            1 => term.style.flags |= StyleFlags::BOLD,
            22 => term.style.flags -= StyleFlags::BOLD,
            4 => term.style.flags |= StyleFlags::UNDERLINE,
            24 => term.style.flags -= StyleFlags::UNDERLINE,
            23 | 25 | 27 | 28 | 29 => {}
            30..=37 => {
                term.style.fg = colour_8_to_24((code - 30) as u8);
                term.style.flags |= StyleFlags::CUSTOM_FG;
            }
            39 => term.style.flags -= StyleFlags::CUSTOM_FG,
            40..=47 => {
                term.style.bg = colour_8_to_24((code - 40) as u8);
                term.style.flags |= StyleFlags::CUSTOM_BG;
            }
            49 => term.style.flags -= StyleFlags::CUSTOM_BG,
            90..=97 => {
                term.style.fg = colour_8_to_24((code - 90 + 8) as u8);
                term.style.flags |= StyleFlags::CUSTOM_FG;
            }
            100..=107 => {
                term.style.bg = colour_8_to_24((code - 100 + 8) as u8);
                term.style.flags |= StyleFlags::CUSTOM_BG;
            }
            _ => return Err(TermError::Unsupported),
        }
    }
    Ok(())
}

/// Handle the extended-color SGR forms `38;5;<idx>`, `48;5;<idx>`,
/// `38;2;<r>;<g>;<b>`, `48;2;<r>;<g>;<b>` ahead of the generic dispatch.
///
/// Returns `None` when `params` does not start with a recognized extended
/// prefix (or the prefix is malformed), so the caller falls through to
/// [`process_m`], whose match has no arm for a bare `38`/`48` and so
/// naturally yields [`TermError::Unsupported`] — the same layered fallback
/// the sequence's original handling used.
fn try_extended_sgr(term: &mut Term, params: &[Param]) -> Option<Result<(), TermError>> {
    let target = params.first()?;
    if target.is_default {
        return None;
    }
    let is_fg = match target.value {
        38 => true,
        48 => false,
        _ => return None,
    };

    let mode = params.get(1)?;
    match mode.value {
        5 => {
            let idx = params.get(2)?;
            let color = colour_8_to_24(u8::try_from(idx.value).ok()?);
            apply_extended(term, is_fg, color);
            Some(Ok(()))
        }
        2 => {
            let r = params.get(2)?;
            let g = params.get(3)?;
            let b = params.get(4)?;
            let color = Color::new(
                u8::try_from(r.value).ok()?,
                u8::try_from(g.value).ok()?,
                u8::try_from(b.value).ok()?,
            );
            apply_extended(term, is_fg, color);
            Some(Ok(()))
        }
        _ => None,
    }
}

fn apply_extended(term: &mut Term, is_fg: bool, color: Color) {
    if is_fg {
        term.style.fg = color;
        term.style.flags |= StyleFlags::CUSTOM_FG;
    } else {
        term.style.bg = color;
        term.style.flags |= StyleFlags::CUSTOM_BG;
    }
}
