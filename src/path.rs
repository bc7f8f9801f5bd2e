//! Lexical path resolution. Everything here is pure string algebra
//! over bounded owned strings; nothing touches the filesystem.

use crate::{Error, Result};

/// Capacity bound for constructed paths. Construction that would grow
/// past this fails with [`Error::Nametoolong`] instead of truncating.
pub const PATH_MAX: usize = 1024;

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Fold runs of separator characters (forward or backward slash) into
/// exactly one `/`.
///
/// The folded form is always rooted: a leading separator run, or none
/// at all, both fold to the single leading `/`, so the result is never
/// empty.
pub fn fold_separators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    let mut run = true;
    for c in raw.chars() {
        if is_separator(c) {
            run = true;
        } else {
            if run {
                out.push('/');
                run = false;
            }
            out.push(c);
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Append the relative path `rel` onto the absolute path already in
/// `base`, resolving `.` and `..` segment by segment.
///
/// Empty segments (separator runs) and `.` are dropped; `..` pops one
/// already-built component and cannot ascend past the root; any other
/// segment is appended after a single `/`. An empty `rel` leaves
/// `base` unchanged. The result never contains a `//` run and never
/// ends in a `/.` or `/..` segment.
pub fn normalize_onto(base: &mut String, rel: &str) -> Result<()> {
    for segment in rel.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                // Pop one component: retreat to the previous `/`.
                while base.len() > 1 && base.ends_with('/') {
                    base.pop();
                }
                if let Some(cut) = base.rfind('/') {
                    base.truncate(cut);
                }
            }
            name => {
                if !base.ends_with('/') {
                    base.push('/');
                }
                base.push_str(name);
                if base.len() > PATH_MAX {
                    return Err(Error::Nametoolong);
                }
            }
        }
    }
    if base.is_empty() {
        base.push('/');
    }
    log::trace!("normalize_onto -> {:?}", base);
    Ok(())
}
