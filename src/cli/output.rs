//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Data goes to
//! stdout, diagnostics to stderr.

use std::fmt::Display;

use colored::Colorize;
use itertools::Itertools;

use crate::domain::{ItemId, ParentId};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

/// One item per line: id, label, parent (tab separated)
pub fn item(id: &ItemId, label: &str, parent: &ParentId) {
    println!("{}\t{}\t{}", id.to_string().bold(), label, parent.to_string().dimmed());
}

/// Ids removed by a cascade delete
pub fn removed(ids: &[ItemId]) {
    println!("{}: {}", "removed".green(), ids.iter().join(", "));
}

/// Item stored but not reachable from any root
pub fn dangling(id: &ItemId, parent: &ParentId) {
    println!(
        "  {} {} (parent {} does not lead to a root)",
        "✗".red(),
        id,
        parent
    );
}
