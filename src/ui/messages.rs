//! User-facing status lines. Colors are dropped when the stream is not a
//! terminal so that piped output and test captures stay plain.

use std::fmt;
use std::io::{IsTerminal, stderr, stdout};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn styled(color: &str, icon: &str, msg: impl fmt::Display, tty: bool) -> String {
    if tty {
        format!("{color}{BOLD}{icon} {RESET}{msg}")
    } else {
        format!("{icon} {msg}")
    }
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_BLUE, ICON_INFO, msg, stdout().is_terminal()));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_GREEN, ICON_OK, msg, stdout().is_terminal()));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", styled(FG_YELLOW, ICON_WARN, msg, stdout().is_terminal()));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", styled(FG_RED, ICON_ERR, msg, stderr().is_terminal()));
}
