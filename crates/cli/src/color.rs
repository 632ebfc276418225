// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

pub mod codes {
    /// Section headers and success lines: steel blue
    pub const HEADER: u8 = 74;
    /// Flags and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders: medium grey
    pub const CONTEXT: u8 = 245;
    /// Error prefix: soft red
    pub const ERROR: u8 = 167;
}

/// `NO_COLOR=1` disables, `COLOR=1` forces, otherwise color iff the stream is a TTY.
fn enabled(is_terminal: bool) -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    is_terminal
}

pub fn stdout_enabled() -> bool {
    enabled(std::io::stdout().is_terminal())
}

pub fn stderr_enabled() -> bool {
    enabled(std::io::stderr().is_terminal())
}

/// clap help styles in the project palette.
pub fn styles() -> Styles {
    if !stdout_enabled() {
        return Styles::plain();
    }
    Styles::styled()
        .header(fg(codes::HEADER))
        .usage(fg(codes::HEADER))
        .literal(fg(codes::LITERAL))
        .placeholder(fg(codes::CONTEXT))
        .error(fg(codes::ERROR))
}

fn fg(code: u8) -> Style {
    Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))))
}

fn paint(code: u8, text: &str, on: bool) -> String {
    if on {
        format!("\x1b[38;5;{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Summary line printed to stdout.
pub fn header(text: &str) -> String {
    paint(codes::HEADER, text, stdout_enabled())
}

/// Error prefix printed to stderr.
pub fn error(text: &str) -> String {
    paint(codes::ERROR, text, stderr_enabled())
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
