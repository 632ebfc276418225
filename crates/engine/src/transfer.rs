// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command line for the rsync transfer into a container's writable layer.

use lp_core::{EngineFlavor, IgnorePatterns, Transport};
use std::borrow::Cow;

/// One rsync invocation mirroring the current directory to `destination`
/// on the transport's host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCommand {
    transport: Transport,
    destination: String,
    rsync_path: Option<String>,
    patterns: IgnorePatterns,
    progress: bool,
    verbose: bool,
}

impl TransferCommand {
    pub fn new(transport: Transport, destination: impl Into<String>) -> Self {
        Self {
            transport,
            destination: destination.into(),
            rsync_path: None,
            patterns: IgnorePatterns::default(),
            progress: false,
            verbose: false,
        }
    }

    lp_core::setters! {
        set {
            patterns: IgnorePatterns,
            progress: bool,
            verbose: bool,
        }
        option {
            rsync_path: String,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Render the command line, to be run from the source directory.
    ///
    /// Includes are emitted before excludes: rsync applies the first
    /// matching rule.
    pub fn to_command_line(&self) -> String {
        let mut args: Vec<String> = Vec::new();
        args.push(if self.verbose { "-azv" } else { "-az" }.to_string());
        if self.progress {
            args.push("--progress".to_string());
        }
        args.push(format!("--rsh={}", quote(&self.transport.ssh_command())));
        args.push("--delete".to_string());
        if let Some(path) = &self.rsync_path {
            args.push(format!("--rsync-path={}", quote(path)));
        }
        for pattern in &self.patterns.include {
            args.push(format!("--include={}", quote(pattern)));
        }
        for pattern in &self.patterns.exclude {
            args.push(format!("--exclude={}", quote(pattern)));
        }
        args.push(".".to_string());
        let target =
            format!("{}@{}:{}", self.transport.user, self.transport.host, self.destination);
        args.push(quote(&target).into_owned());

        format!("rsync {}", args.join(" "))
    }
}

/// Remote-side rsync wrapper: create `destination` and run rsync inside the
/// runtime daemon's mount namespace, where container layers are visible.
pub fn remote_wrapper(destination: &str, flavor: EngineFlavor) -> String {
    format!(
        "mkdir -p \"{}\" && nsenter --target $(cat {}) --mount rsync",
        escape_double_quoted(destination),
        flavor.pid_file()
    )
}

/// Double-quote `arg` for `/bin/sh` when it holds whitespace or characters
/// special inside double quotes. Other arguments pass through, so glob
/// patterns such as `lib/*` reach rsync unchanged.
pub(crate) fn quote(arg: &str) -> Cow<'_, str> {
    let needs_quotes = arg.is_empty()
        || arg.chars().any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '\\' | '$'));
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", escape_double_quoted(arg)))
    } else {
        Cow::Borrowed(arg)
    }
}

fn escape_double_quoted(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len());
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '\\' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "transfer_tests.rs"]
mod tests;
