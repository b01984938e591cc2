//! Turns submitted editor lines into actions.
//!
//! Dragging files onto a terminal window pastes their paths, quoted or
//! backslash-escaped depending on the terminal, sometimes as `file://` URIs.
//! A line made only of existing file paths is therefore treated as a drop.

use std::path::{Path, PathBuf};

use url::Url;

use super::ui::constants::{CMD_EXPORT, CMD_EXIT, CMD_HELP, CMD_QUIT, CMD_STATUS, CMD_UPLOAD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Chat text, sent as typed; blank text is ignored downstream.
    Chat(String),
    /// Files dragged onto the terminal.
    Drop(Vec<PathBuf>),
    /// Files named through `/upload`; `missing` lists names that are not files.
    Browse {
        files: Vec<PathBuf>,
        missing: Vec<String>,
    },
    Refresh,
    Export(PathBuf),
    Help,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

pub fn parse_line(line: &str, is_file: impl Fn(&Path) -> bool) -> Action {
    let trimmed = line.trim();

    if let Some(paths) = dropped_paths(trimmed, &is_file) {
        return Action::Drop(paths);
    }

    if !trimmed.starts_with('/') {
        return Action::Chat(line.to_string());
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        CMD_UPLOAD => {
            let Some(words) = split_words(rest).filter(|words| !words.is_empty()) else {
                return Action::Usage("/upload <file> [file...]");
            };
            let (files, missing) = words.into_iter().fold(
                (Vec::new(), Vec::new()),
                |(mut files, mut missing), word| {
                    let path = to_path(&word);
                    if is_file(&path) {
                        files.push(path);
                    } else {
                        missing.push(word);
                    }
                    (files, missing)
                },
            );
            Action::Browse { files, missing }
        }
        CMD_STATUS => Action::Refresh,
        CMD_EXPORT => match split_words(rest).as_deref() {
            Some([path]) => Action::Export(to_path(path)),
            _ => Action::Usage("/export <file.html>"),
        },
        CMD_HELP => Action::Help,
        CMD_QUIT | CMD_EXIT => Action::Quit,
        other => Action::Unknown(other.to_string()),
    }
}

fn dropped_paths(line: &str, is_file: &impl Fn(&Path) -> bool) -> Option<Vec<PathBuf>> {
    let words = split_words(line)?;
    if words.is_empty() {
        return None;
    }
    let paths: Vec<PathBuf> = words.iter().map(|word| to_path(word)).collect();
    paths.iter().all(|path| is_file(path)).then_some(paths)
}

fn to_path(word: &str) -> PathBuf {
    if word.starts_with("file://") {
        if let Some(path) = Url::parse(word)
            .ok()
            .and_then(|url| url.to_file_path().ok())
        {
            return path;
        }
    }
    PathBuf::from(word)
}

/// Splits a line the way a shell would for pasted paths.
///
/// Returns `None` when a quote is left open.
fn split_words(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '\'' => break,
                        c => current.push(c),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next()? {
                        '"' => break,
                        '\\' => match chars.next()? {
                            c @ ('"' | '\\') => current.push(c),
                            c => {
                                current.push('\\');
                                current.push(c);
                            }
                        },
                        c => current.push(c),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}
