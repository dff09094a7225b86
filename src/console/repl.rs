//! Operator REPL - stdin line to console event
//!
//! 操作ラインをConsoleEventへ変換して投入する

use super::ConsoleEvent;
use crate::command_gateway::{PtzDirection, ZoomKind};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Parse one operator line into an event.
///
/// Returns None for blank lines and unknown commands.
pub fn parse_line(line: &str) -> Option<ConsoleEvent> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next()?;
    let arg = tokens.next();

    match (command, arg) {
        ("go", Some(fragment)) => Some(ConsoleEvent::Navigate(fragment.to_string())),
        ("back", None) => Some(ConsoleEvent::Back),
        ("drop", Some(id)) => Some(ConsoleEvent::DropCamera(id.to_string())),
        ("click", Some(id)) | ("select", Some(id)) => {
            Some(ConsoleEvent::ClickStream(id.to_string()))
        }
        ("min", Some(id)) => Some(ConsoleEvent::Minimize(id.to_string())),
        ("ptz", Some(dir)) => parse_direction(dir).map(ConsoleEvent::PtzPress),
        ("ptzstop", Some(dir)) => parse_direction(dir).map(ConsoleEvent::PtzRelease),
        ("zoom", Some(kind)) => parse_zoom(kind).map(ConsoleEvent::ZoomPress),
        ("zoomstop", Some(kind)) => parse_zoom(kind).map(ConsoleEvent::ZoomRelease),
        ("release", None) => Some(ConsoleEvent::PointerReleased),
        ("speed", Some(value)) => Some(ConsoleEvent::SpeedInput(value.to_string())),
        ("snap", None) => Some(ConsoleEvent::Snapshot),
        ("render", None) => Some(ConsoleEvent::Render),
        ("quit", None) | ("exit", None) => Some(ConsoleEvent::Shutdown),
        _ => None,
    }
}

fn parse_direction(s: &str) -> Option<PtzDirection> {
    match s.to_lowercase().as_str() {
        "up" => Some(PtzDirection::Up),
        "down" => Some(PtzDirection::Down),
        "left" => Some(PtzDirection::Left),
        "right" => Some(PtzDirection::Right),
        _ => None,
    }
}

fn parse_zoom(s: &str) -> Option<ZoomKind> {
    match s.to_lowercase().as_str() {
        "tele" | "zoomtele" | "in" => Some(ZoomKind::ZoomTele),
        "wide" | "zoomwide" | "out" => Some(ZoomKind::ZoomWide),
        _ => None,
    }
}

/// Read operator lines from stdin and feed the console queue.
///
/// Sends Shutdown when stdin closes.
pub fn spawn_stdin_source(tx: mpsc::UnboundedSender<ConsoleEvent>) {
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match parse_line(trimmed) {
                        Some(event) => {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                        None => {
                            tracing::warn!(line = %trimmed, "Unknown command");
                        }
                    }
                }
                Ok(None) => {
                    let _ = tx.send(ConsoleEvent::Shutdown);
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read operator input");
                    let _ = tx.send(ConsoleEvent::Shutdown);
                    break;
                }
            }
        }
    });
}
