//! Interactive session driven by stdin lines.
//!
//! A plain line is typed into the postcode field and submitted with Enter.
//! Lines starting with `:` are commands, see [`HELP`].

use std::io::{self, BufRead};
use std::thread;

use anyhow::Result;
use stookwijzer::{Theme, UiEvent};
use stookwijzer_config::StookwijzerConfig;
use tokio::sync::mpsc;
use tracing::debug;

use crate::app;
use crate::style::{print_error, print_hint};

const HELP: &str = "postcode + Enter, :type <tekst>, :esc, :check <lat> <lon>, :locate, :demo, \
                    :refresh, :theme [dark|light], :quit";

#[derive(Debug, PartialEq)]
enum Line {
    Events(Vec<UiEvent>),
    Quit,
}

pub fn run(config: &StookwijzerConfig) -> Result<()> {
    app::async_runtime()?.block_on(async {
        let mut runtime = app::build(config)?;
        let (tx, rx) = mpsc::channel(16);

        // Stdin blocks; read it off the async thread.
        thread::spawn(move || read_lines(&tx));

        print_hint(HELP);
        runtime.dispatch(UiEvent::Startup);
        runtime.run(rx).await;
        Ok(())
    })
}

fn read_lines(tx: &mpsc::Sender<UiEvent>) {
    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        match parse_line(&line) {
            Ok(Line::Quit) => break,
            Ok(Line::Events(events)) => {
                for event in events {
                    if tx.blocking_send(event).is_err() {
                        return;
                    }
                }
            }
            Err(message) => print_error(&message),
        }
    }
    debug!("input closed");
}

fn parse_line(line: &str) -> Result<Line, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        if line.is_empty() {
            return Ok(Line::Events(Vec::new()));
        }
        return Ok(Line::Events(vec![
            UiEvent::PostcodeEdited(line.to_string()),
            UiEvent::PostcodeEnter,
        ]));
    };

    let mut words = command.split_whitespace();
    let event = match (words.next().unwrap_or_default(), words.next()) {
        ("q" | "quit", None) => return Ok(Line::Quit),
        ("esc", None) => UiEvent::PostcodeEscape,
        ("locate", None) => UiEvent::Locate,
        ("demo", None) => UiEvent::Demo,
        ("refresh", None) => UiEvent::Refresh,
        ("theme", None) => UiEvent::ToggleTheme,
        ("theme", Some(name @ ("dark" | "light"))) => UiEvent::SetTheme(Theme::from_name(Some(name))),
        ("type", _) => {
            let text = command.trim_start_matches("type").trim_start();
            UiEvent::PostcodeEdited(text.to_string())
        }
        ("check", latitude) => UiEvent::CheckCoordinates {
            latitude: latitude.unwrap_or_default().to_string(),
            longitude: words.next().unwrap_or_default().to_string(),
        },
        _ => return Err(format!("Onbekend commando: {line}. {HELP}")),
    };
    Ok(Line::Events(vec![event]))
}
