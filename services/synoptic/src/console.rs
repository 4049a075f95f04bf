//! Interactive operator console for the headless binary.
//!
//! Commands and confirmation answers both come from standard input, so one
//! reader thread feeds a shared line channel and the command loop and the
//! confirmation prompt pull from the same place.

use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::backend::BackendClient;
use crate::calendar::{self, ActivityIndex, Navigator};
use crate::color;
use crate::engine::Engine;
use crate::player::HistoryPlayer;
use crate::registry::Registry;
use crate::session::SessionHandle;
use crate::surface::{Confirmer, ConsoleSurface, DiagramSurface};
use crate::toggle::ToggleController;

/// Lines typed by the operator, shared between the command loop and
/// confirmation prompts.
pub struct ConsoleInput {
    lines: Mutex<Receiver<String>>,
}

impl ConsoleInput {
    /// Spawn the stdin reader thread
    pub fn start() -> Arc<Self> {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for line in std::io::stdin().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self::from_receiver(rx)
    }

    fn from_receiver(rx: Receiver<String>) -> Arc<Self> {
        Arc::new(Self {
            lines: Mutex::new(rx),
        })
    }

    /// Next line typed, or None once stdin is closed
    pub fn next_line(&self) -> Option<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv()
            .ok()
    }
}

impl Confirmer for ConsoleInput {
    fn confirm(&self, prompt: &str) -> bool {
        println!("{} [y/N]", prompt);
        match self.next_line() {
            Some(line) => matches!(line.trim(), "y" | "Y" | "yes"),
            None => false,
        }
    }
}

async fn next_line(input: &Arc<ConsoleInput>) -> Option<String> {
    let input = Arc::clone(input);
    tokio::task::spawn_blocking(move || input.next_line())
        .await
        .unwrap_or(None)
}

/// Live console: mirror the apparatus and accept toggle commands while the
/// poll loop runs in the background.
pub async fn run_live(
    engine: Engine,
    registry: Arc<Registry>,
    surface: Arc<ConsoleSurface>,
    backend: Arc<BackendClient>,
    session: SessionHandle,
    interval: Duration,
    cancel: CancellationToken,
) -> crate::Result<()> {
    let input = ConsoleInput::start();
    let controller = ToggleController::new(
        Arc::clone(&registry),
        Arc::clone(&surface) as Arc<dyn DiagramSurface>,
        backend,
        Arc::clone(&input) as Arc<dyn Confirmer>,
        session,
    );

    let poll_cancel = cancel.clone();
    let poll_engine = engine.clone();
    let poll = tokio::spawn(async move {
        poll_engine.run_live(interval, poll_cancel).await;
    });

    println!("Commands: toggle <id>, show, quit");
    loop {
        let line = tokio::select! {
            line = next_line(&input) => line,
            _ = cancel.cancelled() => None,
        };
        let Some(line) = line else { break };

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("toggle"), Some(id)) => {
                if surface.is_interactive() {
                    controller.handle_click(std::iter::once(id)).await;
                } else {
                    println!("Toggling is disabled for this session");
                }
            }
            (Some("toggle"), None) => println!("Usage: toggle <id>"),
            (Some("show"), _) => print_fills(&registry, &surface),
            (Some("quit"), _) | (Some("exit"), _) => break,
            (Some(other), _) => println!("Unknown command '{}'", other),
            (None, _) => {}
        }
    }

    cancel.cancel();
    let _ = poll.await;
    Ok(())
}

/// History console: calendar navigation and event replay over an inert
/// diagram.
pub async fn run_history(
    engine: Engine,
    registry: Arc<Registry>,
    surface: Arc<ConsoleSurface>,
    cancel: CancellationToken,
) -> crate::Result<()> {
    let mut player = engine.start_history().await?;
    let index = calendar::build_index(player.events());
    let mut navigator = Navigator::new(player.events(), chrono::Local::now().date_naive());

    println!("Commands: cal, list, select <idx>, day <YYYY-MM-DD>, prev, next, today, show, quit");
    print_month(&navigator, &index);

    let input = ConsoleInput::start();
    loop {
        let line = tokio::select! {
            line = next_line(&input) => line,
            _ = cancel.cancelled() => None,
        };
        let Some(line) = line else { break };

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("cal"), _) => print_month(&navigator, &index),
            (Some("list"), _) => print_events(&player, &navigator),
            (Some("select"), Some(arg)) => match arg.parse::<usize>() {
                Ok(idx) => {
                    if let Err(e) = player.select_event(idx).await {
                        tracing::warn!("Fetching history state failed: {}", e);
                    }
                }
                Err(_) => println!("Usage: select <index>"),
            },
            (Some("day"), Some(arg)) => match arg.parse::<chrono::NaiveDate>() {
                Ok(date) => {
                    navigator.select_date(date);
                    print_events(&player, &navigator);
                }
                Err(_) => println!("Usage: day <YYYY-MM-DD>"),
            },
            (Some("prev"), _) => {
                navigator.prev_month();
                print_month(&navigator, &index);
            }
            (Some("next"), _) => {
                navigator.next_month();
                print_month(&navigator, &index);
            }
            (Some("today"), _) => {
                navigator.go_to_today(chrono::Local::now().date_naive());
                print_month(&navigator, &index);
            }
            (Some("show"), _) => print_fills(&registry, &surface),
            (Some("quit"), _) | (Some("exit"), _) => break,
            (Some(other), _) => println!("Unknown command '{}'", other),
            (None, _) => {}
        }
    }

    cancel.cancel();
    Ok(())
}

fn print_fills(registry: &Registry, surface: &ConsoleSurface) {
    for component in registry.iter() {
        let fill = surface
            .fill(&component.id)
            .unwrap_or_else(|| "unset".to_string());
        let status = color::status_for(&fill, &component.palette);
        println!("{:20} {:8} {}", component.id, status.to_string(), fill);
    }
}

fn print_month(navigator: &Navigator, index: &ActivityIndex) {
    println!(
        "{} (selected {})",
        navigator.visible_month().format("%B %Y"),
        navigator.selected()
    );
    for cell in navigator.day_cells(index) {
        if cell.count > 0 || cell.selected {
            let marker = if cell.selected { '>' } else { ' ' };
            println!(
                "{} {:2}: {} event(s), intensity {:.2}",
                marker, cell.day, cell.count, cell.intensity
            );
        }
    }
}

fn print_events(player: &HistoryPlayer, navigator: &Navigator) {
    let indices = calendar::events_on(player.events(), navigator.selected());
    if indices.is_empty() {
        println!("No events on {}", navigator.selected());
        return;
    }
    // newest first, like the timeline panel
    for idx in indices.into_iter().rev() {
        let event = &player.events()[idx];
        let marker = if player.selected() == Some(idx) { '>' } else { ' ' };
        let status = if event.state { "active" } else { "inactive" };
        println!(
            "{} [{:4}] {}  {:20} {:8} {}",
            marker, idx, event.ts, event.id, status, event.user
        );
    }
}
