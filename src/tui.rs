//! Terminal wrapper.
//!
//! [`Tui`] owns raw mode and the alternate screen, and runs a task that turns
//! terminal input plus tick and frame timers into [`Event`]s for the app.

use std::io::Stdout;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use crossterm::cursor;
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use futures::{FutureExt, StreamExt};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// After this the input task is aborted; after twice this we give up on it.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

pub type Backend = CrosstermBackend<Stdout>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Quit,
    Error(String),
    Tick,
    Render,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Map one terminal event; `None` for input the app has no use for.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
            // ctrl+c always quits, whatever the configured bindings say.
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                Some(Event::Quit)
            } else {
                Some(Event::Key(key))
            }
        }
        CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
        _ => None,
    }
}

pub struct Tui {
    terminal: Terminal<Backend>,
    input_task: Option<JoinHandle<()>>,
    cancel: CancellationToken,
    event_tx: UnboundedSender<Event>,
    event_rx: UnboundedReceiver<Event>,
    frame_period: Duration,
    tick_period: Duration,
}

impl Tui {
    /// `frame_rate` and `tick_rate` are per second.
    pub fn new(frame_rate: f64, tick_rate: f64) -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal: Terminal::new(Backend::new(std::io::stdout()))?,
            input_task: None,
            cancel: CancellationToken::new(),
            event_tx,
            event_rx,
            frame_period: Duration::from_secs_f64(1.0 / frame_rate),
            tick_period: Duration::from_secs_f64(1.0 / tick_rate),
        })
    }

    pub fn enter(&mut self) -> color_eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(std::io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        self.spawn_input_task();
        Ok(())
    }

    pub fn exit(&mut self) -> color_eyre::Result<()> {
        self.stop_input_task()?;
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            crossterm::execute!(std::io::stdout(), LeaveAlternateScreen, cursor::Show)?;
            crossterm::terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    /// Hand the terminal back and stop the process (ctrl+z). Call `enter` on wake-up.
    pub fn suspend(&mut self) -> color_eyre::Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::SIGTSTP)?;
        Ok(())
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    fn spawn_input_task(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.input_task = Some(tokio::spawn(pump_events(
            self.event_tx.clone(),
            self.cancel.clone(),
            self.tick_period,
            self.frame_period,
        )));
    }

    fn stop_input_task(&mut self) -> color_eyre::Result<()> {
        self.cancel.cancel();
        let Some(task) = self.input_task.take() else {
            return Ok(());
        };

        let started = Instant::now();
        while !task.is_finished() {
            let waited = started.elapsed();
            if waited >= SHUTDOWN_GRACE * 2 {
                return Err(color_eyre::eyre::eyre!("Terminal input task did not stop"));
            }
            if waited >= SHUTDOWN_GRACE {
                task.abort();
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    }
}

async fn pump_events(
    event_tx: UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_period: Duration,
    frame_period: Duration,
) {
    let mut input = EventStream::new();
    let mut ticks = interval(tick_period);
    let mut frames = interval(frame_period);

    #[cfg(unix)]
    {
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                    let _ = event_tx.send(Event::Quit);
                }
                Err(e) => warn!("Failed to install SIGTERM handler: {e}"),
            }
        });
    }

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticks.tick() => Event::Tick,
            _ = frames.tick() => Event::Render,
            next = input.next().fuse() => match next {
                Some(Ok(raw)) => match translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => Event::Error(e.to_string()),
                None => break,
            },
        };
        if event_tx.send(event).is_err() {
            break;
        }
    }
    cancel.cancel();
}

impl Deref for Tui {
    type Target = Terminal<Backend>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            error!("Failed to restore terminal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent, MouseEventKind};

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_ctrl_c_quits() {
        let event = key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press);
        assert_eq!(translate(event), Some(Event::Quit));
    }

    #[test]
    fn test_only_key_presses_pass() {
        let press = key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Press);
        assert!(matches!(translate(press), Some(Event::Key(k)) if k.code == KeyCode::Enter));

        let release = key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(translate(release), None);
    }

    #[test]
    fn test_resize_kept_and_mouse_dropped() {
        assert_eq!(
            translate(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        );

        let mouse = CrosstermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(mouse), None);
        assert_eq!(translate(CrosstermEvent::FocusLost), None);
    }
}
