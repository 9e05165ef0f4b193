use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal};
use notefall::{InputEvent, InputSource, StopReason, StopSignal};
use tracing::{debug, warn};

/// Lane keys, left to right
const LANE_KEYS: [char; 4] = ['d', 'f', 'j', 'k'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Stop(StopReason),
    Lane(InputEvent),
}

/// Spawn a thread that watches the keyboard.
///
/// Esc and q stop the play as a user quit, Ctrl+C as an interrupt. When
/// `lanes` is given, D F J K are forwarded as lane presses (and releases, if
/// the terminal reports them).
pub fn spawn_keyboard_monitor(
    stop: Arc<StopSignal>,
    lanes: Option<Sender<InputEvent>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !stop.is_stopped() {
            if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
                continue;
            }
            let Ok(Event::Key(key_event)) = event::read() else {
                continue;
            };
            match classify_key(&key_event) {
                Some(KeyAction::Stop(reason)) => {
                    debug!("Stop key pressed: {:?}", key_event.code);
                    stop.stop(reason);
                    break;
                }
                Some(KeyAction::Lane(input)) => {
                    if let Some(tx) = &lanes
                        && tx.send(input).is_err()
                    {
                        break;
                    }
                }
                None => {}
            }
        }

        debug!("Keyboard monitor stopped");
    })
}

fn classify_key(event: &KeyEvent) -> Option<KeyAction> {
    match event.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(KeyAction::Stop(StopReason::UserQuit))
        }
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Stop(StopReason::Interrupted))
        }
        KeyCode::Char(c) => {
            let lane = LANE_KEYS.iter().position(|k| *k == c.to_ascii_lowercase())? as u8;
            match event.kind {
                KeyEventKind::Press => Some(KeyAction::Lane(InputEvent::press(lane))),
                KeyEventKind::Release => Some(KeyAction::Lane(InputEvent::release(lane))),
                KeyEventKind::Repeat => None,
            }
        }
        _ => None,
    }
}

/// Lane inputs received from the keyboard thread
pub struct KeyboardInput {
    rx: Receiver<InputEvent>,
}

impl KeyboardInput {
    pub fn channel() -> (Sender<InputEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self, _logical_ms: u64) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }
}

/// Flags that make the terminal report key releases
fn enhancement_flags() -> KeyboardEnhancementFlags {
    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
}

/// Raw terminal mode for the lifetime of the guard.
///
/// Where the terminal supports the keyboard enhancement protocol, release
/// events are switched on as well and restored on drop.
pub struct RawModeGuard {
    enhanced: bool,
}

impl RawModeGuard {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let enhanced = match terminal::supports_keyboard_enhancement() {
            Ok(true) => execute!(io::stdout(), PushKeyboardEnhancementFlags(enhancement_flags()))
                .map(|_| true)
                .unwrap_or_else(|e| {
                    warn!("Failed to enable key release events: {}", e);
                    false
                }),
            _ => false,
        };
        if !enhanced && !cfg!(windows) {
            warn!("Terminal does not report key releases; long notes cannot be released");
        }
        Ok(Self { enhanced })
    }

    pub fn reports_release(&self) -> bool {
        self.enhanced || cfg!(windows)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
    }
}
