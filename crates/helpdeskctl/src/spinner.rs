//! Typing indicator shown while the support agent composes a reply.
//!
//! Animated only on a TTY; piped output gets a single static line.

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Braille spinner frames
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const SPINNER_INTERVAL_MS: u64 = 120;

pub const TYPING_TEXT: &str = "Support Agent is typing...";

pub struct TypingIndicator {
    running: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
    start_time: Instant,
    is_tty: bool,
}

impl TypingIndicator {
    pub fn start() -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let is_tty = io::stdout().is_terminal();

        if !is_tty {
            println!("{}", TYPING_TEXT);
            return Self {
                running,
                handle: None,
                start_time: Instant::now(),
                is_tty,
            };
        }

        let running_clone = running.clone();
        let handle = std::thread::spawn(move || {
            let mut frame = 0;
            while running_clone.load(Ordering::Relaxed) {
                print!(
                    "\r{} {}",
                    SPINNER_FRAMES[frame].bright_green(),
                    TYPING_TEXT.dimmed()
                );
                let _ = io::stdout().flush();
                frame = (frame + 1) % SPINNER_FRAMES.len();
                std::thread::sleep(Duration::from_millis(SPINNER_INTERVAL_MS));
            }
        });

        Self {
            running,
            handle: Some(handle),
            start_time: Instant::now(),
            is_tty,
        }
    }

    /// Stop the animation, clear its line and return how long it ran
    pub fn stop(mut self) -> Duration {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        if self.is_tty {
            print!("\r{}\r", " ".repeat(TYPING_TEXT.len() + 4));
            let _ = io::stdout().flush();
        }
        self.start_time.elapsed()
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}
