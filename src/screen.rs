use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use console::{Key, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;

use crate::error::Result;
use crate::sign::Sign;
use crate::theme::{Role, Theme};

/// Everything the menu needs from the user's terminal.
pub trait Screen {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Shows the sign list and blocks until a choice. `None` when the user
    /// backs out.
    fn select_sign(&mut self, signs: &[Sign], current: Option<Sign>) -> Result<Option<Sign>>;

    fn clear(&mut self) -> Result<()>;
    fn write_lines(&mut self, lines: &[String]) -> Result<()>;

    /// Like `write_lines`, one screenful at a time.
    fn page(&mut self, lines: &[String]) -> Result<()>;

    /// Shows a transient message until a key is pressed or `timeout` passes.
    fn error(&mut self, message: &str, timeout: Duration) -> Result<()>;

    fn read_key(&mut self) -> Result<char>;
}

pub struct ConsoleScreen {
    term: Term,
    theme: Theme,
    /// Key read still outstanding after an error pause timed out.
    pending_key: Option<Receiver<io::Result<Key>>>,
}

impl ConsoleScreen {
    pub fn new(theme: Theme) -> Self {
        Self {
            term: Term::stdout(),
            theme,
            pending_key: None,
        }
    }

    fn spawn_key_reader(&self) -> Receiver<io::Result<Key>> {
        let (tx, rx) = mpsc::channel();
        let term = self.term.clone();
        thread::spawn(move || {
            let _ = tx.send(term.read_key());
        });
        rx
    }

    fn next_key(&mut self) -> Result<Key> {
        if let Some(rx) = self.pending_key.take() {
            if let Ok(key) = rx.recv() {
                return Ok(key?);
            }
        }
        Ok(self.term.read_key()?)
    }

    fn menu_theme(&self) -> ColorfulTheme {
        ColorfulTheme {
            active_item_style: self.theme.menu_highlight(),
            ..ColorfulTheme::default()
        }
    }
}

impl Screen for ConsoleScreen {
    fn width(&self) -> usize {
        let (_, cols) = self.term.size();
        cols as usize
    }

    fn height(&self) -> usize {
        let (rows, _) = self.term.size();
        rows as usize
    }

    fn select_sign(&mut self, signs: &[Sign], current: Option<Sign>) -> Result<Option<Sign>> {
        self.term.clear_screen()?;
        for line in menu_header(&self.theme) {
            self.term.write_line(&line)?;
        }

        let items: Vec<String> = signs.iter().map(Sign::title).collect();
        let default = current
            .and_then(|sign| signs.iter().position(|s| *s == sign))
            .unwrap_or(0);
        let choice = Select::with_theme(&self.menu_theme())
            .items(&items)
            .default(default)
            .max_length(signs.len())
            .interact_on_opt(&self.term)?;

        Ok(choice.and_then(|idx| signs.get(idx).copied()))
    }

    fn clear(&mut self) -> Result<()> {
        self.term.clear_screen()?;
        Ok(())
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.term.write_line(line)?;
        }
        Ok(())
    }

    fn page(&mut self, lines: &[String]) -> Result<()> {
        let page_height = self.height().saturating_sub(1).max(1);
        let mut chunks = lines.chunks(page_height).peekable();

        while let Some(chunk) = chunks.next() {
            self.write_lines(chunk)?;
            if chunks.peek().is_none() {
                break;
            }
            self.term
                .write_str(&self.theme.paint(Role::Prompt, "-- more (q to stop) --"))?;
            let key = self.next_key()?;
            self.term.clear_line()?;
            if matches!(key, Key::Char('q') | Key::Char('Q') | Key::Escape) {
                break;
            }
        }
        Ok(())
    }

    fn error(&mut self, message: &str, timeout: Duration) -> Result<()> {
        self.term.write_line("")?;
        self.term.write_line(&self.theme.paint(Role::Error, message))?;
        let rx = match self.pending_key.take() {
            Some(rx) => rx,
            None => self.spawn_key_reader(),
        };
        match key_or_timeout(&rx, timeout) {
            Some(result) => {
                result?;
            }
            None => self.pending_key = Some(rx),
        }
        Ok(())
    }

    fn read_key(&mut self) -> Result<char> {
        let key = match self.next_key()? {
            Key::Char(c) => c,
            Key::Enter => '\n',
            Key::Escape => '\u{1b}',
            _ => '\0',
        };
        Ok(key)
    }
}

/// Caption above the sign list, underlined like a horoscope title.
pub fn menu_header(theme: &Theme) -> Vec<String> {
    let caption = "Choose your sign";
    vec![
        theme.paint(Role::Title, caption),
        theme.paint(Role::Border, &"-".repeat(caption.len())),
    ]
}

/// `None` when nothing arrived within `timeout`; the reader may still
/// deliver later.
fn key_or_timeout(
    rx: &Receiver<io::Result<Key>>,
    timeout: Duration,
) -> Option<io::Result<Key>> {
    match rx.recv_timeout(timeout) {
        Ok(result) => Some(result),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "key reader stopped",
        ))),
    }
}
