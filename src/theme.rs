use owo_colors::{AnsiColors, OwoColorize, Style};

use crate::config::ThemeConfig;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Border,
    Title,
    Heading,
    Text,
    Prompt,
    Key,
    Error,
}

/// Resolved styles for every screen element. `None` renders plain text.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    border: Option<Style>,
    title: Option<Style>,
    heading: Option<Style>,
    text: Option<Style>,
    prompt: Option<Style>,
    key: Option<Style>,
    error: Option<Style>,
    /// Selected menu entry, spelled for the `console` styles dialoguer uses.
    menu_highlight: Option<String>,
}

impl Theme {
    /// Plain theme, used for `--no-color` and in tests.
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ThemeConfig, color: bool) -> Result<Self, ConfigError> {
        let theme = Self {
            border: parse_field("theme.border", &config.border)?,
            title: parse_field("theme.title", &config.title)?,
            heading: parse_field("theme.heading", &config.heading)?,
            text: parse_field("theme.text", &config.text)?,
            prompt: parse_field("theme.prompt", &config.prompt)?,
            key: parse_field("theme.key", &config.key)?,
            error: parse_field("theme.error", &config.error)?,
            menu_highlight: parse_field("theme.highlight", &config.highlight)?
                .map(|_| dotted(&config.highlight)),
        };
        Ok(if color { theme } else { Self::plain() })
    }

    pub fn style(&self, role: Role) -> Option<Style> {
        match role {
            Role::Border => self.border,
            Role::Title => self.title,
            Role::Heading => self.heading,
            Role::Text => self.text,
            Role::Prompt => self.prompt,
            Role::Key => self.key,
            Role::Error => self.error,
        }
    }

    pub fn paint(&self, role: Role, text: &str) -> String {
        match self.style(role) {
            Some(style) => text.style(style).to_string(),
            None => text.to_string(),
        }
    }

    pub fn menu_highlight(&self) -> console::Style {
        match &self.menu_highlight {
            Some(dotted) => console::Style::from_dotted_str(dotted),
            None => console::Style::new(),
        }
    }
}

fn parse_field(field: &'static str, name: &str) -> Result<Option<Style>, ConfigError> {
    parse_style(name).map_err(|reason| ConfigError::InvalidValue { field, reason })
}

/// Parses `[bold_][bright_]<color>[_on_[bright_]<color>]` or `normal`.
pub fn parse_style(name: &str) -> Result<Option<Style>, String> {
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() || name == "normal" {
        return Ok(None);
    }

    let (mut fg, bg) = match name.split_once("_on_") {
        Some((fg, bg)) => (fg, Some(bg)),
        None => (name.as_str(), None),
    };

    let mut style = Style::new();
    if let Some(rest) = fg.strip_prefix("bold_") {
        style = style.bold();
        fg = rest;
    } else if fg == "bold" {
        style = style.bold();
        fg = "";
    }

    if !fg.is_empty() {
        style = style.color(parse_color(fg)?);
    }
    if let Some(bg) = bg {
        style = style.on_color(parse_color(bg)?);
    }
    Ok(Some(style))
}

/// `bright_white_on_blue` becomes `white.bright.on_blue`. Names are
/// assumed to have passed `parse_style`.
fn dotted(name: &str) -> String {
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() || name == "normal" {
        return String::new();
    }
    let (fg, bg) = match name.split_once("_on_") {
        Some((fg, bg)) => (fg, Some(bg)),
        None => (name.as_str(), None),
    };

    let mut parts = Vec::new();
    let fg = match fg.strip_prefix("bold_") {
        Some(rest) => {
            parts.push("bold".to_string());
            rest
        }
        None if fg == "bold" => {
            parts.push("bold".to_string());
            ""
        }
        None => fg,
    };
    match fg.strip_prefix("bright_") {
        Some(color) => parts.push(format!("{color}.bright")),
        None if !fg.is_empty() => parts.push(fg.to_string()),
        None => {}
    }
    if let Some(bg) = bg {
        match bg.strip_prefix("bright_") {
            Some(color) => parts.push(format!("on_{color}.on_bright")),
            None => parts.push(format!("on_{bg}")),
        }
    }
    parts.join(".")
}

fn parse_color(name: &str) -> Result<AnsiColors, String> {
    let color = match name {
        "black" => AnsiColors::Black,
        "red" => AnsiColors::Red,
        "green" => AnsiColors::Green,
        "yellow" => AnsiColors::Yellow,
        "blue" => AnsiColors::Blue,
        "magenta" => AnsiColors::Magenta,
        "cyan" => AnsiColors::Cyan,
        "white" => AnsiColors::White,
        "bright_black" => AnsiColors::BrightBlack,
        "bright_red" => AnsiColors::BrightRed,
        "bright_green" => AnsiColors::BrightGreen,
        "bright_yellow" => AnsiColors::BrightYellow,
        "bright_blue" => AnsiColors::BrightBlue,
        "bright_magenta" => AnsiColors::BrightMagenta,
        "bright_cyan" => AnsiColors::BrightCyan,
        "bright_white" => AnsiColors::BrightWhite,
        other => return Err(format!("unknown color '{other}'")),
    };
    Ok(color)
}
