use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

// ── Paths ─────────────────────────────────────────────────────────────────────

pub fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn settings_file() -> PathBuf {
    base_dir().join("settings.json")
}
pub fn content_file() -> PathBuf {
    base_dir().join("content.json")
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

// ── Settings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub bootup: bool,
    pub theme: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bootup: true,
            theme: "Green (Default)".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_json(&settings_file())
}

#[allow(dead_code)]
pub fn save_settings(s: &Settings) {
    let _ = save_json(&settings_file(), s);
}

static APP_SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();

fn settings_lock() -> &'static RwLock<Settings> {
    APP_SETTINGS.get_or_init(|| RwLock::new(Settings::default()))
}

pub fn get_settings() -> Settings {
    settings_lock()
        .read()
        .map(|g| g.clone())
        .unwrap_or_default()
}

pub fn reload_settings() {
    let s = load_settings();
    if let Ok(mut guard) = settings_lock().write() {
        *guard = s;
    }
}

// ── Themes ────────────────────────────────────────────────────────────────────

use ratatui::style::Color;

pub const THEMES: &[(&str, Color)] = &[
    ("Green (Default)", Color::Green),
    ("White", Color::White),
    ("Amber", Color::Yellow),
    ("Blue", Color::Blue),
    ("Red", Color::Red),
    ("Purple", Color::Magenta),
    ("Light Blue", Color::Cyan),
];

pub fn theme_color(name: &str) -> Color {
    THEMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .unwrap_or(Color::Green)
}

pub fn current_theme_color() -> Color {
    theme_color(&get_settings().theme)
}

// ── Portfolio content ─────────────────────────────────────────────────────────
// Everything the screens display is static configuration: the boot log, the
// scripted login credentials, and the four desktop windows' contents.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEntry {
    pub label: String,
    pub url: String,
}

/// One slideshow frame: a caption plus ASCII art lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    pub title: String,
    #[serde(default)]
    pub art: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioContent {
    pub boot_lines: Vec<String>,
    pub username: String,
    pub password_mask: String,
    #[serde(default)]
    pub login_host: String,
    #[serde(default)]
    pub profile_fields: Vec<String>,
    #[serde(default)]
    pub browser_page: Vec<String>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
}

impl Default for PortfolioContent {
    fn default() -> Self {
        let s = |v: &str| v.to_string();
        Self {
            boot_lines: vec![
                s("[    0.000000] termfolio v0.9"),
                s("[    0.000000] Command line: entry=portfolio mode=about"),
                s("[    0.034211] Initializing render engine..."),
                s("[    0.152331] Viewport detected, preparing render surface."),
                s("[    0.455122] Calibrating connection..."),
                s("[    0.671003] Loading assets... [fonts, styles, glyphs]"),
                s("[    0.992110] [OK] Mounted terminal fonts."),
                s("[    1.200112] [OK] Parsed theme tables."),
                s("[    1.450022] [OK] Initialized draw loop."),
                s("[    1.600123] Starting renderer... preparing for user login."),
                s("[    1.800000] [OK] Reached target Interactive Mode."),
                s("[    2.000000] Welcome, my friend!"),
            ],
            username: s("guest"),
            password_mask: s("********"),
            login_host: s("Rye v0.6.0"),
            profile_fields: vec![
                s("Name:   Harvey"),
                s("Age:    ?"),
                s("Likes:  walks, films, black tea"),
                s("From:   Saitama"),
                s("Lives:  Tokyo"),
            ],
            browser_page: vec![
                s("~/about"),
                s(""),
                s("Welcome to my room. Have a look around,"),
                s("the windows open on their own."),
            ],
            links: vec![
                LinkEntry { label: s("GitHub"), url: s("https://github.com/") },
                LinkEntry { label: s("Blog"), url: s("https://example.org/blog") },
                LinkEntry { label: s("Mail"), url: s("mailto:harvey@example.org") },
            ],
            images: vec![
                ImageEntry {
                    title: s("character_fall"),
                    art: vec![s(r"  \o/ "), s("   |  "), s(r"  / \ ")],
                },
                ImageEntry {
                    title: s("character_normal"),
                    art: vec![s("   o  "), s(r"  /|\ "), s(r"  / \ ")],
                },
                ImageEntry {
                    title: s("teacup"),
                    art: vec![s("  (  ) "), s("  |~~|)"), s("  \\__/ ")],
                },
            ],
        }
    }
}

pub fn load_content() -> PortfolioContent {
    load_json(&content_file())
}
