use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;
use ratatui::backend::CrosstermBackend;
use std::io::stdout;
use std::time::{Duration, Instant};

mod boot;
mod config;
mod desktop;
mod login;
mod phase;
mod status;
mod timeline;
mod ui;

use boot::BootController;
use desktop::{default_window_specs, DesktopController, OrientationClassifier};
use login::LoginController;
use phase::{Phase, Session};
use ui::Term;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(ratatui::Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ── Main application loop ─────────────────────────────────────────────────────

// Redraw at least this often, even with no timer due (clock, resizes).
const MAX_POLL: Duration = Duration::from_millis(100);

fn run(terminal: &mut Term, skip_boot: bool) -> Result<()> {
    config::reload_settings();
    let content = config::load_content();

    let slide_every = Duration::from_millis(rand::thread_rng().gen_range(3_000..=5_000));

    let boot = BootController::new(content.boot_lines.clone());
    let login = LoginController::new(content.username.clone(), content.password_mask.clone());
    let desktop = DesktopController::new(
        default_window_specs(),
        OrientationClassifier::default(),
        content.images.len(),
        slide_every,
    );

    let mut session = Session::new(boot, login, desktop);
    let area = terminal.size()?;
    session.resize(area.width, area.height);
    session.start(skip_boot || !config::get_settings().bootup);

    let started = Instant::now();
    loop {
        let now = started.elapsed();
        session.tick(now);
        terminal.draw(|f| ui::draw(f, &session, &content))?;

        let timeout = session
            .next_timer()
            .map(|due| due.saturating_sub(started.elapsed()))
            .unwrap_or(MAX_POLL)
            .min(MAX_POLL);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char(' ') | KeyCode::Enter if session.phase() == Phase::Boot => {
                        session.skip_boot();
                    }
                    _ => {}
                },
                Event::Resize(w, h) => session.resize(w, h),
                _ => {}
            }
        }
    }

    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let skip_boot = args.contains(&"--skip-boot".to_string());

    let mut terminal = init_terminal()?;

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run(&mut terminal, skip_boot)
    }));

    // Always restore terminal
    restore_terminal(&mut terminal).ok();

    match result {
        Ok(r) => r,
        Err(_) => {
            eprintln!("termfolio crashed; terminal restored.");
            Ok(())
        }
    }
}
