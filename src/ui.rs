//! Draw layer. Pure consumer of controller state: the session pushes what
//! is visible, this module turns it into widgets. Nothing here owns a
//! timer or mutates the core.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::config::{current_theme_color, PortfolioContent};
use crate::desktop::{DesktopController, WindowId};
use crate::login::{LoginController, LoginStage};
use crate::phase::{Phase, Session};
use crate::status::render_status_bar;

pub type Term = Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>;

// ── Padding ───────────────────────────────────────────────────────────────────
// Horizontal padding applied to full-width screens so text never touches
// the edges.
const H_PAD: u16 = 3;

pub fn pad_horizontal(area: Rect) -> Rect {
    let pad = H_PAD.min(area.width / 2);
    Rect {
        x: area.x + pad,
        y: area.y,
        width: area.width.saturating_sub(pad * 2),
        height: area.height,
    }
}

// ── Color helpers ─────────────────────────────────────────────────────────────

pub fn normal_style() -> Style { Style::default().fg(current_theme_color()) }
pub fn sel_style()    -> Style { Style::default().fg(ratatui::style::Color::Black).bg(current_theme_color()).add_modifier(Modifier::BOLD) }
pub fn title_style()  -> Style { Style::default().fg(current_theme_color()).add_modifier(Modifier::BOLD) }
pub fn dim_style()    -> Style { Style::default().fg(current_theme_color()).add_modifier(Modifier::DIM) }

// ── Top-level dispatch ────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, session: &Session, content: &PortfolioContent) {
    match session.phase() {
        Phase::Boot => draw_boot(f, session.boot().visible_lines(), session.boot().is_finished()),
        Phase::Login => draw_login(f, session.login(), content),
        Phase::Desktop => draw_desktop(f, session.desktop(), content),
    }
}

// ── Boot screen ───────────────────────────────────────────────────────────────
// Log lines stick to the bottom of the screen, kernel style; older lines
// scroll off the top.

fn draw_boot(f: &mut Frame, lines: &[String], finished: bool) {
    let size = f.area();
    let area = pad_horizontal(Rect {
        x: size.x,
        y: size.y,
        width: size.width,
        height: size.height.saturating_sub(1),
    });

    let mut text: Vec<Line> = lines
        .iter()
        .map(|l| Line::from(Span::styled(l.as_str(), normal_style())))
        .collect();
    if !finished {
        text.push(Line::from(Span::styled("_", normal_style())));
    }

    let visible = area.height as usize;
    let skip = text.len().saturating_sub(visible);
    let top = area.y + (visible.saturating_sub(text.len())) as u16;
    let body = Rect {
        x: area.x,
        y: top,
        width: area.width,
        height: area.height.saturating_sub(top - area.y),
    };
    f.render_widget(Paragraph::new(text.split_off(skip)), body);

    let hint = Paragraph::new(Span::styled(
        "SPACE to skip",
        Style::default().fg(ratatui::style::Color::DarkGray),
    ))
    .alignment(Alignment::Center);
    let hint_area = Rect { x: size.x, y: size.height.saturating_sub(1), width: size.width, height: 1 };
    f.render_widget(hint, hint_area);
}

// ── Login screen ──────────────────────────────────────────────────────────────
// A display-manager box, centered, that fills itself in as the controller
// advances through its stages.

fn draw_login(f: &mut Frame, login: &LoginController, content: &PortfolioContent) {
    let size = f.area();
    let w = 44u16.min(size.width);
    let h = 10u16.min(size.height);
    let area = Rect {
        x: size.width.saturating_sub(w) / 2,
        y: size.height.saturating_sub(h) / 2,
        width: w,
        height: h,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(normal_style())
        .title(Span::styled(format!(" {} ", content.login_host), title_style()));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    if inner.width < 4 || inner.height < 6 {
        return;
    }

    let stage = login.stage();
    let username = if stage >= LoginStage::UsernameShown {
        login.username().to_string()
    } else {
        "_".to_string()
    };
    let mut password = login.password_prefix();
    if stage == LoginStage::UsernameShown {
        password.push('_');
    }

    let field = |label: &str, value: String| {
        let gap = (inner.width as usize)
            .saturating_sub(2 + label.len() + value.chars().count() + 1);
        Line::from(vec![
            Span::styled(format!(" {label}"), normal_style()),
            Span::raw(" ".repeat(gap)),
            Span::styled(value, title_style()),
            Span::raw(" "),
        ])
    };

    let lines = vec![
        Line::default(),
        field("login:", username),
        Line::default(),
        field("password:", password),
    ];
    let body = Rect { height: inner.height.saturating_sub(2), ..inner };
    f.render_widget(Paragraph::new(lines), body);

    let footer = Paragraph::new(Span::styled(
        "F1: shutdown | F2: reboot | F3: shell",
        dim_style(),
    ))
    .alignment(Alignment::Center);
    let footer_area = Rect {
        x: inner.x,
        y: inner.bottom().saturating_sub(1),
        width: inner.width,
        height: 1,
    };
    f.render_widget(footer, footer_area);
}

// ── Desktop screen ────────────────────────────────────────────────────────────

fn draw_desktop(f: &mut Frame, desktop: &DesktopController, content: &PortfolioContent) {
    let size = f.area();
    let main = Rect {
        x: size.x,
        y: size.y,
        width: size.width,
        height: size.height.saturating_sub(1),
    };

    for (spec, state) in desktop.windows() {
        if !state.open {
            continue;
        }
        let area = spec.rect(desktop.orientation()).to_cells(main);
        if area.width < 2 || area.height < 2 {
            continue;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(normal_style())
            .title(Span::styled(format!(" {} ", spec.title), title_style()));
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);
        if !state.content || inner.width == 0 || inner.height == 0 {
            continue;
        }
        let body = window_body(spec.id, desktop, content);
        f.render_widget(Paragraph::new(body), inner);
    }

    render_status_bar(f, Rect { x: size.x, y: size.height.saturating_sub(1), width: size.width, height: 1 });
}

fn window_body<'a>(
    id: WindowId,
    desktop: &DesktopController,
    content: &'a PortfolioContent,
) -> Vec<Line<'a>> {
    match id {
        WindowId::Profile => content
            .profile_fields
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), normal_style())))
            .collect(),
        WindowId::Viewer => {
            let mut lines = Vec::new();
            if let Some(img) = content.images.get(desktop.slide_index()) {
                for row in &img.art {
                    lines.push(Line::from(Span::styled(row.as_str(), normal_style())));
                }
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    format!("{} ({}/{})", img.title, desktop.slide_index() + 1, content.images.len()),
                    dim_style(),
                )));
            }
            lines
        }
        WindowId::Browser => content
            .browser_page
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let style = if i == 0 { sel_style() } else { normal_style() };
                Line::from(Span::styled(l.as_str(), style))
            })
            .collect(),
        WindowId::Links => content
            .links
            .iter()
            .map(|l| {
                Line::from(vec![
                    Span::styled(format!("{:<8}", l.label), title_style()),
                    Span::styled(l.url.as_str(), dim_style()),
                ])
            })
            .collect(),
    }
}
