//! TUI module using ratatui.
//!
//! One URL field, one action. While a request runs the screen only shows
//! its progress; keys pressed in the meantime are dropped.

use crate::config::{Config, Credential, Secrets};
use crate::llm::ChatModel;
use crate::loader::ContentLoader;
use crate::outcome::Outcome;
use crate::pipeline::{Stage, Summarizer, SummaryRequest};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};
use std::time::Duration;

const TITLE: &str = " Summarize text from YouTube or a website ";
const HELP: &str = "Enter: summarize  Esc: quit  Up/Down/PgUp/PgDn: scroll  Ctrl-U: clear";

/// What a key press asks the event loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Submit,
    Quit,
}

/// Screen state. Only the input buffer survives between actions.
#[derive(Debug, Default)]
pub struct App {
    input: String,
    /// Cursor position in characters
    cursor: usize,
    stage: Option<Stage>,
    outcome: Option<Outcome>,
    scroll: u16,
    /// Inner area of the result pane, updated before each key is handled
    viewport: Rect,
    has_credential: bool,
}

impl App {
    pub fn new(has_credential: bool) -> Self {
        Self {
            has_credential,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
                self.cursor = 0;
            }
            KeyCode::Enter => return Action::Submit,
            KeyCode::Char(c) => {
                let at = self.byte_index();
                self.input.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_index();
                self.input.remove(at);
            }
            KeyCode::Delete if self.cursor < self.input.chars().count() => {
                let at = self.byte_index();
                self.input.remove(at);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1).min(self.max_scroll()),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10).min(self.max_scroll())
            }
            _ => {}
        }
        Action::None
    }

    /// Start an action: drop the previous outcome
    fn begin(&mut self) {
        self.outcome = None;
        self.scroll = 0;
    }

    fn finish(&mut self, outcome: Outcome) {
        self.stage = None;
        self.outcome = Some(outcome);
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Track the terminal size so scrolling knows how tall the result is
    pub fn resize(&mut self, screen: Rect) {
        self.viewport = result_viewport(screen);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> u16 {
        self.outcome
            .as_ref()
            .map_or(0, |outcome| max_scroll(outcome, self.viewport))
    }
}

/// Rows the result can scroll before its last wrapped row reaches the bottom
fn max_scroll(outcome: &Outcome, viewport: Rect) -> u16 {
    if viewport.width == 0 {
        return 0;
    }
    let rows = result_paragraph(outcome).line_count(viewport.width);
    u16::try_from(rows.saturating_sub(usize::from(viewport.height))).unwrap_or(u16::MAX)
}

/// Run the interactive UI until the user quits
pub async fn run(config: &Config, secrets: &Secrets) -> anyhow::Result<()> {
    let summarizer = Summarizer::from_config(config)?;
    let credential = secrets.credential();

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &summarizer, &credential).await;
    ratatui::restore();
    result
}

async fn event_loop<L: ContentLoader, M: ChatModel>(
    terminal: &mut DefaultTerminal,
    summarizer: &Summarizer<L, M>,
    credential: &Credential,
) -> anyhow::Result<()> {
    let mut app = App::new(!credential.is_blank());

    loop {
        terminal.draw(|frame| draw(frame, &app))?;

        let size = terminal.size()?;
        app.resize(Rect::new(0, 0, size.width, size.height));

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::Quit => return Ok(()),
            Action::None => {}
            Action::Submit => {
                app.begin();
                let request = SummaryRequest::new(credential.clone(), app.input.clone());
                let result = summarizer
                    .run(&request, |stage| {
                        app.stage = Some(stage);
                        if let Err(e) = terminal.draw(|frame| draw(frame, &app)) {
                            tracing::warn!(error = %e, "failed to redraw");
                        }
                    })
                    .await;
                app.finish(Outcome::from(result));
                discard_pending_events()?;
            }
        }
    }
}

/// Drop keys typed while a request was running
fn discard_pending_events() -> std::io::Result<()> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}

fn screen_layout(area: Rect) -> [Rect; 4] {
    Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(3),
    ])
    .areas(area)
}

fn result_block() -> Block<'static> {
    Block::bordered().title(" Summary ")
}

fn result_viewport(screen: Rect) -> Rect {
    let [_, _, _, body] = screen_layout(screen);
    result_block().inner(body)
}

fn draw(frame: &mut Frame, app: &App) {
    let [header, input, status, body] = screen_layout(frame.area());

    let key_state = if app.has_credential {
        Span::styled("API key: set", Style::new().fg(Color::Green))
    } else {
        Span::styled("API key: missing", Style::new().fg(Color::Red))
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![TITLE.bold(), Span::raw(" "), key_state])),
        header,
    );

    draw_input(frame, app, input);
    frame.render_widget(status_line(app), status);

    let result = match &app.outcome {
        Some(outcome) => {
            let scroll = app.scroll.min(max_scroll(outcome, result_block().inner(body)));
            result_paragraph(outcome).scroll((scroll, 0))
        }
        None => Paragraph::new("Paste a web page or YouTube URL above and press Enter.")
            .style(Style::new().fg(Color::DarkGray)),
    };
    frame.render_widget(result.block(result_block()), body);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let width = usize::from(area.width.saturating_sub(2)).max(1);
    let offset = app.cursor.saturating_sub(width - 1);
    let visible: String = app.input.chars().skip(offset).take(width).collect();

    frame.render_widget(
        Paragraph::new(visible).block(Block::bordered().title(" URL ")),
        area,
    );

    if app.stage.is_none() {
        let x = area.x + 1 + u16::try_from(app.cursor - offset).unwrap_or(0);
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn status_line(app: &App) -> Paragraph<'static> {
    let line = match (&app.stage, &app.outcome) {
        (Some(stage), _) => Line::from(format!("{stage}")).fg(Color::Yellow),
        (None, Some(outcome)) if outcome.is_success() => {
            Line::from(outcome.headline()).fg(Color::Green)
        }
        (None, Some(outcome)) => Line::from(outcome.headline()).fg(Color::Red),
        (None, None) => Line::from(HELP).fg(Color::DarkGray),
    };
    Paragraph::new(line)
}

/// Wrapped outcome text; drawing and scroll limits share it
fn result_paragraph(outcome: &Outcome) -> Paragraph<'static> {
    Paragraph::new(outcome_text(outcome)).wrap(Wrap { trim: false })
}

fn outcome_text(outcome: &Outcome) -> Text<'static> {
    match outcome {
        Outcome::Rejected(message) => Text::from(Line::from(message.clone()).fg(Color::Red)),
        Outcome::Success(summary) => {
            let mut lines = vec![
                Line::from(summary.heading().to_string()).add_modifier(Modifier::BOLD),
                Line::from(format!(
                    "{} via {} | {} source characters",
                    summary.url, summary.strategy, summary.source_chars
                ))
                .fg(Color::DarkGray),
                Line::default(),
            ];
            lines.extend(summary.text.lines().map(|l| Line::from(l.to_string())));
            Text::from(lines)
        }
        Outcome::Failed {
            message, detail, ..
        } => {
            let mut lines = vec![Line::from(message.clone()).fg(Color::Red), Line::default()];
            lines.extend(
                detail
                    .lines()
                    .map(|l| Line::from(l.to_string()).fg(Color::DarkGray)),
            );
            Text::from(lines)
        }
    }
}
