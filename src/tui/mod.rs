//! Ratatui-based terminal UI.
//!
//! The TUI provides entry fields for the three query constraints (budget,
//! minimum year, maximum mileage), then renders the ranked shortlist and
//! summary. Each submitted query runs on a worker thread so the interface
//! stays responsive; only one query is in flight at a time and there is no
//! cancellation, since a query is fast and bounded.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::app::pipeline::run_query_with_catalog;
use crate::cli::TuiArgs;
use crate::domain::{QueryOutcome, QueryParams};
use crate::error::AppError;
use crate::io::ingest::{Catalog, load_catalog};

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    args: TuiArgs,
    catalog: Arc<Catalog>,
    inputs: [String; 3],
    selected_field: usize,
    status: String,
    outcome: Option<QueryOutcome>,
    pending: Option<Receiver<QueryOutcome>>,
}

const FIELD_LABELS: [&str; 3] = ["Budget ($)", "Min year", "Max km"];

impl App {
    fn new(args: TuiArgs) -> Result<Self, AppError> {
        let catalog = Arc::new(load_catalog(&args.csv)?);
        let status = format!(
            "Loaded {} listings ({} rows read).",
            catalog.rows_used, catalog.rows_read
        );
        Ok(Self {
            args,
            catalog,
            inputs: [String::new(), String::new(), String::new()],
            selected_field: 0,
            status,
            outcome: None,
            pending: None,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.poll_worker() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Drain the worker channel. Returns true when the display changed.
    fn poll_worker(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };

        match rx.try_recv() {
            Ok(outcome) => {
                self.status = match &outcome {
                    QueryOutcome::Shortlist(s) => {
                        format!("{} cars shortlisted.", s.entries.len())
                    }
                    QueryOutcome::NoMatches => "No cars match the given constraints.".to_string(),
                    QueryOutcome::NoneWithinBudget => "No cars within budget.".to_string(),
                };
                self.outcome = Some(outcome);
                self.pending = None;
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.status = "Query worker failed.".to_string();
                true
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down | KeyCode::Tab => {
                if self.selected_field < FIELD_LABELS.len() - 1 {
                    self.selected_field += 1;
                } else {
                    self.selected_field = 0;
                }
            }
            KeyCode::Backspace => {
                self.inputs[self.selected_field].pop();
            }
            KeyCode::Enter => self.submit_query(),
            KeyCode::Char('q') => return true,
            KeyCode::Char('r') => self.reload_catalog(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.inputs[self.selected_field].push(c);
            }
            _ => {}
        }
        false
    }

    fn submit_query(&mut self) {
        if self.pending.is_some() {
            self.status = "A query is already running...".to_string();
            return;
        }

        let params = match QueryParams::from_input(&self.inputs[0], &self.inputs[1], &self.inputs[2]) {
            Ok(params) => params,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };

        let catalog = Arc::clone(&self.catalog);
        let top_n = self.args.top;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(run_query_with_catalog(&catalog, &params, top_n));
        });

        self.pending = Some(rx);
        self.status = "Searching...".to_string();
    }

    fn reload_catalog(&mut self) {
        match load_catalog(&self.args.csv) {
            Ok(catalog) => {
                self.catalog = Arc::new(catalog);
                self.outcome = None;
                self.status = format!(
                    "Reloaded {} listings ({} rows read).",
                    self.catalog.rows_used, self.catalog.rows_read
                );
            }
            Err(err) => {
                self.status = format!("Reload failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("carscout", Style::default().fg(Color::Cyan)),
            Span::raw(" — used-car shortlisting"),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "catalog: {} | listings: {} ({} rows read) | top {}",
                self.args.csv.display(),
                self.catalog.rows_used,
                self.catalog.rows_read,
                self.args.top,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        self.draw_query_fields(frame, chunks[0]);
        self.draw_results(frame, chunks[1]);
    }

    fn draw_query_fields(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = FIELD_LABELS
            .iter()
            .zip(&self.inputs)
            .map(|(label, value)| {
                let shown = if value.is_empty() { "_" } else { value.as_str() };
                ListItem::new(format!("{label}: {shown}"))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Query").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Shortlist").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = if self.pending.is_some() {
            Text::from("Searching...")
        } else {
            match &self.outcome {
                None => Text::from("Fill in the query fields and press Enter to search."),
                Some(QueryOutcome::NoMatches) => Text::from("No cars match the given constraints."),
                Some(QueryOutcome::NoneWithinBudget) => Text::from("No cars within budget."),
                Some(QueryOutcome::Shortlist(shortlist)) => {
                    let mut body = crate::report::format_shortlist(shortlist);
                    body.push('\n');
                    body.push_str(&crate::report::format_summary(shortlist));
                    Text::from(body)
                }
            }
        };

        let p = Paragraph::new(text);
        frame.render_widget(p, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  0-9 edit  Enter search  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
