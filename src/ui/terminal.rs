//! Interactive terminal view of the grid
//!
//! Draws the grid with ratatui and turns mouse clicks (or the keyboard
//! cursor) into selections. A selection blocks on the perspective request;
//! there is only ever one request in flight.

use std::io::{self, Stdout};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::runtime::{Builder, Runtime};

use crate::command::{Inspector, Perspective};
use crate::core::error::Result;
use crate::core::types::CellPos;
use crate::llm::TextGenerator;
use crate::render::colors::{cell_color, satisfaction_tint, BACKGROUND, SELECTION};
use crate::render::{collect_render_cells, Camera, RenderCell};
use crate::simulation::satisfaction::SatisfactionSummary;
use crate::simulation::world::{Census, SchellingGrid};
use crate::ui::state::{GameUI, LogCategory};

const TITLE: &str = "Click a cell to see the agent's perspective!";
const LOG_VISIBLE: usize = 8;

/// What the event loop should do after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
    Inspect(Option<CellPos>),
}

pub struct TerminalApp<G> {
    grid: SchellingGrid,
    inspector: Inspector<G>,
    runtime: Runtime,
    ui: GameUI,
    camera: Camera,
    cells: Vec<RenderCell>,
    census: Census,
    summary: SatisfactionSummary,
    seed: u64,
}

impl<G: TextGenerator> TerminalApp<G> {
    pub fn new(grid: SchellingGrid, inspector: Inspector<G>, seed: u64) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let mut cells = Vec::new();
        collect_render_cells(&grid, &mut cells);
        Ok(Self {
            camera: Camera::new(grid.size()),
            census: grid.census(),
            summary: grid.satisfaction_summary(),
            grid,
            inspector,
            runtime,
            ui: GameUI::new(),
            cells,
            seed,
        })
    }

    pub fn ui(&self) -> &GameUI {
        &self.ui
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn grid(&self) -> &SchellingGrid {
        &self.grid
    }

    /// Translate one input event
    pub fn handle_event(&mut self, event: &Event) -> AppAction {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            _ => AppAction::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let size = self.grid.size();
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return AppAction::Quit,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return AppAction::Quit,
            (KeyCode::Up | KeyCode::Char('k'), _) => self.ui.move_cursor(-1, 0, size),
            (KeyCode::Down | KeyCode::Char('j'), _) => self.ui.move_cursor(1, 0, size),
            (KeyCode::Left | KeyCode::Char('h'), _) => self.ui.move_cursor(0, -1, size),
            (KeyCode::Right | KeyCode::Char('l'), _) => self.ui.move_cursor(0, 1, size),
            (KeyCode::Enter | KeyCode::Char(' '), _) => {
                return AppAction::Inspect(Some(self.ui.cursor));
            }
            (KeyCode::Char('c'), _) => self.ui.deselect(),
            (KeyCode::Char('?'), _) => self.ui.show_help = !self.ui.show_help,
            _ => {}
        }
        self.camera.follow(self.ui.cursor);
        AppAction::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> AppAction {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return AppAction::Continue;
        }
        if let Some(pos) = self.camera.screen_to_cell(mouse.column, mouse.row) {
            return AppAction::Inspect(Some(pos));
        }
        let view = self.camera.viewport;
        let in_view = mouse.column >= view.x
            && mouse.column < view.x + view.width
            && mouse.row >= view.y
            && mouse.row < view.y + view.height;
        if in_view {
            AppAction::Inspect(None)
        } else {
            AppAction::Continue
        }
    }

    /// Show that a request is underway before blocking on it
    pub fn begin_inspect(&mut self, selection: Option<CellPos>) {
        if let Some(pos) = selection {
            self.ui.selected_cell = Some(pos);
            self.ui.report = Some(format!("Asking the agent at {} ...", pos));
        }
    }

    /// Inspect a selection and show the result; blocks on the service call
    pub fn select(&mut self, selection: Option<CellPos>) {
        let perspective = self
            .runtime
            .block_on(self.inspector.inspect_selection(&self.grid, selection));

        let category = match &perspective {
            Perspective::Agent { response: Err(_), .. } => LogCategory::Error,
            Perspective::Agent { .. } => LogCategory::Perspective,
            Perspective::Empty { .. } | Perspective::Outside => LogCategory::Notice,
        };
        if let Some(pos) = perspective.pos() {
            self.camera.follow(pos);
        }
        self.ui.show_report(perspective.pos(), perspective.text(), category);
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(frame.size());

        self.draw_header(frame, rows[0]);

        let grid_width = (self.grid.size() * 2 + 2).clamp(16, usize::from(u16::MAX)) as u16;
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(grid_width), Constraint::Min(30)])
            .split(rows[1]);

        self.draw_grid(frame, body[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(LOG_VISIBLE as u16 + 2)])
            .split(body[1]);
        self.draw_report(frame, side[0]);
        self.draw_log(frame, side[1]);

        self.draw_footer(frame, rows[2]);

        if self.ui.show_help {
            self.draw_help(frame);
        }
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let policy = self.grid.policy();
        let mode = if policy.dynamic {
            "dynamic thresholds".to_string()
        } else {
            format!("threshold {}", policy.global)
        };
        let summary = &self.summary;
        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("Grid {0}×{0}", self.grid.size()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    "  Red {}  Blue {}  Empty {}  |  {}  |  model {}  |  seed {}",
                    self.census.red,
                    self.census.blue,
                    self.census.empty,
                    mode,
                    self.inspector.model(),
                    self.seed
                )),
            ]),
            Line::from(format!(
                "Satisfied {}/{} ({:.0}%)  Red unhappy {}  Blue unhappy {}",
                summary.satisfied(),
                summary.agents(),
                summary.satisfied_ratio() * 100.0,
                summary.red_unsatisfied,
                summary.blue_unsatisfied
            )),
        ];
        let block = Block::default().title(TITLE).borders(Borders::ALL);
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_grid(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title("Neighborhood").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.camera.resize(inner);

        let width = usize::from(self.camera.cell_width);
        let size = self.grid.size();
        let offset = self.camera.offset;
        let mut lines = Vec::with_capacity(self.camera.visible_rows());

        for dy in 0..self.camera.visible_rows() {
            let row = offset.row + dy;
            let mut spans = Vec::with_capacity(self.camera.visible_cols());
            for dx in 0..self.camera.visible_cols() {
                let col = offset.col + dx;
                let Some(cell) = self.cells.get(row * size + col) else {
                    continue;
                };
                let bg = satisfaction_tint(cell_color(cell.cell), cell.satisfied).to_terminal();
                let mark = if cell.pos == self.ui.cursor {
                    "[]"
                } else if Some(cell.pos) == self.ui.selected_cell {
                    "<>"
                } else if !cell.satisfied {
                    "··"
                } else {
                    "  "
                };
                let text: String = mark.chars().take(width).collect();
                let style = Style::default()
                    .bg(bg)
                    .fg(SELECTION.to_terminal())
                    .add_modifier(Modifier::BOLD);
                spans.push(Span::styled(text, style));
            }
            lines.push(Line::from(spans));
        }

        let paragraph =
            Paragraph::new(Text::from(lines)).style(Style::default().bg(BACKGROUND.to_terminal()));
        frame.render_widget(paragraph, inner);
    }

    fn draw_report(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title("Perspective").borders(Borders::ALL);
        let text = self
            .ui
            .report
            .clone()
            .unwrap_or_else(|| "No cell selected.".to_string());
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_log(&self, frame: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .ui
            .log
            .iter()
            .rev()
            .take(LOG_VISIBLE)
            .map(|entry| {
                let color = match entry.category {
                    LogCategory::Perspective => Color::Green,
                    LogCategory::Notice => Color::Gray,
                    LogCategory::Error => Color::Red,
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("#{:<3} ", entry.seq), Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.message.clone(), Style::default().fg(color)),
                ]))
            })
            .collect();
        let list = List::new(items).block(Block::default().title("History").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut Frame<'_>, area: Rect) {
        let hint = "click/Enter: inspect  arrows/hjkl: move  c: clear  ?: help  q/Esc: quit";
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }

    fn draw_help(&self, frame: &mut Frame<'_>) {
        let area = centered(frame.size(), 56, 11);
        let text = vec![
            Line::from("Each cell is a household: red, blue, or empty (gray)."),
            Line::from("Dimmed cells marked ·· are unhappy with their neighbors."),
            Line::from(""),
            Line::from("Left click     ask that agent for its perspective"),
            Line::from("Arrows / hjkl  move the cursor"),
            Line::from("Enter / Space  ask the agent under the cursor"),
            Line::from("c              clear the current perspective"),
            Line::from("q / Esc        quit"),
        ];
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL)),
            area,
        );
    }
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}

/// Run the interactive view until the user quits
pub fn run<G: TextGenerator>(app: &mut TerminalApp<G>) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor().ok();

    let result = run_event_loop(&mut terminal, app);

    terminal.show_cursor().ok();
    if let Err(err) = disable_raw_mode() {
        tracing::error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    ) {
        tracing::error!(?err, "failed to leave alternate screen");
    }

    result
}

fn run_event_loop<G: TextGenerator>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut TerminalApp<G>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;
        match app.handle_event(&event::read()?) {
            AppAction::Quit => break,
            AppAction::Inspect(selection) => inspect_and_redraw(terminal, app, selection)?,
            AppAction::Continue => {}
        }
    }
    tracing::info!(selections = app.ui.selections, "Leaving interactive view");
    Ok(())
}

/// Draw the pending state, then block on the request
pub fn inspect_and_redraw<B: Backend, G: TextGenerator>(
    terminal: &mut Terminal<B>,
    app: &mut TerminalApp<G>,
    selection: Option<CellPos>,
) -> Result<()> {
    app.begin_inspect(selection);
    terminal.draw(|frame| app.draw(frame))?;
    app.select(selection);
    Ok(())
}
