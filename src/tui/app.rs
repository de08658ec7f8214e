use anyhow::Result;
use chrono::{Datelike, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use std::io::{self, Stdout};
use std::sync::Arc;

use crate::config::ThemeConfig;
use crate::store::{SheetStore, StoreError};

use super::input::InputMode;
use super::view::{SheetView, ViewModel};

/// Helper to convert hex color string to ratatui Color
fn hex_to_color(hex: &str) -> Color {
    ThemeConfig::parse_hex(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::White)
}

/// Build footer help text based on current UI state
fn build_footer_text(input_mode: InputMode, palette_open: bool) -> String {
    if palette_open {
        " [h/l] color  [Enter] apply  [d] delete sheet  [Esc] close ".to_string()
    } else {
        match input_mode {
            InputMode::Normal => {
                " [h/l] sheet  [j/k] task  [a] add task  [n] new sheet  [Space] done  [s] settings  [q] quit "
                    .to_string()
            }
            InputMode::InputTask => " Enter task title... [Esc] cancel  [Enter] save ".to_string(),
        }
    }
}

/// Today as the d/m/yyyy display string stamped onto new tasks.
fn today_string() -> String {
    let now = Local::now();
    format!("{}/{}/{}", now.day(), now.month(), now.year())
}

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

const SHEET_COLUMN_WIDTH: u16 = 34;
const PROMPT_WIDTH: u16 = 50;

/// State for the color palette / sheet settings popup
#[derive(Debug, Clone)]
struct PalettePopup {
    /// 1-based display position of the sheet being edited
    sheet_index: usize,
    selected: usize,
}

/// Application state (separate from terminal for borrow checker)
struct AppState {
    should_quit: bool,
    store: SheetStore,
    view: Arc<ViewModel>,
    theme: ThemeConfig,
    // 0-based selection into the rendered view
    selected_sheet: usize,
    selected_task: usize,
    input_mode: InputMode,
    input_buffer: String,
    input_cursor: usize, // Cursor position in input_buffer
    // 1-based target sheet for the add-task prompt
    prompt_target: usize,
    palette_popup: Option<PalettePopup>,
    status_message: Option<String>,
}

impl AppState {
    /// Keep the selection inside the current view after structural changes.
    fn clamp_selection(&mut self) {
        let sheets = self.view.snapshot();
        if sheets.is_empty() {
            self.selected_sheet = 0;
            self.selected_task = 0;
            return;
        }
        if self.selected_sheet >= sheets.len() {
            self.selected_sheet = sheets.len() - 1;
        }
        let task_count = sheets[self.selected_sheet].tasks.len();
        if task_count == 0 {
            self.selected_task = 0;
        } else if self.selected_task >= task_count {
            self.selected_task = task_count - 1;
        }
    }

    /// Run a store operation, turning its errors into a status-line message.
    /// Nothing propagates past the user action that triggered it.
    fn run_op(&mut self, op: impl FnOnce(&mut SheetStore) -> Result<(), StoreError>) {
        match op(&mut self.store) {
            Ok(()) => {}
            Err(StoreError::EmptyTitle) => {
                self.status_message = Some("Please enter a valid task.".to_string());
            }
            Err(StoreError::SheetNotFound(_)) => {
                self.status_message = Some("Sheet not found. Please try again.".to_string());
            }
            Err(StoreError::Storage(err)) => {
                self.status_message = Some(format!("Could not save sheets: {err:#}"));
            }
        }
        self.clamp_selection();
    }
}

pub struct App {
    terminal: Terminal,
    state: AppState,
}

impl App {
    pub fn new(store: SheetStore, view: Arc<ViewModel>, theme: ThemeConfig) -> Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state: AppState {
                should_quit: false,
                store,
                view,
                theme,
                selected_sheet: 0,
                selected_task: 0,
                input_mode: InputMode::Normal,
                input_buffer: String::new(),
                input_cursor: 0,
                prompt_target: 1,
                palette_popup: None,
                status_message: None,
            },
        })
    }

    pub fn run(&mut self) -> Result<()> {
        while !self.state.should_quit {
            self.draw()?;

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.state.palette_popup.is_some() {
            self.handle_palette_key(key);
            return;
        }
        match self.state.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::InputTask => self.handle_prompt_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let state = &mut self.state;
        match key.code {
            KeyCode::Char('q') => state.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => {
                if state.selected_sheet > 0 {
                    state.selected_sheet -= 1;
                    state.clamp_selection();
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if state.selected_sheet + 1 < state.view.sheet_count() {
                    state.selected_sheet += 1;
                    state.clamp_selection();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if state.selected_task > 0 {
                    state.selected_task -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.selected_task += 1;
                state.clamp_selection();
            }
            KeyCode::Char('n') => {
                state.status_message = None;
                state.run_op(|store| store.add_sheet());
            }
            KeyCode::Char('a') | KeyCode::Char('o') => {
                state.status_message = None;
                state.prompt_target = state.selected_sheet + 1;
                state.input_buffer.clear();
                state.input_cursor = 0;
                state.input_mode = InputMode::InputTask;
            }
            // Checking a task off removes it; remaining tasks renumber.
            KeyCode::Char(' ') | KeyCode::Enter => {
                let sheet = state.selected_sheet + 1;
                let task = state.selected_task + 1;
                state.status_message = None;
                state.run_op(|store| store.remove_task(sheet, task));
            }
            KeyCode::Char('s') => {
                state.status_message = None;
                state.palette_popup = Some(PalettePopup {
                    sheet_index: state.selected_sheet + 1,
                    selected: 0,
                });
            }
            KeyCode::Esc => state.status_message = None,
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let state = &mut self.state;
        match key.code {
            KeyCode::Esc => {
                state.input_mode = InputMode::Normal;
                state.input_buffer.clear();
                state.input_cursor = 0;
            }
            KeyCode::Enter => {
                let title = state.input_buffer.clone();
                let target = state.prompt_target;
                let date = today_string();
                match state.store.add_task(target, &title, &date) {
                    Ok(()) => {
                        state.input_mode = InputMode::Normal;
                        state.input_buffer.clear();
                        state.input_cursor = 0;
                        state.status_message = None;
                    }
                    // Prompt stays open so the user can type a real title.
                    Err(StoreError::EmptyTitle) => {
                        state.status_message = Some("Please enter a valid task.".to_string());
                    }
                    Err(StoreError::SheetNotFound(_)) => {
                        state.input_mode = InputMode::Normal;
                        state.input_buffer.clear();
                        state.input_cursor = 0;
                        state.status_message =
                            Some("Sheet not found. Please try again.".to_string());
                    }
                    Err(StoreError::Storage(err)) => {
                        state.input_mode = InputMode::Normal;
                        state.status_message = Some(format!("Could not save sheets: {err:#}"));
                    }
                }
                state.clamp_selection();
            }
            KeyCode::Backspace => {
                if let Some(c) = state.input_buffer[..state.input_cursor].chars().next_back() {
                    state.input_cursor -= c.len_utf8();
                    state.input_buffer.remove(state.input_cursor);
                }
            }
            KeyCode::Left => {
                if let Some(c) = state.input_buffer[..state.input_cursor].chars().next_back() {
                    state.input_cursor -= c.len_utf8();
                }
            }
            KeyCode::Right => {
                if let Some(c) = state.input_buffer[state.input_cursor..].chars().next() {
                    state.input_cursor += c.len_utf8();
                }
            }
            KeyCode::Char(c) => {
                state.input_buffer.insert(state.input_cursor, c);
                state.input_cursor += c.len_utf8();
            }
            _ => {}
        }
    }

    fn handle_palette_key(&mut self, key: KeyEvent) {
        let state = &mut self.state;
        let Some(popup) = state.palette_popup.as_mut() else {
            return;
        };
        let palette_len = state.theme.palette.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => {
                state.palette_popup = None;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if popup.selected > 0 {
                    popup.selected -= 1;
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if popup.selected + 1 < palette_len {
                    popup.selected += 1;
                }
            }
            KeyCode::Enter => {
                let sheet = popup.sheet_index;
                let color = state.theme.palette.get(popup.selected).cloned();
                state.palette_popup = None;
                if let Some(color) = color {
                    state.run_op(|store| store.set_sheet_color(sheet, &color));
                }
            }
            KeyCode::Char('d') => {
                let sheet = popup.sheet_index;
                state.palette_popup = None;
                state.run_op(|store| store.delete_sheet(sheet));
            }
            _ => {}
        }
    }

    fn draw(&mut self) -> Result<()> {
        let state = &self.state;
        self.terminal.draw(|frame| {
            let area = frame.area();
            Self::draw_sheets(state, frame, area);

            if state.input_mode == InputMode::InputTask {
                Self::draw_prompt(state, frame, area);
            }
            if let Some(ref popup) = state.palette_popup {
                Self::draw_palette(state, popup, frame, area);
            }
        })?;

        Ok(())
    }

    fn draw_sheets(state: &AppState, frame: &mut Frame, area: Rect) {
        // Main layout: header, sheets, footer
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Sheets
                Constraint::Length(3), // Footer
            ])
            .split(area);

        let sheets = state.view.snapshot();

        // Header
        let header = Paragraph::new(format!(" tasksheet ({} sheets) ", sheets.len()))
            .style(Style::default().fg(hex_to_color(&state.theme.color_text)).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        // One column per sheet, scrolled so the selected sheet stays visible
        let visible = (chunks[1].width / SHEET_COLUMN_WIDTH).max(1) as usize;
        let first = if state.selected_sheet >= visible {
            state.selected_sheet + 1 - visible
        } else {
            0
        };

        let constraints: Vec<Constraint> = sheets
            .iter()
            .skip(first)
            .take(visible)
            .map(|_| Constraint::Length(SHEET_COLUMN_WIDTH))
            .collect();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(chunks[1]);

        for (slot, (i, sheet)) in sheets.iter().enumerate().skip(first).take(visible).enumerate()
        {
            let is_selected = i == state.selected_sheet;
            Self::draw_sheet_column(state, sheet, frame, columns[slot], is_selected);
        }

        // Footer: status message wins over the key help line
        let footer_text = match state.status_message {
            Some(ref msg) => format!(" {msg} "),
            None => build_footer_text(state.input_mode, state.palette_popup.is_some()),
        };
        let footer_style = if state.status_message.is_some() {
            Style::default().fg(Color::Red).bold()
        } else {
            Style::default().fg(hex_to_color(&state.theme.color_normal))
        };
        let footer = Paragraph::new(footer_text)
            .style(footer_style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn draw_sheet_column(
        state: &AppState,
        sheet: &SheetView,
        frame: &mut Frame,
        area: Rect,
        is_selected: bool,
    ) {
        let border_color = if is_selected {
            hex_to_color(&state.theme.color_selected)
        } else {
            hex_to_color(&state.theme.color_normal)
        };

        let mut block = Block::default()
            .title(format!(" {} ({}) ", sheet.heading, sheet.tasks.len()))
            .title_style(Style::default().fg(hex_to_color(&state.theme.color_text)).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        if let Some(ref color) = sheet.color {
            block = block.style(Style::default().bg(hex_to_color(color)));
        }

        let mut lines: Vec<Line> = Vec::new();
        for task in &sheet.tasks {
            let row_selected = is_selected && task.number == state.selected_task + 1;
            let checkbox = if task.checked { "[x]" } else { "[ ]" };
            let title_style = if row_selected {
                Style::default().fg(hex_to_color(&state.theme.color_selected)).bold()
            } else {
                Style::default().fg(hex_to_color(&state.theme.color_text))
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {checkbox} "), title_style),
                Span::styled(format!("{}. {}", task.number, task.title), title_style),
            ]));
            lines.push(Line::from(Span::styled(
                format!("       {}", task.date),
                Style::default().fg(hex_to_color(&state.theme.color_date)),
            )));
        }
        if sheet.tasks.is_empty() {
            lines.push(Line::from(Span::styled(
                " no tasks",
                Style::default().fg(hex_to_color(&state.theme.color_date)),
            )));
        }

        let tasks = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(tasks, area);
    }

    fn draw_prompt(state: &AppState, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(PROMPT_WIDTH, 3, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" New task for Sheet {} ", state.prompt_target))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(hex_to_color(&state.theme.color_popup_border)));
        let input = Paragraph::new(state.input_buffer.as_str()).block(block);
        frame.render_widget(input, popup_area);

        // Cursor inside the input box
        let cursor_col = state.input_buffer[..state.input_cursor].chars().count() as u16;
        let cursor_x = popup_area.x + 1 + cursor_col;
        frame.set_cursor_position((cursor_x.min(popup_area.right().saturating_sub(2)), popup_area.y + 1));
    }

    fn draw_palette(state: &AppState, popup: &PalettePopup, frame: &mut Frame, area: Rect) {
        let width = (state.theme.palette.len() as u16 * 4 + 4).max(30);
        let popup_area = centered_rect(width, 5, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" Sheet {} background ", popup.sheet_index))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(hex_to_color(&state.theme.color_popup_border)));

        let mut swatches: Vec<Span> = vec![Span::raw(" ")];
        for (i, color) in state.theme.palette.iter().enumerate() {
            let style = Style::default().bg(hex_to_color(color));
            swatches.push(Span::styled("  ", style));
            if i == popup.selected {
                swatches.push(Span::styled("< ", Style::default().bold()));
            } else {
                swatches.push(Span::raw("  "));
            }
        }
        let lines = vec![
            Line::from(swatches),
            Line::from(""),
            Line::from(Span::styled(
                " [Enter] apply  [d] delete sheet  [Esc] close",
                Style::default().fg(hex_to_color(&state.theme.color_normal)),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}

/// Fixed-size rectangle centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
