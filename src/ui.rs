use chrono::{Datelike, Local, NaiveDate};
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};
use unicode_width::UnicodeWidthChar;

use crate::form::{EntryForm, CONTENT, LABELS};
use ujournal::calendar::{self, CalendarMonth, WEEKDAY_LABELS};
use ujournal::JournalEntry;

pub enum Action {
    Write,
    View,
    Edit,
    Delete,
    Search,
    Calendar,
    Media,
    Atlas,
    Refresh,
    Quit,
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    selected: usize,
    status: Option<String>,
}

/// Cuts `text` to at most `width` terminal columns.
fn truncate(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            out.push('…');
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

fn entry_item(entry: &JournalEntry, width: usize) -> ListItem<'static> {
    let when = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
    let mut details = Vec::new();
    if let Some(place) = entry.location_name.as_deref().filter(|_| entry.has_location) {
        details.push(format!("@ {place}"));
    } else if let (true, Some((lat, lon))) = (entry.has_location, entry.coordinates()) {
        details.push(format!("@ {lat:.4}, {lon:.4}"));
    }
    if entry.photo().is_some() {
        details.push("[photo]".to_string());
    }
    ListItem::new(vec![
        Line::from(Span::raw(truncate(
            &format!("[{}] {}", when, entry.headline()),
            width,
        ))),
        Line::from(Span::styled(
            details.join("  "),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn screen(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area)
}

fn render_title(f: &mut Frame, area: Rect, title: &str) {
    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn render_help(f: &mut Frame, area: Rect, help: &str) {
    let help = Paragraph::new(help.to_string())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(help, area);
}

fn render_status(f: &mut Frame, area: Rect, status: Option<&str>) {
    if let Some(status) = status {
        let status = Paragraph::new(status.to_string())
            .style(Style::default().fg(Color::Magenta))
            .alignment(Alignment::Center);
        f.render_widget(status, area);
    }
}

fn render_entries(f: &mut Frame, area: Rect, title: &str, entries: &[JournalEntry], selected: usize) {
    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = entries.iter().map(|e| entry_item(e, width)).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let selected = (!entries.is_empty()).then_some(selected);
    f.render_stateful_widget(list, area, &mut ListState::default().with_selected(selected));
}

fn read_key() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            selected: 0,
            status: None,
        })
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// The feed entry under the cursor.
    pub fn selected<'a>(&self, entries: &'a [JournalEntry]) -> Option<&'a JournalEntry> {
        entries.get(self.selected)
    }

    pub fn display(&mut self, entries: &[JournalEntry]) -> Result<()> {
        self.selected = self.selected.min(entries.len().saturating_sub(1));
        let selected = self.selected;
        let status = self.status.clone();

        self.terminal.draw(|f| {
            let chunks = screen(f.area());
            render_title(f, chunks[0], "Journey");
            render_entries(f, chunks[1], "Entries", entries, selected);

            let help = if entries.is_empty() {
                "w: write  c: calendar  r: refresh  q: quit"
            } else {
                "Enter: view  w: write  e: edit  d: delete  s: search  c: calendar  m: media  a: atlas  r: refresh  q: quit"
            };
            render_help(f, chunks[2], help);
            render_status(f, chunks[3], status.as_deref());
        })?;

        Ok(())
    }

    pub fn handle_input(&mut self, entries: &[JournalEntry]) -> Result<Option<Action>> {
        let key = read_key()?;
        self.status = None;
        let has_entries = !entries.is_empty();
        let action = match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if self.selected + 1 < entries.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char('w') => Some(Action::Write),
            KeyCode::Char('c') => Some(Action::Calendar),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Enter if has_entries => Some(Action::View),
            KeyCode::Char('e') if has_entries => Some(Action::Edit),
            KeyCode::Char('d') if has_entries => Some(Action::Delete),
            KeyCode::Char('s') if has_entries => Some(Action::Search),
            KeyCode::Char('m') if has_entries => Some(Action::Media),
            KeyCode::Char('a') if has_entries => Some(Action::Atlas),
            _ => None,
        };
        Ok(action)
    }

    /// Edits `form` until `submit` accepts it (Ctrl-S) or the user gives up (Esc).
    /// Tab and Shift-Tab move between fields; Enter adds a line to the content.
    pub fn edit_form<T>(
        &mut self,
        title: &str,
        mut form: EntryForm,
        submit: impl Fn(&EntryForm) -> std::result::Result<T, String>,
    ) -> Result<Option<T>> {
        let mut field = CONTENT;
        let mut error: Option<String> = None;

        loop {
            self.terminal.draw(|f| {
                let mut constraints = vec![Constraint::Length(3), Constraint::Min(6)];
                constraints.extend([Constraint::Length(3); 5]);
                constraints.extend([Constraint::Length(1), Constraint::Length(1)]);
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints(constraints)
                    .split(f.area());

                render_title(f, chunks[0], title);
                for (i, label) in LABELS.iter().enumerate() {
                    let mut text = form.fields[i].clone();
                    let mut block = Block::default().borders(Borders::ALL).title(*label);
                    if i == field {
                        text.push('|');
                        block = block.border_style(Style::default().fg(Color::Cyan));
                    }
                    let input = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
                    f.render_widget(input, chunks[i + 1]);
                }
                render_help(
                    f,
                    chunks[LABELS.len() + 1],
                    "Tab/Shift-Tab: next/previous field, Ctrl-S: save, Esc: cancel",
                );
                render_status(f, chunks[LABELS.len() + 2], error.as_deref());
            })?;

            let key = read_key()?;
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    match submit(&form) {
                        Ok(value) => return Ok(Some(value)),
                        Err(message) => error = Some(message),
                    }
                }
                KeyCode::Tab => field = (field + 1) % LABELS.len(),
                KeyCode::BackTab => field = (field + LABELS.len() - 1) % LABELS.len(),
                KeyCode::Enter if field == CONTENT => form.fields[field].push('\n'),
                KeyCode::Enter => field = (field + 1) % LABELS.len(),
                KeyCode::Char(c) => form.fields[field].push(c),
                KeyCode::Backspace => {
                    form.fields[field].pop();
                }
                _ => {}
            }
        }
    }

    /// Lets the user pick one of `entries`; `None` on Esc.
    pub fn pick_entry(
        &mut self,
        title: &str,
        heading: &str,
        entries: &[JournalEntry],
    ) -> Result<Option<JournalEntry>> {
        let mut selected = 0;

        loop {
            self.terminal.draw(|f| {
                let chunks = screen(f.area());
                render_title(f, chunks[0], title);
                render_entries(f, chunks[1], heading, entries, selected);
                let help = if entries.is_empty() {
                    "Nothing to show. Esc: back"
                } else {
                    "Up/Down: navigate, Enter: open, Esc: back"
                };
                render_help(f, chunks[2], help);
            })?;

            match read_key()?.code {
                KeyCode::Up => selected = selected.saturating_sub(1),
                KeyCode::Down => {
                    if selected + 1 < entries.len() {
                        selected += 1;
                    }
                }
                KeyCode::Enter if !entries.is_empty() => {
                    return Ok(Some(entries[selected].clone()));
                }
                KeyCode::Esc => return Ok(None),
                _ => {}
            }
        }
    }

    pub fn view_full_entry(&mut self, entry: &JournalEntry, photo_note: Option<&str>) -> Result<()> {
        let local = entry.timestamp.with_timezone(&Local);
        let mut text = Text::from(entry.content.clone());
        let lines = &mut text.lines;
        lines.push(Line::from(""));
        if entry.has_location {
            if let Some(place) = &entry.location_name {
                lines.push(Line::from(format!("Place: {place}")));
            }
            if let Some((lat, lon)) = entry.coordinates() {
                lines.push(Line::from(format!("Coordinates: {lat:.5}, {lon:.5}")));
            }
        }
        if let Some(image) = entry.photo() {
            lines.push(Line::from(format!("Photo: {}", image.display())));
        }
        if let Some(note) = photo_note {
            lines.push(Line::from(Span::styled(
                note.to_string(),
                Style::default().fg(Color::DarkGray),
            )));
        }

        self.terminal.draw(|f| {
            let chunks = screen(f.area());
            render_title(
                f,
                chunks[0],
                &format!("{} at {}", local.format("%A, %B %-d, %Y"), local.format("%H:%M")),
            );
            let content = Paragraph::new(text.clone())
                .block(Block::default().borders(Borders::ALL).title("Entry"))
                .wrap(Wrap { trim: false });
            f.render_widget(content, chunks[1]);
            render_help(f, chunks[2], "Any key: back");
        })?;

        read_key()?;
        Ok(())
    }

    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        self.terminal.draw(|f| {
            let chunks = screen(f.area());
            render_title(f, chunks[0], question);
            render_help(f, chunks[2], "y: yes, any other key: no");
        })?;
        Ok(matches!(read_key()?.code, KeyCode::Char('y') | KeyCode::Char('Y')))
    }

    pub fn get_search_query(&mut self) -> Result<Option<String>> {
        let mut query = String::new();

        loop {
            self.terminal.draw(|f| {
                let chunks = screen(f.area());
                render_title(f, chunks[0], "Search Entries");
                let input = Paragraph::new(query.clone())
                    .block(Block::default().borders(Borders::ALL).title("Search Query"));
                let area = Rect {
                    height: 3.min(chunks[1].height),
                    ..chunks[1]
                };
                f.render_widget(input, area);
                render_help(f, chunks[2], "Enter: submit, Esc: cancel");
            })?;

            match read_key()?.code {
                KeyCode::Enter => return Ok(Some(query)),
                KeyCode::Char(c) => query.push(c),
                KeyCode::Backspace => {
                    query.pop();
                }
                KeyCode::Esc => return Ok(None),
                _ => {}
            }
        }
    }

    /// Month calendar over `entries`. Returns the entry the user opened, if any.
    pub fn calendar(&mut self, entries: &[JournalEntry]) -> Result<Option<JournalEntry>> {
        let today = Local::now().date_naive();
        let mut selected: NaiveDate = today;

        loop {
            let month = CalendarMonth::containing(selected);
            let weeks = calendar::month_grid(month);
            let marked = calendar::days_with_entries(entries, month.year(), month.month(), &Local);
            let on_day = calendar::entries_on_date(entries, selected, &Local);

            self.terminal.draw(|f| {
                let chunks = screen(f.area());
                render_title(f, chunks[0], &format!("< {} >", month.title()));

                let body = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(weeks.len() as u16 + 3), Constraint::Min(3)])
                    .split(chunks[1]);

                let mut lines = vec![Line::from(
                    WEEKDAY_LABELS
                        .iter()
                        .map(|d| Span::styled(format!("{d:^5}"), Style::default().fg(Color::Yellow)))
                        .collect::<Vec<_>>(),
                )];
                for week in &weeks {
                    let cells: Vec<Span> = week
                        .iter()
                        .map(|cell| match cell {
                            None => Span::raw("     "),
                            Some(day) => {
                                let mut style = Style::default();
                                if marked.contains(day) {
                                    style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                                }
                                if *day == selected.day() {
                                    style = style.add_modifier(Modifier::REVERSED);
                                }
                                Span::styled(format!("{day:^5}"), style)
                            }
                        })
                        .collect();
                    lines.push(Line::from(cells));
                }
                let grid = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL))
                    .alignment(Alignment::Center);
                f.render_widget(grid, body[0]);

                let heading = if on_day.is_empty() {
                    "No entries for this date".to_string()
                } else {
                    format!("Entries for {}", selected.format("%B %-d, %Y"))
                };
                render_entries(f, body[1], &heading, &on_day, 0);
                render_help(
                    f,
                    chunks[2],
                    "Arrows: move day, [/]: previous/next month, t: today, Enter: open, Esc: back",
                );
            })?;

            let step = |date: NaiveDate, days: i64| {
                date.checked_add_signed(chrono::Duration::days(days)).unwrap_or(date)
            };
            match read_key()?.code {
                KeyCode::Left => selected = step(selected, -1),
                KeyCode::Right => selected = step(selected, 1),
                KeyCode::Up => selected = step(selected, -7),
                KeyCode::Down => selected = step(selected, 7),
                KeyCode::Char('[') => {
                    let previous = month.previous();
                    selected = previous.day(selected.day().min(previous.days_in_month())).unwrap_or(selected);
                }
                KeyCode::Char(']') => {
                    let next = month.next();
                    selected = next.day(selected.day().min(next.days_in_month())).unwrap_or(selected);
                }
                KeyCode::Char('t') => selected = today,
                KeyCode::Enter if on_day.len() == 1 => return Ok(on_day.into_iter().next()),
                KeyCode::Enter if !on_day.is_empty() => {
                    let title = format!("Entries for {}", selected.format("%B %-d, %Y"));
                    if let Some(entry) = self.pick_entry(&title, "Entries", &on_day)? {
                        return Ok(Some(entry));
                    }
                }
                KeyCode::Esc => return Ok(None),
                _ => {}
            }
        }
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
