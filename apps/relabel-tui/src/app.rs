//! Application state and rendering for the review console.

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table, TableState};
use ratatui::Frame;
use tokio::runtime::Handle;

use relabel_client::Viewer;
use relabel_core::{Notice, NoticeLevel, EDITABLE_FIELDS};

/// Table columns after the id: header label and row field name.
const COLUMNS: &[(&str, &str)] = &[
    ("Human", "human_output"),
    ("Model", "model_output_v1"),
    ("Date", "date"),
    ("CDNG", "cdng"),
    ("NGDU", "ngdu"),
    ("GU", "gu"),
    ("Well", "oiler_number"),
    ("Route", "rut"),
    ("IP", "ip_address"),
    ("ISU", "isu"),
];

enum Mode {
    Browse,
    /// Editing the active session; `field` indexes EDITABLE_FIELDS.
    Edit { field: usize },
}

pub struct App {
    viewer: Viewer,
    runtime: Handle,
    table: TableState,
    mode: Mode,
    last_notice: Option<Notice>,
}

impl App {
    pub fn new(viewer: Viewer, runtime: Handle) -> Self {
        let mut table = TableState::default();
        table.select(Some(0));
        Self {
            viewer,
            runtime,
            table,
            mode: Mode::Browse,
            last_notice: None,
        }
    }

    pub async fn shutdown(self) {
        self.viewer.shutdown().await;
    }

    /// Handle a key press. Returns `true` to quit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Edit { field } => {
                self.handle_edit_key(key, field);
                false
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_row_id() {
                    if self.viewer.begin_edit(id) {
                        self.mode = Mode::Edit { field: 0 };
                    }
                }
            }
            KeyCode::Char(' ') => {
                if let Some(path) = self.selected_audio_path() {
                    // Failures surface through the notice queue.
                    let _ = self.runtime.block_on(self.viewer.toggle_playback(&path));
                }
            }
            KeyCode::Char('s') => self.viewer.stop_playback(),
            KeyCode::Char('[') => self.seek_relative(-0.05),
            KeyCode::Char(']') => self.seek_relative(0.05),
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, key: KeyCode, field: usize) {
        match key {
            KeyCode::Esc => {
                self.viewer.cancel_edit();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => {
                if self.runtime.block_on(self.viewer.commit_edit()).is_ok() {
                    self.mode = Mode::Browse;
                }
                // On failure the session is preserved; stay in edit mode.
            }
            KeyCode::Tab => {
                self.mode = Mode::Edit {
                    field: (field + 1) % EDITABLE_FIELDS.len(),
                };
            }
            KeyCode::BackTab => {
                self.mode = Mode::Edit {
                    field: (field + EDITABLE_FIELDS.len() - 1) % EDITABLE_FIELDS.len(),
                };
            }
            KeyCode::Backspace => {
                let name = EDITABLE_FIELDS[field];
                if let Some(mut value) = self.viewer.draft_field(name) {
                    value.pop();
                    self.viewer.update_field(name, value);
                }
            }
            KeyCode::Char(c) => {
                let name = EDITABLE_FIELDS[field];
                let mut value = self.viewer.draft_field(name).unwrap_or_default();
                value.push(c);
                self.viewer.update_field(name, value);
            }
            _ => {}
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        for notice in self.viewer.drain_notices() {
            self.last_notice = Some(notice);
        }

        let [table_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(4)]).areas(frame.area());

        let rows = self.viewer.rows();
        self.clamp_selection(rows.len());
        let editing_id = self.viewer.editing_id();

        let header = TableRow::new(
            std::iter::once("Id")
                .chain(COLUMNS.iter().map(|(label, _)| *label))
                .map(Cell::from)
                .collect::<Vec<_>>(),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));

        let body = rows.iter().map(|row| {
            let style = if editing_id == Some(row.id) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let cells = std::iter::once(row.id.to_string())
                .chain(
                    COLUMNS
                        .iter()
                        .map(|(_, field)| row.field(field).unwrap_or("").to_string()),
                )
                .map(Cell::from)
                .collect::<Vec<_>>();
            TableRow::new(cells).style(style)
        });

        let mut widths = vec![Constraint::Length(5)];
        widths.extend([Constraint::Min(16), Constraint::Min(16), Constraint::Length(10)]);
        widths.extend(std::iter::repeat(Constraint::Length(8)).take(COLUMNS.len() - 3));

        let table = Table::new(body, widths)
            .header(header)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .block(Block::default().borders(Borders::ALL).title("relabel"));
        frame.render_stateful_widget(table, table_area, &mut self.table);

        let status = Paragraph::new(vec![self.playback_line(), self.message_line()])
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, status_area);
    }

    fn playback_line(&self) -> Line<'static> {
        let playback = self.viewer.playback();
        if playback.is_idle() {
            Line::from("no track")
        } else {
            Line::from(format!(
                "{playback} · {:3.0}%",
                playback.progress() * 100.0
            ))
        }
    }

    fn message_line(&self) -> Line<'static> {
        if let Mode::Edit { field } = self.mode {
            let name = EDITABLE_FIELDS[field];
            let value = self.viewer.draft_field(name).unwrap_or_default();
            return Line::from(format!(
                "editing {name}: {value}  (Tab next field · Enter save · Esc cancel)"
            ));
        }
        match &self.last_notice {
            Some(notice) => {
                let color = match notice.level {
                    NoticeLevel::Info => Color::Green,
                    NoticeLevel::Warning => Color::Yellow,
                    NoticeLevel::Error => Color::Red,
                };
                Line::styled(notice.message.clone(), Style::default().fg(color))
            }
            None => Line::from("e edit · space play/pause · s stop · [ ] seek · q quit"),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.viewer.rows().len();
        if len == 0 {
            return;
        }
        let current = self.table.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table.select(Some(next as usize));
    }

    fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.table.select(None);
        } else {
            let selected = self.table.selected().unwrap_or(0).min(len - 1);
            self.table.select(Some(selected));
        }
    }

    fn selected_row_id(&self) -> Option<relabel_core::RowId> {
        let rows = self.viewer.rows();
        self.table.selected().and_then(|i| rows.get(i)).map(|r| r.id)
    }

    fn selected_audio_path(&self) -> Option<String> {
        let rows = self.viewer.rows();
        self.table
            .selected()
            .and_then(|i| rows.get(i))
            .map(|r| r.audio_file_path.clone())
    }

    fn seek_relative(&self, delta: f64) {
        let playback = self.viewer.playback();
        if !playback.is_idle() {
            self.viewer.seek_playback(playback.progress() + delta);
        }
    }
}
