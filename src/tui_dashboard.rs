// File: src/tui_dashboard.rs
// Terminal UI dashboard using ratatui

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::sleep;
use tracing::{error, info};

use crate::blocks::{BlockRow, DotColor};
use crate::commands::CommandDispatcher;
use crate::connections::{parse_peer_address, ConnectionsView};
use crate::dashboard::{block_rows, connections_view, status_panel, StatusPanel};
use crate::data_models::{AppConfig, FullNodeState};
use crate::format::truncate_hash;
use crate::navigation::{Navigator, Route, SearchBox};
use crate::status::{StatusColor, StatusItem};
use crate::store::{reload_from_file, NodeStore};

const STATUS_COLUMNS: usize = 4;

/// Which table the arrow keys drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Blocks,
    Connections,
}

/// Which text field, if any, is taking keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    OpenConnection,
}

/// Application state for TUI
pub struct TuiApp {
    pub config: AppConfig,
    pub state: FullNodeState,
    updates: broadcast::Receiver<FullNodeState>,
    commands: CommandDispatcher,
    pub navigator: Navigator,
    pub search: SearchBox,
    pub peer_input: String,
    pub input_error: Option<String>,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub blocks_table: TableState,
    pub connections_table: TableState,
    pub reload_requested: bool,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new(config: AppConfig, store: &NodeStore, commands: CommandDispatcher, state: FullNodeState) -> Self {
        let navigator = Navigator::new(config.base_path.clone());
        let mut app = Self {
            config,
            state,
            updates: store.subscribe(),
            commands,
            navigator,
            search: SearchBox::default(),
            peer_input: String::new(),
            input_error: None,
            focus: Focus::Blocks,
            input_mode: InputMode::Normal,
            blocks_table: TableState::default(),
            connections_table: TableState::default(),
            reload_requested: false,
            should_quit: false,
        };
        app.clamp_selections();
        app
    }

    /// Take the newest node snapshot, if the store published any
    pub fn pull_updates(&mut self) {
        let mut changed = false;
        loop {
            match self.updates.try_recv() {
                Ok(state) => {
                    self.state = state;
                    changed = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    info!(skipped, "dashboard skipped stale node snapshots");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.clamp_selections();
        }
    }

    pub fn rows(&self) -> Vec<BlockRow> {
        block_rows(&self.state)
    }

    /// Handle keyboard input
    pub fn handle_input(&mut self, key: KeyCode) {
        match self.input_mode {
            InputMode::Search => self.handle_search_input(key),
            InputMode::OpenConnection => self.handle_peer_input(key),
            InputMode::Normal => self.handle_normal_input(key),
        }
    }

    fn handle_normal_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                if self.navigator.current() == &Route::Dashboard {
                    self.should_quit = true;
                } else {
                    self.navigator.back();
                }
            }
            KeyCode::Char('b') | KeyCode::Backspace => self.navigator.back(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Blocks => Focus::Connections,
                    Focus::Connections => Focus::Blocks,
                };
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Enter => {
                if self.focus == Focus::Blocks {
                    self.open_selected_block();
                }
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
            }
            KeyCode::Char('o') => {
                self.input_error = None;
                self.input_mode = InputMode::OpenConnection;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.focus == Focus::Connections {
                    self.close_selected_connection();
                }
            }
            KeyCode::Char('r') => {
                self.reload_requested = true;
            }
            _ => {}
        }
    }

    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                self.search.submit(&mut self.navigator);
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Esc => {
                self.search.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Char(c) => self.search.push_char(c),
            _ => {}
        }
    }

    fn handle_peer_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => match parse_peer_address(&self.peer_input) {
                Ok((host, port)) => {
                    self.commands.open_connection(&host, port);
                    self.peer_input.clear();
                    self.input_error = None;
                    self.input_mode = InputMode::Normal;
                }
                Err(e) => {
                    self.input_error = Some(e.to_string());
                }
            },
            KeyCode::Esc => {
                self.peer_input.clear();
                self.input_error = None;
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.peer_input.pop();
            }
            KeyCode::Char(c) => self.peer_input.push(c),
            _ => {}
        }
    }

    fn open_selected_block(&mut self) {
        let rows = self.rows();
        let route = self
            .blocks_table
            .selected()
            .and_then(|idx| rows.get(idx))
            .and_then(BlockRow::click_route);
        if let Some(route) = route {
            self.navigator.push(route);
        }
    }

    fn close_selected_connection(&mut self) {
        if let Some(conn) = self
            .connections_table
            .selected()
            .and_then(|idx| self.state.connections.get(idx))
        {
            self.commands.close_connection(&conn.node_id);
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let (table, len) = match self.focus {
            Focus::Blocks => (&mut self.blocks_table, self.state.unfinished_block_headers.len() + self.state.latest_blocks.len()),
            Focus::Connections => (&mut self.connections_table, self.state.connections.len()),
        };
        if len == 0 {
            table.select(None);
            return;
        }
        let current = table.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        table.select(Some(next));
    }

    fn clamp_selections(&mut self) {
        let block_count = self.state.unfinished_block_headers.len() + self.state.latest_blocks.len();
        clamp_table(&mut self.blocks_table, block_count);
        clamp_table(&mut self.connections_table, self.state.connections.len());
    }
}

fn clamp_table(table: &mut TableState, len: usize) {
    if len == 0 {
        table.select(None);
    } else {
        let selected = table.selected().unwrap_or(0).min(len - 1);
        table.select(Some(selected));
    }
}

/// Restores the terminal even when the dashboard errors out
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Run the TUI dashboard
pub async fn run_tui_mode(
    config: &AppConfig,
    store: NodeStore,
    commands: CommandDispatcher,
) -> Result<()> {
    let state = store.snapshot().await;
    let mut app = TuiApp::new(config.clone(), &store, commands, state);

    let mut guard = TerminalGuard::new()?;

    // Main event loop
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.pull_updates();

        // Draw UI
        guard.terminal.draw(|f| ui(f, &mut app))?;

        // Handle events
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key.code);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        // Check if should quit
        if app.should_quit {
            break;
        }

        if app.reload_requested {
            app.reload_requested = false;
            if let Err(e) = reload_from_file(&store, &app.config.snapshot_path).await {
                error!("manual reload failed: {}", e);
            }
        }

        // Small async sleep to prevent busy waiting
        sleep(Duration::from_millis(50)).await;
    }

    drop(guard);
    println!("👋 Full node dashboard closed");

    Ok(())
}

/// Render the UI
fn ui(f: &mut Frame, app: &mut TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Page
            Constraint::Length(3), // Input bar
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    match app.navigator.current().clone() {
        Route::Dashboard => render_dashboard(f, chunks[1], app),
        Route::Block(hash) => render_block_page(f, chunks[1], app, &hash),
    }

    render_input_bar(f, chunks[2], app);
    render_footer(f, chunks[3], app);
}

/// Render header section
fn render_header(f: &mut Frame, area: Rect, app: &TuiApp) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled("Full Node", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled(" - ", Style::default().fg(Color::Gray)),
        Span::styled(app.navigator.location(), Style::default().fg(Color::White)),
    ])])
    .block(Block::default().borders(Borders::ALL).title("Full Node Dashboard"));

    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &mut TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(6)])
        .split(area);

    render_status(f, chunks[0], &status_panel(&app.state));

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let rows = app.rows();
    let blocks_focused = app.focus == Focus::Blocks;
    render_blocks(f, panels[0], &rows, &mut app.blocks_table, blocks_focused);

    let connections = connections_view(&app.state);
    let connections_focused = app.focus == Focus::Connections;
    render_connections(f, panels[1], &connections, &mut app.connections_table, connections_focused);
}

fn status_style(color: StatusColor) -> Style {
    match color {
        StatusColor::Orange => Style::default().fg(Color::Rgb(255, 165, 0)),
        StatusColor::Red => Style::default().fg(Color::Red),
        StatusColor::Green => Style::default().fg(Color::Green),
        // terminal foreground, black would vanish on dark themes
        StatusColor::Black => Style::default(),
    }
}

/// Render the status grid, or a loading note while there is no snapshot
fn render_status(f: &mut Frame, area: Rect, panel: &StatusPanel) {
    let outer = Block::default().borders(Borders::ALL).title("Full Node Status");

    let items = match panel {
        StatusPanel::Loading => {
            let loading = Paragraph::new("Loading blockchain state...")
                .style(Style::default().fg(Color::Gray))
                .block(outer);
            f.render_widget(loading, area);
            return;
        }
        StatusPanel::Ready(items) => items,
    };

    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let row_count = items.len().div_ceil(STATUS_COLUMNS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); row_count])
        .split(inner);

    for (row_area, chunk) in row_areas.iter().zip(items.chunks(STATUS_COLUMNS)) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, STATUS_COLUMNS as u32); STATUS_COLUMNS])
            .split(*row_area);
        for (cell, item) in cells.iter().zip(chunk) {
            f.render_widget(status_cell(item), *cell);
        }
    }
}

fn status_cell(item: &StatusItem) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        item.value.as_str(),
        status_style(item.color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).title(item.label.as_str()))
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Render recent blocks
fn render_blocks(f: &mut Frame, area: Rect, rows: &[BlockRow], table_state: &mut TableState, focused: bool) {
    let header_cells = ["Hash", "Height", "Time", "State"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let table_rows = rows.iter().map(|row| {
        let hash = row.hash_cell();
        let dot_color = match hash.dot {
            DotColor::Success => Color::Green,
            DotColor::Warning => Color::Yellow,
        };

        let height = row.height_cell();
        let height_style = if height.is_italic() {
            Style::default().add_modifier(Modifier::ITALIC)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(Line::from(vec![
                Span::styled("● ", Style::default().fg(dot_color)),
                Span::raw(truncate_hash(&hash.hash, 18)),
            ])),
            Cell::from(Span::styled(height.display(), height_style)),
            Cell::from(row.time_cell()),
            Cell::from(row.state_label()),
        ])
    });

    let widths = [
        Constraint::Length(25),
        Constraint::Length(9),
        Constraint::Length(20),
        Constraint::Length(10),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(focused))
                .title("Blocks"),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, table_state);
}

/// Render peer connections and the last open-connection error
fn render_connections(
    f: &mut Frame,
    area: Rect,
    view: &ConnectionsView,
    table_state: &mut TableState,
    focused: bool,
) {
    let (table_area, error_area) = match view.error {
        Some(_) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(3)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        }
        None => (area, None),
    };

    let header_cells = ["Node ID", "Type", "Address", "Up/Down", "Connected"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let table_rows = view.connections.iter().map(|conn| {
        Row::new(vec![
            Cell::from(conn.short_node_id.clone()),
            Cell::from(conn.node_type.clone()),
            Cell::from(conn.address.clone()),
            Cell::from(format!("{}/{}", conn.uploaded, conn.downloaded)),
            Cell::from(conn.connected_since.clone()),
        ])
    });

    let widths = [
        Constraint::Length(13),
        Constraint::Length(10),
        Constraint::Min(12),
        Constraint::Length(20),
        Constraint::Length(19),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(focused))
                .title(format!("Connections ({})", view.connections.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, table_area, table_state);

    if let (Some(area), Some(message)) = (error_area, view.error.as_deref()) {
        let error = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Open connection failed"));
        f.render_widget(error, area);
    }
}

/// Render the block page the navigator points at
fn render_block_page(f: &mut Frame, area: Rect, app: &TuiApp, hash: &str) {
    let label = |text: &'static str| Span::styled(text, Style::default().add_modifier(Modifier::BOLD));

    let mut lines = vec![
        Line::from(vec![label("Location: "), Span::raw(app.navigator.location())]),
        Line::from(""),
    ];

    let rows = app.rows();
    let known = rows.iter().find(|row| row.matches_hash(hash));
    match known {
        Some(row) => {
            lines.push(Line::from(vec![label("Hash: "), Span::styled(hash.to_string(), Style::default().fg(Color::Green))]));
            lines.push(Line::from(vec![label("Height: "), Span::raw(row.height_cell().display())]));
            lines.push(Line::from(vec![label("Time: "), Span::raw(row.time_cell())]));
            lines.push(Line::from(vec![label("State: "), Span::raw(row.state_label())]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                format!("Block {} is not in the recent blocks list", hash),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let page = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Block"));
    f.render_widget(page, area);
}

/// Render the search box, or the peer address field while it is active
fn render_input_bar(f: &mut Frame, area: Rect, app: &TuiApp) {
    let (title, value, active) = match app.input_mode {
        InputMode::OpenConnection => (
            match &app.input_error {
                Some(e) => e.clone(),
                None => "Connect to peer host:port (Enter to connect, Esc to cancel)".to_string(),
            },
            app.peer_input.as_str(),
            true,
        ),
        InputMode::Search => (
            "Search block by hash (Enter to open, Esc to cancel)".to_string(),
            app.search.value(),
            true,
        ),
        InputMode::Normal => ("Search block by hash (/ to edit)".to_string(), app.search.value(), false),
    };

    let title_style = if app.input_error.is_some() && app.input_mode == InputMode::OpenConnection {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let value_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };

    let input = Paragraph::new(value).style(value_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(title, title_style)),
    );
    f.render_widget(input, area);
}

/// Render footer
fn render_footer(f: &mut Frame, area: Rect, app: &TuiApp) {
    let help = match app.navigator.current() {
        Route::Dashboard => "q quit | Tab switch panel | ↑/↓ select | Enter open block | / search | o connect | d disconnect | r reload",
        Route::Block(_) => "Esc/b back | / search | q quit",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::{
        BlockRecord, BlockchainState, Connection, FoliageSubBlock, NodeCommand, RewardChainSubBlock, SyncState,
    };
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn config() -> AppConfig {
        AppConfig {
            snapshot_path: PathBuf::from("node_state.json"),
            base_path: "/dashboard".to_string(),
            command_outbox: None,
        }
    }

    fn sample_state() -> FullNodeState {
        FullNodeState {
            blockchain_state: Some(BlockchainState {
                sync: SyncState {
                    synced: true,
                    ..Default::default()
                },
                ..Default::default()
            }),
            full_node_connected: true,
            connections: vec![Connection {
                node_id: "peer-one".into(),
                node_type: 1,
                peer_host: "10.0.0.2".into(),
                peer_port: 8444,
                ..Default::default()
            }],
            open_connection_error: None,
            latest_blocks: vec![BlockRecord {
                header_hash: Some("0xabc".into()),
                reward_chain_sub_block: Some(RewardChainSubBlock { height: 9 }),
                ..Default::default()
            }],
            unfinished_block_headers: vec![BlockRecord {
                foliage_sub_block: Some(FoliageSubBlock {
                    foliage_block_hash: Some("0xpending".into()),
                    height: Some(10),
                }),
                ..Default::default()
            }],
        }
    }

    fn app_with(state: FullNodeState) -> (TuiApp, NodeStore, UnboundedReceiver<NodeCommand>) {
        let store = NodeStore::new(state.clone());
        let (commands, rx) = CommandDispatcher::channel();
        let app = TuiApp::new(config(), &store, commands, state);
        (app, store, rx)
    }

    fn type_text(app: &mut TuiApp, text: &str) {
        for c in text.chars() {
            app.handle_input(KeyCode::Char(c));
        }
    }

    fn rendered(app: &mut TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn enter_on_unfinished_row_does_not_navigate() {
        let (mut app, _store, _rx) = app_with(sample_state());
        assert_eq!(app.blocks_table.selected(), Some(0));

        app.handle_input(KeyCode::Enter);

        assert_eq!(app.navigator.current(), &Route::Dashboard);
    }

    #[test]
    fn enter_on_finished_row_opens_block() {
        let (mut app, _store, _rx) = app_with(sample_state());

        app.handle_input(KeyCode::Down);
        app.handle_input(KeyCode::Enter);

        assert_eq!(app.navigator.location(), "/dashboard/block/0xabc");

        app.handle_input(KeyCode::Esc);
        assert_eq!(app.navigator.current(), &Route::Dashboard);
        assert!(!app.should_quit);
    }

    #[test]
    fn search_submits_literal_and_clears() {
        let (mut app, _store, _rx) = app_with(sample_state());

        app.handle_input(KeyCode::Char('/'));
        type_text(&mut app, "0xdead");
        app.handle_input(KeyCode::Enter);

        assert_eq!(app.navigator.location(), "/dashboard/block/0xdead");
        assert_eq!(app.search.value(), "");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn q_is_typed_while_searching() {
        let (mut app, _store, _rx) = app_with(sample_state());
        app.handle_input(KeyCode::Char('/'));
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        assert_eq!(app.search.value(), "q");
    }

    #[test]
    fn open_connection_dispatches_parsed_address() {
        let (mut app, _store, mut rx) = app_with(sample_state());

        app.handle_input(KeyCode::Char('o'));
        type_text(&mut app, "bad address");
        app.handle_input(KeyCode::Enter);
        assert!(app.input_error.is_some());
        assert!(rx.try_recv().is_err());

        for _ in 0.."bad address".len() {
            app.handle_input(KeyCode::Backspace);
        }
        type_text(&mut app, "node.example.org:8444");
        app.handle_input(KeyCode::Enter);

        assert_eq!(
            rx.try_recv().unwrap(),
            NodeCommand::OpenConnection {
                host: "node.example.org".into(),
                port: 8444
            }
        );
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input_error.is_none());
    }

    #[test]
    fn close_selected_connection() {
        let (mut app, _store, mut rx) = app_with(sample_state());

        // ignored while the blocks table has focus
        app.handle_input(KeyCode::Char('d'));
        assert!(rx.try_recv().is_err());

        app.handle_input(KeyCode::Tab);
        app.handle_input(KeyCode::Char('d'));
        assert_eq!(
            rx.try_recv().unwrap(),
            NodeCommand::CloseConnection { node_id: "peer-one".into() }
        );
    }

    #[tokio::test]
    async fn pulls_replaced_snapshot() {
        let (mut app, store, _rx) = app_with(FullNodeState::default());
        assert_eq!(app.blocks_table.selected(), None);

        store.replace(sample_state()).await;
        app.pull_updates();

        assert_eq!(app.state, sample_state());
        assert_eq!(app.blocks_table.selected(), Some(0));
    }

    #[test]
    fn renders_loading_indicator() {
        let (mut app, _store, _rx) = app_with(FullNodeState::default());
        let screen = rendered(&mut app);
        assert!(screen.contains("Loading blockchain state..."));
    }

    #[test]
    fn renders_dashboard_panels() {
        let mut state = sample_state();
        state.open_connection_error = Some("connection refused".into());
        let (mut app, _store, _rx) = app_with(state);

        let screen = rendered(&mut app);

        assert!(screen.contains("Synced"));
        assert!(screen.contains("Connected"));
        assert!(screen.contains("0xpending"));
        assert!(screen.contains("Unfinished"));
        assert!(screen.contains("Finished"));
        assert!(screen.contains("Full Node"));
        assert!(screen.contains("connection refused"));
    }

    #[test]
    fn renders_block_page() {
        let (mut app, _store, _rx) = app_with(sample_state());
        app.navigator.push(Route::Block("0xabc".into()));
        assert!(rendered(&mut app).contains("/dashboard/block/0xabc"));

        app.navigator.push(Route::Block("0xmissing".into()));
        assert!(rendered(&mut app).contains("not in the recent blocks list"));
    }

    #[test]
    fn empty_search_lands_on_not_found_page() {
        let mut state = sample_state();
        state.latest_blocks.push(BlockRecord {
            reward_chain_sub_block: Some(RewardChainSubBlock { height: 77 }),
            ..Default::default()
        });
        let (mut app, _store, _rx) = app_with(state);

        app.handle_input(KeyCode::Char('/'));
        app.handle_input(KeyCode::Enter);
        assert_eq!(app.navigator.current(), &Route::Block(String::new()));

        let screen = rendered(&mut app);
        assert!(screen.contains("not in the recent blocks list"));
        assert!(!screen.contains("Height: 77"));
    }
}
