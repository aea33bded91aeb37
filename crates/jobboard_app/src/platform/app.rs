use std::io::{self, Write};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context};
use board_logging::{board_debug, board_error, board_info};
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use jobboard_core::{update, AppState, AppViewModel, IdsStatus, IdsView, Msg};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui;
use crate::cli::AppConfig;

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let destination = if config.plain {
        LogDestination::FileAndStderr(config.log_file.clone())
    } else {
        LogDestination::File(config.log_file.clone())
    };
    logging::initialize(destination, board_logging::level_for(config.verbose));
    board_info!(
        "Starting job board (batch size {}, plain {})",
        config.batch_size,
        config.plain
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::new(config.fetch.clone(), config.mode, msg_tx)
        .context("failed to start the fetch engine")?;
    let mut board = Board::new(AppState::with_batch_size(config.batch_size), effects, msg_rx);
    board.dispatch(Msg::Started);

    if config.plain {
        run_plain(&mut board, config.pages, &mut io::stdout().lock())
    } else {
        run_tui(&mut board)
    }
}

/// Owns the state and serializes every message through `update`.
struct Board {
    state: AppState,
    effects: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    engine_stopped: bool,
}

impl Board {
    fn new(state: AppState, effects: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        Self {
            state,
            effects,
            msg_rx,
            engine_stopped: false,
        }
    }

    /// Applies one message and runs its effects. Returns whether the view changed.
    fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.effects.enqueue(effects);
        was_dirty
    }

    fn process_pending_messages(&mut self) -> bool {
        let mut dirty = false;
        loop {
            match self.msg_rx.try_recv() {
                Ok(msg) => dirty |= self.dispatch(msg),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    dirty |= self.engine_disconnected();
                    break;
                }
            }
        }
        dirty
    }

    /// Blocks until one message arrives or `timeout` passes.
    fn wait_for_message(&mut self, timeout: Duration) {
        match self.msg_rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.dispatch(msg);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.engine_disconnected();
            }
        }
    }

    /// The event relay hung up, so no result can arrive any more.
    fn engine_disconnected(&mut self) -> bool {
        if self.engine_stopped {
            return false;
        }
        self.engine_stopped = true;
        board_error!("Engine event channel closed");
        self.dispatch(Msg::EngineStopped("engine thread stopped".to_string()))
    }

    fn is_settled(&self) -> bool {
        !matches!(
            self.state.ids_status(),
            IdsStatus::NotStarted | IdsStatus::Loading
        ) && !self.state.is_loading()
    }
}

fn run_plain<W: Write>(board: &mut Board, pages: usize, out: &mut W) -> anyhow::Result<()> {
    let mut printed = 0;
    let mut batches = 0;

    loop {
        while !board.is_settled() {
            board.wait_for_message(Duration::from_millis(ui::constants::TICK_MS));
        }

        let view = board.state.view();
        for job in &view.jobs[printed..] {
            for line in ui::render::job_text(job, &Local) {
                writeln!(out, "{line}")?;
            }
            writeln!(out)?;
        }
        printed = view.jobs.len();
        if view.batch.is_none() && printed > 0 {
            batches += 1;
        }

        if batches >= pages || !view.can_load_more {
            writeln!(out, "{}", ui::render::status_text(&view, 0))?;
            if let Some(reason) = &view.halted {
                bail!("engine stopped: {reason}");
            }
            if let IdsView::Failed { reason } = &view.ids {
                bail!("failed to load jobs: {reason}");
            }
            return Ok(());
        }
        board_debug!("Plain mode requesting batch {}", batches + 1);
        board.dispatch(Msg::LoadMoreClicked);
    }
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        io::stdout()
            .execute(EnterAlternateScreen)
            .context("failed to enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
    }
}

/// View-local state that never reaches the core.
#[derive(Debug, Default)]
struct UiState {
    scroll: usize,
    tick: u64,
    should_quit: bool,
}

impl UiState {
    fn clamp_scroll(&mut self, total_lines: usize, view_lines: usize) {
        self.scroll = self.scroll.min(total_lines.saturating_sub(view_lines));
    }
}

enum UiAction {
    Board(Msg),
    ScrollUp(usize),
    ScrollDown(usize),
    ScrollTop,
    ScrollBottom,
    Quit,
}

fn map_key(code: KeyCode, modifiers: KeyModifiers, page: usize) -> Option<UiAction> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(UiAction::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(UiAction::Quit),
        KeyCode::Char('m') | KeyCode::Enter | KeyCode::Char(' ') => {
            Some(UiAction::Board(Msg::LoadMoreClicked))
        }
        KeyCode::Up | KeyCode::Char('k') => Some(UiAction::ScrollUp(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(UiAction::ScrollDown(1)),
        KeyCode::PageUp => Some(UiAction::ScrollUp(page)),
        KeyCode::PageDown => Some(UiAction::ScrollDown(page)),
        KeyCode::Home => Some(UiAction::ScrollTop),
        KeyCode::End => Some(UiAction::ScrollBottom),
        _ => None,
    }
}

fn run_tui(board: &mut Board) -> anyhow::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to create terminal")?;
    let mut ui_state = UiState::default();
    let tick = Duration::from_millis(ui::constants::TICK_MS);
    let mut redraw = true;

    while !ui_state.should_quit {
        redraw |= board.process_pending_messages();

        let view = board.state.view();
        let mut areas = ui::layout::areas(terminal.size()?);
        // The spinner needs a fresh frame every tick.
        let animating = view.loading || view.ids == IdsView::Loading;
        if redraw || animating {
            ui_state.tick = ui_state.tick.wrapping_add(1);
            areas = render_frame(&mut terminal, &view, &mut ui_state)?;
            redraw = false;
        }

        if !event::poll(tick)? {
            continue;
        }
        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            Event::Resize(..) => {
                redraw = true;
                continue;
            }
            _ => continue,
        };
        let page = areas.list_lines().max(1);
        redraw = true;
        match map_key(key.code, key.modifiers, page) {
            Some(UiAction::Board(msg)) => {
                board.dispatch(msg);
            }
            Some(UiAction::ScrollUp(lines)) => {
                ui_state.scroll = ui_state.scroll.saturating_sub(lines);
            }
            Some(UiAction::ScrollDown(lines)) => {
                ui_state.scroll = ui_state.scroll.saturating_add(lines);
            }
            Some(UiAction::ScrollTop) => ui_state.scroll = 0,
            Some(UiAction::ScrollBottom) => ui_state.scroll = usize::MAX,
            Some(UiAction::Quit) => ui_state.should_quit = true,
            None => redraw = false,
        }
    }

    board_info!("Job board closed");
    Ok(())
}

/// Draws one frame with the list wrapped to the current width and the
/// scroll offset clamped to the wrapped content.
fn render_frame<B: Backend>(
    terminal: &mut Terminal<B>,
    view: &AppViewModel,
    ui_state: &mut UiState,
) -> io::Result<ui::layout::BoardAreas> {
    let areas = ui::layout::areas(terminal.size()?);
    let lines = ui::render::job_lines(view, &Local, areas.list_width());
    ui_state.clamp_scroll(lines.len(), areas.list_lines());
    terminal.draw(|frame| {
        ui::render::draw(frame, &areas, view, lines, ui_state.scroll, ui_state.tick)
    })?;
    Ok(areas)
}
