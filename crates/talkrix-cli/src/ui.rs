use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Terminal;
use tokio::runtime::Handle;

use talkrix_api::ApiClient;
use talkrix_api::ApiResult;
use talkrix_api::CallQuery;
use talkrix_core::builtin_tools::is_builtin;
use talkrix_core::export::call_export_filename;
use talkrix_core::listing::Searchable;
use talkrix_core::routing::Route;
use talkrix_core::tour::TourEffect;
use talkrix_core::tour::TourEvent;
use talkrix_core::tour::TourPhase;
use talkrix_core::{
    reduce, DashboardAction, DashboardEffect, DashboardOverlay, DashboardState, DeleteTarget,
    FetchRequest, InputMode, ListView, Notice, NoticeLevel, Paginator, Resource, RuntimeAction,
    Section, UiTheme, UserAction, UserBadge, KEY_HINTS,
};

use crate::context::AppContext;
use crate::output::duration;
use crate::output::page_footer;
use crate::output::truncate;

const POLL_INTERVAL: Duration = Duration::from_millis(16);

struct TuiGuard;

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

/// Opens the full-screen dashboard for the stored session.
pub async fn launch(mut ctx: AppContext) -> anyhow::Result<()> {
    let (session, client) = ctx.authorize(Route::dashboard())?;
    let mut state = DashboardState::new(ctx.config.page_size(), ctx.sessions.tour_completed());
    state.theme = ctx.config.ui.theme;
    state.sidebar_collapsed = ctx.sessions.sidebar_collapsed();
    state.user = Some(UserBadge {
        name: session.name,
        email: session.email,
    });
    let auto_open_tour = ctx.sessions.should_auto_open_tour()?;
    let runtime = Handle::current();

    tokio::task::spawn_blocking(move || {
        let (tx, rx) = mpsc::channel();
        let mut host = Host {
            ctx,
            client,
            runtime,
            tx,
        };
        run(&mut state, &mut host, rx, auto_open_tour)
    })
    .await?
}

fn run(
    state: &mut DashboardState,
    host: &mut Host,
    rx: mpsc::Receiver<RuntimeAction>,
    auto_open_tour: bool,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
    let _guard = TuiGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let effects = reduce(
        state,
        DashboardAction::Runtime(RuntimeAction::Mounted { auto_open_tour }),
    );
    if host.apply(effects) == Flow::Exit {
        return Ok(());
    }
    run_app(&mut terminal, state, host, &rx)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Side of the dashboard that talks to the outside world: API tasks on the
/// tokio runtime, the session file and the export file.
struct Host {
    ctx: AppContext,
    client: ApiClient,
    runtime: Handle,
    tx: mpsc::Sender<RuntimeAction>,
}

impl Host {
    fn apply(&mut self, effects: Vec<DashboardEffect>) -> Flow {
        let mut flow = Flow::Continue;
        for effect in effects {
            match effect {
                DashboardEffect::RequestFrame => {}
                DashboardEffect::Fetch(request) => self.spawn_fetch(request),
                DashboardEffect::Delete(target) => self.spawn_delete(target),
                DashboardEffect::WriteExport { contents, rows } => self.write_export(contents, rows),
                DashboardEffect::Tour(effect) => self.tour_effect(effect),
                DashboardEffect::PersistSidebar(collapsed) => {
                    if let Err(err) = self.ctx.sessions.set_sidebar_collapsed(collapsed) {
                        tracing::warn!("failed to persist sidebar state: {}", err);
                    }
                }
                DashboardEffect::Logout => {
                    if let Err(err) = self.ctx.sessions.teardown() {
                        tracing::warn!("failed to clear session: {}", err);
                    }
                    flow = Flow::Exit;
                }
            }
        }
        flow
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        tracing::debug!("[Dashboard] fetch {:?}", request);
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let action = match request {
                FetchRequest::Overview { period } => loaded(
                    client.dashboard_stats(period).await,
                    RuntimeAction::OverviewLoaded,
                ),
                FetchRequest::Agents => {
                    loaded(client.list_agents().await, RuntimeAction::AgentsLoaded)
                }
                FetchRequest::Tools => loaded(client.list_tools().await, RuntimeAction::ToolsLoaded),
                FetchRequest::Corpora => {
                    loaded(client.list_corpora().await, RuntimeAction::CorporaLoaded)
                }
                FetchRequest::Campaigns => {
                    loaded(client.list_campaigns().await, RuntimeAction::CampaignsLoaded)
                }
                FetchRequest::Calls {
                    page,
                    limit,
                    status,
                    call_type,
                } => {
                    let query = CallQuery {
                        page,
                        limit,
                        status,
                        call_type,
                    };
                    loaded(client.list_calls(&query).await, RuntimeAction::CallsLoaded)
                }
                FetchRequest::CallStats => {
                    loaded(client.call_stats().await, RuntimeAction::CallStatsLoaded)
                }
                FetchRequest::Settings => {
                    loaded(client.all_settings().await, RuntimeAction::SettingsLoaded)
                }
            };
            let _ = tx.send(action);
        });
    }

    fn spawn_delete(&self, target: DeleteTarget) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = match target.section {
                Section::Agents => client.delete_agent(&target.id).await,
                Section::Tools => client.delete_tool(&target.id).await,
                Section::Knowledge => client.delete_corpus(&target.id).await,
                Section::Campaigns => client.delete_campaign(&target.id).await,
                Section::Overview | Section::Calls | Section::Settings => Ok(()),
            };
            let action = match result {
                Err(err) if err.is_unauthorized() => RuntimeAction::SessionExpired,
                result => RuntimeAction::Deleted {
                    target,
                    result: result.map_err(|err| err.to_string()),
                },
            };
            let _ = tx.send(action);
        });
    }

    fn write_export(&self, contents: String, rows: usize) {
        let path = PathBuf::from(call_export_filename(chrono::Local::now().date_naive()));
        let notice = match fs::write(&path, contents) {
            Ok(()) => {
                tracing::info!("exported {} calls to {}", rows, path.display());
                Notice::success(format!("Exported {} calls to {}", rows, path.display()))
            }
            Err(err) => Notice::error(format!("Could not write {}: {}", path.display(), err)),
        };
        let _ = self.tx.send(RuntimeAction::Notify(notice));
    }

    fn tour_effect(&mut self, effect: TourEffect) {
        match effect {
            TourEffect::PersistCompleted => {
                if let Err(err) = self.ctx.sessions.set_tour_completed(true) {
                    tracing::warn!("failed to persist tour completion: {}", err);
                }
            }
            TourEffect::ClearCompleted => {
                if let Err(err) = self.ctx.sessions.set_tour_completed(false) {
                    tracing::warn!("failed to reset tour: {}", err);
                }
            }
            TourEffect::NotifyCompleted => {
                let client = self.client.clone();
                self.runtime.spawn(async move {
                    if let Err(err) = client.complete_tour().await {
                        tracing::warn!("[Dashboard] tour completion not recorded: {}", err);
                    }
                });
                let _ = self.tx.send(RuntimeAction::Notify(tour_closed_notice()));
            }
            TourEffect::ScheduleExit(delay) => {
                let tx = self.tx.clone();
                self.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(RuntimeAction::TourExitElapsed);
                });
            }
            // The reducer turns navigation into a section change itself.
            TourEffect::Navigate(_) => {}
        }
    }
}

/// Shown after finishing, skipping or leaving the tour through an action.
fn tour_closed_notice() -> Notice {
    Notice::info("Tour closed. Press o to open it again.")
}

/// Maps an API result onto its loaded action. A rejected token ends the
/// session instead.
fn loaded<T>(
    result: ApiResult<T>,
    wrap: fn(Result<T, String>) -> RuntimeAction,
) -> RuntimeAction {
    match result {
        Err(err) if err.is_unauthorized() => RuntimeAction::SessionExpired,
        result => wrap(result.map_err(|err| err.to_string())),
    }
}

enum KeyHandlerResult {
    Continue(Vec<DashboardEffect>),
    Exit,
}

fn user(state: &mut DashboardState, action: UserAction) -> Vec<DashboardEffect> {
    reduce(state, DashboardAction::User(action))
}

fn handle_tour_keys(key: KeyEvent, state: &mut DashboardState) -> KeyHandlerResult {
    let event = match key.code {
        KeyCode::Right | KeyCode::Enter | KeyCode::Char('n') => Some(TourEvent::Next),
        KeyCode::Left | KeyCode::Char('b') => Some(TourEvent::Back),
        KeyCode::Esc | KeyCode::Char('s') => Some(TourEvent::Skip),
        KeyCode::Char('a') => Some(TourEvent::InvokeAction),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|n| TourEvent::Select(n as usize - 1)),
        _ => None,
    };
    let effects = match event {
        Some(event) => user(state, UserAction::Tour(event)),
        None => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_confirm_delete_keys(key: KeyEvent, state: &mut DashboardState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Char('y') | KeyCode::Enter => user(state, UserAction::ConfirmDelete),
        KeyCode::Char('n') | KeyCode::Esc => user(state, UserAction::CloseOverlay),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_help_keys(key: KeyEvent, state: &mut DashboardState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            user(state, UserAction::CloseOverlay)
        }
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_input_keys(key: KeyEvent, state: &mut DashboardState) -> KeyHandlerResult {
    let effects = match key.code {
        KeyCode::Esc => user(state, UserAction::CancelInput),
        KeyCode::Enter => user(state, UserAction::SubmitInput),
        KeyCode::Backspace => user(state, UserAction::InputBackspace),
        KeyCode::Char(c) => user(state, UserAction::InputChar(c)),
        _ => Vec::new(),
    };
    KeyHandlerResult::Continue(effects)
}

fn handle_global_keys(key: KeyEvent, state: &mut DashboardState) -> KeyHandlerResult {
    let action = match key.code {
        KeyCode::Char('q') => return KeyHandlerResult::Exit,
        KeyCode::Tab => UserAction::NextSection,
        KeyCode::BackTab => UserAction::PrevSection,
        KeyCode::Char(c @ '1'..='7') => {
            let idx = c.to_digit(10).map_or(0, |n| n as usize - 1);
            UserAction::SelectSection(Section::ALL[idx])
        }
        KeyCode::Up | KeyCode::Char('k') => UserAction::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => UserAction::MoveDown,
        KeyCode::Char('[') | KeyCode::Left => UserAction::PrevPage,
        KeyCode::Char(']') | KeyCode::Right => UserAction::NextPage,
        KeyCode::Home => UserAction::FirstPage,
        KeyCode::End => UserAction::LastPage,
        KeyCode::Char('g') => UserAction::BeginPageJump,
        KeyCode::Char('/') => UserAction::BeginSearch,
        KeyCode::Char('x') => UserAction::ClearSearch,
        KeyCode::Char('r') => UserAction::Refresh,
        KeyCode::Char('d') | KeyCode::Delete => UserAction::RequestDelete,
        KeyCode::Char('s') => UserAction::CycleStatusFilter,
        KeyCode::Char('t') => UserAction::CycleTypeFilter,
        KeyCode::Char('p') => UserAction::CyclePeriod,
        KeyCode::Char('e') => UserAction::ExportCalls,
        KeyCode::Char('b') => UserAction::ToggleSidebar,
        KeyCode::Char('c') => UserAction::CycleTheme,
        KeyCode::Char('o') => UserAction::Tour(TourEvent::Open),
        KeyCode::Char('R') => UserAction::Tour(TourEvent::Reset),
        KeyCode::Char('L') => UserAction::Logout,
        KeyCode::Char('?') => UserAction::ToggleHelp,
        KeyCode::Esc => UserAction::DismissNotice,
        _ => return KeyHandlerResult::Continue(Vec::new()),
    };
    KeyHandlerResult::Continue(user(state, action))
}

fn handle_key_event(key: KeyEvent, state: &mut DashboardState) -> KeyHandlerResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyHandlerResult::Exit;
    }

    if state.tour.current_step().is_some() {
        return handle_tour_keys(key, state);
    }
    match &state.overlay {
        DashboardOverlay::ConfirmDelete(_) => handle_confirm_delete_keys(key, state),
        DashboardOverlay::Help => handle_help_keys(key, state),
        DashboardOverlay::None if state.input_mode != InputMode::Normal => {
            handle_input_keys(key, state)
        }
        DashboardOverlay::None => handle_global_keys(key, state),
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut DashboardState,
    host: &mut Host,
    rx: &mpsc::Receiver<RuntimeAction>,
) -> io::Result<()> {
    loop {
        while let Ok(action) = rx.try_recv() {
            let effects = reduce(state, DashboardAction::Runtime(action));
            if host.apply(effects) == Flow::Exit {
                return Ok(());
            }
        }

        terminal.draw(|f| ui(f, state))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, state) {
                    KeyHandlerResult::Exit => return Ok(()),
                    KeyHandlerResult::Continue(effects) => {
                        if host.apply(effects) == Flow::Exit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
struct UiPalette {
    accent: Color,
    accent_alt: Color,
    success: Color,
    warning: Color,
    danger: Color,
    muted: Color,
    border: Color,
    panel_bg: Color,
    selected_bg: Color,
}

fn palette_for(theme: UiTheme) -> UiPalette {
    match theme {
        UiTheme::Classic => UiPalette {
            accent: Color::Cyan,
            accent_alt: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            muted: Color::DarkGray,
            border: Color::Gray,
            panel_bg: Color::Black,
            selected_bg: Color::DarkGray,
        },
        UiTheme::Midnight => UiPalette {
            accent: Color::LightBlue,
            accent_alt: Color::LightMagenta,
            success: Color::LightGreen,
            warning: Color::Yellow,
            danger: Color::LightRed,
            muted: Color::Gray,
            border: Color::LightBlue,
            panel_bg: Color::Black,
            selected_bg: Color::Rgb(24, 24, 48),
        },
        UiTheme::Ocean => UiPalette {
            accent: Color::LightCyan,
            accent_alt: Color::Cyan,
            success: Color::LightGreen,
            warning: Color::LightYellow,
            danger: Color::LightRed,
            muted: Color::Gray,
            border: Color::Cyan,
            panel_bg: Color::Black,
            selected_bg: Color::Rgb(0, 36, 48),
        },
        UiTheme::Forest => UiPalette {
            accent: Color::LightGreen,
            accent_alt: Color::Green,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
            muted: Color::Gray,
            border: Color::LightGreen,
            panel_bg: Color::Black,
            selected_bg: Color::Rgb(8, 32, 10),
        },
    }
}

fn get_spinner() -> &'static str {
    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let idx = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() / 100) as usize
        % frames.len();
    frames[idx]
}

fn panel_block(title: String, palette: UiPalette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.panel_bg))
        .title(title)
}

fn ui(f: &mut ratatui::Frame, state: &DashboardState) {
    let palette = palette_for(state.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Notice or input
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], state, palette);

    let sidebar_w = if state.sidebar_collapsed { 7 } else { 24 };
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_w), Constraint::Min(0)])
        .split(chunks[1]);
    render_sidebar(f, body[0], state, palette);

    match state.section {
        Section::Overview => render_overview(f, body[1], state, palette),
        Section::Settings => render_settings(f, body[1], state, palette),
        _ => render_list_section(f, body[1], state, palette),
    }

    render_status_line(f, chunks[2], state, palette);
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("?", Style::default().fg(palette.accent)),
        Span::styled(" help  ", Style::default().fg(palette.muted)),
        Span::styled("Tab", Style::default().fg(palette.accent)),
        Span::styled(" section  ", Style::default().fg(palette.muted)),
        Span::styled("[ ]", Style::default().fg(palette.accent)),
        Span::styled(" page  ", Style::default().fg(palette.muted)),
        Span::styled("/", Style::default().fg(palette.accent)),
        Span::styled(" search  ", Style::default().fg(palette.muted)),
        Span::styled("o", Style::default().fg(palette.accent)),
        Span::styled(" tour  ", Style::default().fg(palette.muted)),
        Span::styled("q", Style::default().fg(palette.warning)),
        Span::styled(" quit", Style::default().fg(palette.muted)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);

    match &state.overlay {
        DashboardOverlay::Help => render_help(f, palette),
        DashboardOverlay::ConfirmDelete(target) => render_confirm_delete(f, target, palette),
        DashboardOverlay::None => {}
    }
    render_tour(f, state, palette);
}

fn render_header(f: &mut ratatui::Frame, area: Rect, state: &DashboardState, palette: UiPalette) {
    let who = state
        .user
        .as_ref()
        .and_then(|u| u.name.clone().or_else(|| u.email.clone()))
        .unwrap_or_else(|| "signed in".to_string());
    let activity = if state.is_loading() {
        format!("{} loading", get_spinner())
    } else {
        "ready".to_string()
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Talkrix",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(palette.muted)),
        Span::raw(state.section.label()),
        Span::styled(" | ", Style::default().fg(palette.muted)),
        Span::styled(who, Style::default().fg(palette.accent_alt)),
        Span::styled(" | ", Style::default().fg(palette.muted)),
        Span::styled(
            format!("Theme:{}", state.theme.label()),
            Style::default().fg(palette.muted),
        ),
        Span::styled(" | ", Style::default().fg(palette.muted)),
        Span::raw(activity),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    );
    f.render_widget(header, area);
}

/// Section the tour is pointing at, if any.
fn tour_highlight(state: &DashboardState) -> Option<Section> {
    state.tour.current_step().map(|(_, step)| step.highlight)
}

fn render_sidebar(f: &mut ratatui::Frame, area: Rect, state: &DashboardState, palette: UiPalette) {
    let highlight = tour_highlight(state);
    let items: Vec<ListItem> = Section::ALL
        .iter()
        .enumerate()
        .map(|(idx, section)| {
            let text = if state.sidebar_collapsed {
                format!(" {}", idx + 1)
            } else {
                format!(" {} {}", idx + 1, section.label())
            };
            let mut style = Style::default();
            if *section == state.section {
                style = style
                    .bg(palette.selected_bg)
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD);
            }
            if highlight == Some(*section) {
                style = style
                    .fg(palette.warning)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            ListItem::new(text).style(style)
        })
        .collect();
    let title = if state.sidebar_collapsed { "" } else { "Menu" };
    f.render_widget(List::new(items).block(panel_block(title.to_string(), palette)), area);
}

/// Placeholder text for a resource that has nothing to show yet.
fn resource_placeholder<T>(resource: &Resource<T>, palette: UiPalette) -> Option<Line<'static>> {
    match resource {
        Resource::Idle | Resource::Loading => Some(Line::styled(
            format!("{} Loading…", get_spinner()),
            Style::default().fg(palette.muted),
        )),
        Resource::Failed(err) => Some(Line::styled(
            format!("Error: {err}  (r to retry)"),
            Style::default().fg(palette.danger),
        )),
        Resource::Ready(_) => None,
    }
}

fn stat_line(label: &str, value: String, palette: UiPalette) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<20}"), Style::default().fg(palette.muted)),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn render_overview(f: &mut ratatui::Frame, area: Rect, state: &DashboardState, palette: UiPalette) {
    let title = format!("Dashboard ({}, p to change)", state.overview.period.as_str());
    let lines = match (&state.overview.stats, resource_placeholder(&state.overview.stats, palette)) {
        (Resource::Ready(stats), _) => vec![
            stat_line("Total calls", stats.total_calls.to_string(), palette),
            stat_line("Total minutes", format!("{:.1}", stats.total_minutes), palette),
            stat_line("Active agents", stats.active_agents.to_string(), palette),
            stat_line("Active campaigns", stats.active_campaigns.to_string(), palette),
            stat_line("Success rate", format!("{:.1}%", stats.success_rate), palette),
            stat_line("Total cost", format!("${:.2}", stats.total_cost), palette),
        ],
        (_, placeholder) => placeholder.into_iter().collect(),
    };
    let p = Paragraph::new(lines).block(panel_block(title, palette));
    f.render_widget(p, area);
}

fn render_settings(f: &mut ratatui::Frame, area: Rect, state: &DashboardState, palette: UiPalette) {
    let dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let mut lines = Vec::new();
    match &state.settings.general {
        Resource::Ready(general) => {
            lines.push(Line::styled("General", Style::default().fg(palette.accent)));
            lines.push(stat_line("Company", dash(&general.company_name), palette));
            lines.push(stat_line("Timezone", dash(&general.timezone), palette));
            lines.push(stat_line("Default agent", dash(&general.default_agent_id), palette));
            lines.push(stat_line(
                "Max concurrent",
                general
                    .max_concurrent_calls
                    .map_or_else(|| "-".to_string(), |v| v.to_string()),
                palette,
            ));
            lines.push(stat_line(
                "Max duration",
                general
                    .max_call_duration_minutes
                    .map_or_else(|| "-".to_string(), |v| format!("{v} min")),
                palette,
            ));
        }
        other => lines.extend(resource_placeholder(other, palette)),
    }
    if let Resource::Ready(telephony) = &state.settings.telephony {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Telephony", Style::default().fg(palette.accent)));
        lines.push(stat_line("Provider", dash(&telephony.provider), palette));
        lines.push(stat_line("Account SID", dash(&telephony.account_sid), palette));
        lines.push(stat_line(
            "Phone numbers",
            if telephony.phone_numbers.is_empty() {
                "-".to_string()
            } else {
                telephony.phone_numbers.join(", ")
            },
            palette,
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Edit with `talkrix settings update` and `talkrix settings telephony`.",
        Style::default().fg(palette.muted),
    ));
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel_block("Settings".to_string(), palette));
    f.render_widget(p, area);
}

/// One list section ready to draw.
struct ListPanel {
    title: String,
    headers: &'static [&'static str],
    widths: Vec<Constraint>,
    rows: Vec<Vec<String>>,
    selected: usize,
    empty: String,
    placeholder: Option<Line<'static>>,
    footer: String,
}

fn list_panel<T: Searchable>(
    list: &ListView<T>,
    title: String,
    headers: &'static [&'static str],
    widths: &[u16],
    noun: &str,
    palette: UiPalette,
    cells: impl Fn(&T) -> Vec<String>,
) -> ListPanel {
    let empty = if list.query.trim().is_empty() {
        format!("No {noun} yet.")
    } else {
        format!("No {noun} match \"{}\".", list.query)
    };
    let title = if list.query.is_empty() {
        title
    } else {
        format!("{title}  [search: {}]", list.query)
    };
    ListPanel {
        title,
        headers,
        widths: widths.iter().map(|w| Constraint::Percentage(*w)).collect(),
        rows: list.visible().into_iter().map(cells).collect(),
        selected: list.selected,
        empty,
        placeholder: resource_placeholder(&list.items, palette),
        footer: page_footer(&list.paginator),
    }
}

fn section_panel(state: &DashboardState, palette: UiPalette) -> Option<ListPanel> {
    let panel = match state.section {
        Section::Agents => list_panel(
            &state.agents,
            "Agents".to_string(),
            &["Name", "Voice", "Model", "Tools"],
            &[40, 20, 25, 15],
            "agents",
            palette,
            |agent| {
                vec![
                    agent.name.clone(),
                    agent.voice.clone().unwrap_or_default(),
                    agent.model.clone().unwrap_or_default(),
                    agent.selected_tools.len().to_string(),
                ]
            },
        ),
        Section::Tools => list_panel(
            &state.tools,
            "Tools".to_string(),
            &["Name", "Kind", "Description"],
            &[25, 12, 63],
            "tools",
            palette,
            |tool| {
                let kind = if is_builtin(&tool.id) { "built-in" } else { "custom" };
                vec![tool.name.clone(), kind.to_string(), truncate(&tool.description, 80)]
            },
        ),
        Section::Knowledge => list_panel(
            &state.corpora,
            "Knowledge Base".to_string(),
            &["Name", "Documents", "Description"],
            &[30, 12, 58],
            "knowledge bases",
            palette,
            |corpus| {
                vec![
                    corpus.name.clone(),
                    corpus.document_count.to_string(),
                    truncate(corpus.description.as_deref().unwrap_or_default(), 80),
                ]
            },
        ),
        Section::Campaigns => list_panel(
            &state.campaigns,
            "Campaigns".to_string(),
            &["Name", "Status", "Contacts", "Scheduled"],
            &[40, 15, 15, 30],
            "campaigns",
            palette,
            |campaign| {
                vec![
                    campaign.name.clone(),
                    campaign.status.clone(),
                    campaign.contact_count.to_string(),
                    campaign.scheduled_at.clone().unwrap_or_default(),
                ]
            },
        ),
        Section::Calls => {
            let filter = format!(
                "Call History  status:{} type:{}",
                state.calls.status.map_or("all", |s| s.label()),
                state.calls.call_type.map_or("all", |t| t.label()),
            );
            let mut panel = list_panel(
                &state.calls.list,
                filter,
                &["Agent", "To", "Status", "Type", "Duration", "Started"],
                &[22, 16, 13, 11, 10, 28],
                "calls",
                palette,
                |call| {
                    vec![
                        call.agent_name.clone(),
                        call.to_number.clone(),
                        call.status.label().to_string(),
                        call.call_type.label().to_string(),
                        duration(call.duration_seconds),
                        call.started_at.clone().unwrap_or_default(),
                    ]
                },
            );
            if let Resource::Ready(stats) = &state.calls.stats {
                panel.footer = format!(
                    "{}  |  {} total, {} completed, {} failed",
                    panel.footer, stats.total_calls, stats.completed_calls, stats.failed_calls
                );
            }
            panel
        }
        Section::Overview | Section::Settings => return None,
    };
    Some(panel)
}

fn render_list_section(
    f: &mut ratatui::Frame,
    area: Rect,
    state: &DashboardState,
    palette: UiPalette,
) {
    let Some(panel) = section_panel(state, palette) else {
        return;
    };
    let block = panel_block(panel.title, palette);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    if let Some(placeholder) = panel.placeholder {
        f.render_widget(Paragraph::new(placeholder), parts[0]);
        return;
    }
    if panel.rows.is_empty() {
        f.render_widget(
            Paragraph::new(Line::styled(panel.empty, Style::default().fg(palette.muted))),
            parts[0],
        );
        return;
    }

    let header = Row::new(panel.headers.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    );
    let rows = panel.rows.into_iter().map(Row::new);
    let table = Table::new(rows, panel.widths)
        .header(header)
        .row_highlight_style(Style::default().bg(palette.selected_bg))
        .highlight_symbol("> ");
    let mut table_state = TableState::default();
    table_state.select(Some(panel.selected));
    f.render_stateful_widget(table, parts[0], &mut table_state);

    f.render_widget(
        Paragraph::new(Line::styled(panel.footer, Style::default().fg(palette.muted))),
        parts[1],
    );
}

fn render_status_line(
    f: &mut ratatui::Frame,
    area: Rect,
    state: &DashboardState,
    palette: UiPalette,
) {
    let line = match state.input_mode {
        InputMode::Search => Line::from(vec![
            Span::styled("Search: ", Style::default().fg(palette.accent)),
            Span::raw(format!("{}_", state.input_buffer)),
            Span::styled("  Enter keep  Esc cancel", Style::default().fg(palette.muted)),
        ]),
        InputMode::PageJump => {
            let pages = state.paginator().map_or(1, Paginator::total_pages);
            Line::from(vec![
                Span::styled(
                    format!("Go to page (1-{pages}): "),
                    Style::default().fg(palette.accent),
                ),
                Span::raw(format!("{}_", state.input_buffer)),
            ])
        }
        InputMode::Normal => match &state.notice {
            Some(notice) => {
                let color = match notice.level {
                    NoticeLevel::Info => palette.accent,
                    NoticeLevel::Success => palette.success,
                    NoticeLevel::Error => palette.danger,
                };
                Line::styled(notice.message.to_string(), Style::default().fg(color))
            }
            None => Line::raw(""),
        },
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_help(f: &mut ratatui::Frame, palette: UiPalette) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);
    let lines: Vec<Line> = KEY_HINTS
        .iter()
        .map(|hint| {
            Line::from(vec![
                Span::styled(format!("{:<18}", hint.keys), Style::default().fg(palette.accent)),
                Span::raw(hint.label),
            ])
        })
        .collect();
    let p = Paragraph::new(lines).block(panel_block("Keys (Esc to close)".to_string(), palette));
    f.render_widget(p, area);
}

fn render_confirm_delete(f: &mut ratatui::Frame, target: &DeleteTarget, palette: UiPalette) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let lines = vec![
        Line::raw(format!("Delete {}?", target.label)),
        Line::styled("This cannot be undone.", Style::default().fg(palette.muted)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[y] Delete", Style::default().fg(palette.danger)),
            Span::raw("   "),
            Span::styled("[n] Cancel", Style::default().fg(palette.muted)),
        ]),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(panel_block("Confirm".to_string(), palette));
    f.render_widget(p, area);
}

fn render_tour(f: &mut ratatui::Frame, state: &DashboardState, palette: UiPalette) {
    if state.tour.phase == TourPhase::Exiting {
        return;
    }
    let Some((idx, step)) = state.tour.current_step() else {
        return;
    };
    let total = state.tour.len();
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);

    let dots: String = (0..total)
        .map(|i| if i == idx { '●' } else { '○' })
        .collect();
    let mut keys = vec![
        Span::styled("→", Style::default().fg(palette.accent)),
        Span::styled(
            if idx + 1 == total { " finish  " } else { " next  " },
            Style::default().fg(palette.muted),
        ),
    ];
    if idx > 0 {
        keys.push(Span::styled("←", Style::default().fg(palette.accent)));
        keys.push(Span::styled(" back  ", Style::default().fg(palette.muted)));
    }
    if let Some(action) = step.action {
        keys.push(Span::styled("a", Style::default().fg(palette.accent)));
        keys.push(Span::styled(
            format!(" open {}  ", action.label()),
            Style::default().fg(palette.muted),
        ));
    }
    keys.push(Span::styled("Esc", Style::default().fg(palette.warning)));
    keys.push(Span::styled(" skip", Style::default().fg(palette.muted)));

    let lines = vec![
        Line::styled(
            step.title,
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::raw(step.description),
        Line::raw(""),
        Line::styled(dots, Style::default().fg(palette.accent_alt)),
        Line::from(keys),
    ];
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel_block(format!("Tour {}/{}", idx + 1, total), palette));
    f.render_widget(p, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use talkrix_core::models::Agent;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(state: &mut DashboardState, code: KeyCode) -> Vec<DashboardEffect> {
        match handle_key_event(key(code), state) {
            KeyHandlerResult::Continue(effects) => effects,
            KeyHandlerResult::Exit => panic!("unexpected exit"),
        }
    }

    fn screen(state: &DashboardState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui(f, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn number_keys_select_sections() {
        let mut state = DashboardState::new(5, true);
        let effects = press(&mut state, KeyCode::Char('3'));
        assert_eq!(state.section, Section::Tools);
        assert!(effects.contains(&DashboardEffect::Fetch(FetchRequest::Tools)));
    }

    #[test]
    fn quit_and_ctrl_c_exit() {
        let mut state = DashboardState::new(5, true);
        assert!(matches!(
            handle_key_event(key(KeyCode::Char('q')), &mut state),
            KeyHandlerResult::Exit
        ));
        assert!(matches!(
            handle_key_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut state
            ),
            KeyHandlerResult::Exit
        ));
    }

    #[test]
    fn open_tour_captures_keys() {
        let mut state = DashboardState::new(5, false);
        press(&mut state, KeyCode::Char('o'));
        assert_eq!(state.tour.current_step().map(|(idx, _)| idx), Some(0));

        press(&mut state, KeyCode::Right);
        assert_eq!(state.tour.current_step().map(|(idx, _)| idx), Some(1));
        // `q` does not quit while the tour has focus.
        assert!(matches!(
            handle_key_event(key(KeyCode::Char('q')), &mut state),
            KeyHandlerResult::Continue(_)
        ));
    }

    #[test]
    fn skipping_the_tour_notifies_without_claiming_completion() {
        let mut state = DashboardState::new(5, false);
        press(&mut state, KeyCode::Char('o'));
        let effects = press(&mut state, KeyCode::Esc);
        assert!(effects.contains(&DashboardEffect::Tour(TourEffect::NotifyCompleted)));
        assert!(effects.contains(&DashboardEffect::Tour(TourEffect::PersistCompleted)));

        let notice = tour_closed_notice();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(!notice.message.contains("complete"));
    }

    #[test]
    fn search_mode_types_into_the_query() {
        let mut state = DashboardState::new(5, true);
        press(&mut state, KeyCode::Char('2'));
        press(&mut state, KeyCode::Char('/'));
        assert_eq!(state.input_mode, InputMode::Search);
        press(&mut state, KeyCode::Char('q'));
        assert_eq!(state.agents.query, "q");
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn centered_rect_is_inside_the_frame() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, outer);
        assert_eq!(inner, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn agents_render_with_page_footer() {
        let mut state = DashboardState::new(2, true);
        press(&mut state, KeyCode::Char('2'));
        let agents: Vec<Agent> = (1..=3)
            .map(|i| Agent {
                id: format!("a{i}"),
                name: format!("Agent {i}"),
                ..Agent::default()
            })
            .collect();
        reduce(
            &mut state,
            DashboardAction::Runtime(RuntimeAction::AgentsLoaded(Ok(agents))),
        );

        let text = screen(&state);
        assert!(text.contains("Agent 1"));
        assert!(!text.contains("Agent 3"));
        assert!(text.contains("Showing 1 to 2 of 3 results"));
    }

    #[test]
    fn tour_card_shows_progress() {
        let mut state = DashboardState::new(5, false);
        press(&mut state, KeyCode::Char('o'));
        let text = screen(&state);
        assert!(text.contains(&format!("Tour 1/{}", state.tour.len())));
        assert!(text.contains("Welcome to Talkrix"));
    }
}
