use super::actions::DashboardAction;
use super::actions::RuntimeAction;
use super::actions::UserAction;
use super::builtin_tools::is_builtin;
use super::builtin_tools::BUILTIN_TOOLS;
use super::export::calls_to_csv;
use super::listing::Searchable;
use super::models::CallRecord;
use super::models::Tool;
use super::pagination::Paginator;
use super::resource::Resource;
use super::state::DashboardEffect;
use super::state::DashboardOverlay;
use super::state::DashboardState;
use super::state::DeleteTarget;
use super::state::FetchRequest;
use super::state::InputMode;
use super::state::ListView;
use super::state::Notice;
use super::state::Paging;
use super::state::Section;
use super::tour::reduce_tour;
use super::tour::TourEffect;
use super::tour::TourEvent;

pub fn reduce(state: &mut DashboardState, action: DashboardAction) -> Vec<DashboardEffect> {
    match action {
        DashboardAction::User(user) => reduce_user(state, user),
        DashboardAction::Runtime(runtime) => reduce_runtime(state, runtime),
    }
}

/// Operations every list view shares regardless of its row type.
trait ListControls {
    fn paginator_mut(&mut self) -> &mut Paginator;
    fn paging(&self) -> Paging;
    fn set_query(&mut self, query: String);
    fn move_selection(&mut self, delta: isize);
    fn after_page_change(&mut self);
}

impl<T: Searchable> ListControls for ListView<T> {
    fn paginator_mut(&mut self) -> &mut Paginator {
        &mut self.paginator
    }

    fn paging(&self) -> Paging {
        self.paging
    }

    fn set_query(&mut self, query: String) {
        ListView::set_query(self, query);
    }

    fn move_selection(&mut self, delta: isize) {
        ListView::move_selection(self, delta);
    }

    fn after_page_change(&mut self) {
        self.selected = 0;
        self.sync();
    }
}

fn active_list(state: &mut DashboardState) -> Option<&mut dyn ListControls> {
    let list: &mut dyn ListControls = match state.section {
        Section::Agents => &mut state.agents,
        Section::Tools => &mut state.tools,
        Section::Knowledge => &mut state.corpora,
        Section::Campaigns => &mut state.campaigns,
        Section::Calls => &mut state.calls.list,
        Section::Overview | Section::Settings => return None,
    };
    Some(list)
}

fn reduce_user(state: &mut DashboardState, action: UserAction) -> Vec<DashboardEffect> {
    match action {
        UserAction::SelectSection(section) => select_section(state, section),
        UserAction::NextSection => select_section(state, state.section.next()),
        UserAction::PrevSection => select_section(state, state.section.prev()),
        UserAction::ToggleSidebar => {
            state.sidebar_collapsed = !state.sidebar_collapsed;
            vec![
                DashboardEffect::PersistSidebar(state.sidebar_collapsed),
                DashboardEffect::RequestFrame,
            ]
        }
        UserAction::CycleTheme => {
            state.theme = state.theme.next();
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::ToggleHelp => {
            state.overlay = match state.overlay {
                DashboardOverlay::Help => DashboardOverlay::None,
                _ => DashboardOverlay::Help,
            };
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::CloseOverlay => {
            state.overlay = DashboardOverlay::None;
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::Refresh => {
            let mut effects = fetch_section(state, state.section, false);
            effects.push(DashboardEffect::RequestFrame);
            effects
        }
        UserAction::CyclePeriod => {
            if state.section != Section::Overview {
                return Vec::new();
            }
            state.overview.period = state.overview.period.next();
            let mut effects = fetch_section(state, Section::Overview, true);
            effects.push(DashboardEffect::RequestFrame);
            effects
        }
        UserAction::CycleStatusFilter | UserAction::CycleTypeFilter => {
            if state.section != Section::Calls {
                return Vec::new();
            }
            if matches!(action, UserAction::CycleStatusFilter) {
                state.calls.cycle_status();
            } else {
                state.calls.cycle_type();
            }
            state.calls.list.paginator.reset();
            let mut effects = fetch_calls(state, true);
            effects.push(DashboardEffect::RequestFrame);
            effects
        }
        UserAction::BeginSearch => {
            let Some(query) = state.query().map(str::to_string) else {
                return Vec::new();
            };
            state.input_mode = InputMode::Search;
            state.input_buffer = query;
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::BeginPageJump => {
            if !state.paginator().is_some_and(Paginator::shows_controls) {
                return Vec::new();
            }
            state.input_mode = InputMode::PageJump;
            state.input_buffer.clear();
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::InputChar(ch) => match state.input_mode {
            InputMode::Normal => Vec::new(),
            InputMode::Search => {
                state.input_buffer.push(ch);
                let query = state.input_buffer.clone();
                if let Some(list) = active_list(state) {
                    list.set_query(query);
                }
                vec![DashboardEffect::RequestFrame]
            }
            InputMode::PageJump => {
                if ch.is_ascii_digit() {
                    state.input_buffer.push(ch);
                }
                vec![DashboardEffect::RequestFrame]
            }
        },
        UserAction::InputBackspace => match state.input_mode {
            InputMode::Normal => Vec::new(),
            InputMode::Search => {
                state.input_buffer.pop();
                let query = state.input_buffer.clone();
                if let Some(list) = active_list(state) {
                    list.set_query(query);
                }
                vec![DashboardEffect::RequestFrame]
            }
            InputMode::PageJump => {
                state.input_buffer.pop();
                vec![DashboardEffect::RequestFrame]
            }
        },
        UserAction::SubmitInput => {
            let mode = state.input_mode;
            let input = std::mem::take(&mut state.input_buffer);
            state.input_mode = InputMode::Normal;
            let mut effects = match mode {
                InputMode::PageJump => change_page(state, |pager| pager.jump_to_input(&input)),
                InputMode::Search | InputMode::Normal => Vec::new(),
            };
            effects.push(DashboardEffect::RequestFrame);
            effects
        }
        UserAction::CancelInput => {
            state.input_mode = InputMode::Normal;
            state.input_buffer.clear();
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::ClearSearch => {
            let Some(list) = active_list(state) else {
                return Vec::new();
            };
            list.set_query(String::new());
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::FirstPage => with_frame(change_page(state, Paginator::first)),
        UserAction::PrevPage => with_frame(change_page(state, Paginator::previous)),
        UserAction::NextPage => with_frame(change_page(state, Paginator::next)),
        UserAction::LastPage => with_frame(change_page(state, Paginator::last)),
        UserAction::MoveUp | UserAction::MoveDown => {
            let delta = if matches!(action, UserAction::MoveUp) { -1 } else { 1 };
            let Some(list) = active_list(state) else {
                return Vec::new();
            };
            list.move_selection(delta);
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::RequestDelete => {
            if !state.section.supports_delete() {
                return Vec::new();
            }
            let Some(target) = state.selected_target() else {
                return Vec::new();
            };
            if target.section == Section::Tools && is_builtin(&target.id) {
                state.notice = Some(Notice::error("Built-in tools cannot be deleted"));
            } else {
                state.overlay = DashboardOverlay::ConfirmDelete(target);
            }
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::ConfirmDelete => {
            let DashboardOverlay::ConfirmDelete(target) = &state.overlay else {
                return Vec::new();
            };
            let target = target.clone();
            state.overlay = DashboardOverlay::None;
            state.notice = Some(Notice::info(format!("Deleting {}…", target.label)));
            vec![DashboardEffect::Delete(target), DashboardEffect::RequestFrame]
        }
        UserAction::ExportCalls => {
            if state.section != Section::Calls {
                return Vec::new();
            }
            let rows: Vec<CallRecord> = state.calls.list.visible().into_iter().cloned().collect();
            if rows.is_empty() {
                state.notice = Some(Notice::info("No calls to export"));
                return vec![DashboardEffect::RequestFrame];
            }
            vec![
                DashboardEffect::WriteExport {
                    contents: calls_to_csv(&rows),
                    rows: rows.len(),
                },
                DashboardEffect::RequestFrame,
            ]
        }
        UserAction::Tour(event) => with_frame(apply_tour(state, event)),
        UserAction::DismissNotice => {
            state.notice = None;
            vec![DashboardEffect::RequestFrame]
        }
        UserAction::Logout => vec![DashboardEffect::Logout],
    }
}

fn reduce_runtime(state: &mut DashboardState, action: RuntimeAction) -> Vec<DashboardEffect> {
    let mut effects = Vec::new();
    match action {
        RuntimeAction::Mounted { auto_open_tour } => {
            effects.extend(fetch_section(state, state.section, false));
            if auto_open_tour && !state.tour.completed {
                effects.extend(apply_tour(state, TourEvent::Open));
            }
        }
        RuntimeAction::OverviewLoaded(result) => {
            report_failure(state, "dashboard stats", &result);
            state.overview.stats.resolve(result);
        }
        RuntimeAction::AgentsLoaded(result) => {
            report_failure(state, "agents", &result);
            state.agents.items.resolve(result);
            state.agents.sync();
        }
        RuntimeAction::ToolsLoaded(result) => {
            report_failure(state, "tools", &result);
            state.tools.items.resolve(result.map(with_builtin_tools));
            state.tools.sync();
        }
        RuntimeAction::CorporaLoaded(result) => {
            report_failure(state, "knowledge bases", &result);
            state.corpora.items.resolve(result);
            state.corpora.sync();
        }
        RuntimeAction::CampaignsLoaded(result) => {
            report_failure(state, "campaigns", &result);
            state.campaigns.items.resolve(result);
            state.campaigns.sync();
        }
        RuntimeAction::CallsLoaded(result) => {
            report_failure(state, "call history", &result);
            match result {
                Ok(page) => state.calls.apply_page(page),
                Err(err) => {
                    state.calls.list.items = Resource::Failed(err);
                    state.calls.list.sync();
                }
            }
        }
        RuntimeAction::CallStatsLoaded(result) => {
            report_failure(state, "call stats", &result);
            state.calls.stats.resolve(result);
        }
        RuntimeAction::SettingsLoaded(result) => {
            report_failure(state, "settings", &result);
            match result {
                Ok((general, telephony)) => {
                    state.settings.general = Resource::Ready(general);
                    state.settings.telephony = Resource::Ready(telephony);
                }
                Err(err) => {
                    state.settings.general = Resource::Failed(err.clone());
                    state.settings.telephony = Resource::Failed(err);
                }
            }
        }
        RuntimeAction::Deleted { target, result } => match result {
            Ok(()) => {
                remove_row(state, &target);
                state.notice = Some(Notice::success(format!("Deleted {}", target.label)));
            }
            Err(err) => {
                state.notice = Some(Notice::error(format!(
                    "Could not delete {}: {err}",
                    target.label
                )));
            }
        },
        RuntimeAction::TourExitElapsed => {
            effects.extend(apply_tour(state, TourEvent::ExitElapsed));
        }
        RuntimeAction::Notify(notice) => {
            state.notice = Some(notice);
        }
        RuntimeAction::SessionExpired => {
            state.notice = Some(Notice::error("Your session has expired. Please log in again."));
            effects.push(DashboardEffect::Logout);
        }
    }
    effects.push(DashboardEffect::RequestFrame);
    effects
}

fn with_frame(mut effects: Vec<DashboardEffect>) -> Vec<DashboardEffect> {
    effects.push(DashboardEffect::RequestFrame);
    effects
}

fn select_section(state: &mut DashboardState, section: Section) -> Vec<DashboardEffect> {
    state.section = section;
    state.overlay = DashboardOverlay::None;
    state.input_mode = InputMode::Normal;
    state.input_buffer.clear();
    let mut effects = fetch_section(state, section, false);
    effects.push(DashboardEffect::RequestFrame);
    effects
}

/// "Fetch on mount": marks the section's resources as loading and asks the
/// host to load them. Without `force`, a load already in flight is not
/// duplicated.
fn fetch_section(state: &mut DashboardState, section: Section, force: bool) -> Vec<DashboardEffect> {
    fn begin<T>(resource: &mut Resource<T>, force: bool) -> bool {
        if force {
            *resource = Resource::Loading;
            return true;
        }
        resource.begin_load()
    }

    match section {
        Section::Overview => {
            if begin(&mut state.overview.stats, force) {
                return vec![DashboardEffect::Fetch(FetchRequest::Overview {
                    period: state.overview.period,
                })];
            }
            Vec::new()
        }
        Section::Agents => begin(&mut state.agents.items, force)
            .then_some(DashboardEffect::Fetch(FetchRequest::Agents))
            .into_iter()
            .collect(),
        Section::Tools => begin(&mut state.tools.items, force)
            .then_some(DashboardEffect::Fetch(FetchRequest::Tools))
            .into_iter()
            .collect(),
        Section::Knowledge => begin(&mut state.corpora.items, force)
            .then_some(DashboardEffect::Fetch(FetchRequest::Corpora))
            .into_iter()
            .collect(),
        Section::Campaigns => begin(&mut state.campaigns.items, force)
            .then_some(DashboardEffect::Fetch(FetchRequest::Campaigns))
            .into_iter()
            .collect(),
        Section::Calls => fetch_calls(state, force),
        Section::Settings => {
            let general = begin(&mut state.settings.general, force);
            let telephony = begin(&mut state.settings.telephony, force);
            if general || telephony {
                return vec![DashboardEffect::Fetch(FetchRequest::Settings)];
            }
            Vec::new()
        }
    }
}

fn fetch_calls(state: &mut DashboardState, force: bool) -> Vec<DashboardEffect> {
    let mut effects = Vec::new();
    let list = &mut state.calls.list;
    let started = if force {
        list.items = Resource::Loading;
        true
    } else {
        list.items.begin_load()
    };
    if started {
        effects.push(DashboardEffect::Fetch(FetchRequest::Calls {
            page: list.paginator.current_page(),
            limit: list.paginator.items_per_page(),
            status: state.calls.status,
            call_type: state.calls.call_type,
        }));
    }
    if state.calls.stats.begin_load() {
        effects.push(DashboardEffect::Fetch(FetchRequest::CallStats));
    }
    effects
}

/// Applies a navigation command to the active paginator. Server-paged lists
/// re-fetch when the page actually changed.
fn change_page(
    state: &mut DashboardState,
    command: impl FnOnce(&mut Paginator) -> bool,
) -> Vec<DashboardEffect> {
    let Some(list) = active_list(state) else {
        return Vec::new();
    };
    if !command(list.paginator_mut()) {
        return Vec::new();
    }
    match list.paging() {
        Paging::Client => {
            list.after_page_change();
            Vec::new()
        }
        Paging::Server => {
            list.after_page_change();
            fetch_calls(state, true)
        }
    }
}

fn apply_tour(state: &mut DashboardState, event: TourEvent) -> Vec<DashboardEffect> {
    let mut effects = Vec::new();
    for effect in reduce_tour(&mut state.tour, event) {
        match effect {
            TourEffect::Navigate(section) => effects.extend(select_section(state, section)),
            other => effects.push(DashboardEffect::Tour(other)),
        }
    }
    effects
}

fn with_builtin_tools(user_tools: Vec<Tool>) -> Vec<Tool> {
    BUILTIN_TOOLS
        .iter()
        .map(|tool| tool.as_tool())
        .chain(user_tools)
        .collect()
}

fn remove_row(state: &mut DashboardState, target: &DeleteTarget) {
    fn retain<T: Searchable>(list: &mut ListView<T>, keep: impl Fn(&T) -> bool) {
        if let Some(items) = list.items.ready_mut() {
            items.retain(|item| keep(item));
        }
        list.sync();
    }

    match target.section {
        Section::Agents => retain(&mut state.agents, |a| a.id != target.id),
        Section::Tools => retain(&mut state.tools, |t| t.id != target.id),
        Section::Knowledge => retain(&mut state.corpora, |c| c.id != target.id),
        Section::Campaigns => retain(&mut state.campaigns, |c| c.id != target.id),
        Section::Overview | Section::Calls | Section::Settings => {}
    }
}

fn report_failure<T>(state: &mut DashboardState, what: &str, result: &Result<T, String>) {
    if let Err(err) = result {
        state.notice = Some(Notice::error(format!("Could not load {what}: {err}")));
    }
}

#[cfg(test)]
mod tests;
