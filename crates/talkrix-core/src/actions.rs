use super::models::Agent;
use super::models::CallPage;
use super::models::CallStats;
use super::models::Campaign;
use super::models::Corpus;
use super::models::DashboardStats;
use super::models::GeneralSettings;
use super::models::TelephonySettings;
use super::models::Tool;
use super::state::DeleteTarget;
use super::state::Notice;
use super::state::Section;
use super::tour::TourEvent;

#[derive(Debug, Clone)]
pub enum DashboardAction {
    User(UserAction),
    Runtime(RuntimeAction),
}

#[derive(Debug, Clone)]
pub enum UserAction {
    SelectSection(Section),
    NextSection,
    PrevSection,
    ToggleSidebar,
    CycleTheme,
    ToggleHelp,
    CloseOverlay,
    Refresh,
    CyclePeriod,
    CycleStatusFilter,
    CycleTypeFilter,
    BeginSearch,
    BeginPageJump,
    InputChar(char),
    InputBackspace,
    SubmitInput,
    CancelInput,
    ClearSearch,
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    MoveUp,
    MoveDown,
    RequestDelete,
    ConfirmDelete,
    ExportCalls,
    Tour(TourEvent),
    DismissNotice,
    Logout,
}

/// Outcomes of host work fed back into the reducer. Errors are already
/// rendered to user-facing strings.
#[derive(Debug, Clone)]
pub enum RuntimeAction {
    Mounted { auto_open_tour: bool },
    OverviewLoaded(Result<DashboardStats, String>),
    AgentsLoaded(Result<Vec<Agent>, String>),
    ToolsLoaded(Result<Vec<Tool>, String>),
    CorporaLoaded(Result<Vec<Corpus>, String>),
    CampaignsLoaded(Result<Vec<Campaign>, String>),
    CallsLoaded(Result<CallPage, String>),
    CallStatsLoaded(Result<CallStats, String>),
    SettingsLoaded(Result<(GeneralSettings, TelephonySettings), String>),
    Deleted {
        target: DeleteTarget,
        result: Result<(), String>,
    },
    TourExitElapsed,
    Notify(Notice),
    SessionExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyHint {
    pub keys: &'static str,
    pub label: &'static str,
}

pub const KEY_HINTS: [KeyHint; 19] = [
    KeyHint { keys: "Tab / Shift-Tab", label: "Next / previous section" },
    KeyHint { keys: "1-7", label: "Jump to section" },
    KeyHint { keys: "Up / Down", label: "Move selection" },
    KeyHint { keys: "[ / ]", label: "Previous / next page" },
    KeyHint { keys: "Home / End", label: "First / last page" },
    KeyHint { keys: "g", label: "Go to page" },
    KeyHint { keys: "/", label: "Search this list" },
    KeyHint { keys: "r", label: "Refresh" },
    KeyHint { keys: "d", label: "Delete selected row" },
    KeyHint { keys: "s / t", label: "Cycle call status / type filter" },
    KeyHint { keys: "p", label: "Cycle stats period" },
    KeyHint { keys: "e", label: "Export calls to CSV" },
    KeyHint { keys: "b", label: "Collapse sidebar" },
    KeyHint { keys: "c", label: "Cycle theme" },
    KeyHint { keys: "o", label: "Open the tour" },
    KeyHint { keys: "R", label: "Reset the tour" },
    KeyHint { keys: "L", label: "Log out" },
    KeyHint { keys: "?", label: "Toggle this help" },
    KeyHint { keys: "q", label: "Quit" },
];
