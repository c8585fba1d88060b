use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::listing::filter_items;
use crate::listing::Searchable;
use crate::models::Agent;
use crate::models::CallPage;
use crate::models::CallRecord;
use crate::models::CallStats;
use crate::models::CallStatus;
use crate::models::CallType;
use crate::models::Campaign;
use crate::models::Corpus;
use crate::models::DashboardStats;
use crate::models::GeneralSettings;
use crate::models::StatsPeriod;
use crate::models::TelephonySettings;
use crate::models::Tool;
use crate::pagination::Paginator;
use crate::resource::Resource;
use crate::tour::TourEffect;
use crate::tour::TourState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Overview,
    Agents,
    Tools,
    Knowledge,
    Campaigns,
    Calls,
    Settings,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Self::Overview,
        Self::Agents,
        Self::Tools,
        Self::Knowledge,
        Self::Campaigns,
        Self::Calls,
        Self::Settings,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Overview => Self::Agents,
            Self::Agents => Self::Tools,
            Self::Tools => Self::Knowledge,
            Self::Knowledge => Self::Campaigns,
            Self::Campaigns => Self::Calls,
            Self::Calls => Self::Settings,
            Self::Settings => Self::Overview,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Overview => Self::Settings,
            Self::Agents => Self::Overview,
            Self::Tools => Self::Agents,
            Self::Knowledge => Self::Tools,
            Self::Campaigns => Self::Knowledge,
            Self::Calls => Self::Campaigns,
            Self::Settings => Self::Calls,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Dashboard",
            Self::Agents => "Agents",
            Self::Tools => "Tools",
            Self::Knowledge => "Knowledge Base",
            Self::Campaigns => "Campaigns",
            Self::Calls => "Call History",
            Self::Settings => "Settings",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Overview => "/dashboard",
            Self::Agents => "/agents",
            Self::Tools => "/tools",
            Self::Knowledge => "/knowledge",
            Self::Campaigns => "/campaigns",
            Self::Calls => "/calls",
            Self::Settings => "/settings",
        }
    }

    /// Sections whose rows can be deleted from the list.
    pub fn supports_delete(self) -> bool {
        matches!(
            self,
            Self::Agents | Self::Tools | Self::Knowledge | Self::Campaigns
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiTheme {
    Classic,
    Midnight,
    Ocean,
    Forest,
}

impl UiTheme {
    pub fn label(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Midnight => "midnight",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Classic => Self::Midnight,
            Self::Midnight => Self::Ocean,
            Self::Ocean => Self::Forest,
            Self::Forest => Self::Classic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: Arc<str>,
}

impl Notice {
    pub fn info(message: impl Into<Arc<str>>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<Arc<str>>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    PageJump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Whole list is loaded; pages are slices of the filtered rows.
    Client,
    /// One page is loaded at a time; the server reports the total.
    Server,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub items: Resource<Vec<T>>,
    pub query: String,
    pub paginator: Paginator,
    pub selected: usize,
    pub paging: Paging,
}

impl<T: Searchable> ListView<T> {
    pub fn new(page_size: usize, paging: Paging) -> Self {
        Self {
            items: Resource::Idle,
            query: String::new(),
            paginator: Paginator::new(page_size),
            selected: 0,
            paging,
        }
    }

    pub fn filtered(&self) -> Vec<&T> {
        match self.items.ready() {
            Some(items) => filter_items(items, &self.query),
            None => Vec::new(),
        }
    }

    /// Rows on screen: the current page of the filtered rows.
    pub fn visible(&self) -> Vec<&T> {
        let filtered = self.filtered();
        match self.paging {
            Paging::Server => filtered,
            Paging::Client => {
                let (start, end) = self.paginator.slice_bounds(filtered.len());
                filtered[start..end].to_vec()
            }
        }
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.visible().get(self.selected).copied()
    }

    /// Re-derives client-side page counts and keeps the selection in range.
    pub fn sync(&mut self) {
        if self.paging == Paging::Client {
            let total = self.filtered().len();
            self.paginator.set_total_items(total);
        }
        let visible = self.visible().len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    pub fn set_query(&mut self, query: String) {
        self.query = query;
        if self.paging == Paging::Client {
            self.paginator.reset();
        }
        self.selected = 0;
        self.sync();
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self
            .selected
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewView {
    pub period: StatsPeriod,
    pub stats: Resource<DashboardStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallHistoryView {
    pub list: ListView<CallRecord>,
    pub status: Option<CallStatus>,
    pub call_type: Option<CallType>,
    pub stats: Resource<CallStats>,
}

const STATUS_FILTERS: [Option<CallStatus>; 6] = [
    None,
    Some(CallStatus::Completed),
    Some(CallStatus::InProgress),
    Some(CallStatus::Failed),
    Some(CallStatus::NoAnswer),
    Some(CallStatus::Busy),
];

const TYPE_FILTERS: [Option<CallType>; 4] = [
    None,
    Some(CallType::Inbound),
    Some(CallType::Outbound),
    Some(CallType::Web),
];

fn cycle<T: Copy + PartialEq>(options: &[T], current: T) -> T {
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    options[(idx + 1) % options.len()]
}

impl CallHistoryView {
    pub fn cycle_status(&mut self) {
        self.status = cycle(&STATUS_FILTERS, self.status);
    }

    pub fn cycle_type(&mut self) {
        self.call_type = cycle(&TYPE_FILTERS, self.call_type);
    }

    pub fn apply_page(&mut self, page: CallPage) {
        if page.limit > 0 {
            self.list.paginator.set_items_per_page(page.limit);
        }
        self.list.paginator.set_total_items(page.total);
        self.list.items = Resource::Ready(page.calls);
        self.list.sync();
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsView {
    pub general: Resource<GeneralSettings>,
    pub telephony: Resource<TelephonySettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserBadge {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub section: Section,
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardOverlay {
    None,
    ConfirmDelete(DeleteTarget),
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Overview {
        period: StatsPeriod,
    },
    Agents,
    Tools,
    Corpora,
    Campaigns,
    Calls {
        page: usize,
        limit: usize,
        status: Option<CallStatus>,
        call_type: Option<CallType>,
    },
    CallStats,
    Settings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEffect {
    RequestFrame,
    Fetch(FetchRequest),
    Delete(DeleteTarget),
    WriteExport { contents: String, rows: usize },
    Tour(TourEffect),
    PersistSidebar(bool),
    Logout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub user: Option<UserBadge>,
    pub section: Section,
    pub sidebar_collapsed: bool,
    pub theme: UiTheme,
    pub tour: TourState,
    pub overlay: DashboardOverlay,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub overview: OverviewView,
    pub agents: ListView<Agent>,
    pub tools: ListView<Tool>,
    pub corpora: ListView<Corpus>,
    pub campaigns: ListView<Campaign>,
    pub calls: CallHistoryView,
    pub settings: SettingsView,
    pub notice: Option<Notice>,
}

impl DashboardState {
    pub fn new(page_size: usize, tour_completed: bool) -> Self {
        Self {
            user: None,
            section: Section::Overview,
            sidebar_collapsed: false,
            theme: UiTheme::Classic,
            tour: TourState::new(tour_completed),
            overlay: DashboardOverlay::None,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            overview: OverviewView {
                period: StatsPeriod::Today,
                stats: Resource::Idle,
            },
            agents: ListView::new(page_size, Paging::Client),
            tools: ListView::new(page_size, Paging::Client),
            corpora: ListView::new(page_size, Paging::Client),
            campaigns: ListView::new(page_size, Paging::Client),
            calls: CallHistoryView {
                list: ListView::new(page_size, Paging::Server),
                status: None,
                call_type: None,
                stats: Resource::Idle,
            },
            settings: SettingsView::default(),
            notice: None,
        }
    }

    pub fn paginator(&self) -> Option<&Paginator> {
        match self.section {
            Section::Agents => Some(&self.agents.paginator),
            Section::Tools => Some(&self.tools.paginator),
            Section::Knowledge => Some(&self.corpora.paginator),
            Section::Campaigns => Some(&self.campaigns.paginator),
            Section::Calls => Some(&self.calls.list.paginator),
            Section::Overview | Section::Settings => None,
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self.section {
            Section::Agents => Some(self.agents.query.as_str()),
            Section::Tools => Some(self.tools.query.as_str()),
            Section::Knowledge => Some(self.corpora.query.as_str()),
            Section::Campaigns => Some(self.campaigns.query.as_str()),
            Section::Calls => Some(self.calls.list.query.as_str()),
            Section::Overview | Section::Settings => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self.section {
            Section::Overview => self.overview.stats.is_loading(),
            Section::Agents => self.agents.items.is_loading(),
            Section::Tools => self.tools.items.is_loading(),
            Section::Knowledge => self.corpora.items.is_loading(),
            Section::Campaigns => self.campaigns.items.is_loading(),
            Section::Calls => self.calls.list.items.is_loading(),
            Section::Settings => {
                self.settings.general.is_loading() || self.settings.telephony.is_loading()
            }
        }
    }

    /// Delete target for the highlighted row of the current section.
    pub fn selected_target(&self) -> Option<DeleteTarget> {
        let (id, label) = match self.section {
            Section::Agents => self
                .agents
                .selected_item()
                .map(|a| (a.id.clone(), a.name.clone()))?,
            Section::Tools => self
                .tools
                .selected_item()
                .map(|t| (t.id.clone(), t.name.clone()))?,
            Section::Knowledge => self
                .corpora
                .selected_item()
                .map(|c| (c.id.clone(), c.name.clone()))?,
            Section::Campaigns => self
                .campaigns
                .selected_item()
                .map(|c| (c.id.clone(), c.name.clone()))?,
            Section::Overview | Section::Calls | Section::Settings => return None,
        };
        Some(DeleteTarget {
            section: self.section,
            id,
            label,
        })
    }
}
