use super::*;
use crate::builtin_tools::BUILTIN_TOOLS;
use crate::models::StatsPeriod;
use pretty_assertions::assert_eq;

#[test]
fn mount_fetches_overview_and_opens_tour_for_new_users() {
    let mut state = state();
    let effects = run_runtime(
        &mut state,
        RuntimeAction::Mounted {
            auto_open_tour: true,
        },
    );

    assert_eq!(
        fetches(&effects),
        vec![FetchRequest::Overview {
            period: StatsPeriod::Today
        }]
    );
    assert_eq!(state.tour.phase, TourPhase::Active { step: 0 });
    assert!(state.overview.stats.is_loading());
}

#[test]
fn mount_does_not_reopen_a_completed_tour() {
    let mut state = DashboardState::new(5, true);
    run_runtime(
        &mut state,
        RuntimeAction::Mounted {
            auto_open_tour: true,
        },
    );
    assert_eq!(state.tour.phase, TourPhase::Closed);
}

#[test]
fn selecting_a_section_fetches_once_while_loading() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::SelectSection(Section::Agents));
    assert_eq!(fetches(&effects), vec![FetchRequest::Agents]);

    run_user(&mut state, UserAction::SelectSection(Section::Overview));
    let effects = run_user(&mut state, UserAction::SelectSection(Section::Agents));
    assert!(fetches(&effects).is_empty());
    assert!(state.is_loading());
}

#[test]
fn tab_order_wraps_around() {
    let mut state = state();
    run_user(&mut state, UserAction::PrevSection);
    assert_eq!(state.section, Section::Settings);
    let effects = run_user(&mut state, UserAction::NextSection);
    assert_eq!(state.section, Section::Overview);
    assert_eq!(
        fetches(&effects),
        vec![FetchRequest::Overview {
            period: StatsPeriod::Today
        }]
    );
}

#[test]
fn calls_section_fetches_page_and_stats() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::SelectSection(Section::Calls));
    assert_eq!(
        fetches(&effects),
        vec![
            FetchRequest::Calls {
                page: 1,
                limit: 5,
                status: None,
                call_type: None,
            },
            FetchRequest::CallStats,
        ]
    );
}

#[test]
fn cycling_period_forces_a_new_overview_fetch() {
    let mut state = state();
    run_runtime(
        &mut state,
        RuntimeAction::Mounted {
            auto_open_tour: false,
        },
    );
    let effects = run_user(&mut state, UserAction::CyclePeriod);
    assert_eq!(state.overview.period, StatsPeriod::Week);
    assert_eq!(
        fetches(&effects),
        vec![FetchRequest::Overview {
            period: StatsPeriod::Week
        }]
    );
}

#[test]
fn sidebar_toggle_is_persisted() {
    let mut state = state();
    let effects = run_user(&mut state, UserAction::ToggleSidebar);
    assert!(state.sidebar_collapsed);
    assert_eq!(
        effects,
        vec![
            DashboardEffect::PersistSidebar(true),
            DashboardEffect::RequestFrame
        ]
    );
}

#[test]
fn help_overlay_toggles() {
    let mut state = state();
    run_user(&mut state, UserAction::ToggleHelp);
    assert_eq!(state.overlay, DashboardOverlay::Help);
    run_user(&mut state, UserAction::ToggleHelp);
    assert_eq!(state.overlay, DashboardOverlay::None);
}

#[test]
fn load_failure_renders_empty_list_with_error_notice() {
    let mut state = state();
    run_user(&mut state, UserAction::SelectSection(Section::Agents));
    run_runtime(
        &mut state,
        RuntimeAction::AgentsLoaded(Err("network down".to_string())),
    );

    assert_eq!(state.agents.items.error(), Some("network down"));
    assert!(state.agents.visible().is_empty());
    let notice = state.notice.clone().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(&*notice.message, "Could not load agents: network down");
}

#[test]
fn loaded_tools_list_builtins_first() {
    let mut state = state();
    run_user(&mut state, UserAction::SelectSection(Section::Tools));
    let custom = Tool {
        id: "t-1".to_string(),
        name: "lookupOrder".to_string(),
        ..Tool::default()
    };
    run_runtime(&mut state, RuntimeAction::ToolsLoaded(Ok(vec![custom])));

    let tools = state.tools.items.ready().unwrap();
    assert_eq!(tools.len(), BUILTIN_TOOLS.len() + 1);
    assert_eq!(tools.last().unwrap().name, "lookupOrder");
}

#[test]
fn expired_session_logs_out() {
    let mut state = state();
    let effects = run_runtime(&mut state, RuntimeAction::SessionExpired);
    assert_eq!(
        effects,
        vec![DashboardEffect::Logout, DashboardEffect::RequestFrame]
    );
    assert_eq!(state.notice.unwrap().level, NoticeLevel::Error);
}
