use pretty_assertions::assert_eq;

pub(super) use super::reduce;
pub(super) use crate::actions::DashboardAction;
pub(super) use crate::actions::RuntimeAction;
pub(super) use crate::actions::UserAction;
pub(super) use crate::models::Agent;
pub(super) use crate::models::CallPage;
pub(super) use crate::models::CallRecord;
pub(super) use crate::models::CallStatus;
pub(super) use crate::models::CallType;
pub(super) use crate::models::Tool;
pub(super) use crate::resource::Resource;
pub(super) use crate::state::DashboardEffect;
pub(super) use crate::state::DashboardOverlay;
pub(super) use crate::state::DashboardState;
pub(super) use crate::state::DeleteTarget;
pub(super) use crate::state::FetchRequest;
pub(super) use crate::state::InputMode;
pub(super) use crate::state::NoticeLevel;
pub(super) use crate::state::Section;
pub(super) use crate::tour::TourEffect;
pub(super) use crate::tour::TourEvent;
pub(super) use crate::tour::TourPhase;

mod deletes;
mod navigation;
mod tour_flow;

fn state() -> DashboardState {
    DashboardState::new(5, false)
}

fn run_user(state: &mut DashboardState, action: UserAction) -> Vec<DashboardEffect> {
    reduce(state, DashboardAction::User(action))
}

fn run_runtime(state: &mut DashboardState, action: RuntimeAction) -> Vec<DashboardEffect> {
    let effects = reduce(state, DashboardAction::Runtime(action));
    assert_eq!(effects.last(), Some(&DashboardEffect::RequestFrame));
    effects
}

fn fetches(effects: &[DashboardEffect]) -> Vec<FetchRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            DashboardEffect::Fetch(request) => Some(*request),
            _ => None,
        })
        .collect()
}

fn agents(n: usize) -> Vec<Agent> {
    (1..=n)
        .map(|i| Agent {
            id: format!("agent-{i}"),
            name: format!("Agent {i}"),
            ..Agent::default()
        })
        .collect()
}

fn calls(n: usize) -> Vec<CallRecord> {
    (1..=n)
        .map(|i| CallRecord {
            id: format!("call-{i}"),
            agent_name: "Support".to_string(),
            from_number: "+15550000".to_string(),
            to_number: format!("+1555000{i}"),
            status: CallStatus::Completed,
            call_type: CallType::Outbound,
            duration_seconds: 60,
            cost: None,
            started_at: None,
            summary: None,
        })
        .collect()
}

/// Dashboard opened on the agents section with `n` agents loaded.
fn with_agents(n: usize) -> DashboardState {
    let mut state = state();
    run_user(&mut state, UserAction::SelectSection(Section::Agents));
    run_runtime(&mut state, RuntimeAction::AgentsLoaded(Ok(agents(n))));
    state
}
