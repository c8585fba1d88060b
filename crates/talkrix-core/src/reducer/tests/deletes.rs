use super::*;
use crate::builtin_tools::BUILTIN_TOOLS;
use pretty_assertions::assert_eq;

fn target(id: &str, label: &str) -> DeleteTarget {
    DeleteTarget {
        section: Section::Agents,
        id: id.to_string(),
        label: label.to_string(),
    }
}

#[test]
fn delete_asks_for_confirmation_first() {
    let mut state = with_agents(3);
    run_user(&mut state, UserAction::MoveDown);
    let effects = run_user(&mut state, UserAction::RequestDelete);

    assert_eq!(effects, vec![DashboardEffect::RequestFrame]);
    assert_eq!(
        state.overlay,
        DashboardOverlay::ConfirmDelete(target("agent-2", "Agent 2"))
    );

    let effects = run_user(&mut state, UserAction::ConfirmDelete);
    assert_eq!(
        effects,
        vec![
            DashboardEffect::Delete(target("agent-2", "Agent 2")),
            DashboardEffect::RequestFrame,
        ]
    );
    assert_eq!(state.overlay, DashboardOverlay::None);
}

#[test]
fn cancelled_delete_emits_nothing() {
    let mut state = with_agents(3);
    run_user(&mut state, UserAction::RequestDelete);
    run_user(&mut state, UserAction::CloseOverlay);
    assert!(run_user(&mut state, UserAction::ConfirmDelete).is_empty());
}

#[test]
fn successful_delete_removes_the_row() {
    let mut state = with_agents(6);
    run_runtime(
        &mut state,
        RuntimeAction::Deleted {
            target: target("agent-1", "Agent 1"),
            result: Ok(()),
        },
    );

    let agents = state.agents.items.ready().unwrap();
    assert_eq!(agents.len(), 5);
    assert!(agents.iter().all(|a| a.id != "agent-1"));
    assert_eq!(state.agents.paginator.total_pages(), 1);
    assert_eq!(state.notice.unwrap().level, NoticeLevel::Success);
}

#[test]
fn failed_delete_keeps_the_row() {
    let mut state = with_agents(2);
    run_runtime(
        &mut state,
        RuntimeAction::Deleted {
            target: target("agent-1", "Agent 1"),
            result: Err("forbidden".to_string()),
        },
    );
    assert_eq!(state.agents.items.ready().unwrap().len(), 2);
    let notice = state.notice.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(&*notice.message, "Could not delete Agent 1: forbidden");
}

#[test]
fn builtin_tools_cannot_be_deleted() {
    let mut state = state();
    run_user(&mut state, UserAction::SelectSection(Section::Tools));
    run_runtime(&mut state, RuntimeAction::ToolsLoaded(Ok(Vec::new())));
    assert_eq!(state.tools.visible().len(), BUILTIN_TOOLS.len().min(5));

    run_user(&mut state, UserAction::RequestDelete);
    assert_eq!(state.overlay, DashboardOverlay::None);
    assert_eq!(state.notice.unwrap().level, NoticeLevel::Error);
}

#[test]
fn call_rows_are_not_deletable() {
    let mut state = state();
    run_user(&mut state, UserAction::SelectSection(Section::Calls));
    assert!(run_user(&mut state, UserAction::RequestDelete).is_empty());
}

#[test]
fn loaded_rows_are_kept_as_resources() {
    let state = with_agents(1);
    assert!(matches!(state.agents.items, Resource::Ready(ref rows) if rows.len() == 1));
}
