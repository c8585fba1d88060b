use super::*;
use crate::tour::TOUR_EXIT_DELAY;
use pretty_assertions::assert_eq;

fn open_tour(state: &mut DashboardState) {
    run_user(state, UserAction::Tour(TourEvent::Open));
    assert_eq!(state.tour.phase, TourPhase::Active { step: 0 });
}

#[test]
fn skip_persists_and_schedules_exit() {
    let mut state = state();
    open_tour(&mut state);

    let effects = run_user(&mut state, UserAction::Tour(TourEvent::Skip));
    assert_eq!(
        effects,
        vec![
            DashboardEffect::Tour(TourEffect::PersistCompleted),
            DashboardEffect::Tour(TourEffect::NotifyCompleted),
            DashboardEffect::Tour(TourEffect::ScheduleExit(TOUR_EXIT_DELAY)),
            DashboardEffect::RequestFrame,
        ]
    );
    assert!(state.tour.completed);
    assert_eq!(state.tour.phase, TourPhase::Exiting);

    run_runtime(&mut state, RuntimeAction::TourExitElapsed);
    assert_eq!(state.tour.phase, TourPhase::Closed);
}

#[test]
fn step_action_navigates_to_its_section() {
    let mut state = state();
    open_tour(&mut state);
    run_user(&mut state, UserAction::Tour(TourEvent::Next));
    let target = state.tour.current_step().and_then(|(_, step)| step.action);
    assert_eq!(target, Some(Section::Agents));

    let effects = run_user(&mut state, UserAction::Tour(TourEvent::InvokeAction));
    assert_eq!(state.section, Section::Agents);
    assert_eq!(state.tour.phase, TourPhase::Closed);
    assert!(effects.contains(&DashboardEffect::Tour(TourEffect::PersistCompleted)));
    assert_eq!(fetches(&effects), vec![FetchRequest::Agents]);
}

#[test]
fn reset_restarts_at_the_first_step() {
    let mut state = DashboardState::new(5, true);
    let effects = run_user(&mut state, UserAction::Tour(TourEvent::Reset));
    assert_eq!(
        effects,
        vec![
            DashboardEffect::Tour(TourEffect::ClearCompleted),
            DashboardEffect::RequestFrame,
        ]
    );
    assert!(!state.tour.completed);
    assert_eq!(state.tour.phase, TourPhase::Active { step: 0 });
}

#[test]
fn welcome_step_has_no_action() {
    let mut state = state();
    open_tour(&mut state);
    let effects = run_user(&mut state, UserAction::Tour(TourEvent::InvokeAction));
    assert_eq!(effects, vec![DashboardEffect::RequestFrame]);
    assert_eq!(state.tour.phase, TourPhase::Active { step: 0 });
}
