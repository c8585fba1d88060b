//! First-run onboarding tour.
//!
//! The tour is a fixed, linear sequence of [`TourStep`]s driven by
//! [`reduce_tour`]. The reducer never touches storage or the network; it
//! returns [`TourEffect`]s and the host performs them.

use std::time::Duration;

use crate::state::Section;

/// Visual dismissal delay between `Exiting` and `Closed`.
pub const TOUR_EXIT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourStep {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub highlight: Section,
    pub action: Option<Section>,
}

pub const TOUR_STEPS: [TourStep; 8] = [
    TourStep {
        id: "welcome",
        title: "Welcome to Talkrix",
        description: "Build, deploy and monitor AI voice agents from one dashboard. This short tour shows where everything lives.",
        highlight: Section::Overview,
        action: None,
    },
    TourStep {
        id: "agents",
        title: "Create your first agent",
        description: "Agents hold the prompt, voice and model a call runs with. Start here to create one.",
        highlight: Section::Agents,
        action: Some(Section::Agents),
    },
    TourStep {
        id: "tools",
        title: "Give agents tools",
        description: "Built-in tools hang up, transfer or query a knowledge base. Add your own HTTP tools for anything else.",
        highlight: Section::Tools,
        action: Some(Section::Tools),
    },
    TourStep {
        id: "knowledge",
        title: "Ground answers in your data",
        description: "Upload documents or crawl sites into a corpus so agents can answer from your content.",
        highlight: Section::Knowledge,
        action: Some(Section::Knowledge),
    },
    TourStep {
        id: "campaigns",
        title: "Run outbound campaigns",
        description: "Import contacts from a spreadsheet and let an agent call through the list.",
        highlight: Section::Campaigns,
        action: Some(Section::Campaigns),
    },
    TourStep {
        id: "calls",
        title: "Review call history",
        description: "Every call with status, duration and cost. Filter, page through and export to CSV.",
        highlight: Section::Calls,
        action: Some(Section::Calls),
    },
    TourStep {
        id: "settings",
        title: "Connect telephony",
        description: "Add provider credentials and phone numbers, and manage your API key.",
        highlight: Section::Settings,
        action: Some(Section::Settings),
    },
    TourStep {
        id: "done",
        title: "You're all set",
        description: "Re-open this tour any time from the dashboard.",
        highlight: Section::Overview,
        action: None,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourPhase {
    Closed,
    Active { step: usize },
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEvent {
    Open,
    Next,
    Back,
    Select(usize),
    Skip,
    InvokeAction,
    ExitElapsed,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEffect {
    PersistCompleted,
    ClearCompleted,
    /// Best-effort backend notification, sent for finish, skip and action
    /// alike. Failures are not rolled back.
    NotifyCompleted,
    Navigate(Section),
    ScheduleExit(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourState {
    pub phase: TourPhase,
    pub completed: bool,
    steps: &'static [TourStep],
}

impl Default for TourState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TourState {
    pub fn new(completed: bool) -> Self {
        Self::with_steps(&TOUR_STEPS, completed)
    }

    pub fn with_steps(steps: &'static [TourStep], completed: bool) -> Self {
        Self {
            phase: TourPhase::Closed,
            completed,
            steps,
        }
    }

    pub fn steps(&self) -> &'static [TourStep] {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, TourPhase::Closed)
    }

    pub fn current_step(&self) -> Option<(usize, &'static TourStep)> {
        match self.phase {
            TourPhase::Active { step } => self.steps.get(step).map(|s| (step, s)),
            _ => None,
        }
    }

    fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    fn finish(&mut self) -> Vec<TourEffect> {
        self.phase = TourPhase::Exiting;
        self.completed = true;
        vec![
            TourEffect::PersistCompleted,
            TourEffect::NotifyCompleted,
            TourEffect::ScheduleExit(TOUR_EXIT_DELAY),
        ]
    }
}

pub fn reduce_tour(tour: &mut TourState, event: TourEvent) -> Vec<TourEffect> {
    match (tour.phase, event) {
        (_, TourEvent::Reset) => {
            tour.completed = false;
            if !tour.is_empty() {
                tour.phase = TourPhase::Active { step: 0 };
            }
            vec![TourEffect::ClearCompleted]
        }
        (TourPhase::Closed, TourEvent::Open) => {
            if !tour.is_empty() {
                tour.phase = TourPhase::Active { step: 0 };
            }
            Vec::new()
        }
        (TourPhase::Active { step }, TourEvent::Next) => {
            if step >= tour.last_index() {
                tour.finish()
            } else {
                tour.phase = TourPhase::Active { step: step + 1 };
                Vec::new()
            }
        }
        (TourPhase::Active { step }, TourEvent::Back) => {
            tour.phase = TourPhase::Active {
                step: step.saturating_sub(1),
            };
            Vec::new()
        }
        (TourPhase::Active { .. }, TourEvent::Select(target)) => {
            if target < tour.len() {
                tour.phase = TourPhase::Active { step: target };
            }
            Vec::new()
        }
        (TourPhase::Active { .. }, TourEvent::Skip) => tour.finish(),
        (TourPhase::Active { step }, TourEvent::InvokeAction) => {
            let Some(target) = tour.steps.get(step).and_then(|s| s.action) else {
                return Vec::new();
            };
            tour.phase = TourPhase::Closed;
            tour.completed = true;
            vec![
                TourEffect::PersistCompleted,
                TourEffect::NotifyCompleted,
                TourEffect::Navigate(target),
            ]
        }
        (TourPhase::Exiting, TourEvent::ExitElapsed) => {
            tour.phase = TourPhase::Closed;
            Vec::new()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn open() -> TourState {
        let mut tour = TourState::new(false);
        reduce_tour(&mut tour, TourEvent::Open);
        tour
    }

    #[test]
    fn step_ids_are_unique() {
        let mut ids: Vec<&str> = TOUR_STEPS.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), TOUR_STEPS.len());
    }

    #[test]
    fn next_walks_every_step_then_finishes() {
        let mut tour = open();
        let n = tour.len();
        for _ in 0..n - 1 {
            assert!(reduce_tour(&mut tour, TourEvent::Next).is_empty());
        }
        assert_eq!(tour.phase, TourPhase::Active { step: n - 1 });

        let effects = reduce_tour(&mut tour, TourEvent::Next);
        assert_eq!(
            effects,
            vec![
                TourEffect::PersistCompleted,
                TourEffect::NotifyCompleted,
                TourEffect::ScheduleExit(TOUR_EXIT_DELAY),
            ]
        );
        assert_eq!(tour.phase, TourPhase::Exiting);
        assert!(tour.completed);

        reduce_tour(&mut tour, TourEvent::ExitElapsed);
        assert_eq!(tour.phase, TourPhase::Closed);
    }

    #[test]
    fn repeated_next_after_finish_is_idempotent() {
        let mut tour = open();
        let last = tour.len() - 1;
        reduce_tour(&mut tour, TourEvent::Select(last));
        assert!(!reduce_tour(&mut tour, TourEvent::Next).is_empty());
        for _ in 0..5 {
            assert!(reduce_tour(&mut tour, TourEvent::Next).is_empty());
            assert_eq!(tour.phase, TourPhase::Exiting);
        }
    }

    #[test]
    fn step_index_never_leaves_bounds() {
        let mut tour = open();
        let events = [
            TourEvent::Back,
            TourEvent::Back,
            TourEvent::Next,
            TourEvent::Back,
            TourEvent::Back,
            TourEvent::Next,
            TourEvent::Next,
            TourEvent::Next,
            TourEvent::Select(99),
            TourEvent::Back,
        ];
        for event in events {
            reduce_tour(&mut tour, event);
            if let TourPhase::Active { step } = tour.phase {
                assert!(step < tour.len());
            }
        }
        assert_eq!(tour.phase, TourPhase::Active { step: 2 });
    }

    #[test]
    fn skip_counts_as_completion() {
        let mut tour = open();
        reduce_tour(&mut tour, TourEvent::Next);
        let effects = reduce_tour(&mut tour, TourEvent::Skip);
        assert!(effects.contains(&TourEffect::PersistCompleted));
        assert_eq!(tour.phase, TourPhase::Exiting);
        assert!(tour.completed);
    }

    #[test]
    fn action_navigates_and_closes_without_exit_animation() {
        let mut tour = open();
        assert!(reduce_tour(&mut tour, TourEvent::InvokeAction).is_empty());
        assert_eq!(tour.phase, TourPhase::Active { step: 0 });

        reduce_tour(&mut tour, TourEvent::Next);
        let effects = reduce_tour(&mut tour, TourEvent::InvokeAction);
        assert_eq!(
            effects,
            vec![
                TourEffect::PersistCompleted,
                TourEffect::NotifyCompleted,
                TourEffect::Navigate(Section::Agents),
            ]
        );
        assert_eq!(tour.phase, TourPhase::Closed);
    }

    #[test]
    fn reopening_restarts_from_first_step() {
        let mut tour = open();
        reduce_tour(&mut tour, TourEvent::Select(4));
        reduce_tour(&mut tour, TourEvent::Skip);
        reduce_tour(&mut tour, TourEvent::ExitElapsed);
        reduce_tour(&mut tour, TourEvent::Open);
        assert_eq!(tour.phase, TourPhase::Active { step: 0 });
    }

    #[test]
    fn reset_clears_completion_and_opens() {
        let mut tour = TourState::new(true);
        let effects = reduce_tour(&mut tour, TourEvent::Reset);
        assert_eq!(effects, vec![TourEffect::ClearCompleted]);
        assert!(!tour.completed);
        assert_eq!(tour.phase, TourPhase::Active { step: 0 });
    }

    #[test]
    fn closed_tour_ignores_navigation() {
        let mut tour = TourState::new(false);
        for event in [TourEvent::Next, TourEvent::Back, TourEvent::Skip, TourEvent::ExitElapsed] {
            assert!(reduce_tour(&mut tour, event).is_empty());
            assert_eq!(tour.phase, TourPhase::Closed);
        }
    }
}
