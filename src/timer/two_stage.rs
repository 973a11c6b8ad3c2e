//! Two-stage brew timer

use super::{countdown::StageTick, BrewDurations, CountdownStage, TimerMachine};
use crate::state::{Cue, TimerEvent, TimerKind, TimerPhase, TimerState};

const KIND: TimerKind = TimerKind::Brew;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrewPhase {
    Idle,
    Stage1,
    Stage2,
    Complete,
}

/// Runs brew stage 1 then brew stage 2.
///
/// Durations are only read on reset. Pausing overlays either running stage
/// and resuming returns to the same stage with the frozen remaining time.
/// `Complete` is terminal until the next reset.
#[derive(Debug, Clone)]
pub struct TwoStageTimer {
    durations: BrewDurations,
    phase: BrewPhase,
    stage: CountdownStage,
}

impl TwoStageTimer {
    pub fn new(durations: BrewDurations) -> Self {
        Self {
            durations,
            phase: BrewPhase::Idle,
            stage: CountdownStage::from_secs(durations.stage1),
        }
    }

    /// Return to idle with stage 1 loaded from `durations`
    pub fn reset(&mut self, durations: BrewDurations) -> Vec<TimerEvent> {
        *self = Self::new(durations);
        vec![
            TimerEvent::display(KIND, self.stage.remaining()),
            TimerEvent::phase(KIND, self.label()),
        ]
    }

    /// Apply edited durations. Edits always reset, whatever the phase.
    pub fn set_durations(&mut self, durations: BrewDurations) -> Vec<TimerEvent> {
        self.reset(durations)
    }

    /// Start from idle or resume from pause
    pub fn start(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        match self.phase {
            BrewPhase::Idle => {
                self.phase = BrewPhase::Stage1;
                events.push(TimerEvent::phase(KIND, self.label()));
                if let Some(StageTick::Expired) = self.stage.arm() {
                    self.finish_stage(&mut events);
                }
            }
            BrewPhase::Stage1 | BrewPhase::Stage2 if self.stage.is_paused() => {
                self.stage.resume();
                events.push(TimerEvent::phase(KIND, self.label()));
            }
            _ => {}
        }
        events
    }

    pub fn pause(&mut self) -> Vec<TimerEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        self.stage.pause();
        vec![TimerEvent::phase(KIND, self.label())]
    }

    pub fn phase(&self) -> BrewPhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.stage.is_paused()
    }

    pub fn remaining(&self) -> u64 {
        self.stage.remaining()
    }

    pub fn durations(&self) -> BrewDurations {
        self.durations
    }

    fn finish_stage(&mut self, events: &mut Vec<TimerEvent>) {
        match self.phase {
            BrewPhase::Stage1 => {
                events.push(TimerEvent::cue(KIND, Cue::StageChange));
                self.phase = BrewPhase::Stage2;
                self.stage = CountdownStage::from_secs(self.durations.stage2);
                events.push(TimerEvent::display(KIND, self.stage.remaining()));
                events.push(TimerEvent::phase(KIND, self.label()));
                if let Some(StageTick::Expired) = self.stage.arm() {
                    self.finish_stage(events);
                }
            }
            BrewPhase::Stage2 => {
                events.push(TimerEvent::cue(KIND, Cue::Complete));
                self.phase = BrewPhase::Complete;
                events.push(TimerEvent::phase(KIND, self.label()));
                events.push(TimerEvent::completed(KIND, "Brew complete"));
            }
            BrewPhase::Idle | BrewPhase::Complete => {}
        }
    }

    fn label(&self) -> String {
        let paused = if self.stage.is_paused() { "Paused - " } else { "" };
        match self.phase {
            BrewPhase::Idle => "Ready".to_string(),
            BrewPhase::Stage1 => format!("{}Stage 1", paused),
            BrewPhase::Stage2 => format!("{}Stage 2", paused),
            BrewPhase::Complete => "Complete".to_string(),
        }
    }
}

impl TimerMachine for TwoStageTimer {
    fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.is_running() {
            return Vec::new();
        }
        let mut events = Vec::new();
        match self.stage.tick() {
            Some(StageTick::Running(remaining)) => {
                events.push(TimerEvent::display(KIND, remaining));
            }
            Some(StageTick::Expired) => {
                events.push(TimerEvent::display(KIND, 0));
                self.finish_stage(&mut events);
            }
            None => {}
        }
        events
    }

    fn is_running(&self) -> bool {
        matches!(self.phase, BrewPhase::Stage1 | BrewPhase::Stage2) && !self.stage.is_paused()
    }

    fn state(&self) -> TimerState {
        let (phase, current) = match self.phase {
            BrewPhase::Idle => (TimerPhase::Idle, 0),
            BrewPhase::Stage1 => (TimerPhase::RunningOn, 1),
            BrewPhase::Stage2 => (TimerPhase::RunningOff, 2),
            BrewPhase::Complete => (TimerPhase::Complete, 2),
        };
        let mut state = TimerState::new(KIND, phase, self.stage.remaining(), self.label());
        state.paused = self.stage.is_paused();
        state.current = current;
        state.total = 2;
        state.configured_durations = vec![self.durations.stage1, self.durations.stage2];
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues(events: &[TimerEvent]) -> Vec<Cue> {
        events
            .iter()
            .filter_map(|e| match e {
                TimerEvent::Cue { cue, .. } => Some(*cue),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn reset_loads_stage_one() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(1, 1));
        let events = timer.reset(BrewDurations::new(90, 30));
        assert_eq!(timer.phase(), BrewPhase::Idle);
        assert_eq!(timer.remaining(), 90);
        assert_eq!(events[0], TimerEvent::display(KIND, 90));
        assert_eq!(timer.state().display, "01:30");
    }

    #[test]
    fn three_then_two_switches_at_tick_three_and_completes_at_five() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(3, 2));
        timer.start();
        assert_eq!(timer.phase(), BrewPhase::Stage1);

        let mut phases = Vec::new();
        let mut all = Vec::new();
        for _ in 0..5 {
            all.extend(timer.tick());
            phases.push(timer.phase());
        }
        assert_eq!(
            phases,
            vec![
                BrewPhase::Stage1,
                BrewPhase::Stage1,
                BrewPhase::Stage2,
                BrewPhase::Stage2,
                BrewPhase::Complete,
            ]
        );
        assert_eq!(cues(&all), vec![Cue::StageChange, Cue::Complete]);
        assert!(all.contains(&TimerEvent::completed(KIND, "Brew complete")));
    }

    #[test]
    fn zero_stage_one_goes_straight_to_stage_two() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(0, 5));
        let events = timer.start();
        assert_eq!(timer.phase(), BrewPhase::Stage2);
        assert_eq!(timer.remaining(), 5);
        assert_eq!(cues(&events), vec![Cue::StageChange]);
        assert!(timer.is_running());
    }

    #[test]
    fn zero_stage_two_completes_without_ticking() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(1, 0));
        timer.start();
        let events = timer.tick();
        assert_eq!(timer.phase(), BrewPhase::Complete);
        assert_eq!(cues(&events), vec![Cue::StageChange, Cue::Complete]);
    }

    #[test]
    fn all_zero_completes_on_start() {
        let mut timer = TwoStageTimer::new(BrewDurations::default());
        timer.start();
        assert_eq!(timer.phase(), BrewPhase::Complete);
        assert!(!timer.is_running());
    }

    #[test]
    fn pause_freezes_and_resume_keeps_stage() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(2, 4));
        timer.start();
        timer.tick();
        timer.tick();
        timer.tick();
        assert_eq!(timer.phase(), BrewPhase::Stage2);
        assert_eq!(timer.remaining(), 3);

        timer.pause();
        assert!(timer.is_paused());
        assert!(!timer.is_running());
        assert!(timer.tick().is_empty());
        assert_eq!(timer.state().label, "Paused - Stage 2");

        timer.start();
        assert_eq!(timer.phase(), BrewPhase::Stage2);
        timer.tick();
        assert_eq!(timer.remaining(), 2);
    }

    #[test]
    fn complete_is_terminal_until_reset() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(1, 1));
        timer.start();
        timer.tick();
        timer.tick();
        assert_eq!(timer.phase(), BrewPhase::Complete);

        assert!(timer.start().is_empty());
        assert!(timer.tick().is_empty());
        assert!(timer.pause().is_empty());

        timer.reset(BrewDurations::new(1, 1));
        assert_eq!(timer.phase(), BrewPhase::Idle);
    }

    #[test]
    fn editing_while_running_resets() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(10, 10));
        timer.start();
        timer.tick();
        timer.set_durations(BrewDurations::new(20, 5));
        assert_eq!(timer.phase(), BrewPhase::Idle);
        assert_eq!(timer.remaining(), 20);
        assert_eq!(timer.state().configured_durations, vec![20, 5]);
    }

    #[test]
    fn editing_while_paused_resets() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(10, 10));
        timer.start();
        timer.tick();
        timer.pause();
        timer.set_durations(BrewDurations::new(7, 1));
        assert_eq!(timer.phase(), BrewPhase::Idle);
        assert!(!timer.is_paused());
        assert_eq!(timer.remaining(), 7);
    }

    #[test]
    fn editing_while_idle_resets() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(10, 10));
        let events = timer.set_durations(BrewDurations::new(7, 1));
        assert_eq!(timer.phase(), BrewPhase::Idle);
        assert_eq!(timer.remaining(), 7);
        assert_eq!(events[0], TimerEvent::display(KIND, 7));
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut timer = TwoStageTimer::new(BrewDurations::new(5, 5));
        timer.start();
        timer.tick();
        assert!(timer.start().is_empty());
        assert_eq!(timer.remaining(), 4);
    }
}
