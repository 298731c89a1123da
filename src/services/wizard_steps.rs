use std::collections::BTreeSet;

pub const TOTAL_STEPS: usize = 4;

/// The product form steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    BasicInfo,
    Details,
    Images,
    Options,
}

impl WizardStep {
    pub const ALL: [WizardStep; TOTAL_STEPS] = [
        WizardStep::BasicInfo,
        WizardStep::Details,
        WizardStep::Images,
        WizardStep::Options,
    ];

    pub fn index(self) -> usize {
        match self {
            WizardStep::BasicInfo => 0,
            WizardStep::Details => 1,
            WizardStep::Images => 2,
            WizardStep::Options => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn first() -> Self {
        WizardStep::BasicInfo
    }

    pub fn last() -> Self {
        WizardStep::Options
    }

    pub fn is_last(self) -> bool {
        self == Self::last()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "Basic Info",
            WizardStep::Details => "Details",
            WizardStep::Images => "Images",
            WizardStep::Options => "Options",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Upcoming,
    Current,
    Complete,
}

/// Tracks which step is current and which ones are complete.
///
/// There is a single `current` step, and it is never part of the completed
/// set, so two current steps cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTracker {
    current: WizardStep,
    completed: BTreeSet<WizardStep>,
}

impl StepTracker {
    pub fn new() -> Self {
        StepTracker {
            current: WizardStep::first(),
            completed: BTreeSet::new(),
        }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn status(&self, step: WizardStep) -> StepStatus {
        if step == self.current {
            StepStatus::Current
        } else if self.completed.contains(&step) {
            StepStatus::Complete
        } else {
            StepStatus::Upcoming
        }
    }

    pub fn statuses(&self) -> [(WizardStep, StepStatus); TOTAL_STEPS] {
        WizardStep::ALL.map(|step| (step, self.status(step)))
    }

    /// Completes the current step and makes the next one current
    pub fn advance(&mut self) -> Option<WizardStep> {
        let next = self.current.next()?;
        self.completed.insert(self.current);
        self.current = next;
        Some(next)
    }

    /// Current step goes back to upcoming, the previous one becomes current
    pub fn retreat(&mut self) -> Option<WizardStep> {
        let previous = self.current.previous()?;
        self.completed.remove(&self.current);
        self.completed.remove(&previous);
        self.current = previous;
        Some(previous)
    }

    /// Forward: every step before `target` is complete.
    /// Backward: steps after `target` become upcoming, earlier ones are untouched.
    pub fn jump_to(&mut self, target: WizardStep) {
        if target > self.current {
            self.completed
                .extend(WizardStep::ALL.into_iter().filter(|step| *step < target));
        }
        self.completed.retain(|step| *step < target);
        self.current = target;
    }
}

impl Default for StepTracker {
    fn default() -> Self {
        Self::new()
    }
}
