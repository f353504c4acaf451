#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Left,
    Right,
    Up,
}

const ACTION_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::Left => 0,
            InputAction::Right => 1,
            InputAction::Up => 2,
        }
    }
}

/// Key state sampled once per tick by the input collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit() -> Self {
        Self {
            quit_requested: true,
            ..Self::default()
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }
}

/// Input collaborator polled once per simulation tick.
pub trait InputSource {
    fn snapshot_for_tick(&mut self) -> InputSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_nothing_down() {
        let snapshot = InputSnapshot::empty();
        assert!(!snapshot.is_down(InputAction::Left));
        assert!(!snapshot.is_down(InputAction::Right));
        assert!(!snapshot.is_down(InputAction::Up));
        assert!(!snapshot.quit_requested());
    }

    #[test]
    fn actions_are_independent() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::Left, true)
            .with_action_down(InputAction::Up, true)
            .with_action_down(InputAction::Left, false);
        assert!(!snapshot.is_down(InputAction::Left));
        assert!(snapshot.is_down(InputAction::Up));
        assert!(!snapshot.is_down(InputAction::Right));
    }
}
