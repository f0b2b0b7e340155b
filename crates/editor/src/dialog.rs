//! The three-way unsaved-changes prompt.

/// The user's answer to the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Stay on the page; drafts untouched.
    Cancel,
    /// Drop all drafts and continue to the pending target.
    Discard,
    /// Save everything dirty, then continue to the pending target.
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

/// Open/closed state plus a busy flag that blocks actions while a save
/// started from the prompt is still pending.
#[derive(Debug, Default)]
pub struct UnsavedChangesDialog {
    state: DialogState,
    saving: bool,
}

impl UnsavedChangesDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether an action may be taken right now.
    pub fn accepts_actions(&self) -> bool {
        self.is_open() && !self.saving
    }

    pub fn open(&mut self) {
        self.state = DialogState::Open;
    }

    pub fn close(&mut self) {
        self.state = DialogState::Closed;
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }
}
