//! Single-slot toast and confirmation state.
//!
//! Both slots hold at most one item: opening a new one replaces the old.
//! The kinds only pick colours and icons; they carry no behaviour and are
//! unrelated to [`crate::api::ApiError`].

/// How long a toast stays up unless dismissed.
pub const TOAST_DURATION_MS: u32 = 5_000;

/// Colour and heading of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Green.
    Success,
    /// Red.
    Error,
    /// Amber.
    Warning,
}

impl ToastKind {
    /// Heading shown above the message.
    pub fn title(&self) -> &'static str {
        match self {
            ToastKind::Success => "Success!",
            ToastKind::Error => "Error!",
            ToastKind::Warning => "Warning!",
        }
    }
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Body text.
    pub message: String,
    /// Presentation.
    pub kind: ToastKind,
}

/// The one visible toast, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastSlot {
    current: Option<Toast>,
    generation: u64,
}

impl ToastSlot {
    /// Replace whatever is showing. Returns the generation to pass to
    /// [`Self::expire`] when the auto-dismiss timer fires.
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) -> u64 {
        self.generation += 1;
        self.current = Some(Toast {
            message: message.into(),
            kind,
        });
        self.generation
    }

    /// [`Self::show`] with [`ToastKind::Success`].
    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Success)
    }

    /// [`Self::show`] with [`ToastKind::Error`].
    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Error)
    }

    /// Hide on explicit close.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Timer callback. Only hides the toast the timer was started for; a
    /// timer outliving its toast does nothing.
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.generation == generation && self.current.is_some() {
            self.current = None;
            return true;
        }
        false
    }

    /// Toast on screen, if any.
    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    /// Whether a toast is on screen.
    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    /// Generation of the latest [`Self::show`].
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Icon and confirm-button colour of a dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmKind {
    /// Amber.
    #[default]
    Warning,
    /// Red, for destructive actions.
    Danger,
    /// Green.
    Success,
}

/// What confirming a dialog does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Delete a managed account.
    DeleteUser {
        /// Account id.
        id: String,
    },
}

/// A dialog asking the user to confirm an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Heading.
    pub title: String,
    /// Question shown under the heading.
    pub message: String,
    /// Presentation.
    pub kind: ConfirmKind,
    /// What happens on confirm.
    pub action: ConfirmAction,
    /// `on_confirm` is in flight; both buttons are disabled.
    pub pending: bool,
}

impl Confirmation {
    /// New dialog, not yet pending.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: ConfirmKind,
        action: ConfirmAction,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            action,
            pending: false,
        }
    }
}

/// The one open confirmation dialog, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationSlot {
    current: Option<Confirmation>,
}

impl ConfirmationSlot {
    /// Open a dialog, replacing any open one.
    pub fn open(&mut self, confirmation: Confirmation) {
        self.current = Some(confirmation);
    }

    /// Enter the pending state and hand back the action to run. `None` when
    /// nothing is open or the action is already running.
    pub fn begin_confirm(&mut self) -> Option<ConfirmAction> {
        let confirmation = self.current.as_mut()?;
        if confirmation.pending {
            return None;
        }
        confirmation.pending = true;
        Some(confirmation.action.clone())
    }

    /// Close after the action finished, whatever its result.
    pub fn finish(&mut self) {
        self.current = None;
    }

    /// User pressed cancel or clicked the backdrop. Ignored while pending.
    pub fn cancel(&mut self) -> bool {
        match &self.current {
            Some(confirmation) if !confirmation.pending => {
                self.current = None;
                true
            },
            _ => false,
        }
    }

    /// Open dialog, if any.
    pub fn current(&self) -> Option<&Confirmation> {
        self.current.as_ref()
    }

    /// Whether a dialog is open.
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Whether the open dialog's action is in flight.
    pub fn is_pending(&self) -> bool {
        self.current.as_ref().is_some_and(|c| c.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete(id: &str) -> Confirmation {
        Confirmation::new(
            "Delete User",
            "Are you sure?",
            ConfirmKind::Danger,
            ConfirmAction::DeleteUser {
                id: id.to_string(),
            },
        )
    }

    #[test]
    fn toast_expires_after_its_own_timer() {
        let mut slot = ToastSlot::default();
        let generation = slot.success("User created successfully");
        assert_eq!(slot.current().map(|t| t.kind), Some(ToastKind::Success));
        assert!(slot.expire(generation));
        assert!(!slot.is_visible());
    }

    #[test]
    fn toast_can_be_dismissed_early() {
        let mut slot = ToastSlot::default();
        let generation = slot.success("User created successfully");
        slot.dismiss();
        assert!(!slot.is_visible());
        assert!(!slot.expire(generation));
    }

    #[test]
    fn new_toast_replaces_and_outlives_old_timer() {
        let mut slot = ToastSlot::default();
        let first = slot.success("first");
        let second = slot.error("second");

        assert!(!slot.expire(first));
        assert_eq!(slot.current().map(|t| t.message.as_str()), Some("second"));
        assert!(slot.expire(second));
    }

    #[test]
    fn confirmation_pending_blocks_cancel_and_double_confirm() {
        let mut slot = ConfirmationSlot::default();
        slot.open(delete("u1"));

        assert_eq!(
            slot.begin_confirm(),
            Some(ConfirmAction::DeleteUser {
                id: "u1".to_string()
            })
        );
        assert!(slot.is_pending());
        assert_eq!(slot.begin_confirm(), None);
        assert!(!slot.cancel());

        slot.finish();
        assert!(!slot.is_open());
    }

    #[test]
    fn opening_replaces_current_dialog() {
        let mut slot = ConfirmationSlot::default();
        slot.open(delete("u1"));
        slot.open(delete("u2"));
        assert_eq!(
            slot.current().map(|c| c.action.clone()),
            Some(ConfirmAction::DeleteUser {
                id: "u2".to_string()
            })
        );
        assert!(slot.cancel());
        assert!(!slot.is_open());
    }
}
