//! User-management tab: list, create/edit form, delete confirmation.

use crate::{
    api::ApiError,
    fetch::{FetchOutcome, LoadState, RequestSeq},
    models::{ManagedUser, Role, UserPayload},
    notify::{ConfirmAction, ConfirmKind, Confirmation},
    validation::{Field, ValidationError},
};

/// Inputs of the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    /// Login email.
    pub email: String,
    /// Blank while editing means "keep the current password".
    pub password: String,
    /// Role select.
    pub role: Role,
}

/// What a valid form turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSubmission {
    /// New account.
    Create(UserPayload),
    /// Changes to an existing account.
    Update {
        /// Account id.
        id: String,
        /// New field values.
        payload: UserPayload,
    },
}

/// Controller behind the user-management tab.
#[derive(Debug, Clone, Default)]
pub struct UserManagementController {
    users: Vec<ManagedUser>,
    form: UserForm,
    editing: Option<ManagedUser>,
    state: LoadState,
    seq: RequestSeq,
}

impl UserManagementController {
    /// Empty list and blank form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts in display order.
    pub fn users(&self) -> &[ManagedUser] {
        &self.users
    }

    /// Create/edit form inputs.
    pub fn form(&self) -> &UserForm {
        &self.form
    }

    /// Edit the form inputs.
    pub fn form_mut(&mut self) -> &mut UserForm {
        &mut self.form
    }

    /// User currently being edited, if any.
    pub fn editing(&self) -> Option<&ManagedUser> {
        self.editing.as_ref()
    }

    /// Load state of the list.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether a list fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Start a list fetch; pass the returned generation to
    /// [`Self::finish_load`].
    pub fn begin_load(&mut self) -> u64 {
        self.state = LoadState::Loading;
        self.seq.next()
    }

    /// Replace the list with a fetch result, unless a newer fetch was
    /// started in the meantime.
    pub fn finish_load(
        &mut self,
        generation: u64,
        result: Result<Vec<ManagedUser>, ApiError>,
    ) -> FetchOutcome {
        if !self.seq.is_current(generation) {
            return FetchOutcome::Stale;
        }
        match result {
            Ok(users) => {
                self.users = users;
                self.state = LoadState::Loaded;
                FetchOutcome::Applied
            },
            Err(err) if err.requires_login() => {
                self.state = LoadState::Idle;
                FetchOutcome::SessionExpired
            },
            Err(err) => {
                let message = format!("Failed to load users: {}", err.user_message());
                self.state = LoadState::Failed(message.clone());
                FetchOutcome::Failed(message)
            },
        }
    }

    /// Fill the form from `user`. The password stays blank.
    pub fn start_edit(&mut self, user: &ManagedUser) {
        self.form = UserForm {
            email: user.email.clone(),
            password: String::new(),
            role: user.role,
        };
        self.editing = Some(user.clone());
    }

    /// Leave edit mode and blank the form.
    pub fn cancel_edit(&mut self) {
        self.form = UserForm::default();
        self.editing = None;
    }

    /// Validate the form and build the request to send. A password is
    /// required only when creating.
    pub fn submission(&self) -> Result<UserSubmission, Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.form.email.trim().is_empty() {
            errors.push(ValidationError::new(Field::Email, "Email is required"));
        }
        if self.editing.is_none() && self.form.password.is_empty() {
            errors.push(ValidationError::new(Field::Password, "Password is required"));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let payload = UserPayload {
            email: self.form.email.trim().to_string(),
            password: self.form.password.clone(),
            role: self.form.role,
        };
        Ok(match &self.editing {
            Some(user) => UserSubmission::Update {
                id: user.id.clone(),
                payload,
            },
            None => UserSubmission::Create(payload),
        })
    }

    /// Append a created user without refetching.
    pub fn apply_created(&mut self, user: ManagedUser) {
        self.users.push(user);
        self.form = UserForm::default();
    }

    /// Swap in an updated user by id and leave edit mode.
    pub fn apply_updated(&mut self, user: ManagedUser) {
        if let Some(row) = self.users.iter_mut().find(|row| row.id == user.id) {
            *row = user;
        }
        self.cancel_edit();
    }

    /// Drop a deleted user. Editing the deleted user also ends.
    pub fn apply_deleted(&mut self, id: &str) {
        self.users.retain(|user| user.id != id);
        if self.editing.as_ref().is_some_and(|user| user.id == id) {
            self.cancel_edit();
        }
    }

    /// Confirmation dialog guarding a delete.
    pub fn delete_confirmation(&self, id: &str) -> Confirmation {
        Confirmation::new(
            "Delete User",
            "Are you sure you want to delete this user? This action cannot be undone.",
            ConfirmKind::Danger,
            ConfirmAction::DeleteUser {
                id: id.to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str, role: Role) -> ManagedUser {
        ManagedUser {
            id: id.to_string(),
            email: email.to_string(),
            role,
            last_login: None,
            is_active: true,
        }
    }

    #[test]
    fn create_requires_password() {
        let mut controller = UserManagementController::new();
        controller.form_mut().email = "new@x.com".to_string();

        let errors = controller.submission().expect_err("password missing");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Password);

        controller.form_mut().password = "Secret1!".to_string();
        assert_eq!(
            controller.submission(),
            Ok(UserSubmission::Create(UserPayload {
                email: "new@x.com".to_string(),
                password: "Secret1!".to_string(),
                role: Role::User,
            }))
        );
    }

    #[test]
    fn edit_prefills_and_allows_blank_password() {
        let mut controller = UserManagementController::new();
        let admin = user("u1", "boss@x.com", Role::Admin);
        controller.start_edit(&admin);

        assert_eq!(controller.form().email, "boss@x.com");
        assert_eq!(controller.form().role, Role::Admin);
        assert!(controller.form().password.is_empty());

        match controller.submission().expect("valid update") {
            UserSubmission::Update { id, payload } => {
                assert_eq!(id, "u1");
                assert!(payload.password.is_empty());
            },
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn apply_results_keep_list_in_sync() {
        let mut controller = UserManagementController::new();
        let generation = controller.begin_load();
        controller.finish_load(generation, Ok(vec![user("u1", "a@x.com", Role::User)]));

        controller.form_mut().email = "b@x.com".to_string();
        controller.apply_created(user("u2", "b@x.com", Role::User));
        assert_eq!(controller.users().len(), 2);
        assert_eq!(controller.form(), &UserForm::default());

        controller.start_edit(&controller.users()[0].clone());
        controller.apply_updated(user("u1", "a@x.com", Role::Admin));
        assert_eq!(controller.users()[0].role, Role::Admin);
        assert!(controller.editing().is_none());

        controller.apply_deleted("u2");
        assert_eq!(controller.users().len(), 1);
    }

    #[test]
    fn stale_user_fetch_is_dropped() {
        let mut controller = UserManagementController::new();
        let first = controller.begin_load();
        let second = controller.begin_load();

        assert_eq!(
            controller.finish_load(second, Ok(vec![user("u1", "a@x.com", Role::User)])),
            FetchOutcome::Applied
        );
        assert_eq!(controller.finish_load(first, Ok(Vec::new())), FetchOutcome::Stale);
        assert_eq!(controller.users().len(), 1);
    }

    #[test]
    fn failed_fetch_keeps_rows() {
        let mut controller = UserManagementController::new();
        let generation = controller.begin_load();
        controller.finish_load(generation, Ok(vec![user("u1", "a@x.com", Role::User)]));

        let generation = controller.begin_load();
        let outcome = controller.finish_load(generation, Err(ApiError::Transport("down".into())));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(controller.users().len(), 1);

        let generation = controller.begin_load();
        assert_eq!(
            controller.finish_load(generation, Err(ApiError::AuthExpired)),
            FetchOutcome::SessionExpired
        );
    }

    #[test]
    fn delete_is_guarded_by_danger_confirmation() {
        let controller = UserManagementController::new();
        let confirmation = controller.delete_confirmation("u7");
        assert_eq!(confirmation.kind, ConfirmKind::Danger);
        assert!(confirmation.message.contains("cannot be undone"));
        assert_eq!(confirmation.action, ConfirmAction::DeleteUser {
            id: "u7".to_string()
        });
    }
}
