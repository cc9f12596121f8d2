use thiserror::Error;
use crate::models::Credentials;
use crate::utils::initials;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const DELETE_CONFIRMATION: &str = "delete my account";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Username is required")]
    UsernameRequired,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

/// Per-field validation results, shown inline under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginErrors {
    pub username: Option<LoginError>,
    pub password: Option<LoginError>,
}

impl LoginErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
    Buttons,
}

impl LoginField {
    pub fn next(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Buttons,
            LoginField::Buttons => LoginField::Username,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub errors: LoginErrors,
    pub pending: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, LoginErrors> {
        let mut errors = LoginErrors::default();
        if self.username.trim().is_empty() {
            errors.username = Some(LoginError::UsernameRequired);
        }
        if self.password.trim().is_empty() {
            errors.password = Some(LoginError::PasswordRequired);
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.password = Some(LoginError::PasswordTooShort);
        }
        if errors.is_empty() {
            Ok(Credentials { username: self.username.clone(), password: self.password.clone() })
        } else {
            Err(errors)
        }
    }

    /// Validates and records errors. Returns the credentials to submit, or
    /// `None` while invalid or while a previous submission is pending.
    pub fn submit(&mut self) -> Option<Credentials> {
        if self.pending {
            return None;
        }
        match self.validate() {
            Ok(credentials) => {
                self.errors = LoginErrors::default();
                self.pending = true;
                Some(credentials)
            }
            Err(errors) => {
                tracing::debug!(?errors, "Login form rejected");
                self.errors = errors;
                None
            }
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            LoginField::Username => self.username.push(c),
            LoginField::Password => self.password.push(c),
            LoginField::Buttons => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            LoginField::Username => {
                self.username.pop();
            }
            LoginField::Password => {
                self.password.pop();
            }
            LoginField::Buttons => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Username,
    Email,
    Bio,
    Location,
    Website,
    Github,
    Twitter,
    ShowEmail,
    ShowLocation,
    EmailNotifications,
    TwoFactorAuth,
    DeleteAccount,
}

impl ProfileField {
    pub const ALL: [ProfileField; 13] = [
        ProfileField::Name,
        ProfileField::Username,
        ProfileField::Email,
        ProfileField::Bio,
        ProfileField::Location,
        ProfileField::Website,
        ProfileField::Github,
        ProfileField::Twitter,
        ProfileField::ShowEmail,
        ProfileField::ShowLocation,
        ProfileField::EmailNotifications,
        ProfileField::TwoFactorAuth,
        ProfileField::DeleteAccount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Full Name",
            ProfileField::Username => "Username",
            ProfileField::Email => "Email",
            ProfileField::Bio => "Bio",
            ProfileField::Location => "Location",
            ProfileField::Website => "Website",
            ProfileField::Github => "GitHub Username",
            ProfileField::Twitter => "Twitter Username",
            ProfileField::ShowEmail => "Show email",
            ProfileField::ShowLocation => "Show location",
            ProfileField::EmailNotifications => "Email notifications",
            ProfileField::TwoFactorAuth => "Two-factor authentication",
            ProfileField::DeleteAccount => "Delete Account",
        }
    }

    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            ProfileField::ShowEmail
                | ProfileField::ShowLocation
                | ProfileField::EmailNotifications
                | ProfileField::TwoFactorAuth
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub github: String,
    pub twitter: String,
    pub show_email: bool,
    pub show_location: bool,
    pub email_notifications: bool,
    pub two_factor_auth: bool,
    pub selected: usize,
    pub saving: bool,
}

impl Default for ProfileForm {
    fn default() -> Self {
        Self {
            name: "John Doe".into(),
            username: "johndoe".into(),
            email: "john@example.com".into(),
            bio: "Software developer passionate about web technologies and open source.".into(),
            location: "San Francisco, CA".into(),
            website: "https://johndoe.dev".into(),
            github: "johndoe".into(),
            twitter: "johndoe".into(),
            show_email: true,
            show_location: true,
            email_notifications: true,
            two_factor_auth: false,
            selected: 0,
            saving: false,
        }
    }
}

impl ProfileForm {
    pub fn selected_field(&self) -> ProfileField {
        ProfileField::ALL[self.selected.min(ProfileField::ALL.len() - 1)]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(ProfileField::ALL.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn text(&self, field: ProfileField) -> Option<&str> {
        let value = match field {
            ProfileField::Name => &self.name,
            ProfileField::Username => &self.username,
            ProfileField::Email => &self.email,
            ProfileField::Bio => &self.bio,
            ProfileField::Location => &self.location,
            ProfileField::Website => &self.website,
            ProfileField::Github => &self.github,
            ProfileField::Twitter => &self.twitter,
            _ => return None,
        };
        Some(value)
    }

    fn text_mut(&mut self, field: ProfileField) -> Option<&mut String> {
        let value = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Username => &mut self.username,
            ProfileField::Email => &mut self.email,
            ProfileField::Bio => &mut self.bio,
            ProfileField::Location => &mut self.location,
            ProfileField::Website => &mut self.website,
            ProfileField::Github => &mut self.github,
            ProfileField::Twitter => &mut self.twitter,
            _ => return None,
        };
        Some(value)
    }

    pub fn flag(&self, field: ProfileField) -> Option<bool> {
        match field {
            ProfileField::ShowEmail => Some(self.show_email),
            ProfileField::ShowLocation => Some(self.show_location),
            ProfileField::EmailNotifications => Some(self.email_notifications),
            ProfileField::TwoFactorAuth => Some(self.two_factor_auth),
            _ => None,
        }
    }

    pub fn set_flag(&mut self, field: ProfileField, value: bool) {
        match field {
            ProfileField::ShowEmail => self.show_email = value,
            ProfileField::ShowLocation => self.show_location = value,
            ProfileField::EmailNotifications => self.email_notifications = value,
            ProfileField::TwoFactorAuth => self.two_factor_auth = value,
            _ => {}
        }
    }

    pub fn toggle_selected(&mut self) {
        let field = self.selected_field();
        if let Some(value) = self.flag(field) {
            self.set_flag(field, !value);
        }
    }

    pub fn push_char(&mut self, c: char) {
        let field = self.selected_field();
        if let Some(value) = self.text_mut(field) {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let field = self.selected_field();
        if let Some(value) = self.text_mut(field) {
            value.pop();
        }
    }

    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    /// Marks the form as saving. Returns false while a save is in flight.
    pub fn begin_save(&mut self) -> bool {
        if self.saving {
            return false;
        }
        self.saving = true;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeleteAccountError {
    #[error("Please type the confirmation phrase correctly")]
    ConfirmationMismatch,
    #[error("Account deletion is already in progress")]
    AlreadyPending,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteAccountDialog {
    pub confirmation: String,
    pub pending: bool,
}

impl DeleteAccountDialog {
    /// The destructive action is enabled only on an exact phrase match.
    pub fn can_delete(&self) -> bool {
        !self.pending && self.confirmation == DELETE_CONFIRMATION
    }

    pub fn confirm(&mut self) -> Result<(), DeleteAccountError> {
        if self.pending {
            return Err(DeleteAccountError::AlreadyPending);
        }
        if self.confirmation != DELETE_CONFIRMATION {
            return Err(DeleteAccountError::ConfirmationMismatch);
        }
        self.pending = true;
        Ok(())
    }
}
