//! Typed create and update requests
//!
//! Create requests carry every field. Update requests carry `Option`s where
//! `None` leaves the stored value unchanged.

use keyward_common::{
    EmailValidator, NonEmptyListValidator, NonEmptyStringValidator, Validatable, ValidationError,
    Validator,
};
use keyward_rbac::{Action, UserStatus};
use serde::{Deserialize, Serialize};

fn check_required(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = NonEmptyStringValidator::new(field).validate(value) {
        errors.push(e);
    }
}

fn check_non_empty<T>(field: &str, values: &[T], errors: &mut Vec<ValidationError>) {
    if let Err(e) = NonEmptyListValidator::new(field).validate(values) {
        errors.push(e);
    }
}

fn check_email(value: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = EmailValidator::new("email").validate(value) {
        errors.push(e);
    }
}

/// Define a new catalog permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPermission {
    pub name: String,
    pub description: String,
    pub module: String,
    pub actions: Vec<Action>,
}

impl NewPermission {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        module: impl Into<String>,
        actions: impl IntoIterator<Item = Action>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            module: module.into(),
            actions: actions.into_iter().collect(),
        }
    }
}

impl Validatable for NewPermission {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_required("name", &self.name, &mut errors);
        check_required("description", &self.description, &mut errors);
        check_required("module", &self.module, &mut errors);
        check_non_empty("actions", &self.actions, &mut errors);
        ValidationError::from_list(errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub module: Option<String>,
    pub actions: Option<Vec<Action>>,
}

impl Validatable for PermissionUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_required("name", name, &mut errors);
        }
        if let Some(description) = &self.description {
            check_required("description", description, &mut errors);
        }
        if let Some(module) = &self.module {
            check_required("module", module, &mut errors);
        }
        if let Some(actions) = &self.actions {
            check_non_empty("actions", actions, &mut errors);
        }
        ValidationError::from_list(errors)
    }
}

/// Define a role granting catalog permissions by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub name: String,
    pub description: String,
    pub permission_ids: Vec<String>,
}

impl NewRole {
    pub fn new<I, S>(name: impl Into<String>, description: impl Into<String>, permission_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: description.into(),
            permission_ids: permission_ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validatable for NewRole {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_required("name", &self.name, &mut errors);
        check_required("description", &self.description, &mut errors);
        check_non_empty("permissions", &self.permission_ids, &mut errors);
        ValidationError::from_list(errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permission_ids: Option<Vec<String>>,
}

impl Validatable for RoleUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_required("name", name, &mut errors);
        }
        if let Some(description) = &self.description {
            check_required("description", description, &mut errors);
        }
        if let Some(ids) = &self.permission_ids {
            check_non_empty("permissions", ids, &mut errors);
        }
        ValidationError::from_list(errors)
    }
}

/// Register a user, optionally assigning roles by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub role_ids: Vec<String>,
}

impl NewUser {
    /// An active user with no roles
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            status: UserStatus::Active,
            role_ids: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_role_ids<I, S>(mut self, role_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_ids = role_ids.into_iter().map(Into::into).collect();
        self
    }
}

impl Validatable for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        check_required("name", &self.name, &mut errors);
        check_email(&self.email, &mut errors);
        ValidationError::from_list(errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    /// Replaces the whole role list when present
    pub role_ids: Option<Vec<String>>,
}

impl Validatable for UserUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_required("name", name, &mut errors);
        }
        if let Some(email) = &self.email {
            check_email(email, &mut errors);
        }
        ValidationError::from_list(errors)
    }
}
