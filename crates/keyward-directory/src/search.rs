//! User listing: text search, status filter and sorting

use std::cmp::Ordering;

use keyward_rbac::{User, UserStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn matches(&self, status: UserStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == UserStatus::Active,
            StatusFilter::Inactive => status == UserStatus::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Name,
    Email,
    Status,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Filter and ordering applied to the user list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserQuery {
    /// Case-insensitive substring of name or email; empty matches everyone
    pub search: String,
    pub status: StatusFilter,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn sort_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.direction = direction;
        self
    }

    pub fn matches(&self, user: &User) -> bool {
        if !self.status.matches(user.status) {
            return false;
        }
        let needle = self.search.to_lowercase();
        needle.is_empty()
            || user.name.to_lowercase().contains(&needle)
            || user.email.to_lowercase().contains(&needle)
    }

    fn compare(&self, a: &User, b: &User) -> Ordering {
        let ordering = match self.sort_field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.cmp(&b.email),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Matching users in query order. Ties keep their input order.
    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        let mut found: Vec<&User> = users.iter().filter(|u| self.matches(u)).collect();
        found.sort_by(|a, b| self.compare(a, b));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn users() -> Vec<User> {
        let base = Utc::now();
        let mut list = vec![
            User::new("1", "Admin User", "admin@example.com"),
            User::new("2", "John Doe", "john@example.com").with_status(UserStatus::Inactive),
            User::new("3", "Jane Smith", "jane@corp.io"),
        ];
        for (i, user) in list.iter_mut().enumerate() {
            user.created_at = base + Duration::seconds(i as i64);
        }
        list
    }

    fn ids(found: &[&User]) -> Vec<String> {
        found.iter().map(|u| u.id.clone()).collect()
    }

    #[test]
    fn test_default_query_sorts_by_name() {
        let users = users();
        assert_eq!(ids(&UserQuery::new().apply(&users)), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_email() {
        let users = users();
        assert_eq!(ids(&UserQuery::new().search("JOHN").apply(&users)), vec!["2"]);
        assert_eq!(ids(&UserQuery::new().search("corp").apply(&users)), vec!["3"]);
        assert!(UserQuery::new().search("nobody").apply(&users).is_empty());
    }

    #[test]
    fn test_status_filter() {
        let users = users();
        let inactive = UserQuery::new().status(StatusFilter::Inactive).apply(&users);
        assert_eq!(ids(&inactive), vec!["2"]);
        assert_eq!(UserQuery::new().status(StatusFilter::Active).apply(&users).len(), 2);
    }

    #[test]
    fn test_sort_fields_and_direction() {
        let users = users();
        let newest_first = UserQuery::new()
            .sort_by(SortField::CreatedAt, SortDirection::Desc)
            .apply(&users);
        assert_eq!(ids(&newest_first), vec!["3", "2", "1"]);

        let by_email = UserQuery::new()
            .sort_by(SortField::Email, SortDirection::Asc)
            .apply(&users);
        assert_eq!(ids(&by_email), vec!["1", "3", "2"]);

        let by_status = UserQuery::new()
            .sort_by(SortField::Status, SortDirection::Asc)
            .apply(&users);
        assert_eq!(ids(&by_status)[0], "1");
        assert_eq!(ids(&by_status)[2], "2");
    }
}
