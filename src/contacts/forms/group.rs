use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use super::{derive_slug, duplicate, SLUG_MAX_LENGTH};
use crate::contacts::error::ContactsError;
use crate::contacts::models::{Company, Group, GroupChanges, NewGroup, Person};
use crate::core::validation::{ValidationError, ValidationResult, Validator};

pub const GROUP_NAME_MAX_LENGTH: usize = 200;

/// Cleaned group values together with the requested membership sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedGroup {
    pub changes: GroupChanges,
    pub people: Vec<i32>,
    pub companies: Vec<i32>,
}

fn check_members(
    conn: &mut SqliteConnection,
    people: &[i32],
    companies: &[i32],
    errors: &mut ValidationResult,
) -> Result<(), ContactsError> {
    for &id in people {
        if !Person::exists(conn, id)? {
            errors.add_error(ValidationError::UnknownReference {
                field: "people".to_string(),
                id,
            });
        }
    }
    for &id in companies {
        if !Company::exists(conn, id)? {
            errors.add_error(ValidationError::UnknownReference {
                field: "companies".to_string(),
                id,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCreateForm {
    pub name: String,
    #[serde(default)]
    pub about: String,
}

impl GroupCreateForm {
    pub const FIELDS: &'static [&'static str] = &["name", "about"];

    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
        now: NaiveDateTime,
    ) -> Result<NewGroup, ContactsError> {
        let mut errors = Validator::new()
            .required(&self.name, "name", GROUP_NAME_MAX_LENGTH)
            .result();

        let mut slug = String::new();
        if errors.is_valid() {
            match derive_slug(&self.name, "name") {
                Ok(derived) => {
                    if Group::slug_taken(conn, &derived, None)? {
                        errors.add_error(duplicate("name", &derived));
                    }
                    slug = derived;
                }
                Err(e) => errors.add_error(e),
            }
        }

        if !errors.is_valid() {
            return Err(errors.into());
        }

        Ok(NewGroup {
            name: self.name.trim().to_string(),
            slug,
            about: self.about.trim().to_string(),
            date_added: now,
            date_modified: now,
        })
    }
}

/// Every group field except the slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdateForm {
    pub name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub people: Vec<i32>,
    #[serde(default)]
    pub companies: Vec<i32>,
}

impl GroupUpdateForm {
    pub const FIELDS: &'static [&'static str] = &["name", "about", "people", "companies"];

    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
        group: &Group,
        now: NaiveDateTime,
    ) -> Result<CleanedGroup, ContactsError> {
        let mut errors = Validator::new()
            .required(&self.name, "name", GROUP_NAME_MAX_LENGTH)
            .result();
        check_members(conn, &self.people, &self.companies, &mut errors)?;

        if !errors.is_valid() {
            return Err(errors.into());
        }

        Ok(CleanedGroup {
            changes: GroupChanges {
                name: self.name.trim().to_string(),
                slug: group.slug.clone(),
                about: self.about.trim().to_string(),
                date_modified: now,
            },
            people: self.people.clone(),
            companies: self.companies.clone(),
        })
    }
}

/// Administrative form: every field, membership sets rendered as dual-list
/// pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAdminForm {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub people: Vec<i32>,
    #[serde(default)]
    pub companies: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: i32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DualListPicker {
    pub field: &'static str,
    pub verbose_name: &'static str,
    pub is_stacked: bool,
    pub available: Vec<Choice>,
    pub chosen: Vec<Choice>,
}

impl DualListPicker {
    fn split<T>(
        field: &'static str,
        verbose_name: &'static str,
        rows: Vec<T>,
        chosen_ids: &[i32],
        id: impl Fn(&T) -> i32,
    ) -> Self
    where
        T: std::fmt::Display,
    {
        let (chosen, available): (Vec<T>, Vec<T>) =
            rows.into_iter().partition(|row| chosen_ids.contains(&id(row)));
        let to_choice = |row: T| Choice {
            id: id(&row),
            label: row.to_string(),
        };
        Self {
            field,
            verbose_name,
            is_stacked: false,
            available: available.into_iter().map(to_choice).collect(),
            chosen: chosen.into_iter().map(to_choice).collect(),
        }
    }
}

impl GroupAdminForm {
    pub const FIELDS: &'static [&'static str] = &["name", "slug", "about", "people", "companies"];

    pub fn from_group(group: &Group, people: Vec<i32>, companies: Vec<i32>) -> Self {
        Self {
            name: group.name.clone(),
            slug: group.slug.clone(),
            about: group.about.clone(),
            people,
            companies,
        }
    }

    /// `existing` is the group being edited, `None` when adding one.
    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
        existing: Option<&Group>,
        now: NaiveDateTime,
    ) -> Result<CleanedGroup, ContactsError> {
        let slug = self.slug.trim();
        let mut errors = Validator::new()
            .required(&self.name, "name", GROUP_NAME_MAX_LENGTH)
            .slug(slug, "slug", SLUG_MAX_LENGTH)
            .result();
        if !errors.has_error_for("slug") && Group::slug_taken(conn, slug, existing.map(|g| g.id))? {
            errors.add_error(duplicate("slug", slug));
        }
        check_members(conn, &self.people, &self.companies, &mut errors)?;

        if !errors.is_valid() {
            return Err(errors.into());
        }

        Ok(CleanedGroup {
            changes: GroupChanges {
                name: self.name.trim().to_string(),
                slug: slug.to_string(),
                about: self.about.trim().to_string(),
                date_modified: now,
            },
            people: self.people.clone(),
            companies: self.companies.clone(),
        })
    }

    /// "People" and "Companies" pickers, each split into available and chosen.
    pub fn pickers(&self, conn: &mut SqliteConnection) -> Result<Vec<DualListPicker>, ContactsError> {
        let people = Person::all(conn)?;
        let companies = Company::all(conn)?;
        Ok(vec![
            DualListPicker::split("people", "People", people, &self.people, |p: &Person| p.id),
            DualListPicker::split(
                "companies",
                "Companies",
                companies,
                &self.companies,
                |c: &Company| c.id,
            ),
        ])
    }
}
