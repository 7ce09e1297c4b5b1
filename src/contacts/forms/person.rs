use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use super::{derive_slug, duplicate};
use crate::contacts::error::ContactsError;
use crate::contacts::models::{Company, NewPerson, Person, PersonChanges};
use crate::core::validation::{ValidationError, ValidationResult, Validator};

pub const FIRST_NAME_MAX_LENGTH: usize = 100;
pub const LAST_NAME_MAX_LENGTH: usize = 200;
pub const TITLE_MAX_LENGTH: usize = 200;

fn check_names(first_name: &str, last_name: &str, title: &str) -> ValidationResult {
    Validator::new()
        .required(first_name, "first_name", FIRST_NAME_MAX_LENGTH)
        .required(last_name, "last_name", LAST_NAME_MAX_LENGTH)
        .optional(Some(title), "title", TITLE_MAX_LENGTH)
        .result()
}

fn check_company(
    conn: &mut SqliteConnection,
    company: Option<i32>,
    errors: &mut ValidationResult,
) -> Result<(), ContactsError> {
    if let Some(id) = company {
        if !Company::exists(conn, id)? {
            errors.add_error(ValidationError::UnknownReference {
                field: "company".to_string(),
                id,
            });
        }
    }
    Ok(())
}

/// First and last name, title, employer and about. The slug comes from the
/// full name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCreateForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: Option<i32>,
    #[serde(default)]
    pub about: String,
}

impl PersonCreateForm {
    pub const FIELDS: &'static [&'static str] =
        &["first_name", "last_name", "title", "company", "about"];

    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
        now: NaiveDateTime,
    ) -> Result<NewPerson, ContactsError> {
        let mut errors = check_names(&self.first_name, &self.last_name, &self.title);
        check_company(conn, self.company, &mut errors)?;

        let mut slug = String::new();
        if errors.is_valid() {
            let fullname = format!("{} {}", self.first_name.trim(), self.last_name.trim());
            match derive_slug(&fullname, "last_name") {
                Ok(derived) => {
                    if Person::slug_taken(conn, &derived, None)? {
                        errors.add_error(duplicate("last_name", &derived));
                    }
                    slug = derived;
                }
                Err(e) => errors.add_error(e),
            }
        }

        if !errors.is_valid() {
            return Err(errors.into());
        }

        Ok(NewPerson {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            middle_name: None,
            suffix: None,
            nickname: String::new(),
            slug,
            title: self.title.trim().to_string(),
            company_id: self.company,
            about: self.about.trim().to_string(),
            photo: String::new(),
            user_id: None,
            date_added: now,
            date_modified: now,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpdateForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: Option<i32>,
}

impl PersonUpdateForm {
    pub const FIELDS: &'static [&'static str] = &["first_name", "last_name", "title", "company"];

    pub fn from_person(person: &Person) -> Self {
        Self {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            title: person.title.clone(),
            company: person.company_id,
        }
    }

    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
        now: NaiveDateTime,
    ) -> Result<PersonChanges, ContactsError> {
        let mut errors = check_names(&self.first_name, &self.last_name, &self.title);
        check_company(conn, self.company, &mut errors)?;

        if !errors.is_valid() {
            return Err(errors.into());
        }

        Ok(PersonChanges {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            title: self.title.trim().to_string(),
            company_id: self.company,
            date_modified: now,
        })
    }
}
