use chrono::NaiveDateTime;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use super::{derive_slug, duplicate, SLUG_MAX_LENGTH};
use crate::contacts::error::ContactsError;
use crate::contacts::models::{Location, LocationChanges, NewLocation, MAX_WEIGHT, MIN_WEIGHT};
use crate::core::validation::Validator;

pub const LOCATION_NAME_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationForm {
    pub name: String,
    /// Derived from the name when left blank.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub is_phone: bool,
    #[serde(default)]
    pub is_street_address: bool,
    #[serde(default)]
    pub weight: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedLocation {
    pub name: String,
    pub slug: String,
    pub is_phone: bool,
    pub is_street_address: bool,
    pub weight: i32,
}

impl CleanedLocation {
    pub fn into_new(self, now: NaiveDateTime) -> NewLocation {
        NewLocation {
            name: self.name,
            slug: self.slug,
            is_phone: self.is_phone,
            is_street_address: self.is_street_address,
            weight: self.weight,
            date_added: now,
            date_modified: now,
        }
    }

    pub fn into_changes(self, now: NaiveDateTime) -> LocationChanges {
        LocationChanges {
            name: self.name,
            slug: self.slug,
            is_phone: self.is_phone,
            is_street_address: self.is_street_address,
            weight: self.weight,
            date_modified: now,
        }
    }
}

impl LocationForm {
    pub const FIELDS: &'static [&'static str] =
        &["name", "slug", "is_phone", "is_street_address", "weight"];

    pub fn from_location(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            slug: location.slug.clone(),
            is_phone: location.is_phone,
            is_street_address: location.is_street_address,
            weight: location.weight,
        }
    }

    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
        existing: Option<&Location>,
    ) -> Result<CleanedLocation, ContactsError> {
        let mut validator = Validator::new()
            .required(&self.name, "name", LOCATION_NAME_MAX_LENGTH)
            .range(self.weight, "weight", MIN_WEIGHT, MAX_WEIGHT);

        let slug = match self.slug.trim() {
            "" if self.name.trim().is_empty() => String::new(),
            "" => match derive_slug(&self.name, "name") {
                Ok(slug) => slug,
                Err(e) => {
                    validator = validator.custom(|| Some(e));
                    String::new()
                }
            },
            given => {
                validator = validator.slug(given, "slug", SLUG_MAX_LENGTH);
                given.to_string()
            }
        };

        let mut errors = validator.result();
        if !slug.is_empty()
            && !errors.has_error_for("slug")
            && Location::slug_taken(conn, &slug, existing.map(|l| l.id))?
        {
            errors.add_error(duplicate("slug", &slug));
        }

        if !errors.is_valid() {
            return Err(errors.into());
        }

        Ok(CleanedLocation {
            name: self.name.trim().to_string(),
            slug,
            is_phone: self.is_phone,
            is_street_address: self.is_street_address,
            weight: self.weight,
        })
    }
}
