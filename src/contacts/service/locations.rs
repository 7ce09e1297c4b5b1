use log::info;

use super::ContactsService;
use crate::contacts::error::{map_unique_violation, ContactsError};
use crate::contacts::forms::{CleanedLocation, LocationForm};
use crate::contacts::models::{DetailKind, Location};
use crate::core::shared::utils::now;

/// `(name, slug, is_phone, is_street_address, weight)` of the stock locations.
pub const DEFAULT_LOCATIONS: &[(&str, &str, bool, bool, i32)] = &[
    ("Work", "work", false, false, 0),
    ("Home", "home", false, false, 1),
    ("Mobile", "mobile", true, false, 2),
    ("Fax", "fax", true, false, 3),
    ("Mailing", "mailing", false, true, 4),
    ("Other", "other", false, false, 5),
];

impl ContactsService {
    pub fn create_location(&self, form: &LocationForm) -> Result<Location, ContactsError> {
        self.write("create location", |conn| {
            let cleaned = form.clean(conn, None)?;
            let new = cleaned.into_new(now());
            let location = Location::insert(conn, &new)
                .map_err(|e| map_unique_violation(e, "slug", &new.slug))?;
            info!("Created location {} ({})", location.id, location.slug);
            Ok(location)
        })
    }

    pub fn update_location(&self, id: i32, form: &LocationForm) -> Result<Location, ContactsError> {
        self.write("update location", |conn| {
            let existing = Location::find(conn, id)?
                .ok_or_else(|| ContactsError::not_found("location", id))?;
            let changes = form.clean(conn, Some(&existing))?.into_changes(now());
            let location = Location::update(conn, id, &changes)
                .map_err(|e| map_unique_violation(e, "slug", &changes.slug))?;
            info!("Updated location {}", location.id);
            Ok(location)
        })
    }

    pub fn get_location(&self, id: i32) -> Result<Location, ContactsError> {
        self.read(|conn| {
            Location::find(conn, id)?.ok_or_else(|| ContactsError::not_found("location", id))
        })
    }

    /// All locations ordered by weight.
    pub fn list_locations(&self) -> Result<Vec<Location>, ContactsError> {
        self.read(|conn| Ok(Location::all(conn)?))
    }

    /// Locations a detail kind may reference, ordered by weight.
    pub fn location_choices(&self, kind: DetailKind) -> Result<Vec<Location>, ContactsError> {
        let locations = self.list_locations()?;
        Ok(match kind.location_rule() {
            Some(rule) => locations.into_iter().filter(|l| rule.allows(l)).collect(),
            None => Vec::new(),
        })
    }

    /// Delete a location together with every detail record that uses it.
    pub fn delete_location(&self, id: i32) -> Result<(), ContactsError> {
        self.write("delete location", |conn| {
            if Location::delete(conn, id)? == 0 {
                return Err(ContactsError::not_found("location", id));
            }
            info!("Deleted location {id}");
            Ok(())
        })
    }

    /// Insert the stock locations whose slug is not taken yet. Returns how
    /// many were added.
    pub fn seed_default_locations(&self) -> Result<usize, ContactsError> {
        self.write("seed locations", |conn| {
            let mut added = 0;
            for &(name, slug, is_phone, is_street_address, weight) in DEFAULT_LOCATIONS {
                if Location::by_slug(conn, slug)?.is_some() {
                    continue;
                }
                let cleaned = CleanedLocation {
                    name: name.to_string(),
                    slug: slug.to_string(),
                    is_phone,
                    is_street_address,
                    weight,
                };
                Location::insert(conn, &cleaned.into_new(now()))?;
                added += 1;
            }
            if added > 0 {
                info!("Seeded {added} default locations");
            }
            Ok(added)
        })
    }
}
