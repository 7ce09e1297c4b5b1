use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::core::shared::schema::contacts_locations;

pub const MIN_WEIGHT: i32 = 0;
pub const MAX_WEIGHT: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_locations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub is_phone: bool,
    pub is_street_address: bool,
    pub weight: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = contacts_locations)]
pub struct NewLocation {
    pub name: String,
    pub slug: String,
    pub is_phone: bool,
    pub is_street_address: bool,
    pub weight: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = contacts_locations)]
pub struct LocationChanges {
    pub name: String,
    pub slug: String,
    pub is_phone: bool,
    pub is_street_address: bool,
    pub weight: i32,
    pub date_modified: NaiveDateTime,
}

impl Location {
    pub fn help_text(field: &str) -> Option<&'static str> {
        match field {
            "is_phone" => Some("Only used for Phone"),
            "is_street_address" => Some("Only used for Street Address"),
            _ => None,
        }
    }

    pub fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Location>> {
        contacts_locations::table
            .find(id)
            .select(Location::as_select())
            .first(conn)
            .optional()
    }

    pub fn by_slug(conn: &mut SqliteConnection, slug: &str) -> QueryResult<Option<Location>> {
        contacts_locations::table
            .filter(contacts_locations::slug.eq(slug))
            .select(Location::as_select())
            .first(conn)
            .optional()
    }

    pub fn slug_taken(
        conn: &mut SqliteConnection,
        slug: &str,
        exclude: Option<i32>,
    ) -> QueryResult<bool> {
        let mut query = contacts_locations::table
            .filter(contacts_locations::slug.eq(slug))
            .into_boxed();
        if let Some(id) = exclude {
            query = query.filter(contacts_locations::id.ne(id));
        }
        let count: i64 = query.count().get_result(conn)?;
        Ok(count > 0)
    }

    /// Every location, lightest first.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Location>> {
        contacts_locations::table
            .order((contacts_locations::weight.asc(), contacts_locations::id.asc()))
            .select(Location::as_select())
            .load(conn)
    }

    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        contacts_locations::table.count().get_result(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new: &NewLocation) -> QueryResult<Location> {
        diesel::insert_into(contacts_locations::table)
            .values(new)
            .returning(Location::as_returning())
            .get_result(conn)
    }

    pub fn update(
        conn: &mut SqliteConnection,
        id: i32,
        changes: &LocationChanges,
    ) -> QueryResult<Location> {
        diesel::update(contacts_locations::table.find(id))
            .set(changes)
            .returning(Location::as_returning())
            .get_result(conn)
    }

    pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
        diesel::delete(contacts_locations::table.find(id)).execute(conn)
    }
}

impl Entity for Location {
    const TABLE: &'static str = "contacts_locations";
    const VERBOSE_NAME: &'static str = "location";
    const VERBOSE_NAME_PLURAL: &'static str = "locations";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("slug", "slug"),
        ("is_phone", "is phone"),
        ("is_street_address", "is street address"),
        ("weight", "weight"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
