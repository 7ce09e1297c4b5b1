use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::contacts::urls::HasPermalink;
use crate::core::shared::schema::contacts_people;

pub const PERSON_PHOTO_DIR: &str = "contacts/person/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_people)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Person {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub suffix: Option<String>,
    pub nickname: String,
    pub slug: String,
    pub title: String,
    pub company_id: Option<i32>,
    pub about: String,
    pub photo: String,
    pub user_id: Option<i32>,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = contacts_people)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub suffix: Option<String>,
    pub nickname: String,
    pub slug: String,
    pub title: String,
    pub company_id: Option<i32>,
    pub about: String,
    pub photo: String,
    pub user_id: Option<i32>,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

/// Columns touched by the person update form. Nickname, about, photo and the
/// user link are left alone.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = contacts_people, treat_none_as_null = true)]
pub struct PersonChanges {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub company_id: Option<i32>,
    pub date_modified: NaiveDateTime,
}

impl Person {
    /// First and last name joined by a single space.
    pub fn fullname(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Person>> {
        contacts_people::table
            .find(id)
            .select(Person::as_select())
            .first(conn)
            .optional()
    }

    pub fn by_slug(conn: &mut SqliteConnection, slug: &str) -> QueryResult<Option<Person>> {
        contacts_people::table
            .filter(contacts_people::slug.eq(slug))
            .select(Person::as_select())
            .first(conn)
            .optional()
    }

    pub fn by_user(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<Option<Person>> {
        contacts_people::table
            .filter(contacts_people::user_id.eq(user_id))
            .select(Person::as_select())
            .first(conn)
            .optional()
    }

    pub fn exists(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(contacts_people::table.find(id))).get_result(conn)
    }

    pub fn slug_taken(
        conn: &mut SqliteConnection,
        slug: &str,
        exclude: Option<i32>,
    ) -> QueryResult<bool> {
        let mut query = contacts_people::table
            .filter(contacts_people::slug.eq(slug))
            .into_boxed();
        if let Some(id) = exclude {
            query = query.filter(contacts_people::id.ne(id));
        }
        let count: i64 = query.count().get_result(conn)?;
        Ok(count > 0)
    }

    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Person>> {
        contacts_people::table
            .order((
                contacts_people::last_name.asc(),
                contacts_people::first_name.asc(),
                contacts_people::id.asc(),
            ))
            .select(Person::as_select())
            .load(conn)
    }

    pub fn for_company(conn: &mut SqliteConnection, company_id: i32) -> QueryResult<Vec<Person>> {
        contacts_people::table
            .filter(contacts_people::company_id.eq(company_id))
            .order((contacts_people::last_name.asc(), contacts_people::first_name.asc()))
            .select(Person::as_select())
            .load(conn)
    }

    pub fn ids_for_company(conn: &mut SqliteConnection, company_id: i32) -> QueryResult<Vec<i32>> {
        contacts_people::table
            .filter(contacts_people::company_id.eq(company_id))
            .select(contacts_people::id)
            .load(conn)
    }

    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        contacts_people::table.count().get_result(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new: &NewPerson) -> QueryResult<Person> {
        diesel::insert_into(contacts_people::table)
            .values(new)
            .returning(Person::as_returning())
            .get_result(conn)
    }

    pub fn update(
        conn: &mut SqliteConnection,
        id: i32,
        changes: &PersonChanges,
    ) -> QueryResult<Person> {
        diesel::update(contacts_people::table.find(id))
            .set(changes)
            .returning(Person::as_returning())
            .get_result(conn)
    }

    pub fn set_user(
        conn: &mut SqliteConnection,
        id: i32,
        user_id: Option<i32>,
        now: NaiveDateTime,
    ) -> QueryResult<Person> {
        diesel::update(contacts_people::table.find(id))
            .set((
                contacts_people::user_id.eq(user_id),
                contacts_people::date_modified.eq(now),
            ))
            .returning(Person::as_returning())
            .get_result(conn)
    }

    pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
        diesel::delete(contacts_people::table.find(id)).execute(conn)
    }
}

impl Entity for Person {
    const TABLE: &'static str = "contacts_people";
    const VERBOSE_NAME: &'static str = "person";
    const VERBOSE_NAME_PLURAL: &'static str = "people";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("first_name", "first name"),
        ("last_name", "last name"),
        ("middle_name", "middle name"),
        ("suffix", "suffix"),
        ("nickname", "nickname"),
        ("slug", "slug"),
        ("title", "title"),
        ("company", "company"),
        ("about", "about"),
        ("photo", "photo"),
        ("user", "user"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl HasPermalink for Person {
    const URL_ENTITY: &'static str = "person";

    fn pk(&self) -> i32 {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.fullname())
    }
}
