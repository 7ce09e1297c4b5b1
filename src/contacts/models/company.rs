use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::contacts::urls::HasPermalink;
use crate::core::shared::schema::contacts_companies;

pub const COMPANY_LOGO_DIR: &str = "contacts/companies/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_companies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub nickname: Option<String>,
    pub slug: String,
    pub about: Option<String>,
    pub logo: String,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = contacts_companies)]
pub struct NewCompany {
    pub name: String,
    pub nickname: Option<String>,
    pub slug: String,
    pub about: Option<String>,
    pub logo: String,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = contacts_companies, treat_none_as_null = true)]
pub struct CompanyChanges {
    pub name: String,
    pub nickname: Option<String>,
    pub slug: String,
    pub about: Option<String>,
    pub logo: String,
    pub date_modified: NaiveDateTime,
}

impl Company {
    pub fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Company>> {
        contacts_companies::table
            .find(id)
            .select(Company::as_select())
            .first(conn)
            .optional()
    }

    pub fn by_slug(conn: &mut SqliteConnection, slug: &str) -> QueryResult<Option<Company>> {
        contacts_companies::table
            .filter(contacts_companies::slug.eq(slug))
            .select(Company::as_select())
            .first(conn)
            .optional()
    }

    pub fn exists(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
        diesel::select(diesel::dsl::exists(contacts_companies::table.find(id))).get_result(conn)
    }

    pub fn slug_taken(
        conn: &mut SqliteConnection,
        slug: &str,
        exclude: Option<i32>,
    ) -> QueryResult<bool> {
        let mut query = contacts_companies::table
            .filter(contacts_companies::slug.eq(slug))
            .into_boxed();
        if let Some(id) = exclude {
            query = query.filter(contacts_companies::id.ne(id));
        }
        let count: i64 = query.count().get_result(conn)?;
        Ok(count > 0)
    }

    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Company>> {
        contacts_companies::table
            .order((contacts_companies::name.asc(), contacts_companies::id.asc()))
            .select(Company::as_select())
            .load(conn)
    }

    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        contacts_companies::table.count().get_result(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new: &NewCompany) -> QueryResult<Company> {
        diesel::insert_into(contacts_companies::table)
            .values(new)
            .returning(Company::as_returning())
            .get_result(conn)
    }

    pub fn update(
        conn: &mut SqliteConnection,
        id: i32,
        changes: &CompanyChanges,
    ) -> QueryResult<Company> {
        diesel::update(contacts_companies::table.find(id))
            .set(changes)
            .returning(Company::as_returning())
            .get_result(conn)
    }

    pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
        diesel::delete(contacts_companies::table.find(id)).execute(conn)
    }
}

impl Entity for Company {
    const TABLE: &'static str = "contacts_companies";
    const VERBOSE_NAME: &'static str = "company";
    const VERBOSE_NAME_PLURAL: &'static str = "companies";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("nickname", "nickname"),
        ("slug", "slug"),
        ("about", "about"),
        ("logo", "photo"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl HasPermalink for Company {
    const URL_ENTITY: &'static str = "company";

    fn pk(&self) -> i32 {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }
}

impl std::fmt::Display for Company {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
