use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Company, Entity, Person};
use crate::contacts::urls::HasPermalink;
use crate::core::shared::schema::{
    contacts_companies, contacts_groups, contacts_groups_companies, contacts_groups_people,
    contacts_people,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub about: String,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = contacts_groups)]
pub struct NewGroup {
    pub name: String,
    pub slug: String,
    pub about: String,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = contacts_groups)]
pub struct GroupChanges {
    pub name: String,
    pub slug: String,
    pub about: String,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Insertable)]
#[diesel(table_name = contacts_groups_people)]
struct GroupPersonRow {
    group_id: i32,
    person_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Insertable)]
#[diesel(table_name = contacts_groups_companies)]
struct GroupCompanyRow {
    group_id: i32,
    company_id: i32,
}

impl Group {
    pub fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Group>> {
        contacts_groups::table
            .find(id)
            .select(Group::as_select())
            .first(conn)
            .optional()
    }

    pub fn by_slug(conn: &mut SqliteConnection, slug: &str) -> QueryResult<Option<Group>> {
        contacts_groups::table
            .filter(contacts_groups::slug.eq(slug))
            .select(Group::as_select())
            .first(conn)
            .optional()
    }

    pub fn slug_taken(
        conn: &mut SqliteConnection,
        slug: &str,
        exclude: Option<i32>,
    ) -> QueryResult<bool> {
        let mut query = contacts_groups::table
            .filter(contacts_groups::slug.eq(slug))
            .into_boxed();
        if let Some(id) = exclude {
            query = query.filter(contacts_groups::id.ne(id));
        }
        let count: i64 = query.count().get_result(conn)?;
        Ok(count > 0)
    }

    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Group>> {
        contacts_groups::table
            .order((contacts_groups::name.asc(), contacts_groups::id.asc()))
            .select(Group::as_select())
            .load(conn)
    }

    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        contacts_groups::table.count().get_result(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new: &NewGroup) -> QueryResult<Group> {
        diesel::insert_into(contacts_groups::table)
            .values(new)
            .returning(Group::as_returning())
            .get_result(conn)
    }

    pub fn update(conn: &mut SqliteConnection, id: i32, changes: &GroupChanges) -> QueryResult<Group> {
        diesel::update(contacts_groups::table.find(id))
            .set(changes)
            .returning(Group::as_returning())
            .get_result(conn)
    }

    pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
        diesel::delete(contacts_groups::table.find(id)).execute(conn)
    }

    pub fn person_ids(conn: &mut SqliteConnection, id: i32) -> QueryResult<Vec<i32>> {
        contacts_groups_people::table
            .filter(contacts_groups_people::group_id.eq(id))
            .select(contacts_groups_people::person_id)
            .order(contacts_groups_people::person_id.asc())
            .load(conn)
    }

    pub fn company_ids(conn: &mut SqliteConnection, id: i32) -> QueryResult<Vec<i32>> {
        contacts_groups_companies::table
            .filter(contacts_groups_companies::group_id.eq(id))
            .select(contacts_groups_companies::company_id)
            .order(contacts_groups_companies::company_id.asc())
            .load(conn)
    }

    /// Members are loaded in two steps: ids from the join table, then rows.
    pub fn people(conn: &mut SqliteConnection, id: i32) -> QueryResult<Vec<Person>> {
        let ids = Self::person_ids(conn, id)?;
        contacts_people::table
            .filter(contacts_people::id.eq_any(ids))
            .order((contacts_people::last_name.asc(), contacts_people::first_name.asc()))
            .select(Person::as_select())
            .load(conn)
    }

    pub fn companies(conn: &mut SqliteConnection, id: i32) -> QueryResult<Vec<Company>> {
        let ids = Self::company_ids(conn, id)?;
        contacts_companies::table
            .filter(contacts_companies::id.eq_any(ids))
            .order(contacts_companies::name.asc())
            .select(Company::as_select())
            .load(conn)
    }

    pub fn for_person(conn: &mut SqliteConnection, person_id: i32) -> QueryResult<Vec<Group>> {
        let ids: Vec<i32> = contacts_groups_people::table
            .filter(contacts_groups_people::person_id.eq(person_id))
            .select(contacts_groups_people::group_id)
            .load(conn)?;
        Self::with_ids(conn, ids)
    }

    pub fn for_company(conn: &mut SqliteConnection, company_id: i32) -> QueryResult<Vec<Group>> {
        let ids: Vec<i32> = contacts_groups_companies::table
            .filter(contacts_groups_companies::company_id.eq(company_id))
            .select(contacts_groups_companies::group_id)
            .load(conn)?;
        Self::with_ids(conn, ids)
    }

    fn with_ids(conn: &mut SqliteConnection, ids: Vec<i32>) -> QueryResult<Vec<Group>> {
        contacts_groups::table
            .filter(contacts_groups::id.eq_any(ids))
            .order(contacts_groups::name.asc())
            .select(Group::as_select())
            .load(conn)
    }

    /// Replace the people set of a group with exactly `person_ids`.
    pub fn set_people(conn: &mut SqliteConnection, id: i32, person_ids: &[i32]) -> QueryResult<()> {
        diesel::delete(contacts_groups_people::table.filter(contacts_groups_people::group_id.eq(id)))
            .execute(conn)?;
        let rows: Vec<GroupPersonRow> = dedup(person_ids)
            .into_iter()
            .map(|person_id| GroupPersonRow {
                group_id: id,
                person_id,
            })
            .collect();
        if !rows.is_empty() {
            diesel::insert_into(contacts_groups_people::table)
                .values(&rows)
                .execute(conn)?;
        }
        Ok(())
    }

    /// Replace the companies set of a group with exactly `company_ids`.
    pub fn set_companies(
        conn: &mut SqliteConnection,
        id: i32,
        company_ids: &[i32],
    ) -> QueryResult<()> {
        diesel::delete(
            contacts_groups_companies::table.filter(contacts_groups_companies::group_id.eq(id)),
        )
        .execute(conn)?;
        let rows: Vec<GroupCompanyRow> = dedup(company_ids)
            .into_iter()
            .map(|company_id| GroupCompanyRow {
                group_id: id,
                company_id,
            })
            .collect();
        if !rows.is_empty() {
            diesel::insert_into(contacts_groups_companies::table)
                .values(&rows)
                .execute(conn)?;
        }
        Ok(())
    }
}

fn dedup(ids: &[i32]) -> Vec<i32> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl Entity for Group {
    const TABLE: &'static str = "contacts_groups";
    const VERBOSE_NAME: &'static str = "group";
    const VERBOSE_NAME_PLURAL: &'static str = "groups";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("slug", "slug"),
        ("about", "about"),
        ("people", "people"),
        ("companies", "companies"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl HasPermalink for Group {
    const URL_ENTITY: &'static str = "group";

    fn pk(&self) -> i32 {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_sorts_and_drops_repeats() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(dedup(&[]).is_empty());
    }
}
