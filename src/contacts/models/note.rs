use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::Entity;
use crate::contacts::owner::{OwnerKind, OwnerRef};
use crate::core::shared::schema::contacts_notes;

pub const NOTE_MAX_LENGTH: usize = 3000;

/// Free-text annotation attached to a company or person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_notes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Note {
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub comment: String,
    pub submitted_by: Option<i32>,
    pub submit_date: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts_notes)]
pub struct NewNote {
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub comment: String,
    pub submitted_by: Option<i32>,
    pub submit_date: NaiveDateTime,
}

impl Note {
    pub fn owner(&self) -> OwnerRef {
        OwnerRef::new(self.owner_kind, self.owner_id)
    }

    /// Oldest first.
    pub fn list_for(conn: &mut SqliteConnection, owner: OwnerRef) -> QueryResult<Vec<Note>> {
        contacts_notes::table
            .filter(contacts_notes::owner_kind.eq(owner.kind))
            .filter(contacts_notes::owner_id.eq(owner.id))
            .order((contacts_notes::submit_date.asc(), contacts_notes::id.asc()))
            .select(Note::as_select())
            .load(conn)
    }

    pub fn insert(conn: &mut SqliteConnection, new: &NewNote) -> QueryResult<Note> {
        diesel::insert_into(contacts_notes::table)
            .values(new)
            .returning(Note::as_returning())
            .get_result(conn)
    }

    pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
        diesel::delete(contacts_notes::table.find(id)).execute(conn)
    }

    pub fn delete_for_owner(conn: &mut SqliteConnection, owner: OwnerRef) -> QueryResult<usize> {
        diesel::delete(
            contacts_notes::table
                .filter(contacts_notes::owner_kind.eq(owner.kind))
                .filter(contacts_notes::owner_id.eq(owner.id)),
        )
        .execute(conn)
    }

    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        contacts_notes::table.count().get_result(conn)
    }
}

impl Entity for Note {
    const TABLE: &'static str = "contacts_notes";
    const VERBOSE_NAME: &'static str = "note";
    const VERBOSE_NAME_PLURAL: &'static str = "notes";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("comment", "comment"),
        ("submitted_by", "submitted by"),
        ("submit_date", "date/time submitted"),
    ];
}
