//! Generic owner relation.
//!
//! Detail records and notes point at their owner through an
//! `(owner_kind, owner_id)` pair instead of a foreign key, because the owner
//! may live in either the companies or the people table. The pair is indexed
//! in every detail table and resolved on read through [`OwnerKind`].

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::models::{Company, Person};
use super::urls::{HasPermalink, Permalink, UrlAction};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Company,
    Person,
}

impl OwnerKind {
    pub const ALL: [OwnerKind; 2] = [OwnerKind::Company, OwnerKind::Person];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Person => "person",
        }
    }
}

impl std::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown owner kind: {0}")]
pub struct UnknownOwnerKind(pub String);

impl FromStr for OwnerKind {
    type Err = UnknownOwnerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "company" => Ok(Self::Company),
            "person" => Ok(Self::Person),
            other => Err(UnknownOwnerKind(other.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for OwnerKind {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for OwnerKind {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(value.parse()?)
    }
}

/// A `(kind, id)` reference to a Company or Person row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerRef {
    pub kind: OwnerKind,
    pub id: i32,
}

impl OwnerRef {
    pub fn new(kind: OwnerKind, id: i32) -> Self {
        Self { kind, id }
    }

    pub fn company(id: i32) -> Self {
        Self::new(OwnerKind::Company, id)
    }

    pub fn person(id: i32) -> Self {
        Self::new(OwnerKind::Person, id)
    }
}

impl std::fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A resolved owner row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Owner {
    Company(Company),
    Person(Person),
}

impl Owner {
    /// Kind-to-table lookup: returns `None` when the referenced row is gone.
    pub fn resolve(conn: &mut SqliteConnection, owner: OwnerRef) -> QueryResult<Option<Self>> {
        match owner.kind {
            OwnerKind::Company => Ok(Company::find(conn, owner.id)?.map(Owner::Company)),
            OwnerKind::Person => Ok(Person::find(conn, owner.id)?.map(Owner::Person)),
        }
    }

    pub fn exists(conn: &mut SqliteConnection, owner: OwnerRef) -> QueryResult<bool> {
        match owner.kind {
            OwnerKind::Company => Company::exists(conn, owner.id),
            OwnerKind::Person => Person::exists(conn, owner.id),
        }
    }

    pub fn owner_ref(&self) -> OwnerRef {
        match self {
            Self::Company(company) => OwnerRef::company(company.id),
            Self::Person(person) => OwnerRef::person(person.id),
        }
    }

    pub fn permalink(&self, action: UrlAction) -> Permalink {
        match self {
            Self::Company(company) => company.permalink(action),
            Self::Person(person) => person.permalink(action),
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Company(company) => std::fmt::Display::fmt(company, f),
            Self::Person(person) => std::fmt::Display::fmt(person, f),
        }
    }
}
