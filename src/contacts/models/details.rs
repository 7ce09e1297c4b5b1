//! Contact detail records.
//!
//! Phone numbers, email addresses, instant messengers, web sites, street
//! addresses and special dates all hang off a Company or Person through the
//! generic `(owner_kind, owner_id)` pair. All but special dates also carry a
//! [`Location`], restricted by the location's capability flags.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Entity, Location};
use crate::contacts::owner::{OwnerKind, OwnerRef};
use crate::core::shared::schema::{
    contacts_email_addresses, contacts_instant_messengers, contacts_phone_numbers,
    contacts_special_dates, contacts_street_addresses, contacts_web_sites,
};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "kebab-case")]
pub enum ImService {
    Aim,
    Msn,
    Icq,
    Jabber,
    Yahoo,
    Skype,
    Qq,
    Sametime,
    GaduGadu,
    GoogleTalk,
    #[default]
    Other,
}

impl ImService {
    pub const ALL: [ImService; 11] = [
        Self::Aim,
        Self::Msn,
        Self::Icq,
        Self::Jabber,
        Self::Yahoo,
        Self::Skype,
        Self::Qq,
        Self::Sametime,
        Self::GaduGadu,
        Self::GoogleTalk,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aim => "aim",
            Self::Msn => "msn",
            Self::Icq => "icq",
            Self::Jabber => "jabber",
            Self::Yahoo => "yahoo",
            Self::Skype => "skype",
            Self::Qq => "qq",
            Self::Sametime => "sametime",
            Self::GaduGadu => "gadu-gadu",
            Self::GoogleTalk => "google-talk",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Aim => "AIM",
            Self::Msn => "MSN",
            Self::Icq => "ICQ",
            Self::Jabber => "Jabber",
            Self::Yahoo => "Yahoo",
            Self::Skype => "Skype",
            Self::Qq => "QQ",
            Self::Sametime => "Sametime",
            Self::GaduGadu => "Gadu-Gadu",
            Self::GoogleTalk => "Google Talk",
            Self::Other => "Other",
        }
    }

    /// `(value, label)` pairs in declaration order.
    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::ALL.iter().map(|s| (s.as_str(), s.label())).collect()
    }
}

impl std::fmt::Display for ImService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown instant messenger service: {0}")]
pub struct UnknownImService(pub String);

impl FromStr for ImService {
    type Err = UnknownImService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| UnknownImService(s.to_string()))
    }
}

impl ToSql<Text, Sqlite> for ImService {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for ImService {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(value.parse()?)
    }
}

/// Which location flags a detail kind refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRule {
    pub forbid_phone: bool,
    pub forbid_street_address: bool,
}

impl LocationRule {
    pub fn allows(&self, location: &Location) -> bool {
        !(self.forbid_phone && location.is_phone)
            && !(self.forbid_street_address && location.is_street_address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    PhoneNumber,
    EmailAddress,
    InstantMessenger,
    WebSite,
    StreetAddress,
    SpecialDate,
}

impl DetailKind {
    pub const ALL: [DetailKind; 6] = [
        Self::PhoneNumber,
        Self::EmailAddress,
        Self::InstantMessenger,
        Self::WebSite,
        Self::StreetAddress,
        Self::SpecialDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PhoneNumber => "phone_number",
            Self::EmailAddress => "email_address",
            Self::InstantMessenger => "instant_messenger",
            Self::WebSite => "web_site",
            Self::StreetAddress => "street_address",
            Self::SpecialDate => "special_date",
        }
    }

    pub fn verbose_name(self) -> &'static str {
        match self {
            Self::PhoneNumber => "phone number",
            Self::EmailAddress => "email address",
            Self::InstantMessenger => "instant messenger",
            Self::WebSite => "web site",
            Self::StreetAddress => "street address",
            Self::SpecialDate => "special date",
        }
    }

    /// `None` for kinds that carry no location.
    pub fn location_rule(self) -> Option<LocationRule> {
        match self {
            Self::PhoneNumber => Some(LocationRule {
                forbid_phone: false,
                forbid_street_address: true,
            }),
            Self::EmailAddress | Self::InstantMessenger | Self::WebSite => Some(LocationRule {
                forbid_phone: true,
                forbid_street_address: true,
            }),
            Self::StreetAddress => Some(LocationRule {
                forbid_phone: true,
                forbid_street_address: false,
            }),
            Self::SpecialDate => None,
        }
    }
}

impl std::fmt::Display for DetailKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verbose_name())
    }
}

/// Editable values of a detail record, as produced by a cleaned form row.
pub trait DetailValues: Clone + std::fmt::Debug {
    type New;
    type Changes;

    fn location_id(&self) -> Option<i32>;
    fn to_new(&self, owner: OwnerRef, now: NaiveDateTime) -> Self::New;
    fn to_changes(&self, now: NaiveDateTime) -> Self::Changes;
}

/// Storage operations shared by every detail table, always scoped to an owner.
pub trait DetailRecord: Sized + Clone + std::fmt::Debug {
    type Values: DetailValues;
    const KIND: DetailKind;

    fn id(&self) -> i32;
    fn owner(&self) -> OwnerRef;
    fn location_id(&self) -> Option<i32>;

    fn list_for(conn: &mut SqliteConnection, owner: OwnerRef) -> QueryResult<Vec<Self>>;
    fn find_for(conn: &mut SqliteConnection, owner: OwnerRef, id: i32)
        -> QueryResult<Option<Self>>;
    fn insert(
        conn: &mut SqliteConnection,
        owner: OwnerRef,
        values: &Self::Values,
        now: NaiveDateTime,
    ) -> QueryResult<Self>;
    fn update(
        conn: &mut SqliteConnection,
        id: i32,
        values: &Self::Values,
        now: NaiveDateTime,
    ) -> QueryResult<Self>;
    fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize>;
    fn delete_for_owner(conn: &mut SqliteConnection, owner: OwnerRef) -> QueryResult<usize>;
    fn count(conn: &mut SqliteConnection) -> QueryResult<i64>;
}

macro_rules! detail_record {
    ($record:ident, $values:ident, $table:ident, $kind:expr) => {
        impl DetailRecord for $record {
            type Values = $values;
            const KIND: DetailKind = $kind;

            fn id(&self) -> i32 {
                self.id
            }

            fn owner(&self) -> OwnerRef {
                OwnerRef::new(self.owner_kind, self.owner_id)
            }

            fn location_id(&self) -> Option<i32> {
                self.located_at()
            }

            fn list_for(conn: &mut SqliteConnection, owner: OwnerRef) -> QueryResult<Vec<Self>> {
                $table::table
                    .filter($table::owner_kind.eq(owner.kind))
                    .filter($table::owner_id.eq(owner.id))
                    .order($table::id.asc())
                    .select(Self::as_select())
                    .load(conn)
            }

            fn find_for(
                conn: &mut SqliteConnection,
                owner: OwnerRef,
                id: i32,
            ) -> QueryResult<Option<Self>> {
                $table::table
                    .filter($table::id.eq(id))
                    .filter($table::owner_kind.eq(owner.kind))
                    .filter($table::owner_id.eq(owner.id))
                    .select(Self::as_select())
                    .first(conn)
                    .optional()
            }

            fn insert(
                conn: &mut SqliteConnection,
                owner: OwnerRef,
                values: &Self::Values,
                now: NaiveDateTime,
            ) -> QueryResult<Self> {
                diesel::insert_into($table::table)
                    .values(values.to_new(owner, now))
                    .returning(Self::as_returning())
                    .get_result(conn)
            }

            fn update(
                conn: &mut SqliteConnection,
                id: i32,
                values: &Self::Values,
                now: NaiveDateTime,
            ) -> QueryResult<Self> {
                diesel::update($table::table.find(id))
                    .set(values.to_changes(now))
                    .returning(Self::as_returning())
                    .get_result(conn)
            }

            fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<usize> {
                diesel::delete($table::table.find(id)).execute(conn)
            }

            fn delete_for_owner(conn: &mut SqliteConnection, owner: OwnerRef) -> QueryResult<usize> {
                diesel::delete(
                    $table::table
                        .filter($table::owner_kind.eq(owner.kind))
                        .filter($table::owner_id.eq(owner.id)),
                )
                .execute(conn)
            }

            fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
                $table::table.count().get_result(conn)
            }
        }
    };
}

/// A located record paired with its location, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Located<T> {
    pub record: T,
    pub location: Location,
}

/// Text shown before the location in a located record's display.
pub trait Summary {
    fn summary(&self) -> &str;
}

impl<T: Summary> std::fmt::Display for Located<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.record.summary(), self.location)
    }
}

// Phone numbers

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_phone_numbers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PhoneNumber {
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub phone_number: String,
    pub location_id: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumberValues {
    pub phone_number: String,
    pub location_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts_phone_numbers)]
pub struct NewPhoneNumber {
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub phone_number: String,
    pub location_id: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts_phone_numbers)]
pub struct PhoneNumberChanges {
    pub phone_number: String,
    pub location_id: i32,
    pub date_modified: NaiveDateTime,
}

impl PhoneNumber {
    fn located_at(&self) -> Option<i32> {
        Some(self.location_id)
    }
}

impl DetailValues for PhoneNumberValues {
    type New = NewPhoneNumber;
    type Changes = PhoneNumberChanges;

    fn location_id(&self) -> Option<i32> {
        Some(self.location_id)
    }

    fn to_new(&self, owner: OwnerRef, now: NaiveDateTime) -> NewPhoneNumber {
        NewPhoneNumber {
            owner_kind: owner.kind,
            owner_id: owner.id,
            phone_number: self.phone_number.clone(),
            location_id: self.location_id,
            date_added: now,
            date_modified: now,
        }
    }

    fn to_changes(&self, now: NaiveDateTime) -> PhoneNumberChanges {
        PhoneNumberChanges {
            phone_number: self.phone_number.clone(),
            location_id: self.location_id,
            date_modified: now,
        }
    }
}

impl Summary for PhoneNumber {
    fn summary(&self) -> &str {
        &self.phone_number
    }
}

detail_record!(PhoneNumber, PhoneNumberValues, contacts_phone_numbers, DetailKind::PhoneNumber);

// Email addresses

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_email_addresses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EmailAddress {
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub email_address: String,
    pub location_id: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressValues {
    pub email_address: String,
    pub location_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts_email_addresses)]
pub struct NewEmailAddress {
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub email_address: String,
    pub location_id: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts_email_addresses)]
pub struct EmailAddressChanges {
    pub email_address: String,
    pub location_id: i32,
    pub date_modified: NaiveDateTime,
}

impl EmailAddress {
    fn located_at(&self) -> Option<i32> {
        Some(self.location_id)
    }
}

impl DetailValues for EmailAddressValues {
    type New = NewEmailAddress;
    type Changes = EmailAddressChanges;

    fn location_id(&self) -> Option<i32> {
        Some(self.location_id)
    }

    fn to_new(&self, owner: OwnerRef, now: NaiveDateTime) -> NewEmailAddress {
        NewEmailAddress {
            owner_kind: owner.kind,
            owner_id: owner.id,
            email_address: self.email_address.clone(),
            location_id: self.location_id,
            date_added: now,
            date_modified: now,
        }
    }

    fn to_changes(&self, now: NaiveDateTime) -> EmailAddressChanges {
        EmailAddressChanges {
            email_address: self.email_address.clone(),
            location_id: self.location_id,
            date_modified: now,
        }
    }
}

impl Summary for EmailAddress {
    fn summary(&self) -> &str {
        &self.email_address
    }
}

detail_record!(
    EmailAddress,
    EmailAddressValues,
    contacts_email_addresses,
    DetailKind::EmailAddress
);

// Instant messengers

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_instant_messengers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InstantMessenger {
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub im_account: String,
    pub location_id: i32,
    pub service: ImService,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantMessengerValues {
    pub im_account: String,
    pub location_id: i32,
    pub service: ImService,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts_instant_messengers)]
pub struct NewInstantMessenger {
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub im_account: String,
    pub location_id: i32,
    pub service: ImService,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts_instant_messengers)]
pub struct InstantMessengerChanges {
    pub im_account: String,
    pub location_id: i32,
    pub service: ImService,
    pub date_modified: NaiveDateTime,
}

impl InstantMessenger {
    fn located_at(&self) -> Option<i32> {
        Some(self.location_id)
    }
}

impl DetailValues for InstantMessengerValues {
    type New = NewInstantMessenger;
    type Changes = InstantMessengerChanges;

    fn location_id(&self) -> Option<i32> {
        Some(self.location_id)
    }

    fn to_new(&self, owner: OwnerRef, now: NaiveDateTime) -> NewInstantMessenger {
        NewInstantMessenger {
            owner_kind: owner.kind,
            owner_id: owner.id,
            im_account: self.im_account.clone(),
            location_id: self.location_id,
            service: self.service,
            date_added: now,
            date_modified: now,
        }
    }

    fn to_changes(&self, now: NaiveDateTime) -> InstantMessengerChanges {
        InstantMessengerChanges {
            im_account: self.im_account.clone(),
            location_id: self.location_id,
            service: self.service,
            date_modified: now,
        }
    }
}

impl Summary for InstantMessenger {
    fn summary(&self) -> &str {
        &self.im_account
    }
}

detail_record!(
    InstantMessenger,
    InstantMessengerValues,
    contacts_instant_messengers,
    DetailKind::InstantMessenger
);

// Web sites

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_web_sites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WebSite {
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub url: String,
    pub location_id: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSiteValues {
    pub url: String,
    pub location_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts_web_sites)]
pub struct NewWebSite {
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub url: String,
    pub location_id: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts_web_sites)]
pub struct WebSiteChanges {
    pub url: String,
    pub location_id: i32,
    pub date_modified: NaiveDateTime,
}

impl WebSite {
    fn located_at(&self) -> Option<i32> {
        Some(self.location_id)
    }
}

impl DetailValues for WebSiteValues {
    type New = NewWebSite;
    type Changes = WebSiteChanges;

    fn location_id(&self) -> Option<i32> {
        Some(self.location_id)
    }

    fn to_new(&self, owner: OwnerRef, now: NaiveDateTime) -> NewWebSite {
        NewWebSite {
            owner_kind: owner.kind,
            owner_id: owner.id,
            url: self.url.clone(),
            location_id: self.location_id,
            date_added: now,
            date_modified: now,
        }
    }

    fn to_changes(&self, now: NaiveDateTime) -> WebSiteChanges {
        WebSiteChanges {
            url: self.url.clone(),
            location_id: self.location_id,
            date_modified: now,
        }
    }
}

impl Summary for WebSite {
    fn summary(&self) -> &str {
        &self.url
    }
}

detail_record!(WebSite, WebSiteValues, contacts_web_sites, DetailKind::WebSite);

// Street addresses

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_street_addresses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StreetAddress {
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub location_id: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetAddressValues {
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub location_id: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts_street_addresses)]
pub struct NewStreetAddress {
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub location_id: i32,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts_street_addresses)]
pub struct StreetAddressChanges {
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    pub location_id: i32,
    pub date_modified: NaiveDateTime,
}

impl StreetAddress {
    fn located_at(&self) -> Option<i32> {
        Some(self.location_id)
    }
}

impl DetailValues for StreetAddressValues {
    type New = NewStreetAddress;
    type Changes = StreetAddressChanges;

    fn location_id(&self) -> Option<i32> {
        Some(self.location_id)
    }

    fn to_new(&self, owner: OwnerRef, now: NaiveDateTime) -> NewStreetAddress {
        NewStreetAddress {
            owner_kind: owner.kind,
            owner_id: owner.id,
            street: self.street.clone(),
            city: self.city.clone(),
            province: self.province.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            location_id: self.location_id,
            date_added: now,
            date_modified: now,
        }
    }

    fn to_changes(&self, now: NaiveDateTime) -> StreetAddressChanges {
        StreetAddressChanges {
            street: self.street.clone(),
            city: self.city.clone(),
            province: self.province.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
            location_id: self.location_id,
            date_modified: now,
        }
    }
}

impl Summary for StreetAddress {
    fn summary(&self) -> &str {
        &self.city
    }
}

detail_record!(
    StreetAddress,
    StreetAddressValues,
    contacts_street_addresses,
    DetailKind::StreetAddress
);

// Special dates

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = contacts_special_dates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SpecialDate {
    pub id: i32,
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub occasion: String,
    pub date: NaiveDate,
    pub every_year: bool,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDateValues {
    pub occasion: String,
    pub date: NaiveDate,
    pub every_year: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts_special_dates)]
pub struct NewSpecialDate {
    pub owner_kind: OwnerKind,
    pub owner_id: i32,
    pub occasion: String,
    pub date: NaiveDate,
    pub every_year: bool,
    pub date_added: NaiveDateTime,
    pub date_modified: NaiveDateTime,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts_special_dates)]
pub struct SpecialDateChanges {
    pub occasion: String,
    pub date: NaiveDate,
    pub every_year: bool,
    pub date_modified: NaiveDateTime,
}

impl SpecialDate {
    fn located_at(&self) -> Option<i32> {
        None
    }

    /// Every special date in the table, for range scans.
    pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<SpecialDate>> {
        contacts_special_dates::table
            .order((contacts_special_dates::date.asc(), contacts_special_dates::id.asc()))
            .select(SpecialDate::as_select())
            .load(conn)
    }
}

impl DetailValues for SpecialDateValues {
    type New = NewSpecialDate;
    type Changes = SpecialDateChanges;

    fn location_id(&self) -> Option<i32> {
        None
    }

    fn to_new(&self, owner: OwnerRef, now: NaiveDateTime) -> NewSpecialDate {
        NewSpecialDate {
            owner_kind: owner.kind,
            owner_id: owner.id,
            occasion: self.occasion.clone(),
            date: self.date,
            every_year: self.every_year,
            date_added: now,
            date_modified: now,
        }
    }

    fn to_changes(&self, now: NaiveDateTime) -> SpecialDateChanges {
        SpecialDateChanges {
            occasion: self.occasion.clone(),
            date: self.date,
            every_year: self.every_year,
            date_modified: now,
        }
    }
}

impl std::fmt::Display for SpecialDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.occasion, self.date.format("%Y-%m-%d"))
    }
}

detail_record!(
    SpecialDate,
    SpecialDateValues,
    contacts_special_dates,
    DetailKind::SpecialDate
);

impl Entity for PhoneNumber {
    const TABLE: &'static str = "contacts_phone_numbers";
    const VERBOSE_NAME: &'static str = "phone number";
    const VERBOSE_NAME_PLURAL: &'static str = "phone numbers";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("phone_number", "number"),
        ("location", "location"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl Entity for EmailAddress {
    const TABLE: &'static str = "contacts_email_addresses";
    const VERBOSE_NAME: &'static str = "email address";
    const VERBOSE_NAME_PLURAL: &'static str = "email addresses";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("email_address", "email address"),
        ("location", "location"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl Entity for InstantMessenger {
    const TABLE: &'static str = "contacts_instant_messengers";
    const VERBOSE_NAME: &'static str = "instant messenger";
    const VERBOSE_NAME_PLURAL: &'static str = "instant messengers";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("im_account", "im account"),
        ("service", "service"),
        ("location", "location"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl Entity for WebSite {
    const TABLE: &'static str = "contacts_web_sites";
    const VERBOSE_NAME: &'static str = "web site";
    const VERBOSE_NAME_PLURAL: &'static str = "web sites";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("url", "URL"),
        ("location", "location"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl Entity for StreetAddress {
    const TABLE: &'static str = "contacts_street_addresses";
    const VERBOSE_NAME: &'static str = "street address";
    const VERBOSE_NAME_PLURAL: &'static str = "street addresses";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("street", "street"),
        ("city", "city"),
        ("province", "province"),
        ("postal_code", "postal code"),
        ("country", "country"),
        ("location", "location"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}

impl Entity for SpecialDate {
    const TABLE: &'static str = "contacts_special_dates";
    const VERBOSE_NAME: &'static str = "special date";
    const VERBOSE_NAME_PLURAL: &'static str = "special dates";
    const LABELS: &'static [(&'static str, &'static str)] = &[
        ("occasion", "occasion"),
        ("date", "date"),
        ("every_year", "every year"),
        ("date_added", "date added"),
        ("date_modified", "date modified"),
    ];
}
