use chrono::NaiveDate;

use super::ContactsService;
use crate::contacts::error::ContactsError;
use crate::contacts::models::{DetailRecord, SpecialDate};
use crate::contacts::owner::OwnerRef;
use crate::contacts::special_dates::{self, Occurrence};

impl ContactsService {
    /// Occurrences of every special date within `[from, to]`, ordered by day.
    pub fn special_dates_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Occurrence>, ContactsError> {
        let dates = self.read(|conn| Ok(SpecialDate::all(conn)?))?;
        Ok(special_dates::between(&dates, from, to))
    }

    /// Occurrences from `today` through the next `days` days.
    pub fn upcoming_special_dates(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<Occurrence>, ContactsError> {
        let dates = self.read(|conn| Ok(SpecialDate::all(conn)?))?;
        Ok(special_dates::upcoming(&dates, today, days))
    }

    /// Occurrences of one owner's special dates within `[from, to]`.
    pub fn owner_special_dates_between(
        &self,
        owner: OwnerRef,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Occurrence>, ContactsError> {
        let dates = self.read(|conn| Ok(SpecialDate::list_for(conn, owner)?))?;
        Ok(special_dates::between(&dates, from, to))
    }
}
