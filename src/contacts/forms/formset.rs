use diesel::SqliteConnection;
use std::collections::BTreeMap;

use super::DetailForm;
use crate::contacts::error::ContactsError;
use crate::contacts::models::{DetailRecord, Location};
use crate::contacts::owner::OwnerRef;
use crate::core::validation::{ValidationError, ValidationResult};

/// Blank rows appended after the existing records when a form set is built.
pub const EXTRA_FORMS: usize = 1;

pub type Values<F> = <<F as DetailForm>::Record as DetailRecord>::Values;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction<V> {
    Create(V),
    Update { id: i32, values: V },
    Delete(i32),
}

/// Child rows of one detail kind, bound to a fixed owner.
#[derive(Debug, Clone)]
pub struct InlineFormSet<F: DetailForm> {
    pub owner: OwnerRef,
    pub forms: Vec<F>,
}

impl<F: DetailForm> InlineFormSet<F> {
    pub fn new(owner: OwnerRef, forms: Vec<F>) -> Self {
        Self { owner, forms }
    }

    /// A form set with no rows: saving it changes nothing.
    pub fn empty(owner: OwnerRef) -> Self {
        Self::new(owner, Vec::new())
    }

    /// One row per existing record followed by the blank extra rows.
    pub fn for_records(owner: OwnerRef, records: &[F::Record]) -> Self {
        let forms = records
            .iter()
            .map(F::initial)
            .chain(std::iter::repeat_with(F::default).take(EXTRA_FORMS))
            .collect();
        Self::new(owner, forms)
    }

    pub fn load(conn: &mut SqliteConnection, owner: OwnerRef) -> Result<Self, ContactsError> {
        let records = F::Record::list_for(conn, owner)?;
        Ok(Self::for_records(owner, &records))
    }

    pub fn prefix(&self) -> &'static str {
        F::PREFIX
    }

    /// Validate every row against the owner's existing records and the known
    /// locations. Unchanged new rows and deleted new rows are skipped. Errors
    /// are keyed by row index.
    pub fn validate(
        &self,
        existing: &[F::Record],
        locations: &[Location],
    ) -> Result<Vec<RowAction<Values<F>>>, BTreeMap<usize, ValidationResult>> {
        let mut actions = Vec::new();
        let mut errors = BTreeMap::new();

        for (index, form) in self.forms.iter().enumerate() {
            match form.id() {
                Some(id) if !existing.iter().any(|record| record.id() == id) => {
                    errors.insert(
                        index,
                        ValidationResult::from(ValidationError::UnknownReference {
                            field: "id".to_string(),
                            id,
                        }),
                    );
                }
                Some(id) if form.marked_for_deletion() => actions.push(RowAction::Delete(id)),
                Some(id) => match form.clean(locations) {
                    Ok(values) => actions.push(RowAction::Update { id, values }),
                    Err(row) => {
                        errors.insert(index, row);
                    }
                },
                None if form.marked_for_deletion() || !form.has_changed() => {}
                None => match form.clean(locations) {
                    Ok(values) => actions.push(RowAction::Create(values)),
                    Err(row) => {
                        errors.insert(index, row);
                    }
                },
            }
        }

        if errors.is_empty() {
            Ok(actions)
        } else {
            Err(errors)
        }
    }

    /// [`validate`](Self::validate) with the owner's records and all
    /// locations loaded from the database.
    pub fn clean(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Vec<RowAction<Values<F>>>, ContactsError> {
        let existing = F::Record::list_for(conn, self.owner)?;
        let locations = Location::all(conn)?;
        self.validate(&existing, &locations).map_err(|rows| {
            let mut errors = super::FormErrors::new();
            errors.add_rows(F::PREFIX, rows);
            ContactsError::Invalid(errors)
        })
    }
}
