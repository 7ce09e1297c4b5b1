use log::info;

use super::ContactsService;
use crate::contacts::error::ContactsError;
use crate::contacts::models::{NewNote, Note, NOTE_MAX_LENGTH};
use crate::contacts::owner::{Owner, OwnerRef};
use crate::core::shared::utils::now;
use crate::core::validation::Validator;

impl ContactsService {
    /// Attach a note to a company or person. `submitted_by` is the author's
    /// user account id, if known.
    pub fn add_note(
        &self,
        owner: OwnerRef,
        comment: &str,
        submitted_by: Option<i32>,
    ) -> Result<Note, ContactsError> {
        self.write("add note", |conn| {
            if !Owner::exists(conn, owner)? {
                return Err(ContactsError::not_found(owner.kind.as_str(), owner.id));
            }
            Validator::new()
                .required(comment, "comment", NOTE_MAX_LENGTH)
                .validate()?;
            let note = Note::insert(
                conn,
                &NewNote {
                    owner_kind: owner.kind,
                    owner_id: owner.id,
                    comment: comment.trim().to_string(),
                    submitted_by,
                    submit_date: now(),
                },
            )?;
            info!("Added note {} to {owner}", note.id);
            Ok(note)
        })
    }

    /// Notes of one owner, oldest first.
    pub fn list_notes(&self, owner: OwnerRef) -> Result<Vec<Note>, ContactsError> {
        self.read(|conn| Ok(Note::list_for(conn, owner)?))
    }

    pub fn delete_note(&self, id: i32) -> Result<(), ContactsError> {
        self.write("delete note", |conn| {
            if Note::delete(conn, id)? == 0 {
                return Err(ContactsError::not_found("note", id));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::test_utils::{add_person, test_service};
    use crate::{assert_err, assert_ok};

    #[test]
    fn test_notes_attach_to_owner() {
        let service = test_service();
        let ada = add_person(&service, "Ada", "Lovelace");
        let owner = OwnerRef::person(ada.id);

        let note = assert_ok!(service.add_note(owner, "  Met at the exhibition ", Some(3)));
        assert_eq!(note.comment, "Met at the exhibition");
        assert_eq!(note.owner(), owner);
        assert_eq!(assert_ok!(service.list_notes(owner)), vec![note.clone()]);

        let err = assert_err!(service.add_note(owner, "x".repeat(NOTE_MAX_LENGTH + 1).as_str(), None));
        assert!(err.form_errors().unwrap().fields.has_error_for("comment"));

        assert_err!(service.add_note(OwnerRef::company(ada.id + 100), "orphan", None));

        assert_ok!(service.delete_note(note.id));
        assert!(assert_ok!(service.list_notes(owner)).is_empty());
    }
}
