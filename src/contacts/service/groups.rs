use diesel::SqliteConnection;
use log::info;
use serde::Serialize;

use super::ContactsService;
use crate::contacts::error::{map_unique_violation, ContactsError};
use crate::contacts::forms::{
    CleanedGroup, DualListPicker, GroupAdminForm, GroupCreateForm, GroupUpdateForm,
};
use crate::contacts::models::{Company, Group, NewGroup, Person};
use crate::contacts::owner::{OwnerKind, OwnerRef};
use crate::core::shared::utils::now;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMembers {
    pub group: Group,
    pub people: Vec<Person>,
    pub companies: Vec<Company>,
}

fn save_members(
    conn: &mut SqliteConnection,
    id: i32,
    cleaned: &CleanedGroup,
) -> Result<(), ContactsError> {
    Group::set_people(conn, id, &cleaned.people)?;
    Group::set_companies(conn, id, &cleaned.companies)?;
    Ok(())
}

impl ContactsService {
    pub fn create_group(&self, form: &GroupCreateForm) -> Result<Group, ContactsError> {
        self.write("create group", |conn| {
            let new = form.clean(conn, now())?;
            let group = Group::insert(conn, &new)
                .map_err(|e| map_unique_violation(e, "name", &new.slug))?;
            info!("Created group {} ({})", group.id, group.slug);
            Ok(group)
        })
    }

    /// Rename, describe and replace both membership sets of a group.
    pub fn update_group(&self, id: i32, form: &GroupUpdateForm) -> Result<Group, ContactsError> {
        self.write("update group", |conn| {
            let group = Group::find(conn, id)?.ok_or_else(|| ContactsError::not_found("group", id))?;
            let cleaned = form.clean(conn, &group, now())?;
            let group = Group::update(conn, id, &cleaned.changes)?;
            save_members(conn, id, &cleaned)?;
            info!(
                "Updated group {id}: {} people, {} companies",
                cleaned.people.len(),
                cleaned.companies.len()
            );
            Ok(group)
        })
    }

    /// Save the administrative form: creates a group when `id` is `None`.
    pub fn save_group_admin(
        &self,
        id: Option<i32>,
        form: &GroupAdminForm,
    ) -> Result<Group, ContactsError> {
        self.write("save group", |conn| {
            let existing = match id {
                Some(id) => {
                    Some(Group::find(conn, id)?.ok_or_else(|| ContactsError::not_found("group", id))?)
                }
                None => None,
            };
            let stamp = now();
            let cleaned = form.clean(conn, existing.as_ref(), stamp)?;
            let slug = cleaned.changes.slug.clone();

            let group = match existing {
                Some(group) => Group::update(conn, group.id, &cleaned.changes),
                None => Group::insert(
                    conn,
                    &NewGroup {
                        name: cleaned.changes.name.clone(),
                        slug: cleaned.changes.slug.clone(),
                        about: cleaned.changes.about.clone(),
                        date_added: stamp,
                        date_modified: stamp,
                    },
                ),
            }
            .map_err(|e| map_unique_violation(e, "slug", &slug))?;

            save_members(conn, group.id, &cleaned)?;
            info!("Saved group {} ({})", group.id, group.slug);
            Ok(group)
        })
    }

    /// Pickers for the administrative form, split by current selection.
    pub fn group_admin_pickers(
        &self,
        form: &GroupAdminForm,
    ) -> Result<Vec<DualListPicker>, ContactsError> {
        self.read(|conn| form.pickers(conn))
    }

    pub fn group_admin_form(&self, id: i32) -> Result<GroupAdminForm, ContactsError> {
        self.read(|conn| {
            let group = Group::find(conn, id)?.ok_or_else(|| ContactsError::not_found("group", id))?;
            let people = Group::person_ids(conn, id)?;
            let companies = Group::company_ids(conn, id)?;
            Ok(GroupAdminForm::from_group(&group, people, companies))
        })
    }

    pub fn get_group(&self, id: i32) -> Result<Group, ContactsError> {
        self.read(|conn| Group::find(conn, id)?.ok_or_else(|| ContactsError::not_found("group", id)))
    }

    pub fn group_by_slug(&self, slug: &str) -> Result<Group, ContactsError> {
        self.read(|conn| {
            Group::by_slug(conn, slug)?.ok_or_else(|| ContactsError::SlugNotFound {
                entity: "group",
                slug: slug.to_string(),
            })
        })
    }

    pub fn list_groups(&self) -> Result<Vec<Group>, ContactsError> {
        self.read(|conn| Ok(Group::all(conn)?))
    }

    pub fn group_members(&self, id: i32) -> Result<GroupMembers, ContactsError> {
        self.read(|conn| {
            let group = Group::find(conn, id)?.ok_or_else(|| ContactsError::not_found("group", id))?;
            Ok(GroupMembers {
                people: Group::people(conn, id)?,
                companies: Group::companies(conn, id)?,
                group,
            })
        })
    }

    /// Groups the company or person belongs to.
    pub fn groups_for(&self, owner: OwnerRef) -> Result<Vec<Group>, ContactsError> {
        self.read(|conn| {
            Ok(match owner.kind {
                OwnerKind::Company => Group::for_company(conn, owner.id)?,
                OwnerKind::Person => Group::for_person(conn, owner.id)?,
            })
        })
    }

    /// Delete a group. Members are untouched.
    pub fn delete_group(&self, id: i32) -> Result<(), ContactsError> {
        self.write("delete group", |conn| {
            if Group::delete(conn, id)? == 0 {
                return Err(ContactsError::not_found("group", id));
            }
            info!("Deleted group {id}");
            Ok(())
        })
    }
}
