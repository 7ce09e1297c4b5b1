//! Canonical addresses for companies, people and groups.
//!
//! Models only know the *name* of an address (`contacts_company_detail`) and
//! its parameters; the surrounding application owns the name-to-path table.
//! [`UrlTable::default`] carries the conventional patterns.

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlAction {
    Detail,
    Update,
    Delete,
}

impl UrlAction {
    pub const ALL: [UrlAction; 3] = [UrlAction::Detail, UrlAction::Update, UrlAction::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detail => "detail",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permalink {
    pub entity: &'static str,
    pub action: UrlAction,
    pub pk: i32,
    pub slug: String,
}

impl Permalink {
    pub fn name(&self) -> String {
        format!("contacts_{}_{}", self.entity, self.action.as_str())
    }
}

/// Entities with detail/update/delete pages keyed by primary key and slug.
pub trait HasPermalink {
    const URL_ENTITY: &'static str;

    fn pk(&self) -> i32;
    fn slug(&self) -> &str;

    fn permalink(&self, action: UrlAction) -> Permalink {
        Permalink {
            entity: Self::URL_ENTITY,
            action,
            pk: self.pk(),
            slug: self.slug().to_string(),
        }
    }

    fn absolute_url(&self) -> Permalink {
        self.permalink(UrlAction::Detail)
    }

    fn update_url(&self) -> Permalink {
        self.permalink(UrlAction::Update)
    }

    fn delete_url(&self) -> Permalink {
        self.permalink(UrlAction::Delete)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("no URL pattern registered for '{0}'")]
    NoReverseMatch(String),
}

/// URL-name-to-path table. Patterns use `{pk}` and `{slug}` placeholders.
#[derive(Debug, Clone)]
pub struct UrlTable {
    patterns: HashMap<String, String>,
}

impl UrlTable {
    pub fn empty() -> Self {
        Self {
            patterns: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
        self.patterns.insert(name.into(), pattern.into());
        self
    }

    pub fn reverse(&self, link: &Permalink) -> Result<String, UrlError> {
        let name = link.name();
        let pattern = self
            .patterns
            .get(&name)
            .ok_or(UrlError::NoReverseMatch(name))?;
        Ok(pattern
            .replace("{pk}", &link.pk.to_string())
            .replace("{slug}", &link.slug))
    }

    /// A web site's address is its owner's detail page with the site selected.
    pub fn web_site_url(&self, owner: &Permalink, web_site_id: i32) -> Result<String, UrlError> {
        Ok(format!("{}?web_site={}", self.reverse(owner)?, web_site_id))
    }
}

impl Default for UrlTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for (entity, prefix) in [("company", "companies"), ("person", "people"), ("group", "groups")] {
            table
                .register(
                    format!("contacts_{entity}_detail"),
                    format!("/contacts/{prefix}/{{pk}}/{{slug}}/"),
                )
                .register(
                    format!("contacts_{entity}_update"),
                    format!("/contacts/{prefix}/{{pk}}/{{slug}}/edit/"),
                )
                .register(
                    format!("contacts_{entity}_delete"),
                    format!("/contacts/{prefix}/{{pk}}/{{slug}}/delete/"),
                );
        }
        table
    }
}
