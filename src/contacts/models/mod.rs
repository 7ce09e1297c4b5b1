mod company;
mod details;
mod group;
mod location;
mod note;
mod person;

pub use company::*;
pub use details::*;
pub use group::*;
pub use location::*;
pub use note::*;
pub use person::*;

/// Table name, human-readable names and per-field labels of a model.
pub trait Entity {
    const TABLE: &'static str;
    const VERBOSE_NAME: &'static str;
    const VERBOSE_NAME_PLURAL: &'static str;
    const LABELS: &'static [(&'static str, &'static str)];

    fn label(field: &str) -> Option<&'static str> {
        Self::LABELS
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, label)| *label)
    }
}
