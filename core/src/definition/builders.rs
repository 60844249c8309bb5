//! # TYPED BUILDERS
//!
//! Each builder selects a getter, prepends the matching type guard and returns
//! an immutable [`PropertyDefinition`].

use super::{Container, ItemSchema, PropertyDefinition};
use crate::getters::Getter;
use crate::guards;
use crate::validation::Check;
use serde::Deserialize;

/// **STRING OPTIONS**
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StringOptions {
    /// Trim leading/trailing whitespace (default `true`)
    pub use_trim: bool,
}

impl Default for StringOptions {
    fn default() -> Self {
        Self { use_trim: true }
    }
}

/// **NUMBER OPTIONS**
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberOptions {
    /// Read `"34,55"` as `34.55` (default `true`)
    pub replace_comma: bool,
}

impl Default for NumberOptions {
    fn default() -> Self {
        Self {
            replace_comma: true,
        }
    }
}

pub fn string(validators: impl IntoIterator<Item = Check>) -> PropertyDefinition {
    string_with(validators, StringOptions::default())
}

pub fn string_with(
    validators: impl IntoIterator<Item = Check>,
    options: StringOptions,
) -> PropertyDefinition {
    let getter = if options.use_trim {
        Getter::TrimmedString
    } else {
        Getter::String
    };
    PropertyDefinition::scalar(getter, validators, Some(guards::string_guard()))
}

pub fn number(validators: impl IntoIterator<Item = Check>) -> PropertyDefinition {
    number_with(validators, NumberOptions::default())
}

pub fn number_with(
    validators: impl IntoIterator<Item = Check>,
    options: NumberOptions,
) -> PropertyDefinition {
    let getter = if options.replace_comma {
        Getter::FriendlyNumber
    } else {
        Getter::Number
    };
    PropertyDefinition::scalar(getter, validators, Some(guards::number_guard()))
}

pub fn date(validators: impl IntoIterator<Item = Check>) -> PropertyDefinition {
    PropertyDefinition::scalar(Getter::Date, validators, Some(guards::date_guard()))
}

pub fn boolean(validators: impl IntoIterator<Item = Check>) -> PropertyDefinition {
    PropertyDefinition::scalar(Getter::Bool, validators, Some(guards::bool_guard()))
}

/// Opaque sub-object validated as a whole.
pub fn object(validators: impl IntoIterator<Item = Check>) -> PropertyDefinition {
    PropertyDefinition::scalar(Getter::Identity, validators, Some(guards::object_guard()))
}

pub fn array_of(
    item: impl Into<ItemSchema>,
    collection_validators: impl IntoIterator<Item = Check>,
) -> PropertyDefinition {
    PropertyDefinition::collection(
        Container::Array,
        item,
        collection_validators,
        Some(guards::array_guard()),
    )
}

pub fn dictionary(
    item: impl Into<ItemSchema>,
    collection_validators: impl IntoIterator<Item = Check>,
) -> PropertyDefinition {
    PropertyDefinition::collection(
        Container::Dictionary,
        item,
        collection_validators,
        Some(guards::object_guard()),
    )
}
