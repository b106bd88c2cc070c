//! Pet catalog contract: table, columns, addressing and enumerations.
//!
//! # Responsibility
//! - Name the single `pets` table and its columns.
//! - Define the content authority, base path and MIME types used for routing.
//! - Define the gender enumeration and its validity predicate.
//!
//! # Invariants
//! - Gender integer values are fixed (`0/1/2`) for compatibility with stored data.
//! - Column names never change once released.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// URI scheme used by every resource identifier.
pub const CONTENT_SCHEME: &str = "content";
/// Default content authority owning the pets resources.
pub const CONTENT_AUTHORITY: &str = "com.example.android.pets";
/// Collection path segment.
pub const PATH_PETS: &str = "pets";

/// Table holding every pet record.
pub const TABLE_NAME: &str = "pets";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_PET_NAME: &str = "name";
pub const COLUMN_PET_BREED: &str = "breed";
pub const COLUMN_PET_GENDER: &str = "gender";
pub const COLUMN_PET_WEIGHT: &str = "weight";

/// MIME type for a list of pets.
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.android.pets/pets";
/// MIME type for a single pet.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.android.pets/pets";

pub const GENDER_UNKNOWN: i64 = 0;
pub const GENDER_MALE: i64 = 1;
pub const GENDER_FEMALE: i64 = 2;

/// Returns the base collection URI for `authority`.
pub fn content_uri(authority: &str) -> String {
    format!("{CONTENT_SCHEME}://{authority}/{PATH_PETS}")
}

/// Returns the item URI for `id` under `authority`.
pub fn item_uri(authority: &str, id: i64) -> String {
    format!("{}/{id}", content_uri(authority))
}

/// Returns whether `value` is one of the defined gender constants.
pub fn is_gender_valid(value: i64) -> bool {
    Gender::from_i64(value).is_some()
}

/// Pet gender as stored in the `gender` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Stored integer value.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Unknown => GENDER_UNKNOWN,
            Self::Male => GENDER_MALE,
            Self::Female => GENDER_FEMALE,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            GENDER_UNKNOWN => Some(Self::Unknown),
            GENDER_MALE => Some(Self::Male),
            GENDER_FEMALE => Some(Self::Female),
            _ => None,
        }
    }
}

/// Column addressable through projections and sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PetColumn {
    Id,
    Name,
    Breed,
    Gender,
    Weight,
}

impl PetColumn {
    /// Every column in table order.
    pub const ALL: [PetColumn; 5] = [
        PetColumn::Id,
        PetColumn::Name,
        PetColumn::Breed,
        PetColumn::Gender,
        PetColumn::Weight,
    ];

    /// SQL column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => COLUMN_ID,
            Self::Name => COLUMN_PET_NAME,
            Self::Breed => COLUMN_PET_BREED,
            Self::Gender => COLUMN_PET_GENDER,
            Self::Weight => COLUMN_PET_WEIGHT,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == value.trim())
    }
}

impl Display for PetColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
