//! Pet record, write values and field validation.
//!
//! # Responsibility
//! - Define `Pet` (full stored record) and `PetRow` (projected row).
//! - Define `PetValues`, the partial field map accepted by insert/update.
//! - Enforce field rules for insert and update modes.
//!
//! # Invariants
//! - `id` is storage-assigned and never part of `PetValues`.
//! - Insert requires `name`, `breed` and a valid `gender`.
//! - `weight`, when supplied, must be strictly positive.
//! - Update checks only the fields it supplies.

use crate::contract::{is_gender_valid, Gender, PetColumn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned pet identifier (`_id`).
pub type PetId = i64;

/// One stored pet record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub breed: String,
    /// Raw stored value; legacy rows may hold values outside the enumeration.
    pub gender: i64,
    pub weight: i64,
}

impl Pet {
    /// Typed gender, or `None` for out-of-range legacy values.
    pub fn gender_kind(&self) -> Option<Gender> {
        Gender::from_i64(self.gender)
    }
}

/// Row returned by a projected query.
///
/// A column is `Some` only when it was part of the projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetRow {
    pub id: Option<PetId>,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<i64>,
    pub weight: Option<i64>,
}

impl PetRow {
    /// Converts into a full record when every column was projected.
    pub fn into_pet(self) -> Option<Pet> {
        Some(Pet {
            id: self.id?,
            name: self.name?,
            breed: self.breed?,
            gender: self.gender?,
            weight: self.weight?,
        })
    }
}

/// Field of a pet record, used to tag validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PetField {
    Name,
    Breed,
    Gender,
    Weight,
}

impl PetField {
    pub fn column(self) -> PetColumn {
        match self {
            Self::Name => PetColumn::Name,
            Self::Breed => PetColumn::Breed,
            Self::Gender => PetColumn::Gender,
            Self::Weight => PetColumn::Weight,
        }
    }
}

/// Which write path a candidate is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Full candidate record: required fields must be present.
    Insert,
    /// Partial field map: only supplied fields are checked.
    Update,
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NameRequired,
    BreedRequired,
    InvalidWeight(i64),
    InvalidGender(Option<i64>),
}

impl ValidationError {
    /// Field that failed validation.
    pub fn field(&self) -> PetField {
        match self {
            Self::NameRequired => PetField::Name,
            Self::BreedRequired => PetField::Breed,
            Self::InvalidWeight(_) => PetField::Weight,
            Self::InvalidGender(_) => PetField::Gender,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "pet requires a name"),
            Self::BreedRequired => write!(f, "pet requires a breed"),
            Self::InvalidWeight(value) => {
                write!(f, "pet requires a valid weight, got {value}")
            }
            Self::InvalidGender(Some(value)) => {
                write!(f, "pet requires a valid gender, got {value}")
            }
            Self::InvalidGender(None) => write!(f, "pet requires a valid gender"),
        }
    }
}

impl Error for ValidationError {}

/// Partial field map for insert and update.
///
/// Built with chained setters:
///
/// ```
/// use pets_core::{Gender, PetValues};
///
/// let values = PetValues::new()
///     .name("Toto")
///     .breed("Terrier")
///     .gender(Gender::Male)
///     .weight(7);
/// assert_eq!(values.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
}

impl PetValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender.as_i64());
        self
    }

    /// Sets a raw gender value without checking the enumeration.
    pub fn gender_raw(mut self, gender: i64) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn weight(mut self, weight: i64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Number of supplied fields.
    pub fn len(&self) -> usize {
        usize::from(self.name.is_some())
            + usize::from(self.breed.is_some())
            + usize::from(self.gender.is_some())
            + usize::from(self.weight.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Supplied fields as `(column, value)` pairs in table order.
    pub(crate) fn columns(&self) -> Vec<(PetColumn, rusqlite::types::Value)> {
        use rusqlite::types::Value;

        let mut columns = Vec::with_capacity(self.len());
        if let Some(name) = &self.name {
            columns.push((PetColumn::Name, Value::Text(name.clone())));
        }
        if let Some(breed) = &self.breed {
            columns.push((PetColumn::Breed, Value::Text(breed.clone())));
        }
        if let Some(gender) = self.gender {
            columns.push((PetColumn::Gender, Value::Integer(gender)));
        }
        if let Some(weight) = self.weight {
            columns.push((PetColumn::Weight, Value::Integer(weight)));
        }
        columns
    }

    /// Validates the supplied fields for `mode`.
    ///
    /// Checks run in the order name, breed, weight, gender; the first
    /// failure is returned.
    ///
    /// # Errors
    /// - `NameRequired` / `BreedRequired` when the field is blank, or absent
    ///   in insert mode.
    /// - `InvalidWeight` when weight is supplied and `<= 0`. An absent weight
    ///   is accepted in both modes.
    /// - `InvalidGender` when gender is outside the enumeration, or absent in
    ///   insert mode.
    pub fn validate(&self, mode: ValidationMode) -> Result<(), ValidationError> {
        let required = mode == ValidationMode::Insert;

        match self.name.as_deref() {
            Some(name) if name.trim().is_empty() => return Err(ValidationError::NameRequired),
            None if required => return Err(ValidationError::NameRequired),
            _ => {}
        }

        match self.breed.as_deref() {
            Some(breed) if breed.trim().is_empty() => {
                return Err(ValidationError::BreedRequired)
            }
            None if required => return Err(ValidationError::BreedRequired),
            _ => {}
        }

        if let Some(weight) = self.weight {
            if weight <= 0 {
                return Err(ValidationError::InvalidWeight(weight));
            }
        }

        match self.gender {
            Some(gender) if !is_gender_valid(gender) => {
                Err(ValidationError::InvalidGender(Some(gender)))
            }
            None if required => Err(ValidationError::InvalidGender(None)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PetField, PetRow, PetValues, ValidationError, ValidationMode};
    use crate::contract::Gender;

    fn toto() -> PetValues {
        PetValues::new()
            .name("Toto")
            .breed("Terrier")
            .gender(Gender::Male)
            .weight(7)
    }

    #[test]
    fn full_record_passes_insert_validation() {
        assert_eq!(toto().validate(ValidationMode::Insert), Ok(()));
    }

    #[test]
    fn insert_rejects_blank_or_missing_name() {
        let mut values = toto();
        values.name = Some("   ".to_string());
        let err = values.validate(ValidationMode::Insert).unwrap_err();
        assert_eq!(err.field(), PetField::Name);

        values.name = None;
        assert_eq!(
            values.validate(ValidationMode::Insert),
            Err(ValidationError::NameRequired)
        );
    }

    #[test]
    fn insert_rejects_blank_or_missing_breed() {
        let mut values = toto();
        values.breed = Some(String::new());
        assert_eq!(
            values.validate(ValidationMode::Insert),
            Err(ValidationError::BreedRequired)
        );

        values.breed = None;
        assert_eq!(
            values.validate(ValidationMode::Insert),
            Err(ValidationError::BreedRequired)
        );
    }

    #[test]
    fn non_positive_weight_is_rejected_but_absent_weight_is_not() {
        for weight in [0, -1, i64::MIN] {
            let err = toto()
                .weight(weight)
                .validate(ValidationMode::Insert)
                .unwrap_err();
            assert_eq!(err, ValidationError::InvalidWeight(weight));
        }

        // Absent weight is accepted even on insert; storage default applies.
        let mut values = toto();
        values.weight = None;
        assert_eq!(values.validate(ValidationMode::Insert), Ok(()));
    }

    #[test]
    fn out_of_range_gender_is_rejected_in_both_modes() {
        for gender in [-1, 3, 42] {
            let values = toto().gender_raw(gender);
            assert_eq!(
                values.validate(ValidationMode::Insert),
                Err(ValidationError::InvalidGender(Some(gender)))
            );
            let partial = PetValues::new().gender_raw(gender);
            assert_eq!(
                partial.validate(ValidationMode::Update),
                Err(ValidationError::InvalidGender(Some(gender)))
            );
        }
    }

    #[test]
    fn insert_requires_gender() {
        let mut values = toto();
        values.gender = None;
        assert_eq!(
            values.validate(ValidationMode::Insert),
            Err(ValidationError::InvalidGender(None))
        );
    }

    #[test]
    fn update_checks_only_supplied_fields() {
        assert_eq!(
            PetValues::new().weight(12).validate(ValidationMode::Update),
            Ok(())
        );
        assert_eq!(PetValues::new().validate(ValidationMode::Update), Ok(()));
        assert_eq!(
            PetValues::new().name("").validate(ValidationMode::Update),
            Err(ValidationError::NameRequired)
        );
    }

    #[test]
    fn name_failure_is_reported_before_gender_failure() {
        let values = PetValues::new().name("").breed("X").gender_raw(9);
        assert_eq!(
            values.validate(ValidationMode::Insert),
            Err(ValidationError::NameRequired)
        );
    }

    #[test]
    fn len_counts_supplied_fields() {
        assert!(PetValues::new().is_empty());
        assert_eq!(PetValues::new().name("a").weight(3).len(), 2);
        assert_eq!(toto().columns().len(), 4);
    }

    #[test]
    fn partial_row_does_not_convert_into_pet() {
        let row = PetRow {
            id: Some(1),
            name: Some("Toto".to_string()),
            ..PetRow::default()
        };
        assert!(row.into_pet().is_none());
    }
}
