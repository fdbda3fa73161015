//! Delivery address draft and validation.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the six delivery address fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    FullName,
    PhoneNumber,
    StreetAddress,
    City,
    State,
    PostalCode,
}

impl AddressField {
    /// All fields in form order.
    pub const ALL: [Self; 6] = [
        Self::FullName,
        Self::PhoneNumber,
        Self::StreetAddress,
        Self::City,
        Self::State,
        Self::PostalCode,
    ];

    /// Form input name.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::PhoneNumber => "phone_number",
            Self::StreetAddress => "street_address",
            Self::City => "city",
            Self::State => "state",
            Self::PostalCode => "postal_code",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::PhoneNumber => "Phone Number",
            Self::StreetAddress => "Street Address",
            Self::City => "City",
            Self::State => "State",
            Self::PostalCode => "Postal Code",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised when validating a [`DeliveryAddress`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// One or more fields are empty after trimming.
    #[error("missing delivery address fields: {}", join_labels(.0))]
    MissingFields(Vec<AddressField>),
}

fn join_labels(fields: &[AddressField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where a cash-on-delivery order is shipped.
///
/// Used both as the editable draft (fields may be empty) and, after
/// [`validate`](Self::validate), as the submitted address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub full_name: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl DeliveryAddress {
    /// Read one field.
    #[must_use]
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::FullName => &self.full_name,
            AddressField::PhoneNumber => &self.phone_number,
            AddressField::StreetAddress => &self.street_address,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::PostalCode => &self.postal_code,
        }
    }

    /// Replace exactly one field, leaving the others untouched.
    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let slot = match field {
            AddressField::FullName => &mut self.full_name,
            AddressField::PhoneNumber => &mut self.phone_number,
            AddressField::StreetAddress => &mut self.street_address,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::PostalCode => &mut self.postal_code,
        };
        *slot = value.into();
    }

    /// Fields that are empty after trimming, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<AddressField> {
        AddressField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Check that every field is filled and return a trimmed copy.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingFields`] naming every empty field.
    pub fn validate(&self) -> Result<Self, AddressError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(AddressError::MissingFields(missing));
        }

        let mut trimmed = Self::default();
        for field in AddressField::ALL {
            trimmed.set(field, self.get(field).trim());
        }
        Ok(trimmed)
    }
}
