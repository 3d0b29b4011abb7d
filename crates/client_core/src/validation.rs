//! Edit-form state and client-side validation for supplier records.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use regex::Regex;
use shared::domain::{Supplier, SupplierFields};
use thiserror::Error;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_TAX_ID_LEN: usize = 50;
pub const MAX_CITY_LEN: usize = 255;
pub const MAX_POSTAL_CODE_LEN: usize = 50;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern")
});
static POSTAL_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("postal code pattern"));
static BANK_ACCOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}[0-9]{22}$").expect("bank account pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SupplierField {
    Name,
    TaxId,
    Email,
    Phone,
    City,
    Address,
    PostalCode,
    BankAccount,
    Notes,
}

impl SupplierField {
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::TaxId,
        Self::Email,
        Self::Phone,
        Self::City,
        Self::Address,
        Self::PostalCode,
        Self::BankAccount,
        Self::Notes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::TaxId => "taxId",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::City => "city",
            Self::Address => "address",
            Self::PostalCode => "postalCode",
            Self::BankAccount => "bankAccount",
            Self::Notes => "notes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("is required")]
    Required,
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("must be a valid email address")]
    InvalidEmail,
    #[error("must be exactly 5 digits")]
    InvalidPostalCode,
    #[error("must be 2 letters followed by 22 digits")]
    InvalidBankAccount,
}

pub type FieldErrors = BTreeMap<SupplierField, FieldError>;

/// Raw form values plus the set of fields the operator has interacted with.
/// Errors for untouched fields are computed but not shown.
#[derive(Debug, Clone, Default)]
pub struct SupplierForm {
    values: BTreeMap<SupplierField, String>,
    touched: BTreeSet<SupplierField>,
}

impl SupplierForm {
    pub fn for_create() -> Self {
        Self::default()
    }

    pub fn for_edit(supplier: &Supplier) -> Self {
        let fields = &supplier.fields;
        let mut form = Self::default();
        form.set(SupplierField::Name, fields.name.clone());
        for (field, value) in [
            (SupplierField::TaxId, &fields.tax_id),
            (SupplierField::Email, &fields.email),
            (SupplierField::Phone, &fields.phone),
            (SupplierField::City, &fields.city),
            (SupplierField::Address, &fields.address),
            (SupplierField::PostalCode, &fields.postal_code),
            (SupplierField::BankAccount, &fields.bank_account),
            (SupplierField::Notes, &fields.notes),
        ] {
            if let Some(value) = value {
                form.set(field, value.clone());
            }
        }
        form
    }

    pub fn set(&mut self, field: SupplierField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn value(&self, field: SupplierField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn touch(&mut self, field: SupplierField) {
        self.touched.insert(field);
    }

    pub fn is_touched(&self, field: SupplierField) -> bool {
        self.touched.contains(&field)
    }

    pub fn touch_all(&mut self) {
        self.touched.extend(SupplierField::ALL);
    }

    pub fn errors(&self) -> FieldErrors {
        SupplierField::ALL
            .into_iter()
            .filter_map(|field| validate_field(field, self.value(field)).map(|err| (field, err)))
            .collect()
    }

    /// The error to render for `field`, if it has been touched.
    pub fn field_error(&self, field: SupplierField) -> Option<FieldError> {
        if !self.is_touched(field) {
            return None;
        }
        validate_field(field, self.value(field))
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Marks every field as touched and returns normalized values when the
    /// form is valid.
    pub fn submit(&mut self) -> Result<SupplierFields, FieldErrors> {
        self.touch_all();
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SupplierFields {
            name: self.value(SupplierField::Name).trim().to_string(),
            tax_id: self.optional(SupplierField::TaxId),
            email: self.optional(SupplierField::Email),
            phone: self.optional(SupplierField::Phone),
            city: self.optional(SupplierField::City),
            address: self.optional(SupplierField::Address),
            postal_code: self.optional(SupplierField::PostalCode),
            bank_account: self.optional(SupplierField::BankAccount),
            notes: self.optional(SupplierField::Notes),
        })
    }

    fn optional(&self, field: SupplierField) -> Option<String> {
        let value = self.value(field).trim();
        if value.is_empty() {
            return None;
        }
        match field {
            SupplierField::BankAccount => Some(strip_whitespace(value).to_ascii_uppercase()),
            _ => Some(value.to_string()),
        }
    }
}

pub fn validate_field(field: SupplierField, raw: &str) -> Option<FieldError> {
    let value = raw.trim();
    match field {
        SupplierField::Name => {
            if value.is_empty() {
                Some(FieldError::Required)
            } else {
                check_len(value, MAX_NAME_LEN)
            }
        }
        _ if value.is_empty() => None,
        SupplierField::TaxId => check_len(value, MAX_TAX_ID_LEN),
        SupplierField::City => check_len(value, MAX_CITY_LEN),
        SupplierField::Email => {
            (!EMAIL_PATTERN.is_match(value)).then_some(FieldError::InvalidEmail)
        }
        SupplierField::PostalCode => check_len(value, MAX_POSTAL_CODE_LEN).or_else(|| {
            (!POSTAL_CODE_PATTERN.is_match(value)).then_some(FieldError::InvalidPostalCode)
        }),
        SupplierField::BankAccount => (!BANK_ACCOUNT_PATTERN.is_match(&strip_whitespace(value)))
            .then_some(FieldError::InvalidBankAccount),
        SupplierField::Phone | SupplierField::Address | SupplierField::Notes => None,
    }
}

fn check_len(value: &str, max: usize) -> Option<FieldError> {
    (value.chars().count() > max).then_some(FieldError::TooLong { max })
}

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
