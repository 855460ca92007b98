//! Pack definition entity

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Subscription pack sold to professionals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackDefinition {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Hours of room time included; caps non-recurring assignments
    pub included_hours: i32,
    /// Total price in minor currency units
    pub price: i64,
    /// ISO 4217 code
    pub currency: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PackDefinition {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        included_hours: i32,
        price: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            description,
            included_hours,
            price,
            currency: currency.into().to_uppercase(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("pack name must not be empty"));
        }
        if self.included_hours < 0 {
            return Err(DomainError::validation("included hours must not be negative"));
        }
        if self.price < 0 {
            return Err(DomainError::validation("price must not be negative"));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::Validation(format!(
                "currency must be a 3-letter ISO code, got '{}'",
                self.currency
            )));
        }
        Ok(())
    }

    /// Included time in minutes, or `None` when the pack is unlimited.
    pub fn included_minutes(&self) -> Option<i64> {
        (self.included_hours > 0).then(|| i64::from(self.included_hours) * 60)
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    pub fn ensure_assignable(&self) -> DomainResult<()> {
        if !self.is_active {
            return Err(DomainError::Validation(format!(
                "pack {} is not active",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pack_is_active_and_valid() {
        let pack = PackDefinition::new("Mensual", None, 16, 120_000, "clp");
        assert!(pack.is_active);
        assert_eq!(pack.currency, "CLP");
        assert!(pack.validate().is_ok());
        assert_eq!(pack.included_minutes(), Some(960));
    }

    #[test]
    fn test_validation_failures() {
        let mut pack = PackDefinition::new("  ", None, 4, 100, "CLP");
        assert!(pack.validate().is_err());

        pack.name = "Pack".into();
        pack.price = -1;
        assert!(pack.validate().is_err());

        pack.price = 100;
        pack.currency = "PESO".into();
        assert!(pack.validate().is_err());

        pack.currency = "CLP".into();
        pack.included_hours = -2;
        assert!(pack.validate().is_err());
    }

    #[test]
    fn test_deactivated_pack_cannot_be_assigned() {
        let mut pack = PackDefinition::new("Pack", None, 0, 100, "CLP");
        assert!(pack.ensure_assignable().is_ok());
        assert_eq!(pack.included_minutes(), None);
        pack.deactivate();
        assert!(pack.ensure_assignable().is_err());
    }
}
