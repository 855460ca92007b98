//! Directory entities: sedes, rooms and users

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Clinic location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sede {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
}

/// Rentable room (box) inside a sede
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: i32,
    pub sede_id: i32,
    pub name: String,
    pub is_active: bool,
}

impl Room {
    /// Room must be active and, when `sede_id` is given, belong to it.
    pub fn ensure_bookable(&self, sede_id: Option<i32>) -> DomainResult<()> {
        if !self.is_active {
            return Err(DomainError::Validation(format!(
                "room {} ({}) is not active",
                self.id, self.name
            )));
        }
        if let Some(sede_id) = sede_id {
            if self.sede_id != sede_id {
                return Err(DomainError::Validation(format!(
                    "room {} ({}) does not belong to sede {}",
                    self.id, self.name, sede_id
                )));
            }
        }
        Ok(())
    }
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    #[default]
    Psychologist,
    Patient,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Psychologist => "psychologist",
            Self::Patient => "patient",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "psychologist" => Ok(Self::Psychologist),
            "patient" => Ok(Self::Patient),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::Validation(format!("unknown role '{}'", other))),
        }
    }
}

/// User model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn ensure_active(&self) -> DomainResult<()> {
        if !self.is_active {
            return Err(DomainError::Validation(format!(
                "user {} is not active",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(active: bool) -> Room {
        Room {
            id: 1,
            sede_id: 10,
            name: "Box 1".into(),
            is_active: active,
        }
    }

    #[test]
    fn test_room_bookable_checks() {
        assert!(room(true).ensure_bookable(None).is_ok());
        assert!(room(true).ensure_bookable(Some(10)).is_ok());
        assert!(room(true).ensure_bookable(Some(11)).is_err());
        assert!(room(false).ensure_bookable(None).is_err());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("operator".parse::<UserRole>().is_err());
        assert_eq!(UserRole::default(), UserRole::Psychologist);
    }
}
