use crate::shared::errors::AppError;
use chrono::{Datelike, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(AppError::validation(format!("Genre inconnu: {other}"))),
        }
    }
}

/// Whether a member is expected to pay dues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuesStatus {
    /// Pays the monthly dues
    ActivePayer,
    /// Exempt from dues
    NonPayer,
}

impl DuesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuesStatus::ActivePayer => "active_payer",
            DuesStatus::NonPayer => "non_payer",
        }
    }
}

impl fmt::Display for DuesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuesStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active_payer" => Ok(DuesStatus::ActivePayer),
            "non_payer" => Ok(DuesStatus::NonPayer),
            other => Err(AppError::validation(format!(
                "Statut de cotisation inconnu: {other}"
            ))),
        }
    }
}

macro_rules! text_enum_sql {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: AppError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum_sql!(Gender);
text_enum_sql!(DuesStatus);

/// A registered member of the dahira
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub address: String,
    pub phone: String,
    pub section: String,
    pub sub_section: Option<String>,
    /// Date the dues obligation begins
    pub join_date: NaiveDate,
    /// Initial lump sum, amortized over the rest of the join year
    pub sass_amount: i64,
    pub dues_status: DuesStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active_payer(&self) -> bool {
        self.dues_status == DuesStatus::ActivePayer
    }

    pub fn join_year(&self) -> i32 {
        self.join_date.year()
    }
}

/// Fields for registering a member
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemberDto {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub address: String,
    pub phone: String,
    pub section: String,
    pub sub_section: Option<String>,
    pub join_date: NaiveDate,
    pub sass_amount: i64,
    pub dues_status: DuesStatus,
}

/// Fields for editing a member; `None` keeps the stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemberDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub section: Option<String>,
    pub sub_section: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub sass_amount: Option<i64>,
    pub dues_status: Option<DuesStatus>,
}

/// Member list filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberFilter {
    /// Case-insensitive match on "first last" name, or substring of the phone
    pub search: Option<String>,
    /// Exact section
    pub section: Option<String>,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(search) => {
                member
                    .full_name()
                    .to_lowercase()
                    .contains(&search.to_lowercase())
                    || member.phone.contains(search)
            }
        };
        let matches_section = match self.section.as_deref() {
            None => true,
            Some(section) => member.section == section,
        };
        matches_search && matches_section
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_member() -> Member {
        Member {
            id: 1,
            first_name: "Awa".to_string(),
            last_name: "Diop".to_string(),
            gender: Gender::Female,
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 12).unwrap(),
            birth_place: "Thiès".to_string(),
            address: "Rue 10, Médina".to_string(),
            phone: "771234567".to_string(),
            section: "Médina".to_string(),
            sub_section: None,
            join_date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
            sass_amount: 12000,
            dues_status: DuesStatus::ActivePayer,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("homme".parse::<Gender>().is_err());

        assert_eq!(
            "non_payer".parse::<DuesStatus>().unwrap(),
            DuesStatus::NonPayer
        );
        assert_eq!(DuesStatus::ActivePayer.to_string(), "active_payer");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&DuesStatus::ActivePayer).unwrap();
        assert_eq!(json, "\"active_payer\"");
    }

    #[test]
    fn test_filter_matches_name_and_phone() {
        let member = sample_member();

        let by_name = MemberFilter {
            search: Some("awa d".to_string()),
            section: None,
        };
        assert!(by_name.matches(&member));

        let by_phone = MemberFilter {
            search: Some("1234".to_string()),
            section: None,
        };
        assert!(by_phone.matches(&member));

        let other = MemberFilter {
            search: Some("fall".to_string()),
            section: None,
        };
        assert!(!other.matches(&member));
    }

    #[test]
    fn test_filter_by_section() {
        let member = sample_member();

        let same = MemberFilter {
            search: None,
            section: Some("Médina".to_string()),
        };
        assert!(same.matches(&member));

        let different = MemberFilter {
            search: Some(String::new()),
            section: Some("Pikine".to_string()),
        };
        assert!(!different.matches(&member));
    }
}
