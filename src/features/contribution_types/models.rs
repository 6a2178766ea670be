use crate::features::members::models::Gender;
use crate::shared::errors::AppError;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

const CUSTOM_KEY_PREFIX: &str = "custom:";

/// Built-in contribution types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardContributionType {
    /// Flat social fee
    Social,
    /// Gender-differentiated monthly fee
    Monthly,
    /// Adult/child differentiated fee
    SassWerBi,
    /// The member's amortized Sass share
    SassMonthly,
    /// Voluntary deposit
    Dekhane,
    /// Voluntary donation
    Alarba,
}

impl StandardContributionType {
    pub const ALL: [StandardContributionType; 6] = [
        StandardContributionType::Social,
        StandardContributionType::Monthly,
        StandardContributionType::SassWerBi,
        StandardContributionType::SassMonthly,
        StandardContributionType::Dekhane,
        StandardContributionType::Alarba,
    ];

    pub const SOCIAL_FEE: i64 = 500;
    pub const MONTHLY_FEE_MALE: i64 = 1000;
    pub const MONTHLY_FEE_FEMALE: i64 = 500;
    pub const SASS_WER_BI_ADULT: i64 = 1000;
    pub const SASS_WER_BI_CHILD: i64 = 500;

    pub fn key(&self) -> &'static str {
        match self {
            StandardContributionType::Social => "social",
            StandardContributionType::Monthly => "monthly",
            StandardContributionType::SassWerBi => "sass_wer_bi",
            StandardContributionType::SassMonthly => "sass_monthly",
            StandardContributionType::Dekhane => "dekhane",
            StandardContributionType::Alarba => "alarba",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StandardContributionType::Social => "Sociale",
            StandardContributionType::Monthly => "Mensuel",
            StandardContributionType::SassWerBi => "Sass Wer Bi",
            StandardContributionType::SassMonthly => "Sass Mensuel",
            StandardContributionType::Dekhane => "Dekhane",
            StandardContributionType::Alarba => "Alarba",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StandardContributionType::Social => "Cotisation sociale mensuelle (500 FCFA pour tous)",
            StandardContributionType::Monthly => {
                "Cotisation mensuelle (Hommes: 1000 FCFA, Femmes: 500 FCFA)"
            }
            StandardContributionType::SassWerBi => {
                "Sass Wer Bi mensuel (Adultes: 1000 FCFA, Enfants: 500 FCFA)"
            }
            StandardContributionType::SassMonthly => {
                "Part mensuelle du Sass, répartie sur les mois restants de l'année d'adhésion"
            }
            StandardContributionType::Dekhane => "Dépôt volontaire, montant libre",
            StandardContributionType::Alarba => "Don volontaire, montant libre",
        }
    }

    pub fn is_mandatory(&self) -> bool {
        !matches!(
            self,
            StandardContributionType::Dekhane | StandardContributionType::Alarba
        )
    }

    /// Fixed amount owed by a member of the given gender
    ///
    /// `None` for voluntary types and for the Sass share, which depends on
    /// the member's join date and lump sum.
    pub fn fixed_amount(&self, gender: Gender) -> Option<i64> {
        match self {
            StandardContributionType::Social => Some(Self::SOCIAL_FEE),
            StandardContributionType::Monthly => Some(match gender {
                Gender::Male => Self::MONTHLY_FEE_MALE,
                Gender::Female => Self::MONTHLY_FEE_FEMALE,
            }),
            // Members carry no age bracket, so the adult rate always applies.
            StandardContributionType::SassWerBi => Some(Self::SASS_WER_BI_ADULT),
            StandardContributionType::SassMonthly
            | StandardContributionType::Dekhane
            | StandardContributionType::Alarba => None,
        }
    }
}

/// A contribution type defined by the administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomContributionType {
    pub id: i64,
    pub label: String,
    pub description: String,
    /// Fixed amount; `None` means the amount is chosen at payment time
    pub amount: Option<i64>,
    pub mandatory: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Any contribution type, standard or custom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContributionTypeDefinition {
    Standard { contribution_type: StandardContributionType },
    Custom(CustomContributionType),
}

impl ContributionTypeDefinition {
    pub fn key(&self) -> ContributionTypeKey {
        match self {
            ContributionTypeDefinition::Standard { contribution_type } => {
                ContributionTypeKey::Standard(*contribution_type)
            }
            ContributionTypeDefinition::Custom(custom) => ContributionTypeKey::Custom(custom.id),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ContributionTypeDefinition::Standard { contribution_type } => contribution_type.label(),
            ContributionTypeDefinition::Custom(custom) => &custom.label,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ContributionTypeDefinition::Standard { contribution_type } => {
                contribution_type.description()
            }
            ContributionTypeDefinition::Custom(custom) => &custom.description,
        }
    }

    pub fn is_mandatory(&self) -> bool {
        match self {
            ContributionTypeDefinition::Standard { contribution_type } => {
                contribution_type.is_mandatory()
            }
            ContributionTypeDefinition::Custom(custom) => custom.mandatory,
        }
    }

    pub fn fixed_amount(&self, gender: Gender) -> Option<i64> {
        match self {
            ContributionTypeDefinition::Standard { contribution_type } => {
                contribution_type.fixed_amount(gender)
            }
            ContributionTypeDefinition::Custom(custom) => custom.amount,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ContributionTypeDefinition::Custom(_))
    }
}

impl From<StandardContributionType> for ContributionTypeDefinition {
    fn from(contribution_type: StandardContributionType) -> Self {
        ContributionTypeDefinition::Standard { contribution_type }
    }
}

/// Reference from a payment to its contribution type
///
/// Stored as the standard key (`monthly`) or `custom:<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContributionTypeKey {
    Standard(StandardContributionType),
    Custom(i64),
}

impl fmt::Display for ContributionTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContributionTypeKey::Standard(standard) => f.write_str(standard.key()),
            ContributionTypeKey::Custom(id) => write!(f, "{CUSTOM_KEY_PREFIX}{id}"),
        }
    }
}

impl FromStr for ContributionTypeKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(id) = s.strip_prefix(CUSTOM_KEY_PREFIX) {
            return id
                .parse::<i64>()
                .map(ContributionTypeKey::Custom)
                .map_err(|_| AppError::validation(format!("Type de cotisation inconnu: {s}")));
        }

        StandardContributionType::ALL
            .iter()
            .find(|standard| standard.key() == s)
            .map(|standard| ContributionTypeKey::Standard(*standard))
            .ok_or_else(|| AppError::validation(format!("Type de cotisation inconnu: {s}")))
    }
}

impl TryFrom<String> for ContributionTypeKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContributionTypeKey> for String {
    fn from(key: ContributionTypeKey) -> Self {
        key.to_string()
    }
}

impl ToSql for ContributionTypeKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for ContributionTypeKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: AppError| FromSqlError::Other(Box::new(e)))
    }
}

/// Fields for creating a custom contribution type
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomContributionTypeDto {
    pub label: String,
    pub description: String,
    pub amount: Option<i64>,
    pub mandatory: bool,
}

/// Fields for editing a custom contribution type
///
/// `amount: Some(None)` clears the fixed amount. In JSON an absent `amount`
/// keeps the stored value and `"amount": null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomContributionTypeDto {
    pub label: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub amount: Option<Option<i64>>,
    pub mandatory: Option<bool>,
}

/// Marks a present field as `Some`, so an explicit `null` becomes `Some(None)`
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}
