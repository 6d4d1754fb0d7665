use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A tracked worker, enriched from the people-lookup service at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub passport: String,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub address: String,
}

/// Person details returned by the people-lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonInfo {
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub address: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PassportError {
    #[error("passport must be \"NNNN NNNNNN\"")]
    Malformed,
}

/// Passport identity in the national "series number" form: a 4-digit series
/// and a 6-digit number separated by a single space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passport {
    pub series: u16,
    pub number: u32,
}

impl Passport {
    pub fn parse(raw: &str) -> Result<Self, PassportError> {
        let (series, number) = raw.split_once(' ').ok_or(PassportError::Malformed)?;
        if series.len() != 4 || number.len() != 6 {
            return Err(PassportError::Malformed);
        }
        let series = series.parse().map_err(|_| PassportError::Malformed)?;
        let number = number.parse().map_err(|_| PassportError::Malformed)?;
        Ok(Self { series, number })
    }
}

impl std::fmt::Display for Passport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04} {:06}", self.series, self.number)
    }
}

/// Per-field substring filters for user search. All present fields must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub id: Option<Uuid>,
    pub passport: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
}

/// Sparse update: only present fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub passport: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.passport.is_none()
            && self.name.is_none()
            && self.surname.is_none()
            && self.patronymic.is_none()
            && self.address.is_none()
    }
}

/// One page of filtered users plus the unpaged match count.
#[derive(Debug, Clone, Default)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: i64,
}

#[cfg(test)]
mod passport_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_parse_a_well_formed_passport() {
        let passport = Passport::parse("1234 567890").unwrap();
        assert_eq!(passport.series, 1234);
        assert_eq!(passport.number, 567890);
        assert_eq!(passport.to_string(), "1234 567890");
    }

    #[rstest]
    fn it_should_keep_leading_zeros_when_formatting() {
        let passport = Passport::parse("0012 000345").unwrap();
        assert_eq!(passport.to_string(), "0012 000345");
    }

    #[rstest]
    #[case("1234567890")]
    #[case("123 456789")]
    #[case("12345 67890")]
    #[case("1234 56789a")]
    #[case("1234  567890")]
    #[case("")]
    fn it_should_reject_malformed_passports(#[case] raw: &str) {
        assert_eq!(Passport::parse(raw), Err(PassportError::Malformed));
    }
}
