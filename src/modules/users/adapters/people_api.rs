// HTTP client for the external people-lookup service.
//
// Contract: GET {base}/info?passportSerie=NNNN&passportNumber=NNNNNN returns
// the person's details as JSON, 404 when the passport is unknown.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::modules::users::core::model::{Passport, PersonInfo};
use crate::modules::users::ports::{LookupError, PeopleLookup};

pub struct PeopleApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl PeopleApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PeopleLookup for PeopleApiClient {
    async fn lookup(&self, passport: &Passport) -> Result<PersonInfo, LookupError> {
        let response = self
            .http
            .get(format!("{}/info", self.base_url))
            .query(&[
                ("passportSerie", passport.series.to_string()),
                ("passportNumber", passport.number.to_string()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Backend(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound);
        }
        let response = response
            .error_for_status()
            .map_err(|e| LookupError::Backend(e.to_string()))?;
        response
            .json::<PersonInfo>()
            .await
            .map_err(|e| LookupError::Backend(e.to_string()))
    }
}
