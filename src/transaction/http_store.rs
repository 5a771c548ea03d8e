//! A [TransactionStore] backed by the hosted platform's PostgREST API.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    Error,
    auth::Session,
    transaction::{NewTransaction, Transaction, TransactionChanges, TransactionId, TransactionStore},
};

const TRANSACTIONS_TABLE: &str = "transactions";

/// Reads and writes the `transactions` table through `/rest/v1`.
#[derive(Debug, Clone)]
pub struct HttpTransactionStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransactionStore {
    /// Create a store for the platform at `base_url`, identifying the app
    /// with `api_key`.
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{TRANSACTIONS_TABLE}", self.base_url)
    }

    /// Attach the headers every data store request needs.
    fn authorize(&self, request: RequestBuilder, session: &Session) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, Error> {
        let response = request
            .send()
            .await
            .map_err(|error| Error::StoreRequest(error.to_string()))?;

        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::StoreResponse {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|error| Error::StoreRequest(error.to_string()))
    }
}

#[async_trait]
impl TransactionStore for HttpTransactionStore {
    async fn insert(
        &self,
        session: &Session,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let request = self
            .authorize(self.http.post(self.table_url()), session)
            .header("Prefer", "return=representation")
            .json(&transaction);

        let mut rows: Vec<Transaction> = Self::send(request).await?;

        rows.pop().ok_or_else(|| Error::StoreResponse {
            status: 201,
            body: "insert returned no rows".to_owned(),
        })
    }

    async fn list(&self, session: &Session) -> Result<Vec<Transaction>, Error> {
        let request = self
            .authorize(self.http.get(self.table_url()), session)
            .query(&[("select", "*"), ("order", "date.desc,created_at.desc")]);

        Self::send(request).await
    }

    async fn update(
        &self,
        session: &Session,
        id: &TransactionId,
        changes: TransactionChanges,
    ) -> Result<Transaction, Error> {
        let request = self
            .authorize(self.http.patch(self.table_url()), session)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&changes);

        let mut rows: Vec<Transaction> = Self::send(request).await?;

        rows.pop().ok_or(Error::UpdateMissingTransaction)
    }

    async fn delete(&self, session: &Session, id: &TransactionId) -> Result<(), Error> {
        let request = self
            .authorize(self.http.delete(self.table_url()), session)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");

        let rows: Vec<Transaction> = Self::send(request).await?;

        if rows.is_empty() {
            Err(Error::DeleteMissingTransaction)
        } else {
            Ok(())
        }
    }
}
