//! In-memory stand-ins for the external services.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use time::{Date, Duration, OffsetDateTime, macros::datetime};

use crate::{
    Error,
    auth::{AuthProvider, Session, User, UserId},
    news::{NewsArticle, NewsSource},
    transaction::{
        NewTransaction, Transaction, TransactionChanges, TransactionId, TransactionStore,
        TransactionType,
    },
};

/// A transaction of $10 spent by `user_id` on `date`.
pub(crate) fn test_transaction(id: &str, user_id: &UserId, date: Date) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        user_id: user_id.clone(),
        amount: 10.0,
        type_: TransactionType::Expense,
        description: "Test transaction".to_owned(),
        date,
        created_at: datetime!(2024-01-01 00:00:00 UTC),
    }
}

#[derive(Default)]
struct Tokens {
    access: HashMap<String, UserId>,
    refresh: HashMap<String, UserId>,
}

/// An auth provider that issues opaque tokens and remembers them.
#[derive(Default)]
pub(crate) struct FakeAuthProvider {
    users: HashMap<String, (String, UserId)>,
    tokens: Mutex<Tokens>,
    next_token: AtomicUsize,
    refresh_count: AtomicUsize,
    signed_out: Mutex<Vec<String>>,
    unreachable: AtomicBool,
}

impl FakeAuthProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a user that can sign in with `email` and `password`.
    pub(crate) fn with_user(mut self, email: &str, password: &str, user_id: UserId) -> Self {
        self.users
            .insert(email.to_owned(), (password.to_owned(), user_id));
        self
    }

    fn issue(&self, user_id: &UserId, expires_at: OffsetDateTime) -> Session {
        let token = self.next_token.fetch_add(1, Ordering::SeqCst);
        let session = Session {
            access_token: format!("access-{token}"),
            refresh_token: format!("refresh-{token}"),
            user_id: user_id.clone(),
            expires_at,
        };

        let mut tokens = self.tokens.lock().unwrap();
        tokens
            .access
            .insert(session.access_token.clone(), user_id.clone());
        tokens
            .refresh
            .insert(session.refresh_token.clone(), user_id.clone());

        session
    }

    /// Start a session for `user_id` that is valid for the next hour.
    pub(crate) fn issue_session(&self, user_id: &UserId) -> Session {
        self.issue(user_id, OffsetDateTime::now_utc() + Duration::hours(1))
    }

    /// Start a session for `user_id` whose access token has already expired
    /// but whose refresh token is still accepted.
    pub(crate) fn issue_expired_session(&self, user_id: &UserId) -> Session {
        self.issue(user_id, OffsetDateTime::now_utc() - Duration::minutes(1))
    }

    /// How many times a session refresh was requested.
    pub(crate) fn refresh_count(&self) -> usize {
        self.refresh_count.load(Ordering::SeqCst)
    }

    /// Make every user lookup fail as if the auth provider could not be reached.
    pub(crate) fn fail_user_lookups(&self) {
        self.unreachable.store(true, Ordering::SeqCst);
    }

    /// The access tokens that were signed out, oldest first.
    pub(crate) fn signed_out_tokens(&self) -> Vec<String> {
        self.signed_out.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        match self.users.get(email) {
            Some((want_password, user_id)) if want_password == password => {
                Ok(self.issue_session(user_id))
            }
            _ => Err(Error::InvalidCredentials),
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, Error> {
        self.refresh_count.fetch_add(1, Ordering::SeqCst);
        let user_id = self
            .tokens
            .lock()
            .unwrap()
            .refresh
            .remove(refresh_token)
            .ok_or(Error::Unauthenticated)?;

        Ok(self.issue_session(&user_id))
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<User>, Error> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(Error::AuthRequest("connection refused".to_owned()));
        }

        let tokens = self.tokens.lock().unwrap();

        Ok(tokens.access.get(access_token).map(|user_id| User {
            id: user_id.clone(),
            email: None,
        }))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), Error> {
        self.tokens.lock().unwrap().access.remove(access_token);
        self.signed_out
            .lock()
            .unwrap()
            .push(access_token.to_owned());

        Ok(())
    }
}

/// A transaction store that keeps every user's transactions in memory.
#[derive(Default)]
pub(crate) struct InMemoryTransactionStore {
    transactions: Mutex<Vec<Transaction>>,
    inserted: Mutex<Vec<NewTransaction>>,
    request_count: AtomicUsize,
    fail_next: AtomicBool,
}

impl InMemoryTransactionStore {
    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            ..Self::default()
        }
    }

    /// Add `transaction` without counting it as a request.
    pub(crate) fn seed(&self, transaction: Transaction) {
        self.transactions.lock().unwrap().push(transaction);
    }

    /// Make the next call fail as if the data store returned a server error.
    pub(crate) fn fail_next_request(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Every transaction passed to [TransactionStore::insert], in order.
    pub(crate) fn inserted(&self) -> Vec<NewTransaction> {
        self.inserted.lock().unwrap().clone()
    }

    /// The number of calls made through [TransactionStore].
    pub(crate) fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Every stored transaction regardless of owner.
    pub(crate) fn all(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    fn begin_request(&self) -> Result<(), Error> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(Error::StoreResponse {
                status: 500,
                body: "simulated failure".to_owned(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(
        &self,
        _session: &Session,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        self.begin_request()?;
        self.inserted.lock().unwrap().push(transaction.clone());

        let mut transactions = self.transactions.lock().unwrap();
        let stored = Transaction {
            id: TransactionId::new(format!("created-{}", transactions.len() + 1)),
            user_id: transaction.user_id,
            amount: transaction.amount,
            type_: transaction.type_,
            description: transaction.description,
            date: transaction.date,
            created_at: OffsetDateTime::now_utc(),
        };
        transactions.push(stored.clone());

        Ok(stored)
    }

    async fn list(&self, session: &Session) -> Result<Vec<Transaction>, Error> {
        self.begin_request()?;

        let mut listed: Vec<_> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|transaction| transaction.user_id == session.user_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(listed)
    }

    async fn update(
        &self,
        session: &Session,
        id: &TransactionId,
        changes: TransactionChanges,
    ) -> Result<Transaction, Error> {
        self.begin_request()?;

        let mut transactions = self.transactions.lock().unwrap();
        let transaction = transactions
            .iter_mut()
            .find(|transaction| &transaction.id == id && transaction.user_id == session.user_id)
            .ok_or(Error::UpdateMissingTransaction)?;

        transaction.amount = changes.amount;
        transaction.type_ = changes.type_;
        transaction.description = changes.description;
        transaction.date = changes.date;

        Ok(transaction.clone())
    }

    async fn delete(&self, session: &Session, id: &TransactionId) -> Result<(), Error> {
        self.begin_request()?;

        let mut transactions = self.transactions.lock().unwrap();
        let position = transactions
            .iter()
            .position(|transaction| &transaction.id == id && transaction.user_id == session.user_id)
            .ok_or(Error::DeleteMissingTransaction)?;
        transactions.remove(position);

        Ok(())
    }
}

/// A news source that returns a fixed list of articles or always fails.
pub(crate) struct FakeNewsSource {
    articles: Option<Vec<NewsArticle>>,
}

impl FakeNewsSource {
    pub(crate) fn with_articles(articles: Vec<NewsArticle>) -> Self {
        Self {
            articles: Some(articles),
        }
    }

    pub(crate) fn failing() -> Self {
        Self { articles: None }
    }
}

#[async_trait]
impl NewsSource for FakeNewsSource {
    async fn top_headlines(&self) -> Result<Vec<NewsArticle>, Error> {
        self.articles.clone().ok_or(Error::NewsResponse(500))
    }
}
