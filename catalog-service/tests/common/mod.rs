#![allow(dead_code)]

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenDigest;
use auth::TokenScope;
use catalog_service::domain::access::Authenticator;
use catalog_service::domain::access::Authorizer;
use catalog_service::domain::errors::StorageError;
use catalog_service::domain::movie::errors::MovieError;
use catalog_service::domain::movie::models::Movie;
use catalog_service::domain::movie::models::MovieFilter;
use catalog_service::domain::movie::models::MovieId;
use catalog_service::domain::movie::models::NewMovie;
use catalog_service::domain::movie::models::SortColumn;
use catalog_service::domain::movie::ports::MovieRepository;
use catalog_service::domain::movie::service::MovieService;
use catalog_service::domain::notification::errors::MailerError;
use catalog_service::domain::notification::models::Email;
use catalog_service::domain::notification::models::EmailTemplate;
use catalog_service::domain::notification::ports::Mailer;
use catalog_service::domain::permission::models::Permissions;
use catalog_service::domain::permission::ports::PermissionRepository;
use catalog_service::domain::token::models::TokenRecord;
use catalog_service::domain::token::ports::TokenRepository;
use catalog_service::domain::token::service::TokenService;
use catalog_service::domain::user::errors::UserError;
use catalog_service::domain::user::models::EmailAddress;
use catalog_service::domain::user::models::NewUser;
use catalog_service::domain::user::models::User;
use catalog_service::domain::user::models::UserId;
use catalog_service::domain::user::ports::UserRepository;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::create_router;
use catalog_service::inbound::http::AppState;
use catalog_service::inbound::http::HttpMetrics;
use catalog_service::inbound::http::RateLimiter;
use catalog_service::lifecycle::serve;
use catalog_service::lifecycle::ServeError;
use catalog_service::lifecycle::ShutdownCoordinator;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Storage double backing every repository port with plain collections
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    users: HashMap<i64, User>,
    tokens: Vec<TokenRecord>,
    grants: HashMap<UserId, HashSet<String>>,
    movies: HashMap<i64, Movie>,
    next_user_id: i64,
    next_movie_id: i64,
}

impl InMemoryStore {
    pub fn grant(&self, user_id: UserId, code: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .grants
            .entry(user_id)
            .or_default()
            .insert(code.to_string());
    }

    pub fn user_id(&self, email: &str) -> Option<UserId> {
        let state = self.state.lock().unwrap();
        state
            .users
            .values()
            .find(|u| u.email.as_str() == email)
            .map(|u| u.id)
    }

    /// Push every `scope` token of `user_id` into the past.
    pub fn expire_all(&self, user_id: UserId, scope: TokenScope) {
        let mut state = self.state.lock().unwrap();
        let past = Utc::now() - chrono::Duration::seconds(1);
        for token in state
            .tokens
            .iter_mut()
            .filter(|t| t.user_id == user_id && t.scope == scope)
        {
            token.expiry = past;
        }
    }

    pub fn token_count(&self, user_id: UserId, scope: TokenScope) -> usize {
        let state = self.state.lock().unwrap();
        state
            .tokens
            .iter()
            .filter(|t| t.user_id == user_id && t.scope == scope)
            .count()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.lock().unwrap();
        if state.users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail);
        }

        state.next_user_id += 1;
        let created = User {
            id: UserId(state.next_user_id),
            created_at: Utc::now(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            activated: false,
            version: 1,
        };
        state.users.insert(created.id.0, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.lock().unwrap().users.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_for_token(
        &self,
        scope: TokenScope,
        digest: &TokenDigest,
    ) -> Result<Option<User>, UserError> {
        let state = self.state.lock().unwrap();
        let now = Utc::now();
        Ok(state
            .tokens
            .iter()
            .find(|t| t.scope == scope && &t.digest == digest && t.expiry > now)
            .and_then(|t| state.users.get(&t.user_id.0).cloned()))
    }

    async fn update(&self, mut user: User) -> Result<User, UserError> {
        let mut state = self.state.lock().unwrap();
        match state.users.get(&user.id.0) {
            Some(stored) if stored.version == user.version => {}
            _ => return Err(UserError::EditConflict),
        }
        user.version += 1;
        state.users.insert(user.id.0, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn insert(&self, token: &TokenRecord) -> Result<(), StorageError> {
        self.state.lock().unwrap().tokens.push(token.clone());
        Ok(())
    }

    async fn delete_all_for_user(
        &self,
        scope: TokenScope,
        user_id: UserId,
    ) -> Result<(), StorageError> {
        self.state
            .lock()
            .unwrap()
            .tokens
            .retain(|t| !(t.scope == scope && t.user_id == user_id));
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for InMemoryStore {
    async fn get_all_for_user(&self, user_id: UserId) -> Result<Permissions, StorageError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .grants
            .get(&user_id)
            .map(|codes| Permissions::new(codes.iter().cloned()))
            .unwrap_or_default())
    }

    async fn add_for_user(
        &self,
        user_id: UserId,
        codes: &[&'static str],
    ) -> Result<(), StorageError> {
        for code in codes {
            self.grant(user_id, code);
        }
        Ok(())
    }
}

#[async_trait]
impl MovieRepository for InMemoryStore {
    async fn insert(&self, movie: NewMovie) -> Result<Movie, MovieError> {
        let mut state = self.state.lock().unwrap();
        state.next_movie_id += 1;
        let created = Movie {
            id: MovieId(state.next_movie_id),
            created_at: Utc::now(),
            title: movie.title,
            year: movie.year,
            runtime: movie.runtime,
            genres: movie.genres,
            version: 1,
        };
        state.movies.insert(created.id.0, created.clone());
        Ok(created)
    }

    async fn get(&self, id: MovieId) -> Result<Option<Movie>, MovieError> {
        Ok(self.state.lock().unwrap().movies.get(&id.0).cloned())
    }

    async fn list(&self, filter: &MovieFilter) -> Result<(Vec<Movie>, u64), MovieError> {
        let state = self.state.lock().unwrap();
        let mut matching: Vec<Movie> = state
            .movies
            .values()
            .filter(|m| match &filter.title {
                Some(title) => m
                    .title
                    .as_str()
                    .to_lowercase()
                    .contains(&title.to_lowercase()),
                None => true,
            })
            .filter(|m| filter.genres.iter().all(|g| m.genres.as_slice().contains(g)))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match filter.sort.column {
                SortColumn::Id => a.id.cmp(&b.id),
                SortColumn::Title => a.title.as_str().cmp(b.title.as_str()),
                SortColumn::Year => a.year.value().cmp(&b.year.value()),
                SortColumn::Runtime => a.runtime.minutes().cmp(&b.runtime.minutes()),
            };
            let ordering = if filter.sort.descending {
                ordering.reverse()
            } else {
                ordering
            };
            ordering.then(a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, movie: &Movie) -> Result<i32, MovieError> {
        let mut state = self.state.lock().unwrap();
        match state.movies.get(&movie.id.0) {
            Some(stored) if stored.version == movie.version => {}
            _ => return Err(MovieError::EditConflict),
        }
        let mut updated = movie.clone();
        updated.version += 1;
        let version = updated.version;
        state.movies.insert(updated.id.0, updated);
        Ok(version)
    }

    async fn delete(&self, id: MovieId) -> Result<(), MovieError> {
        match self.state.lock().unwrap().movies.remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(MovieError::NotFound),
        }
    }
}

/// Mailer double that keeps every message and can be slowed down
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
    delay: Duration,
}

impl RecordingMailer {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            delay,
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }

    /// Latest token mailed to `recipient` with a template named `template`.
    pub fn token_for(&self, recipient: &str, template: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|email| email.recipient.as_str() == recipient)
            .filter(|email| email.template.name() == template)
            .map(|email| match &email.template {
                EmailTemplate::Welcome {
                    activation_token, ..
                } => activation_token.clone(),
                EmailTemplate::Activation {
                    activation_token, ..
                } => activation_token.clone(),
                EmailTemplate::PasswordReset { reset_token, .. } => reset_token.clone(),
            })
            .next()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), MailerError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub struct TestOptions {
    pub limiter_rps: f64,
    pub limiter_burst: u32,
    pub limiter_enabled: bool,
    pub mail_delay: Duration,
    pub drain_timeout: Duration,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            limiter_rps: 2.0,
            limiter_burst: 4,
            limiter_enabled: false,
            mail_delay: Duration::ZERO,
            drain_timeout: Duration::from_secs(5),
        }
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub coordinator: Arc<ShutdownCoordinator>,
    pub metrics: Arc<HttpMetrics>,
    pub api_client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<Result<(), ServeError>>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(options: TestOptions) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryStore::default());
        let mailer = Arc::new(RecordingMailer::with_delay(options.mail_delay));
        let coordinator = Arc::new(ShutdownCoordinator::new(options.drain_timeout));
        let metrics = Arc::new(HttpMetrics::new().expect("metrics registry"));

        let token_service = Arc::new(TokenService::new(Arc::clone(&store)));
        let user_service = UserService::new(Arc::clone(&store), Arc::clone(&store), token_service)
            .with_password_hasher(PasswordHasher::with_cost(1024, 1, 1).unwrap());

        let state = AppState {
            user_service: Arc::new(user_service),
            movie_service: Arc::new(MovieService::new(Arc::clone(&store))),
            authenticator: Arc::new(Authenticator::new(Arc::clone(&store))),
            authorizer: Arc::new(Authorizer::new(Arc::clone(&store))),
            rate_limiter: Arc::new(RateLimiter::new(
                options.limiter_rps,
                options.limiter_burst,
                options.limiter_enabled,
            )),
            metrics: Arc::clone(&metrics),
            mailer: mailer.clone(),
            coordinator: Arc::clone(&coordinator),
            environment: "test".to_string(),
        };

        let (shutdown, trigger) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(
            listener,
            create_router(state),
            Arc::clone(&coordinator),
            async move {
                let _ = trigger.await;
                "test"
            },
        ));

        Self {
            address,
            store,
            mailer,
            coordinator,
            metrics,
            api_client: reqwest::Client::new(),
            shutdown: Some(shutdown),
            server: Some(server),
        }
    }

    /// Fire the shutdown trigger and wait for `serve` to return.
    pub async fn shutdown(&mut self) -> Result<(), ServeError> {
        if let Some(trigger) = self.shutdown.take() {
            let _ = trigger.send(());
        }
        self.server
            .take()
            .expect("server already shut down")
            .await
            .expect("server task panicked")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make PUT request
    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path))
    }

    /// Helper to make PATCH request
    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.patch(self.url(path))
    }

    /// Helper to make DELETE request
    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path))
    }

    /// Wait for the background mail carrying a token to land.
    pub async fn wait_for_token(&self, recipient: &str, template: &str) -> String {
        for _ in 0..200 {
            if let Some(token) = self.mailer.token_for(recipient, template) {
                return token;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no {} email sent to {}", template, recipient);
    }

    /// Wait for a token of `template` that differs from `previous`.
    pub async fn wait_for_fresh_token(
        &self,
        recipient: &str,
        template: &str,
        previous: &str,
    ) -> String {
        for _ in 0..200 {
            match self.mailer.token_for(recipient, template) {
                Some(token) if token != previous => return token,
                _ => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
        panic!("no fresh {} email sent to {}", template, recipient);
    }

    /// Register a user and return the response body.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Value {
        let response = self
            .post("/v1/users")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
        response.json().await.expect("Failed to parse response")
    }

    /// Register and activate a user, grant `codes`, and return a bearer token.
    pub async fn signed_in_user(&self, email: &str, codes: &[&str]) -> String {
        let body = self.register("Test User", email, "pa55word!").await;
        let user_id = UserId(body["data"]["id"].as_i64().expect("user id"));

        let token = self.wait_for_token(email, "user_welcome").await;
        let response = self
            .put("/v1/users/activated")
            .json(&json!({ "token": token }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        for code in codes {
            self.store.grant(user_id, code);
        }

        self.login(email, "pa55word!").await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/v1/tokens/authentication")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("token in response")
            .to_string()
    }

    /// Create a movie as `token` and return its id.
    pub async fn create_movie(&self, token: &str, title: &str, year: i32, genres: &[&str]) -> i64 {
        let response = self
            .post("/v1/movies")
            .bearer_auth(token)
            .json(&json!({
                "title": title,
                "year": year,
                "runtime": "102 mins",
                "genres": genres,
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("movie id")
    }
}
