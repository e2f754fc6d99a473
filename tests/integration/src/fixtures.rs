//! In-memory adapters for the storage and messaging ports
//!
//! They follow the Redis and PostgreSQL semantics the services rely on
//! (set add/remove report how many members changed, `HINCRBY` fails on
//! non-integer fields) and can be switched into a failing mode to simulate
//! an outage.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use blog_core::{
    Article, ArticleRepository, Comment, CommentRepository, DomainError, EmailJob, GeoLocator,
    GuestbookMessage, GuestbookRepository, KeyValueStore, MessageQueuePublisher, NewComment,
    NewGuestbookMessage, RepoResult, Talk, TalkRepository, UserInfo, UserInfoRepository,
    WebsiteConfig, WebsiteConfigRepository,
};
use chrono::Utc;
use parking_lot::Mutex;

// ============================================================================
// Key/value store
// ============================================================================

#[derive(Debug, Default)]
struct KvData {
    strings: HashMap<String, String>,
    hashes: HashMap<String, HashMap<String, String>>,
    sets: HashMap<String, BTreeSet<String>>,
    zsets: HashMap<String, HashMap<String, f64>>,
}

/// Redis stand-in
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    data: Mutex<KvData>,
    failing: AtomicBool,
    calls: AtomicU64,
    pending_write: Mutex<Option<(String, String, i64, i64)>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a cache error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of store calls made so far
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.data.lock().strings.get(key).cloned()
    }

    pub fn hash_field(&self, key: &str, field: &str) -> Option<String> {
        self.data
            .lock()
            .hashes
            .get(key)
            .and_then(|h| h.get(field))
            .cloned()
    }

    pub fn set_members(&self, key: &str) -> Vec<String> {
        self.data
            .lock()
            .sets
            .get(key)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Seed a hash field directly, bypassing the service layer
    pub fn seed_hash(&self, key: &str, field: &str, value: &str) {
        self.data
            .lock()
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    /// Seed a set member directly, bypassing the service layer
    pub fn seed_set(&self, key: &str, member: &str) {
        self.data
            .lock()
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
    }

    /// The next read of `key`/`field` returning `seen` is followed by a
    /// `delta` increment from another writer, before the caller resumes
    pub fn write_after_read(&self, key: &str, field: &str, seen: i64, delta: i64) {
        *self.pending_write.lock() = Some((key.to_string(), field.to_string(), seen, delta));
    }

    fn check(&self) -> RepoResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(DomainError::CacheError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn not_an_integer() -> DomainError {
    DomainError::CacheError("value is not an integer or out of range".to_string())
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        self.check()?;
        Ok(self.data.lock().strings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> RepoResult<()> {
        self.check()?;
        self.data
            .lock()
            .strings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> RepoResult<bool> {
        self.check()?;
        let mut data = self.data.lock();
        let removed = data.strings.remove(key).is_some()
            | data.hashes.remove(key).is_some()
            | data.sets.remove(key).is_some()
            | data.zsets.remove(key).is_some();
        Ok(removed)
    }

    async fn incr_by(&self, key: &str, delta: i64) -> RepoResult<i64> {
        self.check()?;
        let mut data = self.data.lock();
        let entry = data.strings.entry(key.to_string()).or_insert_with(|| "0".into());
        let value = entry.parse::<i64>().map_err(|_| not_an_integer())? + delta;
        *entry = value.to_string();
        Ok(value)
    }

    async fn decr_by(&self, key: &str, delta: i64) -> RepoResult<i64> {
        self.incr_by(key, -delta).await
    }

    async fn hget(&self, key: &str, field: &str) -> RepoResult<Option<String>> {
        self.check()?;
        let value = self.hash_field(key, field);

        let mut pending = self.pending_write.lock();
        let hit = pending.take_if(|(k, f, seen, _)| {
            k.as_str() == key
                && f.as_str() == field
                && value.as_deref() == Some(seen.to_string().as_str())
        });
        drop(pending);
        if let Some((_, _, seen, delta)) = hit {
            self.seed_hash(key, field, &(seen + delta).to_string());
        }

        Ok(value)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> RepoResult<()> {
        self.check()?;
        self.seed_hash(key, field, value);
        Ok(())
    }

    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> RepoResult<i64> {
        self.check()?;
        let mut data = self.data.lock();
        let entry = data
            .hashes
            .entry(key.to_string())
            .or_default()
            .entry(field.to_string())
            .or_insert_with(|| "0".into());
        let value = entry.parse::<i64>().map_err(|_| not_an_integer())? + delta;
        *entry = value.to_string();
        Ok(value)
    }

    async fn hget_all(&self, key: &str) -> RepoResult<HashMap<String, String>> {
        self.check()?;
        Ok(self.data.lock().hashes.get(key).cloned().unwrap_or_default())
    }

    async fn sadd(&self, key: &str, member: &str) -> RepoResult<u64> {
        self.check()?;
        let added = self
            .data
            .lock()
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(u64::from(added))
    }

    async fn srem(&self, key: &str, member: &str) -> RepoResult<u64> {
        self.check()?;
        let removed = self
            .data
            .lock()
            .sets
            .get_mut(key)
            .is_some_and(|set| set.remove(member));
        Ok(u64::from(removed))
    }

    async fn sismember(&self, key: &str, member: &str) -> RepoResult<bool> {
        self.check()?;
        Ok(self
            .data
            .lock()
            .sets
            .get(key)
            .is_some_and(|set| set.contains(member)))
    }

    async fn smembers(&self, key: &str) -> RepoResult<Vec<String>> {
        self.check()?;
        Ok(self.set_members(key))
    }

    async fn zincr_by(&self, key: &str, member: &str, delta: f64) -> RepoResult<f64> {
        self.check()?;
        let mut data = self.data.lock();
        let score = data
            .zsets
            .entry(key.to_string())
            .or_default()
            .entry(member.to_string())
            .or_insert(0.0);
        *score += delta;
        Ok(*score)
    }

    async fn zscore(&self, key: &str, member: &str) -> RepoResult<Option<f64>> {
        self.check()?;
        Ok(self
            .data
            .lock()
            .zsets
            .get(key)
            .and_then(|z| z.get(member))
            .copied())
    }

    async fn zrevrange_with_scores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> RepoResult<Vec<(String, f64)>> {
        self.check()?;
        let mut ranked: Vec<(String, f64)> = self
            .data
            .lock()
            .zsets
            .get(key)
            .map(|z| z.iter().map(|(m, s)| (m.clone(), *s)).collect())
            .unwrap_or_default();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        let start = usize::try_from(start.max(0)).unwrap_or_default();
        let stop = usize::try_from(stop.max(-1) + 1).unwrap_or_default();
        Ok(ranked
            .into_iter()
            .skip(start)
            .take(stop.saturating_sub(start))
            .collect())
    }
}

// ============================================================================
// Repositories
// ============================================================================

/// Comment table stand-in
#[derive(Debug)]
pub struct InMemoryCommentRepository {
    rows: Mutex<Vec<Comment>>,
    next_id: AtomicI64,
    failing: AtomicBool,
}

impl Default for InMemoryCommentRepository {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            failing: AtomicBool::new(false),
        }
    }
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Comment> {
        self.rows.lock().clone()
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DomainError::DatabaseError("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn insert(&self, comment: &NewComment) -> RepoResult<i64> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .push(comment.clone().into_comment(id, Utc::now()));
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Comment>> {
        self.check()?;
        Ok(self.rows.lock().iter().find(|c| c.id == id).cloned())
    }

    async fn update_review_status(&self, ids: &[i64], is_review: bool) -> RepoResult<u64> {
        self.check()?;
        let mut affected = 0;
        for row in self.rows.lock().iter_mut().filter(|c| ids.contains(&c.id)) {
            row.is_review = is_review;
            row.updated_at = Some(Utc::now());
            affected += 1;
        }
        Ok(affected)
    }

    async fn remove_by_ids(&self, ids: &[i64]) -> RepoResult<u64> {
        self.check()?;
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|c| !ids.contains(&c.id));
        Ok((before - rows.len()) as u64)
    }
}

/// Guestbook table stand-in
#[derive(Debug)]
pub struct InMemoryGuestbookRepository {
    rows: Mutex<Vec<GuestbookMessage>>,
    next_id: AtomicI64,
}

impl Default for InMemoryGuestbookRepository {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryGuestbookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<GuestbookMessage> {
        self.rows.lock().clone()
    }
}

#[async_trait]
impl GuestbookRepository for InMemoryGuestbookRepository {
    async fn insert(&self, message: &NewGuestbookMessage) -> RepoResult<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows
            .lock()
            .push(message.clone().into_message(id, Utc::now()));
        Ok(id)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<GuestbookMessage>> {
        Ok(self.rows.lock().iter().find(|m| m.id == id).cloned())
    }

    async fn update_review_status(&self, ids: &[i64], is_review: bool) -> RepoResult<u64> {
        let mut affected = 0;
        for row in self.rows.lock().iter_mut().filter(|m| ids.contains(&m.id)) {
            row.is_review = is_review;
            affected += 1;
        }
        Ok(affected)
    }

    async fn remove_by_ids(&self, ids: &[i64]) -> RepoResult<u64> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|m| !ids.contains(&m.id));
        Ok((before - rows.len()) as u64)
    }
}

/// Articles, talks and user profiles owned by the rest of the blog
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    articles: Mutex<HashMap<i64, Article>>,
    talks: Mutex<HashMap<i64, Talk>>,
    users: Mutex<HashMap<i64, UserInfo>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_article(&self, id: i64, author_id: i64) {
        self.articles.lock().insert(
            id,
            Article {
                id,
                user_id: author_id,
                title: format!("Article {id}"),
            },
        );
    }

    pub fn add_talk(&self, id: i64, author_id: i64) {
        self.talks.lock().insert(
            id,
            Talk {
                id,
                user_id: author_id,
            },
        );
    }

    pub fn add_user(&self, id: i64, email: Option<&str>) {
        self.users.lock().insert(
            id,
            UserInfo {
                id,
                nickname: format!("user{id}"),
                email: email.map(str::to_string),
                avatar: None,
            },
        );
    }
}

#[async_trait]
impl ArticleRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Article>> {
        Ok(self.articles.lock().get(&id).cloned())
    }
}

#[async_trait]
impl TalkRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Talk>> {
        Ok(self.talks.lock().get(&id).cloned())
    }
}

#[async_trait]
impl UserInfoRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<UserInfo>> {
        Ok(self.users.lock().get(&id).cloned())
    }
}

/// Website config row stand-in
#[derive(Debug, Default)]
pub struct InMemoryWebsiteConfigRepository {
    row: Mutex<Option<WebsiteConfig>>,
    reads: AtomicU64,
}

impl InMemoryWebsiteConfigRepository {
    pub fn with_config(config: WebsiteConfig) -> Self {
        Self {
            row: Mutex::new(Some(config)),
            reads: AtomicU64::new(0),
        }
    }

    /// Number of `find` calls that reached the "database"
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<WebsiteConfig> {
        self.row.lock().clone()
    }
}

#[async_trait]
impl WebsiteConfigRepository for InMemoryWebsiteConfigRepository {
    async fn find(&self) -> RepoResult<Option<WebsiteConfig>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.row.lock().clone())
    }

    async fn save(&self, config: &WebsiteConfig) -> RepoResult<()> {
        *self.row.lock() = Some(config.clone());
        Ok(())
    }
}

// ============================================================================
// Queue publishers
// ============================================================================

/// One publish call
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub exchange: String,
    pub routing_key: String,
    pub payload: Vec<u8>,
}

impl PublishedMessage {
    pub fn job(&self) -> EmailJob {
        serde_json::from_slice(&self.payload).expect("published payload is an email job")
    }
}

/// Keeps every published message
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<PublishedMessage>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().clone()
    }

    pub fn jobs(&self) -> Vec<EmailJob> {
        self.published().iter().map(PublishedMessage::job).collect()
    }
}

#[async_trait]
impl MessageQueuePublisher for RecordingPublisher {
    async fn publish(&self, exchange: &str, routing_key: &str, payload: &[u8]) -> RepoResult<()> {
        self.published.lock().push(PublishedMessage {
            exchange: exchange.to_string(),
            routing_key: routing_key.to_string(),
            payload: payload.to_vec(),
        });
        Ok(())
    }
}

/// Broker that is always down
#[derive(Debug, Default)]
pub struct FailingPublisher {
    attempts: AtomicU64,
}

impl FailingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageQueuePublisher for FailingPublisher {
    async fn publish(&self, _exchange: &str, _routing_key: &str, _payload: &[u8]) -> RepoResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::QueueError("broker unreachable".to_string()))
    }
}

// ============================================================================
// Geo lookup
// ============================================================================

/// Fixed IP to region table; unknown addresses have no region
#[derive(Debug, Default)]
pub struct StaticGeoLocator {
    regions: HashMap<String, String>,
    failing: bool,
}

impl StaticGeoLocator {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            regions: entries
                .iter()
                .map(|(ip, region)| ((*ip).to_string(), (*region).to_string()))
                .collect(),
            failing: false,
        }
    }

    /// Locator whose lookups always error
    pub fn failing() -> Self {
        Self {
            regions: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl GeoLocator for StaticGeoLocator {
    async fn locate(&self, ip_address: &str) -> RepoResult<Option<String>> {
        if self.failing {
            return Err(DomainError::InternalError("geo lookup timed out".to_string()));
        }
        Ok(self.regions.get(ip_address).cloned())
    }
}
