use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{new_entry_id, EntryStore, JournalState};
use crate::entry::{EntryDraft, EntryPatch, ImageRef, JournalEntry};
use crate::error::{JournalError, Result};

const COLLECTION: &str = "journal_entries";
const PAGE_SIZE: u32 = 300;

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Base URL of the document store, e.g. `http://localhost:8080`.
    pub document_url: String,
    /// Base URL of the object store holding photos.
    pub storage_url: String,
    pub project_id: String,
    pub bucket: String,
    pub auth_token: Option<String>,
}

/// Entries live in a remote document store, one document per entry, with
/// photos uploaded to an object store. Reads are served from a cache that
/// [`EntryStore::refresh`] fills; writes go to the remote first.
#[derive(Debug)]
pub struct RemoteStore {
    client: Client,
    config: RemoteConfig,
    cache: RwLock<JournalState>,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: RemoteConfig, client: Client) -> Result<Self> {
        // Fail on a bad base URL now rather than on first use.
        collection_url(&config)?;
        storage_object_url(&config, "images")?;
        Ok(RemoteStore {
            client,
            config,
            cache: RwLock::new(JournalState::new()),
        })
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.config.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn document_url(&self, id: &str) -> Result<Url> {
        let mut url = collection_url(&self.config)?;
        url.path_segments_mut()
            .map_err(|_| JournalError::Config("document URL cannot be a base".into()))?
            .push(id);
        Ok(url)
    }

    async fn write_document(&self, id: &str, fields: Map<String, Value>, mask: Option<&[&str]>) -> Result<()> {
        let mut url = self.document_url(id)?;
        if let Some(paths) = mask {
            let mut query = url.query_pairs_mut();
            for path in paths {
                query.append_pair("updateMask.fieldPaths", path);
            }
            query.append_pair("currentDocument.exists", "true");
        }
        let response = self
            .request(Method::PATCH, url)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;
        check_status(response, "write document").await?;
        Ok(())
    }

    /// Uploads a local photo as `images/{id}.jpg` and returns its download
    /// URL. Remote references are passed through.
    async fn upload_image(&self, id: &str, image: ImageRef) -> Result<ImageRef> {
        let ImageRef::Local(path) = image else {
            return Ok(image);
        };
        let name = format!("images/{id}.jpg");
        let mut url = storage_upload_url(&self.config)?;
        url.query_pairs_mut().append_pair("name", &name);

        let bytes = tokio::fs::read(&path).await?;
        let size = bytes.len();
        let response = self
            .request(Method::POST, url)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(bytes)
            .send()
            .await?;
        let metadata: Value = check_status(response, "upload image").await?.json().await?;

        let mut download = storage_object_url(&self.config, &name)?;
        download.query_pairs_mut().append_pair("alt", "media");
        if let Some(token) = metadata.get("downloadTokens").and_then(Value::as_str) {
            download.query_pairs_mut().append_pair("token", token);
        }
        debug!(%id, size, "uploaded image");
        Ok(ImageRef::Remote(download.into()))
    }

    async fn fetch_documents(&self) -> Result<Vec<Value>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut url = collection_url(&self.config)?;
            url.query_pairs_mut()
                .append_pair("pageSize", &PAGE_SIZE.to_string());
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let response = self.request(Method::GET, url).send().await?;
            let mut page: Value = check_status(response, "list documents").await?.json().await?;
            if let Some(Value::Array(docs)) = page.get_mut("documents").map(Value::take) {
                documents.extend(docs);
            }
            page_token = page
                .get("nextPageToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                return Ok(documents);
            }
        }
    }
}

#[async_trait]
impl EntryStore for RemoteStore {
    async fn add(&self, mut draft: EntryDraft) -> Result<String> {
        let id = new_entry_id();
        if let Some(image) = draft.image.take() {
            draft.image = Some(self.upload_image(&id, image).await?);
        }
        let entry = JournalEntry::from_draft(id.clone(), draft);

        self.write_document(&id, encode_entry(&entry), None).await?;
        self.cache.write().await.add_entry(entry);
        debug!(%id, "added entry");
        Ok(id)
    }

    async fn update(&self, id: &str, mut patch: EntryPatch) -> Result<bool> {
        if !self.cache.read().await.contains(id) {
            debug!(%id, "update ignored, no such entry");
            return Ok(false);
        }
        if let Some(image) = patch.image.take() {
            patch.image = Some(self.upload_image(id, image).await?);
        }

        let (fields, mask) = encode_patch(&patch);
        if !mask.is_empty() {
            self.write_document(id, fields, Some(mask.as_slice())).await?;
        }
        Ok(self.cache.write().await.update_entry(id, patch).is_some())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        if !self.cache.read().await.contains(id) {
            return Ok(false);
        }
        let response = self
            .request(Method::DELETE, self.document_url(id)?)
            .send()
            .await?;
        if response.status() != StatusCode::NOT_FOUND {
            check_status(response, "delete document").await?;
        }
        Ok(self.cache.write().await.delete_entry(id))
    }

    async fn get_all(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.cache.read().await.sorted_entries())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<JournalEntry>> {
        Ok(self.cache.read().await.get_entry(id).cloned())
    }

    async fn refresh(&self) -> Result<()> {
        let documents = self.fetch_documents().await?;
        let total = documents.len();
        let entries: Vec<JournalEntry> = documents
            .iter()
            .filter_map(|doc| {
                let entry = decode_document(doc);
                if entry.is_none() {
                    let name = doc.get("name").and_then(serde_json::Value::as_str).unwrap_or("?");
                    warn!(name, "dropping malformed journal document");
                }
                entry
            })
            .collect();
        info!(fetched = total, kept = entries.len(), "refreshed journal from remote");
        self.cache.write().await.replace_all(entries);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.cache.write().await.clear();
        Ok(())
    }
}

async fn check_status(response: Response, operation: &'static str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(JournalError::RemoteStatus {
        operation,
        status,
        body,
    })
}

fn parse_base(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| JournalError::Config(format!("invalid URL {url:?}: {e}")))
}

fn collection_url(config: &RemoteConfig) -> Result<Url> {
    let mut url = parse_base(&config.document_url)?;
    url.path_segments_mut()
        .map_err(|_| JournalError::Config("document URL cannot be a base".into()))?
        .pop_if_empty()
        .extend([
            "v1",
            "projects",
            config.project_id.as_str(),
            "databases",
            "(default)",
            "documents",
            COLLECTION,
        ]);
    Ok(url)
}

fn storage_upload_url(config: &RemoteConfig) -> Result<Url> {
    let mut url = parse_base(&config.storage_url)?;
    url.path_segments_mut()
        .map_err(|_| JournalError::Config("storage URL cannot be a base".into()))?
        .pop_if_empty()
        .extend(["v0", "b", config.bucket.as_str(), "o"]);
    Ok(url)
}

/// The object name is a single path segment, so its `/` is percent-encoded.
fn storage_object_url(config: &RemoteConfig, name: &str) -> Result<Url> {
    let mut url = storage_upload_url(config)?;
    url.path_segments_mut()
        .map_err(|_| JournalError::Config("storage URL cannot be a base".into()))?
        .push(name);
    Ok(url)
}

fn string_value(value: Option<&str>) -> Value {
    match value {
        Some(s) => json!({ "stringValue": s }),
        None => json!({ "nullValue": null }),
    }
}

fn double_value(value: Option<f64>) -> Value {
    match value {
        Some(v) => json!({ "doubleValue": v }),
        None => json!({ "nullValue": null }),
    }
}

fn timestamp_value(value: DateTime<Utc>) -> Value {
    json!({ "timestampValue": value.to_rfc3339() })
}

fn image_url(image: Option<&ImageRef>) -> Option<String> {
    image.map(ImageRef::display)
}

pub(crate) fn encode_entry(entry: &JournalEntry) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("id".into(), string_value(Some(&entry.id)));
    fields.insert("content".into(), string_value(Some(&entry.content)));
    fields.insert("date".into(), timestamp_value(entry.timestamp));
    fields.insert("hasImage".into(), json!({ "booleanValue": entry.has_image }));
    fields.insert("hasLocation".into(), json!({ "booleanValue": entry.has_location }));
    fields.insert(
        "locationName".into(),
        string_value(Some(entry.location_name.as_deref().unwrap_or(""))),
    );
    fields.insert("latitude".into(), double_value(entry.latitude));
    fields.insert("longitude".into(), double_value(entry.longitude));
    fields.insert(
        "imageUrl".into(),
        string_value(image_url(entry.image.as_ref()).as_deref()),
    );
    fields
}

/// Only the fields a patch sets are written; the rest stay as stored.
/// A cleared place field is written as a null value.
pub(crate) fn encode_patch(patch: &EntryPatch) -> (Map<String, Value>, Vec<&'static str>) {
    let mut fields = Map::new();
    let mut mask = Vec::new();
    let mut put = |name: &'static str, value: Value| {
        fields.insert(name.to_string(), value);
        mask.push(name);
    };

    if let Some(content) = &patch.content {
        put("content", string_value(Some(content)));
    }
    if let Some(timestamp) = patch.timestamp {
        put("date", timestamp_value(timestamp));
    }
    if let Some(has_image) = patch.has_image {
        put("hasImage", json!({ "booleanValue": has_image }));
    }
    if let Some(has_location) = patch.has_location {
        put("hasLocation", json!({ "booleanValue": has_location }));
    }
    if let Some(name) = &patch.location_name {
        put("locationName", string_value(name.as_deref()));
    }
    if let Some(lat) = patch.latitude {
        put("latitude", double_value(lat));
    }
    if let Some(lon) = patch.longitude {
        put("longitude", double_value(lon));
    }
    if let Some(image) = &patch.image {
        put("imageUrl", string_value(Some(&image.display())));
    }
    (fields, mask)
}

/// Missing or null fields read as `None`; a value of the wrong type is an error.
fn field<'a, T>(
    fields: &'a Map<String, Value>,
    name: &str,
    extract: impl Fn(&'a Map<String, Value>) -> Option<T>,
) -> std::result::Result<Option<T>, ()> {
    let Some(value) = fields.get(name) else {
        return Ok(None);
    };
    let Some(typed) = value.as_object() else {
        return Err(());
    };
    if typed.contains_key("nullValue") {
        return Ok(None);
    }
    extract(typed).map(Some).ok_or(())
}

fn as_string(v: &Map<String, Value>) -> Option<String> {
    v.get("stringValue")?.as_str().map(str::to_string)
}

fn as_bool(v: &Map<String, Value>) -> Option<bool> {
    v.get("booleanValue")?.as_bool()
}

fn as_double(v: &Map<String, Value>) -> Option<f64> {
    if let Some(d) = v.get("doubleValue") {
        return d.as_f64();
    }
    // Whole numbers come back as integerValue, encoded as a string.
    v.get("integerValue")?.as_str()?.parse().ok()
}

fn as_timestamp(v: &Map<String, Value>) -> Option<DateTime<Utc>> {
    let raw = v.get("timestampValue")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Returns `None` for documents that lack an id or date or carry a field of
/// the wrong type.
pub(crate) fn decode_document(doc: &Value) -> Option<JournalEntry> {
    let fields = doc.get("fields")?.as_object()?;

    let id = field(fields, "id", as_string).ok()??;
    let timestamp = field(fields, "date", as_timestamp).ok()??;
    let content = field(fields, "content", as_string).ok()?.unwrap_or_default();
    let has_image = field(fields, "hasImage", as_bool).ok()?.unwrap_or(false);
    let has_location = field(fields, "hasLocation", as_bool).ok()?.unwrap_or(false);
    let location_name = field(fields, "locationName", as_string)
        .ok()?
        .filter(|n| !n.is_empty());
    let latitude = field(fields, "latitude", as_double).ok()?;
    let longitude = field(fields, "longitude", as_double).ok()?;
    let image = field(fields, "imageUrl", as_string)
        .ok()?
        .filter(|u| !u.is_empty())
        .map(ImageRef::Remote);

    Some(JournalEntry {
        id,
        content,
        timestamp,
        has_image,
        image,
        has_location,
        location_name,
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    fn config(base: &str) -> RemoteConfig {
        RemoteConfig {
            document_url: base.to_string(),
            storage_url: "http://localhost:9199".into(),
            project_id: "ujournal-dev".into(),
            bucket: "ujournal-dev.appspot.com".into(),
            auth_token: None,
        }
    }

    fn sample() -> JournalEntry {
        JournalEntry::from_draft(
            "e1".into(),
            EntryDraft::new("hello", Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap())
                .with_image(ImageRef::Remote("http://img/e1.jpg".into()))
                .with_location(Some("Jakarta".into()), Some(-6.2), Some(106.8167)),
        )
    }

    #[test]
    fn entry_survives_document_encoding() {
        let entry = sample();
        let doc = json!({ "name": "x", "fields": encode_entry(&entry) });
        assert_eq!(decode_document(&doc), Some(entry));
    }

    #[test]
    fn documents_without_id_or_date_are_dropped() {
        let mut fields = encode_entry(&sample());
        fields.remove("id");
        assert!(decode_document(&json!({ "fields": fields })).is_none());

        let mut fields = encode_entry(&sample());
        fields.remove("date");
        assert!(decode_document(&json!({ "fields": fields })).is_none());
    }

    #[test]
    fn wrongly_typed_field_drops_document() {
        let mut fields = encode_entry(&sample());
        fields.insert("hasImage".into(), json!({ "stringValue": "yes" }));
        assert!(decode_document(&json!({ "fields": fields })).is_none());
    }

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let doc = json!({
            "fields": {
                "id": { "stringValue": "e2" },
                "date": { "timestampValue": "2024-02-29T23:59:00Z" },
                "latitude": { "integerValue": "3" },
                "imageUrl": { "nullValue": null },
            }
        });
        let entry = decode_document(&doc).unwrap();
        assert_eq!(entry.content, "");
        assert!(!entry.has_image);
        assert!(entry.image.is_none());
        assert_eq!(entry.latitude, Some(3.0));
        assert_eq!(entry.location_name, None);
    }

    #[test]
    fn patch_encodes_only_set_fields() {
        let patch = EntryPatch {
            content: Some("new".into()),
            latitude: Some(Some(1.5)),
            ..Default::default()
        };
        let (fields, mask) = encode_patch(&patch);
        assert_eq!(mask, vec!["content", "latitude"]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["latitude"], json!({ "doubleValue": 1.5 }));
    }

    #[test]
    fn cleared_place_is_written_as_null() {
        let patch = EntryPatch {
            location_name: Some(None),
            ..Default::default()
        };
        let (fields, mask) = encode_patch(&patch);
        assert_eq!(mask, vec!["locationName"]);
        assert_eq!(fields["locationName"], json!({ "nullValue": null }));
    }

    #[test]
    fn urls_follow_the_document_and_object_layout() {
        let config = config("http://localhost:8080/");
        assert_eq!(
            collection_url(&config).unwrap().as_str(),
            "http://localhost:8080/v1/projects/ujournal-dev/databases/(default)/documents/journal_entries"
        );
        assert_eq!(
            storage_object_url(&config, "images/e1.jpg").unwrap().as_str(),
            "http://localhost:9199/v0/b/ujournal-dev.appspot.com/o/images%2Fe1.jpg"
        );
    }

    #[test]
    fn bad_base_url_is_a_config_error() {
        let err = RemoteStore::new(config("not a url")).unwrap_err();
        assert!(matches!(err, JournalError::Config(_)));
    }

    /// What the test server saw of one request.
    struct Received {
        request_line: String,
        head: String,
        body: String,
    }

    async fn read_request(socket: &mut TcpStream) -> Received {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before the request was complete");
            raw.extend_from_slice(&buf[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&raw[..header_end]).into_owned();
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while raw.len() < header_end + length {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before the body was complete");
            raw.extend_from_slice(&buf[..n]);
        }
        Received {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&raw[header_end..header_end + length]).into_owned(),
            head,
        }
    }

    /// Answers one connection per `(status, body)` pair, in order, and
    /// reports every request it read.
    async fn serve(responses: Vec<(u16, String)>) -> (String, mpsc::UnboundedReceiver<Received>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let received = read_request(&mut socket).await;
                let _ = tx.send(received);
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    StatusCode::from_u16(status).unwrap(),
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });
        (format!("http://{addr}"), rx)
    }

    /// Points both the document and the object store at `base`.
    fn store_at(base: &str, auth_token: Option<&str>) -> RemoteStore {
        let config = RemoteConfig {
            storage_url: base.to_string(),
            auth_token: auth_token.map(str::to_string),
            ..config(base)
        };
        let client = Client::builder().no_proxy().build().unwrap();
        RemoteStore::with_client(config, client).unwrap()
    }

    const DOCUMENTS: &str = "/v1/projects/ujournal-dev/databases/(default)/documents/journal_entries";

    #[tokio::test]
    async fn refresh_keeps_well_formed_documents_only() {
        let good = json!({ "name": "docs/e1", "fields": encode_entry(&sample()) });
        let bad = json!({ "name": "docs/broken", "fields": { "content": { "stringValue": "no id" } } });
        let (base, mut requests) = serve(vec![(200, json!({ "documents": [good, bad] }).to_string())]).await;

        let store = store_at(&base, None);
        store.refresh().await.unwrap();

        let listed = requests.recv().await.unwrap();
        assert_eq!(listed.request_line, format!("GET {DOCUMENTS}?pageSize=300 HTTP/1.1"));
        assert_eq!(store.get_all().await.unwrap(), vec![sample()]);
    }

    #[tokio::test]
    async fn add_uploads_the_photo_then_writes_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("beach.jpg");
        std::fs::write(&photo, b"jpeg bytes").unwrap();
        let (base, mut requests) = serve(vec![
            (200, json!({ "name": "images/x.jpg", "downloadTokens": "tok123" }).to_string()),
            (200, "{}".into()),
        ])
        .await;

        let store = store_at(&base, None);
        let draft = EntryDraft::new("beach day", Utc.with_ymd_and_hms(2024, 7, 1, 15, 30, 0).unwrap())
            .with_image(ImageRef::Local(photo));
        let id = store.add(draft).await.unwrap();

        let upload = requests.recv().await.unwrap();
        assert_eq!(
            upload.request_line,
            format!("POST /v0/b/ujournal-dev.appspot.com/o?name=images%2F{id}.jpg HTTP/1.1")
        );
        assert_eq!(upload.body, "jpeg bytes");

        let write = requests.recv().await.unwrap();
        assert_eq!(write.request_line, format!("PATCH {DOCUMENTS}/{id} HTTP/1.1"));

        let entry = store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(
            entry.image,
            Some(ImageRef::Remote(format!(
                "{base}/v0/b/ujournal-dev.appspot.com/o/images%2F{id}.jpg?alt=media&token=tok123"
            )))
        );
        let sent: Value = serde_json::from_str(&write.body).unwrap();
        assert_eq!(decode_document(&sent), Some(entry));
    }

    #[tokio::test]
    async fn update_writes_masked_fields_then_updates_the_cache() {
        let (base, mut requests) = serve(vec![(200, "{}".into())]).await;
        let store = store_at(&base, Some("secret"));
        store.cache.write().await.add_entry(sample());

        let patch = EntryPatch {
            content: Some("edited".into()),
            location_name: Some(None),
            ..Default::default()
        };
        assert!(store.update("e1", patch).await.unwrap());

        let sent = requests.recv().await.unwrap();
        assert_eq!(
            sent.request_line,
            format!(
                "PATCH {DOCUMENTS}/e1?updateMask.fieldPaths=content&updateMask.fieldPaths=locationName\
                 &currentDocument.exists=true HTTP/1.1"
            )
        );
        assert!(sent.head.to_ascii_lowercase().contains("authorization: bearer secret"));
        let body: Value = serde_json::from_str(&sent.body).unwrap();
        assert_eq!(
            body,
            json!({ "fields": {
                "content": { "stringValue": "edited" },
                "locationName": { "nullValue": null },
            }})
        );

        let entry = store.get_by_id("e1").await.unwrap().unwrap();
        assert_eq!(entry.content, "edited");
        assert_eq!(entry.location_name, None);
        assert_eq!(entry.coordinates(), Some((-6.2, 106.8167)));
    }

    #[tokio::test]
    async fn delete_treats_a_missing_document_as_deleted() {
        let (base, mut requests) = serve(vec![(404, "{}".into())]).await;
        let store = store_at(&base, None);
        store.cache.write().await.add_entry(sample());

        assert!(store.delete("e1").await.unwrap());

        let sent = requests.recv().await.unwrap();
        assert_eq!(sent.request_line, format!("DELETE {DOCUMENTS}/e1 HTTP/1.1"));
        assert!(store.get_by_id("e1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejected_writes_leave_the_cache_alone() {
        let (base, _requests) = serve(vec![
            (500, r#"{"error":"boom"}"#.into()),
            (503, "{}".into()),
            (403, "{}".into()),
        ])
        .await;
        let store = store_at(&base, None);
        store.cache.write().await.add_entry(sample());

        let err = store.update("e1", EntryPatch::content("edited")).await.unwrap_err();
        match err {
            JournalError::RemoteStatus { operation, status, body } => {
                assert_eq!(operation, "write document");
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, r#"{"error":"boom"}"#);
            }
            other => panic!("expected a status error, got {other:?}"),
        }

        assert!(matches!(
            store.delete("e1").await,
            Err(JournalError::RemoteStatus { status, .. }) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(store
            .add(EntryDraft::new("new", Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()))
            .await
            .is_err());

        assert_eq!(store.get_all().await.unwrap(), vec![sample()]);
    }

    #[tokio::test]
    async fn unknown_ids_never_reach_the_remote() {
        // Nothing listens here; any request would fail.
        let store = RemoteStore::new(config("http://127.0.0.1:9")).unwrap();
        assert!(!store.update("missing", EntryPatch::content("x")).await.unwrap());
        assert!(!store.delete("missing").await.unwrap());
    }
}
