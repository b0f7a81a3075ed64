//! 🎭 FakeS3: an S3 server that lives entirely in RAM, for tests.
//!
//! A wiremock [`Respond`] impl that understands just enough of the S3 REST API (path-style)
//! to let the real SDK client do real requests against it: head/create bucket, put/get/head/
//! delete object, and ListObjectsV2. Gone the moment the test ends. Like a mayfly. With XML.
//!
//! Keys come off the URL percent-decoded, objects remember the `Content-Type` they were put
//! with, and [`FakeS3::start_paged`] makes listings come back a few keys at a time with a
//! `NextContinuationToken`, the way a real bucket does past 1000 keys.
//!
//! ⚠️ NOT for production. If you're deploying this to prod, please also deploy a therapist.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use percent_encoding::percent_decode_str;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use super::StoreConfig;

/// 📦 What a PUT leaves behind.
#[derive(Debug, Clone)]
struct FakeObject {
    body: Vec<u8>,
    content_type: String,
}

#[derive(Debug, Default)]
struct FakeS3State {
    buckets: BTreeSet<String>,
    objects: BTreeMap<(String, String), FakeObject>,
    create_bucket_calls: usize,
    list_calls: usize,
    /// 📄 Keys per listing page. `None` means one page, however long.
    page_size: Option<usize>,
}

/// 🎭 Shared handle to the fake's state. Clone it, mount one clone, keep one to peek.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeS3 {
    state: Arc<Mutex<FakeS3State>>,
}

/// 🔧 A store config pointed at `server`, local-profile credentials and bucket.
pub(crate) fn store_config_for(server: &MockServer) -> StoreConfig {
    StoreConfig {
        endpoint: server.uri(),
        ..StoreConfig::local()
    }
}

fn error_xml(status: u16, code: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>{code}</Code><Message>{message}</Message></Error>"
        ),
        "application/xml",
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 📜 One ListObjectsV2 page. `next` is the continuation token when more keys remain.
fn list_xml(bucket: &str, objects: &[(String, usize)], next: Option<usize>) -> ResponseTemplate {
    let contents: String = objects
        .iter()
        .map(|(key, size)| {
            format!(
                "<Contents><Key>{}</Key><Size>{size}</Size></Contents>",
                xml_escape(key)
            )
        })
        .collect();
    let truncation = match next {
        Some(token) => format!(
            "<IsTruncated>true</IsTruncated><NextContinuationToken>{token}</NextContinuationToken>"
        ),
        None => "<IsTruncated>false</IsTruncated>".to_string(),
    };
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
             <Name>{bucket}</Name><Prefix></Prefix><KeyCount>{}</KeyCount>\
             <MaxKeys>1000</MaxKeys>{truncation}{contents}\
             </ListBucketResult>",
            objects.len()
        ),
        "application/xml",
    )
}

impl FakeS3 {
    /// 🚀 Start a mock server with a fresh fake mounted on every route.
    pub(crate) async fn start() -> (MockServer, FakeS3) {
        Self::mount(FakeS3::default()).await
    }

    /// 📄 Like [`FakeS3::start`], but listings return at most `page_size` keys per page.
    pub(crate) async fn start_paged(page_size: usize) -> (MockServer, FakeS3) {
        let fake = FakeS3::default();
        fake.state().page_size = Some(page_size.max(1));
        Self::mount(fake).await
    }

    async fn mount(fake: FakeS3) -> (MockServer, FakeS3) {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        (server, fake)
    }

    fn state(&self) -> MutexGuard<'_, FakeS3State> {
        // -- 🧪 a poisoned mutex means another test thread already panicked; keep going and let it report
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn create_bucket_calls(&self) -> usize {
        self.state().create_bucket_calls
    }

    pub(crate) fn bucket_names(&self) -> Vec<String> {
        self.state().buckets.iter().cloned().collect()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state().list_calls
    }

    pub(crate) fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.state()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.body.clone())
    }

    /// 🏷️ The `Content-Type` the object was uploaded with.
    pub(crate) fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.state()
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.content_type.clone())
    }

    fn bucket_op(&self, verb: &str, bucket: &str, request: &Request) -> ResponseTemplate {
        let mut state = self.state();
        let bucket_exists = state.buckets.contains(bucket);
        match verb {
            "HEAD" if bucket_exists => ResponseTemplate::new(200),
            "HEAD" => ResponseTemplate::new(404),
            "PUT" => {
                state.create_bucket_calls += 1;
                if bucket_exists {
                    return error_xml(409, "BucketAlreadyOwnedByYou", "You already own it.");
                }
                state.buckets.insert(bucket.to_string());
                ResponseTemplate::new(200)
            }
            "GET" if request.url.query_pairs().any(|(k, _)| k == "list-type") => {
                if !bucket_exists {
                    return error_xml(404, "NoSuchBucket", "The specified bucket does not exist.");
                }
                state.list_calls += 1;
                // -- 🎟️ our continuation token is just the offset of the next key. opaque enough.
                let offset = request
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "continuation-token")
                    .and_then(|(_, token)| token.parse::<usize>().ok())
                    .unwrap_or(0);
                let listed: Vec<(String, usize)> = state
                    .objects
                    .iter()
                    .filter(|((b, _), _)| b == bucket)
                    .map(|((_, key), object)| (key.clone(), object.body.len()))
                    .collect();
                let page_size = state.page_size.unwrap_or(listed.len().max(1));
                let end = (offset + page_size).min(listed.len());
                let page = listed.get(offset.min(end)..end).unwrap_or_default();
                let next = (end < listed.len()).then_some(end);
                list_xml(bucket, page, next)
            }
            _ => ResponseTemplate::new(400),
        }
    }

    fn object_op(&self, verb: &str, bucket: &str, key: &str, request: &Request) -> ResponseTemplate {
        let mut state = self.state();
        if !state.buckets.contains(bucket) {
            return error_xml(404, "NoSuchBucket", "The specified bucket does not exist.");
        }
        let address = (bucket.to_string(), key.to_string());
        match verb {
            "PUT" => {
                let content_type = request
                    .headers
                    .get("content-type")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("application/octet-stream")
                    .to_string();
                state.objects.insert(
                    address,
                    FakeObject {
                        body: request.body.clone(),
                        content_type,
                    },
                );
                ResponseTemplate::new(200).insert_header("ETag", "\"fake-etag\"")
            }
            "GET" => match state.objects.get(&address) {
                Some(object) => ResponseTemplate::new(200)
                    .set_body_raw(object.body.clone(), object.content_type.as_str()),
                None => error_xml(404, "NoSuchKey", "The specified key does not exist."),
            },
            "HEAD" => match state.objects.get(&address) {
                Some(object) => ResponseTemplate::new(200)
                    .insert_header("Content-Type", object.content_type.as_str()),
                None => ResponseTemplate::new(404),
            },
            "DELETE" => {
                state.objects.remove(&address);
                ResponseTemplate::new(204)
            }
            _ => ResponseTemplate::new(400),
        }
    }
}

impl Respond for FakeS3 {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let verb = request.method.as_str().to_string();
        let path = request.url.path().trim_start_matches('/').to_string();

        match path.split_once('/') {
            Some((bucket, key)) if !key.is_empty() => {
                // -- 🔣 the SDK percent-encodes keys on the wire; the bucket stores them decoded
                let key = percent_decode_str(key).decode_utf8_lossy();
                self.object_op(&verb, bucket, &key, request)
            }
            Some((bucket, _)) => self.bucket_op(&verb, bucket, request),
            None => self.bucket_op(&verb, &path, request),
        }
    }
}
