//! 🪣📡🏗️ S3 Object Store: buckets, keys, bytes, and the occasional signed URL.
//!
//! COLD OPEN: EXT. LOCALHOST:9000, 3:47 AM
//!
//! A MinIO container hums in the dark. Nobody remembers starting it. It remembers everything.
//! A bucket called `data-lake` waits, empty, like a pool in November.
//!
//! 🧠 Knowledge graph:
//! - `StoreConfig`: endpoint, static keys, bucket, region, path-style flag (co-located, as is tradition)
//! - `S3ObjectStore`: one SDK client, built once, passed around by reference. No global singletons.
//! - Retries are OFF. The contract says "no retry", so the SDK doesn't get to improvise.
//! - Checksums only "when required", because S3-compatible backends have opinions about
//!   aws-chunked trailers and we'd rather not hear them.
//! - Every SDK failure goes through `s3_errors::classify` exactly once.
//!
//! ⚠️ Two lenient calls on purpose: `list_objects` and `exists` swallow backend errors.
//! Their strict twins (`try_list_objects`, `try_exists`) tell the truth.

use std::path::Path;
use std::time::Duration;

use aws_sdk_s3::Client;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{
    BehaviorVersion, Credentials, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, info, trace, warn};

use super::s3_errors::{classify, is_bucket_already_there, stream_broke};
use crate::common::{CSV_CONTENT_TYPE, PresignMethod};
use crate::error::{ErrorKind, LakeError, LakeResult};

// ============================================================
//  🔧 StoreConfig: where the bucket lives and how to knock
// ============================================================

/// 🔧 Connection settings for the object store.
///
/// Every field has a default, and the defaults are the local MinIO profile, so an empty
/// `[store]` table (or no table at all) still gets you somewhere. Probably localhost.
#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// 📡 Full URL, scheme and port included.
    pub endpoint: String,
    pub access_key: String,
    /// 🔒 Redacted from `Debug`. Still in plaintext in your TOML. We've all been there.
    pub secret_key: String,
    /// 🪣 The bucket the demo (and the `*_csv` helpers) work in.
    pub bucket_name: String,
    /// 🌎 Needed for signing even when the backend doesn't care about regions.
    pub region: String,
    /// 🛣️ `http://host/bucket/key` instead of `http://bucket.host/key`. MinIO wants this on.
    pub force_path_style: bool,
}

impl StoreConfig {
    /// 💻 MinIO on your laptop, default credentials, default bucket.
    pub fn local() -> Self {
        Self {
            endpoint: "http://localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin123".to_string(),
            bucket_name: "data-lake".to_string(),
            region: "us-east-1".to_string(),
            force_path_style: true,
        }
    }

    /// ☸️ MinIO as a cluster service in the `data-lake` namespace.
    pub fn kubernetes() -> Self {
        Self {
            endpoint: "http://minio-service.data-lake.svc.cluster.local:9000".to_string(),
            ..Self::local()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::local()
    }
}

// 🔒 hand-rolled Debug so the secret key never lands in a log line
impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

// ============================================================
//  🪣 S3ObjectStore
// ============================================================

/// 🧵 A readable object body, positioned at offset 0. Boxed because the SDK's reader type is opaque.
pub type ObjectStream = Box<dyn AsyncRead + Send + Unpin>;

/// 🪣 The object store client.
///
/// Cheap to clone (the SDK client is an `Arc` inside). Holds a default bucket from config
/// for the `*_csv` helpers; every core operation still takes the bucket explicitly.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// 🔧 Build the SDK client from config. No network traffic happens here.
    pub fn new(config: &StoreConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "lkb-static",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint.clone())
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style)
            .retry_config(RetryConfig::disabled())
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
            .build();

        debug!("🪣 S3 client configured: {:?}", config);

        Self {
            client: Client::from_conf(s3_config),
            bucket: config.bucket_name.clone(),
        }
    }

    /// 🚀 Build the client and make sure the configured bucket exists.
    pub async fn connect(config: &StoreConfig) -> LakeResult<Self> {
        let store = Self::new(config);
        store.ensure_bucket(&config.bucket_name).await?;
        Ok(store)
    }

    /// 🪣 The default bucket from config.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// 🪣 Create `name` if it's missing. Calling it twice is fine. Calling it a hundred times is also fine.
    pub async fn ensure_bucket(&self, name: &str) -> LakeResult<()> {
        match self.client.head_bucket().bucket(name).send().await {
            Ok(_) => {
                info!("🪣 bucket already exists: {}", name);
                return Ok(());
            }
            Err(err) => {
                let the_error = classify(err, name, "");
                if the_error.kind() != ErrorKind::NotFound {
                    return Err(the_error);
                }
            }
        }

        match self.client.create_bucket().bucket(name).send().await {
            Ok(_) => {
                info!("🪣 created bucket: {}", name);
                Ok(())
            }
            // -- 🏁 lost a race with ourselves (or a sibling process). the bucket exists. mission accomplished.
            Err(err) if is_bucket_already_there(&err) => {
                info!("🪣 bucket appeared while we were creating it: {}", name);
                Ok(())
            }
            Err(err) => Err(classify(err, name, "")),
        }
    }

    /// 📤 Upload bytes to `key`, replacing whatever was there.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: impl Into<Vec<u8>>,
        content_type: &str,
    ) -> LakeResult<()> {
        let bytes = bytes.into();
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| classify(err, bucket, key))?;
        info!("📤 uploaded {} bytes to s3://{}/{}", size, bucket, key);
        Ok(())
    }

    /// 📤 Upload a local file to `key`, streaming it off disk.
    pub async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> LakeResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|err| LakeError::IoRead {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|err| classify(err, bucket, key))?;
        info!(
            "📤 uploaded file {} to s3://{}/{}",
            path.display(),
            bucket,
            key
        );
        Ok(())
    }

    /// 📥 Open `key` as a byte stream at offset 0.
    pub async fn get_object_stream(&self, bucket: &str, key: &str) -> LakeResult<ObjectStream> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify(err, bucket, key))?;
        trace!("📥 opened stream for s3://{}/{}", bucket, key);
        Ok(Box::new(output.body.into_async_read()))
    }

    /// 📥 Fetch `key` entirely into memory. The whole object sits in RAM, so mind the size.
    pub async fn get_object_bytes(&self, bucket: &str, key: &str) -> LakeResult<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify(err, bucket, key))?;
        let collected = output
            .body
            .collect()
            .await
            .map_err(|err| stream_broke(bucket, key, err))?;
        let bytes = collected.into_bytes().to_vec();
        debug!("📥 fetched {} bytes from s3://{}/{}", bytes.len(), bucket, key);
        Ok(bytes)
    }

    /// 💾 Stream `key` into a local file, creating or truncating it. Returns bytes written.
    pub async fn get_object_to_file(&self, bucket: &str, key: &str, path: &Path) -> LakeResult<u64> {
        let mut output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| classify(err, bucket, key))?;

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|err| LakeError::io_write(path, err))?;

        let mut written = 0u64;
        while let Some(chunk) = output
            .body
            .try_next()
            .await
            .map_err(|err| stream_broke(bucket, key, err))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|err| LakeError::io_write(path, err))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|err| LakeError::io_write(path, err))?;

        info!(
            "💾 downloaded s3://{}/{} to {} ({} bytes)",
            bucket,
            key,
            path.display(),
            written
        );
        Ok(written)
    }

    /// 📜 Keys ending in `suffix`, in whatever order the backend lists them.
    ///
    /// ⚠️ Lenient: a listing failure is logged and reported as an empty list.
    pub async fn list_objects(&self, bucket: &str, suffix: &str) -> Vec<String> {
        match self.try_list_objects(bucket, suffix).await {
            Ok(keys) => keys,
            Err(err) => {
                warn!("📜 listing s3://{} failed, reporting no objects: {}", bucket, err);
                Vec::new()
            }
        }
    }

    /// 📜 Strict listing: every page, suffix-filtered, errors surfaced.
    pub async fn try_list_objects(&self, bucket: &str, suffix: &str) -> LakeResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket);
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }
            let output = request
                .send()
                .await
                .map_err(|err| classify(err, bucket, ""))?;

            keys.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .filter(|key| key.ends_with(suffix))
                    .map(str::to_string),
            );

            continuation_token = output.next_continuation_token().map(str::to_string);
            if continuation_token.is_none() {
                break;
            }
        }

        debug!("📜 s3://{} has {} keys ending in '{}'", bucket, keys.len(), suffix);
        Ok(keys)
    }

    /// 🗑️ Delete `key`. Already gone counts as success.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> LakeResult<()> {
        match self.client.delete_object().bucket(bucket).key(key).send().await {
            Ok(_) => {
                info!("🗑️ deleted s3://{}/{}", bucket, key);
                Ok(())
            }
            Err(err) => match classify(err, bucket, key) {
                LakeError::NotFound { .. } => {
                    debug!("🗑️ s3://{}/{} was already gone", bucket, key);
                    Ok(())
                }
                other => Err(other),
            },
        }
    }

    /// 🔍 Does `key` exist?
    ///
    /// ⚠️ Lenient: any backend error reads as "no". A 500 and a 404 look the same from here.
    pub async fn exists(&self, bucket: &str, key: &str) -> bool {
        match self.try_exists(bucket, key).await {
            Ok(found) => found,
            Err(err) => {
                debug!("🔍 existence check for s3://{}/{} failed, treating as absent: {}", bucket, key, err);
                false
            }
        }
    }

    /// 🔍 Strict existence: `Ok(false)` only when the backend says not found.
    pub async fn try_exists(&self, bucket: &str, key: &str) -> LakeResult<bool> {
        match self.client.head_object().bucket(bucket).key(key).send().await {
            Ok(_) => Ok(true),
            Err(err) => match classify(err, bucket, key) {
                LakeError::NotFound { .. } => Ok(false),
                other => Err(other),
            },
        }
    }

    /// ✍️ A time-limited URL for one object. `ttl_seconds` goes to the signer unchecked;
    /// zero gives you a URL that is expired on arrival.
    pub async fn presigned_url(
        &self,
        bucket: &str,
        key: &str,
        ttl_seconds: u64,
        method: PresignMethod,
    ) -> LakeResult<String> {
        let presign = |config_err: String| LakeError::Presign {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: config_err,
        };
        let presigning = PresigningConfig::expires_in(Duration::from_secs(ttl_seconds))
            .map_err(|err| presign(err.to_string()))?;

        let request = match method {
            PresignMethod::Get => self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .presigned(presigning)
                .await
                .map_err(|err| classify(err, bucket, key))?,
            PresignMethod::Put => self
                .client
                .put_object()
                .bucket(bucket)
                .key(key)
                .presigned(presigning)
                .await
                .map_err(|err| classify(err, bucket, key))?,
            PresignMethod::Delete => self
                .client
                .delete_object()
                .bucket(bucket)
                .key(key)
                .presigned(presigning)
                .await
                .map_err(|err| classify(err, bucket, key))?,
        };

        debug!("✍️ presigned {} for s3://{}/{} ({}s)", method, bucket, key, ttl_seconds);
        Ok(request.uri().to_string())
    }

    // ============================================================
    //  📄 CSV helpers bound to the configured bucket
    // ============================================================

    /// 📤 Upload CSV text to `key` in the default bucket.
    pub async fn upload_csv(&self, key: &str, text: &str) -> LakeResult<()> {
        self.put_object(&self.bucket, key, text.as_bytes(), CSV_CONTENT_TYPE)
            .await
    }

    /// 📤 Upload a local CSV file to `key` in the default bucket.
    pub async fn upload_csv_file(&self, key: &str, path: &Path) -> LakeResult<()> {
        self.put_object_from_file(&self.bucket, key, path, CSV_CONTENT_TYPE)
            .await
    }

    /// 💾 Download `key` from the default bucket into a local file.
    pub async fn download_csv_file(&self, key: &str, path: &Path) -> LakeResult<u64> {
        self.get_object_to_file(&self.bucket, key, path).await
    }

    /// 📜 Every `.csv` key in the default bucket (lenient, like `list_objects`).
    pub async fn csv_keys(&self) -> Vec<String> {
        self.list_objects(&self.bucket, ".csv").await
    }
}

// ============================================================
//  🧪 Tests: a fake S3 in RAM, a real SDK on top. Trust nothing, blame DNS.
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::s3::fake_s3::{FakeS3, store_config_for};
    use tokio::io::AsyncReadExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BUCKET: &str = "data-lake";

    async fn the_store_with_a_bucket() -> (MockServer, FakeS3, S3ObjectStore) {
        let (server, fake) = FakeS3::start().await;
        let store = S3ObjectStore::connect(&store_config_for(&server))
            .await
            .expect("💀 connect against the fake S3 should create the bucket");
        (server, fake, store)
    }

    #[test]
    fn the_one_where_the_defaults_are_the_laptop_minio() {
        let the_config = StoreConfig::default();
        assert_eq!(the_config.endpoint, "http://localhost:9000");
        assert_eq!(the_config.bucket_name, "data-lake");
        assert!(the_config.force_path_style);
        assert_eq!(
            StoreConfig::kubernetes().endpoint,
            "http://minio-service.data-lake.svc.cluster.local:9000"
        );
    }

    #[test]
    fn the_one_where_debug_keeps_the_secret_a_secret() {
        let the_debug = format!("{:?}", StoreConfig::local());
        assert!(!the_debug.contains("minioadmin123"));
        assert!(the_debug.contains("<redacted>"));
    }

    #[test]
    fn the_one_where_a_partial_config_fills_in_the_blanks() {
        let the_config: StoreConfig = serde_json::from_str(
            r#"{ "endpoint": "http://minio:9000", "bucket_name": "lake-two" }"#,
        )
        .expect("💀 partial store config should parse with defaults");
        assert_eq!(the_config.endpoint, "http://minio:9000");
        assert_eq!(the_config.bucket_name, "lake-two");
        assert_eq!(the_config.access_key, "minioadmin");
        assert_eq!(the_config.region, "us-east-1");
    }

    #[tokio::test]
    async fn the_one_where_ensure_bucket_twice_creates_it_once() {
        let (_server, fake, store) = the_store_with_a_bucket().await;
        store
            .ensure_bucket(BUCKET)
            .await
            .expect("💀 second ensure_bucket should be a no-op");

        assert_eq!(fake.create_bucket_calls(), 1);
        assert_eq!(fake.bucket_names(), vec![BUCKET.to_string()]);
    }

    #[tokio::test]
    async fn the_one_where_bytes_go_up_and_come_back_identical() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        // -- 🧪 not even valid UTF-8. the bucket doesn't care, and neither should we.
        let the_payload: Vec<u8> = vec![0x00, 0x9f, 0x92, 0x96, b',', b'\n', 0xff, b'"'];

        store
            .put_object(BUCKET, "raw/blob.bin", the_payload.clone(), "application/octet-stream")
            .await
            .expect("💀 put should succeed");
        let the_fetched = store
            .get_object_bytes(BUCKET, "raw/blob.bin")
            .await
            .expect("💀 get should succeed");

        assert_eq!(the_fetched, the_payload);
    }

    #[tokio::test]
    async fn the_one_where_the_bucket_remembers_what_kind_of_bytes_it_got() {
        let (_server, fake, store) = the_store_with_a_bucket().await;
        store
            .put_object(BUCKET, "raw/blob.bin", vec![1u8, 2, 3], "application/octet-stream")
            .await
            .expect("💀 put should succeed");
        store.upload_csv("sales/sales_data.csv", "a\n1\n").await.expect("💀 csv put");

        assert_eq!(
            fake.content_type(BUCKET, "raw/blob.bin").as_deref(),
            Some("application/octet-stream")
        );
        assert_eq!(
            fake.content_type(BUCKET, "sales/sales_data.csv").as_deref(),
            Some(CSV_CONTENT_TYPE)
        );
    }

    #[tokio::test]
    async fn the_one_where_a_key_with_spaces_and_percents_survives_the_url() {
        let (_server, fake, store) = the_store_with_a_bucket().await;
        let the_key = "reports/q1 summary 100%.csv";

        store.upload_csv(the_key, "x\n1\n").await.expect("💀 put");

        assert_eq!(fake.object(BUCKET, the_key), Some(b"x\n1\n".to_vec()));
        assert_eq!(
            store.get_object_bytes(BUCKET, the_key).await.expect("💀 get"),
            b"x\n1\n"
        );
        assert!(store.exists(BUCKET, the_key).await);
        assert_eq!(store.csv_keys().await, vec![the_key.to_string()]);
    }

    #[tokio::test]
    async fn the_one_where_a_reupload_replaces_the_object() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        store.upload_csv("a.csv", "x\n1\n").await.expect("💀 first put");
        store.upload_csv("a.csv", "x\n2\n").await.expect("💀 second put");

        let the_fetched = store.get_object_bytes(BUCKET, "a.csv").await.expect("💀 get");
        assert_eq!(the_fetched, b"x\n2\n");
    }

    #[tokio::test]
    async fn the_one_where_the_stream_starts_at_byte_zero() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        store
            .upload_csv("sales/sales_data.csv", "order_id,product\n1,Mouse\n")
            .await
            .expect("💀 put");

        let mut the_stream = store
            .get_object_stream(BUCKET, "sales/sales_data.csv")
            .await
            .expect("💀 stream should open");
        let mut the_text = String::new();
        the_stream
            .read_to_string(&mut the_text)
            .await
            .expect("💀 stream should read");

        assert_eq!(the_text, "order_id,product\n1,Mouse\n");
    }

    #[tokio::test]
    async fn the_one_where_a_missing_key_is_not_found_not_a_crash() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        let the_error = match store.get_object_stream(BUCKET, "ghost.csv").await {
            Ok(_) => panic!("💀 a missing key should not produce a stream"),
            Err(err) => err,
        };
        assert_eq!(the_error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn the_one_where_files_round_trip_through_the_bucket() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        let the_dir = tempfile::tempdir().expect("💀 tempdir");
        let the_source = the_dir.path().join("upload.csv");
        let the_target = the_dir.path().join("download.csv");
        std::fs::write(&the_source, "id,name\n1,Laptop\n").expect("💀 write source");
        // -- 📝 pre-existing junk must be truncated, not appended to
        std::fs::write(&the_target, "stale stale stale stale stale").expect("💀 write target");

        store
            .upload_csv_file("files/upload.csv", &the_source)
            .await
            .expect("💀 upload file");
        let the_written = store
            .download_csv_file("files/upload.csv", &the_target)
            .await
            .expect("💀 download file");

        assert_eq!(the_written, 17);
        assert_eq!(
            std::fs::read_to_string(&the_target).expect("💀 read target"),
            "id,name\n1,Laptop\n"
        );
    }

    #[tokio::test]
    async fn the_one_where_uploading_a_file_that_isnt_there_is_an_io_read() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        let the_error = store
            .upload_csv_file("x.csv", Path::new("/definitely/not/here.csv"))
            .await
            .expect_err("💀 missing local file should fail");
        assert_eq!(the_error.kind(), ErrorKind::IoRead);
    }

    #[tokio::test]
    async fn the_one_where_listing_filters_by_suffix() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        for key in ["sales/sales_data.csv", "notes/readme.txt", "employees/employees_data.csv"] {
            store.upload_csv(key, "a\n1\n").await.expect("💀 put");
        }

        let mut the_keys = store.csv_keys().await;
        the_keys.sort();
        assert_eq!(
            the_keys,
            vec!["employees/employees_data.csv", "sales/sales_data.csv"]
        );
    }

    #[tokio::test]
    async fn the_one_where_a_long_listing_comes_back_in_pages_and_nothing_repeats() {
        let (server, fake) = FakeS3::start_paged(2).await;
        let store = S3ObjectStore::connect(&store_config_for(&server))
            .await
            .expect("💀 connect");
        let the_uploaded: Vec<String> = (1..=5).map(|i| format!("part-{i}.csv")).collect();
        for key in &the_uploaded {
            store.upload_csv(key, "a\n1\n").await.expect("💀 put");
        }

        let mut the_listed = store
            .try_list_objects(BUCKET, ".csv")
            .await
            .expect("💀 paged listing");
        assert_eq!(the_listed.len(), 5, "💀 a key went missing or came back twice");
        the_listed.sort();
        assert_eq!(the_listed, the_uploaded);
        // -- 📄 5 keys at 2 per page: three round trips, not one
        assert_eq!(fake.list_calls(), 3);
    }

    #[tokio::test]
    async fn the_one_where_deleting_nothing_is_still_a_success() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        store.upload_csv("doomed.csv", "a\n1\n").await.expect("💀 put");

        store.delete_object(BUCKET, "doomed.csv").await.expect("💀 first delete");
        store
            .delete_object(BUCKET, "doomed.csv")
            .await
            .expect("💀 deleting an absent key must not fail");
        assert!(!store.exists(BUCKET, "doomed.csv").await);
    }

    #[tokio::test]
    async fn the_one_where_a_backend_that_404s_deletes_is_still_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404).set_body_raw(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message></Error>",
                "application/xml",
            ))
            .mount(&server)
            .await;

        let store = S3ObjectStore::new(&store_config_for(&server));
        store
            .delete_object(BUCKET, "never-was.csv")
            .await
            .expect("💀 a 404 on delete is still 'gone'");
    }

    #[tokio::test]
    async fn the_one_where_exists_tells_present_from_absent() {
        let (_server, _fake, store) = the_store_with_a_bucket().await;
        store.upload_csv("here.csv", "a\n1\n").await.expect("💀 put");

        assert!(store.exists(BUCKET, "here.csv").await);
        assert!(!store.exists(BUCKET, "there.csv").await);
        assert_eq!(store.try_exists(BUCKET, "there.csv").await.ok(), Some(false));
    }

    #[tokio::test]
    async fn the_one_where_lenient_calls_swallow_a_500_and_strict_ones_dont() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let store = S3ObjectStore::new(&store_config_for(&server));

        assert!(!store.exists(BUCKET, "whatever.csv").await);
        assert!(store.list_objects(BUCKET, ".csv").await.is_empty());

        let the_strict_exists = store
            .try_exists(BUCKET, "whatever.csv")
            .await
            .expect_err("💀 strict exists should surface the 500");
        assert_eq!(the_strict_exists.kind(), ErrorKind::StoreUnavailable);
        let the_strict_list = store
            .try_list_objects(BUCKET, ".csv")
            .await
            .expect_err("💀 strict list should surface the 500");
        assert_eq!(the_strict_list.kind(), ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn the_one_where_bad_keys_get_access_denied() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(403).set_body_raw(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <Error><Code>AccessDenied</Code><Message>Access Denied.</Message></Error>",
                "application/xml",
            ))
            .mount(&server)
            .await;
        let store = S3ObjectStore::new(&store_config_for(&server));

        let the_put = store
            .upload_csv("nope.csv", "a\n1\n")
            .await
            .expect_err("💀 403 on put");
        assert_eq!(the_put.kind(), ErrorKind::AccessDenied);

        let the_ensure = store
            .ensure_bucket(BUCKET)
            .await
            .expect_err("💀 403 on head bucket");
        assert_eq!(the_ensure.kind(), ErrorKind::AccessDenied);
    }

    #[tokio::test]
    async fn the_one_where_nobody_is_listening_on_the_endpoint() {
        let the_config = StoreConfig {
            // -- 📡 port 1: reserved, unloved, and reliably refusing connections
            endpoint: "http://127.0.0.1:1".to_string(),
            ..StoreConfig::local()
        };
        let store = S3ObjectStore::new(&the_config);

        let the_error = store
            .ensure_bucket(BUCKET)
            .await
            .expect_err("💀 nothing should be listening on port 1");
        assert_eq!(the_error.kind(), ErrorKind::StoreUnavailable);
    }

    #[tokio::test]
    async fn the_one_where_a_zero_ttl_url_is_born_expired() {
        let store = S3ObjectStore::new(&StoreConfig::local());

        let the_url = store
            .presigned_url(BUCKET, "analytics/city_salary_summary.csv", 0, PresignMethod::Get)
            .await
            .expect("💀 zero TTL is passed through, not rejected");

        assert!(the_url.contains("X-Amz-Expires=0"), "{the_url}");
        assert!(the_url.starts_with("http://localhost:9000/data-lake/analytics/"), "{the_url}");
    }

    #[tokio::test]
    async fn the_one_where_a_normal_ttl_url_carries_its_signature() {
        let store = S3ObjectStore::new(&StoreConfig::local());

        let the_url = store
            .presigned_url(BUCKET, "sales/sales_data.csv", 3600, PresignMethod::Put)
            .await
            .expect("💀 an hour is a perfectly normal TTL");

        assert!(the_url.contains("X-Amz-Expires=3600"), "{the_url}");
        assert!(the_url.contains("X-Amz-Signature="), "{the_url}");
    }

    #[tokio::test]
    async fn the_one_where_the_signer_refuses_a_ttl_longer_than_a_week() {
        let store = S3ObjectStore::new(&StoreConfig::local());

        let the_error = store
            .presigned_url(BUCKET, "x.csv", 8 * 24 * 60 * 60, PresignMethod::Get)
            .await
            .expect_err("💀 the SDK caps presigned URLs at seven days");
        assert_eq!(the_error.kind(), ErrorKind::Presign);
    }
}
