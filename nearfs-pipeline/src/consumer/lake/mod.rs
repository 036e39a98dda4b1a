//! NEAR Lake block source.
//!
//! Reads blocks straight from a NEAR Lake bucket: one `block.json` per height
//! plus one `shard_N.json` per chunk of the block. Heights are discovered with
//! delimited listings, so gaps in the chain are skipped naturally.

mod bucket;
mod layout;

use std::sync::Arc;
use std::time::Duration;

use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use nearfs_shared::types::{Block, BlockHeader, BlockHeight, Shard};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::consumer::{BlockSource, BlockStream};
use crate::errors::ConsumerError;

pub use bucket::{LakeBucket, S3LakeBucket};
pub use layout::{block_folder, block_key, parse_block_folder, shard_key};

pub const DEFAULT_BUCKET: &str = "near-lake-data-mainnet";
pub const DEFAULT_REGION: &str = "eu-central-1";
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration of a [`LakeSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LakeConfig {
    pub bucket: String,
    pub region: String,
    /// S3-compatible endpoint overriding the AWS default.
    pub endpoint: Option<String>,
    /// Number of blocks listed per request and fetched concurrently.
    pub batch_size: usize,
    /// Keep polling for new blocks at the chain tip instead of ending the stream.
    pub follow: bool,
    pub poll_interval: Duration,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            batch_size: DEFAULT_BATCH_SIZE,
            follow: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Subset of `block.json` needed to assemble a block.
#[derive(Debug, Deserialize)]
struct LakeBlock {
    header: BlockHeader,
    #[serde(default)]
    chunks: Vec<serde_json::Value>,
}

/// Block source backed by a NEAR Lake S3 bucket.
#[derive(Clone)]
pub struct LakeSource {
    bucket: Arc<dyn LakeBucket>,
    config: LakeConfig,
}

impl LakeSource {
    pub fn new(client: aws_sdk_s3::Client, config: LakeConfig) -> Self {
        let bucket = S3LakeBucket::new(client, config.bucket.clone());
        Self::with_bucket(Arc::new(bucket), config)
    }

    pub fn with_bucket(bucket: Arc<dyn LakeBucket>, config: LakeConfig) -> Self {
        Self { bucket, config }
    }

    /// Builds the S3 client from the standard AWS environment.
    ///
    /// Credentials are picked up from `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`,
    /// profiles or instance metadata. A custom endpoint switches to path-style
    /// addressing, which S3-compatible stores expect.
    pub async fn from_env(config: LakeConfig) -> Self {
        let mut config_loader =
            aws_config::from_env().region(aws_config::Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint {
            config_loader = config_loader.endpoint_url(endpoint);
        }
        let sdk_config = config_loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            batch_size = config.batch_size,
            "NEAR Lake source configured"
        );

        Self::new(aws_sdk_s3::Client::from_conf(s3_config), config)
    }

    pub fn config(&self) -> &LakeConfig {
        &self.config
    }
}

#[async_trait]
impl BlockSource for LakeSource {
    async fn stream_blocks(&self, start_height: BlockHeight) -> Result<BlockStream, ConsumerError> {
        Ok(Box::pin(lake_stream(
            self.bucket.clone(),
            self.config.clone(),
            start_height,
        )))
    }
}

fn lake_stream(
    bucket: Arc<dyn LakeBucket>,
    config: LakeConfig,
    start_height: BlockHeight,
) -> impl Stream<Item = Result<Block, ConsumerError>> + Send {
    try_stream! {
        let batch_size = config.batch_size.max(1);
        let mut next_height = start_height;

        loop {
            let heights = list_heights(bucket.as_ref(), batch_size, next_height).await?;

            if heights.is_empty() {
                if !config.follow {
                    info!(next_height, "Reached the end of the lake bucket");
                    break;
                }
                debug!(
                    next_height,
                    poll_interval_ms = config.poll_interval.as_millis() as u64,
                    "No new blocks, waiting for the chain tip to advance"
                );
                tokio::time::sleep(config.poll_interval).await;
                continue;
            }

            // Fetch the whole listing concurrently but hand blocks out in order.
            let mut blocks = futures::stream::iter(
                heights
                    .into_iter()
                    .map(|height| fetch_block(bucket.clone(), height)),
            )
            .buffered(batch_size);

            while let Some(block) = blocks.next().await {
                let block = block?;
                next_height = block.height() + 1;
                yield block;
            }
        }
    }
}

/// Lists up to `batch_size` block heights `>= from`.
async fn list_heights(
    bucket: &dyn LakeBucket,
    batch_size: usize,
    from: BlockHeight,
) -> Result<Vec<BlockHeight>, ConsumerError> {
    // "000000000010" sorts right before "000000000010/", so the start height
    // itself is included.
    let start_after = block_folder(from);

    let heights = bucket
        .list_block_folders(&start_after, batch_size)
        .await?
        .iter()
        .map(|prefix| parse_block_folder(prefix))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(from, listed = heights.len(), "Listed lake blocks");
    Ok(heights)
}

async fn fetch_block(
    bucket: Arc<dyn LakeBucket>,
    height: BlockHeight,
) -> Result<Block, ConsumerError> {
    let lake_block: LakeBlock = fetch_json(bucket.as_ref(), &block_key(height)).await?;

    let shards = futures::future::try_join_all(
        (0..lake_block.chunks.len())
            .map(|shard| fetch_json::<Shard>(bucket.as_ref(), shard_key(height, shard))),
    )
    .await?;

    Ok(Block::new(lake_block.header, shards))
}

async fn fetch_json<T: DeserializeOwned>(
    bucket: &dyn LakeBucket,
    key: impl AsRef<str>,
) -> Result<T, ConsumerError> {
    let key = key.as_ref();
    let body = bucket.get_object(key).await?;

    serde_json::from_slice(&body).map_err(|e| ConsumerError::Decode {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::TryStreamExt;
    use serde_json::json;
    use tokio::sync::Mutex;

    /// Bucket listing with S3 delimiter semantics over a fixed key set.
    #[derive(Default)]
    struct MemoryLakeBucket {
        objects: BTreeMap<String, Vec<u8>>,
        /// Listings return nothing until this many calls have been made.
        hidden_for_lists: usize,
        lists: AtomicUsize,
        start_afters: Mutex<Vec<String>>,
    }

    impl MemoryLakeBucket {
        fn with_blocks(blocks: &[(BlockHeight, usize)]) -> Self {
            let mut objects = BTreeMap::new();
            for &(height, shards) in blocks {
                let block = json!({
                    "header": {
                        "height": height,
                        "timestamp": 1_595_350_551_591_948_000u64,
                        "hash": format!("hash-{}", height),
                        "prev_hash": format!("hash-{}", height.saturating_sub(1))
                    },
                    "chunks": vec![json!({}); shards]
                });
                objects.insert(block_key(height), block.to_string().into_bytes());
                for shard in 0..shards {
                    let shard_json = json!({ "shard_id": shard, "chunk": null });
                    objects.insert(shard_key(height, shard), shard_json.to_string().into_bytes());
                }
            }
            Self {
                objects,
                ..Default::default()
            }
        }

        async fn start_afters(&self) -> Vec<String> {
            self.start_afters.lock().await.clone()
        }
    }

    #[async_trait]
    impl LakeBucket for MemoryLakeBucket {
        async fn list_block_folders(
            &self,
            start_after: &str,
            max_keys: usize,
        ) -> Result<Vec<String>, ConsumerError> {
            self.start_afters.lock().await.push(start_after.to_string());
            if self.lists.fetch_add(1, Ordering::SeqCst) < self.hidden_for_lists {
                return Ok(Vec::new());
            }

            let folders: BTreeSet<String> = self
                .objects
                .keys()
                .filter(|key| key.as_str() > start_after)
                .filter_map(|key| key.split_once('/').map(|(folder, _)| format!("{}/", folder)))
                .collect();
            Ok(folders.into_iter().take(max_keys).collect())
        }

        async fn get_object(&self, key: &str) -> Result<Vec<u8>, ConsumerError> {
            self.objects
                .get(key)
                .cloned()
                .ok_or_else(|| ConsumerError::Fetch {
                    key: key.to_string(),
                    message: "NoSuchKey".to_string(),
                })
        }
    }

    fn config(batch_size: usize, follow: bool) -> LakeConfig {
        LakeConfig {
            batch_size,
            follow,
            ..Default::default()
        }
    }

    async fn heights(source: &LakeSource, start_height: BlockHeight) -> Vec<BlockHeight> {
        source
            .stream_blocks(start_height)
            .await
            .unwrap()
            .map_ok(|block| block.height())
            .try_collect()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_multi_batch_listing_is_contiguous() {
        let bucket = Arc::new(MemoryLakeBucket::with_blocks(&[
            (10, 1),
            (11, 1),
            (12, 1),
            (13, 1),
            (14, 1),
        ]));
        let source = LakeSource::with_bucket(bucket.clone(), config(2, false));

        assert_eq!(heights(&source, 10).await, vec![10, 11, 12, 13, 14]);
        assert_eq!(
            bucket.start_afters().await,
            vec!["000000000010", "000000000012", "000000000014", "000000000015"]
        );
    }

    #[tokio::test]
    async fn test_start_height_is_included_and_earlier_blocks_are_not() {
        let bucket = Arc::new(MemoryLakeBucket::with_blocks(&[(9, 0), (10, 0), (11, 0)]));
        let source = LakeSource::with_bucket(bucket, config(20, false));

        assert_eq!(heights(&source, 10).await, vec![10, 11]);
    }

    #[tokio::test]
    async fn test_sparse_heights_are_skipped() {
        let bucket = Arc::new(MemoryLakeBucket::with_blocks(&[(10, 0), (13, 0), (20, 0)]));
        let source = LakeSource::with_bucket(bucket, config(2, false));

        assert_eq!(heights(&source, 11).await, vec![13, 20]);
    }

    #[tokio::test]
    async fn test_empty_listing_ends_stream_without_follow() {
        let bucket = Arc::new(MemoryLakeBucket::default());
        let source = LakeSource::with_bucket(bucket.clone(), config(20, false));

        assert!(heights(&source, 0).await.is_empty());
        assert_eq!(bucket.start_afters().await, vec!["000000000000"]);
    }

    #[tokio::test]
    async fn test_shards_are_fetched_in_order() {
        let bucket = Arc::new(MemoryLakeBucket::with_blocks(&[(10, 3)]));
        let source = LakeSource::with_bucket(bucket, config(20, false));

        let blocks: Vec<Block> = source
            .stream_blocks(10)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(blocks.len(), 1);
        let shard_ids: Vec<u64> = blocks[0].shards.iter().map(|shard| shard.shard_id).collect();
        assert_eq!(shard_ids, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_error_ends_stream() {
        let mut bucket = MemoryLakeBucket::with_blocks(&[(10, 0), (11, 2), (12, 0)]);
        bucket.objects.remove(&shard_key(11, 1));
        let source = LakeSource::with_bucket(Arc::new(bucket), config(20, false));

        let mut stream = source.stream_blocks(10).await.unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap().height(), 10);
        assert!(matches!(
            stream.next().await.unwrap(),
            Err(ConsumerError::Fetch { key, .. }) if key == "000000000011/shard_1.json"
        ));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_folder_is_an_error() {
        let mut bucket = MemoryLakeBucket::default();
        bucket.objects.insert("latest/block.json".to_string(), Vec::new());
        let source = LakeSource::with_bucket(Arc::new(bucket), config(20, false));

        let mut stream = source.stream_blocks(0).await.unwrap();

        assert!(matches!(
            stream.next().await.unwrap(),
            Err(ConsumerError::InvalidBlockFolder(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_polls_until_blocks_appear() {
        let mut bucket = MemoryLakeBucket::with_blocks(&[(10, 0)]);
        bucket.hidden_for_lists = 2;
        let bucket = Arc::new(bucket);
        let source = LakeSource::with_bucket(bucket.clone(), config(20, true));

        let mut stream = source.stream_blocks(10).await.unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap().height(), 10);
        assert_eq!(bucket.lists.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_default_config() {
        let config = LakeConfig::default();
        assert_eq!(config.bucket, "near-lake-data-mainnet");
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.batch_size, 20);
        assert!(config.follow);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_lake_block_counts_chunks() {
        let block: LakeBlock = serde_json::from_str(
            r#"{
                "author": "node1",
                "header": {
                    "height": 9820214,
                    "timestamp": 1595370903490523743,
                    "hash": "4L5F",
                    "prev_hash": "3ZbC"
                },
                "chunks": [{ "shard_id": 0 }, { "shard_id": 1 }, { "shard_id": 2 }]
            }"#,
        )
        .unwrap();

        assert_eq!(block.header.height, 9820214);
        assert_eq!(block.chunks.len(), 3);
    }
}
