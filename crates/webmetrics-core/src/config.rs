//! Status-bucket configuration consumed at middleware construction.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::error::{Result, WebMetricsError};

/// Which status codes get their own meter, and what the rest are called.
///
/// Matching is exact: `503` only lands in a named bucket if `503` itself is
/// configured. Everything unlisted goes to `other_bucket`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketConfig {
    /// Group part of every metric name.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Status code -> meter label.
    #[serde(default = "default_status_buckets")]
    pub status_buckets: BTreeMap<u16, String>,

    /// Label of the catch-all meter.
    #[serde(default = "default_other_bucket")]
    pub other_bucket: String,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            status_buckets: default_status_buckets(),
            other_bucket: default_other_bucket(),
        }
    }
}

impl BucketConfig {
    pub fn new(status_buckets: BTreeMap<u16, String>, other_bucket: impl Into<String>) -> Self {
        Self {
            namespace: default_namespace(),
            status_buckets,
            other_bucket: other_bucket.into(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(WebMetricsError::InvalidConfig("namespace must not be empty".into()));
        }
        if self.other_bucket.trim().is_empty() {
            return Err(WebMetricsError::InvalidConfig("other_bucket must not be empty".into()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (code, label) in &self.status_buckets {
            if !(100..=599).contains(code) {
                return Err(WebMetricsError::InvalidConfig(format!(
                    "status_buckets: {code} is not an HTTP status code"
                )));
            }
            if label.trim().is_empty() {
                return Err(WebMetricsError::InvalidConfig(format!(
                    "status_buckets: label for {code} must not be empty"
                )));
            }
            // Two buckets sharing a label would share one meter.
            if label == &self.other_bucket {
                return Err(WebMetricsError::InvalidConfig(format!(
                    "status_buckets: label {label:?} collides with other_bucket"
                )));
            }
            if !seen.insert(label.as_str()) {
                return Err(WebMetricsError::InvalidConfig(format!(
                    "status_buckets: label {label:?} used more than once"
                )));
            }
        }
        Ok(())
    }
}

fn default_namespace() -> String {
    "webmetrics".into()
}

fn default_status_buckets() -> BTreeMap<u16, String> {
    [
        (200, "ok"),
        (201, "created"),
        (204, "noContent"),
        (400, "badRequest"),
        (404, "notFound"),
        (500, "serverError"),
    ]
    .into_iter()
    .map(|(code, label)| (code, label.to_string()))
    .collect()
}

fn default_other_bucket() -> String {
    "other".into()
}
