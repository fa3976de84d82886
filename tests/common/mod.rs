//! Common test utilities for all integration tests.
//!
//! Provides in-memory backend accessors that record every call, plus helpers
//! for building kubeconfig files on disk.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

use async_trait::async_trait;
use secret_resolver::errors::{BackendStage, ResolveError, Result};
use secret_resolver::providers::gcp::{SecretVersionAccessor, SecretVersionName};
use secret_resolver::providers::kubernetes::{SecretData, SecretObjectReader, SecretObjectRequest};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

/// A Secret read observed by [`FakeSecretReader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRead {
    pub namespace: String,
    pub name: String,
    pub kubeconfig: PathBuf,
    pub context: Option<String>,
}

/// In-memory cluster keyed by `(namespace, name)`
#[derive(Debug, Default)]
pub struct FakeSecretReader {
    secrets: HashMap<(String, String), SecretData>,
    reads: Mutex<Vec<RecordedRead>>,
}

impl FakeSecretReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, namespace: &str, name: &str, data: &[(&str, &str)]) -> Self {
        let data = data.iter().map(|(k, v)| (k.to_string(), v.as_bytes().to_vec())).collect();
        self.secrets.insert((namespace.to_string(), name.to_string()), data);
        self
    }

    pub fn reads(&self) -> Vec<RecordedRead> {
        self.reads.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }
}

#[async_trait]
impl SecretObjectReader for FakeSecretReader {
    async fn read_secret(&self, request: &SecretObjectRequest<'_>) -> Result<SecretData> {
        self.reads.lock().unwrap().push(RecordedRead {
            namespace: request.namespace.to_string(),
            name: request.name.to_string(),
            kubeconfig: request.kubeconfig.to_path_buf(),
            context: request.context.map(str::to_string),
        });

        self.secrets
            .get(&(request.namespace.to_string(), request.name.to_string()))
            .cloned()
            .ok_or_else(|| {
                ResolveError::backend(
                    BackendStage::KubeFetch,
                    format!("secrets \"{}\" not found", request.name),
                )
            })
    }
}

/// In-memory Secret Manager keyed by full version resource name
#[derive(Debug, Default)]
pub struct FakeVersionAccessor {
    versions: HashMap<String, Vec<u8>>,
    accessed: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeVersionAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, resource_name: &str, payload: impl Into<Vec<u8>>) -> Self {
        self.versions.insert(resource_name.to_string(), payload.into());
        self
    }

    pub fn accessed(&self) -> Vec<String> {
        self.accessed.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretVersionAccessor for FakeVersionAccessor {
    async fn access(&self, name: &SecretVersionName) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let resource_name = name.to_string();
        self.accessed.lock().unwrap().push(resource_name.clone());

        self.versions.get(&resource_name).cloned().ok_or_else(|| {
            ResolveError::backend(
                BackendStage::SecretManagerAccess,
                format!("NOT_FOUND: Secret [{}] not found", resource_name),
            )
        })
    }
}

/// Write a minimal kubeconfig into `dir`
pub fn write_kubeconfig(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "apiVersion: v1\nkind: Config\nclusters: []\ncontexts: []\nusers: []\n")
        .unwrap();
    path
}

/// A temporary home directory containing `.kube/config`
pub fn home_with_kubeconfig() -> TempDir {
    let home = TempDir::new().unwrap();
    let kube_dir = home.path().join(".kube");
    std::fs::create_dir_all(&kube_dir).unwrap();
    write_kubeconfig(&kube_dir, "config");
    home
}
