//! Parallel import of class files into a [`ClassGraph`].
//!
//! Artifacts are decoded concurrently (rayon). All descriptors are
//! collected before the graph is built, so the build never observes a
//! partial import.

use crate::classfile::{ArtifactReader, MalformedArtifactError};
use crate::config::ImportConfig;
use crate::graph::{BuildError, ClassGraph, ExternalResolver, GraphBuilder};
use crate::raw::RawClassDescriptor;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort an import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// An artifact could not be decoded and skipping is disabled.
    #[error("malformed artifact {artifact}: {source}")]
    Malformed {
        /// Artifact name.
        artifact: String,
        /// Decoding error.
        source: MalformedArtifactError,
    },

    /// The graph could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// IO error reading an artifact file.
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The worker pool could not be created.
    #[error("failed to start import workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),
}

/// One compiled class file.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Name used in diagnostics (usually the file path).
    pub name: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Creates an artifact.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads an artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Io`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let bytes = std::fs::read(path).map_err(|e| ImportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(path.display().to_string(), bytes))
    }
}

/// An artifact that was skipped because it could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArtifact {
    /// Artifact name.
    pub artifact: String,
    /// Why it was skipped.
    pub error: MalformedArtifactError,
}

/// Result of a successful import.
#[derive(Debug)]
pub struct Import {
    /// The built graph.
    pub graph: ClassGraph,
    /// Artifacts skipped as malformed, in input order.
    pub skipped: Vec<SkippedArtifact>,
}

/// Decodes artifacts and builds the graph.
pub struct Importer<'r> {
    reader: ArtifactReader,
    skip_malformed: bool,
    parallelism: Option<usize>,
    resolver: Option<&'r dyn ExternalResolver>,
}

impl Default for Importer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Importer<'r> {
    /// Creates an importer that skips malformed artifacts and uses the
    /// global rayon pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reader: ArtifactReader::new(),
            skip_malformed: true,
            parallelism: None,
            resolver: None,
        }
    }

    /// Creates an importer from configuration.
    #[must_use]
    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new()
            .skip_malformed(config.skip_malformed)
            .parallelism(config.parallelism)
    }

    /// Uses a custom reader.
    #[must_use]
    pub fn reader(mut self, reader: ArtifactReader) -> Self {
        self.reader = reader;
        self
    }

    /// Whether malformed artifacts are skipped (default) or abort.
    #[must_use]
    pub fn skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    /// Caps the number of decoding threads.
    #[must_use]
    pub fn parallelism(mut self, threads: Option<usize>) -> Self {
        self.parallelism = threads;
        self
    }

    /// Uses `resolver` to enrich stubs.
    #[must_use]
    pub fn resolver(mut self, resolver: &'r dyn ExternalResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Decodes all artifacts concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Malformed`] for the first malformed artifact
    /// (in input order) when skipping is disabled.
    pub fn read_all(
        &self,
        artifacts: &[Artifact],
    ) -> Result<(Vec<RawClassDescriptor>, Vec<SkippedArtifact>), ImportError> {
        let decode = || -> Vec<Result<RawClassDescriptor, MalformedArtifactError>> {
            artifacts
                .par_iter()
                .map(|artifact| {
                    debug!("Reading: {}", artifact.name);
                    self.reader.read(&artifact.bytes)
                })
                .collect()
        };
        let results = match self.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(decode),
            None => decode(),
        };

        let mut descriptors = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (artifact, result) in artifacts.iter().zip(results) {
            match result {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(error) if self.skip_malformed => {
                    warn!("Skipping malformed artifact {}: {}", artifact.name, error);
                    skipped.push(SkippedArtifact {
                        artifact: artifact.name.clone(),
                        error,
                    });
                }
                Err(source) => {
                    return Err(ImportError::Malformed {
                        artifact: artifact.name.clone(),
                        source,
                    })
                }
            }
        }
        Ok((descriptors, skipped))
    }

    /// Decodes all artifacts and builds the graph.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed artifacts (unless skipped) and for
    /// duplicate class names.
    pub fn import(&self, artifacts: &[Artifact]) -> Result<Import, ImportError> {
        info!("Importing {} artifacts", artifacts.len());
        let (descriptors, skipped) = self.read_all(artifacts)?;
        let mut builder = GraphBuilder::new().add_all(descriptors);
        if let Some(resolver) = self.resolver {
            builder = builder.resolver(resolver);
        }
        let graph = builder.build()?;
        info!(
            "Import complete: {} classes, {} stubs, {} skipped",
            graph.full_count(),
            graph.stub_count(),
            skipped.len()
        );
        Ok(Import { graph, skipped })
    }

    /// Reads the files at `paths` and imports them.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Io`] if a file cannot be read, otherwise as
    /// [`Importer::import`].
    pub fn import_paths<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Import, ImportError> {
        let artifacts = paths
            .iter()
            .map(|p| Artifact::from_path(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.import(&artifacts)
    }
}
