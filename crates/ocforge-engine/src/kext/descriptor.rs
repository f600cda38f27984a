//! Kext bundle descriptors read from `Contents/Info.plist`.

use std::fs;
use std::path::{Path, PathBuf};

use ocforge_core::codec::decode_with;
use ocforge_core::config::LimitsConfig;
use ocforge_core::{DocumentValue, OcError};
use serde::Serialize;
use thiserror::Error;

/// Why a bundle's descriptor could not be turned into a [`KextDescriptor`].
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("bundle path has no name: {0}")]
    Unnamed(PathBuf),

    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] OcError),

    #[error("{0}")]
    Shape(String),
}

impl DescriptorError {
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }
}

/// What the reconciler needs to know about one kext bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KextDescriptor {
    /// `CFBundleIdentifier`; empty when the bundle declares none.
    pub bundle_id: String,
    /// Bundle directory name, e.g. `Lilu.kext`.
    pub dir_name: String,
    /// `CFBundleExecutable`; `None` for codeless bundles.
    pub executable: Option<String>,
    /// `OSBundleLibraries`, identifier to version, in declared order.
    pub libraries: Vec<(String, String)>,
}

impl KextDescriptor {
    pub fn new(bundle_id: impl Into<String>, dir_name: impl Into<String>) -> Self {
        Self {
            bundle_id: bundle_id.into(),
            dir_name: dir_name.into(),
            executable: None,
            libraries: Vec::new(),
        }
    }

    pub fn with_executable(mut self, exe: impl Into<String>) -> Self {
        self.executable = Some(exe.into());
        self
    }

    pub fn with_library(mut self, id: impl Into<String>, version: impl Into<String>) -> Self {
        self.libraries.push((id.into(), version.into()));
        self
    }

    /// Build from a decoded `Info.plist`.
    pub fn from_info(dir_name: &str, info: &DocumentValue) -> Result<Self, DescriptorError> {
        let d = info.as_mapping().ok_or_else(|| {
            DescriptorError::shape(format!("descriptor root is {}, expected dict", info.kind()))
        })?;

        let bundle_id = match d.get("CFBundleIdentifier") {
            None => String::new(),
            Some(v) => v
                .as_str()
                .ok_or_else(|| DescriptorError::shape("CFBundleIdentifier is not a string"))?
                .to_string(),
        };

        let executable = match d.get("CFBundleExecutable") {
            None => None,
            Some(v) => Some(
                v.as_str()
                    .ok_or_else(|| DescriptorError::shape("CFBundleExecutable is not a string"))?
                    .to_string(),
            ),
        };

        let mut libraries = Vec::new();
        if let Some(libs) = d.get("OSBundleLibraries") {
            let libs = libs
                .as_mapping()
                .ok_or_else(|| DescriptorError::shape("OSBundleLibraries is not a dict"))?;
            for (id, version) in libs.iter() {
                libraries.push((id.to_string(), version.as_str().unwrap_or("").to_string()));
            }
        }

        Ok(Self {
            bundle_id,
            dir_name: dir_name.to_string(),
            executable,
            libraries,
        })
    }

    /// Read and decode `<bundle>/<descriptor_path>`.
    pub fn read(
        bundle: &Path,
        descriptor_path: &str,
        limits: &LimitsConfig,
    ) -> Result<Self, DescriptorError> {
        let dir_name = bundle
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DescriptorError::Unnamed(bundle.to_path_buf()))?;
        let path = bundle.join(descriptor_path);
        let bytes = fs::read(&path).map_err(|source| DescriptorError::Read { path, source })?;
        let info = decode_with(&bytes, limits)?;
        Self::from_info(dir_name, &info)
    }
}
