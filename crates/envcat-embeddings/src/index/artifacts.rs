//! The three index artifacts, written and loaded as one unit.
//!
//! `similarity.index` layout (little-endian):
//!
//! ```text
//! magic "ECIX" | u32 format version | u32 build-id length | build-id bytes
//! u64 vector count | u32 dimensions | count × dimensions f32
//! ```
//!
//! `slot_mapping.json` and `metadata_snapshot.json` carry the same build id.
//! A load that finds any disagreement between the three is refused.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use envcat_core::constants::{
    INDEX_FILE_NAME, INDEX_FORMAT_VERSION, INDEX_MAGIC, METADATA_SNAPSHOT_FILE_NAME,
    SLOT_MAPPING_FILE_NAME,
};
use envcat_core::errors::{EnvcatResult, IndexError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::FlatIndex;

/// One slot of the index, resolved to the record it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub slot: usize,
    pub record_id: String,
    pub source_id: String,
}

/// Slot → record mapping plus the model the vectors came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotMapping {
    pub build_id: String,
    pub model_name: String,
    pub dimensions: usize,
    pub created_at: DateTime<Utc>,
    pub slots: Vec<SlotEntry>,
}

impl SlotMapping {
    pub fn entry(&self, slot: usize) -> Option<&SlotEntry> {
        self.slots.get(slot)
    }
}

/// Preview data per slot, served without a store round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub slot: usize,
    pub record_id: String,
    pub source_id: String,
    pub title: String,
    pub abstract_preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    pub build_id: String,
    pub entries: Vec<SnapshotEntry>,
}

impl MetadataSnapshot {
    pub fn entry(&self, slot: usize) -> Option<&SnapshotEntry> {
        self.entries.get(slot)
    }
}

/// A complete index build.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexArtifacts {
    pub index: FlatIndex,
    pub mapping: SlotMapping,
    pub snapshot: MetadataSnapshot,
}

impl IndexArtifacts {
    pub fn build_id(&self) -> &str {
        &self.mapping.build_id
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True when all three artifact files are present in `dir`.
    pub fn exists(dir: &Path) -> bool {
        artifact_paths(dir).iter().all(|p| p.is_file())
    }

    /// Check that the three parts describe the same build.
    pub fn verify(&self) -> EnvcatResult<()> {
        let mismatch = |reason: String| -> EnvcatResult<()> {
            Err(IndexError::ArtifactMismatch { reason }.into())
        };

        if self.snapshot.build_id != self.mapping.build_id {
            return mismatch(format!(
                "snapshot build {} != mapping build {}",
                self.snapshot.build_id, self.mapping.build_id
            ));
        }
        if self.index.dimensions() != self.mapping.dimensions {
            return mismatch(format!(
                "index has {} dims, mapping records {}",
                self.index.dimensions(),
                self.mapping.dimensions
            ));
        }
        let count = self.index.len();
        if self.mapping.slots.len() != count || self.snapshot.entries.len() != count {
            return mismatch(format!(
                "index holds {count} vectors, mapping {} slots, snapshot {} entries",
                self.mapping.slots.len(),
                self.snapshot.entries.len()
            ));
        }
        for (i, (slot, snap)) in self.mapping.slots.iter().zip(&self.snapshot.entries).enumerate() {
            if slot.slot != i || snap.slot != i {
                return mismatch(format!("slot {i} is out of sequence"));
            }
            if slot.record_id != snap.record_id {
                return mismatch(format!(
                    "slot {i} maps to {} but the snapshot holds {}",
                    slot.record_id, snap.record_id
                ));
            }
        }
        Ok(())
    }

    /// Write all three artifacts into `dir`. Each file is written to a
    /// temporary name first; the renames happen only once all three are on
    /// disk.
    pub fn write(&self, dir: &Path) -> EnvcatResult<()> {
        self.verify()?;
        fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let [index_path, mapping_path, snapshot_path] = artifact_paths(dir);
        let staged = [
            (index_path, encode_index(self.build_id(), &self.index)),
            (mapping_path, serde_json::to_vec_pretty(&self.mapping)?),
            (snapshot_path, serde_json::to_vec_pretty(&self.snapshot)?),
        ];

        let mut temps = Vec::with_capacity(staged.len());
        for (path, bytes) in &staged {
            let tmp = path.with_extension("tmp");
            fs::write(&tmp, bytes).map_err(|e| io_err(&tmp, e))?;
            temps.push((tmp, path));
        }
        for (tmp, path) in temps {
            fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
        }

        info!(
            build_id = self.build_id(),
            vectors = self.len(),
            dir = %dir.display(),
            "index artifacts written"
        );
        Ok(())
    }

    /// Load and cross-check the artifacts in `dir`.
    pub fn load(dir: &Path) -> EnvcatResult<Self> {
        let [index_path, mapping_path, snapshot_path] = artifact_paths(dir);

        let bytes = read_artifact(&index_path)?;
        let (build_id, index) = decode_index(&index_path, &bytes)?;
        let mapping: SlotMapping = read_json(&mapping_path)?;
        let snapshot: MetadataSnapshot = read_json(&snapshot_path)?;

        if build_id != mapping.build_id {
            return Err(IndexError::ArtifactMismatch {
                reason: format!("index build {build_id} != mapping build {}", mapping.build_id),
            }
            .into());
        }

        let artifacts = Self {
            index,
            mapping,
            snapshot,
        };
        artifacts.verify()?;
        Ok(artifacts)
    }
}

fn artifact_paths(dir: &Path) -> [PathBuf; 3] {
    [
        dir.join(INDEX_FILE_NAME),
        dir.join(SLOT_MAPPING_FILE_NAME),
        dir.join(METADATA_SNAPSHOT_FILE_NAME),
    ]
}

fn io_err(path: &Path, e: std::io::Error) -> IndexError {
    IndexError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn read_artifact(path: &Path) -> EnvcatResult<Vec<u8>> {
    fs::read(path).map_err(|e| {
        let err = if e.kind() == std::io::ErrorKind::NotFound {
            IndexError::ArtifactMissing {
                path: path.display().to_string(),
            }
        } else {
            io_err(path, e)
        };
        err.into()
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> EnvcatResult<T> {
    let bytes = read_artifact(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        IndexError::ArtifactCorrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn encode_index(build_id: &str, index: &FlatIndex) -> Vec<u8> {
    let raw = index.raw();
    let mut out = Vec::with_capacity(4 + 4 + 4 + build_id.len() + 8 + 4 + raw.len() * 4);
    out.extend_from_slice(INDEX_MAGIC);
    out.extend_from_slice(&INDEX_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(build_id.len() as u32).to_le_bytes());
    out.extend_from_slice(build_id.as_bytes());
    out.extend_from_slice(&(index.len() as u64).to_le_bytes());
    out.extend_from_slice(&(index.dimensions() as u32).to_le_bytes());
    for v in raw {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Cursor over the index file bytes.
struct Reader<'a> {
    path: &'a Path,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn corrupt(&self, reason: impl Into<String>) -> IndexError {
        IndexError::ArtifactCorrupt {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], IndexError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| self.corrupt(format!("truncated at byte {}", self.pos)))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], IndexError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn u32(&mut self) -> Result<u32, IndexError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, IndexError> {
        Ok(u64::from_le_bytes(self.array()?))
    }
}

fn decode_index(path: &Path, bytes: &[u8]) -> Result<(String, FlatIndex), IndexError> {
    let mut r = Reader { path, bytes, pos: 0 };

    if r.take(4)? != INDEX_MAGIC {
        return Err(r.corrupt("bad magic"));
    }
    let version = r.u32()?;
    if version != INDEX_FORMAT_VERSION {
        return Err(r.corrupt(format!("unsupported format version {version}")));
    }
    let id_len = r.u32()? as usize;
    let build_id = String::from_utf8(r.take(id_len)?.to_vec())
        .map_err(|_| r.corrupt("build id is not UTF-8"))?;
    let count = r.u64()? as usize;
    let dims = r.u32()? as usize;
    if dims == 0 {
        return Err(r.corrupt("zero dimensions"));
    }

    let floats = count
        .checked_mul(dims)
        .ok_or_else(|| r.corrupt("vector count overflows"))?;
    let body_len = floats
        .checked_mul(4)
        .ok_or_else(|| r.corrupt("vector count overflows"))?;
    let body = r.take(body_len)?;
    if r.pos != bytes.len() {
        return Err(r.corrupt(format!("{} trailing bytes", bytes.len() - r.pos)));
    }

    let data = body
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok((build_id, FlatIndex::from_raw(dims, data)))
}
