//! Merging of per-page PDFs into the final document
//!
//! Artifacts are merged in ascending file-name order. Because page indices are
//! zero-padded, that order is the crawl order.

use crate::HarvestError;
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of rendered artifacts
pub const ARTIFACT_EXTENSION: &str = ".pdf";

/// Reserved name of the merged document, never merged into itself
pub const MERGED_FILE_NAME: &str = "documentacion_completa.pdf";

/// Concatenates PDF files
pub trait ArtifactMerger {
    /// Writes the concatenation of `inputs`, in order, to `output`
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), HarvestError>;
}

/// Lists the artifacts of a directory in merge order
///
/// Selects files ending in `.pdf` other than [`MERGED_FILE_NAME`] and sorts
/// them by file name.
pub fn collect_artifacts(directory: &Path) -> Result<Vec<PathBuf>, HarvestError> {
    let mut names: Vec<String> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(ARTIFACT_EXTENSION) && name != MERGED_FILE_NAME)
        .collect();

    names.sort();

    Ok(names.into_iter().map(|name| directory.join(name)).collect())
}

/// Merges every artifact of a directory into [`MERGED_FILE_NAME`]
///
/// Every PDF in the directory is merged, including ones left by an earlier
/// run (e.g. a higher `doc_NNN` from a longer crawl). Starting from a clean
/// directory is the operator's responsibility.
///
/// # Returns
///
/// * `true` - The merged document was written
/// * `false` - Nothing to merge, or the merge failed (logged). A partially
///   written output is left in place.
pub fn merge_directory<M: ArtifactMerger + ?Sized>(directory: &Path, merger: &M) -> bool {
    let artifacts = match collect_artifacts(directory) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            tracing::error!("Could not list {}: {}", directory.display(), e);
            return false;
        }
    };

    if artifacts.is_empty() {
        tracing::error!("No PDF files found to merge in {}", directory.display());
        return false;
    }

    let output = directory.join(MERGED_FILE_NAME);
    tracing::info!("Merging {} PDF files", artifacts.len());

    match merger.merge(&artifacts, &output) {
        Ok(()) => {
            tracing::info!("PDFs merged into: {}", output.display());
            true
        }
        Err(e) => {
            tracing::error!("Error merging PDFs: {}", e);
            false
        }
    }
}

/// [`ArtifactMerger`] built on `lopdf`
///
/// Pages are appended document by document; outlines of the inputs are
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfMerger;

impl PdfMerger {
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactMerger for PdfMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), HarvestError> {
        let documents = inputs
            .iter()
            .map(|path| {
                Document::load(path).map_err(|e| {
                    HarvestError::Merge(format!("could not read {}: {}", path.display(), e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut merged = concatenate(documents)?;
        merged
            .save(output)
            .map_err(|e| HarvestError::Merge(format!("could not write {}: {}", output.display(), e)))?;
        Ok(())
    }
}

/// Returns the `/Type` name of a dictionary object
fn object_type(object: &Object) -> Option<&[u8]> {
    object.as_dict().ok()?.get(b"Type").ok()?.as_name().ok()
}

/// Builds one document holding the pages of all inputs, in order
fn concatenate(documents: Vec<Document>) -> Result<Document, HarvestError> {
    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Object)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut document in documents {
        // Shift ids so objects of different inputs never collide
        document.renumber_objects_with(max_id);
        max_id = document.max_id + 1;

        for (_, page_id) in document.get_pages() {
            let page = document.get_object(page_id)?.to_owned();
            pages.push((page_id, page));
        }
        objects.extend(document.objects);
    }

    let mut merged = Document::with_version("1.5");
    let mut catalog: Option<(ObjectId, Object)> = None;
    let mut pages_root: Option<(ObjectId, Object)> = None;

    for (object_id, object) in objects {
        let kind = object_type(&object).map(<[u8]>::to_vec);
        match kind.as_deref() {
            Some(b"Catalog") => {
                if catalog.is_none() {
                    catalog = Some((object_id, object));
                }
            }
            Some(b"Pages") => {
                if let Ok(dictionary) = object.as_dict() {
                    let mut dictionary = dictionary.clone();
                    let id = match &pages_root {
                        Some((id, previous)) => {
                            if let Ok(previous) = previous.as_dict() {
                                dictionary.extend(previous);
                            }
                            *id
                        }
                        None => object_id,
                    };
                    pages_root = Some((id, Object::Dictionary(dictionary)));
                }
            }
            Some(b"Page") | Some(b"Outlines") | Some(b"Outline") => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let (pages_id, pages_object) = pages_root
        .ok_or_else(|| HarvestError::Merge("no page tree found in inputs".to_string()))?;
    let (catalog_id, catalog_object) = catalog
        .ok_or_else(|| HarvestError::Merge("no document catalog found in inputs".to_string()))?;

    let page_count = pages.len() as i64;
    let mut kids = Vec::with_capacity(pages.len());
    for (page_id, page) in pages {
        if let Ok(dictionary) = page.as_dict() {
            let mut dictionary = dictionary.clone();
            dictionary.set("Parent", pages_id);
            merged
                .objects
                .insert(page_id, Object::Dictionary(dictionary));
            kids.push(Object::Reference(page_id));
        }
    }

    let mut pages_dictionary = pages_object.as_dict()?.clone();
    pages_dictionary.set("Count", page_count);
    pages_dictionary.set("Kids", kids);
    merged
        .objects
        .insert(pages_id, Object::Dictionary(pages_dictionary));

    let mut catalog_dictionary = catalog_object.as_dict()?.clone();
    catalog_dictionary.set("Pages", pages_id);
    catalog_dictionary.remove(b"Outlines");
    merged
        .objects
        .insert(catalog_id, Object::Dictionary(catalog_dictionary));

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.compress();

    Ok(merged)
}
