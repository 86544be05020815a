//! Recursive folder-tree walker.
//!
//! Starting from the root folder, lists each folder's children through a
//! [`FileStore`], keeps the recognized documents (tagged with the folder
//! path they were found under) and descends into sub-folders, depth-first.
//! Each subtree is walked to completion before its results are merged into
//! the parent's.
//!
//! A folder that cannot be listed is logged, recorded as a
//! [`ListingFailure`] and skipped; the rest of the tree is still walked.
//! There is no retry and no depth limit: the store is assumed acyclic.
//!
//! Child order is whatever the store returns unless
//! [`WalkOptions::sort_children`] is set, in which case each folder's
//! children are sorted by name first.

use std::future::Future;
use std::pin::Pin;
use tracing::{debug, error};

use crate::config::DriveConfig;
use crate::models::{ItemKind, WalkedDocument};
use crate::progress::{FetchProgressEvent, FetchProgressReporter};
use crate::traits::FileStore;

#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// First path segment, standing in for the root folder's name.
    pub root_label: String,
    pub sort_children: bool,
}

impl WalkOptions {
    pub fn from_config(config: &DriveConfig) -> Self {
        Self {
            root_label: config.root_label.clone(),
            sort_children: config.sort_children,
        }
    }
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::from_config(&DriveConfig::default())
    }
}

/// A folder whose listing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFailure {
    pub path: String,
    pub folder_id: String,
    pub message: String,
}

/// Everything one (sub)tree walk produced.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub documents: Vec<WalkedDocument>,
    pub failures: Vec<ListingFailure>,
    pub folders_listed: u64,
}

impl WalkOutcome {
    fn merge(&mut self, child: WalkOutcome) {
        self.documents.extend(child.documents);
        self.failures.extend(child.failures);
        self.folders_listed += child.folders_listed;
    }
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = WalkOutcome> + Send + 'a>>;

/// Walk the whole tree under `root_id`.
pub async fn walk_tree(
    store: &dyn FileStore,
    root_id: &str,
    options: &WalkOptions,
    progress: &dyn FetchProgressReporter,
) -> WalkOutcome {
    let outcome = walk_folder(
        store,
        root_id.to_string(),
        options.root_label.clone(),
        options,
        progress,
        0,
    )
    .await;

    progress.report(FetchProgressEvent::Finished {
        folders: outcome.folders_listed,
        documents: outcome.documents.len() as u64,
    });
    outcome
}

fn walk_folder<'a>(
    store: &'a dyn FileStore,
    folder_id: String,
    path: String,
    options: &'a WalkOptions,
    progress: &'a dyn FetchProgressReporter,
    found_before: u64,
) -> WalkFuture<'a> {
    Box::pin(async move {
        let mut outcome = WalkOutcome::default();

        let mut children = match store.list_children(&folder_id).await {
            Ok(children) => children,
            Err(e) => {
                error!(path = %path, folder = %folder_id, error = %e, "error scanning folder");
                outcome.failures.push(ListingFailure {
                    path,
                    folder_id,
                    message: e.to_string(),
                });
                return outcome;
            }
        };
        outcome.folders_listed = 1;

        if options.sort_children {
            children.sort_by(|a, b| a.name.cmp(&b.name));
        }
        debug!(path = %path, children = children.len(), store = store.name(), "listed folder");

        for child in children {
            match child.kind() {
                ItemKind::Document => outcome.documents.push(WalkedDocument {
                    item: child,
                    folder_path: path.clone(),
                }),
                ItemKind::Folder => {
                    let sub_path = format!("{}/{}", path, child.name);
                    let found = found_before + outcome.documents.len() as u64;
                    let sub = walk_folder(store, child.id, sub_path, options, progress, found).await;
                    outcome.merge(sub);
                }
                ItemKind::Other => {}
            }
        }

        progress.report(FetchProgressEvent::Scanned {
            path,
            found: found_before + outcome.documents.len() as u64,
        });
        outcome
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriveItem, MIME_FOLDER, MIME_PDF};
    use crate::progress::NoProgress;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn item(id: &str, name: &str, mime: &str) -> DriveItem {
        DriveItem {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime.to_string(),
            web_view_link: Some(format!("https://drive.test/{}", id)),
            web_content_link: None,
            modified_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            size: None,
        }
    }

    #[derive(Default)]
    struct MapStore {
        folders: HashMap<String, Vec<DriveItem>>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FileStore for MapStore {
        fn name(&self) -> &str {
            "map"
        }

        async fn list_children(&self, folder_id: &str) -> Result<Vec<DriveItem>> {
            self.calls.lock().unwrap().push(folder_id.to_string());
            match self.folders.get(folder_id) {
                Some(children) => Ok(children.clone()),
                None => bail!("404 folder {}", folder_id),
            }
        }
    }

    fn store() -> MapStore {
        let mut folders = HashMap::new();
        folders.insert(
            "root".to_string(),
            vec![
                item("g6", "Grade 6", MIME_FOLDER),
                item("readme", "README.txt", "text/plain"),
                item("loose", "loose.pdf", MIME_PDF),
            ],
        );
        folders.insert("g6".to_string(), vec![item("sci", "Science", MIME_FOLDER)]);
        folders.insert("sci".to_string(), vec![item("en", "English", MIME_FOLDER)]);
        folders.insert(
            "en".to_string(),
            vec![
                item("p2", "b.pdf", MIME_PDF),
                item("p1", "a.pdf", MIME_PDF),
            ],
        );
        MapStore {
            folders,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn collects_documents_with_paths() {
        let store = store();
        let outcome = walk_tree(&store, "root", &WalkOptions::default(), &NoProgress).await;

        let found: Vec<(String, String)> = outcome
            .documents
            .iter()
            .map(|d| (d.folder_path.clone(), d.item.name.clone()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Nenamaga/Grade 6/Science/English".to_string(), "b.pdf".to_string()),
                ("Nenamaga/Grade 6/Science/English".to_string(), "a.pdf".to_string()),
                ("Nenamaga".to_string(), "loose.pdf".to_string()),
            ]
        );
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.folders_listed, 4);
    }

    #[tokio::test]
    async fn sorts_children_when_asked() {
        let store = store();
        let options = WalkOptions {
            sort_children: true,
            ..WalkOptions::default()
        };
        let outcome = walk_tree(&store, "root", &options, &NoProgress).await;
        let names: Vec<&str> = outcome.documents.iter().map(|d| d.item.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "loose.pdf"]);
    }

    #[tokio::test]
    async fn failed_subtree_is_isolated() {
        let mut store = store();
        store.folders.get_mut("root").unwrap().push(item("gone", "Grade 7", MIME_FOLDER));

        let outcome = walk_tree(&store, "root", &WalkOptions::default(), &NoProgress).await;
        assert_eq!(outcome.documents.len(), 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path, "Nenamaga/Grade 7");
        assert_eq!(outcome.failures[0].folder_id, "gone");
    }

    #[tokio::test]
    async fn root_failure_yields_nothing() {
        let store = MapStore::default();
        let outcome = walk_tree(&store, "missing", &WalkOptions::default(), &NoProgress).await;
        assert!(outcome.documents.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path, "Nenamaga");
        assert_eq!(outcome.folders_listed, 0);
    }

    #[tokio::test]
    async fn ignores_non_pdf_leaves() {
        let store = store();
        let outcome = walk_tree(&store, "root", &WalkOptions::default(), &NoProgress).await;
        assert!(outcome.documents.iter().all(|d| d.item.name != "README.txt"));
        assert!(!store.calls.lock().unwrap().contains(&"readme".to_string()));
    }
}
