//! Directory list of the selected admission year.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};
use validator::Validate;

use admissions_client::DirectoryApi;
use admissions_core::AppResult;
use admissions_core::error::AppError;
use admissions_core::traits::Notifier;
use admissions_core::types::{DirectoryId, Notice};
use admissions_entity::directory::{CreateDirectory, Directory};

/// What the catalog currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    /// Selected admission year, `None` for all years.
    pub year: Option<i32>,
    /// Directories of that year.
    pub directories: Vec<Directory>,
}

/// Shared directory list.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    /// Backend access.
    api: Arc<dyn DirectoryApi>,
    /// User-facing notices.
    notifier: Arc<dyn Notifier>,
    /// Current state.
    sender: Arc<watch::Sender<CatalogState>>,
}

impl DirectoryCatalog {
    /// Creates an empty catalog.
    pub fn new(api: Arc<dyn DirectoryApi>, notifier: Arc<dyn Notifier>) -> Self {
        let (sender, _) = watch::channel(CatalogState::default());
        Self {
            api,
            notifier,
            sender: Arc::new(sender),
        }
    }

    /// Observe the catalog.
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.sender.subscribe()
    }

    /// Copy of the current directory list.
    pub fn directories(&self) -> Vec<Directory> {
        self.sender.borrow().directories.clone()
    }

    /// Selected year.
    pub fn year(&self) -> Option<i32> {
        self.sender.borrow().year
    }

    /// Load the directories of `year`. On failure the list is emptied and a
    /// notice is shown.
    pub async fn load(&self, year: Option<i32>) -> Vec<Directory> {
        let directories = match self.api.list_directories(year).await {
            Ok(directories) => directories,
            Err(e) => {
                warn!(?year, error = %e, "Failed to load directories");
                self.notifier.notify(Notice::error(format!(
                    "Failed to load directories: {}",
                    e.message
                )));
                Vec::new()
            }
        };

        self.sender.send_replace(CatalogState {
            year,
            directories: directories.clone(),
        });
        directories
    }

    /// Validate and create a directory, appending it to the list.
    pub async fn create(&self, draft: CreateDirectory) -> AppResult<Directory> {
        if let Err(errors) = draft.validate() {
            let message = validation_message(&errors);
            self.notifier.notify(Notice::error(message.clone()));
            return Err(AppError::validation(message));
        }

        match self.api.create_directory(&draft).await {
            Ok(directory) => {
                info!(directory_id = %directory.id, name = %directory.name, "Directory created");
                self.sender
                    .send_modify(|state| state.directories.push(directory.clone()));
                self.notifier.notify(Notice::success("Directory created"));
                Ok(directory)
            }
            Err(e) => {
                warn!(name = %draft.name, error = %e, "Failed to create directory");
                self.notifier.notify(Notice::error(e.message.clone()));
                Err(e)
            }
        }
    }

    /// Delete a directory. System directories are refused locally.
    pub async fn delete(&self, directory_id: DirectoryId) -> AppResult<()> {
        let is_system = self
            .sender
            .borrow()
            .directories
            .iter()
            .any(|d| d.id == directory_id && d.is_system);
        if is_system {
            let err = AppError::validation("System directories cannot be deleted");
            self.notifier.notify(Notice::error(err.message.clone()));
            return Err(err);
        }

        match self.api.delete_directory(directory_id).await {
            Ok(()) => {
                info!(%directory_id, "Directory deleted");
                self.sender
                    .send_modify(|state| state.directories.retain(|d| d.id != directory_id));
                self.notifier.notify(Notice::success("Directory deleted"));
                Ok(())
            }
            Err(e) => {
                warn!(%directory_id, error = %e, "Failed to delete directory");
                self.notifier.notify(Notice::error(e.message.clone()));
                Err(e)
            }
        }
    }
}

/// First message of each invalid attribute, joined.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().take(1).map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
