use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use log::{debug, info, warn, error};
use crate::errors::WikiError;
use crate::types::{Page, PageTitle};

/// Extension of every page file in the data directory
pub const PAGE_EXTENSION: &str = "txt";

/// Service for reading and writing page files
#[derive(Clone)]
pub struct PageService {
    data_dir: PathBuf,
}

impl PageService {
    /// Create a new page service rooted at `data_dir`
    pub fn new(data_dir: PathBuf) -> Self {
        debug!("Creating PageService with data directory: {:?}", data_dir);
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the data directory if it is missing
    pub fn ensure_data_dir(&self) -> Result<(), WikiError> {
        if !self.data_dir.is_dir() {
            info!("Creating data directory {:?}", self.data_dir);
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }

    /// File that holds the page with this title
    pub fn page_path(&self, title: &PageTitle) -> PathBuf {
        self.data_dir.join(format!("{}.{}", title, PAGE_EXTENSION))
    }

    /// Load a page. A missing file is `NotFound`; any other read failure is `Io`.
    pub fn load(&self, title: &PageTitle) -> Result<Page, WikiError> {
        let path = self.page_path(title);
        debug!("Loading page '{}' from {:?}", title, path);

        match fs::read(&path) {
            Ok(body) => {
                info!("Loaded page '{}', {} bytes", title, body.len());
                Ok(Page::new(title.clone(), body))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Page '{}' does not exist", title);
                Err(WikiError::NotFound)
            }
            Err(e) => {
                warn!("Failed to read page {:?}: {}", path, e);
                Err(WikiError::Io(e))
            }
        }
    }

    /// Write the page body, replacing whatever was stored before
    pub fn save(&self, page: &Page) -> Result<(), WikiError> {
        let path = self.page_path(&page.title);
        debug!("Saving page '{}' to {:?}", page.title, path);

        write_page_file(&path, &page.body).map_err(|e| {
            error!("Failed to write page {:?}: {}", path, e);
            WikiError::Save(e)
        })?;

        info!("Saved page '{}', {} bytes", page.title, page.body.len());
        Ok(())
    }
}

fn write_page_file(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(body)?;
    file.flush()
}
