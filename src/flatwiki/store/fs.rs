use super::{new_page_id, PageStore, MAX_ID_ATTEMPTS};
use crate::error::{Result, WikiError};
use crate::model::{Page, PageId};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_SUFFIX: &str = ".wiki";

/// File-per-page storage inside a single directory.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
    file_suffix: String,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
        }
    }

    pub fn with_file_suffix(mut self, suffix: &str) -> Self {
        if suffix.starts_with('.') {
            self.file_suffix = suffix.to_string();
        } else {
            self.file_suffix = format!(".{}", suffix);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_suffix(&self) -> &str {
        &self.file_suffix
    }

    fn page_path(&self, id: &PageId) -> PathBuf {
        self.root.join(format!("{}{}", id, self.file_suffix))
    }

    fn read_record(&self, id: &PageId) -> Result<Page> {
        if !id.is_well_formed() {
            return Err(WikiError::UnexistentPage(id.clone()));
        }

        let path = self.page_path(id);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(WikiError::UnexistentPage(id.clone()));
            }
            Err(err) => return Err(WikiError::StorageIo(err)),
        };

        let page: Page =
            serde_json::from_slice(&content).map_err(|err| WikiError::CorruptedRecord {
                path: path.clone(),
                reason: err.to_string(),
            })?;

        if &page.id != id {
            return Err(WikiError::CorruptedRecord {
                path,
                reason: "inconsistent page id".to_string(),
            });
        }

        Ok(page)
    }

    /// Write a record that must not exist yet.
    fn write_new_record(&self, page: &Page) -> io::Result<()> {
        let content = serde_json::to_vec(page).map_err(io::Error::from)?;
        let mut file = owner_only(OpenOptions::new().write(true).create_new(true))
            .open(self.page_path(&page.id))?;
        file.write_all(&content)?;
        file.sync_all()
    }

    /// Replace an existing record via a sibling temp file, so a failed write
    /// leaves the previous record untouched.
    fn replace_record(&self, page: &Page) -> io::Result<()> {
        let content = serde_json::to_vec(page).map_err(io::Error::from)?;
        let target = self.page_path(&page.id);
        let (tmp_path, mut file) = self.create_temp_file(&page.id)?;

        let written = file
            .write_all(&content)
            .and_then(|_| file.sync_all())
            .and_then(|_| fs::rename(&tmp_path, &target));
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    fn create_temp_file(&self, id: &PageId) -> io::Result<(PathBuf, File)> {
        loop {
            let nonce = new_page_id()?;
            let path = self.root.join(format!(".{}.{}.tmp", id, nonce));
            match owner_only(OpenOptions::new().write(true).create_new(true)).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600)
}

#[cfg(not(unix))]
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    options
}

impl PageStore for DiskStore {
    fn create(&self, page: &mut Page) -> Result<PageId> {
        let mut last_collision = None;
        for _ in 0..MAX_ID_ATTEMPTS {
            page.id = new_page_id()?;
            match self.write_new_record(page) {
                Ok(()) => {
                    log::debug!("created record {}", self.page_path(&page.id).display());
                    return Ok(page.id.clone());
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    log::warn!("page id collision on {}, drawing another", page.id);
                    last_collision = Some(err);
                }
                Err(err) => return Err(WikiError::StorageIo(err)),
            }
        }
        Err(WikiError::StorageIo(last_collision.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AlreadyExists, "no free page id")
        })))
    }

    fn read(&self, id: &PageId) -> Result<Page> {
        self.read_record(id)
    }

    fn update(&self, page: &Page) -> Result<()> {
        let _ = self.read_record(&page.id)?;
        self.replace_record(page)?;
        Ok(())
    }

    fn delete(&self, id: &PageId) -> Result<()> {
        if !id.is_well_formed() {
            return Err(WikiError::StorageIo(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no page file for id {:?}", id.as_str()),
            )));
        }
        fs::remove_file(self.page_path(id))?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<PageId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(id) = name.strip_suffix(self.file_suffix.as_str()) {
                let id = PageId::from(id);
                if id.is_well_formed() {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DiskStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn with_file_suffix_normalizes_dot() {
        assert_eq!(DiskStore::new("x").with_file_suffix("md").file_suffix(), ".md");
        assert_eq!(DiskStore::new("x").with_file_suffix(".md").file_suffix(), ".md");
    }

    #[test]
    fn create_writes_record_named_by_id() {
        let (dir, store) = setup();
        let mut page = Page::new("Sample Page", "Body");
        let id = store.create(&mut page).unwrap();

        let path = dir.path().join(format!("{}.wiki", id));
        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains("\"Title\":\"Sample Page\""));
    }

    #[cfg(unix)]
    #[test]
    fn records_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = setup();
        let mut page = Page::new("Private", "");
        let id = store.create(&mut page).unwrap();

        let mode = fs::metadata(dir.path().join(format!("{}.wiki", id)))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn read_rejects_undecodable_record() {
        let (dir, store) = setup();
        fs::write(dir.path().join("abc123.wiki"), "not json").unwrap();

        match store.read(&PageId::from("abc123")) {
            Err(WikiError::CorruptedRecord { path, .. }) => {
                assert!(path.ends_with("abc123.wiki"))
            }
            other => panic!("expected CorruptedRecord, got {:?}", other),
        }
    }

    #[test]
    fn read_rejects_record_with_foreign_id() {
        let (dir, store) = setup();
        fs::write(
            dir.path().join("abc123.wiki"),
            r#"{"Id":"def456","Title":"Moved","Body":""}"#,
        )
        .unwrap();

        match store.read(&PageId::from("abc123")) {
            Err(WikiError::CorruptedRecord { reason, .. }) => {
                assert_eq!(reason, "inconsistent page id")
            }
            other => panic!("expected CorruptedRecord, got {:?}", other),
        }
    }

    #[test]
    fn malformed_ids_never_touch_the_filesystem() {
        let (dir, store) = setup();
        fs::write(dir.path().join("secret"), "{}").unwrap();

        let id = PageId::from("../secret");
        assert!(matches!(store.read(&id), Err(WikiError::UnexistentPage(_))));

        let err = store.delete(&id).unwrap_err();
        assert!(err.is_not_found());
        assert!(dir.path().join("secret").exists());
    }

    #[test]
    fn list_all_ignores_foreign_files() {
        let (dir, store) = setup();
        let mut page = Page::new("Listed", "");
        let id = store.create(&mut page).unwrap();

        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join(".abc.def.tmp"), "").unwrap();
        fs::create_dir(dir.path().join("nested.wiki")).unwrap();

        assert_eq!(store.list_all().unwrap(), vec![id]);
    }

    #[test]
    fn update_leaves_no_temp_files() {
        let (dir, store) = setup();
        let mut page = Page::new("Draft", "v1");
        store.create(&mut page).unwrap();

        page.body = "v2".into();
        store.update(&page).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{}.wiki", page.id)]);
    }

    #[test]
    fn list_all_on_missing_directory_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path().join("absent"));
        assert!(matches!(store.list_all(), Err(WikiError::StorageIo(_))));
    }
}
