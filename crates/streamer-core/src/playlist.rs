//! Stream list store: the ordered list of stations, its CSV file format, and
//! in-place editing with unsaved-change tracking.
//!
//! File format:
//!
//! ```text
//! Name,Description,url
//! NPR,News,stream.npr.org/npr
//! ```
//!
//! Columns are located by header name, so their order in the file does not
//! matter and extra columns are ignored. Fields are taken verbatim; bytes
//! that are not valid UTF-8 are replaced rather than rejected.

use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::dialog::{PathPicker, PickRequest, PLAYLIST_FILTERS};
use crate::error::PlaylistError;

pub const COL_NAME: &str = "Name";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_URL: &str = "url";

/// Header row written by [`StreamList::save`].
pub const HEADER: [&str; 3] = [COL_NAME, COL_DESCRIPTION, COL_URL];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One playable item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamEntry {
    pub name: String,
    pub description: String,
    /// Host and path of the stream, written without a scheme prefix.
    pub address: String,
}

/// The three fields submitted by an entry form. Same shape as a stored entry.
pub type EntryFields = StreamEntry;

impl StreamEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            address: address.into(),
        }
    }
}

/// Ordered stream entries. Position is the only identity an entry has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamList {
    entries: Vec<StreamEntry>,
}

impl StreamList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<StreamEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, PlaylistError> {
        let file = File::open(path).map_err(|source| PlaylistError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::from_reader(file)?;
        debug!("loaded {} entries from {:?}", list.len(), path);
        Ok(list)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, PlaylistError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);

        let headers = reader.byte_headers()?.clone();
        let column = |field: &'static str| {
            headers
                .iter()
                .position(|h| h.strip_prefix(UTF8_BOM).unwrap_or(h) == field.as_bytes())
                .ok_or(PlaylistError::MissingColumn(field))
        };
        let name_col = column(COL_NAME)?;
        let description_col = column(COL_DESCRIPTION)?;
        let url_col = column(COL_URL)?;

        let mut entries = Vec::new();
        for record in reader.byte_records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let field = |col: usize, name: &'static str| {
                record
                    .get(col)
                    .map(lossy)
                    .ok_or(PlaylistError::MissingField { line, field: name })
            };
            entries.push(StreamEntry {
                name: field(name_col, COL_NAME)?,
                description: field(description_col, COL_DESCRIPTION)?,
                address: field(url_col, COL_URL)?,
            });
        }

        Ok(Self { entries })
    }

    /// Write the list to `path`. The file is written next to the target and
    /// renamed over it, so a failed save leaves the previous file intact.
    pub fn save(&self, path: &Path) -> Result<(), PlaylistError> {
        let save_error = |source: std::io::Error| PlaylistError::Save {
            path: path.to_path_buf(),
            source,
        };
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(save_error)?;
        if let Ok(meta) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(save_error)?;
        }
        self.write_to(&mut tmp).map_err(|e| save_error(e.into()))?;
        tmp.persist(path).map_err(|e| save_error(e.error))?;
        debug!("saved {} entries to {:?}", self.len(), path);
        Ok(())
    }

    pub fn write_to<W: Write>(&self, wtr: W) -> csv::Result<()> {
        let mut writer = csv::Writer::from_writer(wtr);
        writer.write_record(HEADER)?;
        for entry in &self.entries {
            writer.write_record([&entry.name, &entry.description, &entry.address])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Append an entry and return its index.
    pub fn add_entry(&mut self, entry: StreamEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Remove and return the entry at `index`.
    pub fn delete_entry(&mut self, index: usize) -> Result<StreamEntry, PlaylistError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Replace all three fields of the entry at `index`. No validation.
    pub fn update_entry(&mut self, index: usize, fields: EntryFields) -> Result<(), PlaylistError> {
        self.check_index(index)?;
        self.entries[index] = fields;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), PlaylistError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(PlaylistError::Index {
                index,
                len: self.entries.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Option<&StreamEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[StreamEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StreamEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lossy(bytes: &[u8]) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => {
            warn!("playlist field is not valid UTF-8, replaced undecodable bytes");
            s
        }
    }
}

// ── store ─────────────────────────────────────────────────────────────────────

/// The current stream list plus where it came from and whether it has
/// changed since it was last loaded or saved.
#[derive(Debug, Default)]
pub struct PlaylistStore {
    list: StreamList,
    path: Option<PathBuf>,
    dirty: bool,
    /// List and dirty flag as they were when the edit session began.
    snapshot: Option<(StreamList, bool)>,
}

impl PlaylistStore {
    /// An empty, clean store with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(path: &Path) -> Result<Self, PlaylistError> {
        let mut store = Self::new();
        store.load_from(path)?;
        Ok(store)
    }

    pub fn list(&self) -> &StreamList {
        &self.list
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the current list with the file at `path`. On failure the
    /// current list is left as it was.
    pub fn load_from(&mut self, path: &Path) -> Result<(), PlaylistError> {
        let list = StreamList::load(path)?;
        info!("playlist loaded: {:?} ({} entries)", path, list.len());
        self.list = list;
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        self.snapshot = None;
        Ok(())
    }

    pub fn save_to(&mut self, path: &Path) -> Result<(), PlaylistError> {
        self.list.save(path)?;
        info!("playlist saved: {:?} ({} entries)", path, self.list.len());
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        // The saved list becomes what an open edit session falls back to.
        if let Some((before, was_dirty)) = self.snapshot.as_mut() {
            *before = self.list.clone();
            *was_dirty = false;
        }
        Ok(())
    }

    pub fn add_entry(&mut self, entry: StreamEntry) -> usize {
        self.dirty = true;
        self.list.add_entry(entry)
    }

    pub fn delete_entry(&mut self, index: usize) -> Result<StreamEntry, PlaylistError> {
        let removed = self.list.delete_entry(index)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn update_entry(&mut self, index: usize, fields: EntryFields) -> Result<(), PlaylistError> {
        self.list.update_entry(index, fields)?;
        self.dirty = true;
        Ok(())
    }

    /// Start an edit session whose changes can later be kept or thrown away.
    /// A session already in progress is left untouched.
    pub fn begin_edit(&mut self) {
        if self.snapshot.is_none() {
            self.snapshot = Some((self.list.clone(), self.dirty));
        }
    }

    pub fn in_edit(&self) -> bool {
        self.snapshot.is_some()
    }

    /// End the edit session. Returns true when the kept list differs from
    /// the one the session started with, or from the last save made during it.
    pub fn finish_edit(&mut self, keep: bool) -> bool {
        let Some((before, was_dirty)) = self.snapshot.take() else {
            return false;
        };
        if keep {
            let changed = before != self.list;
            self.dirty = was_dirty || changed;
            changed
        } else {
            self.list = before;
            self.dirty = was_dirty;
            false
        }
    }

    /// Ask `picker` for a playlist to open.
    pub fn select_path_for_open(&self, picker: &dyn PathPicker) -> Option<PathBuf> {
        let dir = self.initial_dir();
        picker.pick_open(&PickRequest {
            title: "Select Playlist",
            initial_dir: &dir,
            filters: PLAYLIST_FILTERS,
            file_name: None,
        })
    }

    /// Ask `picker` where to save. A bare name gets the `.csv` extension.
    pub fn select_path_for_save(&self, picker: &dyn PathPicker) -> Option<PathBuf> {
        let dir = self.initial_dir();
        let suggested = self
            .path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str());
        let path = picker.pick_save(&PickRequest {
            title: "Save Playlist",
            initial_dir: &dir,
            filters: PLAYLIST_FILTERS,
            file_name: suggested,
        })?;
        Some(with_default_extension(path))
    }

    fn initial_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn with_default_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn two_stations() -> StreamList {
        StreamList::from_entries(vec![
            StreamEntry::new("NPR", "News", "stream.npr.org/npr"),
            StreamEntry::new("Jazz24", "Jazz", "live.str3.amperwave.net/jazz24"),
        ])
    }

    #[test]
    fn test_parse_by_header_name() {
        let csv = "url,Name,Description\nstream.npr.org/npr,NPR,News\n";
        let list = StreamList::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.get(0).unwrap(),
            &StreamEntry::new("NPR", "News", "stream.npr.org/npr")
        );
    }

    #[test]
    fn test_fields_are_verbatim() {
        let csv = "Name,Description,url\n  spaced ,,kexp.org/live\n";
        let list = StreamList::from_reader(csv.as_bytes()).unwrap();
        let entry = list.get(0).unwrap();
        assert_eq!(entry.name, "  spaced ");
        assert_eq!(entry.description, "");
        assert_eq!(entry.address, "kexp.org/live");
    }

    #[test]
    fn test_header_only_is_empty_list() {
        let list = StreamList::from_reader("Name,Description,url\n".as_bytes()).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_missing_column() {
        let err = StreamList::from_reader("Name,url\nNPR,stream.npr.org\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PlaylistError::MissingColumn("Description")));
    }

    #[test]
    fn test_header_is_case_sensitive() {
        let err = StreamList::from_reader("Name,Description,URL\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PlaylistError::MissingColumn("url")));
    }

    #[test]
    fn test_short_row_is_rejected() {
        let csv = "Name,Description,url\nNPR,News,stream.npr.org\nBroken,only two\n";
        let err = StreamList::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PlaylistError::MissingField { line: 3, field: "url" }
        ));
    }

    #[test]
    fn test_long_row_is_accepted() {
        let csv = "Name,Description,url\nNPR,News,stream.npr.org,extra,cells\n";
        let list = StreamList::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(list.get(0).unwrap().address, "stream.npr.org");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut csv = b"Name,Description,url\n".to_vec();
        csv.extend_from_slice(b"Caf\xe9,Latin-1 export,cafe.example/live\n");
        let list = StreamList::from_reader(csv.as_slice()).unwrap();
        assert_eq!(list.get(0).unwrap().name, "Caf\u{FFFD}");
    }

    #[test]
    fn test_leading_bom_is_tolerated() {
        let csv = "\u{FEFF}Name,Description,url\nNPR,News,stream.npr.org\n";
        let list = StreamList::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(list.get(0).unwrap().name, "NPR");
    }

    #[test]
    fn test_write_header_and_quoting() {
        let list = StreamList::from_entries(vec![StreamEntry::new(
            "Say \"hi\"",
            "a, b",
            "example.org/x",
        )]);
        let mut out = Vec::new();
        list.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Name,Description,url\n\"Say \"\"hi\"\"\",\"a, b\",example.org/x\n"
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        let mut list = two_stations();
        list.add_entry(StreamEntry::new("Odd, \"quoted\"", "", "multi\nline"));
        list.save(&path).unwrap();
        assert_eq!(StreamList::load(&path).unwrap(), list);
    }

    #[test]
    fn test_empty_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        StreamList::new().save(&path).unwrap();
        assert!(StreamList::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = StreamList::load(Path::new("/no/such/playlist.csv")).unwrap_err();
        assert!(matches!(err, PlaylistError::Load { .. }));
    }

    #[test]
    fn test_save_into_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("list.csv");
        let err = two_stations().save(&path).unwrap_err();
        assert!(matches!(err, PlaylistError::Save { .. }));
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        two_stations().save(&path).unwrap();
        let shorter = StreamList::from_entries(vec![StreamEntry::new("A", "", "a")]);
        shorter.save(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Name,Description,url\nA,,a\n"
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        two_stations().save(&path).unwrap();
        let before = std::fs::read(&path).unwrap();

        // A directory in the way makes the final rename fail after writing.
        let blocked = dir.path().join("blocked.csv");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), b"x").unwrap();
        let err = two_stations().save(&blocked).unwrap_err();
        assert!(matches!(err, PlaylistError::Save { .. }));

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert!(blocked.join("keep").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_delete_out_of_range_leaves_list() {
        let mut list = two_stations();
        let err = list.delete_entry(2).unwrap_err();
        assert!(matches!(err, PlaylistError::Index { index: 2, len: 2 }));
        assert_eq!(list, two_stations());
    }

    #[test]
    fn test_update_accepts_anything() {
        let mut list = two_stations();
        list.update_entry(0, StreamEntry::new("", "", "")).unwrap();
        assert_eq!(list.get(0).unwrap(), &StreamEntry::default());
        assert!(list.update_entry(5, StreamEntry::default()).is_err());
    }

    #[test]
    fn test_store_failed_load_keeps_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        two_stations().save(&path).unwrap();

        let mut store = PlaylistStore::open(&path).unwrap();
        store.add_entry(StreamEntry::new("KEXP", "", "kexp.org/live"));
        assert!(store.load_from(&dir.path().join("nope.csv")).is_err());
        assert_eq!(store.list().len(), 3);
        assert!(store.is_dirty());
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn test_store_dirty_tracking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        two_stations().save(&path).unwrap();

        let mut store = PlaylistStore::open(&path).unwrap();
        assert!(!store.is_dirty());
        assert!(store.delete_entry(9).is_err());
        assert!(!store.is_dirty());
        store.update_entry(1, StreamEntry::new("J", "", "x")).unwrap();
        assert!(store.is_dirty());

        let out = dir.path().join("out.csv");
        store.save_to(&out).unwrap();
        assert!(!store.is_dirty());
        assert_eq!(store.path(), Some(out.as_path()));
    }

    #[test]
    fn test_edit_session_discard() {
        let mut store = PlaylistStore::new();
        store.add_entry(StreamEntry::new("A", "", "a"));
        let mut clean = PlaylistStore::new();
        clean.list = store.list.clone();

        clean.begin_edit();
        clean.add_entry(StreamEntry::new("B", "", "b"));
        clean.delete_entry(0).unwrap();
        assert!(clean.is_dirty());
        assert!(!clean.finish_edit(false));
        assert_eq!(clean.list(), store.list());
        assert!(!clean.is_dirty());
    }

    #[test]
    fn test_edit_session_keep() {
        let mut store = PlaylistStore::new();
        store.begin_edit();
        store.add_entry(StreamEntry::new("B", "", "b"));
        assert!(store.finish_edit(true));
        assert!(store.is_dirty());
        assert_eq!(store.list().len(), 1);
        assert!(!store.in_edit());
    }

    #[test]
    fn test_edit_session_keep_without_changes() {
        let mut store = PlaylistStore::new();
        store.begin_edit();
        assert!(!store.finish_edit(true));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_save_during_edit_then_keep() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        let mut store = PlaylistStore::new();
        store.begin_edit();
        store.add_entry(StreamEntry::new("A", "", "a"));
        store.save_to(&path).unwrap();
        assert!(!store.finish_edit(true));
        assert!(!store.is_dirty());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_save_during_edit_then_discard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.csv");
        two_stations().save(&path).unwrap();
        let mut store = PlaylistStore::open(&path).unwrap();

        store.begin_edit();
        store.add_entry(StreamEntry::new("B", "", "b"));
        store.save_to(&path).unwrap();
        store.delete_entry(0).unwrap();
        assert!(!store.finish_edit(false));

        assert!(!store.is_dirty());
        assert_eq!(store.list().len(), 3);
        assert_eq!(&StreamList::load(&path).unwrap(), store.list());
    }

    struct FakePicker {
        answer: Option<PathBuf>,
        seen_dir: RefCell<Option<PathBuf>>,
        seen_name: RefCell<Option<String>>,
    }

    impl FakePicker {
        fn answering(answer: Option<PathBuf>) -> Self {
            Self {
                answer,
                seen_dir: RefCell::new(None),
                seen_name: RefCell::new(None),
            }
        }
    }

    impl PathPicker for FakePicker {
        fn pick_open(&self, request: &PickRequest<'_>) -> Option<PathBuf> {
            assert_eq!(request.filters, PLAYLIST_FILTERS);
            *self.seen_dir.borrow_mut() = Some(request.initial_dir.to_path_buf());
            self.answer.clone()
        }

        fn pick_save(&self, request: &PickRequest<'_>) -> Option<PathBuf> {
            *self.seen_dir.borrow_mut() = Some(request.initial_dir.to_path_buf());
            *self.seen_name.borrow_mut() = request.file_name.map(str::to_string);
            self.answer.clone()
        }
    }

    #[test]
    fn test_select_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.csv");
        two_stations().save(&path).unwrap();
        let store = PlaylistStore::open(&path).unwrap();

        let picker = FakePicker::answering(None);
        assert!(store.select_path_for_open(&picker).is_none());
        assert_eq!(picker.seen_dir.borrow().as_deref(), Some(dir.path()));

        let picker = FakePicker::answering(Some(dir.path().join("backup")));
        let chosen = store.select_path_for_save(&picker).unwrap();
        assert_eq!(chosen, dir.path().join("backup.csv"));
        assert_eq!(picker.seen_name.borrow().as_deref(), Some("mine.csv"));

        let picker = FakePicker::answering(Some(dir.path().join("notes.txt")));
        assert_eq!(
            store.select_path_for_save(&picker).unwrap(),
            dir.path().join("notes.txt")
        );
    }
}
