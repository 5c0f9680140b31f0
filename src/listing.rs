use std::fs;
use std::io;
use std::path::Path;

use crate::entry::{Entry, EntryKind};
use crate::error::NavError;

/// Ordered entries of one directory.
///
/// The parent marker is always at index 0, followed by directories and then
/// files. Within each group the provider's enumeration order is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    entries: Vec<Entry>,
}

impl Listing {
    /// Prepend the parent marker to `children` and group directories first.
    pub fn from_children(children: Vec<Entry>) -> Self {
        let mut entries = Vec::with_capacity(children.len() + 1);
        entries.push(Entry::parent_marker());
        entries.extend(
            children
                .into_iter()
                .filter(|e| e.kind != EntryKind::ParentMarker),
        );
        // stable: keeps enumeration order inside each group
        entries.sort_by_key(|e| !e.is_dir_like());
        Self { entries }
    }

    /// Listing shown for a directory that could not be read.
    pub fn marker_only() -> Self {
        Self::from_children(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the directory has no children (only the marker is present).
    pub fn has_no_children(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn find(&self, name: &str, kind: EntryKind) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.kind == kind && e.name == name)
    }
}

/// Source of directory listings.
pub trait ListingProvider {
    /// Children of `path`, in enumeration order.
    ///
    /// A directory that vanished before it could be read yields no children.
    fn children(&self, path: &Path) -> Result<Vec<Entry>, NavError>;

    /// Whether `path` is a directory that may be changed into.
    fn check_enter(&self, path: &Path) -> Result<(), NavError> {
        self.children(path).map(|_| ())
    }

    fn list(&self, path: &Path) -> Result<Listing, NavError> {
        self.children(path).map(Listing::from_children)
    }
}

/// Reads listings straight from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsListing;

impl ListingProvider for FsListing {
    fn children(&self, path: &Path) -> Result<Vec<Entry>, NavError> {
        let read_dir = match fs::read_dir(path) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("Directory vanished before listing: {}", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(NavError::from_io(path.to_path_buf(), e)),
        };

        let mut children = Vec::new();
        let mut seen = 0;
        let mut denied = 0;
        for dir_entry in read_dir.filter_map(|e| e.ok()) {
            seen += 1;
            // follow symlinks so a link to a directory can be entered
            let md = match fs::metadata(dir_entry.path()).or_else(|_| dir_entry.metadata()) {
                Ok(md) => md,
                Err(e) => {
                    if e.kind() == io::ErrorKind::PermissionDenied {
                        denied += 1;
                    }
                    log::debug!("Skipping {}: {e}", dir_entry.path().display());
                    continue;
                }
            };
            let name = dir_entry.file_name().to_string_lossy().to_string();
            children.push(Entry::from_metadata(name, &md));
        }
        // readable but not searchable: names come back, nothing can be stat'ed
        if seen > 0 && denied == seen {
            return Err(NavError::PermissionDenied(path.to_path_buf()));
        }
        Ok(children)
    }

    fn check_enter(&self, path: &Path) -> Result<(), NavError> {
        let md = fs::metadata(path).map_err(|e| NavError::from_io(path.to_path_buf(), e))?;
        if !md.is_dir() {
            return Err(NavError::NotADirectory(path.to_path_buf()));
        }
        // resolving `dir/.` needs search permission on `dir`, same as chdir
        fs::metadata(path.join("."))
            .map(|_| ())
            .map_err(|e| NavError::from_io(path.to_path_buf(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn kinds(listing: &Listing) -> Vec<EntryKind> {
        listing.entries().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_marker_first_then_directories_then_files() {
        let listing = Listing::from_children(vec![
            Entry::file("b.txt", 1),
            Entry::directory("zeta"),
            Entry::file("a.txt", 2),
            Entry::directory("alpha"),
        ]);
        let names: Vec<&str> = listing.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["..", "zeta", "alpha", "b.txt", "a.txt"]);
        assert_eq!(
            kinds(&listing),
            vec![
                EntryKind::ParentMarker,
                EntryKind::Directory,
                EntryKind::Directory,
                EntryKind::File,
                EntryKind::File,
            ]
        );
    }

    #[test]
    fn test_exactly_one_marker() {
        let listing = Listing::from_children(vec![Entry::parent_marker(), Entry::file("x", 1)]);
        let markers = listing
            .entries()
            .iter()
            .filter(|e| e.kind == EntryKind::ParentMarker)
            .count();
        assert_eq!(markers, 1);
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn test_marker_only_listing() {
        let listing = Listing::marker_only();
        assert_eq!(listing.len(), 1);
        assert!(listing.has_no_children());
        assert_eq!(listing.get(0).map(|e| e.kind), Some(EntryKind::ParentMarker));
    }

    #[test]
    fn test_find_by_name_and_kind() {
        let listing = Listing::from_children(vec![Entry::directory("docs"), Entry::file("docs.md", 3)]);
        assert!(listing.find("docs", EntryKind::Directory).is_some());
        assert!(listing.find("docs", EntryKind::File).is_none());
    }

    #[test]
    fn test_fs_listing_reads_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("file.txt"), "abc").unwrap();

        let listing = FsListing.list(dir.path()).unwrap();
        assert_eq!(listing.len(), 3);
        assert_eq!(listing.get(1).map(|e| e.name.as_str()), Some("sub"));
        let file = listing.get(2).unwrap();
        assert_eq!(file.name, "file.txt");
        assert_eq!(file.size.as_deref(), Some("3.0B"));
    }

    #[test]
    fn test_fs_listing_of_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("gone");
        let listing = FsListing.list(&gone).unwrap();
        assert!(listing.has_no_children());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_listed_as_file() {
        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("broken")).unwrap();

        let listing = FsListing.list(dir.path()).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.get(1).map(|e| e.kind), Some(EntryKind::File));
    }

    #[test]
    fn test_check_enter() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        assert!(FsListing.check_enter(dir.path()).is_ok());
        assert!(matches!(FsListing.check_enter(&file), Err(NavError::NotADirectory(_))));
        assert!(FsListing.check_enter(&dir.path().join("gone")).is_err());
    }

    #[cfg(unix)]
    mod permissions {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn chmod(path: &Path, mode: u32) {
            fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
        }

        /// Root ignores mode bits, so these checks say nothing there.
        fn mode_bits_enforced(scratch: &Path) -> bool {
            let probe = scratch.join("closed");
            fs::create_dir(&probe).unwrap();
            chmod(&probe, 0o000);
            let enforced = fs::read_dir(&probe).is_err();
            chmod(&probe, 0o755);
            enforced
        }

        #[test]
        fn test_readable_but_not_searchable_directory() {
            let dir = tempdir().unwrap();
            if !mode_bits_enforced(dir.path()) {
                return;
            }
            let locked = dir.path().join("locked");
            fs::create_dir_all(locked.join("inner")).unwrap();
            fs::write(locked.join("secret.txt"), "s").unwrap();
            chmod(&locked, 0o444);

            let enter = FsListing.check_enter(&locked);
            let listed = FsListing.list(&locked);
            chmod(&locked, 0o755);

            assert!(matches!(enter, Err(NavError::PermissionDenied(_))));
            assert!(matches!(listed, Err(NavError::PermissionDenied(_))));
        }

        #[test]
        fn test_searchable_but_not_readable_directory() {
            let dir = tempdir().unwrap();
            if !mode_bits_enforced(dir.path()) {
                return;
            }
            let drop_box = dir.path().join("dropbox");
            fs::create_dir(&drop_box).unwrap();
            chmod(&drop_box, 0o111);

            let enter = FsListing.check_enter(&drop_box);
            let listed = FsListing.list(&drop_box);
            chmod(&drop_box, 0o755);

            assert!(enter.is_ok());
            assert!(matches!(listed, Err(NavError::PermissionDenied(_))));
        }
    }

    #[test]
    fn test_fs_listing_of_empty_directory() {
        let dir = tempdir().unwrap();
        let listing = FsListing.list(dir.path()).unwrap();
        assert_eq!(listing.len(), 1);
    }
}
