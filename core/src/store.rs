//! Data the screens consume and the source boundary that supplies it.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::fs::{DirEntry, Directory, Filesystem};
use crate::settings::Settings;

/// Book file extensions the library shows.
pub const BOOK_EXTENSIONS: &[&str] = &["epub", "xtc", "xtch", "txt", "md"];

pub const RECENT_BOOKS_CAP: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// One row of a directory listing, already filtered to books and folders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShelfEntry {
    pub name: String,
    pub kind: EntryKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentBook {
    pub path: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    Io,
    Message(String),
}

/// Everything the application asks of its environment. Implementations sit
/// over SD storage on the device and over `std::fs` in the simulator.
pub trait AppSource {
    /// Lists one directory as shelf entries; `path` is the segment stack
    /// from the library root.
    fn list_dir(&mut self, path: &[String]) -> Result<Vec<ShelfEntry>, StoreError>;

    fn exists(&mut self, path: &str) -> bool;

    fn load_settings(&mut self) -> Option<Settings>;
    fn save_settings(&mut self, settings: &Settings);

    fn load_recent_books(&mut self) -> Vec<RecentBook>;
    fn save_recent_books(&mut self, books: &[RecentBook]);

    /// Path of the book to offer under "Continue Reading", if any.
    fn resume_path(&mut self) -> Option<String>;
    fn save_resume_path(&mut self, path: Option<&str>);

    /// Reading progress for a book in percent, when the reader cache has it.
    fn reading_progress_percent(&mut self, path: &str) -> Option<u8>;

    /// Whether an OPDS catalog server is configured.
    fn browser_configured(&mut self) -> bool {
        false
    }

    fn battery_percent(&mut self) -> Option<u8> {
        None
    }

    fn sleep(&mut self) {}
    fn wake(&mut self) {}
}

pub fn is_book_file(name: &str) -> bool {
    let Some((_, extension)) = name.rsplit_once('.') else {
        return false;
    };
    BOOK_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name == "System Volume Information"
}

/// Directories first, then case-insensitive by name.
pub fn sort_shelf(entries: &mut [ShelfEntry]) {
    entries.sort_by(|a, b| {
        match (a.kind, b.kind) {
            (EntryKind::Dir, EntryKind::File) => return core::cmp::Ordering::Less,
            (EntryKind::File, EntryKind::Dir) => return core::cmp::Ordering::Greater,
            _ => {}
        }
        let left = a.name.chars().map(|c| c.to_ascii_lowercase());
        let right = b.name.chars().map(|c| c.to_ascii_lowercase());
        left.cmp(right)
    });
}

/// Reads one directory through the filesystem boundary and shapes it for
/// the library: hidden entries dropped, files filtered to books, sorted.
pub fn scan_shelf<F: Filesystem>(fs: &F, path: &str) -> Result<Vec<ShelfEntry>, F::Error> {
    let dir = fs.open_directory(path)?;
    let mut entries = Vec::new();
    for entry in dir.list()? {
        let name = entry.name();
        if is_hidden(name) {
            continue;
        }
        if entry.is_directory() {
            entries.push(ShelfEntry {
                name: name.to_string(),
                kind: EntryKind::Dir,
            });
        } else if is_book_file(name) {
            entries.push(ShelfEntry {
                name: name.to_string(),
                kind: EntryKind::File,
            });
        }
    }
    sort_shelf(&mut entries);
    Ok(entries)
}

/// Moves (or inserts) `path` to the front of the recent list, keeping the
/// list unique and capped.
pub fn mark_recent(books: &mut Vec<RecentBook>, path: &str, title: &str) {
    books.retain(|book| book.path != path);
    books.insert(
        0,
        RecentBook {
            path: path.to_string(),
            title: title.to_string(),
        },
    );
    books.truncate(RECENT_BOOKS_CAP);
}

/// Display title for a recent book: stored title, or the file name with
/// its extension stripped.
pub fn recent_title(book: &RecentBook) -> &str {
    if !book.title.is_empty() {
        return &book.title;
    }
    let name = book.path.rsplit('/').next().unwrap_or(&book.path);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{DirEntry, Directory, File, Filesystem, Mode};
    use alloc::vec;

    struct MemEntry {
        name: &'static str,
        dir: bool,
    }

    impl DirEntry for MemEntry {
        fn name(&self) -> &str {
            self.name
        }
        fn is_directory(&self) -> bool {
            self.dir
        }
        fn size(&self) -> usize {
            0
        }
    }

    struct MemDir {
        entries: &'static [(&'static str, bool)],
    }

    impl embedded_io::ErrorType for MemDir {
        type Error = core::convert::Infallible;
    }

    impl Directory for MemDir {
        type Entry = MemEntry;

        fn list(&self) -> Result<Vec<MemEntry>, Self::Error> {
            Ok(self
                .entries
                .iter()
                .map(|(name, dir)| MemEntry { name, dir: *dir })
                .collect())
        }
    }

    struct MemFile;

    impl embedded_io::ErrorType for MemFile {
        type Error = core::convert::Infallible;
    }

    impl embedded_io::Read for MemFile {
        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
            Ok(0)
        }
    }

    impl embedded_io::Write for MemFile {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl embedded_io::Seek for MemFile {
        fn seek(&mut self, _pos: embedded_io::SeekFrom) -> Result<u64, Self::Error> {
            Ok(0)
        }
    }

    impl File for MemFile {
        fn size(&self) -> usize {
            0
        }
    }

    struct MemFs {
        entries: &'static [(&'static str, bool)],
    }

    impl embedded_io::ErrorType for MemFs {
        type Error = core::convert::Infallible;
    }

    impl Filesystem for MemFs {
        type File<'a>
            = MemFile
        where
            Self: 'a;
        type Directory<'a>
            = MemDir
        where
            Self: 'a;

        fn open_file(&self, _path: &str, _mode: Mode) -> Result<MemFile, Self::Error> {
            Ok(MemFile)
        }
        fn open_directory(&self, _path: &str) -> Result<MemDir, Self::Error> {
            Ok(MemDir {
                entries: self.entries,
            })
        }
        fn exists(&self, _path: &str) -> Result<bool, Self::Error> {
            Ok(true)
        }
    }

    #[test]
    fn scan_filters_and_sorts() {
        let fs = MemFs {
            entries: &[
                ("zebra.epub", false),
                (".hidden", false),
                ("notes.TXT", false),
                ("System Volume Information", true),
                ("Comics", true),
                ("archive.zip", false),
                ("alpha", true),
            ],
        };
        let shelf = scan_shelf(&fs, "/").unwrap();
        let names: Vec<&str> = shelf.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["alpha", "Comics", "notes.TXT", "zebra.epub"]);
        assert_eq!(shelf[0].kind, EntryKind::Dir);
        assert_eq!(shelf[2].kind, EntryKind::File);
    }

    #[test]
    fn mark_recent_dedups_and_caps() {
        let mut books = Vec::new();
        for i in 0..8 {
            let path = alloc::format!("/books/{i}.epub");
            mark_recent(&mut books, &path, "");
        }
        assert_eq!(books.len(), RECENT_BOOKS_CAP);
        assert_eq!(books[0].path, "/books/7.epub");

        mark_recent(&mut books, "/books/4.epub", "Four");
        assert_eq!(books.len(), RECENT_BOOKS_CAP);
        assert_eq!(books[0].path, "/books/4.epub");
        assert_eq!(books[0].title, "Four");
    }

    #[test]
    fn recent_titles_fall_back_to_file_stem() {
        let book = RecentBook {
            path: String::from("/books/sub/War and Peace.epub"),
            title: String::new(),
        };
        assert_eq!(recent_title(&book), "War and Peace");

        let titled = RecentBook {
            path: String::from("/books/a.xtc"),
            title: String::from("A Real Title"),
        };
        assert_eq!(recent_title(&titled), "A Real Title");

        let bare = RecentBook {
            path: String::from("README"),
            title: String::new(),
        };
        assert_eq!(recent_title(&bare), "README");
    }

    #[test]
    fn book_extension_check_is_case_insensitive() {
        assert!(is_book_file("a.EPUB"));
        assert!(is_book_file("b.md"));
        assert!(!is_book_file("c.zip"));
        assert!(!is_book_file("noextension"));
    }

    #[test]
    fn sort_is_stable_for_mixed_case() {
        let mut entries = vec![
            ShelfEntry {
                name: String::from("beta.txt"),
                kind: EntryKind::File,
            },
            ShelfEntry {
                name: String::from("Alpha.txt"),
                kind: EntryKind::File,
            },
        ];
        sort_shelf(&mut entries);
        assert_eq!(entries[0].name, "Alpha.txt");
    }
}
