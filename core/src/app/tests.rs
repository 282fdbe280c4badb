extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::app::AppEvent;
use crate::application::Application;
use crate::display::{Display, RefreshMode};
use crate::framebuffer::ScreenBuffers;
use crate::input::{Button, ButtonState};
use crate::settings::Settings;
use crate::store::{AppSource, EntryKind, RecentBook, ShelfEntry, StoreError};

struct TestDisplay;

impl Display for TestDisplay {
    fn flush(&mut self, _buffers: &mut ScreenBuffers, _mode: RefreshMode) {}
}

#[derive(Default)]
struct MemorySource {
    dirs: BTreeMap<String, Vec<ShelfEntry>>,
    present: Vec<String>,
    settings: Option<Settings>,
    saved_settings: Vec<Settings>,
    recents: Vec<RecentBook>,
    resume: Option<String>,
    slept: usize,
    woke: usize,
}

impl MemorySource {
    fn with_books() -> Self {
        let mut source = Self::default();
        let mut root: Vec<ShelfEntry> = Vec::new();
        root.push(ShelfEntry {
            name: "sub".to_string(),
            kind: EntryKind::Dir,
        });
        for name in ["alpha.epub", "beta.epub", "gamma.txt"] {
            root.push(ShelfEntry {
                name: name.to_string(),
                kind: EntryKind::File,
            });
            source.present.push(alloc::format!("/{name}"));
        }
        source.dirs.insert(String::new(), root);
        source.dirs.insert(
            "sub".to_string(),
            [ShelfEntry {
                name: "nested.epub".to_string(),
                kind: EntryKind::File,
            }]
            .into_iter()
            .collect(),
        );
        source.present.push("/sub/nested.epub".to_string());
        source
    }
}

impl AppSource for MemorySource {
    fn list_dir(&mut self, path: &[String]) -> Result<Vec<ShelfEntry>, StoreError> {
        let key = path.join("/");
        self.dirs.get(&key).cloned().ok_or(StoreError::Io)
    }

    fn exists(&mut self, path: &str) -> bool {
        self.present.iter().any(|p| p == path)
    }

    fn load_settings(&mut self) -> Option<Settings> {
        self.settings
    }

    fn save_settings(&mut self, settings: &Settings) {
        self.saved_settings.push(*settings);
    }

    fn load_recent_books(&mut self) -> Vec<RecentBook> {
        self.recents.clone()
    }

    fn save_recent_books(&mut self, books: &[RecentBook]) {
        self.recents = books.to_vec();
    }

    fn resume_path(&mut self) -> Option<String> {
        self.resume.clone()
    }

    fn save_resume_path(&mut self, path: Option<&str>) {
        self.resume = path.map(String::from);
    }

    fn reading_progress_percent(&mut self, _path: &str) -> Option<u8> {
        Some(42)
    }

    fn sleep(&mut self) {
        self.slept += 1;
    }

    fn wake(&mut self) {
        self.woke += 1;
    }
}

fn tick(
    app: &mut Application<'_, MemorySource>,
    state: &mut ButtonState,
    mask: u8,
    elapsed_ms: u32,
) -> Option<AppEvent> {
    state.update(mask, elapsed_ms);
    let event = app.update(state, elapsed_ms);
    app.draw(&mut TestDisplay);
    event
}

/// Press-and-release over two frames; returns the first event either frame
/// produced.
fn press(
    app: &mut Application<'_, MemorySource>,
    state: &mut ButtonState,
    button: Button,
) -> Option<AppEvent> {
    let mask = 1 << button as u8;
    let down = tick(app, state, mask, 16);
    let up = tick(app, state, 0, 16);
    down.or(up)
}

fn hold(
    app: &mut Application<'_, MemorySource>,
    state: &mut ButtonState,
    button: Button,
    total_ms: u32,
) -> Option<AppEvent> {
    let mask = 1 << button as u8;
    let mut event = None;
    let mut elapsed = 0;
    while elapsed < total_ms {
        event = event.or(tick(app, state, mask, 50));
        elapsed += 50;
    }
    event.or(tick(app, state, 0, 16))
}

fn boot_to_home(app: &mut Application<'_, MemorySource>, state: &mut ButtonState) {
    tick(app, state, 0, 16);
    tick(app, state, 0, 16);
    assert_eq!(app.screen_name(), "home");
}

#[test]
fn boots_into_the_home_screen() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::with_books();
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    assert_eq!(app.screen_name(), "boot");
    boot_to_home(&mut app, &mut state);
}

#[test]
fn bookshelf_tile_opens_the_library() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::with_books();
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);

    // No resume book: Bookshelf is the first tile.
    assert!(press(&mut app, &mut state, Button::Confirm).is_none());
    assert_eq!(app.screen_name(), "library");
    let library = app.library_state().unwrap();
    // First selectable row is the directory at the top of All Books.
    assert!(library.selection().is_some());
}

#[test]
fn library_descends_and_reanchors_on_the_way_back() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::with_books();
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);
    press(&mut app, &mut state, Button::Confirm);
    assert_eq!(app.screen_name(), "library");

    // Selection starts on "sub" (directories sort first); enter it.
    press(&mut app, &mut state, Button::Confirm);
    assert_eq!(app.library_state().unwrap().depth(), 1);

    // Back out; the directory we came from is selected again.
    press(&mut app, &mut state, Button::Back);
    let library = app.library_state().unwrap();
    assert_eq!(library.depth(), 0);
    assert_eq!(
        library.selection(),
        Some(crate::app::library::BookRef::File(0))
    );
}

#[test]
fn opening_a_book_emits_the_event_and_records_state() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::with_books();
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);
    press(&mut app, &mut state, Button::Confirm);

    // Move off the directory onto "alpha.epub" and open it.
    press(&mut app, &mut state, Button::Down);
    let event = press(&mut app, &mut state, Button::Confirm);
    assert_eq!(event, Some(AppEvent::OpenBook("/alpha.epub".to_string())));

    // Back to home: the resume card now offers the book.
    press(&mut app, &mut state, Button::Back);
    assert_eq!(app.screen_name(), "home");
    drop(app);
    assert_eq!(source.resume.as_deref(), Some("/alpha.epub"));
    assert_eq!(source.recents[0].path, "/alpha.epub");
}

#[test]
fn continue_reading_resumes_the_saved_book() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::with_books();
    source.resume = Some("/beta.epub".to_string());
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);

    let event = press(&mut app, &mut state, Button::Confirm);
    assert_eq!(event, Some(AppEvent::OpenBook("/beta.epub".to_string())));
}

#[test]
fn settings_confirm_cycles_and_saves() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::with_books();
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);

    // Tiles: Bookshelf, File Transfer, Settings.
    press(&mut app, &mut state, Button::Down);
    press(&mut app, &mut state, Button::Down);
    press(&mut app, &mut state, Button::Confirm);
    assert_eq!(app.screen_name(), "settings");
    assert_eq!(
        app.settings_selection(),
        Some(crate::settings::SettingId::DarkMode)
    );

    press(&mut app, &mut state, Button::Confirm);
    assert!(app.settings().dark_mode);

    press(&mut app, &mut state, Button::Back);
    assert_eq!(app.screen_name(), "home");
    drop(app);
    assert!(!source.saved_settings.is_empty());
    assert!(source.saved_settings.last().unwrap().dark_mode);
}

#[test]
fn power_button_sleeps_and_wakes() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::with_books();
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);

    press(&mut app, &mut state, Button::Power);
    assert_eq!(app.screen_name(), "sleeping");

    press(&mut app, &mut state, Button::Power);
    assert_eq!(app.screen_name(), "home");
    drop(app);
    assert_eq!(source.slept, 1);
    assert_eq!(source.woke, 1);
}

#[test]
fn idle_timeout_enters_sleep() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::with_books();
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);

    let timeout = app.settings().sleep_timeout_ms();
    tick(&mut app, &mut state, 0, timeout);
    assert_eq!(app.screen_name(), "sleeping");
}

#[test]
fn held_direction_skips_a_page() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::default();
    let mut root = Vec::new();
    for index in 0..40 {
        let name = alloc::format!("book-{index:02}.epub");
        source.present.push(alloc::format!("/{name}"));
        root.push(ShelfEntry {
            name,
            kind: EntryKind::File,
        });
    }
    source.dirs.insert(String::new(), root);

    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);
    press(&mut app, &mut state, Button::Confirm);
    assert_eq!(app.screen_name(), "library");

    let before = app.library_state().unwrap().selection();
    hold(&mut app, &mut state, Button::Down, 1200);
    let after = app.library_state().unwrap().selection();
    let (Some(crate::app::library::BookRef::File(b)), Some(crate::app::library::BookRef::File(a))) =
        (before, after)
    else {
        panic!("expected file selections");
    };
    // A page jump moves well past a single step.
    assert!(a > b + 1, "before {b}, after {a}");
}

#[test]
fn storage_failure_shows_the_error_screen() {
    let mut buffers = ScreenBuffers::new();
    let mut source = MemorySource::default();
    let mut app = Application::new(&mut buffers, &mut source);
    let mut state = ButtonState::new();
    boot_to_home(&mut app, &mut state);

    press(&mut app, &mut state, Button::Confirm);
    assert_eq!(app.screen_name(), "error");

    press(&mut app, &mut state, Button::Back);
    assert_eq!(app.screen_name(), "home");
}
