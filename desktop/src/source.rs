use std::fs;
use std::path::{Path, PathBuf};

use finch_core::settings::Settings;
use finch_core::store::{
    AppSource, EntryKind, RecentBook, ShelfEntry, StoreError, is_book_file, sort_shelf,
};

/// Storage backend over a plain directory of book files. Session state is
/// kept in dotfiles under the root, the simulator's own format.
pub struct DesktopSource {
    root: PathBuf,
}

const SETTINGS_FILE: &str = ".finch-settings";
const RECENTS_FILE: &str = ".finch-recents";
const RESUME_FILE: &str = ".finch-resume";

impl DesktopSource {
    pub fn new(root: PathBuf) -> Self {
        if let Err(err) = fs::create_dir_all(&root) {
            log::warn!("could not create {}: {}", root.display(), err);
        }
        Self { root }
    }

    /// Absolute-looking app path ("/dir/book.epub") to a real path.
    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn state_file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_state(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.state_file(name)).ok()
    }

    fn write_state(&self, name: &str, contents: &str) {
        if let Err(err) = fs::write(self.state_file(name), contents) {
            log::warn!("could not write {}: {}", name, err);
        }
    }
}

fn settings_to_text(settings: &Settings) -> String {
    let mut out = String::new();
    let fields: [(&str, i32); 16] = [
        ("dark_mode", settings.dark_mode as i32),
        ("sleep_screen", settings.sleep_screen as i32),
        ("status_bar", settings.status_bar as i32),
        ("hide_battery", settings.hide_battery as i32),
        ("refresh_frequency", settings.refresh_frequency as i32),
        ("font_family", settings.font_family as i32),
        ("font_size", settings.font_size as i32),
        ("line_spacing", settings.line_spacing as i32),
        ("screen_margin", settings.screen_margin as i32),
        ("paragraph_alignment", settings.paragraph_alignment as i32),
        ("hyphenation", settings.hyphenation as i32),
        ("front_button_layout", settings.front_button_layout as i32),
        ("side_button_layout", settings.side_button_layout as i32),
        (
            "long_press_chapter_skip",
            settings.long_press_chapter_skip as i32,
        ),
        ("short_power_button", settings.short_power_button as i32),
        ("sleep_timeout", settings.sleep_timeout as i32),
    ];
    for (key, value) in fields {
        out.push_str(key);
        out.push('=');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}

fn settings_from_text(text: &str) -> Settings {
    let mut settings = Settings::default();
    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let Ok(value) = value.trim().parse::<i32>() else {
            continue;
        };
        match key.trim() {
            "dark_mode" => settings.dark_mode = value != 0,
            "sleep_screen" => settings.sleep_screen = value as u8,
            "status_bar" => settings.status_bar = value as u8,
            "hide_battery" => settings.hide_battery = value as u8,
            "refresh_frequency" => settings.refresh_frequency = value as u8,
            "font_family" => settings.font_family = value as u8,
            "font_size" => settings.font_size = value as u8,
            "line_spacing" => settings.line_spacing = value as u8,
            "screen_margin" => settings.screen_margin = value as i8,
            "paragraph_alignment" => settings.paragraph_alignment = value as u8,
            "hyphenation" => settings.hyphenation = value != 0,
            "front_button_layout" => settings.front_button_layout = value as u8,
            "side_button_layout" => settings.side_button_layout = value as u8,
            "long_press_chapter_skip" => settings.long_press_chapter_skip = value != 0,
            "short_power_button" => settings.short_power_button = value as u8,
            "sleep_timeout" => settings.sleep_timeout = value as u8,
            _ => {}
        }
    }
    settings
}

fn entry_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

impl AppSource for DesktopSource {
    fn list_dir(&mut self, path: &[String]) -> Result<Vec<ShelfEntry>, StoreError> {
        let mut dir = self.root.clone();
        for segment in path {
            dir.push(segment);
        }
        let listing = fs::read_dir(&dir).map_err(|err| {
            log::warn!("read_dir {} failed: {}", dir.display(), err);
            StoreError::Io
        })?;

        let mut entries = Vec::new();
        for item in listing.flatten() {
            let Some(name) = entry_name(&item.path()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let Ok(file_type) = item.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                entries.push(ShelfEntry {
                    name,
                    kind: EntryKind::Dir,
                });
            } else if is_book_file(&name) {
                entries.push(ShelfEntry {
                    name,
                    kind: EntryKind::File,
                });
            }
        }
        sort_shelf(&mut entries);
        Ok(entries)
    }

    fn exists(&mut self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn load_settings(&mut self) -> Option<Settings> {
        self.read_state(SETTINGS_FILE)
            .map(|text| settings_from_text(&text))
    }

    fn save_settings(&mut self, settings: &Settings) {
        self.write_state(SETTINGS_FILE, &settings_to_text(settings));
    }

    fn load_recent_books(&mut self) -> Vec<RecentBook> {
        let Some(text) = self.read_state(RECENTS_FILE) else {
            return Vec::new();
        };
        text.lines()
            .filter_map(|line| {
                let (path, title) = line.split_once('\t')?;
                Some(RecentBook {
                    path: path.to_string(),
                    title: title.to_string(),
                })
            })
            .collect()
    }

    fn save_recent_books(&mut self, books: &[RecentBook]) {
        let mut out = String::new();
        for book in books {
            out.push_str(&book.path);
            out.push('\t');
            out.push_str(&book.title);
            out.push('\n');
        }
        self.write_state(RECENTS_FILE, &out);
    }

    fn resume_path(&mut self) -> Option<String> {
        let text = self.read_state(RESUME_FILE)?;
        let path = text.trim();
        if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        }
    }

    fn save_resume_path(&mut self, path: Option<&str>) {
        self.write_state(RESUME_FILE, path.unwrap_or(""));
    }

    fn reading_progress_percent(&mut self, _path: &str) -> Option<u8> {
        None
    }

    fn sleep(&mut self) {
        log::info!("panel asleep");
    }

    fn wake(&mut self) {
        log::info!("panel awake");
    }
}
