extern crate alloc;

use alloc::string::String;

use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Point},
    text::Text,
};
use log::info;

use crate::app::AppEvent;
use crate::app::home::{HomeEntry, HomeMsg, HomeState};
use crate::app::library::{LibraryMsg, LibraryState};
use crate::app::settings::{SettingsMsg, SettingsScreen};
use crate::display::{Display, RefreshMode};
use crate::framebuffer::{Rotation, ScreenBuffers};
use crate::input::{Button, ButtonState};
use crate::settings::{SettingId, Settings, ShortPowerPress};
use crate::store::AppSource;
use crate::ui::{Rect, RenderQueue, UiContext, flush_queue};

const MARGIN_X: i32 = 20;
const CHAR_WIDTH: i32 = 10;
/// Holding power this long forces a sleep regardless of the short-press
/// setting.
const POWER_HOLD_SLEEP_MS: u32 = 2000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Screen {
    Boot,
    Home,
    Library,
    Settings,
    SleepPending,
    Sleeping,
    Error,
}

/// The whole application: a closed set of screens, one mutating input
/// path, and a dirty flag deciding whether `draw` renders a frame.
pub struct Application<'a, S: AppSource> {
    buffers: &'a mut ScreenBuffers,
    source: &'a mut S,
    settings: Settings,
    screen: Screen,
    home: HomeState,
    library: Option<LibraryState>,
    settings_screen: SettingsScreen,
    error_message: Option<String>,
    dirty: bool,
    full_refresh: bool,
    boot_shown: bool,
    idle_ms: u32,
}

impl<'a, S: AppSource> Application<'a, S> {
    pub fn new(buffers: &'a mut ScreenBuffers, source: &'a mut S) -> Self {
        buffers.set_rotation(Rotation::Rotate90);
        let settings = source.load_settings().unwrap_or_default();
        let home = HomeState::build(source);
        info!("application started");
        Self {
            buffers,
            source,
            settings,
            screen: Screen::Boot,
            home,
            library: None,
            settings_screen: SettingsScreen::new(),
            error_message: None,
            dirty: true,
            full_refresh: true,
            boot_shown: false,
            idle_ms: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn screen_height(&self) -> i32 {
        self.buffers.size().height as i32
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn go_home(&mut self) {
        self.home = HomeState::build(self.source);
        self.library = None;
        self.screen = Screen::Home;
        self.full_refresh = true;
        self.mark_dirty();
    }

    fn enter_sleep(&mut self) {
        info!("entering sleep");
        self.screen = Screen::SleepPending;
        self.full_refresh = true;
        self.mark_dirty();
    }

    fn wake(&mut self) {
        info!("waking up");
        self.source.wake();
        self.idle_ms = 0;
        self.go_home();
    }

    fn show_error(&mut self, message: String) {
        self.error_message = Some(message);
        self.screen = Screen::Error;
        self.full_refresh = true;
        self.mark_dirty();
    }

    fn enter_library(&mut self) {
        match LibraryState::enter(self.source) {
            Ok(library) => {
                self.library = Some(library);
                self.screen = Screen::Library;
                self.full_refresh = true;
                self.mark_dirty();
            }
            Err(err) => {
                log::warn!("library failed to open: {err:?}");
                self.show_error(String::from("Could not read the book storage."));
            }
        }
    }

    pub fn update(&mut self, buttons: &ButtonState, elapsed_ms: u32) -> Option<AppEvent> {
        if self.screen == Screen::Sleeping {
            if buttons.is_pressed(Button::Power) || buttons.is_held(Button::Power) {
                self.wake();
            }
            return None;
        }
        if self.screen == Screen::SleepPending {
            return None;
        }

        if buttons.is_pressed(Button::Power)
            && self.settings.short_power_press() == ShortPowerPress::Sleep
        {
            self.enter_sleep();
            return None;
        }
        if buttons.is_down(Button::Power) && buttons.held_ms() >= POWER_HOLD_SLEEP_MS {
            self.enter_sleep();
            return None;
        }

        if buttons.any_activity() {
            self.idle_ms = 0;
        } else {
            self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
            if self.idle_ms >= self.settings.sleep_timeout_ms() {
                info!("auto-sleep after {} ms idle", self.idle_ms);
                self.enter_sleep();
                return None;
            }
        }

        match self.screen {
            Screen::Boot => {
                if self.boot_shown {
                    self.go_home();
                }
                None
            }
            Screen::Home => match self.home.handle_input(buttons) {
                HomeMsg::None => None,
                HomeMsg::Dirty => {
                    self.mark_dirty();
                    None
                }
                HomeMsg::Activate(entry) => self.activate_home_entry(entry),
            },
            Screen::Library => {
                let page_rows = LibraryState::page_rows(self.screen_height());
                let Some(library) = self.library.as_mut() else {
                    self.go_home();
                    return None;
                };
                match library.handle_input(self.source, buttons, page_rows) {
                    LibraryMsg::None => None,
                    LibraryMsg::Dirty => {
                        self.mark_dirty();
                        None
                    }
                    LibraryMsg::GoHome => {
                        self.go_home();
                        None
                    }
                    LibraryMsg::OpenBook(path) => {
                        self.mark_dirty();
                        Some(AppEvent::OpenBook(path))
                    }
                }
            }
            Screen::Settings => {
                match self
                    .settings_screen
                    .handle_input(self.source, &mut self.settings, buttons)
                {
                    SettingsMsg::None => None,
                    SettingsMsg::Dirty => {
                        self.mark_dirty();
                        None
                    }
                    SettingsMsg::GoHome => {
                        self.go_home();
                        None
                    }
                    SettingsMsg::Action(id) => {
                        self.mark_dirty();
                        match id {
                            SettingId::SyncProgress => Some(AppEvent::SyncRequested),
                            SettingId::ClearCache => Some(AppEvent::ClearCacheRequested),
                            SettingId::CheckForUpdates => Some(AppEvent::UpdateCheckRequested),
                            _ => None,
                        }
                    }
                }
            }
            Screen::Error => {
                if buttons.is_pressed(Button::Back) || buttons.is_pressed(Button::Confirm) {
                    self.error_message = None;
                    self.go_home();
                }
                None
            }
            Screen::SleepPending | Screen::Sleeping => None,
        }
    }

    fn activate_home_entry(&mut self, entry: HomeEntry) -> Option<AppEvent> {
        match entry {
            HomeEntry::ContinueReading => self
                .home
                .resume_path()
                .map(|path| AppEvent::OpenBook(String::from(path))),
            HomeEntry::Bookshelf => {
                self.enter_library();
                None
            }
            HomeEntry::Browser => Some(AppEvent::BrowserRequested),
            HomeEntry::FileTransfer => Some(AppEvent::FileTransferRequested),
            HomeEntry::Settings => {
                self.settings_screen = SettingsScreen::new();
                self.screen = Screen::Settings;
                self.full_refresh = true;
                self.mark_dirty();
                None
            }
        }
    }

    pub fn draw(&mut self, display: &mut impl Display) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let height = self.screen_height();
        let mut rq = RenderQueue::default();
        let fallback = if self.full_refresh {
            RefreshMode::Full
        } else {
            RefreshMode::Fast
        };

        match self.screen {
            Screen::Boot => {
                Self::draw_card(
                    self.buffers,
                    &mut rq,
                    self.settings.dark_mode,
                    "finch",
                    "Loading...",
                );
                self.boot_shown = true;
                // One more pass so the first update can leave the boot
                // screen without waiting for input.
                self.dirty = true;
            }
            Screen::Home => {
                let battery = self.source.battery_percent();
                let mut ctx = UiContext {
                    buffers: &mut *self.buffers,
                };
                self.home.draw(
                    &mut ctx,
                    &mut rq,
                    self.settings.dark_mode,
                    battery,
                    !self.settings.battery_hidden(),
                );
            }
            Screen::Library => {
                if let Some(library) = &self.library {
                    let page_rows = LibraryState::page_rows(height);
                    let mut ctx = UiContext {
                        buffers: &mut *self.buffers,
                    };
                    library.draw(&mut ctx, &mut rq, self.settings.dark_mode, page_rows);
                }
            }
            Screen::Settings => {
                let page_rows = SettingsScreen::page_rows(height);
                let mut ctx = UiContext {
                    buffers: &mut *self.buffers,
                };
                self.settings_screen
                    .draw(&mut ctx, &mut rq, &self.settings, page_rows);
            }
            Screen::SleepPending => {
                Self::draw_card(
                    self.buffers,
                    &mut rq,
                    self.settings.sleep_screen == 0,
                    "Sleeping",
                    "Press power to wake",
                );
                flush_queue(display, self.buffers, &mut rq, RefreshMode::Full);
                self.source.sleep();
                self.screen = Screen::Sleeping;
                self.full_refresh = false;
                return;
            }
            Screen::Sleeping => {}
            Screen::Error => {
                let message = self.error_message.as_deref().unwrap_or("Unknown error");
                Self::draw_error(self.buffers, &mut rq, self.settings.dark_mode, message);
            }
        }

        flush_queue(display, self.buffers, &mut rq, fallback);
        self.full_refresh = false;
    }

    fn draw_card(
        buffers: &mut ScreenBuffers,
        rq: &mut RenderQueue,
        dark: bool,
        title: &str,
        hint: &str,
    ) {
        let (bg, fg) = if dark {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };
        buffers.clear(bg).ok();
        let size = buffers.size();
        let width = size.width as i32;
        let height = size.height as i32;
        let style = MonoTextStyle::new(&FONT_10X20, fg);
        let title_x = (width - title.chars().count() as i32 * CHAR_WIDTH) / 2;
        let hint_x = (width - hint.chars().count() as i32 * CHAR_WIDTH) / 2;
        Text::new(title, Point::new(title_x, height / 2 - 14), style)
            .draw(buffers)
            .ok();
        Text::new(hint, Point::new(hint_x, height / 2 + 14), style)
            .draw(buffers)
            .ok();
        rq.push(Rect::new(0, 0, width, height), RefreshMode::Full);
    }

    fn draw_error(
        buffers: &mut ScreenBuffers,
        rq: &mut RenderQueue,
        dark: bool,
        message: &str,
    ) {
        let (bg, fg) = if dark {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };
        buffers.clear(bg).ok();
        let size = buffers.size();
        let width = size.width as i32;
        let height = size.height as i32;
        let style = MonoTextStyle::new(&FONT_10X20, fg);
        Text::new("Error", Point::new(MARGIN_X, 24), style)
            .draw(buffers)
            .ok();
        Text::new(message, Point::new(MARGIN_X, 64), style)
            .draw(buffers)
            .ok();
        Text::new("Press Back to return", Point::new(MARGIN_X, 104), style)
            .draw(buffers)
            .ok();
        rq.push(Rect::new(0, 0, width, height), RefreshMode::Full);
    }

    #[cfg(test)]
    pub(crate) fn screen_name(&self) -> &'static str {
        match self.screen {
            Screen::Boot => "boot",
            Screen::Home => "home",
            Screen::Library => "library",
            Screen::Settings => "settings",
            Screen::SleepPending => "sleep-pending",
            Screen::Sleeping => "sleeping",
            Screen::Error => "error",
        }
    }

    #[cfg(test)]
    pub(crate) fn library_state(&self) -> Option<&LibraryState> {
        self.library.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn settings_selection(&self) -> Option<SettingId> {
        self.settings_screen.selected_id()
    }
}
