//! User settings, the descriptor tables behind the settings screen, and the
//! persistence boundary.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use crate::input::ButtonLayout;

pub const SLEEP_SCREEN_LABELS: &[&str] = &["Dark", "Light", "Custom", "Cover", "None"];
pub const STATUS_BAR_LABELS: &[&str] = &[
    "None",
    "No Progress",
    "Full w/ Percentage",
    "Full w/ Progress Bar",
    "Progress Bar",
];
pub const HIDE_BATTERY_LABELS: &[&str] = &["Never", "In Reader", "Always"];
pub const REFRESH_FREQUENCY_LABELS: &[&str] = &["1 page", "5 pages", "10 pages", "15 pages", "30 pages"];
pub const FONT_FAMILY_LABELS: &[&str] = &["Bookerly", "Noto Sans", "Open Dyslexic"];
pub const FONT_SIZE_LABELS: &[&str] = &["Small", "Medium", "Large", "X Large"];
pub const LINE_SPACING_LABELS: &[&str] = &["Tight", "Normal", "Wide"];
pub const ALIGNMENT_LABELS: &[&str] = &["Justify", "Left", "Center", "Right"];
pub const FRONT_LAYOUT_LABELS: &[&str] = &[
    "Bck, Cnfrm, Lft, Rght",
    "Lft, Rght, Bck, Cnfrm",
    "Lft, Bck, Cnfrm, Rght",
    "Bck, Cnfrm, Rght, Lft",
];
pub const SIDE_LAYOUT_LABELS: &[&str] = &["Prev, Next", "Next, Prev"];
pub const SHORT_POWER_LABELS: &[&str] = &["Ignore", "Sleep", "Page Turn", "Orientation Cycle"];
pub const SLEEP_TIMEOUT_LABELS: &[&str] = &["1 min", "5 min", "10 min", "15 min", "30 min"];

const SLEEP_TIMEOUT_MINUTES: [u32; 5] = [1, 5, 10, 15, 30];

/// Behavior of a short power-button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortPowerPress {
    Ignore,
    Sleep,
    PageTurn,
    OrientationCycle,
}

/// Everything the screens read, with the defaults a fresh device ships.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub dark_mode: bool,
    pub sleep_screen: u8,
    pub status_bar: u8,
    pub hide_battery: u8,
    pub refresh_frequency: u8,
    pub font_family: u8,
    pub font_size: u8,
    pub line_spacing: u8,
    pub screen_margin: i8,
    pub paragraph_alignment: u8,
    pub hyphenation: bool,
    pub front_button_layout: u8,
    pub side_button_layout: u8,
    pub long_press_chapter_skip: bool,
    pub short_power_button: u8,
    pub sleep_timeout: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            sleep_screen: 0,
            status_bar: 2,
            hide_battery: 0,
            refresh_frequency: 1,
            font_family: 0,
            font_size: 1,
            line_spacing: 1,
            screen_margin: 10,
            paragraph_alignment: 0,
            hyphenation: true,
            front_button_layout: 0,
            side_button_layout: 0,
            long_press_chapter_skip: true,
            short_power_button: 1,
            sleep_timeout: 2,
        }
    }
}

/// Identifies one row of the settings tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingId {
    DarkMode,
    SleepScreen,
    StatusBar,
    HideBattery,
    RefreshFrequency,
    FontFamily,
    FontSize,
    LineSpacing,
    ScreenMargin,
    ParagraphAlignment,
    Hyphenation,
    FrontButtonLayout,
    SideButtonLayout,
    LongPressChapterSkip,
    ShortPowerButton,
    SleepTimeout,
    SyncProgress,
    ClearCache,
    CheckForUpdates,
}

/// How a row is presented and cycled.
#[derive(Clone, Copy, Debug)]
pub enum SettingControl {
    Toggle,
    Choice(&'static [&'static str]),
    Stepped { min: i8, max: i8, step: i8 },
    Action,
}

pub struct SettingInfo {
    pub label: &'static str,
    pub id: SettingId,
    pub control: SettingControl,
}

const fn toggle(label: &'static str, id: SettingId) -> SettingInfo {
    SettingInfo {
        label,
        id,
        control: SettingControl::Toggle,
    }
}

const fn choice(label: &'static str, id: SettingId, labels: &'static [&'static str]) -> SettingInfo {
    SettingInfo {
        label,
        id,
        control: SettingControl::Choice(labels),
    }
}

const fn stepped(label: &'static str, id: SettingId, min: i8, max: i8, step: i8) -> SettingInfo {
    SettingInfo {
        label,
        id,
        control: SettingControl::Stepped { min, max, step },
    }
}

const fn action(label: &'static str, id: SettingId) -> SettingInfo {
    SettingInfo {
        label,
        id,
        control: SettingControl::Action,
    }
}

pub const DISPLAY_SETTINGS: &[SettingInfo] = &[
    toggle("Dark Mode", SettingId::DarkMode),
    choice("Sleep Screen", SettingId::SleepScreen, SLEEP_SCREEN_LABELS),
    choice("Status Bar", SettingId::StatusBar, STATUS_BAR_LABELS),
    choice("Hide Battery %", SettingId::HideBattery, HIDE_BATTERY_LABELS),
];

pub const READER_SETTINGS: &[SettingInfo] = &[
    choice("Refresh Frequency", SettingId::RefreshFrequency, REFRESH_FREQUENCY_LABELS),
    choice("Font Family", SettingId::FontFamily, FONT_FAMILY_LABELS),
    choice("Font Size", SettingId::FontSize, FONT_SIZE_LABELS),
    choice("Line Spacing", SettingId::LineSpacing, LINE_SPACING_LABELS),
    stepped("Screen Margin", SettingId::ScreenMargin, 5, 40, 5),
    choice("Paragraph Alignment", SettingId::ParagraphAlignment, ALIGNMENT_LABELS),
    toggle("Hyphenation", SettingId::Hyphenation),
];

pub const CONTROLS_SETTINGS: &[SettingInfo] = &[
    choice("Front Button Layout", SettingId::FrontButtonLayout, FRONT_LAYOUT_LABELS),
    choice("Side Button Layout (reader)", SettingId::SideButtonLayout, SIDE_LAYOUT_LABELS),
    toggle("Long-press Chapter Skip", SettingId::LongPressChapterSkip),
    choice("Short Power Button Click", SettingId::ShortPowerButton, SHORT_POWER_LABELS),
];

pub const SYSTEM_SETTINGS: &[SettingInfo] = &[
    choice("Time to Sleep", SettingId::SleepTimeout, SLEEP_TIMEOUT_LABELS),
    action("Sync Progress", SettingId::SyncProgress),
    action("Clear Cache", SettingId::ClearCache),
    action("Check for updates", SettingId::CheckForUpdates),
];

pub const SETTING_GROUPS: &[(&str, &[SettingInfo])] = &[
    ("Display", DISPLAY_SETTINGS),
    ("Reader", READER_SETTINGS),
    ("Controls", CONTROLS_SETTINGS),
    ("System", SYSTEM_SETTINGS),
];

impl Settings {
    fn choice_field(&mut self, id: SettingId) -> Option<&mut u8> {
        match id {
            SettingId::SleepScreen => Some(&mut self.sleep_screen),
            SettingId::StatusBar => Some(&mut self.status_bar),
            SettingId::HideBattery => Some(&mut self.hide_battery),
            SettingId::RefreshFrequency => Some(&mut self.refresh_frequency),
            SettingId::FontFamily => Some(&mut self.font_family),
            SettingId::FontSize => Some(&mut self.font_size),
            SettingId::LineSpacing => Some(&mut self.line_spacing),
            SettingId::ParagraphAlignment => Some(&mut self.paragraph_alignment),
            SettingId::FrontButtonLayout => Some(&mut self.front_button_layout),
            SettingId::SideButtonLayout => Some(&mut self.side_button_layout),
            SettingId::ShortPowerButton => Some(&mut self.short_power_button),
            SettingId::SleepTimeout => Some(&mut self.sleep_timeout),
            _ => None,
        }
    }

    fn toggle_field(&mut self, id: SettingId) -> Option<&mut bool> {
        match id {
            SettingId::DarkMode => Some(&mut self.dark_mode),
            SettingId::Hyphenation => Some(&mut self.hyphenation),
            SettingId::LongPressChapterSkip => Some(&mut self.long_press_chapter_skip),
            _ => None,
        }
    }

    /// Advances a row to its next value: toggles flip, choices cycle,
    /// stepped values wrap past their maximum. Actions change nothing.
    /// Returns whether a value changed.
    pub fn cycle(&mut self, info: &SettingInfo) -> bool {
        match info.control {
            SettingControl::Toggle => {
                if let Some(value) = self.toggle_field(info.id) {
                    *value = !*value;
                    return true;
                }
                false
            }
            SettingControl::Choice(labels) => {
                if let Some(value) = self.choice_field(info.id) {
                    *value = (*value + 1) % labels.len() as u8;
                    return true;
                }
                false
            }
            SettingControl::Stepped { min, max, step } => {
                if info.id == SettingId::ScreenMargin {
                    self.screen_margin = if self.screen_margin + step > max {
                        min
                    } else {
                        self.screen_margin + step
                    };
                    return true;
                }
                false
            }
            SettingControl::Action => false,
        }
    }

    /// Text shown in the value column; `None` for actions.
    pub fn value_text(&self, info: &SettingInfo) -> Option<String> {
        match info.control {
            SettingControl::Toggle => {
                let value = match info.id {
                    SettingId::DarkMode => self.dark_mode,
                    SettingId::Hyphenation => self.hyphenation,
                    SettingId::LongPressChapterSkip => self.long_press_chapter_skip,
                    _ => return None,
                };
                Some(String::from(if value { "ON" } else { "OFF" }))
            }
            SettingControl::Choice(labels) => {
                let value = match info.id {
                    SettingId::SleepScreen => self.sleep_screen,
                    SettingId::StatusBar => self.status_bar,
                    SettingId::HideBattery => self.hide_battery,
                    SettingId::RefreshFrequency => self.refresh_frequency,
                    SettingId::FontFamily => self.font_family,
                    SettingId::FontSize => self.font_size,
                    SettingId::LineSpacing => self.line_spacing,
                    SettingId::ParagraphAlignment => self.paragraph_alignment,
                    SettingId::FrontButtonLayout => self.front_button_layout,
                    SettingId::SideButtonLayout => self.side_button_layout,
                    SettingId::ShortPowerButton => self.short_power_button,
                    SettingId::SleepTimeout => self.sleep_timeout,
                    _ => return None,
                };
                labels.get(value as usize).map(|label| String::from(*label))
            }
            SettingControl::Stepped { .. } => Some(format!("{}", self.screen_margin)),
            SettingControl::Action => None,
        }
    }

    pub fn sleep_timeout_ms(&self) -> u32 {
        let index = (self.sleep_timeout as usize).min(SLEEP_TIMEOUT_MINUTES.len() - 1);
        SLEEP_TIMEOUT_MINUTES[index] * 60_000
    }

    pub fn button_layout(&self) -> ButtonLayout {
        ButtonLayout::from_index(self.front_button_layout)
    }

    pub fn short_power_press(&self) -> ShortPowerPress {
        match self.short_power_button {
            1 => ShortPowerPress::Sleep,
            2 => ShortPowerPress::PageTurn,
            3 => ShortPowerPress::OrientationCycle,
            _ => ShortPowerPress::Ignore,
        }
    }

    pub fn battery_hidden(&self) -> bool {
        self.hide_battery as usize == HIDE_BATTERY_LABELS.len() - 1
    }
}

/// Persistence backend; the storage format belongs to the implementation.
pub trait SettingsStore {
    type Error;

    fn load(&mut self) -> Result<Option<Settings>, Self::Error>;
    fn save(&mut self, settings: &Settings) -> Result<(), Self::Error>;
}
