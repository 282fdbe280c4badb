extern crate alloc;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Point, Primitive, Size},
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};

use crate::display::RefreshMode;
use crate::input::{ButtonState, NavEvent, nav_pressed, nav_released};
use crate::store::AppSource;
use crate::ui::{Rect, RenderQueue, UiContext, fit_label};

const MARGIN: i32 = 20;
const BOTTOM_MARGIN: i32 = 60;
const TILE_HEIGHT: i32 = 45;
const TILE_GAP: i32 = 8;
const CHAR_WIDTH: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeEntry {
    ContinueReading,
    Bookshelf,
    Browser,
    FileTransfer,
    Settings,
}

pub enum HomeMsg {
    None,
    Dirty,
    Activate(HomeEntry),
}

/// Start screen: the resume card plus a vertical tile menu whose entries
/// depend on what is currently available.
pub struct HomeState {
    entries: Vec<HomeEntry>,
    labels: Vec<String>,
    selected: usize,
    resume_path: Option<String>,
    resume_title: Option<String>,
}

impl HomeState {
    pub fn build(source: &mut impl AppSource) -> Self {
        let resume_path = source
            .resume_path()
            .filter(|path| source.exists(path));

        let mut entries = Vec::new();
        let mut labels = Vec::new();
        let mut resume_title = None;

        if let Some(path) = &resume_path {
            let mut label = String::from("Continue Reading");
            if let Some(percent) = source.reading_progress_percent(path) {
                label = format!("Continue Reading ({percent}%)");
            }
            entries.push(HomeEntry::ContinueReading);
            labels.push(label);

            let name = path.rsplit('/').next().unwrap_or(path);
            let title = match name.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem,
                _ => name,
            };
            resume_title = Some(String::from(title));
        }

        entries.push(HomeEntry::Bookshelf);
        labels.push(String::from("Bookshelf"));
        if source.browser_configured() {
            entries.push(HomeEntry::Browser);
            labels.push(String::from("OPDS Browser"));
        }
        entries.push(HomeEntry::FileTransfer);
        labels.push(String::from("File Transfer"));
        entries.push(HomeEntry::Settings);
        labels.push(String::from("Settings"));

        Self {
            entries,
            labels,
            selected: 0,
            resume_path,
            resume_title,
        }
    }

    pub fn resume_path(&self) -> Option<&str> {
        self.resume_path.as_deref()
    }

    pub fn handle_input(&mut self, buttons: &ButtonState) -> HomeMsg {
        let count = self.entries.len();
        if let Some(NavEvent::Confirm) = nav_released(buttons) {
            return HomeMsg::Activate(self.entries[self.selected]);
        }
        match nav_pressed(buttons) {
            Some(NavEvent::Previous) => {
                self.selected = (self.selected + count - 1) % count;
                HomeMsg::Dirty
            }
            Some(NavEvent::Next) => {
                self.selected = (self.selected + 1) % count;
                HomeMsg::Dirty
            }
            _ => HomeMsg::None,
        }
    }

    pub fn draw(
        &self,
        ctx: &mut UiContext<'_>,
        rq: &mut RenderQueue,
        dark: bool,
        battery_percent: Option<u8>,
        show_battery: bool,
    ) {
        let (bg, fg) = if dark {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };
        ctx.buffers.clear(bg).ok();

        let size = ctx.buffers.size();
        let width = size.width as i32;
        let height = size.height as i32;
        let style = MonoTextStyle::new(&FONT_10X20, fg);

        let centered = |text: &str| (width - text.chars().count() as i32 * CHAR_WIDTH) / 2;

        // Resume card area above the menu tiles.
        let card_center = height / 3;
        if let Some(title) = &self.resume_title {
            let title = fit_label(title, width - 2 * MARGIN);
            Text::new(&title, Point::new(centered(&title), card_center), style)
                .draw(ctx.buffers)
                .ok();
        } else {
            let line1 = "No open book";
            let line2 = "Start reading below";
            Text::new(line1, Point::new(centered(line1), card_center), style)
                .draw(ctx.buffers)
                .ok();
            Text::new(line2, Point::new(centered(line2), card_center + 28), style)
                .draw(ctx.buffers)
                .ok();
        }

        // Menu tiles stacked above the bottom hint area.
        let count = self.labels.len() as i32;
        let total = count * TILE_HEIGHT + (count - 1) * TILE_GAP;
        let start_y = height - BOTTOM_MARGIN - total - MARGIN;
        let tile_width = width - 2 * MARGIN;
        for (index, label) in self.labels.iter().enumerate() {
            let y = start_y + index as i32 * (TILE_HEIGHT + TILE_GAP);
            let selected = index == self.selected;
            let tile = Rectangle::new(
                Point::new(MARGIN, y),
                Size::new(tile_width as u32, TILE_HEIGHT as u32),
            );
            if selected {
                tile.into_styled(PrimitiveStyle::with_fill(fg))
                    .draw(ctx.buffers)
                    .ok();
            } else {
                tile.into_styled(PrimitiveStyle::with_stroke(fg, 1))
                    .draw(ctx.buffers)
                    .ok();
            }
            let text_color = if selected { bg } else { fg };
            let label = fit_label(label, tile_width - 2 * CHAR_WIDTH);
            let text_y = y + (TILE_HEIGHT + 20) / 2;
            Text::new(
                &label,
                Point::new(centered(&label), text_y),
                MonoTextStyle::new(&FONT_10X20, text_color),
            )
            .draw(ctx.buffers)
            .ok();
        }

        if show_battery {
            let text = match battery_percent {
                Some(percent) => format!("{percent}%"),
                None => String::from("--%"),
            };
            Text::new(&text, Point::new(MARGIN, height - 12), style)
                .draw(ctx.buffers)
                .ok();
        }

        rq.push(Rect::new(0, 0, width, height), RefreshMode::Fast);
    }
}
