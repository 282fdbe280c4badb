extern crate alloc;

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::BinaryColor,
    prelude::{OriginDimensions, Point, Primitive, Size},
    primitives::{PrimitiveStyle, Rectangle},
    text::Text,
};

use crate::display::RefreshMode;

use super::geom::Rect;
use super::paged_list::PageWindow;
use super::view::{RenderQueue, UiContext, View};

const CHAR_WIDTH: i32 = 10;
const TEXT_BASELINE: i32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Separator,
    Placeholder,
    Entry,
}

/// Prepared text for one list slot.
pub struct Row<'a> {
    pub kind: RowKind,
    pub label: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> Row<'a> {
    pub fn header(label: &'a str) -> Self {
        Self {
            kind: RowKind::Header,
            label,
            value: None,
        }
    }

    pub fn separator() -> Self {
        Self {
            kind: RowKind::Separator,
            label: "",
            value: None,
        }
    }

    pub fn placeholder(label: &'a str) -> Self {
        Self {
            kind: RowKind::Placeholder,
            label,
            value: None,
        }
    }

    pub fn entry(label: &'a str) -> Self {
        Self {
            kind: RowKind::Entry,
            label,
            value: None,
        }
    }

    pub fn entry_with_value(label: &'a str, value: &'a str) -> Self {
        Self {
            kind: RowKind::Entry,
            label,
            value: Some(value),
        }
    }
}

/// Draws one page of a list: title, the window's rows with the selection
/// bar, `(more)` indicator rows, page indicator, and footer hints.
pub struct ListView<'a> {
    pub rows: &'a [Row<'a>],
    pub window: PageWindow,
    pub selected: Option<usize>,
    pub title: Option<&'a str>,
    pub footer: Option<&'a str>,
    pub empty_label: Option<&'a str>,
    pub page_indicator: Option<(usize, usize)>,
    pub dark: bool,
    pub margin_x: i32,
    pub header_y: i32,
    pub list_top: i32,
    pub line_height: i32,
}

impl<'a> ListView<'a> {
    pub fn new(rows: &'a [Row<'a>], window: PageWindow) -> Self {
        Self {
            rows,
            window,
            selected: None,
            title: None,
            footer: None,
            empty_label: None,
            page_indicator: None,
            dark: false,
            margin_x: 16,
            header_y: 24,
            list_top: 60,
            line_height: 24,
        }
    }

    fn colors(&self) -> (BinaryColor, BinaryColor) {
        if self.dark {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        }
    }
}

fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * CHAR_WIDTH
}

/// Truncates to `max_px` of mono glyphs, appending an ellipsis when cut.
pub fn fit_label(label: &str, max_px: i32) -> Cow<'_, str> {
    if text_width(label) <= max_px {
        return Cow::Borrowed(label);
    }
    let keep = ((max_px / CHAR_WIDTH).max(1) as usize).saturating_sub(3);
    let truncated: String = label.chars().take(keep).collect();
    Cow::Owned(format!("{truncated}..."))
}

impl View for ListView<'_> {
    fn render(&mut self, ctx: &mut UiContext<'_>, rect: Rect, rq: &mut RenderQueue) {
        let (bg, fg) = self.colors();
        let size = ctx.buffers.size();
        let width = size.width as i32;
        let height = size.height as i32;
        let style = MonoTextStyle::new(&FONT_10X20, fg);

        Rectangle::new(Point::new(rect.x, rect.y), Size::new(rect.w as u32, rect.h as u32))
            .into_styled(PrimitiveStyle::with_fill(bg))
            .draw(ctx.buffers)
            .ok();

        if let Some(title) = self.title {
            let title = fit_label(title, width - 2 * self.margin_x);
            let x = (width - text_width(&title)) / 2;
            Text::new(&title, Point::new(x, self.header_y), style)
                .draw(ctx.buffers)
                .ok();
        }

        if let Some((page, total)) = self.page_indicator {
            let indicator = format!("{page}/{total}");
            let x = width - self.margin_x - text_width(&indicator);
            Text::new(&indicator, Point::new(x, self.header_y), style)
                .draw(ctx.buffers)
                .ok();
        }

        if let Some(footer) = self.footer {
            Text::new(footer, Point::new(self.margin_x, height - 12), style)
                .draw(ctx.buffers)
                .ok();
        }

        if self.rows.is_empty() {
            if let Some(empty) = self.empty_label {
                Text::new(
                    empty,
                    Point::new(self.margin_x, self.list_top + TEXT_BASELINE),
                    style,
                )
                .draw(ctx.buffers)
                .ok();
            }
            rq.push(rect, RefreshMode::Fast);
            return;
        }

        let window = self.window;
        let reserved_top = window.reserved_top as i32;
        let line_width = width - 2 * self.margin_x;

        // Selection bar behind the focused row.
        if let Some(selected) = self.selected {
            if selected >= window.start && selected < window.start + window.visible_rows {
                let row = (selected - window.start) as i32 + reserved_top;
                let y = self.list_top + row * self.line_height - 2;
                Rectangle::new(
                    Point::new(0, y),
                    Size::new(width as u32, self.line_height as u32),
                )
                .into_styled(PrimitiveStyle::with_fill(fg))
                .draw(ctx.buffers)
                .ok();
            }
        }

        let end = self.rows.len().min(window.start + window.visible_rows);
        for (offset, row) in self.rows[window.start..end].iter().enumerate() {
            let y = self.list_top + (offset as i32 + reserved_top) * self.line_height;
            let baseline = y + TEXT_BASELINE;
            let index = window.start + offset;
            let is_selected = self.selected == Some(index) && row.kind == RowKind::Entry;
            let row_color = if is_selected { bg } else { fg };
            let row_style = MonoTextStyle::new(&FONT_10X20, row_color);

            match row.kind {
                RowKind::Separator => {
                    Rectangle::new(
                        Point::new(self.margin_x, y + self.line_height / 2),
                        Size::new(line_width as u32, 1),
                    )
                    .into_styled(PrimitiveStyle::with_fill(fg))
                    .draw(ctx.buffers)
                    .ok();
                }
                RowKind::Header => {
                    let label = fit_label(row.label, line_width);
                    Text::new(&label, Point::new(self.margin_x, baseline), row_style)
                        .draw(ctx.buffers)
                        .ok();
                    Rectangle::new(
                        Point::new(self.margin_x, y + self.line_height - 2),
                        Size::new(line_width as u32, 1),
                    )
                    .into_styled(PrimitiveStyle::with_fill(fg))
                    .draw(ctx.buffers)
                    .ok();
                }
                RowKind::Placeholder => {
                    let label = fit_label(row.label, line_width);
                    Text::new(&label, Point::new(self.margin_x, baseline), row_style)
                        .draw(ctx.buffers)
                        .ok();
                }
                RowKind::Entry => {
                    let value_width = row.value.map(text_width).unwrap_or(0);
                    let label_max = line_width - value_width - if value_width > 0 { CHAR_WIDTH } else { 0 };
                    let label = fit_label(row.label, label_max);
                    Text::new(&label, Point::new(self.margin_x, baseline), row_style)
                        .draw(ctx.buffers)
                        .ok();
                    if let Some(value) = row.value {
                        let x = width - self.margin_x - value_width;
                        Text::new(value, Point::new(x, baseline), row_style)
                            .draw(ctx.buffers)
                            .ok();
                    }
                }
            }
        }

        // Indicator rows kept outside the item window.
        if window.reserved_top {
            Text::new(
                "(more)",
                Point::new(self.margin_x, self.list_top + TEXT_BASELINE),
                style,
            )
            .draw(ctx.buffers)
            .ok();
            Rectangle::new(
                Point::new(self.margin_x, self.list_top + self.line_height - 2),
                Size::new(line_width as u32, 1),
            )
            .into_styled(PrimitiveStyle::with_fill(fg))
            .draw(ctx.buffers)
            .ok();
        }
        if window.reserved_bottom {
            let capacity = reserved_top + window.visible_rows as i32 + 1;
            let y = self.list_top + (capacity - 1) * self.line_height;
            Rectangle::new(
                Point::new(self.margin_x, y - 2),
                Size::new(line_width as u32, 1),
            )
            .into_styled(PrimitiveStyle::with_fill(fg))
            .draw(ctx.buffers)
            .ok();
            Text::new("(more)", Point::new(self.margin_x, y + TEXT_BASELINE), style)
                .draw(ctx.buffers)
                .ok();
        }

        rq.push(rect, RefreshMode::Fast);
    }
}
