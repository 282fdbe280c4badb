extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embedded_graphics::prelude::OriginDimensions;
use log::info;

use crate::input::{ButtonState, NavEvent, nav_pressed};
use crate::settings::{SETTING_GROUPS, SettingControl, SettingId, SettingInfo, Settings};
use crate::store::AppSource;
use crate::ui::{
    Direction, ListView, PagedList, Rect, RenderQueue, Row, Slot, UiContext, View, items_per_page,
};

const CONTENT_TOP: i32 = 60;
const LINE_HEIGHT: i32 = 24;
const BOTTOM_BAR: i32 = 60;

pub enum SettingsMsg {
    None,
    Dirty,
    Action(SettingId),
    GoHome,
}

/// Settings screen: the static tables flattened into one navigable list
/// with a header row per group.
pub struct SettingsScreen {
    list: PagedList<&'static SettingInfo>,
}

impl SettingsScreen {
    pub fn new() -> Self {
        let mut items = Vec::new();
        for (group, table) in SETTING_GROUPS {
            items.push(Slot::Header(group.to_string()));
            for info in *table {
                items.push(Slot::Entry(info));
            }
        }
        let mut list = PagedList::new();
        list.set_items(items);
        Self { list }
    }

    /// Rows per page; one less than the space allows because the group
    /// separator lines eat into the row grid.
    pub fn page_rows(screen_height: i32) -> usize {
        let rows = items_per_page(screen_height - CONTENT_TOP - BOTTOM_BAR, LINE_HEIGHT);
        rows.saturating_sub(1).max(1)
    }

    pub fn handle_input(
        &mut self,
        source: &mut impl AppSource,
        settings: &mut Settings,
        buttons: &ButtonState,
    ) -> SettingsMsg {
        match nav_pressed(buttons) {
            Some(NavEvent::Confirm) => {
                let Some(info) = self.list.selected_payload().copied() else {
                    return SettingsMsg::None;
                };
                if matches!(info.control, SettingControl::Action) {
                    return SettingsMsg::Action(info.id);
                }
                if settings.cycle(info) {
                    info!("settings: {} -> {:?}", info.label, settings.value_text(info));
                    source.save_settings(settings);
                    return SettingsMsg::Dirty;
                }
                SettingsMsg::None
            }
            Some(NavEvent::Back) => {
                source.save_settings(settings);
                SettingsMsg::GoHome
            }
            Some(NavEvent::Previous) => {
                if self.list.move_selection(Direction::Previous) {
                    SettingsMsg::Dirty
                } else {
                    SettingsMsg::None
                }
            }
            Some(NavEvent::Next) => {
                if self.list.move_selection(Direction::Next) {
                    SettingsMsg::Dirty
                } else {
                    SettingsMsg::None
                }
            }
            None => SettingsMsg::None,
        }
    }

    #[cfg(test)]
    pub(crate) fn selected_id(&self) -> Option<SettingId> {
        self.list.selected_payload().map(|info| info.id)
    }

    pub fn draw(
        &self,
        ctx: &mut UiContext<'_>,
        rq: &mut RenderQueue,
        settings: &Settings,
        page_rows: usize,
    ) {
        let values: Vec<Option<String>> = self
            .list
            .iter()
            .map(|slot| slot.payload().and_then(|info| settings.value_text(info)))
            .collect();
        let rows: Vec<Row<'_>> = self
            .list
            .iter()
            .zip(values.iter())
            .map(|(slot, value)| match slot {
                Slot::Header(text) => Row::header(text),
                Slot::Separator => Row::separator(),
                Slot::Placeholder(text) => Row::placeholder(text),
                Slot::Entry(info) => match value {
                    Some(value) => Row::entry_with_value(info.label, value),
                    None => Row::entry(info.label),
                },
            })
            .collect();

        let mut view = ListView::new(&rows, self.list.page_window(page_rows));
        view.selected = self.list.selected();
        view.title = Some("Settings");
        view.footer = Some("Back  Toggle  Up  Down");
        view.page_indicator = Some((
            self.list.current_page(page_rows),
            self.list.total_pages(page_rows),
        ));
        view.dark = settings.dark_mode;
        view.list_top = CONTENT_TOP;
        view.line_height = LINE_HEIGHT;

        let size = ctx.buffers.size();
        let rect = Rect::new(0, 0, size.width as i32, size.height as i32);
        view.render(ctx, rect, rq);
    }
}

impl Default for SettingsScreen {
    fn default() -> Self {
        Self::new()
    }
}
