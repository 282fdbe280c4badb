extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embedded_graphics::prelude::OriginDimensions;
use log::{debug, info, warn};

use crate::input::{Button, ButtonState, NavEvent, nav_released};
use crate::store::{
    AppSource, EntryKind, RecentBook, ShelfEntry, StoreError, mark_recent, recent_title,
};
use crate::ui::{
    Direction, ListView, PagedList, Rect, RenderQueue, Row, Slot, UiContext, View, items_per_page,
};

const CONTENT_TOP: i32 = 60;
const LINE_HEIGHT: i32 = 24;
const BOTTOM_BAR: i32 = 60;

/// Hold past this and a direction release skips a whole page.
pub const SKIP_PAGE_MS: u32 = 700;
/// Hold Back past this to jump straight to the library root.
pub const GO_HOME_MS: u32 = 1000;

/// Payload of a selectable library row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookRef {
    Recent(usize),
    File(usize),
}

pub enum LibraryMsg {
    None,
    Dirty,
    OpenBook(String),
    GoHome,
}

/// Bookshelf screen: recent books on top, the current directory below,
/// both navigated as one list.
pub struct LibraryState {
    list: PagedList<BookRef>,
    recents: Vec<RecentBook>,
    shelf: Vec<ShelfEntry>,
    path: Vec<String>,
}

impl LibraryState {
    pub fn enter(source: &mut impl AppSource) -> Result<Self, StoreError> {
        let mut state = Self {
            list: PagedList::new(),
            recents: Vec::new(),
            shelf: Vec::new(),
            path: Vec::new(),
        };
        state.recents = source
            .load_recent_books()
            .into_iter()
            .filter(|book| source.exists(&book.path))
            .collect();
        state.shelf = source.list_dir(&state.path)?;
        state.rebuild(None);
        info!(
            "library: {} recent, {} shelf entries",
            state.recents.len(),
            state.shelf.len()
        );
        Ok(state)
    }

    /// Rows that fit between the header and the bottom hint bar.
    pub fn page_rows(screen_height: i32) -> usize {
        items_per_page(screen_height - CONTENT_TOP - BOTTOM_BAR, LINE_HEIGHT)
    }

    fn rebuild(&mut self, anchor_dir: Option<&str>) {
        let mut items = Vec::with_capacity(self.recents.len() + self.shelf.len() + 4);
        items.push(Slot::Header("Recent".to_string()));
        if self.recents.is_empty() {
            items.push(Slot::Placeholder("No recent books".to_string()));
        } else {
            for index in 0..self.recents.len() {
                items.push(Slot::Entry(BookRef::Recent(index)));
            }
        }
        items.push(Slot::Header("All Books".to_string()));
        if self.shelf.is_empty() {
            items.push(Slot::Placeholder("No books found".to_string()));
        } else {
            for index in 0..self.shelf.len() {
                items.push(Slot::Entry(BookRef::File(index)));
            }
        }

        match anchor_dir {
            Some(name) => {
                let shelf = &self.shelf;
                self.list.set_items_anchored(items, |book| match book {
                    BookRef::File(index) => shelf[*index].name == name,
                    BookRef::Recent(_) => false,
                });
            }
            None => self.list.set_items(items),
        }
    }

    fn full_path(&self, name: &str) -> String {
        let mut path = String::from("/");
        for segment in &self.path {
            path.push_str(segment);
            path.push('/');
        }
        path.push_str(name);
        path
    }

    pub fn title(&self) -> String {
        if self.path.is_empty() {
            String::from("Bookshelf")
        } else {
            let mut title = String::from("Bookshelf/");
            title.push_str(&self.path.join("/"));
            title
        }
    }

    pub fn handle_input(
        &mut self,
        source: &mut impl AppSource,
        buttons: &ButtonState,
        page_rows: usize,
    ) -> LibraryMsg {
        // Long-press Back jumps to the root while still held.
        if buttons.is_down(Button::Back) && buttons.held_ms() >= GO_HOME_MS {
            if !self.path.is_empty() {
                self.path.clear();
                return self.relist(source, None);
            }
            return LibraryMsg::None;
        }

        let skip_page = buttons.held_ms() > SKIP_PAGE_MS;
        match nav_released(buttons) {
            Some(NavEvent::Confirm) => self.activate(source),
            Some(NavEvent::Back) => {
                if buttons.held_ms() >= GO_HOME_MS {
                    // Consumed by the long-press path above.
                    return LibraryMsg::None;
                }
                if let Some(left) = self.path.pop() {
                    self.relist(source, Some(&left))
                } else {
                    LibraryMsg::GoHome
                }
            }
            Some(NavEvent::Previous) => self.step(Direction::Previous, skip_page, page_rows),
            Some(NavEvent::Next) => self.step(Direction::Next, skip_page, page_rows),
            None => LibraryMsg::None,
        }
    }

    fn step(&mut self, direction: Direction, skip_page: bool, page_rows: usize) -> LibraryMsg {
        let changed = if skip_page {
            self.list.move_selection_by_page(direction, page_rows)
        } else {
            self.list.move_selection(direction)
        };
        if changed {
            debug!(
                "library: selection -> {:?} (page {}/{})",
                self.list.selected(),
                self.list.current_page(page_rows),
                self.list.total_pages(page_rows)
            );
            LibraryMsg::Dirty
        } else {
            LibraryMsg::None
        }
    }

    fn relist(&mut self, source: &mut impl AppSource, anchor_dir: Option<&str>) -> LibraryMsg {
        match source.list_dir(&self.path) {
            Ok(shelf) => {
                self.shelf = shelf;
                self.rebuild(anchor_dir);
                LibraryMsg::Dirty
            }
            Err(err) => {
                warn!("library: listing failed: {err:?}");
                self.shelf.clear();
                self.rebuild(None);
                LibraryMsg::Dirty
            }
        }
    }

    fn activate(&mut self, source: &mut impl AppSource) -> LibraryMsg {
        let Some(book) = self.list.selected_payload().copied() else {
            return LibraryMsg::None;
        };
        match book {
            BookRef::Recent(index) => {
                let book = self.recents[index].clone();
                self.open_book(source, book.path, book.title)
            }
            BookRef::File(index) => {
                let entry = self.shelf[index].clone();
                match entry.kind {
                    EntryKind::Dir => {
                        self.path.push(entry.name);
                        self.relist(source, None)
                    }
                    EntryKind::File => {
                        let path = self.full_path(&entry.name);
                        self.open_book(source, path, String::new())
                    }
                }
            }
        }
    }

    fn open_book(
        &mut self,
        source: &mut impl AppSource,
        path: String,
        title: String,
    ) -> LibraryMsg {
        info!("library: opening {path}");
        mark_recent(&mut self.recents, &path, &title);
        source.save_recent_books(&self.recents);
        source.save_resume_path(Some(&path));
        self.rebuild(None);
        LibraryMsg::OpenBook(path)
    }

    #[cfg(test)]
    pub(crate) fn selection(&self) -> Option<BookRef> {
        self.list.selected_payload().copied()
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn draw(
        &self,
        ctx: &mut UiContext<'_>,
        rq: &mut RenderQueue,
        dark: bool,
        page_rows: usize,
    ) {
        let mut labels: Vec<String> = Vec::with_capacity(self.list.len());
        for slot in self.list.iter() {
            let label = match slot {
                Slot::Entry(BookRef::Recent(index)) => {
                    recent_title(&self.recents[*index]).to_string()
                }
                Slot::Entry(BookRef::File(index)) => {
                    let entry = &self.shelf[*index];
                    match entry.kind {
                        EntryKind::Dir => {
                            let mut label = entry.name.clone();
                            label.push('/');
                            label
                        }
                        EntryKind::File => entry.name.clone(),
                    }
                }
                Slot::Header(text) | Slot::Placeholder(text) => text.clone(),
                Slot::Separator => String::new(),
            };
            labels.push(label);
        }
        let rows: Vec<Row<'_>> = self
            .list
            .iter()
            .zip(labels.iter())
            .map(|(slot, label)| match slot {
                Slot::Header(_) => Row::header(label),
                Slot::Separator => Row::separator(),
                Slot::Placeholder(_) => Row::placeholder(label),
                Slot::Entry(_) => Row::entry(label),
            })
            .collect();

        let title = self.title();
        let mut view = ListView::new(&rows, self.list.page_window(page_rows));
        view.selected = self.list.selected();
        view.title = Some(&title);
        view.footer = Some("Back  Open  Up  Down");
        view.empty_label = Some("No books found");
        view.page_indicator = Some((
            self.list.current_page(page_rows),
            self.list.total_pages(page_rows),
        ));
        view.dark = dark;
        view.list_top = CONTENT_TOP;
        view.line_height = LINE_HEIGHT;

        let size = ctx.buffers.size();
        let rect = Rect::new(0, 0, size.width as i32, size.height as i32);
        view.render(ctx, rect, rq);
    }
}
