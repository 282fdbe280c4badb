pub mod geom;
pub mod list_view;
pub mod paged_list;
pub mod view;

pub use geom::Rect;
pub use list_view::{ListView, Row, RowKind, fit_label};
pub use paged_list::{Direction, PageWindow, PagedList, Slot, items_per_page};
pub use view::{RenderQueue, UiContext, View, flush_queue};
