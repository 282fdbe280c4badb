use std::path::PathBuf;
use std::time::Instant;

use finch_core::{application::Application, framebuffer::ScreenBuffers};

use crate::display::{LOGICAL_HEIGHT, LOGICAL_WIDTH, MinifbDisplay};
use crate::source::DesktopSource;

mod display;
mod source;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("finch desktop simulator started");

    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./books"));

    let window = minifb::Window::new(
        "Finch Desktop",
        LOGICAL_WIDTH,
        LOGICAL_HEIGHT,
        minifb::WindowOptions::default(),
    )
    .unwrap_or_else(|e| {
        panic!("Unable to open window: {}", e);
    });

    let mut buffers = Box::new(ScreenBuffers::new());
    let mut source = DesktopSource::new(root);
    let mut display = MinifbDisplay::new(window);
    let mut application = Application::new(&mut buffers, &mut source);

    let mut last_frame = Instant::now();
    while display.is_open() {
        let elapsed_ms = last_frame.elapsed().as_millis() as u32;
        last_frame = Instant::now();
        display.update(elapsed_ms);
        if let Some(event) = application.update(display.buttons(), elapsed_ms) {
            // The reader, transfer server, and network features live in the
            // firmware; the simulator just reports them.
            log::info!("unhandled app event: {:?}", event);
        }
        application.draw(&mut display);
    }
}
