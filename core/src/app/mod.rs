extern crate alloc;

use alloc::string::String;

pub mod home;
pub mod library;
pub mod settings;

#[cfg(test)]
mod tests;

/// Work the application cannot do itself and hands to the embedder
/// (the reader, the transfer server, and the network features live there).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    OpenBook(String),
    FileTransferRequested,
    BrowserRequested,
    SyncRequested,
    ClearCacheRequested,
    UpdateCheckRequested,
}
