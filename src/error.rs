// Every variant states *where* things went wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Creating the window failed.
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed.
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Encoding or writing a frame snapshot failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] image::ImageError),
}
