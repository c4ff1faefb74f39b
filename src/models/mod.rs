pub mod settings;
pub mod summary;
pub mod torrent;
