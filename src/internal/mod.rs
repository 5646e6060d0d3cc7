pub mod bookmarks;
pub mod cache;
pub mod freshness;
pub mod history;
pub mod keyseq;
pub mod models;
pub mod prefs;
pub mod search;
pub mod sync;
