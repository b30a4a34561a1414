//! An in-memory song collection and the ways to filter it.

use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

use rayon::prelude::*;
use tracing::debug;
use tunesift_query::Query;

use crate::{error::LibraryError, song::Song};

/// Counts from one chunked filter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Songs the query was evaluated against.
    pub scanned: usize,
    /// Songs that matched.
    pub matched: usize,
    /// Chunks handed to the callback.
    pub chunks: usize,
    /// Whether the run stopped early because it was cancelled.
    pub cancelled: bool,
}

/// A collection of songs held in memory.
#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Songs in load order.
    songs: Vec<Song>,
}

impl Library {
    /// Creates a library from songs already in memory.
    pub fn from_songs(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    /// Loads a JSON array of song objects.
    pub fn load_json(path: &Path) -> Result<Self, LibraryError> {
        let text = fs::read_to_string(path).map_err(|source| LibraryError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let songs: Vec<Song> =
            serde_json::from_str(&text).map_err(|source| LibraryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), songs = songs.len(), "loaded library");
        Ok(Self::from_songs(songs))
    }

    /// Number of songs.
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the library has no songs.
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Songs in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    /// The song at `index`.
    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// The songs `query` matches, in library order.
    pub fn filter(&self, query: &Query) -> Vec<&Song> {
        query.filter(&self.songs).collect()
    }

    /// Filters in chunks of `chunk_size`, handing each chunk's matches to `on_chunk`.
    ///
    /// `cancel` is checked before every chunk; once set, no further chunks are scanned.
    pub fn filter_chunked<'a, F>(
        &'a self,
        query: &Query,
        chunk_size: usize,
        cancel: &AtomicBool,
        mut on_chunk: F,
    ) -> FilterStats
    where
        F: FnMut(&[&'a Song]),
    {
        let mut stats = FilterStats::default();
        for chunk in self.songs.chunks(chunk_size.max(1)) {
            if cancel.load(Ordering::Relaxed) {
                stats.cancelled = true;
                break;
            }
            let matched: Vec<&Song> = query.filter(chunk).collect();
            stats.scanned += chunk.len();
            stats.matched += matched.len();
            stats.chunks += 1;
            on_chunk(&matched);
        }
        debug!(
            query = query.text(),
            scanned = stats.scanned,
            matched = stats.matched,
            chunks = stats.chunks,
            cancelled = stats.cancelled,
            "chunked filter finished"
        );
        stats
    }

    /// Filters on the rayon thread pool. Matches come back in library order.
    pub fn filter_parallel(&self, query: &Query) -> Vec<&Song> {
        let matched: Vec<&Song> = self
            .songs
            .par_iter()
            .filter(|song| query.matches(*song))
            .collect();
        debug!(
            query = query.text(),
            scanned = self.songs.len(),
            matched = matched.len(),
            "parallel filter finished"
        );
        matched
    }
}

impl FromIterator<Song> for Library {
    fn from_iter<I: IntoIterator<Item = Song>>(iter: I) -> Self {
        Self::from_songs(iter.into_iter().collect())
    }
}
