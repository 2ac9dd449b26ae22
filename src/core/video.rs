//! Landing-page tutorial video picker
//!
//! Holds the currently selected video from a fixed list. The embedded
//! player source is a pure function of the selection.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// One entry of the video list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Player id, e.g. a YouTube video id
    pub id: String,
    pub title: String,
}

impl Video {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Selection state over a fixed, non-empty video list
#[derive(Debug, Clone)]
pub struct VideoSelector {
    videos: Vec<Video>,
    selected: usize,
}

impl VideoSelector {
    /// Start with the first video selected
    pub fn new(videos: Vec<Video>) -> Result<Self> {
        if videos.is_empty() {
            return Err(ExportError::validation("video list is empty"));
        }
        Ok(Self {
            videos,
            selected: 0,
        })
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn selected(&self) -> &Video {
        &self.videos[self.selected]
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected().id == id
    }

    /// Select the video with `id`. Returns whether the selection changed;
    /// unknown ids leave the state untouched.
    pub fn select(&mut self, id: &str) -> Result<bool> {
        let idx = self
            .videos
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| ExportError::validation(format!("unknown video id '{}'", id)))?;

        let changed = idx != self.selected;
        self.selected = idx;
        Ok(changed)
    }

    /// Player source for the current selection
    pub fn embed_url(&self) -> String {
        format!("{}{}", EMBED_BASE, self.selected().id)
    }
}
