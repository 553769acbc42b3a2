//! Clip gallery state: ordering, layout, and clip selection.

use std::fmt;
use std::str::FromStr;

use vclip_models::GeneratedClip;

use crate::editor::ClipEditor;
use crate::error::{FrontendError, FrontendResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Highest viral score first
    #[default]
    Score,
    /// Earliest start time first (compared as display strings)
    Time,
}

impl SortMode {
    pub fn toggled(self) -> Self {
        match self {
            SortMode::Score => SortMode::Time,
            SortMode::Time => SortMode::Score,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Score => "By Score",
            SortMode::Time => "By Time",
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "score" => Ok(SortMode::Score),
            "time" => Ok(SortMode::Time),
            other => Err(format!("unknown sort mode '{other}' (expected score or time)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode '{other}' (expected grid or list)")),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => write!(f, "grid"),
            ViewMode::List => write!(f, "list"),
        }
    }
}

/// Order clips by descending score. Stable: equal scores keep input order.
pub fn sort_by_score(clips: &mut [GeneratedClip]) {
    clips.sort_by(|a, b| b.viral_score.cmp(&a.viral_score));
}

/// Order clips by their start-time display string, lexicographically.
///
/// Clips are compared as shown, not by offset, so "12:34" sorts before
/// "1:02:10" and "1:02:10" before "24:15".
pub fn sort_by_time(clips: &mut [GeneratedClip]) {
    clips.sort_by_cached_key(|clip| clip.start_label());
}

/// Gallery of the clips of one completed task.
///
/// Opening a clip swaps the gallery for the editor; closing the editor
/// brings the gallery back with its sort and layout untouched.
#[derive(Debug, Clone)]
pub struct Gallery {
    clips: Vec<GeneratedClip>,
    sort: SortMode,
    view: ViewMode,
    editor: Option<ClipEditor>,
}

impl Gallery {
    pub fn new(clips: Vec<GeneratedClip>) -> Self {
        Self {
            clips,
            sort: SortMode::default(),
            view: ViewMode::default(),
            editor: None,
        }
    }

    /// Clips in their received order.
    pub fn clips(&self) -> &[GeneratedClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Clips in display order.
    pub fn sorted(&self) -> Vec<GeneratedClip> {
        let mut clips = self.clips.clone();
        match self.sort {
            SortMode::Score => sort_by_score(&mut clips),
            SortMode::Time => sort_by_time(&mut clips),
        }
        clips
    }

    /// Clip at a 1-based position in display order.
    pub fn clip_at(&self, position: usize) -> FrontendResult<GeneratedClip> {
        position
            .checked_sub(1)
            .and_then(|index| self.sorted().into_iter().nth(index))
            .ok_or(FrontendError::UnknownClip(position))
    }

    /// Open the editor on a clip by id. Returns false if no such clip.
    pub fn open_editor(&mut self, clip_id: &str) -> bool {
        match self.clips.iter().find(|c| c.id == clip_id) {
            Some(clip) => {
                self.editor = Some(ClipEditor::new(clip.clone()));
                true
            }
            None => false,
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub fn editor(&self) -> Option<&ClipEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut ClipEditor> {
        self.editor.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(id: &str, score: u8, start: f64) -> GeneratedClip {
        GeneratedClip {
            id: id.to_string(),
            title: format!("clip {id}"),
            duration: "0:30".to_string(),
            viral_score: score,
            thumbnail_url: None,
            video_url: None,
            start_time: start,
            end_time: start + 30.0,
        }
    }

    fn ids(clips: &[GeneratedClip]) -> Vec<&str> {
        clips.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_score_sort_is_stable_descending() {
        let mut clips = vec![
            clip("a", 60, 0.0),
            clip("b", 94, 10.0),
            clip("c", 60, 20.0),
            clip("d", 94, 30.0),
        ];
        sort_by_score(&mut clips);
        assert_eq!(ids(&clips), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_time_sort_compares_display_strings() {
        // 3730s -> "1:02:10", 754s -> "12:34", 1455s -> "24:15"
        let mut clips = vec![clip("late", 50, 1455.0), clip("hour", 50, 3730.0), clip("early", 50, 754.0)];
        sort_by_time(&mut clips);
        assert_eq!(ids(&clips), vec!["early", "hour", "late"]);
    }

    #[test]
    fn test_gallery_defaults_and_toggle() {
        let mut gallery = Gallery::new(vec![clip("a", 10, 0.0)]);
        assert_eq!(gallery.sort_mode(), SortMode::Score);
        assert_eq!(gallery.view_mode(), ViewMode::Grid);

        gallery.toggle_sort();
        assert_eq!(gallery.sort_mode(), SortMode::Time);
        gallery.toggle_sort();
        assert_eq!(gallery.sort_mode(), SortMode::Score);
    }

    #[test]
    fn test_clip_at_uses_display_order() {
        let gallery = Gallery::new(vec![clip("low", 20, 0.0), clip("high", 90, 10.0)]);
        assert_eq!(gallery.clip_at(1).unwrap().id, "high");
        assert_eq!(gallery.clip_at(2).unwrap().id, "low");
        assert!(matches!(gallery.clip_at(0), Err(FrontendError::UnknownClip(0))));
        assert!(matches!(gallery.clip_at(3), Err(FrontendError::UnknownClip(3))));
    }

    #[test]
    fn test_editor_replaces_gallery_and_keeps_layout() {
        let mut gallery = Gallery::new(vec![clip("a", 10, 0.0)]);
        gallery.set_view(ViewMode::List);
        gallery.set_sort(SortMode::Time);

        assert!(!gallery.open_editor("missing"));
        assert!(gallery.open_editor("a"));
        assert_eq!(gallery.editor().unwrap().clip().id, "a");

        gallery.close_editor();
        assert!(gallery.editor().is_none());
        assert_eq!(gallery.view_mode(), ViewMode::List);
        assert_eq!(gallery.sort_mode(), SortMode::Time);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("TIME".parse::<SortMode>().unwrap(), SortMode::Time);
        assert_eq!("list".parse::<ViewMode>().unwrap(), ViewMode::List);
        assert!("table".parse::<ViewMode>().is_err());
    }
}
