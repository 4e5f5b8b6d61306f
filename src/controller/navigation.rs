//! Library/playlist/search navigation

use crate::model::{FocusPanel, PlaylistSource, SearchSession};

use super::{AppController, Request};

impl AppController {
    pub(super) fn activate(&mut self) -> Vec<Request> {
        match self.model.focus {
            FocusPanel::Sidebar => self.select_playlist(),
            FocusPanel::Main => self.play_selected_track(),
            FocusPanel::Queue => self.skip_to_selected_queue_entry(),
        }
    }

    fn select_playlist(&mut self) -> Vec<Request> {
        let Some(item) = self.model.selected_playlist() else {
            return Vec::new();
        };
        let source = PlaylistSource::from_item(item);
        let name = item.name.clone();

        if !self.model.browse.begin_loading(source.clone(), name) {
            tracing::debug!(playlist = source.id(), "Playlist already loading");
            return Vec::new();
        }
        tracing::debug!(playlist = source.id(), "Loading playlist tracks");
        self.model.focus = FocusPanel::Main;
        vec![Request::FetchTracks(source)]
    }

    fn play_selected_track(&mut self) -> Vec<Request> {
        let browse = &self.model.browse;
        if browse.loading || browse.selected_row().is_none() {
            return Vec::new();
        }
        let offset = browse.selected;
        let context_name = browse.name.clone();

        match &browse.source {
            Some(PlaylistSource::Playlist { uri, .. }) => vec![Request::PlayInContext {
                context_uri: uri.clone(),
                offset,
                context_name,
            }],
            // Liked songs has no context uri, so play it as an explicit list
            Some(PlaylistSource::Liked) => vec![Request::PlayUriList {
                uris: browse.rows.iter().map(|row| row.track.uri()).collect(),
                offset,
                context_name,
            }],
            None => Vec::new(),
        }
    }

    fn skip_to_selected_queue_entry(&mut self) -> Vec<Request> {
        if self.model.queue.is_empty() {
            return Vec::new();
        }
        vec![Request::SkipToQueuePosition(self.model.queue.selected)]
    }

    pub(super) fn enter_search(&mut self) -> Vec<Request> {
        self.model.search = Some(SearchSession::default());
        self.model.focus = FocusPanel::Main;
        Vec::new()
    }

    pub(super) fn exit_search(&mut self) -> Vec<Request> {
        self.model.search = None;
        Vec::new()
    }

    pub(super) fn search_input(&mut self, c: char) -> Vec<Request> {
        if let Some(search) = self.model.search.as_mut() {
            search.push_char(c);
        }
        Vec::new()
    }

    pub(super) fn search_backspace(&mut self) -> Vec<Request> {
        if let Some(search) = self.model.search.as_mut() {
            search.backspace();
        }
        Vec::new()
    }

    /// Enter plays the highlighted result when the results belong to the
    /// typed query, and otherwise runs the search.
    pub(super) fn submit_search(&mut self) -> Vec<Request> {
        let Some(search) = self.model.search.as_mut() else {
            return Vec::new();
        };
        if search.results_are_current() {
            return match search.selected_track() {
                Some(track) => vec![Request::PlaySingle(track.clone())],
                None => Vec::new(),
            };
        }
        if search.query.trim().is_empty() {
            return Vec::new();
        }
        search.searching = true;
        vec![Request::Search(search.query.clone())]
    }
}
