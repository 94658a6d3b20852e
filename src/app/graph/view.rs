use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Align2, Color32, FontId, Sense, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::sessions::SessionSnapshot;

use super::super::render_utils::draw_background;
use super::super::sim::Simulation;
use super::super::{SearchMatchCache, ViewModel};
use super::interaction::{handle_pointer, update_cursor};
use super::render::{RenderOptions, draw_simulation};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Graph node indices of the sessions whose name matches `query`.
///
/// Session `i` of the snapshot is node `i + 1`; the hub never matches.
fn search_matches(snapshot: &SessionSnapshot, query: &str) -> HashSet<usize> {
    let matcher = SkimMatcherV2::default();
    snapshot
        .sessions()
        .iter()
        .enumerate()
        .filter_map(|(index, session)| {
            fuzzy_match_score(&matcher, &session.name, query).map(|_| index + 1)
        })
        .collect()
}

impl ViewModel {
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let search_query = self.search.trim();
        if search_query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == search_query
            && cached.snapshot.same_identity(&self.snapshot)
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matches = Arc::new(search_matches(&self.snapshot, search_query));
        self.search_match_cache = Some(SearchMatchCache {
            query: search_query.to_owned(),
            snapshot: self.snapshot.clone(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if self.sim.is_none() {
            self.sim = Some(Simulation::new(
                self.snapshot.clone(),
                rect.width(),
                rect.height(),
                self.physics,
                self.seed,
            ));
        }

        let search_matches = self.cached_search_matches();
        let show_links = self.show_links;
        let Some(sim) = self.sim.as_mut() else {
            return;
        };

        sim.resize(rect.width(), rect.height());
        sim.set_physics(self.physics);
        sim.sync_snapshot(&self.snapshot);
        handle_pointer(ui, rect, sim, &mut self.navigator);
        update_cursor(ui, sim);

        let options = RenderOptions {
            search_matches: search_matches.as_deref(),
            show_links,
        };
        self.frame_loop
            .run_frame(sim, |sim| draw_simulation(&painter, rect, sim, &options));

        if self.snapshot.is_empty() {
            painter.text(
                rect.center() + vec2(0.0, 90.0),
                Align2::CENTER_TOP,
                "No sessions yet. Create a session to start filling your second brain.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
        }

        if let Some(hovered) = sim.pointer().hovered().and_then(|index| sim.node(index)) {
            let summary = format!(
                "{}  |  {} items  |  {} words",
                hovered.display_name,
                hovered.weight,
                crate::util::format_count(hovered.stats.total_words)
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                summary,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::Context;

    use crate::app::navigate::SessionNavigator;
    use crate::config::AppConfig;
    use crate::sessions::{SessionRecord, SessionStats};

    use super::*;

    fn snapshot(names: &[&str]) -> SessionSnapshot {
        SessionSnapshot::new(
            names
                .iter()
                .map(|name| SessionRecord {
                    id: name.to_ascii_lowercase().replace(' ', "-"),
                    name: (*name).to_owned(),
                    description: None,
                    node_count: 1,
                    stats: SessionStats::default(),
                    last_modified: 0,
                })
                .collect(),
        )
    }

    fn view_model(snapshot: SessionSnapshot) -> ViewModel {
        ViewModel::new(
            &Context::default(),
            snapshot,
            &AppConfig::default(),
            None,
            SessionNavigator::new(None),
        )
    }

    #[test]
    fn matches_map_sessions_to_node_indices() {
        let matches = search_matches(&snapshot(&["Rust notes", "Gardening", "rusty tools"]), "rust");
        assert_eq!(matches, HashSet::from([1, 3]));
    }

    #[test]
    fn search_follows_reordered_snapshot_of_same_length() {
        let mut model = view_model(snapshot(&["Rust notes", "Gardening"]));
        model.search = "rust".to_owned();
        assert_eq!(model.cached_search_matches().as_deref(), Some(&HashSet::from([1])));

        model.apply_snapshot(snapshot(&["Gardening", "Rust notes"]));
        assert_eq!(model.cached_search_matches().as_deref(), Some(&HashSet::from([2])));
        // Second lookup comes from the cache and must agree.
        assert_eq!(model.cached_search_matches().as_deref(), Some(&HashSet::from([2])));
    }

    #[test]
    fn stale_cache_entry_is_ignored_after_reload() {
        let mut model = view_model(snapshot(&["Rust notes", "Gardening"]));
        model.search = "rust".to_owned();
        model.cached_search_matches();

        // A reload that bypasses the cache reset still changes the snapshot identity.
        model.snapshot = snapshot(&["Gardening", "Rust notes"]);
        assert_eq!(model.cached_search_matches().as_deref(), Some(&HashSet::from([2])));
    }
}
