/* Decorations drawn for each track: an SVG badge with the track initials, and
the marker the map library builds from it. This is renderer state; the replay
core never reads or writes it. Markers are generic so any map binding can
store its own marker type here.
*/

use std::collections::HashMap;

use crate::track::TrackId;
use crate::utils::escape_html;

const FALLBACK_COLOR: &str = "#888";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackIcon {
    pub initials: String,
    pub color: String,
    pub svg: String,
}

impl TrackIcon {
    pub fn new(initials: &str, color: &str) -> Self {
        let size = font_size(initials);
        let svg = format!(
            r##"<svg viewBox="0 0 500 500"><circle cx="250" cy="250" r="200" fill="{}" /><text x="250" y="250" text-anchor="middle" dominant-baseline="central" font-size="{}" fill="#fff">{}</text></svg>"##,
            escape_html(color),
            size,
            escape_html(initials)
        );
        TrackIcon {
            initials: initials.to_owned(),
            color: color.to_owned(),
            svg,
        }
    }

    fn unknown() -> Self {
        TrackIcon {
            initials: "?".to_owned(),
            color: FALLBACK_COLOR.to_owned(),
            svg: String::new(),
        }
    }
}

// Longer initials get a smaller font so they still fit in the circle.
fn font_size(initials: &str) -> f64 {
    let len = initials.chars().count().max(1) as f64;
    (400. / len).min(300.)
}

pub struct TrackIcons<M> {
    default_color: String,
    icons: HashMap<TrackId, TrackIcon>,
    markers: HashMap<TrackId, M>,
}

impl<M> TrackIcons<M> {
    pub fn new(default_color: &str) -> Self {
        TrackIcons {
            default_color: default_color.to_owned(),
            icons: HashMap::new(),
            markers: HashMap::new(),
        }
    }

    /// A blank `color` keeps the current color of the icon, if any. The
    /// cached marker is dropped so it gets rebuilt with the new badge.
    pub fn set_track_icon(&mut self, id: TrackId, initials: &str, color: Option<&str>) {
        let color = match color.filter(|c| !c.is_empty()) {
            Some(color) => color.to_owned(),
            None => self
                .icons
                .get(&id)
                .map(|icon| icon.color.clone())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| self.default_color.clone()),
        };
        self.icons.insert(id, TrackIcon::new(initials, &color));
        self.markers.remove(&id);
    }

    /// The icon a freshly added track gets: its id as initials in the
    /// default color. Call it for every id `TrackStore::add_raw_tracks`
    /// returns.
    pub fn set_default_icon(&mut self, id: TrackId) {
        self.set_track_icon(id, &id.to_string(), None);
    }

    pub fn set_default_icons(&mut self, ids: &[TrackId]) {
        for id in ids {
            self.set_default_icon(*id);
        }
    }

    pub fn get_track_icon(&self, id: TrackId) -> TrackIcon {
        self.icons.get(&id).cloned().unwrap_or_else(TrackIcon::unknown)
    }

    pub fn get_marker<F>(&mut self, id: TrackId, create_marker: F) -> &M
    where
        F: FnOnce(&str) -> M,
    {
        if !self.markers.contains_key(&id) {
            let marker = create_marker(&self.get_track_icon(id).svg);
            self.markers.insert(id, marker);
        }
        &self.markers[&id]
    }

    pub fn remove(&mut self, id: TrackId) {
        self.icons.remove(&id);
        self.markers.remove(&id);
    }
}
