// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-control state: mode, story and category filters, data controls.

use bemview_scene::Palette;

use crate::mode::RenderMode;
use crate::preferences::{self, get_bool, get_float, get_string, PreferenceStore};

/// Story filter entry that shows every story.
pub const ALL_STORIES: &str = "All Stories";

/// Which building story is shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoryFilter {
    #[default]
    All,
    Only(String),
}

impl StoryFilter {
    pub fn from_name(name: &str) -> Self {
        if name == ALL_STORIES {
            StoryFilter::All
        } else {
            StoryFilter::Only(name.to_string())
        }
    }

    pub fn admits(&self, story: Option<&str>) -> bool {
        match self {
            StoryFilter::All => true,
            StoryFilter::Only(name) => story == Some(name.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StoryFilter::All => ALL_STORIES,
            StoryFilter::Only(name) => name,
        }
    }
}

/// A surface category with its own visibility toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Floors,
    Walls,
    RoofCeilings,
    /// Windows, skylights and tubular daylighting devices.
    Windows,
    Doors,
    Shading,
    Partitions,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Floors,
        Category::Walls,
        Category::RoofCeilings,
        Category::Windows,
        Category::Doors,
        Category::Shading,
        Category::Partitions,
    ];

    pub fn preference_key(&self) -> &'static str {
        match self {
            Category::Floors => preferences::SHOW_FLOORS,
            Category::Walls => preferences::SHOW_WALLS,
            Category::RoofCeilings => preferences::SHOW_ROOF_CEILINGS,
            Category::Windows => preferences::SHOW_WINDOWS,
            Category::Doors => preferences::SHOW_DOORS,
            Category::Shading => preferences::SHOW_SHADING,
            Category::Partitions => preferences::SHOW_PARTITIONS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Exact(&'static str),
    Contains(&'static str),
}

impl Pattern {
    fn matches(&self, surface_type: &str) -> bool {
        match self {
            Pattern::Exact(s) => surface_type == *s,
            Pattern::Contains(s) => surface_type.contains(s),
        }
    }
}

/// First rule whose category is switched off and whose pattern matches
/// decides; `hide == false` stops the chain without hiding.
struct Rule {
    category: Category,
    pattern: Pattern,
    hide: bool,
}

const FILTER_CHAIN: [Rule; 10] = [
    Rule { category: Category::Floors, pattern: Pattern::Exact("Floor"), hide: true },
    Rule { category: Category::Walls, pattern: Pattern::Exact("Wall"), hide: true },
    Rule { category: Category::RoofCeilings, pattern: Pattern::Exact("RoofCeiling"), hide: true },
    Rule { category: Category::Windows, pattern: Pattern::Contains("Window"), hide: true },
    // Glass doors stay visible when windows are hidden
    Rule { category: Category::Windows, pattern: Pattern::Contains("GlassDoor"), hide: false },
    Rule { category: Category::Windows, pattern: Pattern::Contains("Skylight"), hide: true },
    Rule { category: Category::Windows, pattern: Pattern::Contains("TubularDaylight"), hide: true },
    Rule { category: Category::Doors, pattern: Pattern::Contains("Door"), hide: true },
    Rule { category: Category::Shading, pattern: Pattern::Contains("Shading"), hide: true },
    Rule {
        category: Category::Partitions,
        pattern: Pattern::Exact("InteriorPartitionSurface"),
        hide: true,
    },
];

/// Per-category visibility toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilters {
    pub floors: bool,
    pub walls: bool,
    pub roof_ceilings: bool,
    pub windows: bool,
    pub doors: bool,
    pub shading: bool,
    pub partitions: bool,
}

impl Default for CategoryFilters {
    fn default() -> Self {
        Self {
            floors: true,
            walls: true,
            roof_ceilings: true,
            windows: true,
            doors: true,
            shading: true,
            partitions: true,
        }
    }
}

impl CategoryFilters {
    pub fn shown(&self, category: Category) -> bool {
        match category {
            Category::Floors => self.floors,
            Category::Walls => self.walls,
            Category::RoofCeilings => self.roof_ceilings,
            Category::Windows => self.windows,
            Category::Doors => self.doors,
            Category::Shading => self.shading,
            Category::Partitions => self.partitions,
        }
    }

    pub fn set(&mut self, category: Category, shown: bool) {
        let slot = match category {
            Category::Floors => &mut self.floors,
            Category::Walls => &mut self.walls,
            Category::RoofCeilings => &mut self.roof_ceilings,
            Category::Windows => &mut self.windows,
            Category::Doors => &mut self.doors,
            Category::Shading => &mut self.shading,
            Category::Partitions => &mut self.partitions,
        };
        *slot = shown;
    }

    /// Whether a surface of `surface_type` is hidden by the toggles.
    pub fn hides(&self, surface_type: &str) -> bool {
        FILTER_CHAIN
            .iter()
            .find(|rule| !self.shown(rule.category) && rule.pattern.matches(surface_type))
            .is_some_and(|rule| rule.hide)
    }
}

/// Everything the user can change from the control panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: RenderMode,
    pub story: StoryFilter,
    pub filters: CategoryFilters,
    pub wireframe: bool,
    pub orthographic: bool,
    pub variable: Option<String>,
    pub palette: Palette,
    /// Day slider position, floored when indexing.
    pub day: f64,
    /// Hour slider position, 1-based, floored when indexing.
    pub hour: f64,
    pub cycle_hour: bool,
    /// Hour steps per second while cycling.
    pub cycle_speed: f64,
    pub rotate_legend: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: RenderMode::SurfaceType,
            story: StoryFilter::All,
            filters: CategoryFilters::default(),
            wireframe: true,
            orthographic: false,
            variable: None,
            palette: Palette::Diverging,
            day: 0.0,
            hour: 1.0,
            cycle_hour: false,
            cycle_speed: 1.0,
            rotate_legend: false,
        }
    }
}

impl Settings {
    /// Defaults overlaid with whatever the store has persisted.
    pub fn from_preferences(store: &dyn PreferenceStore) -> Self {
        let defaults = Self::default();
        let mut filters = defaults.filters;
        for category in Category::ALL {
            let shown = get_bool(store, category.preference_key(), filters.shown(category));
            filters.set(category, shown);
        }
        Self {
            filters,
            wireframe: get_bool(store, preferences::SHOW_WIREFRAME, defaults.wireframe),
            orthographic: get_bool(store, preferences::ORTHOGRAPHIC, defaults.orthographic),
            palette: Palette::from_name(&get_string(
                store,
                preferences::COLOR_SCHEME,
                defaults.palette.as_str(),
            )),
            cycle_speed: get_float(store, preferences::CYCLE_SPEED, defaults.cycle_speed),
            rotate_legend: get_bool(store, preferences::ROTATE_COLOR_BAR, defaults.rotate_legend),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;

    fn all_off() -> CategoryFilters {
        let mut filters = CategoryFilters::default();
        for category in Category::ALL {
            filters.set(category, false);
        }
        filters
    }

    #[test]
    fn everything_shown_hides_nothing() {
        let filters = CategoryFilters::default();
        for surface_type in ["Floor", "Wall", "FixedWindow", "GlassDoor", "SiteShading"] {
            assert!(!filters.hides(surface_type));
        }
    }

    #[test]
    fn exact_and_substring_rules() {
        let filters = all_off();
        assert!(filters.hides("Floor"));
        assert!(!CategoryFilters { floors: false, ..Default::default() }.hides("FloorSlab"));
        assert!(filters.hides("OperableWindow"));
        assert!(filters.hides("Skylight"));
        assert!(filters.hides("TubularDaylightDome"));
        assert!(filters.hides("OverheadDoor"));
        assert!(filters.hides("BuildingShading"));
        assert!(filters.hides("InteriorPartitionSurface"));
        assert!(!CategoryFilters { partitions: false, ..Default::default() }
            .hides("InteriorPartitionSurfaceGroup"));
    }

    #[test]
    fn glass_door_is_exempt_from_window_filter() {
        let windows_off = CategoryFilters { windows: false, ..Default::default() };
        assert!(!windows_off.hides("GlassDoor"));
        // The exemption ends the chain, so the door toggle is not consulted
        assert!(!all_off().hides("GlassDoor"));
        // With windows shown, glass doors fall through to the door rule
        let doors_off = CategoryFilters { doors: false, ..Default::default() };
        assert!(doors_off.hides("GlassDoor"));
    }

    #[test]
    fn story_filter_matches_exactly() {
        let only = StoryFilter::from_name("Level 2");
        assert!(only.admits(Some("Level 2")));
        assert!(!only.admits(Some("Level 1")));
        assert!(!only.admits(None));
        assert!(StoryFilter::from_name(ALL_STORIES).admits(None));
    }

    #[test]
    fn settings_seed_from_preferences() {
        let store = MemoryPreferences::new()
            .with(preferences::SHOW_DOORS, false)
            .with(preferences::ORTHOGRAPHIC, true)
            .with(preferences::COLOR_SCHEME, "rainbow")
            .with(preferences::CYCLE_SPEED, 4.0);
        let settings = Settings::from_preferences(&store);
        assert!(!settings.filters.doors);
        assert!(settings.filters.walls);
        assert!(settings.orthographic);
        assert_eq!(settings.palette, Palette::Rainbow);
        assert_eq!(settings.cycle_speed, 4.0);
        assert_eq!(settings.hour, 1.0);
        assert_eq!(settings.story, StoryFilter::All);
    }

    #[test]
    fn fresh_store_gives_original_defaults() {
        let settings = Settings::from_preferences(&MemoryPreferences::new());
        assert_eq!(settings, Settings::default());
        assert!(settings.wireframe);
        assert_eq!(settings.palette, Palette::Diverging);
    }
}
