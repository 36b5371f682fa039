//! Asset catalog with category filter and search

use shared::{Asset, GeometryType};

fn builtin(id: &str, name: &str, tags: &[&str], thumbnail: &str, geometry: GeometryType) -> Asset {
    Asset {
        id: id.to_string(),
        name: name.to_string(),
        category: "Primitives".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        thumbnail: thumbnail.to_string(),
        description: format!("Basic {} primitive", name.to_lowercase()),
        primitive: geometry.canonical(),
        ai_generated: false,
        ai_prompt: None,
        color: None,
        display_text: None,
    }
}

/// Built-in primitive assets
pub fn builtin_assets() -> Vec<Asset> {
    vec![
        builtin("asset-1", "Cube", &["basic", "geometry", "3d"], "📦", GeometryType::Box),
        builtin("asset-2", "Sphere", &["basic", "geometry", "round"], "🔮", GeometryType::Sphere),
        builtin("asset-3", "Cylinder", &["basic", "geometry", "column"], "🛢️", GeometryType::Cylinder),
        builtin("asset-4", "Cone", &["basic", "geometry", "pyramid"], "🔺", GeometryType::Cone),
        builtin("asset-5", "Torus", &["basic", "geometry", "donut"], "🍩", GeometryType::Torus),
    ]
}

/// Placeable assets plus the derived filtered view
pub struct AssetCatalog {
    assets: Vec<Asset>,
    filtered: Vec<Asset>,
    selected_category: Option<String>,
    search_query: String,
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::with_assets(builtin_assets())
    }
}

impl AssetCatalog {
    pub fn with_assets(assets: Vec<Asset>) -> Self {
        Self {
            filtered: assets.clone(),
            assets,
            selected_category: None,
            search_query: String::new(),
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Assets passing the active category filter and search query
    pub fn filtered(&self) -> &[Asset] {
        &self.filtered
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for asset in &self.assets {
            if !seen.contains(&asset.category.as_str()) {
                seen.push(&asset.category);
            }
        }
        seen
    }

    /// Replace the whole catalog; filters stay active
    pub fn set_assets(&mut self, assets: Vec<Asset>) {
        self.assets = assets;
        self.refilter();
    }

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.push(asset);
        self.refilter();
    }

    /// Filter by category; `None` (or "All") shows every category
    pub fn filter_by_category(&mut self, category: Option<&str>) {
        self.selected_category = category
            .filter(|c| !c.is_empty() && *c != "All")
            .map(str::to_string);
        self.refilter();
    }

    pub fn search(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.refilter();
    }

    /// Rebuild the filtered view from the current assets
    pub fn refilter(&mut self) {
        let category = self.selected_category.as_deref();
        let query = self.search_query.trim();
        self.filtered = self
            .assets
            .iter()
            .filter(|a| category.is_none_or(|c| a.category == c))
            .filter(|a| query.is_empty() || a.matches_query(query))
            .cloned()
            .collect();
    }
}
