//! Read-only brand/model/trim reference data.
//!
//! The catalog is injected wherever brand/model/trim validation is needed,
//! so callers can swap the seeded in-memory tree for any other source
//! without touching the engines.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trim {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub trims: Vec<Trim>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub models: Vec<Model>,
}

pub trait CatalogProvider: Send + Sync {
    fn brands(&self) -> &[Brand];

    fn governorates(&self) -> &[String];

    /// Resolves a brand/model/trim chain by id or display name,
    /// case-insensitively.
    fn resolve(&self, brand: &str, model: &str, trim: &str) -> Option<(&Brand, &Model, &Trim)> {
        let brand = self
            .brands()
            .iter()
            .find(|candidate| name_matches(&candidate.id, &candidate.name, brand))?;
        let model = brand
            .models
            .iter()
            .find(|candidate| name_matches(&candidate.id, &candidate.name, model))?;
        let trim = model
            .trims
            .iter()
            .find(|candidate| name_matches(&candidate.id, &candidate.name, trim))?;
        Some((brand, model, trim))
    }
}

fn name_matches(id: &str, name: &str, wanted: &str) -> bool {
    id.eq_ignore_ascii_case(wanted.trim()) || name.eq_ignore_ascii_case(wanted.trim())
}

#[derive(Clone, Debug)]
pub struct InMemoryCatalog {
    brands: Vec<Brand>,
    governorates: Vec<String>,
}

impl CatalogProvider for InMemoryCatalog {
    fn brands(&self) -> &[Brand] {
        &self.brands
    }

    fn governorates(&self) -> &[String] {
        &self.governorates
    }
}

impl InMemoryCatalog {
    pub fn new(brands: Vec<Brand>, governorates: Vec<String>) -> Self {
        Self { brands, governorates }
    }

    /// The marketplace launch catalog.
    pub fn seeded() -> Self {
        Self::new(seed_brands(), seed_governorates())
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

fn trim(id: &str, name: &str) -> Trim {
    Trim { id: id.to_string(), name: name.to_string() }
}

fn model(id: &str, name: &str, trims: Vec<Trim>) -> Model {
    Model { id: id.to_string(), name: name.to_string(), trims }
}

fn seed_brands() -> Vec<Brand> {
    vec![
        Brand {
            id: "toyota".to_string(),
            name: "Toyota".to_string(),
            models: vec![
                model(
                    "land-cruiser",
                    "Land Cruiser",
                    vec![trim("gx", "GX"), trim("gxr", "GXR"), trim("vx", "VX"), trim("vxr", "VXR")],
                ),
                model(
                    "camry",
                    "Camry",
                    vec![trim("le", "LE"), trim("se", "SE"), trim("xle", "XLE"), trim("xse", "XSE")],
                ),
            ],
        },
        Brand {
            id: "bmw".to_string(),
            name: "BMW".to_string(),
            models: vec![
                model(
                    "x6",
                    "X6",
                    vec![
                        trim("xdrive40i", "xDrive40i"),
                        trim("m60i", "M60i"),
                        trim("m-competition", "M Competition"),
                    ],
                ),
                model("530i", "530i", vec![trim("standard", "Standard"), trim("msport", "M Sport")]),
            ],
        },
        Brand {
            id: "kia".to_string(),
            name: "Kia".to_string(),
            models: vec![
                model(
                    "sportage",
                    "Sportage",
                    vec![trim("lx", "LX"), trim("ex", "EX"), trim("sx", "SX")],
                ),
                model("sorento", "Sorento", vec![trim("l", "L"), trim("lx", "LX"), trim("s", "S")]),
            ],
        },
    ]
}

fn seed_governorates() -> Vec<String> {
    ["Baghdad", "Basra", "Erbil", "Sulaymaniyah", "Duhok", "Nineveh", "Anbar", "Diyala"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CatalogProvider, InMemoryCatalog};

    #[test]
    fn seeded_catalog_exposes_brand_tree() {
        let catalog = InMemoryCatalog::seeded();
        assert_eq!(catalog.brands().len(), 3);
        assert_eq!(catalog.governorates().len(), 8);
    }

    #[test]
    fn resolves_chain_by_id() {
        let catalog = InMemoryCatalog::seeded();
        let (brand, model, trim) =
            catalog.resolve("toyota", "land-cruiser", "vxr").expect("chain should resolve");
        assert_eq!(brand.name, "Toyota");
        assert_eq!(model.name, "Land Cruiser");
        assert_eq!(trim.name, "VXR");
    }

    #[test]
    fn resolves_chain_by_display_name_case_insensitively() {
        let catalog = InMemoryCatalog::seeded();
        assert!(catalog.resolve("BMW", "x6", "m60i").is_some());
        assert!(catalog.resolve("Kia", "Sportage", "EX").is_some());
    }

    #[test]
    fn unknown_trim_does_not_resolve() {
        let catalog = InMemoryCatalog::seeded();
        assert!(catalog.resolve("toyota", "camry", "vxr").is_none());
        assert!(catalog.resolve("lada", "niva", "base").is_none());
    }
}
