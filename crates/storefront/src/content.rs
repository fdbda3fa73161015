//! Static site content: landing and about page copy, plus the seed catalog.
//!
//! Everything here is compiled in. A different marketplace catalog can be
//! loaded at startup via `STOREFRONT_CATALOG_PATH`.

use std::path::Path;

use agritech_core::{Catalog, CatalogError, Price, Product, ProductCategory, ProductId};

/// Placeholder image for products without artwork.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.svg";

/// A titled card with a short description (services, values).
#[derive(Debug, Clone, Copy)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub link: Option<&'static str>,
}

/// A customer quote on the landing page.
#[derive(Debug, Clone, Copy)]
pub struct Testimonial {
    pub quote: &'static str,
    pub name: &'static str,
    pub location: &'static str,
}

/// A featured item on the landing page (not sold through the marketplace).
#[derive(Debug, Clone, Copy)]
pub struct Showcase {
    pub name: &'static str,
    pub description: &'static str,
    pub price_cents: u32,
}

/// Team member on the about page.
#[derive(Debug, Clone, Copy)]
pub struct TeamMember {
    pub name: &'static str,
    pub position: &'static str,
    pub description: &'static str,
}

/// Headline figure on the about page.
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    pub number: &'static str,
    pub title: &'static str,
}

/// Company contact details shown in the landing page footer block.
#[derive(Debug, Clone, Copy)]
pub struct ContactDetails {
    pub address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
}

pub const SERVICES: &[Feature] = &[
    Feature {
        title: "Crop Disease Detection",
        description: "AI-powered detection system to identify and treat crop diseases early",
        link: Some("/products#disease-detection"),
    },
    Feature {
        title: "Yield Prediction",
        description: "Advanced analytics to predict and optimize crop yields",
        link: Some("/products#yield-prediction"),
    },
    Feature {
        title: "Agricultural Products",
        description: "Premium tools, fertilizers, and seeds for modern farming",
        link: Some("/marketplace"),
    },
];

pub const SHOWCASE: &[Showcase] = &[
    Showcase {
        name: "Smart Soil Sensor",
        description: "Real-time soil health monitoring device",
        price_cents: 19_999,
    },
    Showcase {
        name: "Organic Fertilizer",
        description: "Premium organic fertilizer for all crops",
        price_cents: 4_999,
    },
    Showcase {
        name: "Drone Sprayer",
        description: "Automated crop spraying drone",
        price_cents: 99_999,
    },
];

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        quote: "The crop disease detection system saved my entire harvest last season.",
        name: "John Smith",
        location: "Iowa, USA",
    },
    Testimonial {
        quote: "Yield prediction helped me optimize my planting schedule perfectly.",
        name: "Maria Garcia",
        location: "California, USA",
    },
    Testimonial {
        quote: "Their products are top quality and the support is exceptional.",
        name: "David Chen",
        location: "Texas, USA",
    },
];

pub const CONTACT: ContactDetails = ContactDetails {
    address: "123 Farm Road, Agritown, AT 12345",
    phone: "+1 (234) 567-8900",
    email: "contact@agritech.com",
};

pub const VISION: &str = "To revolutionize agriculture through technology, making sustainable \
    farming accessible to everyone while ensuring food security for future generations.";

pub const MISSION: &str = "To empower farmers with innovative solutions that increase \
    productivity, reduce environmental impact, and create a more sustainable agricultural \
    ecosystem.";

pub const VALUES: &[Feature] = &[
    Feature {
        title: "Innovation",
        description: "Constantly pushing boundaries to develop cutting-edge agricultural solutions",
        link: None,
    },
    Feature {
        title: "Sustainability",
        description: "Committed to environmental stewardship and sustainable farming practices",
        link: None,
    },
    Feature {
        title: "Community",
        description: "Building strong relationships with farmers and agricultural communities",
        link: None,
    },
];

pub const TEAM: &[TeamMember] = &[
    TeamMember {
        name: "Dr. Sarah Johnson",
        position: "Chief Executive Officer",
        description: "20+ years experience in AgriTech innovation",
    },
    TeamMember {
        name: "Michael Chen",
        position: "Chief Technology Officer",
        description: "Leading our AI and machine learning initiatives",
    },
    TeamMember {
        name: "Emma Rodriguez",
        position: "Head of Sustainability",
        description: "Expert in sustainable farming practices",
    },
];

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        number: "1M+",
        title: "Farmers Supported",
    },
    Achievement {
        number: "50+",
        title: "Countries Reached",
    },
    Achievement {
        number: "100+",
        title: "Research Papers",
    },
    Achievement {
        number: "25+",
        title: "Industry Awards",
    },
];

/// (id, name, description, cents, category, stock)
const SEED_PRODUCTS: &[(&str, &str, &str, u32, ProductCategory, u32)] = &[
    (
        "1",
        "Premium Garden Tools Set",
        "Complete set of essential gardening tools including shovel, rake, and pruning shears",
        8_999,
        ProductCategory::Tools,
        50,
    ),
    (
        "2",
        "Organic Tomato Seeds",
        "High-yield, disease-resistant tomato seeds perfect for home gardens",
        499,
        ProductCategory::Seeds,
        100,
    ),
    (
        "3",
        "Natural Fertilizer",
        "Eco-friendly, balanced NPK fertilizer for all types of crops",
        2_999,
        ProductCategory::Fertilizers,
        75,
    ),
    (
        "4",
        "Neem Oil Pesticide",
        "Organic pest control solution safe for edible crops",
        1_999,
        ProductCategory::Pesticides,
        60,
    ),
    (
        "5",
        "Herb Garden Starter Kit",
        "Complete kit with seeds and supplies to start your herb garden",
        3_499,
        ProductCategory::Seeds,
        40,
    ),
    (
        "6",
        "Professional Pruning Shears",
        "High-quality steel pruning shears for precise cuts",
        4_599,
        ProductCategory::Tools,
        30,
    ),
];

/// The built-in marketplace catalog.
#[must_use]
pub fn seed_catalog() -> Catalog {
    let products = SEED_PRODUCTS
        .iter()
        .map(|&(id, name, description, cents, category, stock)| Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::from_cents(cents),
            image: PLACEHOLDER_IMAGE.to_owned(),
            category,
            stock,
        })
        .collect();

    // Seed ids are distinct literals.
    Catalog::new(products).unwrap_or_default()
}

/// Errors loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Load the catalog from `path`, or the seed catalog when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let Some(path) = path else {
        return Ok(seed_catalog());
    };

    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = Catalog::from_json(&json)?;
    tracing::info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_has_six_products() {
        let catalog = seed_catalog();
        assert_eq!(catalog.len(), 6);

        let tools = catalog.get(&ProductId::new("1")).unwrap();
        assert_eq!(tools.price, Price::from_cents(8999));
        assert_eq!(catalog.in_category(ProductCategory::Seeds).count(), 2);
    }

    #[test]
    fn test_load_catalog_defaults_to_seed() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog.len(), seed_catalog().len());
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let result = load_catalog(Some(Path::new("/nonexistent/catalog.json")));
        assert!(matches!(result, Err(CatalogLoadError::Io { .. })));
    }
}
