//! Static content page route handlers.
//!
//! Landing and about pages. All copy comes from [`crate::content`].

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::content::{
    ACHIEVEMENTS, Achievement, CONTACT, ContactDetails, Feature, MISSION, SERVICES, SHOWCASE,
    TEAM, TESTIMONIALS, TeamMember, Testimonial, VALUES, VISION,
};
use crate::filters;

/// Featured product card on the landing page.
#[derive(Clone)]
pub struct ShowcaseView {
    pub name: &'static str,
    pub description: &'static str,
    pub price: String,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub services: &'static [Feature],
    pub showcase: Vec<ShowcaseView>,
    pub testimonials: &'static [Testimonial],
    pub contact: ContactDetails,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub vision: &'static str,
    pub mission: &'static str,
    pub values: &'static [Feature],
    pub team: &'static [TeamMember],
    pub achievements: &'static [Achievement],
}

/// Display the landing page.
#[instrument]
pub async fn home() -> impl IntoResponse {
    HomeTemplate {
        services: SERVICES,
        showcase: SHOWCASE
            .iter()
            .map(|item| ShowcaseView {
                name: item.name,
                description: item.description,
                price: agritech_core::Price::from_cents(item.price_cents).display(),
            })
            .collect(),
        testimonials: TESTIMONIALS,
        contact: CONTACT,
    }
}

/// Display the about page.
#[instrument]
pub async fn about() -> impl IntoResponse {
    AboutTemplate {
        vision: VISION,
        mission: MISSION,
        values: VALUES,
        team: TEAM,
        achievements: ACHIEVEMENTS,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_home_lists_services_and_showcase() {
        let html = HomeTemplate {
            services: SERVICES,
            showcase: vec![ShowcaseView {
                name: "Drone Sprayer",
                description: "Automated crop spraying drone",
                price: "$999.99".to_string(),
            }],
            testimonials: TESTIMONIALS,
            contact: CONTACT,
        }
        .render()
        .unwrap();

        assert!(html.contains("Crop Disease Detection"));
        assert!(html.contains("$999.99"));
        assert!(html.contains(CONTACT.email));
    }

    #[test]
    fn test_about_lists_team() {
        let html = AboutTemplate {
            vision: VISION,
            mission: MISSION,
            values: VALUES,
            team: TEAM,
            achievements: ACHIEVEMENTS,
        }
        .render()
        .unwrap();

        assert!(html.contains("Dr. Sarah Johnson"));
        assert!(html.contains("Farmers Supported"));
    }
}
