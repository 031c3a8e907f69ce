//! Fixed content for the About page. No inputs, no persistence.

pub struct AboutMeta {
    pub title: &'static str,
    pub description: &'static str,
}

pub struct AboutHero {
    pub heading: &'static str,
    pub subheading: &'static str,
    pub cta_text: &'static str,
}

pub struct PlatformStat {
    pub value: &'static str,
    pub label: &'static str,
}

pub struct PlatformFeature {
    pub title: &'static str,
    pub description: &'static str,
}

pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub bio: &'static str,
}

pub struct TechnologyItem {
    pub name: &'static str,
}

pub struct AboutView {
    pub meta: AboutMeta,
    pub hero: AboutHero,
    pub stats: Vec<PlatformStat>,
    pub features: Vec<PlatformFeature>,
    pub team: Vec<TeamMember>,
    pub technology: Vec<TechnologyItem>,
}

/// Assembles the hardcoded About page payload. Identical on every call.
pub fn about_view() -> AboutView {
    AboutView {
        meta: AboutMeta {
            title: "About Pluma | Modern Blogging Platform",
            description: "Discover Pluma - a feature-rich blogging platform. \
                          Learn about our mission, technology stack, and development team.",
        },
        hero: AboutHero {
            heading: "Empowering Content Creators Worldwide",
            subheading: "A Modern Self-Hosted Blogging Platform",
            cta_text: "Start Blogging Today",
        },
        stats: vec![
            PlatformStat {
                value: "10K+",
                label: "Monthly Readers",
            },
            PlatformStat {
                value: "95%",
                label: "User Satisfaction",
            },
            PlatformStat {
                value: "24/7",
                label: "Uptime",
            },
            PlatformStat {
                value: "100%",
                label: "Open Source",
            },
        ],
        features: vec![
            PlatformFeature {
                title: "Modern Architecture",
                description: "Built with axum and PostgreSQL",
            },
            PlatformFeature {
                title: "Responsive Design",
                description: "Mobile-first, server-rendered pages",
            },
            PlatformFeature {
                title: "Secure Platform",
                description: "HTTPS enforcement and XSS-safe templates",
            },
            PlatformFeature {
                title: "SEO Optimized",
                description: "Meta tags on every rendered page",
            },
        ],
        team: vec![
            TeamMember {
                name: "Alex Chen",
                role: "Lead Developer",
                bio: "Full-stack developer with 8+ years of backend experience",
            },
            TeamMember {
                name: "Maria Gonzalez",
                role: "UX Designer",
                bio: "Specialist in user-centered design systems",
            },
        ],
        technology: vec![
            TechnologyItem { name: "Rust" },
            TechnologyItem { name: "axum" },
            TechnologyItem { name: "PostgreSQL" },
            TechnologyItem { name: "askama" },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_payload_is_stable() {
        let view = about_view();
        assert_eq!(view.stats.len(), 4);
        assert_eq!(view.features.len(), 4);
        assert_eq!(view.team.len(), 2);
        assert_eq!(view.technology.len(), 4);
        assert_eq!(view.hero.heading, about_view().hero.heading);
    }
}
