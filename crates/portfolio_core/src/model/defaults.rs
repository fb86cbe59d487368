//! Built-in content seeded when no stored content exists.
//!
//! These records are shown as-is and are never written back to the remote
//! store as creations.

use super::certificate::Certificate;
use super::profile::Profile;
use super::project::Project;
use super::ResourceId;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn default_projects() -> Vec<Project> {
    vec![
        Project {
            id: ResourceId::from(4),
            title: "Portfolio Website".to_string(),
            description: "Personal site with an admin mode for editing projects and certificates."
                .to_string(),
            long_description: None,
            technologies: strings(&["React", "TypeScript", "Tailwind CSS", "Supabase"]),
            category: "web".to_string(),
            image: None,
            github_url: Some("https://github.com/example/portfolio".to_string()),
            live_url: None,
            featured: true,
            date: Some("2024-06-01".to_string()),
        },
        Project {
            id: ResourceId::from(3),
            title: "Task Manager API".to_string(),
            description: "REST API for team task boards with role-based access.".to_string(),
            long_description: None,
            technologies: strings(&["Node.js", "Express", "PostgreSQL"]),
            category: "backend".to_string(),
            image: None,
            github_url: Some("https://github.com/example/task-api".to_string()),
            live_url: None,
            featured: false,
            date: Some("2024-02-15".to_string()),
        },
        Project {
            id: ResourceId::from(2),
            title: "Weather Dashboard".to_string(),
            description: "Forecast dashboard with location search and saved cities.".to_string(),
            long_description: None,
            technologies: strings(&["JavaScript", "Chart.js", "OpenWeather API"]),
            category: "web".to_string(),
            image: None,
            github_url: None,
            live_url: Some("https://weather.example.dev".to_string()),
            featured: true,
            date: Some("2023-09-10".to_string()),
        },
        Project {
            id: ResourceId::from(1),
            title: "Expense Tracker".to_string(),
            description: "Mobile-first budgeting app with category reports.".to_string(),
            long_description: None,
            technologies: strings(&["React Native", "Firebase"]),
            category: "mobile".to_string(),
            image: None,
            github_url: None,
            live_url: None,
            featured: false,
            date: Some("2023-04-20".to_string()),
        },
    ]
}

pub fn default_certificates() -> Vec<Certificate> {
    vec![
        Certificate {
            id: ResourceId::from(1),
            title: "Full-Stack Web Development".to_string(),
            issuer: "Meta".to_string(),
            platform: "Coursera".to_string(),
            date_issued: "2023-08-12".to_string(),
            credential_id: None,
            verify_url: None,
            badge_url: None,
            skills: strings(&["React", "Node.js", "REST APIs"]),
            description: Some("Front-end and back-end fundamentals.".to_string()),
            category: Some("development".to_string()),
            featured: true,
        },
        Certificate {
            id: ResourceId::from(2),
            title: "Cloud Practitioner".to_string(),
            issuer: "Amazon Web Services".to_string(),
            platform: "AWS Training".to_string(),
            date_issued: "2024-01-30".to_string(),
            credential_id: None,
            verify_url: None,
            badge_url: None,
            skills: strings(&["AWS", "Cloud Architecture"]),
            description: None,
            category: Some("cloud".to_string()),
            featured: false,
        },
        Certificate {
            id: ResourceId::from(3),
            title: "Responsive Web Design".to_string(),
            issuer: "freeCodeCamp".to_string(),
            platform: "freeCodeCamp".to_string(),
            date_issued: "2022-11-05".to_string(),
            credential_id: None,
            verify_url: None,
            badge_url: None,
            skills: strings(&["HTML", "CSS", "Accessibility"]),
            description: None,
            category: Some("development".to_string()),
            featured: false,
        },
    ]
}

pub fn default_profile() -> Profile {
    Profile {
        name: "Alex Rivera".to_string(),
        title: "Full-Stack Developer".to_string(),
        bio: "I build web applications end to end, from data models to polished interfaces."
            .to_string(),
        email: Some("hello@example.dev".to_string()),
        phone: None,
        location: Some("Remote".to_string()),
        profile_picture: None,
        resume_url: None,
        github_url: Some("https://github.com/example".to_string()),
        linkedin_url: None,
        twitter_url: None,
        skills: strings(&["TypeScript", "React", "Node.js", "SQL"]),
    }
}

#[cfg(test)]
mod tests {
    use super::{default_certificates, default_projects};
    use std::collections::HashSet;

    #[test]
    fn default_ids_are_unique() {
        let project_ids: HashSet<_> = default_projects().into_iter().map(|p| p.id).collect();
        assert_eq!(project_ids.len(), default_projects().len());
        let certificate_ids: HashSet<_> =
            default_certificates().into_iter().map(|c| c.id).collect();
        assert_eq!(certificate_ids.len(), default_certificates().len());
    }
}
