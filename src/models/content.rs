//! The portfolio document: one JSON object owning every named list and
//! sub-object the front end renders. Unknown wire fields are dropped on the
//! way through, and field order is fixed by the struct definitions, so a
//! load-save round trip is byte-stable.

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDocument {
    pub about: About,
    pub services: Vec<ServiceItem>,
    pub projects: Vec<Project>,
    pub testimonials: Vec<Testimonial>,
    pub certificates: Vec<Certificate>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<Skill>,
    pub site_settings: SiteSettings,
    pub contact_info: ContactInfo,
    pub social_media: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub name: String,
    pub title: String,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceItem {
    pub icon: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub image: String,
    pub alt: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub avatar: String,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certificate {
    pub logo: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub school: String,
    pub years: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub years: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: String,
    pub value: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub author: String,
    pub site_url: String,
    pub avatar: String,
    pub favicon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub icon: String,
}

impl ContentDocument {
    /// Validate an incoming document before it replaces the stored one.
    pub fn validate(&self) -> Result<()> {
        if self.about.name.trim().is_empty() {
            anyhow::bail!("about.name is required");
        }
        if self.about.title.trim().is_empty() {
            anyhow::bail!("about.title is required");
        }

        for (index, service) in self.services.iter().enumerate() {
            if service.title.trim().is_empty() {
                anyhow::bail!("services[{}].title is required", index);
            }
            if service.text.trim().is_empty() {
                anyhow::bail!("services[{}].text is required", index);
            }
        }

        for (index, project) in self.projects.iter().enumerate() {
            if project.title.trim().is_empty() {
                anyhow::bail!("projects[{}].title is required", index);
            }
        }

        for (index, testimonial) in self.testimonials.iter().enumerate() {
            if testimonial.name.trim().is_empty() {
                anyhow::bail!("testimonials[{}].name is required", index);
            }
            if testimonial.text.trim().is_empty() {
                anyhow::bail!("testimonials[{}].text is required", index);
            }
        }

        for (index, entry) in self.education.iter().enumerate() {
            if entry.school.trim().is_empty() {
                anyhow::bail!("education[{}].school is required", index);
            }
        }

        for (index, entry) in self.experience.iter().enumerate() {
            if entry.title.trim().is_empty() {
                anyhow::bail!("experience[{}].title is required", index);
            }
        }

        for (index, skill) in self.skills.iter().enumerate() {
            if skill.name.trim().is_empty() {
                anyhow::bail!("skills[{}].name is required", index);
            }
            if skill.value > 100 {
                anyhow::bail!("skills[{}].value must be between 0 and 100", index);
            }
        }

        for (index, link) in self.social_media.iter().enumerate() {
            if link.platform.trim().is_empty() {
                anyhow::bail!("socialMedia[{}].platform is required", index);
            }
            if link.url.trim().is_empty() {
                anyhow::bail!("socialMedia[{}].url is required", index);
            }
        }

        if !self.contact_info.email.trim().is_empty()
            && !self.contact_info.email.contains('@')
        {
            anyhow::bail!("contactInfo.email must be a valid email address");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_document() -> ContentDocument {
        ContentDocument {
            about: About {
                name: "Ada".to_string(),
                title: "Engineer".to_string(),
                description: vec!["Hello".to_string()],
            },
            ..Default::default()
        }
    }

    #[test]
    fn minimal_document_is_valid() {
        assert!(minimal_document().validate().is_ok());
    }

    #[test]
    fn missing_about_name_is_rejected() {
        let mut doc = minimal_document();
        doc.about.name = String::new();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn skill_value_over_100_is_rejected() {
        let mut doc = minimal_document();
        doc.skills.push(Skill {
            name: "Rust".to_string(),
            value: 101,
        });
        let err = doc.validate().unwrap_err().to_string();
        assert!(err.contains("between 0 and 100"));
    }

    #[test]
    fn bad_contact_email_is_rejected() {
        let mut doc = minimal_document();
        doc.contact_info.email = "not-an-email".to_string();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn unknown_fields_are_dropped_on_round_trip() {
        let raw = r#"{
            "about": {"name": "Ada", "title": "Engineer", "description": []},
            "legacyField": {"anything": true}
        }"#;
        let doc: ContentDocument = serde_json::from_str(raw).unwrap();
        let reserialized = serde_json::to_string(&doc).unwrap();
        assert!(!reserialized.contains("legacyField"));
    }

    #[test]
    fn wire_names_are_camel_case() {
        let doc = minimal_document();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("siteSettings").is_some());
        assert!(json.get("contactInfo").is_some());
        assert!(json.get("socialMedia").is_some());
    }

    #[test]
    fn project_type_field_round_trips() {
        let raw = r#"{"title": "App", "type": "web"}"#;
        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.kind, "web");
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["type"], "web");
    }
}
