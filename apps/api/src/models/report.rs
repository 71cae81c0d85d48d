use serde::{Deserialize, Serialize};

/// Sentinel written by the extractor (and shown by the renderer) when a value
/// is absent from the source documents.
pub const UNSPECIFIED: &str = "Not specified";

/// The candidate record produced by extraction and mutated through the edit session.
///
/// Every collection deserializes to an empty `Vec` when missing or `null`, so the
/// renderer and exporters never see an undefined list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default, deserialize_with = "nullable")]
    pub candidate_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub employer: String,
    #[serde(default, deserialize_with = "nullable")]
    pub designation: String,
    #[serde(default, deserialize_with = "nullable")]
    pub location: String,
    #[serde(default, deserialize_with = "nullable")]
    pub industry: String,
    #[serde(default, deserialize_with = "nullable")]
    pub function: String,
    /// Languages spoken, as a single free-text value.
    #[serde(default, deserialize_with = "nullable")]
    pub language: String,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: String,
    #[serde(default, deserialize_with = "nullable")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "nullable")]
    pub certifications: Vec<Certification>,
    #[serde(default, deserialize_with = "nullable")]
    pub professional_experience: Vec<ProfessionalExperience>,
    #[serde(default, deserialize_with = "nullable")]
    pub functional_evaluation: Vec<QuestionCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "nullable")]
    pub institution: String,
    #[serde(default, deserialize_with = "nullable")]
    pub degree: String,
    #[serde(default, deserialize_with = "nullable")]
    pub field_of_study: String,
    #[serde(default, deserialize_with = "nullable")]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub issuing_organization: String,
    #[serde(default, deserialize_with = "nullable")]
    pub year: String,
}

/// One work-experience entry. Rendered as a single block that is never split
/// across a page boundary; `details` order is bullet order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalExperience {
    #[serde(default, deserialize_with = "nullable")]
    pub company: String,
    #[serde(default, deserialize_with = "nullable")]
    pub position: String,
    #[serde(default, deserialize_with = "nullable")]
    pub duration: String,
    #[serde(default, deserialize_with = "nullable")]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionAndAnswer {
    #[serde(default, deserialize_with = "nullable")]
    pub question: String,
    #[serde(default, deserialize_with = "nullable")]
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionCategory {
    #[serde(default, deserialize_with = "nullable")]
    pub category: String,
    #[serde(default, deserialize_with = "nullable")]
    pub questions: Vec<QuestionAndAnswer>,
}

impl Education {
    /// Item inserted by the "Add Education" affordance.
    pub fn placeholder() -> Self {
        Self {
            institution: "Institution Name".to_string(),
            degree: "Degree".to_string(),
            field_of_study: String::new(),
            year: "Year".to_string(),
        }
    }
}

impl Certification {
    pub fn placeholder() -> Self {
        Self {
            name: "Certification Name".to_string(),
            issuing_organization: String::new(),
            year: "Year".to_string(),
        }
    }
}

impl ProfessionalExperience {
    pub fn placeholder() -> Self {
        Self {
            company: "Company".to_string(),
            position: "Position".to_string(),
            duration: "Date Range".to_string(),
            details: vec!["Responsibility".to_string()],
        }
    }
}

impl Report {
    /// Candidate name for artifact file names, or `fallback` when blank.
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        let name = self.candidate_name.trim();
        if name.is_empty() {
            fallback
        } else {
            name
        }
    }
}

/// Treats an explicit JSON `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let report: Report =
            serde_json::from_str(r#"{"candidateName": "Ada", "professionalExperience": []}"#)
                .unwrap();
        assert!(report.education.is_empty());
        assert!(report.certifications.is_empty());
        assert!(report.functional_evaluation.is_empty());
        assert_eq!(report.summary, "");
    }

    #[test]
    fn test_null_collections_default_to_empty() {
        let report: Report = serde_json::from_str(
            r#"{"candidateName": "Ada", "education": null, "certifications": null,
                "professionalExperience": [{"company": "Acme", "details": null}]}"#,
        )
        .unwrap();
        assert!(report.education.is_empty());
        assert!(report.certifications.is_empty());
        assert_eq!(report.professional_experience.len(), 1);
        assert!(report.professional_experience[0].details.is_empty());
    }

    #[test]
    fn test_camel_case_wire_names() {
        let report = Report {
            candidate_name: "Ada".to_string(),
            education: vec![Education {
                field_of_study: "Logistics".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["candidateName"], "Ada");
        assert_eq!(json["education"][0]["fieldOfStudy"], "Logistics");
        assert!(json["professionalExperience"].as_array().unwrap().is_empty());
        assert!(json["functionalEvaluation"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_display_name_fallback() {
        let mut report = Report::default();
        assert_eq!(report.display_name("candidate"), "candidate");
        report.candidate_name = "  ".to_string();
        assert_eq!(report.display_name("Candidate"), "Candidate");
        report.candidate_name = "Ada Lovelace".to_string();
        assert_eq!(report.display_name("candidate"), "Ada Lovelace");
    }
}
