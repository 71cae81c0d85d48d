//! Field, list and nested edits applied to a draft copy of the report.
//!
//! These functions mutate the draft they are handed; the session clones the
//! current snapshot first, so callers never observe a partially applied edit.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    Certification, Education, ProfessionalExperience, QuestionCategory, Report,
};

/// Default text of a bullet added through "Add Detail".
pub const NEW_DETAIL: &str = "New detail";

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("No report is loaded; upload a resume first")]
    NoReport,

    #[error("{list} has no item at index {index} (length {len})")]
    IndexOutOfRange {
        list: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Item does not belong to {0}")]
    ItemMismatch(&'static str),

    #[error("Invalid {list} item: {message}")]
    InvalidItem { list: &'static str, message: String },

    #[error("{0} has no placeholder item; supply the item explicitly")]
    NoPlaceholder(&'static str),
}

/// The free-text scalar fields of a report, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarField {
    CandidateName,
    Employer,
    Designation,
    Location,
    Industry,
    Function,
    Language,
    Summary,
}

/// The four ordered collections of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportList {
    Education,
    Certifications,
    ProfessionalExperience,
    FunctionalEvaluation,
}

impl ReportList {
    pub fn name(self) -> &'static str {
        match self {
            ReportList::Education => "education",
            ReportList::Certifications => "certifications",
            ReportList::ProfessionalExperience => "professionalExperience",
            ReportList::FunctionalEvaluation => "functionalEvaluation",
        }
    }

    fn len(self, report: &Report) -> usize {
        match self {
            ReportList::Education => report.education.len(),
            ReportList::Certifications => report.certifications.len(),
            ReportList::ProfessionalExperience => report.professional_experience.len(),
            ReportList::FunctionalEvaluation => report.functional_evaluation.len(),
        }
    }
}

/// A typed element of one of the report's lists.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    Education(Education),
    Certification(Certification),
    Experience(ProfessionalExperience),
    Category(QuestionCategory),
}

impl ListItem {
    pub fn list(&self) -> ReportList {
        match self {
            ListItem::Education(_) => ReportList::Education,
            ListItem::Certification(_) => ReportList::Certifications,
            ListItem::Experience(_) => ReportList::ProfessionalExperience,
            ListItem::Category(_) => ReportList::FunctionalEvaluation,
        }
    }

    /// Decodes a JSON body as an item of `list`.
    pub fn from_json(list: ReportList, value: Value) -> Result<Self, EditError> {
        let invalid = |e: serde_json::Error| EditError::InvalidItem {
            list: list.name(),
            message: e.to_string(),
        };
        Ok(match list {
            ReportList::Education => ListItem::Education(serde_json::from_value(value).map_err(invalid)?),
            ReportList::Certifications => {
                ListItem::Certification(serde_json::from_value(value).map_err(invalid)?)
            }
            ReportList::ProfessionalExperience => {
                ListItem::Experience(serde_json::from_value(value).map_err(invalid)?)
            }
            ReportList::FunctionalEvaluation => {
                ListItem::Category(serde_json::from_value(value).map_err(invalid)?)
            }
        })
    }

    /// The item an "Add …" affordance inserts. Evaluation categories come from a
    /// fixed questionnaire and have none.
    pub fn placeholder(list: ReportList) -> Result<Self, EditError> {
        match list {
            ReportList::Education => Ok(ListItem::Education(Education::placeholder())),
            ReportList::Certifications => Ok(ListItem::Certification(Certification::placeholder())),
            ReportList::ProfessionalExperience => {
                Ok(ListItem::Experience(ProfessionalExperience::placeholder()))
            }
            ReportList::FunctionalEvaluation => Err(EditError::NoPlaceholder(list.name())),
        }
    }
}

pub fn set_field(report: &mut Report, field: ScalarField, value: String) {
    let slot = match field {
        ScalarField::CandidateName => &mut report.candidate_name,
        ScalarField::Employer => &mut report.employer,
        ScalarField::Designation => &mut report.designation,
        ScalarField::Location => &mut report.location,
        ScalarField::Industry => &mut report.industry,
        ScalarField::Function => &mut report.function,
        ScalarField::Language => &mut report.language,
        ScalarField::Summary => &mut report.summary,
    };
    *slot = value;
}

/// Replaces the item at `index`, or appends when `index` equals the list length.
pub fn upsert_list_item(
    report: &mut Report,
    list: ReportList,
    index: usize,
    item: ListItem,
) -> Result<(), EditError> {
    if item.list() != list {
        return Err(EditError::ItemMismatch(list.name()));
    }
    let len = list.len(report);
    if index > len {
        return Err(EditError::IndexOutOfRange {
            list: list.name(),
            index,
            len,
        });
    }
    match item {
        ListItem::Education(v) => put(&mut report.education, index, v),
        ListItem::Certification(v) => put(&mut report.certifications, index, v),
        ListItem::Experience(v) => put(&mut report.professional_experience, index, v),
        ListItem::Category(v) => put(&mut report.functional_evaluation, index, v),
    }
    Ok(())
}

pub fn append_list_item(report: &mut Report, item: ListItem) {
    match item {
        ListItem::Education(v) => report.education.push(v),
        ListItem::Certification(v) => report.certifications.push(v),
        ListItem::Experience(v) => report.professional_experience.push(v),
        ListItem::Category(v) => report.functional_evaluation.push(v),
    }
}

pub fn remove_list_item(report: &mut Report, list: ReportList, index: usize) -> Result<(), EditError> {
    let len = list.len(report);
    if index >= len {
        return Err(EditError::IndexOutOfRange {
            list: list.name(),
            index,
            len,
        });
    }
    match list {
        ReportList::Education => {
            report.education.remove(index);
        }
        ReportList::Certifications => {
            report.certifications.remove(index);
        }
        ReportList::ProfessionalExperience => {
            report.professional_experience.remove(index);
        }
        ReportList::FunctionalEvaluation => {
            report.functional_evaluation.remove(index);
        }
    }
    Ok(())
}

pub fn set_detail(
    report: &mut Report,
    experience: usize,
    detail: usize,
    value: String,
) -> Result<(), EditError> {
    let details = details_mut(report, experience)?;
    let len = details.len();
    let slot = details.get_mut(detail).ok_or(EditError::IndexOutOfRange {
        list: "details",
        index: detail,
        len,
    })?;
    *slot = value;
    Ok(())
}

pub fn append_detail(report: &mut Report, experience: usize, value: String) -> Result<(), EditError> {
    details_mut(report, experience)?.push(value);
    Ok(())
}

pub fn remove_detail(report: &mut Report, experience: usize, detail: usize) -> Result<(), EditError> {
    let details = details_mut(report, experience)?;
    if detail >= details.len() {
        return Err(EditError::IndexOutOfRange {
            list: "details",
            index: detail,
            len: details.len(),
        });
    }
    details.remove(detail);
    Ok(())
}

pub fn set_answer(
    report: &mut Report,
    category: usize,
    question: usize,
    answer: String,
) -> Result<(), EditError> {
    let len = report.functional_evaluation.len();
    let cat = report
        .functional_evaluation
        .get_mut(category)
        .ok_or(EditError::IndexOutOfRange {
            list: "functionalEvaluation",
            index: category,
            len,
        })?;
    let len = cat.questions.len();
    let qa = cat.questions.get_mut(question).ok_or(EditError::IndexOutOfRange {
        list: "questions",
        index: question,
        len,
    })?;
    qa.answer = answer;
    Ok(())
}

fn details_mut(report: &mut Report, experience: usize) -> Result<&mut Vec<String>, EditError> {
    let len = report.professional_experience.len();
    report
        .professional_experience
        .get_mut(experience)
        .map(|exp| &mut exp.details)
        .ok_or(EditError::IndexOutOfRange {
            list: "professionalExperience",
            index: experience,
            len,
        })
}

fn put<T>(items: &mut Vec<T>, index: usize, item: T) {
    if index == items.len() {
        items.push(item);
    } else {
        items[index] = item;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionAndAnswer;

    fn sample() -> Report {
        Report {
            candidate_name: "Ada".to_string(),
            professional_experience: vec![
                ProfessionalExperience {
                    company: "Acme".to_string(),
                    position: "Director".to_string(),
                    duration: "2019 - Present".to_string(),
                    details: vec!["first".into(), "second".into(), "third".into()],
                },
                ProfessionalExperience::placeholder(),
            ],
            functional_evaluation: vec![QuestionCategory {
                category: "KPI".to_string(),
                questions: vec![QuestionAndAnswer {
                    question: "What are the Key Performance Indicators in your most recent role"
                        .to_string(),
                    answer: "OTIF".to_string(),
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_set_field_replaces_value() {
        let mut report = sample();
        set_field(&mut report, ScalarField::Summary, "Seasoned leader".to_string());
        set_field(&mut report, ScalarField::Function, "Logistics".to_string());
        assert_eq!(report.summary, "Seasoned leader");
        assert_eq!(report.function, "Logistics");
        assert_eq!(report.candidate_name, "Ada");
    }

    #[test]
    fn test_scalar_field_wire_names() {
        let field: ScalarField = serde_json::from_str("\"candidateName\"").unwrap();
        assert_eq!(field, ScalarField::CandidateName);
        let list: ReportList = serde_json::from_str("\"professionalExperience\"").unwrap();
        assert_eq!(list, ReportList::ProfessionalExperience);
    }

    #[test]
    fn test_upsert_replaces_or_appends_at_end() {
        let mut report = sample();
        let item = ListItem::Education(Education::placeholder());
        upsert_list_item(&mut report, ReportList::Education, 0, item.clone()).unwrap();
        assert_eq!(report.education.len(), 1);

        let replacement = ListItem::Education(Education {
            institution: "MIT".to_string(),
            ..Default::default()
        });
        upsert_list_item(&mut report, ReportList::Education, 0, replacement).unwrap();
        assert_eq!(report.education.len(), 1);
        assert_eq!(report.education[0].institution, "MIT");

        let err = upsert_list_item(&mut report, ReportList::Education, 5, item).unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                list: "education",
                index: 5,
                len: 1
            }
        );
    }

    #[test]
    fn test_upsert_rejects_item_for_other_list() {
        let mut report = sample();
        let err = upsert_list_item(
            &mut report,
            ReportList::Certifications,
            0,
            ListItem::Education(Education::placeholder()),
        )
        .unwrap_err();
        assert_eq!(err, EditError::ItemMismatch("certifications"));
    }

    #[test]
    fn test_remove_list_item_preserves_order() {
        let mut report = sample();
        append_list_item(&mut report, ListItem::Experience(ProfessionalExperience::placeholder()));
        report.professional_experience[2].company = "Third".to_string();

        remove_list_item(&mut report, ReportList::ProfessionalExperience, 1).unwrap();
        let companies: Vec<_> = report
            .professional_experience
            .iter()
            .map(|e| e.company.as_str())
            .collect();
        assert_eq!(companies, vec!["Acme", "Third"]);

        assert!(remove_list_item(&mut report, ReportList::Certifications, 0).is_err());
    }

    #[test]
    fn test_detail_edits_keep_bullet_order() {
        let mut report = sample();
        set_detail(&mut report, 0, 1, "SECOND".to_string()).unwrap();
        append_detail(&mut report, 0, NEW_DETAIL.to_string()).unwrap();
        remove_detail(&mut report, 0, 0).unwrap();
        assert_eq!(
            report.professional_experience[0].details,
            vec!["SECOND", "third", NEW_DETAIL]
        );
        // Grouping untouched: still two entries.
        assert_eq!(report.professional_experience.len(), 2);
    }

    #[test]
    fn test_detail_edits_out_of_range() {
        let mut report = sample();
        assert!(matches!(
            set_detail(&mut report, 0, 9, "x".into()),
            Err(EditError::IndexOutOfRange { list: "details", .. })
        ));
        assert!(matches!(
            append_detail(&mut report, 7, "x".into()),
            Err(EditError::IndexOutOfRange {
                list: "professionalExperience",
                ..
            })
        ));
        assert!(remove_detail(&mut report, 1, 3).is_err());
    }

    #[test]
    fn test_set_answer_only_touches_target_question() {
        let mut report = sample();
        set_answer(&mut report, 0, 0, "OTIF 98%".to_string()).unwrap();
        let qa = &report.functional_evaluation[0].questions[0];
        assert_eq!(qa.answer, "OTIF 98%");
        assert!(qa.question.starts_with("What are the Key Performance"));
        assert!(set_answer(&mut report, 0, 1, "x".into()).is_err());
        assert!(set_answer(&mut report, 3, 0, "x".into()).is_err());
    }

    #[test]
    fn test_list_item_from_json_and_placeholders() {
        let item = ListItem::from_json(
            ReportList::Certifications,
            serde_json::json!({"name": "CSCP", "year": "2020"}),
        )
        .unwrap();
        assert_eq!(
            item,
            ListItem::Certification(Certification {
                name: "CSCP".to_string(),
                issuing_organization: String::new(),
                year: "2020".to_string(),
            })
        );

        let err = ListItem::from_json(ReportList::Education, serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, EditError::InvalidItem { list: "education", .. }));

        assert!(ListItem::placeholder(ReportList::Education).is_ok());
        assert_eq!(
            ListItem::placeholder(ReportList::FunctionalEvaluation).unwrap_err(),
            EditError::NoPlaceholder("functionalEvaluation")
        );
    }
}
