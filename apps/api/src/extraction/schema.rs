//! Response schema for the extraction request, in the upstream's
//! OBJECT / STRING / ARRAY type vocabulary.

use serde_json::{json, Value};

/// Top-level fields the response must carry.
pub const REQUIRED_FIELDS: [&str; 3] = ["candidateName", "professionalExperience", "functionalEvaluation"];

pub fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "candidateName": { "type": "STRING" },
            "employer": { "type": "STRING", "description": "Current or most recent employer" },
            "designation": { "type": "STRING", "description": "Current or most recent job title" },
            "location": { "type": "STRING" },
            "industry": { "type": "STRING" },
            "function": { "type": "STRING", "description": "Job function, e.g., Supply Chain, Logistics" },
            "language": { "type": "STRING", "description": "Languages spoken by the candidate" },
            "summary": {
                "type": "STRING",
                "description": "A tailored professional summary highlighting fit for the JD"
            },
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "institution": { "type": "STRING" },
                        "degree": { "type": "STRING" },
                        "fieldOfStudy": { "type": "STRING" },
                        "year": { "type": "STRING", "description": "Graduation year or period of study" }
                    },
                    "required": ["institution", "degree", "year"]
                }
            },
            "certifications": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "issuingOrganization": { "type": "STRING" },
                        "year": { "type": "STRING" }
                    },
                    "required": ["name"]
                }
            },
            "professionalExperience": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "company": { "type": "STRING" },
                        "position": { "type": "STRING" },
                        "duration": { "type": "STRING", "description": "e.g., 'Jan 2020 - Present' or '3 years'" },
                        "details": {
                            "type": "ARRAY",
                            "description": "Bulleted list of responsibilities and achievements, focused on relevance to the JD requirements",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["company", "position", "duration", "details"]
                }
            },
            "functionalEvaluation": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "questions": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "question": { "type": "STRING" },
                                    "answer": { "type": "STRING" }
                                },
                                "required": ["question", "answer"]
                            }
                        }
                    },
                    "required": ["category", "questions"]
                }
            }
        },
        "required": REQUIRED_FIELDS
    })
}
