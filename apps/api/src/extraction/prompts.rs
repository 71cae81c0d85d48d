// Instruction text and the fixed functional-evaluation questionnaire sent with
// every extraction request.

use crate::models::QuestionCategory;

/// The functional evaluation questionnaire. Category and question text must come
/// back verbatim in the response's `functionalEvaluation` section.
pub const QUESTIONNAIRE: &[(&str, &[&str])] = &[
    (
        "SCOPE & COMPANY",
        &[
            "Tell us about your Supply Chain functions and responsibilities in your last two roles.",
            "What was your supply chain budget and how much percentage was allocated to logistics spend?",
            "Which country/region(s) have you managed in your last 2 roles?",
            "How long is your experience in US distribution?",
            "How about planning?",
            "Can you share 2 examples of big projects that you have undertaken/oversaw in logistics.",
            "Have you managed reverse logistics?",
            "If yes, for how long and when (in which company/companies)?",
            "Does your previous role manage logistics internally or outsourced? If outsourced, please provide the functions being managed externally.",
        ],
    ),
    (
        "SYSTEM",
        &["What system or software have you used in the last 2 employment?"],
    ),
    (
        "REPORTING & MANAGEMENT",
        &[
            "How many direct and indirect reports in your most recent role?",
            "What role/function do you report to?",
            "What is your method for analyzing your team\u{2019}s performance?",
            "Who are your internal and external stakeholders?",
        ],
    ),
    (
        "KPI",
        &["What are the Key Performance Indicators in your most recent role"],
    ),
    ("COMPENSATION", &["What is your Notice Period?"]),
    (
        "MOTIVATION",
        &["Why do you think the Director, Operations Customer Service USA will be the right move for you?"],
    ),
];

/// Paragraph added when a job description accompanies the resume.
const JD_ALIGNMENT: &str = "A Job Description (JD) has been provided as the second document. \
When extracting details and answering questions, please align the candidate's experience with the \
requirements and skills mentioned in the JD. Specifically, highlight relevant achievements in the \
professional experience section and summary that demonstrate suitability for the specific role \
described in the JD.";

/// Extraction instruction template.
/// Replace: {task}, {jd_alignment}, {questionnaire}, {summary_focus}
const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are an expert Executive Search consultant at Alcott Global.

TASK:
Analyze the provided Candidate Resume and {task}.

INSTRUCTIONS:
1. Extract information precisely according to the JSON schema provided.
2. {jd_alignment}
3. Answer the following "Functional Evaluation" questions based on the resume content. Group the answers by the specified categories. Match the category and question text exactly from this list:
{questionnaire}
4. In the 'Summary' section, write a high-level 3-4 sentence professional pitch of the candidate {summary_focus}.
5. For the 'Professional Experience' section, list key responsibilities and achievements as concise bullet points, prioritizing those most relevant to supply chain, logistics, and operations.

If any specific information is missing from the documents for a required field, use "Not specified" or an empty array. Do not hallucinate data."#;

/// The questionnaire rendered as `Category:` headings followed by `- question` lines.
pub fn questionnaire_text() -> String {
    QUESTIONNAIRE
        .iter()
        .map(|(category, questions)| {
            let items: Vec<String> = questions.iter().map(|q| format!("- {q}")).collect();
            format!("Category: {category}\n{}", items.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_extraction_prompt(has_job_description: bool) -> String {
    let (task, jd_alignment, summary_focus) = if has_job_description {
        (
            "align it with the provided Job Description",
            JD_ALIGNMENT,
            "explaining why they are a strong fit for the specific JD provided",
        )
    } else {
        (
            "extract key professional details",
            "",
            "summarizing their career",
        )
    };

    EXTRACTION_PROMPT_TEMPLATE
        .replace("{task}", task)
        .replace("{jd_alignment}", jd_alignment)
        .replace("{questionnaire}", &questionnaire_text())
        .replace("{summary_focus}", summary_focus)
}

/// Lists the categories and questions in `evaluation` that do not appear verbatim
/// in the questionnaire, plus questionnaire categories that are missing entirely.
pub fn questionnaire_mismatches(evaluation: &[QuestionCategory]) -> Vec<String> {
    let mut mismatches = Vec::new();

    for category in evaluation {
        match QUESTIONNAIRE.iter().find(|(name, _)| *name == category.category) {
            None => mismatches.push(format!("unknown category '{}'", category.category)),
            Some((name, questions)) => {
                for qa in &category.questions {
                    if !questions.contains(&qa.question.as_str()) {
                        mismatches.push(format!("unknown question in '{name}': '{}'", qa.question));
                    }
                }
            }
        }
    }

    for (name, _) in QUESTIONNAIRE {
        if !evaluation.iter().any(|c| c.category == *name) {
            mismatches.push(format!("missing category '{name}'"));
        }
    }

    mismatches
}
