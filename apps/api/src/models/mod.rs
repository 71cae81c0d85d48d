pub mod report;

pub use report::{
    Certification, Education, ProfessionalExperience, QuestionAndAnswer, QuestionCategory,
    Report, UNSPECIFIED,
};
