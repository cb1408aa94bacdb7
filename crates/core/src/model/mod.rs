mod analytics;
mod catalog;
mod ids;
mod question;
mod result;

pub use analytics::HistoryOverview;
pub use catalog::{Catalog, CatalogError};
pub use ids::{QuestionId, ResultId, UserId};
pub use question::{Difficulty, OPTION_COUNT, Question, QuestionError};
pub use result::{CategoryTally, ExamResult, ExamResultError};
