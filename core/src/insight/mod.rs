pub mod bulletin;
pub mod recommend;

pub use bulletin::{export_notice, insight_bulletins};
pub use recommend::{select_recommendation, Recommendation};
