use serde::{Deserialize, Serialize};
use smart_search_store::{Feedback, NewFeedback};

use crate::error_handler::{AppError, AppResult};

pub const COMMENT_MAX_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub session_id: String,
    pub user_id: String,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub message_id: Option<i64>,
}

impl FeedbackRequest {
    /// Checks the fields and converts them into a store row.
    pub fn into_new_feedback(self) -> AppResult<NewFeedback> {
        if self.session_id.trim().is_empty() {
            return Err(AppError::invalid_field("session_id", "must not be blank"));
        }
        if self.user_id.trim().is_empty() {
            return Err(AppError::invalid_field("user_id", "must not be blank"));
        }
        let rating = u8::try_from(self.rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| AppError::invalid_field("rating", "must be between 1 and 5"))?;
        if let Some(c) = &self.comment {
            if c.chars().count() > COMMENT_MAX_CHARS {
                return Err(AppError::invalid_field(
                    "comment",
                    format!("must be at most {COMMENT_MAX_CHARS} characters"),
                ));
            }
        }

        Ok(NewFeedback {
            session_id: self.session_id,
            user_id: self.user_id,
            rating,
            comment: self.comment,
            message_id: self.message_id,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback_id: i64,
    pub message: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(f: Feedback) -> Self {
        Self {
            feedback_id: f.feedback_id,
            message: "Feedback saved.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i32, comment: Option<&str>) -> FeedbackRequest {
        FeedbackRequest {
            session_id: "s1".into(),
            user_id: "u1".into(),
            rating,
            comment: comment.map(str::to_string),
            message_id: None,
        }
    }

    #[test]
    fn rating_bounds() {
        for ok in 1..=5 {
            assert_eq!(request(ok, None).into_new_feedback().unwrap().rating as i32, ok);
        }
        for bad in [0, 6, -1, 300] {
            assert!(request(bad, None).into_new_feedback().is_err(), "{bad}");
        }
    }

    #[test]
    fn comment_limit() {
        let at_limit = "좋".repeat(COMMENT_MAX_CHARS);
        assert!(request(5, Some(&at_limit)).into_new_feedback().is_ok());
        let over = "x".repeat(COMMENT_MAX_CHARS + 1);
        assert!(request(5, Some(&over)).into_new_feedback().is_err());
    }

    #[test]
    fn ids_required() {
        let mut r = request(3, None);
        r.session_id = "".into();
        assert!(r.into_new_feedback().is_err());
    }
}
