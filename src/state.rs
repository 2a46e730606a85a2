use std::sync::Arc;

use crate::config::Config;
use crate::mail::MailRelay;
use crate::rate_limit::SubmissionRateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub mailer: Arc<dyn MailRelay>,
    pub submission_limiter: SubmissionRateLimiter,
}
