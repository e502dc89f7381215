//! Anti-cheating focus-loss monitor

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{QuizStatus, ResponseStatus},
    services::{
        answer_service::AnswerService,
        lifecycle_service::LifecycleService,
        runtime::{EngineContext, QuizRuntime},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusLossOutcome {
    pub tab_switch_count: u32,
    /// The participant's attempt has been force-completed as disqualified
    pub forced: bool,
}

pub struct MonitorService;

impl MonitorService {
    /// Count one focus-loss event and disqualify once the count passes the
    /// quiz's tolerance. Retries after disqualification change nothing.
    pub fn report_focus_loss(
        rt: &mut QuizRuntime,
        ctx: &EngineContext<'_>,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<FocusLossOutcome> {
        if LifecycleService::expire_if_due(rt, ctx, now) || rt.quiz.status != QuizStatus::Active {
            return Err(AppError::SessionClosed);
        }

        if let Some(response) = rt.responses.get(&user_id) {
            match response.status {
                ResponseStatus::Disqualified => {
                    return Ok(FocusLossOutcome {
                        tab_switch_count: response.tab_switch_count,
                        forced: true,
                    });
                }
                ResponseStatus::Completed => {
                    return Ok(FocusLossOutcome {
                        tab_switch_count: response.tab_switch_count,
                        forced: false,
                    });
                }
                ResponseStatus::InProgress => {}
            }
        }

        let threshold = rt.quiz.settings.tab_switch_threshold();
        let session = rt
            .participants
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound("Participant not found".to_string()))?;
        session.tab_switch_count += 1;
        let count = session.tab_switch_count;

        if let Some(response) = rt.responses.get_mut(&user_id) {
            response.tab_switch_count = count;
            rt.touch_response(user_id);
        }

        if count <= threshold {
            info!(
                quiz_id = %rt.quiz.id,
                user_id = %user_id,
                tab_switch_count = count,
                threshold,
                "Focus loss recorded"
            );
            return Ok(FocusLossOutcome {
                tab_switch_count: count,
                forced: false,
            });
        }

        warn!(
            quiz_id = %rt.quiz.id,
            user_id = %user_id,
            tab_switch_count = count,
            threshold,
            "Tab-switch limit exceeded, disqualifying participant"
        );
        AnswerService::force_complete(rt, user_id, ResponseStatus::Disqualified, now);
        AnswerService::after_completion(rt, ctx, now);

        Ok(FocusLossOutcome {
            tab_switch_count: count,
            forced: true,
        })
    }
}
