//! Task log handlers - the rate-limited write path with annotation.
//!
//! A write is admitted by the limiter, persisted, and then enriched: the
//! insight annotator derives a short text from the persisted scores and the
//! parent task, which is written back onto the record. Annotation is
//! best-effort and never fails the write.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use carelog_core::domain::{Task, TaskLog};
use carelog_core::insight::{LogMetrics, TaskContext};
use carelog_shared::dto::{CreateTaskLogRequest, TaskLogResponse, UpdateTaskLogRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::Caller;
use crate::state::AppState;

use super::enforce_quota;

fn to_response(log: &TaskLog) -> TaskLogResponse {
    TaskLogResponse {
        id: log.id,
        taak_id: log.task_id,
        pijn_score: log.pain_score,
        vermoeidheid_score: log.fatigue_score,
        energie_voor: log.energy_before,
        energie_na: log.energy_after,
        duur_minuten: log.duration_minutes,
        notitie: log.note.clone(),
        annotatie: log.annotation.clone(),
        created_at: log.created_at,
        updated_at: log.updated_at,
    }
}

/// Annotate a persisted log and write the text back. Returns the log with
/// whatever annotation actually ended up stored.
async fn annotate_saved(state: &AppState, saved: TaskLog, task: &Task) -> TaskLog {
    let annotation = state.annotator.annotate(
        Some(&LogMetrics::from(&saved)),
        Some(&TaskContext::from(task)),
    );

    match state.task_logs.set_annotation(saved.id, &annotation).await {
        Ok(()) => TaskLog {
            annotation: Some(annotation),
            ..saved
        },
        Err(e) => {
            // The write itself succeeded; the annotation is enrichment only.
            tracing::warn!(log_id = %saved.id, error = %e, "failed to store annotation");
            saved
        }
    }
}

/// POST /api/task-logs
pub async fn create(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<CreateTaskLogRequest>,
) -> AppResult<HttpResponse> {
    enforce_quota(&state, "create_task_log", caller.user_id, &state.quotas.write).await?;

    let req = body.into_inner();
    let task = state
        .tasks
        .find_by_id(req.taak_id)
        .await?
        .filter(|t| t.user_id == caller.user_id)
        .ok_or_else(|| AppError::NotFound(format!("taak {} not found", req.taak_id)))?;

    let log = TaskLog::new(
        task.id,
        caller.user_id,
        req.pijn_score,
        req.vermoeidheid_score,
        req.energie_voor,
        req.energie_na,
        req.duur_minuten,
        req.notitie,
    );
    log.validate()?;

    let saved = state.task_logs.save(log).await?;
    let annotated = annotate_saved(&state, saved, &task).await;

    Ok(HttpResponse::Created().json(to_response(&annotated)))
}

/// PUT /api/task-logs/{id}
pub async fn update(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTaskLogRequest>,
) -> AppResult<HttpResponse> {
    enforce_quota(&state, "update_task_log", caller.user_id, &state.quotas.write).await?;

    let id = path.into_inner();
    let mut log = state
        .task_logs
        .find_by_id(id)
        .await?
        .filter(|l| l.user_id == caller.user_id)
        .ok_or_else(|| AppError::NotFound(format!("log {id} not found")))?;

    let req = body.into_inner();
    if let Some(v) = req.pijn_score {
        log.pain_score = Some(v);
    }
    if let Some(v) = req.vermoeidheid_score {
        log.fatigue_score = Some(v);
    }
    if let Some(v) = req.energie_voor {
        log.energy_before = Some(v);
    }
    if let Some(v) = req.energie_na {
        log.energy_after = Some(v);
    }
    if let Some(v) = req.duur_minuten {
        log.duration_minutes = Some(v);
    }
    if let Some(v) = req.notitie {
        log.note = Some(v);
    }
    log.validate()?;

    let saved = state.task_logs.save(log).await?;

    let task = state
        .tasks
        .find_by_id(saved.task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("taak {} not found", saved.task_id)))?;
    let annotated = annotate_saved(&state, saved, &task).await;

    Ok(HttpResponse::Ok().json(to_response(&annotated)))
}

/// GET /api/taken/{id}/logs
pub async fn list_for_task(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    enforce_quota(&state, "list_task_logs", caller.user_id, &state.quotas.read).await?;

    let task_id = path.into_inner();
    state
        .tasks
        .find_by_id(task_id)
        .await?
        .filter(|t| t.user_id == caller.user_id)
        .ok_or_else(|| AppError::NotFound(format!("taak {task_id} not found")))?;

    let logs = state.task_logs.find_by_task_id(task_id).await?;
    let response: Vec<TaskLogResponse> = logs.iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(response))
}
