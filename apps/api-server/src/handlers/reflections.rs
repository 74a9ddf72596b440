//! Reflection handlers - same write pipeline as task logs.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use carelog_core::domain::Reflection;
use carelog_core::insight::{ANNOTATION_DEGRADED, LogMetrics, TaskContext};
use carelog_shared::dto::{CreateReflectionRequest, ReflectionResponse, UpdateReflectionRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::Caller;
use crate::state::AppState;

use super::enforce_quota;

fn to_response(reflection: &Reflection) -> ReflectionResponse {
    ReflectionResponse {
        id: reflection.id,
        taak_id: reflection.task_id,
        tekst: reflection.body.clone(),
        pijn_score: reflection.pain_score,
        vermoeidheid_score: reflection.fatigue_score,
        energie_voor: reflection.energy_before,
        energie_na: reflection.energy_after,
        annotatie: reflection.annotation.clone(),
        created_at: reflection.created_at,
        updated_at: reflection.updated_at,
    }
}

/// Annotate a persisted reflection and write the text back.
///
/// A reflection without a task gets a generic context so the insight rules
/// still run. A dangling task reference yields no context, which the
/// annotator answers with its insufficient-data message. A failed lookup
/// collapses into the degraded annotation; the write already succeeded.
async fn annotate_saved(state: &AppState, saved: Reflection) -> Reflection {
    let context = match saved.task_id {
        None => Ok(Some(TaskContext::default())),
        Some(id) => state
            .tasks
            .find_by_id(id)
            .await
            .map(|task| task.as_ref().map(TaskContext::from)),
    };

    let annotation = match context {
        Ok(context) => state
            .annotator
            .annotate(Some(&LogMetrics::from(&saved)), context.as_ref()),
        Err(e) => {
            tracing::warn!(reflection_id = %saved.id, error = %e, "task lookup failed for annotation");
            ANNOTATION_DEGRADED.to_string()
        }
    };

    match state.reflections.set_annotation(saved.id, &annotation).await {
        Ok(()) => Reflection {
            annotation: Some(annotation),
            ..saved
        },
        Err(e) => {
            tracing::warn!(reflection_id = %saved.id, error = %e, "failed to store annotation");
            saved
        }
    }
}

/// POST /api/reflecties
pub async fn create(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<CreateReflectionRequest>,
) -> AppResult<HttpResponse> {
    enforce_quota(&state, "create_reflection", caller.user_id, &state.quotas.write).await?;

    let req = body.into_inner();
    if let Some(task_id) = req.taak_id {
        state
            .tasks
            .find_by_id(task_id)
            .await?
            .filter(|t| t.user_id == caller.user_id)
            .ok_or_else(|| AppError::NotFound(format!("taak {task_id} not found")))?;
    }

    let reflection = Reflection::new(
        caller.user_id,
        req.taak_id,
        req.tekst,
        req.pijn_score,
        req.vermoeidheid_score,
        req.energie_voor,
        req.energie_na,
    );
    reflection.validate()?;

    let saved = state.reflections.save(reflection).await?;
    let annotated = annotate_saved(&state, saved).await;

    Ok(HttpResponse::Created().json(to_response(&annotated)))
}

/// GET /api/reflecties
pub async fn list(state: web::Data<AppState>, caller: Caller) -> AppResult<HttpResponse> {
    enforce_quota(&state, "list_reflections", caller.user_id, &state.quotas.read).await?;

    let reflections = state.reflections.find_by_user_id(caller.user_id).await?;
    let response: Vec<ReflectionResponse> = reflections.iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/reflecties/{id}
pub async fn update(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateReflectionRequest>,
) -> AppResult<HttpResponse> {
    enforce_quota(&state, "update_reflection", caller.user_id, &state.quotas.write).await?;

    let id = path.into_inner();
    let mut reflection = state
        .reflections
        .find_by_id(id)
        .await?
        .filter(|r| r.user_id == caller.user_id)
        .ok_or_else(|| AppError::NotFound(format!("reflectie {id} not found")))?;

    let req = body.into_inner();
    if let Some(v) = req.tekst {
        reflection.body = v;
    }
    if let Some(v) = req.pijn_score {
        reflection.pain_score = Some(v);
    }
    if let Some(v) = req.vermoeidheid_score {
        reflection.fatigue_score = Some(v);
    }
    if let Some(v) = req.energie_voor {
        reflection.energy_before = Some(v);
    }
    if let Some(v) = req.energie_na {
        reflection.energy_after = Some(v);
    }
    reflection.validate()?;

    let saved = state.reflections.save(reflection).await?;
    let annotated = annotate_saved(&state, saved).await;

    Ok(HttpResponse::Ok().json(to_response(&annotated)))
}
