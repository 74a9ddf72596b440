//! Task handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use carelog_core::domain::Task;
use carelog_shared::dto::{CreateTaskRequest, TaskResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::Caller;
use crate::state::AppState;

use super::enforce_quota;

fn to_response(task: &Task) -> TaskResponse {
    TaskResponse {
        id: task.id,
        titel: task.title.clone(),
        taak_type: task.task_type.clone(),
        duur_minuten: task.duration_minutes,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

/// POST /api/taken
pub async fn create(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<CreateTaskRequest>,
) -> AppResult<HttpResponse> {
    enforce_quota(&state, "create_task", caller.user_id, &state.quotas.write).await?;

    let req = body.into_inner();
    if req.titel.trim().is_empty() {
        return Err(AppError::BadRequest("titel must not be empty".to_string()));
    }

    let task = Task::new(caller.user_id, req.titel, req.taak_type, req.duur_minuten);
    let saved = state.tasks.save(task).await?;

    Ok(HttpResponse::Created().json(to_response(&saved)))
}

/// GET /api/taken
pub async fn list(state: web::Data<AppState>, caller: Caller) -> AppResult<HttpResponse> {
    enforce_quota(&state, "list_tasks", caller.user_id, &state.quotas.read).await?;

    let tasks = state.tasks.find_by_user_id(caller.user_id).await?;
    let response: Vec<TaskResponse> = tasks.iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/taken/{id}
pub async fn get(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    enforce_quota(&state, "get_task", caller.user_id, &state.quotas.read).await?;

    let id = path.into_inner();
    let task = state
        .tasks
        .find_by_id(id)
        .await?
        .filter(|t| t.user_id == caller.user_id)
        .ok_or_else(|| AppError::NotFound(format!("taak {id} not found")))?;

    Ok(HttpResponse::Ok().json(to_response(&task)))
}
