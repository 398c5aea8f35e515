//! Repository discovery and placement handlers.

use super::{get_str_param, require_str_param};
use crate::server::AppState;
use serde_json::Value;

pub async fn get_repository_information(
    state: &AppState,
    params: &Value,
) -> repohub_core::Result<Value> {
    let search_url = get_str_param(params, "search_url", "searchUrl");
    let found = state.hub.query(search_url).await?;
    Ok(serde_json::to_value(found)?)
}

pub async fn prepare_to_receive_repository(
    state: &AppState,
    params: &Value,
) -> repohub_core::Result<Value> {
    let directory_name = require_str_param(params, "directory_name", "directoryName")?;
    let identifier = get_str_param(params, "repo_identifier", "repoIdentifier");
    let must_wait = state.hub.place(identifier, &directory_name).await?;
    Ok(Value::Bool(must_wait))
}

pub async fn list_repositories(state: &AppState, _params: &Value) -> repohub_core::Result<Value> {
    let records = state.hub.list_repositories().await?;
    Ok(serde_json::to_value(records)?)
}
