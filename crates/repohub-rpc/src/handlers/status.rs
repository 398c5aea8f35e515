//! Status handler.

use crate::server::AppState;
use serde_json::{json, Value};

pub async fn get_status(state: &AppState, _params: &Value) -> repohub_core::Result<Value> {
    let status = state.hub.status();
    Ok(json!({
        "success": true,
        "version": status.version,
        "root": status.root,
        "backend": status.backend,
        "root_available": status.root_available,
    }))
}
