use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::http::Uri;
use environment_provider_sdk::EnvironmentProviderClient;

use super::dto::{EnvironmentDto, HealthDto, InstanceDto};
use super::error::{Problem, environment_error_to_problem};

/// Spring Cloud Config clients escape `/` in labels as `(_)`.
const LABEL_SLASH_ESCAPE: &str = "(_)";

pub type ApiResult<T> = Result<Json<T>, Problem>;

pub async fn get_environment(
    Extension(client): Extension<Arc<dyn EnvironmentProviderClient>>,
    Path((application, profile)): Path<(String, String)>,
    uri: Uri,
) -> ApiResult<EnvironmentDto> {
    find_environment(client.as_ref(), &application, &profile, None, uri.path()).await
}

pub async fn get_labelled_environment(
    Extension(client): Extension<Arc<dyn EnvironmentProviderClient>>,
    Path((application, profile, label)): Path<(String, String, String)>,
    uri: Uri,
) -> ApiResult<EnvironmentDto> {
    let label = label.replace(LABEL_SLASH_ESCAPE, "/");
    find_environment(
        client.as_ref(),
        &application,
        &profile,
        Some(&label),
        uri.path(),
    )
    .await
}

async fn find_environment(
    client: &dyn EnvironmentProviderClient,
    application: &str,
    profile: &str,
    label: Option<&str>,
    path: &str,
) -> ApiResult<EnvironmentDto> {
    let doc = client
        .find_environment(Some(application), Some(profile), label)
        .await
        .map_err(|e| environment_error_to_problem(&e, path))?;
    Ok(Json(doc.into()))
}

pub async fn list_instances(
    Extension(client): Extension<Arc<dyn EnvironmentProviderClient>>,
    uri: Uri,
) -> ApiResult<Vec<InstanceDto>> {
    let instances = client
        .running_instances()
        .await
        .map_err(|e| environment_error_to_problem(&e, uri.path()))?;
    Ok(Json(instances.into_iter().map(InstanceDto::from).collect()))
}

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "UP".to_owned(),
    })
}
