use uuid::Uuid;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;

/// Makes sure the configured staff account exists so write requests have an
/// actor to attribute records to on a fresh database.
pub(crate) async fn ensure_staff_user(state: &AppState) -> anyhow::Result<Option<String>> {
    let admin = state.settings().admin();
    let Some(username) = admin.staff_username.as_deref() else {
        tracing::debug!("BOOTSTRAP_STAFF_USERNAME not configured; skipping staff bootstrap");
        return Ok(None);
    };

    if let Some(user) = repositories::users::find_by_username(state.db(), username).await? {
        if !user.is_staff {
            repositories::users::set_staff(state.db(), &user.id, true).await?;
            tracing::info!(user_id = %user.id, username, "Promoted bootstrap user to staff");
        } else {
            tracing::info!(user_id = %user.id, username, "Bootstrap staff user already present");
        }
        return Ok(Some(user.id));
    }

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            username,
            full_name: &admin.staff_full_name,
            email: None,
            is_staff: true,
            created_at: primitive_now_utc(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, username, "Created bootstrap staff user");
    Ok(Some(user.id))
}
