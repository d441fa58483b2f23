//! Compound operations built from several independent API calls.
//!
//! The API has no rename and no way to query an item's type, so both operations try the
//! file interpretation first and fall back to the folder interpretation.
//! Calls are never issued concurrently.

use crate::dispatch::CommandReport;
use crate::gateway::{parse_listing, parse_pwd, ApiGateway, ApiOutcome};
use crate::grammar::encode_segment;
use crate::status::StatusEvent;
use tracing::{debug, info, warn};

/// DELETE `/delete-file/{name}`, then `/rmdir/{name}` only if the file delete failed.
pub async fn delete_item(gateway: &ApiGateway, name: &str) -> CommandReport {
    let segment = encode_segment(name);

    let deleted = gateway.delete(&format!("/delete-file/{}", segment)).await.is_success()
        || {
            debug!(%name, "not deleted as a file; trying folder");
            gateway.delete(&format!("/rmdir/{}", segment)).await.is_success()
        };

    if deleted {
        CommandReport::success(
            StatusEvent::ItemDeleted(name.to_string()),
            format!("Successfully deleted {}.", name),
        )
    } else {
        CommandReport::failure(
            StatusEvent::ItemDeleteFailed(name.to_string()),
            format!("Failed to delete {}.", name),
        )
    }
}

/// Rename `old` to `new` as a file, or failing that as an empty folder.
pub async fn rename_item(gateway: &ApiGateway, old: &str, new: &str) -> CommandReport {
    let renamed = rename_file(gateway, old, new).await || {
        debug!(%old, "file rename failed; trying folder");
        rename_folder(gateway, old, new).await
    };

    if renamed {
        info!(%old, %new, "renamed");
        CommandReport::success(
            StatusEvent::Renamed {
                old: old.to_string(),
                new: new.to_string(),
            },
            format!("Success! {} has been renamed to {}.", old, new),
        )
    } else {
        CommandReport::failure(
            StatusEvent::RenameFailed {
                old: old.to_string(),
                new: new.to_string(),
            },
            format!(
                "Sorry, I couldn't rename {} to {}. Make sure the item exists and the new name is valid.",
                old, new
            ),
        )
    }
}

/// Read (best-effort) → create under the new name → delete the old file.
async fn rename_file(gateway: &ApiGateway, old: &str, new: &str) -> bool {
    let content = match gateway.get(&format!("/read-file/{}", encode_segment(old))).await {
        ApiOutcome::Success { body } => body,
        _ => String::new(),
    };

    if !gateway
        .post(&format!("/create-file/{}", encode_segment(new)), Some(content))
        .await
        .is_success()
    {
        return false;
    }

    gateway
        .delete(&format!("/delete-file/{}", encode_segment(old)))
        .await
        .is_success()
}

/// Create the new folder, and remove the old one only if it is empty. Contents are never
/// migrated.
async fn rename_folder(gateway: &ApiGateway, old: &str, new: &str) -> bool {
    if !gateway.post(&format!("/mkdir/{}", encode_segment(new)), None).await.is_success() {
        return false;
    }

    let previous_dir = match gateway.get("/pwd").await {
        ApiOutcome::Success { body } => parse_pwd(&body),
        _ => None,
    };

    if !gateway.post(&format!("/cd/{}", encode_segment(old)), None).await.is_success() {
        return false;
    }

    // An unreadable listing counts as empty; the rmdir below then decides.
    let items = match gateway.get("/ls").await {
        ApiOutcome::Success { body } => parse_listing(&body).unwrap_or_default(),
        _ => Vec::new(),
    };

    // Exactly one level was entered, so `/cd..` is correct when the old path is unknown.
    let back = match &previous_dir {
        Some(dir) => format!("/cd/{}", encode_segment(dir)),
        None => "/cd..".to_string(),
    };
    if !gateway.post(&back, None).await.is_success() {
        warn!(path = %back, "could not return to the previous directory");
    }

    if !items.is_empty() {
        info!(%old, count = items.len(), "folder not empty; refusing to rename");
        return false;
    }
    gateway
        .delete(&format!("/rmdir/{}", encode_segment(old)))
        .await
        .is_success()
}
