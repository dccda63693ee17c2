use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::{Department, Designation, TeacherProfile, UserKind};
use crate::models::users::requests::NewUser;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_code;

const DEFAULT_ADMIN_EMAIL: &str = "admin@campus.local";
const DEFAULT_ADMIN_FACULTY_ID: &str = "ADMIN001";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Cache backend '{}' initialized", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create '{}' cache: {}", name, e);
            None
        }
    }
}

/// 按配置创建缓存，失败时退回内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let cache_type = &AppConfig::get().cache.cache_type;

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    }
    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to in-memory moka cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 管理员档案：`is_admin` 的教师
fn admin_user(email: String, password_hash: String) -> NewUser {
    NewUser {
        name: "Administrator".to_string(),
        email,
        password_hash,
        kind: UserKind::Teacher(TeacherProfile {
            faculty_id: DEFAULT_ADMIN_FACULTY_ID.to_string(),
            department: Department::Cse,
            designation: Designation::Professor,
            is_admin: true,
        }),
    }
}

/// 空库时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No users found, creating default administrator"),
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let email = std::env::var("ADMIN_EMAIL")
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_code(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD not set, generated password: {}", generated);
        warn!("  Save it now or set ADMIN_PASSWORD before the first start");
        warn!("==========================================================");
        generated
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    match storage.create_user(admin_user(email, password_hash)).await {
        Ok(user) => info!("Default administrator created (ID: {}, email: {})", user.id, user.email),
        Err(e) => warn!("Failed to create administrator: {}", e),
    }
}

/// 启动前准备：存储（含迁移）、默认管理员、缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    debug!(
        "Registered cache backends: {:?}",
        crate::cache::register::registered_plugins()
    );

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let upload_dir = &AppConfig::get().upload.dir;
    if let Err(e) = std::fs::create_dir_all(upload_dir) {
        warn!("Failed to create upload directory {}: {}", upload_dir, e);
    }

    let cache = create_cache().await.expect("Failed to create cache");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_flagged_teacher() {
        let user = admin_user(DEFAULT_ADMIN_EMAIL.into(), "hash".into());
        match user.kind {
            UserKind::Teacher(profile) => {
                assert!(profile.is_admin);
                assert_eq!(profile.faculty_id, DEFAULT_ADMIN_FACULTY_ID);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
