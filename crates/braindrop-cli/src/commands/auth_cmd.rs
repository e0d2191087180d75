use std::path::Path;

use braindrop_core::AppPaths;

use crate::commands::common::{normalize_token, open_store};
use crate::error::CliError;

pub fn run_login(token: &str, paths: &AppPaths) -> Result<(), CliError> {
    save_token(paths.token_file(), token)?;
    println!("Saved API token to {}", paths.token_file().display());
    Ok(())
}

/// Logging out forgets the token and everything downloaded with it.
pub async fn run_logout(paths: &AppPaths) -> Result<(), CliError> {
    remove_token(paths.token_file())?;
    let store = open_store(paths.data_file()).await?;
    store.forget().await?;
    println!("Signed out and removed local data");
    Ok(())
}

pub fn save_token(path: &Path, token: &str) -> Result<(), CliError> {
    let token = normalize_token(Some(token)).ok_or(CliError::EmptyToken)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_private(path, token.as_bytes())?;
    Ok(())
}

/// Write a file only the current user can read.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies to new files.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

pub fn remove_token(path: &Path) -> Result<(), CliError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(CliError::Io(error)),
    }
}
