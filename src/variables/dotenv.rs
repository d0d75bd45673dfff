//! Seed a variable store from a dotenv file.

use std::path::Path;

use crate::error::StoreError;
use crate::variables::VariableStore;

/// Load every `KEY=VALUE` pair in `path` into `store`, overwriting existing
/// values. Returns the number of variables loaded.
///
/// The process environment is not touched.
pub async fn seed_from_dotenv(
    store: &dyn VariableStore,
    path: &Path,
) -> Result<usize, StoreError> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| dotenv_error(path, e))?;

    let mut count = 0;
    for item in iter {
        let (key, value) = item.map_err(|e| dotenv_error(path, e))?;
        store.set(&key, &value).await?;
        count += 1;
    }

    tracing::debug!(path = %path.display(), count, "Seeded variables from dotenv file");
    Ok(count)
}

fn dotenv_error(path: &Path, err: dotenvy::Error) -> StoreError {
    match err {
        dotenvy::Error::Io(source) => StoreError::Io {
            path: path.display().to_string(),
            source,
        },
        other => StoreError::Unavailable(format!(
            "failed to parse {}: {}",
            path.display(),
            other
        )),
    }
}
