//! Discovery of route descriptors in directory trees.
//!
//! Loading is delegated to a [`Loader`]. Every directory entry is offered to
//! the loader; entries the loader rejects are descended into if they are
//! directories, and skipped otherwise.
use crate::descriptor::RouteDescriptor;
use crate::error::{Error, LoadError};
use crate::router::Router;

use std::fs;
use std::path::{Path, PathBuf};

/// Turns a filesystem entry into a route descriptor.
///
/// Closures work as loaders, which is how configuration reaches handlers
/// that need it:
///
/// ```rust,no_run
/// use routeswitch::{LoadError, RouteDescriptor, Router};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let greeting = String::from("Wax on, wax off.");
/// let loader = |path: &Path| -> Result<RouteDescriptor<String>, LoadError> {
///     match path.extension().and_then(|ext| ext.to_str()) {
///         Some("fortune") => Ok(RouteDescriptor::new().path("/v1/fortune", greeting.clone())),
///         _ => Err(LoadError::Unsupported { path: path.to_owned() }),
///     }
/// };
///
/// let router = Router::from_directories(["handlers"], &loader)?;
/// assert!(router.at("/v1/fortune").is_some());
/// # Ok(())
/// # }
/// ```
pub trait Loader<V> {
    fn load(&self, path: &Path) -> Result<RouteDescriptor<V>, LoadError>;
}

impl<V, F> Loader<V> for F
where
    F: Fn(&Path) -> Result<RouteDescriptor<V>, LoadError>,
{
    fn load(&self, path: &Path) -> Result<RouteDescriptor<V>, LoadError> {
        self(path)
    }
}

/// Loads `*.json` files as descriptors with JSON payloads.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonLoader;

impl Loader<serde_json::Value> for JsonLoader {
    fn load(&self, path: &Path) -> Result<RouteDescriptor<serde_json::Value>, LoadError> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") || path.is_dir() {
            return Err(LoadError::Unsupported {
                path: path.to_owned(),
            });
        }

        let bytes = fs::read(path).map_err(|err| LoadError::io(path, err))?;
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

/// Loads every descriptor found under `dir`.
///
/// Entries are visited in file name order. Descriptors found in
/// sub-directories follow those of the directory itself. Entries that fail to
/// load are logged and skipped; only failing to read `dir` itself is an
/// error.
pub fn load_descriptors<V, L>(dir: &Path, loader: &L) -> Result<Vec<RouteDescriptor<V>>, LoadError>
where
    L: Loader<V> + ?Sized,
{
    let mut descriptors = Vec::new();
    let mut subdirs = Vec::new();

    for path in read_dir_sorted(dir)? {
        match loader.load(&path) {
            Ok(descriptor) => {
                debug!(
                    "loaded {} paths from {}",
                    descriptor.paths.len(),
                    path.display()
                );
                descriptors.push(descriptor);
            }
            Err(_) if path.is_dir() => subdirs.push(path),
            Err(err @ LoadError::Unsupported { .. }) => debug!("skipping {}", err),
            Err(err) => warn!("skipping {}", err),
        }
    }

    for subdir in subdirs {
        match load_descriptors(&subdir, loader) {
            Ok(found) => descriptors.extend(found),
            Err(err) => warn!("skipping directory {}: {}", subdir.display(), err),
        }
    }

    Ok(descriptors)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = fs::read_dir(dir).map_err(|err| LoadError::io(dir, err))?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(err) => warn!("skipping unreadable entry in {}: {}", dir.display(), err),
        }
    }

    paths.sort();
    Ok(paths)
}

impl<V> Router<V> {
    /// Builds a router from the descriptors found under each directory, in
    /// order.
    pub fn from_directories<I, P, L>(dirs: I, loader: &L) -> Result<Self, Error>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        L: Loader<V> + ?Sized,
    {
        let mut descriptors = Vec::new();
        for dir in dirs {
            descriptors.extend(load_descriptors(dir.as_ref(), loader)?);
        }

        Ok(Router::from_descriptors(descriptors)?)
    }
}
