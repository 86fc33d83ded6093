//! Load/save coordination.
//!
//! A [`Session`] owns the settings and the [`HashResolver`] and is what a
//! host's load/save actions call. The resolver is rebuilt only when the
//! effective dictionary path actually changes. Per-run [`Overrides`] take
//! precedence over the settings but are never part of [`Session::into_settings`].

use std::path::{Path, PathBuf};

use crate::bounds::{forest_len, BoundNode, BoundsEncoder, Forest};
use crate::document::CarDocument;
use crate::hash::{DictionarySource, FileDictionary, HashResolver};
use crate::scene::{materialize, SceneBuilder, SceneSource};
use crate::settings::{Overrides, Settings};
use crate::util::Result;

/// A document together with its decoded bounds.
#[derive(Clone, Debug)]
pub struct LoadedCar {
    pub document: CarDocument,
    pub forest: Forest,
}

#[derive(Debug)]
pub struct Session {
    settings: Settings,
    overrides: Overrides,
    resolver: HashResolver,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self::with_overrides(settings, Overrides::default())
    }

    pub fn with_overrides(settings: Settings, overrides: Overrides) -> Self {
        let mut session = Self { settings, overrides, resolver: HashResolver::new() };
        session.reload_dictionary();
        session
    }

    /// Persisted settings, without overrides.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn resolver(&self) -> &HashResolver {
        &self.resolver
    }

    /// Settings to persist: what was loaded plus changes made through the
    /// session's setters (recent files, dictionary path, pivot mode).
    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Dictionary in effect, override first.
    pub fn dictionary_path(&self) -> Option<&Path> {
        self.overrides
            .dictionary_path
            .as_deref()
            .or(self.settings.dictionary_path.as_deref())
    }

    /// Pivot mode in effect, override first.
    pub fn use_pivot(&self) -> bool {
        self.overrides.use_pivot.unwrap_or(self.settings.use_pivot)
    }

    /// Change the persisted dictionary path. The resolver is only reset
    /// when the effective path changes.
    pub fn set_dictionary_path(&mut self, path: Option<PathBuf>) {
        if self.settings.dictionary_path == path {
            return;
        }
        let before = self.dictionary_path().map(Path::to_path_buf);
        self.settings.dictionary_path = path;
        if self.dictionary_path() != before.as_deref() {
            self.reload_dictionary();
        }
    }

    /// Change the persisted pivot mode.
    pub fn set_use_pivot(&mut self, use_pivot: bool) {
        self.settings.use_pivot = use_pivot;
    }

    fn reload_dictionary(&mut self) {
        let path = self.dictionary_path().map(Path::to_path_buf);
        tracing::debug!("dictionary path is {:?}", path);
        self.resolver.set_source(
            path.map(|p| Box::new(FileDictionary::new(p)) as Box<dyn DictionarySource>),
        );
    }

    /// Read `path` and decode its bounds with the session's pivot mode.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<LoadedCar> {
        let path = path.as_ref();
        let document = CarDocument::open(path)?;
        let forest = document.decode_bounds(self.use_pivot(), &self.resolver)?;
        tracing::info!(
            "loaded {}: {} root bounds, {} total",
            path.display(),
            forest.len(),
            forest_len(&forest)
        );
        self.settings.add_recent(path.to_path_buf());
        Ok(LoadedCar { document, forest })
    }

    /// Load `path` straight into a host scene. Returns the document and
    /// the handles of the created roots.
    pub fn load_into<B: SceneBuilder>(
        &mut self,
        path: impl AsRef<Path>,
        builder: &mut B,
    ) -> Result<(CarDocument, Vec<B::Handle>)> {
        let LoadedCar { document, forest } = self.load(path)?;
        let roots = materialize(&forest, builder)?;
        Ok((document, roots))
    }

    /// Save `document` with `forest` as its bounds. The input document is not modified.
    pub fn save(&self, document: &CarDocument, forest: &[BoundNode], out: impl AsRef<Path>) -> Result<()> {
        let mut document = document.clone();
        document.set_bounds(forest, &self.resolver)?;
        self.write(&document, out.as_ref())
    }

    /// Save `document` with the bounds of a host scene.
    pub fn save_scene<S: SceneSource>(
        &self,
        document: &CarDocument,
        scene: &S,
        out: impl AsRef<Path>,
    ) -> Result<()> {
        let pack = BoundsEncoder::new(&self.resolver).encode_scene(scene)?;
        let mut document = document.clone();
        document.bounds_pack = (!pack.is_empty()).then_some(pack);
        self.write(&document, out.as_ref())
    }

    /// Default save target for a document loaded from `source`.
    pub fn save_path_for(&self, source: &Path) -> PathBuf {
        self.settings.save_path_for(source)
    }

    fn write(&self, document: &CarDocument, out: &Path) -> Result<()> {
        document.save(out)?;
        let count = document.bounds_pack.as_ref().map_or(0, |p| p.entries.len());
        tracing::info!("saved {} bounds to {}", count, out.display());
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
