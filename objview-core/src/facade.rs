//! Single entry point for loading and manipulating the live scene
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{ParseError, ViewerError};
use crate::mesh::{Scene, SceneInfo};
use crate::normalize::{normalize, Normalization, NormalizationParameters};
use crate::obj;
use crate::reader::{FileReader, FsReader};
use crate::transform::{TransformEngine, TransformState};

/// Receives a summary after every successful load
pub trait SceneObserver {
    fn scene_loaded(&mut self, info: &SceneInfo);
}

impl<F> SceneObserver for F
where
    F: FnMut(&SceneInfo),
{
    fn scene_loaded(&mut self, info: &SceneInfo) {
        self(info)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacadeState {
    Empty,
    Loaded,
}

struct LoadedScene {
    name: String,
    scene: Arc<Scene>,
    engine: TransformEngine,
    normalization: Normalization,
}

impl LoadedScene {
    /// Recompute the live positions. If a renderer still holds the previous
    /// snapshot, the scene is copied first so that snapshot stays intact.
    fn apply(&mut self) {
        self.engine.apply(Arc::make_mut(&mut self.scene));
    }
}

/// Owns the one live scene and its transform state
///
/// Load requests either fully replace the scene or leave everything as it
/// was. Move/rotate/scale take absolute values and are rejected with
/// [`ViewerError::NoScene`] until something is loaded.
pub struct Facade<R: FileReader = FsReader> {
    reader: R,
    loaded: Option<LoadedScene>,
    observers: Vec<Box<dyn SceneObserver>>,
}

impl Facade<FsReader> {
    pub fn new() -> Self {
        Self::with_reader(FsReader)
    }
}

impl Default for Facade<FsReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: FileReader> Facade<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            loaded: None,
            observers: Vec::new(),
        }
    }

    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: SceneObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Read, parse and normalize the OBJ file at `path`
    pub fn load_scene(
        &mut self,
        path: impl AsRef<Path>,
        params: &NormalizationParameters,
    ) -> Result<SceneInfo, ViewerError> {
        let path = path.as_ref();
        let result = params
            .validate()
            .and_then(|()| {
                self.reader.read(path).map_err(|source| ViewerError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            })
            .and_then(|text| obj::parse(&text).map_err(ViewerError::from));

        match result {
            Ok(scene) => self.install(path.display().to_string(), scene, params),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load scene");
                Err(e)
            }
        }
    }

    /// Parse and normalize OBJ text that is already in memory
    pub fn load_source(
        &mut self,
        name: &str,
        source: &str,
        params: &NormalizationParameters,
    ) -> Result<SceneInfo, ViewerError> {
        params.validate()?;
        let scene = obj::parse(source).inspect_err(|e| {
            warn!(name, error = %e, "failed to parse scene");
        })?;
        self.install(name.to_string(), scene, params)
    }

    /// Normalize and adopt an already built scene
    pub fn load(
        &mut self,
        name: &str,
        scene: Scene,
        params: &NormalizationParameters,
    ) -> Result<SceneInfo, ViewerError> {
        params.validate()?;
        self.install(name.to_string(), scene, params)
    }

    fn install(
        &mut self,
        name: String,
        mut scene: Scene,
        params: &NormalizationParameters,
    ) -> Result<SceneInfo, ViewerError> {
        if scene.is_empty() {
            warn!(name = %name, "refusing to load a scene without vertices");
            return Err(ParseError::EmptyScene.into());
        }

        let normalization = normalize(&mut scene, params);
        let engine = TransformEngine::new(&scene);
        let info = scene.info();

        info!(
            name = %name,
            vertices = info.vertex_count,
            figures = info.figure_count,
            scale = normalization.scale,
            "scene loaded"
        );

        let scene = reuse_storage(self.loaded.take(), scene);
        self.loaded = Some(LoadedScene {
            name,
            scene,
            engine,
            normalization,
        });
        for observer in &mut self.observers {
            observer.scene_loaded(&info);
        }

        Ok(info)
    }

    /// Set the absolute translation
    pub fn move_scene(&mut self, x: f64, y: f64, z: f64) -> Result<(), ViewerError> {
        let loaded = self.loaded_mut()?;
        require_finite("translation", &[x, y, z])?;
        loaded.engine.set_translation(x, y, z);
        loaded.apply();
        Ok(())
    }

    /// Set the absolute rotation in degrees, applied X then Y then Z
    pub fn rotate_scene(&mut self, x: f64, y: f64, z: f64) -> Result<(), ViewerError> {
        let loaded = self.loaded_mut()?;
        require_finite("rotation", &[x, y, z])?;
        loaded.engine.set_rotation(x, y, z);
        loaded.apply();
        Ok(())
    }

    /// Set the absolute uniform scale factor
    pub fn scale_scene(&mut self, factor: f64) -> Result<(), ViewerError> {
        let loaded = self.loaded_mut()?;
        require_finite("scale", &[factor])?;
        loaded.engine.set_scale(factor);
        loaded.apply();
        Ok(())
    }

    pub fn state(&self) -> FacadeState {
        match self.loaded {
            Some(_) => FacadeState::Loaded,
            None => FacadeState::Empty,
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.loaded.as_ref().map(|l| l.scene.as_ref())
    }

    /// Shared handle to the scene as of the last completed update
    pub fn snapshot(&self) -> Option<Arc<Scene>> {
        self.loaded.as_ref().map(|l| Arc::clone(&l.scene))
    }

    pub fn info(&self) -> Option<SceneInfo> {
        self.scene().map(Scene::info)
    }

    pub fn name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.name.as_str())
    }

    pub fn transform_state(&self) -> Option<&TransformState> {
        self.loaded.as_ref().map(|l| l.engine.state())
    }

    pub fn normalization(&self) -> Option<Normalization> {
        self.loaded.as_ref().map(|l| l.normalization)
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedScene, ViewerError> {
        self.loaded.as_mut().ok_or(ViewerError::NoScene)
    }
}

/// Copy the new scene into the previous scene's buffers unless a snapshot
/// still shares them
fn reuse_storage(previous: Option<LoadedScene>, scene: Scene) -> Arc<Scene> {
    let Some(LoadedScene {
        scene: mut shared, ..
    }) = previous
    else {
        return Arc::new(scene);
    };
    match Arc::get_mut(&mut shared) {
        Some(slot) => {
            slot.clone_from(&scene);
            shared
        }
        None => Arc::new(scene),
    }
}

fn require_finite(what: &str, values: &[f64]) -> Result<(), ViewerError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ViewerError::InvalidParameters(format!(
            "{what} must be finite, got {values:?}"
        )))
    }
}
