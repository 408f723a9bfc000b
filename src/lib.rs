//! Procedural terrain and path generators for a point-cloud viewer.
//!
//! - [`extract_surface`] turns any [`DensityField`] (such as [`CaveTerrain`])
//!   into lit boundary points, which [`ZBuffer`] rasterizes through a
//!   caller-supplied [`Projector`].
//! - [`RandomWorm`] and [`Heightmap`] wireframes produce polylines behind the
//!   common [`PathGenerator`] interface.

pub mod camera;
pub mod error;
pub mod extract;
pub mod field;
pub mod heightmap;
pub mod interp;
pub mod noise;
pub mod path;
pub mod perlin;
pub mod raster;
pub mod settings;
pub mod types;
pub mod volume;
pub mod worm;

pub use camera::LookAtProjector;
pub use error::{Error, Result};
pub use extract::{Extraction, ScanObserver, extract_surface, extract_surface_with};
pub use field::{CaveTerrain, DensityField};
pub use heightmap::{Heightmap, TerrainPolyline, generate_wireframe};
pub use path::{PathGenerator, Polyline};
pub use raster::{Projection, Projector, ZBuffer, render_points};
pub use settings::{SegmentSize, TerrainSettings, WormSettings};
pub use types::{Color, Point, SurfacePoint, Value, Vector};
pub use volume::{ClipPlane, ScanVolume};
pub use worm::{RandomWorm, SwarmOptions, spawn_worms};
