use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::instrument;

use crate::{
    field::DensityField,
    types::{Point, SurfacePoint, Value, Vector, normalize_or},
    volume::ScanVolume,
};

/// Light never drops below this, so faces turned away stay visible.
pub const AMBIENT_LIGHT: Value = 0.08;

/// Direction toward the single fixed light.
pub fn light_direction() -> Vector {
    Vector::new(0.35, 0.9, 0.25).normalize()
}

/// Hook into a long-running scan.
///
/// The scan is split into X slices; `should_abort` is polled before each
/// slice starts and `slice_done` is called after each slice finishes.
/// Slices run in parallel, so calls may arrive from several threads.
pub trait ScanObserver: Sync {
    fn should_abort(&self) -> bool {
        false
    }

    fn slice_done(&self, _completed: usize, _total: usize) {}
}

/// Observes nothing and never aborts.
impl ScanObserver for () {}

/// Aborts once the flag is set.
impl ScanObserver for AtomicBool {
    fn should_abort(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

/// Result of [`extract_surface_with`].
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub points: Vec<SurfacePoint>,
    /// `true` when the observer stopped the scan; `points` then holds the
    /// slices that were already finished.
    pub aborted: bool,
}

/// Boundary points of the solid region of `field` inside `volume`.
///
/// See [`extract_surface_with`].
pub fn extract_surface<F: DensityField + ?Sized>(field: &F, volume: &ScanVolume) -> Vec<SurfacePoint> {
    extract_surface_with(field, volume, &()).points
}

/// Walks `volume` and emits every solid sample that touches air.
///
/// Work is parallelised over X slices using Rayon and merged in slice order,
/// so the output is ordered x-major, then y, then z.
///
/// ```text
/// Per sample p:
/// 1. clip test                        →  skip clipped side
/// 2. density(p) <= 0                  →  skip air
/// 3. density(p ± step·axis) (×6)      →  all solid? skip interior
/// 4. central differences of the six   →  gradient → unit normal
/// 5. clamp(normal · light, 0.08, 1)   →  light
/// ```
///
/// The gradient of a density field points into the solid; the emitted
/// normal is its negation, so it faces out toward the air.
#[instrument(skip_all)]
pub fn extract_surface_with<F, O>(field: &F, volume: &ScanVolume, observer: &O) -> Extraction
where
    F: DensityField + ?Sized,
    O: ScanObserver + ?Sized,
{
    let [nx, ny, nz] = volume.sample_counts();
    let [ex, ey, ez] = volume.probe_offsets();
    let light_dir = light_direction();

    let aborted = AtomicBool::new(false);
    let completed = AtomicUsize::new(0);

    let per_x: Vec<Vec<SurfacePoint>> = (0..nx)
        .into_par_iter()
        .map(|i| {
            if aborted.load(Ordering::Relaxed) || observer.should_abort() {
                aborted.store(true, Ordering::Relaxed);
                return Vec::new();
            }

            let mut local = Vec::new();
            for j in 0..ny {
                for k in 0..nz {
                    let p = volume.sample_point(i, j, k);
                    if let Some(sp) = boundary_point(field, volume, p, [ex, ey, ez], &light_dir) {
                        local.push(sp);
                    }
                }
            }

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            observer.slice_done(done, nx);
            local
        })
        .collect();

    // Merge per-X slices into a single point list
    let total: usize = per_x.iter().map(|v| v.len()).sum();
    let mut points = Vec::with_capacity(total);
    for mut v in per_x {
        points.append(&mut v);
    }

    let aborted = aborted.into_inner();
    if aborted {
        log::debug!(
            "surface scan aborted after {} of {nx} slices, {} points",
            completed.into_inner(),
            points.len()
        );
    } else {
        log::debug!(
            "surface scan of {} samples produced {} points",
            volume.sample_count(),
            points.len()
        );
    }

    Extraction { points, aborted }
}

/// Classifies one sample. Costs at most seven density evaluations.
#[inline]
fn boundary_point<F: DensityField + ?Sized>(
    field: &F,
    volume: &ScanVolume,
    p: Point,
    [ex, ey, ez]: [Vector; 3],
    light_dir: &Vector,
) -> Option<SurfacePoint> {
    if volume.clip.is_some_and(|clip| clip.clips(&p)) {
        return None;
    }
    if field.density(&p) <= 0.0 {
        return None;
    }

    let xp = field.density(&(p + ex));
    let xn = field.density(&(p - ex));
    let yp = field.density(&(p + ey));
    let yn = field.density(&(p - ey));
    let zp = field.density(&(p + ez));
    let zn = field.density(&(p - ez));

    if [xp, xn, yp, yn, zp, zn].iter().all(|&d| d > 0.0) {
        return None;
    }

    let gradient = Vector::new(xp - xn, yp - yn, zp - zn);
    let normal = normalize_or(-gradient, Vector::y());
    let light = normal.dot(light_dir).clamp(AMBIENT_LIGHT, 1.0);

    Some(SurfacePoint::new(p, normal, light))
}
