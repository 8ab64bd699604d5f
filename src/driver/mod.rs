//! Animation driver
//!
//! Owns the particle collection and runs the per-frame routine. All state
//! the frame routine touches lives here and the host collaborators (element,
//! scheduler) are passed in per call, so the routine can be driven and
//! inspected in isolation.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──mount──> Running ──hidden──> Paused
//!                             ^                  │
//!                             └─────visible──────┘
//!          Running / Paused ──unmount──> TornDown
//! ```
//!
//! One iteration of `Running` is one scheduled frame: translucent overpaint,
//! acceleration from the pointer, update + draw + retire every star,
//! replenish, request the next frame.

pub mod sizing;

pub use sizing::{BackingSize, SurfaceSizer, MAX_BACKING_DIMENSION};

use crate::host::{FrameHandle, FrameScheduler, HostElement};
use crate::render::{DrawingSurface, Rgba};
use crate::starfield::{PointerState, StarField, StarfieldOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, trace};

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DriverState {
    /// Not mounted yet (or mount was skipped)
    Uninitialized,
    /// Frames are being scheduled
    Running,
    /// Page hidden; no frame pending, no surface mutation
    Paused,
    /// Unmounted; all further events are ignored
    TornDown,
}

/// Counters for monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Frames rendered
    pub frames_rendered: u64,
    /// Stars spawned (initial population included)
    pub stars_spawned: u64,
    /// Stars retired after leaving the surface
    pub stars_retired: u64,
    /// Resize notifications that changed the backing store
    pub resizes_applied: u64,
    /// Resize notifications ignored as redundant
    pub resizes_ignored: u64,
    /// Times the page was hidden while running
    pub pauses: u64,
    /// Times the page became visible again
    pub resumes: u64,
}

/// Starfield animation driver
pub struct AnimationDriver<S> {
    options: StarfieldOptions,
    state: DriverState,
    field: StarField,
    sizer: SurfaceSizer,
    surface: S,
    pointer: PointerState,
    pending: Option<FrameHandle>,
    rng: StdRng,
    stats: FrameStats,
}

impl<S: DrawingSurface> AnimationDriver<S> {
    /// Create a driver with an entropy-seeded RNG
    pub fn new(surface: S, options: StarfieldOptions, pointer: PointerState) -> Self {
        Self::with_rng(surface, options, pointer, StdRng::from_entropy())
    }

    /// Create a driver with a deterministic RNG
    pub fn with_seed(
        surface: S,
        options: StarfieldOptions,
        pointer: PointerState,
        seed: u64,
    ) -> Self {
        Self::with_rng(surface, options, pointer, StdRng::seed_from_u64(seed))
    }

    fn with_rng(surface: S, options: StarfieldOptions, pointer: PointerState, rng: StdRng) -> Self {
        Self {
            field: StarField::new(options.star_count, options.seed_previous_to_origin),
            options,
            state: DriverState::Uninitialized,
            sizer: SurfaceSizer::new(),
            surface,
            pointer,
            pending: None,
            rng,
            stats: FrameStats::default(),
        }
    }

    /// Mount onto a host element and schedule the first frame
    ///
    /// A missing element or one without a drawable area leaves the driver
    /// `Uninitialized`; there is nothing useful to fall back to, so this is a
    /// silent no-op.
    pub fn mount<E, F>(&mut self, element: Option<&E>, scheduler: &mut F) -> bool
    where
        E: HostElement + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if self.state != DriverState::Uninitialized {
            debug!("Mount ignored in state {:?}", self.state);
            return false;
        }

        let Some(element) = element else {
            debug!("No host element, starfield not mounted");
            return false;
        };

        let (width, height) = element.logical_size();
        if !has_area(width, height) {
            debug!("Host element is {}x{}, starfield not mounted", width, height);
            return false;
        }

        self.apply_resize(element);

        let spawned = self.field.replenish(&mut self.rng, width, height);
        self.stats.stars_spawned += spawned as u64;

        self.pending = Some(scheduler.request_frame());
        self.state = DriverState::Running;

        info!(
            "Starfield mounted: {}x{} logical, {} stars",
            width,
            height,
            self.field.len()
        );
        true
    }

    /// Run one frame
    ///
    /// Only the currently pending frame runs; stale or cancelled handles and
    /// ticks outside `Running` are ignored. Returns whether a frame ran.
    pub fn tick<E, F>(&mut self, handle: FrameHandle, element: &E, scheduler: &mut F) -> bool
    where
        E: HostElement + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if self.state != DriverState::Running || self.pending != Some(handle) {
            trace!("Skipping frame {:?} in state {:?}", handle, self.state);
            return false;
        }
        self.pending = None;

        let (width, height) = element.logical_size();
        if !has_area(width, height) {
            // Collapsed element: keep the loop alive but leave stars alone
            trace!("Skipping frame on {}x{} element", width, height);
            self.pending = Some(scheduler.request_frame());
            return false;
        }

        // Partial occlusion instead of a clear leaves fading trails
        self.surface.fill_rect(
            0.0,
            0.0,
            width,
            height,
            Rgba::BLACK.with_alpha(self.options.trail_fade),
        );

        let pointer = self.pointer.get();
        let acceleration = self.options.acceleration(pointer.x, width);

        let retired = self.field.advance(
            acceleration,
            width,
            height,
            &mut self.surface,
            self.options.stroke_width,
        );
        let spawned = self.field.replenish(&mut self.rng, width, height);

        self.stats.frames_rendered += 1;
        self.stats.stars_retired += retired as u64;
        self.stats.stars_spawned += spawned as u64;

        trace!(
            "Frame {}: acc={:.4} retired={} spawned={}",
            self.stats.frames_rendered,
            acceleration,
            retired,
            spawned
        );

        self.pending = Some(scheduler.request_frame());
        true
    }

    /// Handle a page visibility change
    pub fn set_visible<E, F>(&mut self, visible: bool, element: &E, scheduler: &mut F)
    where
        E: HostElement + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        match (self.state, visible) {
            (DriverState::Running, false) => {
                if let Some(handle) = self.pending.take() {
                    scheduler.cancel_frame(handle);
                }
                self.state = DriverState::Paused;
                self.stats.pauses += 1;
                debug!("Page hidden, starfield paused");
            }
            (DriverState::Paused, true) => {
                // Size may have changed while hidden
                self.apply_resize(element);
                self.pending = Some(scheduler.request_frame());
                self.state = DriverState::Running;
                self.stats.resumes += 1;
                debug!("Page visible, starfield resumed");
            }
            (state, visible) => {
                trace!("Visibility {} ignored in state {:?}", visible, state);
            }
        }
    }

    /// Handle a size-change notification
    ///
    /// Applied only while running; a paused driver re-derives its size when
    /// it resumes. Returns whether the backing store changed.
    pub fn resize<E>(&mut self, element: &E) -> bool
    where
        E: HostElement + ?Sized,
    {
        if self.state != DriverState::Running {
            trace!("Resize deferred in state {:?}", self.state);
            return false;
        }
        self.apply_resize(element)
    }

    /// Cancel the pending frame and release the particle collection
    pub fn unmount<F>(&mut self, scheduler: &mut F)
    where
        F: FrameScheduler + ?Sized,
    {
        if self.state == DriverState::TornDown {
            return;
        }

        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.field.clear();
        self.state = DriverState::TornDown;

        info!(
            "Starfield unmounted after {} frames",
            self.stats.frames_rendered
        );
    }

    fn apply_resize<E>(&mut self, element: &E) -> bool
    where
        E: HostElement + ?Sized,
    {
        let (width, height) = element.logical_size();
        if !has_area(width, height) {
            debug!("Resize to {}x{} ignored, no drawable area", width, height);
            return false;
        }

        let ratio = if self.options.density_aware {
            element.device_pixel_ratio()
        } else {
            1.0
        };

        let Some(backing) = self.sizer.apply(width, height, ratio) else {
            self.stats.resizes_ignored += 1;
            trace!("Resize to {}x{} @{} unchanged", width, height, ratio);
            return false;
        };

        self.surface.set_transform_identity();
        self.surface.resize_backing(backing.width, backing.height);
        self.surface.scale(ratio, ratio);

        // Opaque fill so the first frames don't flash an empty surface
        self.surface.fill_rect(0.0, 0.0, width, height, Rgba::BLACK);

        if self.options.reset_on_resize {
            self.field.clear();
        }
        self.stats.resizes_applied += 1;

        debug!(
            "Surface resized: {}x{} logical -> {}x{} device (ratio {})",
            width, height, backing.width, backing.height, ratio
        );
        true
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Frame waiting to run, if any
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Particle collection
    pub fn field(&self) -> &StarField {
        &self.field
    }

    /// Drawing surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Options the driver was built with
    pub fn options(&self) -> &StarfieldOptions {
        &self.options
    }

    /// Pointer state read each frame
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Counters
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Consume the driver, returning its surface
    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Whether a logical size can hold any stars
fn has_area(width: f64, height: f64) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{TickScheduler, VirtualElement};
    use crate::render::surface::MockDrawingSurface;
    use crate::render::{FrameBuffer, PixelFormat};
    use crate::starfield::Star;

    fn small_options() -> StarfieldOptions {
        StarfieldOptions {
            star_count: 50,
            ..StarfieldOptions::default()
        }
    }

    fn mounted_driver() -> (AnimationDriver<FrameBuffer>, VirtualElement, TickScheduler) {
        let surface = FrameBuffer::new(1, 1, PixelFormat::RGBA8888);
        let mut driver =
            AnimationDriver::with_seed(surface, small_options(), PointerState::new(), 42);
        let element = VirtualElement::new(320.0, 200.0, 1.0);
        let mut scheduler = TickScheduler::new();
        assert!(driver.mount(Some(&element), &mut scheduler));
        (driver, element, scheduler)
    }

    #[test]
    fn test_mount_sizes_fills_and_populates() {
        let (driver, _element, scheduler) = mounted_driver();

        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.surface().dimensions(), (320, 200));
        assert_eq!(driver.surface().pixel(319, 199), Some([0, 0, 0, 255]));
        assert_eq!(driver.field().len(), 50);
        assert_eq!(driver.pending_frame(), scheduler.pending());
        assert!(driver.pending_frame().is_some());
    }

    #[test]
    fn test_mount_without_element_is_noop() {
        let surface = FrameBuffer::new(4, 4, PixelFormat::RGBA8888);
        let mut driver = AnimationDriver::with_seed(surface, small_options(), PointerState::new(), 1);
        let mut scheduler = TickScheduler::new();

        assert!(!driver.mount(None::<&VirtualElement>, &mut scheduler));
        assert_eq!(driver.state(), DriverState::Uninitialized);
        assert_eq!(scheduler.requested(), 0);
        assert!(driver.field().is_empty());
    }

    #[test]
    fn test_tick_keeps_population_at_target() {
        let (mut driver, element, mut scheduler) = mounted_driver();
        driver.pointer().set(320.0, 0.0);

        for _ in 0..200 {
            let handle = scheduler.take_due().unwrap();
            assert!(driver.tick(handle, &element, &mut scheduler));
            assert_eq!(driver.field().len(), 50);
        }

        let stats = driver.stats();
        assert_eq!(stats.frames_rendered, 200);
        assert!(stats.stars_retired > 0);
        assert_eq!(stats.stars_spawned, 50 + stats.stars_retired);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let (mut driver, element, mut scheduler) = mounted_driver();
        let handle = scheduler.take_due().unwrap();
        assert!(driver.tick(handle, &element, &mut scheduler));
        assert!(!driver.tick(handle, &element, &mut scheduler));
        assert_eq!(driver.stats().frames_rendered, 1);
    }

    #[test]
    fn test_offscreen_star_replaced_same_tick() {
        let (mut driver, element, mut scheduler) = mounted_driver();
        driver.field.clear();
        driver.field.push(Star::at(-10.0, 50.0, 320.0, 200.0));
        driver.field.replenish(&mut driver.rng, 320.0, 200.0);

        let handle = scheduler.take_due().unwrap();
        driver.tick(handle, &element, &mut scheduler);

        assert_eq!(driver.field().len(), 50);
        assert!(driver
            .field()
            .stars()
            .iter()
            .all(|s| s.previous_position().x >= 0.0));
        assert!(driver.stats().stars_retired >= 1);
    }

    #[test]
    fn test_hidden_cancels_and_freezes_surface() {
        let (mut driver, element, mut scheduler) = mounted_driver();
        let handle = scheduler.pending().unwrap();

        driver.set_visible(false, &element, &mut scheduler);
        assert_eq!(driver.state(), DriverState::Paused);
        assert_eq!(scheduler.pending(), None);

        let before = driver.surface().data().to_vec();
        assert!(!driver.tick(handle, &element, &mut scheduler));
        element.set_logical_size(640.0, 400.0);
        assert!(!driver.resize(&element));
        assert_eq!(driver.surface().data(), before.as_slice());
    }

    #[test]
    fn test_visible_resizes_and_reschedules() {
        let (mut driver, element, mut scheduler) = mounted_driver();
        driver.set_visible(false, &element, &mut scheduler);

        element.set_logical_size(640.0, 400.0);
        driver.set_visible(true, &element, &mut scheduler);

        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.surface().dimensions(), (640, 400));
        assert!(scheduler.pending().is_some());
        // Collection was reset by the resize and refills on the next tick
        assert!(driver.field().is_empty());

        let handle = scheduler.take_due().unwrap();
        driver.tick(handle, &element, &mut scheduler);
        assert_eq!(driver.field().len(), 50);
        assert_eq!(driver.stats().resumes, 1);
    }

    #[test]
    fn test_density_aware_backing() {
        let (mut driver, element, _scheduler) = mounted_driver();
        element.set_device_pixel_ratio(2.0);

        assert!(driver.resize(&element));
        assert_eq!(driver.surface().dimensions(), (640, 400));
        assert_eq!(driver.surface().transform(), (2.0, 2.0));
    }

    #[test]
    fn test_naive_sizing_ignores_ratio() {
        let surface = FrameBuffer::new(1, 1, PixelFormat::RGBA8888);
        let options = StarfieldOptions {
            density_aware: false,
            ..small_options()
        };
        let mut driver = AnimationDriver::with_seed(surface, options, PointerState::new(), 3);
        let element = VirtualElement::new(320.0, 200.0, 2.0);
        let mut scheduler = TickScheduler::new();

        driver.mount(Some(&element), &mut scheduler);
        assert_eq!(driver.surface().dimensions(), (320, 200));
        assert_eq!(driver.surface().transform(), (1.0, 1.0));
    }

    #[test]
    fn test_second_identical_resize_is_noop() {
        let mut surface = MockDrawingSurface::new();
        surface.expect_set_transform_identity().times(1).return_const(());
        surface
            .expect_resize_backing()
            .withf(|w, h| (*w, *h) == (1600, 1200))
            .times(1)
            .return_const(());
        surface.expect_scale().times(1).return_const(());
        surface.expect_fill_rect().times(1).return_const(());

        let mut driver = AnimationDriver::with_seed(surface, small_options(), PointerState::new(), 7);
        let element = VirtualElement::new(800.0, 600.0, 2.0);
        let mut scheduler = TickScheduler::new();

        assert!(driver.mount(Some(&element), &mut scheduler));
        assert!(!driver.resize(&element));
        assert_eq!(driver.stats().resizes_applied, 1);
        assert_eq!(driver.stats().resizes_ignored, 1);
        assert_eq!(driver.field().len(), 50);
    }

    #[test]
    fn test_resize_without_reset_keeps_stars() {
        let surface = FrameBuffer::new(1, 1, PixelFormat::RGBA8888);
        let options = StarfieldOptions {
            reset_on_resize: false,
            ..small_options()
        };
        let mut driver = AnimationDriver::with_seed(surface, options, PointerState::new(), 5);
        let element = VirtualElement::new(320.0, 200.0, 1.0);
        let mut scheduler = TickScheduler::new();
        driver.mount(Some(&element), &mut scheduler);

        element.set_logical_size(400.0, 300.0);
        assert!(driver.resize(&element));
        assert_eq!(driver.field().len(), 50);
    }

    #[test]
    fn test_unmount_cancels_pending_frame() {
        let (mut driver, element, mut scheduler) = mounted_driver();
        let handle = scheduler.pending().unwrap();

        driver.unmount(&mut scheduler);
        assert_eq!(driver.state(), DriverState::TornDown);
        assert_eq!(scheduler.pending(), None);
        assert!(driver.field().is_empty());

        assert!(!driver.tick(handle, &element, &mut scheduler));
        driver.set_visible(true, &element, &mut scheduler);
        assert_eq!(driver.state(), DriverState::TornDown);
        assert!(!driver.mount(Some(&element), &mut scheduler));
    }

    #[test]
    fn test_zero_size_element_is_not_mounted() {
        let surface = FrameBuffer::new(4, 4, PixelFormat::RGBA8888);
        let mut driver = AnimationDriver::with_seed(surface, small_options(), PointerState::new(), 2);
        let element = VirtualElement::new(0.0, 0.0, 1.0);
        let mut scheduler = TickScheduler::new();

        assert!(!driver.mount(Some(&element), &mut scheduler));
        assert_eq!(driver.state(), DriverState::Uninitialized);
        assert_eq!(scheduler.requested(), 0);
        assert!(driver.field().is_empty());
        assert_eq!(driver.surface().dimensions(), (4, 4));
        assert_eq!(driver.stats(), &FrameStats::default());

        let element = VirtualElement::new(f64::NAN, 200.0, 1.0);
        assert!(!driver.mount(Some(&element), &mut scheduler));
        assert_eq!(driver.state(), DriverState::Uninitialized);
    }

    #[test]
    fn test_collapsed_element_freezes_stars() {
        let (mut driver, element, mut scheduler) = mounted_driver();
        let spawned = driver.stats().stars_spawned;

        element.set_logical_size(0.0, 0.0);
        assert!(!driver.resize(&element));
        assert_eq!(driver.surface().dimensions(), (320, 200));

        for _ in 0..10 {
            let handle = scheduler.take_due().unwrap();
            assert!(!driver.tick(handle, &element, &mut scheduler));
        }
        assert_eq!(driver.state(), DriverState::Running);
        assert_eq!(driver.stats().frames_rendered, 0);
        assert_eq!(driver.stats().stars_spawned, spawned);
        assert_eq!(driver.field().len(), 50);

        element.set_logical_size(320.0, 200.0);
        let handle = scheduler.take_due().unwrap();
        assert!(driver.tick(handle, &element, &mut scheduler));
    }

    #[test]
    fn test_oversized_element_is_clamped() {
        let mut surface = MockDrawingSurface::new();
        surface.expect_set_transform_identity().return_const(());
        surface
            .expect_resize_backing()
            .withf(|w, h| (*w, *h) == (MAX_BACKING_DIMENSION, MAX_BACKING_DIMENSION))
            .times(1)
            .return_const(());
        surface.expect_scale().return_const(());
        surface.expect_fill_rect().return_const(());

        let mut driver = AnimationDriver::with_seed(surface, small_options(), PointerState::new(), 4);
        let element = VirtualElement::new(100_000.0, 100_000.0, 1.0);
        let mut scheduler = TickScheduler::new();
        assert!(driver.mount(Some(&element), &mut scheduler));
    }

    #[test]
    fn test_tick_overpaints_with_trail_fade() {
        let mut surface = MockDrawingSurface::new();
        surface.expect_set_transform_identity().return_const(());
        surface.expect_resize_backing().return_const(());
        surface.expect_scale().return_const(());
        // Opaque fill on mount
        surface
            .expect_fill_rect()
            .withf(|_, _, _, _, color| *color == Rgba::BLACK)
            .times(1)
            .return_const(());
        // Translucent overpaint of the whole logical surface on each tick
        surface
            .expect_fill_rect()
            .withf(|x, y, w, h, color| {
                (*x, *y, *w, *h) == (0.0, 0.0, 320.0, 200.0)
                    && (color.r, color.g, color.b) == (0, 0, 0)
                    && (color.a - 0.08).abs() < 1e-12
            })
            .times(2)
            .return_const(());
        surface.expect_stroke_line().return_const(());

        let mut driver = AnimationDriver::with_seed(surface, small_options(), PointerState::new(), 8);
        let element = VirtualElement::new(320.0, 200.0, 1.0);
        let mut scheduler = TickScheduler::new();
        driver.mount(Some(&element), &mut scheduler);

        for _ in 0..2 {
            let handle = scheduler.take_due().unwrap();
            assert!(driver.tick(handle, &element, &mut scheduler));
        }
    }
}
