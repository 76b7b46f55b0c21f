use std::{
    ops::Deref as _,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread::{self, JoinHandle},
};

use anyhow::{Context as _, anyhow};
use image::{GenericImage, GenericImageView, RgbaImage};
use tracing::{debug, trace};

use crate::{
    camera::Camera,
    geometry::{Ray, ScreenBlock},
    renderer::{RenderSettings, Shader, worker::Worker},
    scene::{HitRecord, Scene},
    screen_block::ScreenBlockExt,
    util::Rgba,
};

/// Starts rendering `scene` on one worker thread per CPU core and returns immediately.
///
/// `shader` colors every camera ray that hits something, rays that miss get a sky gradient.
/// `finished_tile_callback` is called from the worker threads after each tile is
/// copied to the output image.
pub fn render<P, S, F>(
    scene: Scene<P>,
    camera: Camera,
    settings: RenderSettings,
    shader: S,
    finished_tile_callback: F,
) -> anyhow::Result<RenderProgress<P>>
where
    P: Clone + Send + Sync + 'static,
    S: Fn(&Scene<P>, &Ray, &HitRecord<P>) -> Rgba + Send + Sync + 'static,
    F: Fn(&ScreenBlock) + Send + Sync + 'static,
{
    let resolution = camera.get_resolution();
    let state = Arc::new(RenderState {
        scene,
        camera,
        settings,
        shader: Box::new(shader),

        image: Mutex::new(RgbaImage::new(resolution.x, resolution.y)),

        tile_ordering: ScreenBlock::from_size(resolution).tile_ordering(settings.tile_size),
        next_tile_index: AtomicUsize::new(0),
    });
    let finished_tile_callback = Arc::new(finished_tile_callback);

    let cores = core_affinity::get_core_ids()
        .context("Failed to list CPU cores")?
        .into_iter()
        .enumerate();

    let threads = cores
        .map(|(worker_id, core)| {
            let state = Arc::clone(&state);
            let finished_tile_callback = Arc::clone(&finished_tile_callback);

            thread::Builder::new()
                .name(format!("worker{worker_id}"))
                .spawn(move || -> anyhow::Result<()> {
                    if !core_affinity::set_for_current(core) {
                        debug!(worker_id, "failed to pin worker to its core");
                    }
                    trace!(worker_id, "worker started");

                    let mut worker = Worker::new();
                    let mut buffer =
                        RgbaImage::new(settings.tile_size.into(), settings.tile_size.into());
                    let mut tile_count = 0usize;

                    while let Some(tile) = state.get_next_tile() {
                        worker.render_tile(&state, tile, &mut buffer);
                        state
                            .image
                            .lock()
                            .map_err(|_| anyhow!("Output image lock poisoned"))?
                            .copy_from(
                                buffer.view(0, 0, tile.width(), tile.height()).deref(),
                                tile.min.x,
                                tile.min.y,
                            )
                            .context("Tile doesn't fit into the output image")?;

                        (finished_tile_callback)(tile);
                        tile_count += 1;
                    }

                    trace!(worker_id, tile_count, "worker finished");
                    Ok(())
                })
                .context("Failed to spawn worker thread")
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(RenderProgress {
        render_state: state,
        threads,
    })
}

pub struct RenderProgress<P> {
    render_state: Arc<RenderState<P>>,
    threads: Vec<JoinHandle<anyhow::Result<()>>>,
}

impl<P> RenderProgress<P> {
    /// Return number of processed and total tiles.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.render_state.tile_ordering.len();
        let processed = self
            .render_state
            .next_tile_index
            .load(Ordering::Acquire)
            .min(total);
        (processed, total)
    }

    pub fn progress_percent(&self) -> f32 {
        let (processed, total) = self.progress();
        if total == 0 {
            100.0
        } else {
            100.0 * (processed as f32) / (total as f32)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.threads.iter().all(|handle| handle.is_finished())
    }

    /// Signal the workers to abort.
    /// Any running workers will still finish their tiles, but no new ones will be started.
    pub fn abort(&self) {
        self.render_state
            .next_tile_index
            .store(self.render_state.tile_ordering.len(), Ordering::Release);
    }

    /// Blocks until all workers finish, reports the first worker failure.
    pub fn wait(&mut self) -> anyhow::Result<()> {
        let mut result = Ok(());
        for handle in self.threads.drain(..) {
            let worker_result = handle
                .join()
                .map_err(|_| anyhow!("Worker thread panicked"))
                .and_then(|r| r);
            if result.is_ok() {
                result = worker_result;
            }
        }
        result
    }

    pub fn image(&self) -> &Mutex<RgbaImage> {
        &self.render_state.image
    }

    pub fn scene(&self) -> &Scene<P> {
        &self.render_state.scene
    }
}

pub(super) struct RenderState<P> {
    pub scene: Scene<P>,
    pub camera: Camera,
    pub settings: RenderSettings,
    pub shader: Box<Shader<P>>,

    image: Mutex<RgbaImage>,

    tile_ordering: Vec<ScreenBlock>,
    next_tile_index: AtomicUsize,
}

impl<P> RenderState<P> {
    fn get_next_tile(&self) -> Option<&ScreenBlock> {
        let id = self.next_tile_index.fetch_add(1, Ordering::AcqRel);
        self.tile_ordering.get(id)
    }
}
