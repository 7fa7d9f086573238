//! Map-snapshot collaborator boundary.
//!
//! Location messages carry no pixels of their own; a [`MapSnapshotProvider`]
//! produces the map image off the UI task and the outcome is marshalled
//! back over an mpsc channel, where the hosting list applies it via
//! [`crate::ui::cell::MessageCell::apply_snapshot_outcome`]. An outcome is
//! sent on every exit path so the busy indicator is always released.

use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::core::image::CellImage;
use crate::core::message::Coordinate;
use crate::ui::cell::CellId;

pub type SnapshotError = Box<dyn Error + Send + Sync>;

/// Options forwarded to the snapshot provider: the visible span around the
/// coordinate and the rendered size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotOptions {
    pub latitude_span: f64,
    pub longitude_span: f64,
    pub show_buildings: bool,
    pub show_points_of_interest: bool,
    pub width: u16,
    pub height: u16,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            latitude_span: 0.01,
            longitude_span: 0.01,
            show_buildings: true,
            show_points_of_interest: true,
            width: 24,
            height: 8,
        }
    }
}

/// A fetched map image together with the projection needed to place
/// annotation overlays on it.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSnapshot {
    pub image: CellImage,
    pub center: Coordinate,
    pub options: SnapshotOptions,
}

impl MapSnapshot {
    /// Project a coordinate into the snapshot's cell space. The center of
    /// the region maps to the middle of the image; results may fall outside
    /// the image and are clipped at composite time.
    pub fn point_for(&self, coordinate: Coordinate) -> (i32, i32) {
        let cols_per_degree = f64::from(self.options.width) / self.options.longitude_span;
        let rows_per_degree = f64::from(self.options.height) / self.options.latitude_span;
        let x = (coordinate.longitude - self.center.longitude) * cols_per_degree
            + f64::from(self.options.width) / 2.0;
        let y = (self.center.latitude - coordinate.latitude) * rows_per_degree
            + f64::from(self.options.height) / 2.0;
        (x.floor() as i32, y.floor() as i32)
    }
}

/// An overlay drawn on top of the snapshot at the message coordinate, e.g.
/// a pin glyph. `center_offset` shifts the overlay relative to its
/// centered position, mirroring a map pin whose anchor is not its middle.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub image: CellImage,
    pub center_offset: (i32, i32),
}

#[async_trait]
pub trait MapSnapshotProvider: Send + Sync {
    async fn snapshot(
        &self,
        coordinate: Coordinate,
        options: SnapshotOptions,
    ) -> Result<MapSnapshot, SnapshotError>;
}

/// Completion message sent back to the UI task. `image` is `None` when the
/// fetch failed; the receiver still applies the outcome so the busy
/// indicator stops.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOutcome {
    pub cell: CellId,
    pub generation: u64,
    pub image: Option<CellImage>,
}

/// Composite the annotation onto the snapshot image. The overlay's
/// top-left corner lands at the projected coordinate point minus half the
/// overlay size, shifted by the overlay's center offset.
pub fn annotated_image(
    snapshot: &MapSnapshot,
    coordinate: Coordinate,
    annotation: &Annotation,
) -> CellImage {
    let (mut x, mut y) = snapshot.point_for(coordinate);
    x -= i32::from(annotation.image.width()) / 2;
    y -= i32::from(annotation.image.height()) / 2;
    x += annotation.center_offset.0;
    y += annotation.center_offset.1;
    let mut image = snapshot.image.clone();
    image.composite(&annotation.image, x, y);
    image
}

/// Spawn the provider call on the runtime and deliver a [`SnapshotOutcome`]
/// over `tx` when it settles. The send happens on success, failure, and
/// panic-free early return alike; a dropped receiver is ignored.
pub fn spawn_snapshot_fetch(
    provider: Arc<dyn MapSnapshotProvider>,
    cell: CellId,
    generation: u64,
    coordinate: Coordinate,
    options: SnapshotOptions,
    annotation: Option<Annotation>,
    tx: UnboundedSender<SnapshotOutcome>,
) {
    tokio::spawn(async move {
        let image = match provider.snapshot(coordinate, options).await {
            Ok(snapshot) => Some(match &annotation {
                Some(annotation) => annotated_image(&snapshot, coordinate, annotation),
                None => snapshot.image,
            }),
            Err(err) => {
                debug!(cell = cell.0, "map snapshot fetch failed: {err}");
                None
            }
        };
        let _ = tx.send(SnapshotOutcome {
            cell,
            generation,
            image,
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    fn snapshot_with_blank_image(options: SnapshotOptions) -> MapSnapshot {
        let blank = ".".repeat(options.width as usize);
        let rows = vec![blank; options.height as usize];
        MapSnapshot {
            image: CellImage::new(rows),
            center: Coordinate::new(10.0, 20.0),
            options,
        }
    }

    #[test]
    fn center_coordinate_projects_to_image_middle() {
        let options = SnapshotOptions {
            width: 24,
            height: 8,
            ..SnapshotOptions::default()
        };
        let snapshot = snapshot_with_blank_image(options);
        assert_eq!(snapshot.point_for(snapshot.center), (12, 4));
    }

    #[test]
    fn annotation_lands_at_projected_point_with_anchor_offset() {
        let options = SnapshotOptions {
            width: 24,
            height: 8,
            ..SnapshotOptions::default()
        };
        let snapshot = snapshot_with_blank_image(options);
        let annotation = Annotation {
            image: CellImage::from_rows(&["V"]),
            center_offset: (0, -1),
        };
        let image = annotated_image(&snapshot, snapshot.center, &annotation);
        // Projected point (12, 4), 1x1 overlay, anchor shifted one row up.
        assert_eq!(image.rows()[3].chars().nth(12), Some('V'));
        assert_eq!(image.rows()[4].chars().nth(12), Some('.'));
    }

    struct FailingProvider;

    #[async_trait]
    impl MapSnapshotProvider for FailingProvider {
        async fn snapshot(
            &self,
            _coordinate: Coordinate,
            _options: SnapshotOptions,
        ) -> Result<MapSnapshot, SnapshotError> {
            Err("no map service".into())
        }
    }

    #[tokio::test]
    async fn failed_fetch_still_delivers_an_outcome() {
        let (tx, mut rx) = unbounded_channel();
        spawn_snapshot_fetch(
            Arc::new(FailingProvider),
            CellId(3),
            7,
            Coordinate::new(0.0, 0.0),
            SnapshotOptions::default(),
            None,
            tx,
        );
        let outcome = rx.recv().await.expect("outcome must always be sent");
        assert_eq!(outcome.cell, CellId(3));
        assert_eq!(outcome.generation, 7);
        assert!(outcome.image.is_none());
    }
}
