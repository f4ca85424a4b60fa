use std::time::Duration;

use crate::document::{Document, NodeId, Selector};
use crate::observer::{IntersectionEntry, IntersectionObserver, ObserverOptions};
use crate::platform::Capabilities;

/// One frame at 60 Hz.
pub const SLOW_THRESHOLD: Duration = Duration::from_millis(16);
const HIGH_DPI_RATIO: f32 = 1.5;

#[derive(Debug, Default)]
pub struct PerformanceController {
    lazy_images: Option<IntersectionObserver>,
    monitor: bool,
}

impl PerformanceController {
    pub fn new(doc: &mut Document, caps: &Capabilities) -> Self {
        let lazy_images = caps.intersection_observer.then(|| {
            let mut observer = IntersectionObserver::new(ObserverOptions {
                threshold: 0.0,
                root_margin: 0.0,
            });
            for img in doc.select_all(&Selector::tag("img").and_attr("data-src")) {
                observer.observe(img);
            }
            observer
        });

        let body = doc.body();
        if caps.prefers_reduced_motion {
            doc.get_mut(body).add_class("reduced-motion");
        }
        if caps.device_pixel_ratio > HIGH_DPI_RATIO {
            doc.get_mut(body).add_class("high-dpi");
        }

        Self {
            lazy_images,
            monitor: caps.idle_callback && caps.performance_observer,
        }
    }

    /// Images still holding a placeholder source.
    pub fn pending_images(&self) -> Vec<NodeId> {
        self.lazy_images
            .as_ref()
            .map(|o| o.targets().collect())
            .unwrap_or_default()
    }

    /// Swap in the real source of every image that came into view.
    /// Returns the nodes whose `src` changed.
    pub fn on_intersection(
        &mut self,
        entries: &[IntersectionEntry],
        doc: &mut Document,
    ) -> Vec<NodeId> {
        let Some(observer) = self.lazy_images.as_mut() else {
            return Vec::new();
        };
        let visible: Vec<NodeId> = entries
            .iter()
            .filter(|e| observer.is_observing(e.target) && e.ratio > 0.0)
            .map(|e| e.target)
            .collect();
        for &img in &visible {
            let el = doc.get_mut(img);
            if let Some(src) = el.attr("data-src").map(str::to_string) {
                el.set_attr("src", &src);
                el.remove_attr("data-src");
            }
            observer.unobserve(img);
        }
        visible
    }

    /// Report a timed measurement; long ones are logged.
    pub fn record_measure(&self, name: &str, duration: Duration) -> bool {
        if !self.monitor || duration <= SLOW_THRESHOLD {
            return false;
        }
        tracing::warn!(
            measure = name,
            duration_ms = duration.as_secs_f32() * 1000.0,
            "performance issue detected"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    fn doc() -> (Document, NodeId) {
        let mut doc = Document::new();
        let img = doc.append(
            doc.body(),
            Element::new("img")
                .with_attr("src", "")
                .with_attr("data-src", "pics/board.png"),
        );
        (doc, img)
    }

    #[test]
    fn test_lazy_image_swaps_source_once() {
        let (mut doc, img) = doc();
        let mut perf = PerformanceController::new(&mut doc, &Capabilities::default());
        assert_eq!(perf.pending_images(), vec![img]);

        let entry = IntersectionEntry {
            target: img,
            ratio: 1.0,
        };
        assert_eq!(perf.on_intersection(&[entry], &mut doc), vec![img]);
        assert_eq!(doc.get(img).attr("src"), Some("pics/board.png"));
        assert!(!doc.get(img).has_attr("data-src"));
        assert!(perf.on_intersection(&[entry], &mut doc).is_empty());
    }

    #[test]
    fn test_offscreen_image_untouched() {
        let (mut doc, img) = doc();
        let mut perf = PerformanceController::new(&mut doc, &Capabilities::default());
        let entry = IntersectionEntry {
            target: img,
            ratio: 0.0,
        };
        assert!(perf.on_intersection(&[entry], &mut doc).is_empty());
        assert_eq!(doc.get(img).attr("src"), Some(""));
    }

    #[test]
    fn test_body_classes() {
        let (mut doc, _) = doc();
        let caps = Capabilities {
            prefers_reduced_motion: true,
            device_pixel_ratio: 2.0,
            ..Capabilities::default()
        };
        PerformanceController::new(&mut doc, &caps);
        let body = doc.get(doc.body());
        assert!(body.has_class("reduced-motion"));
        assert!(body.has_class("high-dpi"));
    }

    #[test]
    fn test_slow_measure_reported_only_with_monitoring() {
        let (mut doc, _) = doc();
        let perf = PerformanceController::new(&mut doc, &Capabilities::default());
        assert!(perf.record_measure("frame", Duration::from_millis(40)));
        assert!(!perf.record_measure("frame", Duration::from_millis(10)));

        let perf = PerformanceController::new(&mut doc, &Capabilities::minimal());
        assert!(!perf.record_measure("frame", Duration::from_millis(40)));
        assert!(perf.pending_images().is_empty());
    }
}
