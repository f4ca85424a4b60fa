use crate::fullscreen::FullscreenApi;

/// What the host environment supports. Controllers check these before
/// touching an optional platform API and degrade to a no-op otherwise.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Fullscreen APIs the host exposes, in no particular order.
    pub fullscreen_apis: Vec<FullscreenApi>,
    pub intersection_observer: bool,
    pub storage: bool,
    pub prefers_reduced_motion: bool,
    pub device_pixel_ratio: f32,
    pub idle_callback: bool,
    pub performance_observer: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            fullscreen_apis: vec![FullscreenApi::Standard],
            intersection_observer: true,
            storage: true,
            prefers_reduced_motion: false,
            device_pixel_ratio: 1.0,
            idle_callback: true,
            performance_observer: true,
        }
    }
}

impl Capabilities {
    /// A host with none of the optional APIs.
    pub fn minimal() -> Self {
        Self {
            fullscreen_apis: Vec::new(),
            intersection_observer: false,
            storage: false,
            prefers_reduced_motion: false,
            device_pixel_ratio: 1.0,
            idle_callback: false,
            performance_observer: false,
        }
    }
}
